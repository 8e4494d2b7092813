use serde::Serialize;

pub mod content;
pub mod list;
pub mod publish;
pub mod show;
pub mod upload;

use crate::database::models::Document;
use crate::database::DocumentKind;

/// Root sentinel used on the wire for documents with no parent.
pub const ROOT_PARENT: &str = "0";

/// Public shape of a document: the store's internal key is renamed to a
/// plain `id`, and a missing parent is rendered as the root sentinel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub is_public: bool,
    pub parent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

impl From<&Document> for DocumentResponse {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id.to_string(),
            user_id: document.user_id.to_string(),
            name: document.name.clone(),
            kind: document.kind,
            is_public: document.is_public,
            parent_id: document
                .parent_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| ROOT_PARENT.to_string()),
            local_path: document.local_path.clone(),
        }
    }
}
