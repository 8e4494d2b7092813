//! Document ingestion pipeline.
//!
//! Every upload walks the same sequence of stages, each with a single exit
//! point: Validate → ResolveParent → PersistMetadata → PersistContent →
//! Enqueue. Metadata is committed strictly before content; if the content
//! write then fails, the row is left with no `local_path` and readers treat
//! it as "content unavailable". There is no rollback for that window.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use uuid::Uuid;

use crate::content_store::{ContentStore, ContentStoreError};
use crate::database::models::{Document, User};
use crate::database::{Database, DocumentKind};
use crate::jobs::{Job, JobDispatcher};

/// Wire shape of an upload request. `parent_id` accepts the root sentinel
/// `"0"` as well as a document id.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub parent_id: Option<String>,
    pub is_public: Option<bool>,
    pub data: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Missing name")]
    MissingName,

    #[error("Missing type")]
    MissingType,

    #[error("Missing data")]
    MissingData,

    #[error("Invalid data")]
    InvalidData,

    #[error("Parent not found")]
    ParentNotFound,

    #[error("Parent is not a folder")]
    ParentNotFolder,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(#[from] ContentStoreError),
}

impl UploadError {
    /// Whether this is a caller mistake (4xx) rather than a server fault.
    pub fn is_bad_request(&self) -> bool {
        !matches!(self, UploadError::Database(_) | UploadError::Storage(_))
    }
}

/// Validate and persist a new document on behalf of `owner`.
pub async fn ingest(
    owner: &User,
    request: UploadRequest,
    db: &Database,
    content: &ContentStore,
    jobs: &JobDispatcher,
) -> Result<Document, UploadError> {
    // Validate
    let name = request
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or(UploadError::MissingName)?;
    let kind = request
        .kind
        .as_deref()
        .and_then(DocumentKind::parse)
        .ok_or(UploadError::MissingType)?;
    let bytes = match (&request.data, kind.has_content()) {
        (Some(data), true) => Some(BASE64.decode(data).map_err(|_| UploadError::InvalidData)?),
        (None, true) => return Err(UploadError::MissingData),
        // Folders carry no content; any data field is ignored.
        (_, false) => None,
    };

    // ResolveParent
    let parent_id = parse_parent_id(request.parent_id.as_deref())?;
    if let Some(parent_id) = parent_id {
        let parent = Document::find(parent_id, db)
            .await?
            .ok_or(UploadError::ParentNotFound)?;
        if parent.kind != DocumentKind::Folder {
            return Err(UploadError::ParentNotFolder);
        }
    }

    // PersistMetadata
    let mut document = Document::create(
        *owner.id,
        name,
        kind,
        parent_id,
        request.is_public.unwrap_or(false),
        db,
    )
    .await?;

    // PersistContent
    if let Some(bytes) = bytes {
        let path = content.write(&bytes).await?;
        document.set_local_path(&path, db).await?;
    }

    // Enqueue (fire-and-forget: a dispatch failure degrades thumbnails but
    // never fails the upload)
    if document.kind == DocumentKind::Image {
        let job = Job::MakeThumbnail {
            user_id: *owner.id,
            file_id: *document.id,
        };
        if let Err(err) = jobs.dispatch(job) {
            tracing::warn!(
                document_id = %document.id,
                "failed to enqueue thumbnail job: {err}"
            );
        }
    }

    Ok(document)
}

/// `None`, `""` and `"0"` all mean the root. Anything else must parse as a
/// document id; a malformed id can't reference any parent, so it reports
/// the same way as an absent one.
fn parse_parent_id(raw: Option<&str>) -> Result<Option<Uuid>, UploadError> {
    match raw {
        None | Some("") | Some("0") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(|_| UploadError::ParentNotFound),
    }
}
