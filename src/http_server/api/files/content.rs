use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::access::{can_view, resolve_user};
use crate::content_store::ContentStoreError;
use crate::database::models::Document;
use crate::http_server::api::token_from_headers;
use crate::jobs::thumbnail::WIDTHS;
use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct ContentQuery {
    /// Optional derivative width; must be one of the generated sizes.
    pub size: Option<u32>,
}

/// Serve a document's bytes, or one of its thumbnail derivatives.
///
/// Visibility failures and missing documents are reported identically as
/// `Not found`, so private documents never leak their existence.
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<impl IntoResponse, ContentError> {
    // Unauthenticated callers may still fetch public documents.
    let user = resolve_user(
        token_from_headers(&headers),
        state.sessions(),
        state.database(),
    )
    .await?;

    let id = Uuid::parse_str(&id).map_err(|_| ContentError::NotFound)?;
    let document = Document::find(id, state.database())
        .await?
        .ok_or(ContentError::NotFound)?;

    if !can_view(&document, user.as_ref()) {
        return Err(ContentError::NotFound);
    }
    if !document.kind.has_content() {
        return Err(ContentError::FolderHasNoContent);
    }

    // A row without a local path is an upload whose content never landed.
    let local_path = document.local_path.as_deref().ok_or(ContentError::NotFound)?;
    let path = match query.size {
        Some(size) if WIDTHS.contains(&size) => format!("{local_path}_{size}"),
        Some(_) => return Err(ContentError::InvalidSize),
        None => local_path.to_string(),
    };

    let bytes = state.content().read(&path).await.map_err(|err| match err {
        ContentStoreError::NotFound(_) => ContentError::NotFound,
        other => ContentError::Storage(other),
    })?;

    let mime = mime_guess::from_path(&document.name).first_or_octet_stream();
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime.to_string())],
        bytes,
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Not found")]
    NotFound,

    #[error("A folder doesn't have content")]
    FolderHasNoContent,

    #[error("Invalid size")]
    InvalidSize,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(ContentStoreError),
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let status = match self {
            ContentError::NotFound => StatusCode::NOT_FOUND,
            ContentError::FolderHasNoContent | ContentError::InvalidSize => {
                StatusCode::BAD_REQUEST
            }
            ContentError::Database(_) | ContentError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
