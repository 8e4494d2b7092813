use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::access::resolve_user;
use crate::database::models::Document;
use crate::http_server::api::token_from_headers;
use crate::AppState;

use super::DocumentResponse;

/// `PUT /files/:id/publish`
pub async fn publish(
    state: State<AppState>,
    headers: HeaderMap,
    id: Path<String>,
) -> Result<Response, PublishError> {
    set_visibility(state, headers, id, true).await
}

/// `PUT /files/:id/unpublish`
pub async fn unpublish(
    state: State<AppState>,
    headers: HeaderMap,
    id: Path<String>,
) -> Result<Response, PublishError> {
    set_visibility(state, headers, id, false).await
}

/// Only the owner may toggle visibility; anyone else sees `Not found`.
async fn set_visibility(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    is_public: bool,
) -> Result<Response, PublishError> {
    let user = resolve_user(
        token_from_headers(&headers),
        state.sessions(),
        state.database(),
    )
    .await?
    .ok_or(PublishError::Unauthorized)?;

    let id = Uuid::parse_str(&id).map_err(|_| PublishError::NotFound)?;

    let document = Document::set_visibility(id, *user.id, is_public, state.database())
        .await?
        .ok_or(PublishError::NotFound)?;

    Ok(Json(DocumentResponse::from(&document)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for PublishError {
    fn into_response(self) -> Response {
        let status = match self {
            PublishError::Unauthorized => StatusCode::UNAUTHORIZED,
            PublishError::NotFound => StatusCode::NOT_FOUND,
            PublishError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
