use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::access::resolve_user;
use crate::http_server::api::token_from_headers;
use crate::upload::{self, UploadError, UploadRequest};
use crate::AppState;

use super::DocumentResponse;

/// Ingest a new folder, file, or image.
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UploadRequest>,
) -> Result<impl IntoResponse, UploadApiError> {
    let user = resolve_user(
        token_from_headers(&headers),
        state.sessions(),
        state.database(),
    )
    .await?
    .ok_or(UploadApiError::Unauthorized)?;

    let document = upload::ingest(
        &user,
        request,
        state.database(),
        state.content(),
        state.jobs(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DocumentResponse::from(&document))))
}

#[derive(Debug, thiserror::Error)]
pub enum UploadApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl IntoResponse for UploadApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            UploadApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            UploadApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            UploadApiError::Upload(err) if err.is_bad_request() => StatusCode::BAD_REQUEST,
            UploadApiError::Upload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
