use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::access::resolve_user;
use crate::database::models::Document;
use crate::http_server::api::token_from_headers;
use crate::AppState;

use super::{DocumentResponse, ROOT_PARENT};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub parent_id: Option<String>,
    pub page: Option<u32>,
}

/// Page through the caller's documents under one parent, 20 at a time, in
/// creation order. A page past the end is an empty list, not an error.
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ListError> {
    let user = resolve_user(
        token_from_headers(&headers),
        state.sessions(),
        state.database(),
    )
    .await?
    .ok_or(ListError::Unauthorized)?;

    let parent_id = match query.parent_id.as_deref() {
        None | Some("") | Some(ROOT_PARENT) => None,
        Some(value) => match Uuid::parse_str(value) {
            Ok(id) => Some(id),
            // A malformed parent references nothing, so the listing under
            // it is empty.
            Err(_) => return Ok(Json(Vec::<DocumentResponse>::new()).into_response()),
        },
    };

    let documents = Document::list(
        parent_id,
        *user.id,
        query.page.unwrap_or(0),
        state.database(),
    )
    .await?;

    let body: Vec<DocumentResponse> = documents.iter().map(DocumentResponse::from).collect();
    Ok(Json(body).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        let status = match self {
            ListError::Unauthorized => StatusCode::UNAUTHORIZED,
            ListError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
