use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::User;
use crate::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct ConnectResponse {
    pub token: String,
}

/// Exchange Basic credentials for an opaque session token.
pub async fn handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ConnectError> {
    let (email, password) = parse_basic_auth(&headers).ok_or(ConnectError::Unauthorized)?;

    let user = User::find_by_credentials(&email, &password, state.database())
        .await?
        .ok_or(ConnectError::Unauthorized)?;

    let token = Uuid::new_v4().to_string();
    state
        .sessions()
        .put(&token, *user.id, state.session_ttl());

    Ok(Json(ConnectResponse { token }))
}

fn parse_basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = String::from_utf8(BASE64.decode(encoded).ok()?).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ConnectError {
    fn into_response(self) -> Response {
        let status = match self {
            ConnectError::Unauthorized => StatusCode::UNAUTHORIZED,
            ConnectError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
