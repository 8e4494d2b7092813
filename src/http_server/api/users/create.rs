use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::database::models::User;
use crate::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateUserResponse {
    pub id: String,
    pub email: String,
}

/// Register a new account.
pub async fn handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, CreateUserError> {
    let email = request
        .email
        .as_deref()
        .filter(|email| !email.is_empty())
        .ok_or(CreateUserError::MissingEmail)?;
    let password = request
        .password
        .as_deref()
        .filter(|password| !password.is_empty())
        .ok_or(CreateUserError::MissingPassword)?;

    if User::email_taken(email, state.database()).await? {
        return Err(CreateUserError::AlreadyExists);
    }

    let user = User::create(email, password, state.database()).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            id: user.id.to_string(),
            email: user.email,
        }),
    ))
}

#[derive(Debug, thiserror::Error)]
pub enum CreateUserError {
    #[error("Missing email")]
    MissingEmail,

    #[error("Missing password")]
    MissingPassword,

    #[error("Already exist")]
    AlreadyExists,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for CreateUserError {
    fn into_response(self) -> Response {
        let status = match self {
            CreateUserError::MissingEmail
            | CreateUserError::MissingPassword
            | CreateUserError::AlreadyExists => StatusCode::BAD_REQUEST,
            CreateUserError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
