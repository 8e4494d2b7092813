use axum::http::HeaderMap;
use axum::routing::{get, post, put};
use axum::Router;

pub mod auth;
pub mod files;
pub mod users;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/connect", get(auth::connect::handler))
        .route("/disconnect", get(auth::disconnect::handler))
        .route("/users", post(users::create::handler))
        .route("/users/me", get(users::me::handler))
        .route(
            "/files",
            post(files::upload::handler).get(files::list::handler),
        )
        .route("/files/:id", get(files::show::handler))
        .route("/files/:id/publish", put(files::publish::publish))
        .route("/files/:id/unpublish", put(files::publish::unpublish))
        .route("/files/:id/data", get(files::content::handler))
}

/// Opaque session token carried on every authenticated request.
pub(crate) fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers.get("x-token").and_then(|value| value.to_str().ok())
}
