use axum::routing::get;
use axum::Router;

mod stats;
mod status;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status::handler))
        .route("/stats", get(stats::handler))
}
