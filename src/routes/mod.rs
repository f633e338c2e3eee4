pub mod submissions;

use axum::routing::{get, put};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/submissions", put(submissions::upsert))
        .route("/api/submissions/{match_key}", get(submissions::get))
}
