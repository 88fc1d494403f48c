//! Statistics API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Statistics router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stats", routes())
}

fn routes() -> Router<ServerState> {
    // 平台统计对外公开，无须认证
    Router::new()
        .route("/", get(handler::platform))
        .route("/leaderboard", get(handler::leaderboard))
}
