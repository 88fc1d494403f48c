//! Review API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Role, require_role};
use crate::core::ServerState;

/// Review router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reviews", routes())
}

fn routes() -> Router<ServerState> {
    // 读取路由：对外公开浏览
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/supplier/{id}", get(handler::list_by_supplier));

    // 写入路由：仅采购方
    let write_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_role(Role::Vendor)));

    read_routes.merge(write_routes)
}
