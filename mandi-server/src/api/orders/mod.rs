//! Order API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Role, require_role};
use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    // 采购方路由：下单、自己的订单、取消
    let vendor_routes = Router::new()
        .route("/", post(handler::create))
        .route("/vendor", get(handler::list_vendor_orders))
        .route("/{id}/cancel", post(handler::cancel))
        .layer(middleware::from_fn(require_role(Role::Vendor)));

    // 供应方路由：到货订单、履约推进
    let supplier_routes = Router::new()
        .route("/supplier", get(handler::list_supplier_orders))
        .route("/{id}/status", post(handler::advance))
        .layer(middleware::from_fn(require_role(Role::Supplier)));

    vendor_routes.merge(supplier_routes)
}
