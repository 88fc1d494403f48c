//! Credit Ledger API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::{Role, require_role};
use crate::core::ServerState;

/// Credit ledger router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/credit", routes())
}

fn routes() -> Router<ServerState> {
    // 采购方路由：信用摘要、还款
    let vendor_routes = Router::new()
        .route("/summary", get(handler::summary))
        .route("/orders/{id}/pay", post(handler::pay))
        .layer(middleware::from_fn(require_role(Role::Vendor)));

    // 供应方路由：应收汇总、付款提醒
    let supplier_routes = Router::new()
        .route("/receivables", get(handler::receivables))
        .route("/remind", post(handler::remind))
        .layer(middleware::from_fn(require_role(Role::Supplier)));

    vendor_routes.merge(supplier_routes)
}
