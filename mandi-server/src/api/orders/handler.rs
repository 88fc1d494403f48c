//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::AuthUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderListEntry};
use crate::orders::{AdvanceOrderInput, CreateOrderInput, OrderService};
use crate::utils::AppResult;

/// Create a new order
pub async fn create(
    State(state): State<ServerState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderInput>,
) -> AppResult<Json<Order>> {
    let service = OrderService::new(state.get_db());
    let order = service.create(&user, payload).await?;
    Ok(Json(order))
}

/// List the vendor's own orders, newest first
pub async fn list_vendor_orders(
    State(state): State<ServerState>,
    user: AuthUser,
) -> AppResult<Json<Vec<OrderListEntry>>> {
    let service = OrderService::new(state.get_db());
    let orders = service.list_for_vendor(&user).await?;
    Ok(Json(orders))
}

/// Cancel a still-pending order
pub async fn cancel(
    State(state): State<ServerState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let service = OrderService::new(state.get_db());
    let order = service.cancel(&user, &id).await?;
    Ok(Json(order))
}

/// List the supplier's incoming orders, newest first
pub async fn list_supplier_orders(
    State(state): State<ServerState>,
    user: AuthUser,
) -> AppResult<Json<Vec<OrderListEntry>>> {
    let service = OrderService::new(state.get_db());
    let orders = service.list_for_supplier(&user).await?;
    Ok(Json(orders))
}

/// Advance fulfillment one step
pub async fn advance(
    State(state): State<ServerState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<AdvanceOrderInput>,
) -> AppResult<Json<Order>> {
    let service = OrderService::new(state.get_db());
    let order = service.advance(&user, &id, payload.status).await?;
    Ok(Json(order))
}
