//! Credit Ledger API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::AuthUser;
use crate::core::ServerState;
use crate::ledger::{
    CreditService, CreditSummary, PaymentOutcome, ReceivablesSummary, ReminderAck, ReminderInput,
};
use crate::utils::{AppResponse, AppResult, ok_with_message};

/// Vendor credit summary: dues, recent transactions, trust signals
pub async fn summary(
    State(state): State<ServerState>,
    user: AuthUser,
) -> AppResult<Json<CreditSummary>> {
    let service = CreditService::new(state.get_db(), state.config.credit_policy());
    let summary = service.vendor_credit_summary(&user).await?;
    Ok(Json(summary))
}

/// Settle an order
pub async fn pay(
    State(state): State<ServerState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<PaymentOutcome>> {
    let service = CreditService::new(state.get_db(), state.config.credit_policy());
    let outcome = service.pay(&user, &id).await?;
    Ok(Json(outcome))
}

/// Supplier receivables grouped by vendor
pub async fn receivables(
    State(state): State<ServerState>,
    user: AuthUser,
) -> AppResult<Json<ReceivablesSummary>> {
    let service = CreditService::new(state.get_db(), state.config.credit_policy());
    let summary = service.supplier_receivables(&user).await?;
    Ok(Json(summary))
}

/// Queue a payment reminder
///
/// Delivery is asynchronous; the acknowledgement carries a reference id the
/// caller can correlate with gateway logs.
pub async fn remind(
    State(state): State<ServerState>,
    user: AuthUser,
    Json(payload): Json<ReminderInput>,
) -> AppResult<Json<AppResponse<ReminderAck>>> {
    let service = CreditService::new(state.get_db(), state.config.credit_policy());
    let ack = service
        .send_reminder(&user, payload, state.get_notifier())
        .await?;
    Ok(ok_with_message(ack, "Payment reminder queued"))
}
