//! Order Model
//!
//! 订单记录：买卖双方引用 + 下单时落盘的行项目快照。
//! 行项目的名称与单价在创建时冗余写入，之后目录变价不影响历史订单。

use super::serde_helpers;
use crate::orders::{FulfillmentStatus, PaymentStatus};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order line item, denormalized at creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(with = "serde_helpers::record_id")]
    pub item: RecordId,
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Order entity
///
/// `vendor`, `supplier`, `items`, `total_amount` and `ordered_at` are
/// immutable after creation. Only the two status axes and nothing else
/// may change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub vendor: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub supplier: RecordId,
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
    pub fulfillment_status: FulfillmentStatus,
    pub payment_status: PaymentStatus,
    /// Unix millis
    pub ordered_at: i64,
    /// Unix millis; None means consumers derive `ordered_at + due days`
    pub due_date: Option<i64>,
}

/// Order list row with party ids cast to strings and the counterparty
/// display name resolved in-query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListEntry {
    pub order_id: String,
    pub vendor_id: String,
    pub supplier_id: String,
    /// Display name of the other party (supplier for vendor lists, vendor
    /// for supplier lists)
    pub counterparty: String,
    pub items: Vec<OrderLine>,
    pub total_amount: f64,
    pub fulfillment_status: FulfillmentStatus,
    pub payment_status: PaymentStatus,
    pub ordered_at: i64,
    pub due_date: Option<i64>,
}
