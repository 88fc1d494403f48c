//! Order Repository
//!
//! 履约/付款两条状态轴的写入都走条件更新：
//! `UPDATE ... WHERE fulfillment_status = $expected` 在并发竞争下只允许
//! 一个写者成功，落败方拿到空结果而不是二次迁移。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderLine, OrderListEntry};
use crate::orders::{FulfillmentStatus, PaymentStatus};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const TABLE: &str = "order";

/// Write-shaped order payload
///
/// Record links are kept as plain `RecordId` so the SDK stores real record
/// references (the read model serializes them as "table:id" strings for
/// API output instead).
#[derive(Serialize)]
struct OrderCreateDb {
    vendor: RecordId,
    supplier: RecordId,
    items: Vec<OrderLineDb>,
    total_amount: f64,
    fulfillment_status: FulfillmentStatus,
    payment_status: PaymentStatus,
    ordered_at: i64,
    due_date: Option<i64>,
}

#[derive(Serialize)]
struct OrderLineDb {
    item: RecordId,
    name: String,
    quantity: f64,
    unit_price: f64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Parse a "table:id" string into an order record id
    pub fn parse_id(order_id: &str) -> RepoResult<RecordId> {
        let record_id: RecordId = order_id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid order ID format: {}", order_id)))?;
        if record_id.table() != TABLE {
            return Err(RepoError::NotFound(format!(
                "Invalid order ID format: {}",
                order_id
            )));
        }
        Ok(record_id)
    }

    /// Find order by record id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select(id.clone()).await?;
        Ok(order)
    }

    /// Persist a new order in `PENDING` / `UNPAID`
    pub async fn create(
        &self,
        vendor: RecordId,
        supplier: RecordId,
        items: Vec<OrderLine>,
        total_amount: f64,
        ordered_at: i64,
    ) -> RepoResult<Order> {
        let lines = items
            .into_iter()
            .map(|line| OrderLineDb {
                item: line.item,
                name: line.name,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect();

        let created: Option<Order> = self
            .base
            .db()
            .create(TABLE)
            .content(OrderCreateDb {
                vendor,
                supplier,
                items: lines,
                total_amount,
                fulfillment_status: FulfillmentStatus::Pending,
                payment_status: PaymentStatus::Unpaid,
                ordered_at,
                due_date: None,
            })
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Conditionally advance fulfillment from `current` to `next`
    ///
    /// Returns `None` when the stored status no longer matches `current`,
    /// i.e. a concurrent writer got there first.
    pub async fn advance_fulfillment(
        &self,
        id: &RecordId,
        current: FulfillmentStatus,
        next: FulfillmentStatus,
    ) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order SET fulfillment_status = $next \
                 WHERE fulfillment_status = $current RETURN AFTER",
            )
            .bind(("order", id.clone()))
            .bind(("next", next.as_str()))
            .bind(("current", current.as_str()))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Conditionally cancel an order still in `PENDING`
    pub async fn cancel(&self, id: &RecordId) -> RepoResult<Option<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $order SET fulfillment_status = $cancelled \
                 WHERE fulfillment_status = $pending RETURN AFTER",
            )
            .bind(("order", id.clone()))
            .bind(("cancelled", FulfillmentStatus::Cancelled.as_str()))
            .bind(("pending", FulfillmentStatus::Pending.as_str()))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        Ok(updated.into_iter().next())
    }

    /// Mark an order paid
    ///
    /// Deliberately unconditional: ownership is the only gate on the pay
    /// path, so paying an already paid or cancelled order succeeds again.
    pub async fn mark_paid(&self, id: &RecordId) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $order SET payment_status = $paid RETURN AFTER")
            .bind(("order", id.clone()))
            .bind(("paid", PaymentStatus::Paid.as_str()))
            .await?;
        let updated: Vec<Order> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// All orders placed by a vendor, newest first
    pub async fn list_for_vendor(&self, vendor: &RecordId) -> RepoResult<Vec<OrderListEntry>> {
        let entries: Vec<OrderListEntry> = self
            .base
            .db()
            .query(
                "SELECT \
                     <string>id AS order_id, \
                     <string>vendor AS vendor_id, \
                     <string>supplier AS supplier_id, \
                     supplier.name AS counterparty, \
                     items, \
                     total_amount, \
                     fulfillment_status, \
                     payment_status, \
                     ordered_at, \
                     due_date \
                 FROM order WHERE vendor = $vendor ORDER BY ordered_at DESC",
            )
            .bind(("vendor", vendor.clone()))
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// All orders received by a supplier, newest first
    pub async fn list_for_supplier(&self, supplier: &RecordId) -> RepoResult<Vec<OrderListEntry>> {
        let entries: Vec<OrderListEntry> = self
            .base
            .db()
            .query(
                "SELECT \
                     <string>id AS order_id, \
                     <string>vendor AS vendor_id, \
                     <string>supplier AS supplier_id, \
                     vendor.name AS counterparty, \
                     items, \
                     total_amount, \
                     fulfillment_status, \
                     payment_status, \
                     ordered_at, \
                     due_date \
                 FROM order WHERE supplier = $supplier ORDER BY ordered_at DESC",
            )
            .bind(("supplier", supplier.clone()))
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// Unpaid and overdue orders received by a supplier, newest first
    ///
    /// Feeds the receivables rollup; grouping per vendor happens in the
    /// ledger with decimal arithmetic.
    pub async fn list_outstanding_for_supplier(
        &self,
        supplier: &RecordId,
    ) -> RepoResult<Vec<OrderListEntry>> {
        let entries: Vec<OrderListEntry> = self
            .base
            .db()
            .query(
                "SELECT \
                     <string>id AS order_id, \
                     <string>vendor AS vendor_id, \
                     <string>supplier AS supplier_id, \
                     vendor.name AS counterparty, \
                     items, \
                     total_amount, \
                     fulfillment_status, \
                     payment_status, \
                     ordered_at, \
                     due_date \
                 FROM order \
                 WHERE supplier = $supplier AND payment_status IN $outstanding \
                 ORDER BY ordered_at DESC",
            )
            .bind(("supplier", supplier.clone()))
            .bind((
                "outstanding",
                vec![
                    PaymentStatus::Unpaid.as_str(),
                    PaymentStatus::Overdue.as_str(),
                ],
            ))
            .await?
            .take(0)?;
        Ok(entries)
    }
}
