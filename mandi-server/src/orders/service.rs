//! 订单服务
//!
//! 下单与履约推进的业务入口。所有校验在任何写入之前完成，
//! 状态写入走条件更新，并发竞争以 `InvalidTransition` 暴露。

use serde::Deserialize;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::audit_log;
use crate::auth::AuthUser;
use crate::db::models::{Order, OrderLine, OrderListEntry};
use crate::db::repository::{ItemRepository, OrderRepository, SupplierRepository};
use crate::ledger::money;
use crate::orders::FulfillmentStatus;
use crate::utils::{AppError, time, validation};

/// Order creation payload
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    /// Supplier display name, matched case-insensitively
    pub supplier_name: String,
    pub items: Vec<NewOrderLine>,
    pub total_amount: f64,
}

/// One requested order line
#[derive(Debug, Deserialize)]
pub struct NewOrderLine {
    /// Catalog item reference, `item:<id>` form
    pub item_id: String,
    pub quantity: f64,
}

/// Fulfillment advance payload
#[derive(Debug, Deserialize)]
pub struct AdvanceOrderInput {
    pub status: FulfillmentStatus,
}

/// Order business logic over the repositories
pub struct OrderService {
    orders: OrderRepository,
    items: ItemRepository,
    suppliers: SupplierRepository,
}

impl OrderService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            items: ItemRepository::new(db.clone()),
            suppliers: SupplierRepository::new(db),
        }
    }

    /// Create an order on behalf of the authenticated vendor
    ///
    /// Validation order: supplier resolution, line items, total amount.
    /// Nothing is written until every check passed. The stored total is the
    /// client-declared amount, not a recomputation from the lines.
    pub async fn create(
        &self,
        vendor: &AuthUser,
        input: CreateOrderInput,
    ) -> Result<Order, AppError> {
        validation::validate_required_text(
            &input.supplier_name,
            "supplier_name",
            validation::MAX_NAME_LEN,
        )?;
        let supplier = self
            .suppliers
            .find_by_name(&input.supplier_name)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Supplier '{}' not found", input.supplier_name))
            })?;
        let supplier_id = supplier
            .id
            .ok_or_else(|| AppError::Internal("Supplier record missing id".to_string()))?;

        if input.items.is_empty() {
            return Err(AppError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }

        let mut lines = Vec::with_capacity(input.items.len());
        for requested in &input.items {
            money::validate_quantity(requested.quantity)?;

            let item_id = Self::parse_item_id(&requested.item_id)?;
            let item = self
                .items
                .find_by_id(&item_id)
                .await?
                .ok_or_else(|| {
                    AppError::InvalidItem(format!("Unknown item: {}", requested.item_id))
                })?;

            // 行项目快照：名称与单价在下单时刻冗余落盘
            lines.push(OrderLine {
                item: item_id,
                name: item.name,
                quantity: requested.quantity,
                unit_price: item.price_per_unit,
            });
        }

        money::validate_amount(input.total_amount, "total_amount")?;

        let order = self
            .orders
            .create(
                vendor.id.clone(),
                supplier_id,
                lines,
                input.total_amount,
                time::now_millis(),
            )
            .await?;

        audit_log!(
            vendor.id.to_string(),
            "order_created",
            order_id = order.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            supplier = input.supplier_name,
            total_amount = input.total_amount
        );

        Ok(order)
    }

    /// Advance fulfillment one step, supplier side
    pub async fn advance(
        &self,
        supplier: &AuthUser,
        order_id: &str,
        target: FulfillmentStatus,
    ) -> Result<Order, AppError> {
        let id = OrderRepository::parse_id(order_id)?;
        let order = self
            .orders
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        if !supplier.owns(&order) {
            return Err(AppError::Forbidden(
                "Order belongs to a different supplier".to_string(),
            ));
        }

        let current = order.fulfillment_status;
        if !current.can_advance_to(target) {
            return Err(AppError::InvalidTransition(format!(
                "Cannot move from {} to {}",
                current, target
            )));
        }

        // 条件更新：并发写入者抢先时返回 None，按非法迁移处理
        let updated = self
            .orders
            .advance_fulfillment(&id, current, target)
            .await?
            .ok_or_else(|| {
                AppError::InvalidTransition(format!(
                    "Order is no longer in {}, concurrent update won",
                    current
                ))
            })?;

        audit_log!(
            supplier.id.to_string(),
            "order_advanced",
            order_id = order_id,
            from = current.to_string(),
            to = target.to_string()
        );

        Ok(updated)
    }

    /// Cancel a still-pending order, vendor side
    pub async fn cancel(&self, vendor: &AuthUser, order_id: &str) -> Result<Order, AppError> {
        let id = OrderRepository::parse_id(order_id)?;
        let order = self
            .orders
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_id)))?;

        if !vendor.owns(&order) {
            return Err(AppError::Forbidden(
                "Order belongs to a different vendor".to_string(),
            ));
        }

        if !order.fulfillment_status.can_cancel() {
            return Err(AppError::InvalidTransition(format!(
                "Cannot cancel an order in {}",
                order.fulfillment_status
            )));
        }

        let cancelled = self.orders.cancel(&id).await?.ok_or_else(|| {
            AppError::InvalidTransition(
                "Order is no longer pending, concurrent update won".to_string(),
            )
        })?;

        audit_log!(vendor.id.to_string(), "order_cancelled", order_id = order_id);

        Ok(cancelled)
    }

    /// Vendor's own orders, newest first
    pub async fn list_for_vendor(
        &self,
        vendor: &AuthUser,
    ) -> Result<Vec<OrderListEntry>, AppError> {
        let entries = self.orders.list_for_vendor(&vendor.id).await?;
        Ok(entries)
    }

    /// Supplier's incoming orders, newest first
    pub async fn list_for_supplier(
        &self,
        supplier: &AuthUser,
    ) -> Result<Vec<OrderListEntry>, AppError> {
        let entries = self.orders.list_for_supplier(&supplier.id).await?;
        Ok(entries)
    }

    /// Parse an order-line item reference, any failure is `InvalidItem`
    fn parse_item_id(raw: &str) -> Result<RecordId, AppError> {
        let id: RecordId = raw
            .parse()
            .map_err(|_| AppError::InvalidItem(format!("Unknown item: {}", raw)))?;
        if id.table() != "item" {
            return Err(AppError::InvalidItem(format!("Unknown item: {}", raw)));
        }
        Ok(id)
    }
}
