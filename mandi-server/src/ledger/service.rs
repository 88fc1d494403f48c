//! 账款服务
//!
//! 采购方应付与供应方应收的读取、还款以及付款提醒。
//! 金额汇总一律走 Decimal，分组与排序在内存中完成。

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use uuid::Uuid;

use crate::audit_log;
use crate::auth::{ActorDirectory, AuthUser, Role, directory_for};
use crate::db::repository::{OrderRepository, VendorRepository};
use crate::ledger::money;
use crate::orders::PaymentStatus;
use crate::services::{ReminderMessage, ReminderNotifier};
use crate::utils::AppError;

/// Transactions shown in the credit summary
const RECENT_TRANSACTIONS: usize = 10;

/// Ledger constants sourced from configuration
#[derive(Debug, Clone, Copy)]
pub struct CreditPolicy {
    /// Trust points granted per successful payment
    pub trust_score_increment: i64,
    /// Starting score for vendors without a stored one
    pub default_trust_score: i64,
    /// Credit limit surfaced when the vendor has none stored
    pub default_credit_limit: f64,
    /// Days until an order without a stored due date counts as due
    pub payment_due_days: i64,
}

/// Reminder request: exactly one of the two references
#[derive(Debug, Deserialize)]
pub struct ReminderInput {
    pub vendor_id: Option<String>,
    pub order_id: Option<String>,
}

/// Vendor-facing credit summary
#[derive(Debug, Serialize)]
pub struct CreditSummary {
    pub trust_score: i64,
    pub credit_limit: f64,
    /// Decimal sum over all outstanding orders, not just the listed ones
    pub total_due: f64,
    pub transactions: Vec<TransactionEntry>,
}

/// One recent order annotated for ledger display
#[derive(Debug, Serialize)]
pub struct TransactionEntry {
    pub order_id: String,
    pub supplier: String,
    pub total_amount: f64,
    /// Display form: "Due" / "Paid" / "Overdue"
    pub status: String,
    /// Stored due date or the configured default offset from `ordered_at`
    pub due_date: i64,
    pub ordered_at: i64,
}

/// Supplier-facing receivables summary
#[derive(Debug, Serialize)]
pub struct ReceivablesSummary {
    pub total_receivables: f64,
    pub active_vendors: i64,
    pub receivables: Vec<VendorReceivable>,
}

/// Outstanding amounts of one vendor, grouped
#[derive(Debug, Serialize)]
pub struct VendorReceivable {
    pub vendor_id: String,
    pub vendor_name: String,
    pub amount_due: f64,
    pub order_count: i64,
    /// "Overdue" as soon as any order in the group is overdue
    pub status: String,
}

/// Payment result returned to the vendor
#[derive(Debug, Serialize)]
pub struct PaymentOutcome {
    pub order_id: String,
    pub payment_status: PaymentStatus,
    pub total_amount: f64,
    /// Trust score after the payment increment
    pub trust_score: i64,
}

/// Reminder acknowledgement, returned regardless of delivery outcome
#[derive(Debug, Serialize)]
pub struct ReminderAck {
    pub reference: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub amount_due: f64,
}

/// Credit ledger business logic
pub struct CreditService {
    orders: OrderRepository,
    vendors: VendorRepository,
    /// Reminders always address the debtor side of the ledger, the vendor
    debtors: Box<dyn ActorDirectory>,
    policy: CreditPolicy,
}

impl CreditService {
    pub fn new(db: Surreal<Db>, policy: CreditPolicy) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            vendors: VendorRepository::new(db.clone()),
            debtors: directory_for(Role::Vendor, db),
            policy,
        }
    }

    /// Credit summary for the authenticated vendor
    ///
    /// `total_due` covers every outstanding order; `transactions` lists the
    /// most recent orders of any payment status.
    pub async fn vendor_credit_summary(
        &self,
        vendor: &AuthUser,
    ) -> Result<CreditSummary, AppError> {
        let profile = self
            .vendors
            .find_by_id(&vendor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vendor profile not found".to_string()))?;

        let entries = self.orders.list_for_vendor(&vendor.id).await?;

        let total_due = money::sum_amounts(
            entries
                .iter()
                .filter(|e| e.payment_status.is_outstanding())
                .map(|e| e.total_amount),
        );

        let transactions = entries
            .iter()
            .take(RECENT_TRANSACTIONS)
            .map(|e| TransactionEntry {
                order_id: e.order_id.clone(),
                supplier: e.counterparty.clone(),
                total_amount: e.total_amount,
                status: money::display_status(e.payment_status).to_string(),
                due_date: money::effective_due_date(
                    e.due_date,
                    e.ordered_at,
                    self.policy.payment_due_days,
                ),
                ordered_at: e.ordered_at,
            })
            .collect();

        Ok(CreditSummary {
            trust_score: profile.trust_score.unwrap_or(self.policy.default_trust_score),
            credit_limit: profile
                .credit_limit
                .unwrap_or(self.policy.default_credit_limit),
            total_due,
            transactions,
        })
    }

    /// Settle an order and grant the payment trust increment
    ///
    /// Ownership is the only precondition. A missing order and someone
    /// else's order answer identically so the endpoint leaks nothing about
    /// foreign order ids.
    pub async fn pay(&self, vendor: &AuthUser, order_id: &str) -> Result<PaymentOutcome, AppError> {
        let id = OrderRepository::parse_id(order_id)?;
        match self.orders.find_by_id(&id).await? {
            Some(order) if vendor.owns(&order) => {}
            _ => return Err(AppError::NotFound(format!("Order {} not found", order_id))),
        }

        let paid = self.orders.mark_paid(&id).await?;
        let trust_score = self
            .vendors
            .add_trust_points(
                &vendor.id,
                self.policy.trust_score_increment,
                self.policy.default_trust_score,
            )
            .await?;

        audit_log!(
            vendor.id.to_string(),
            "payment_recorded",
            order_id = order_id,
            amount = paid.total_amount,
            trust_score = trust_score
        );

        Ok(PaymentOutcome {
            order_id: id.to_string(),
            payment_status: paid.payment_status,
            total_amount: paid.total_amount,
            trust_score,
        })
    }

    /// Receivables grouped by vendor for the authenticated supplier
    pub async fn supplier_receivables(
        &self,
        supplier: &AuthUser,
    ) -> Result<ReceivablesSummary, AppError> {
        let entries = self.orders.list_outstanding_for_supplier(&supplier.id).await?;

        struct Group {
            vendor_name: String,
            sum: Decimal,
            order_count: i64,
            any_overdue: bool,
        }

        let mut groups: HashMap<String, Group> = HashMap::new();
        for entry in &entries {
            let group = groups.entry(entry.vendor_id.clone()).or_insert_with(|| Group {
                vendor_name: entry.counterparty.clone(),
                sum: Decimal::ZERO,
                order_count: 0,
                any_overdue: false,
            });
            group.sum += money::to_decimal(entry.total_amount);
            group.order_count += 1;
            if entry.payment_status == PaymentStatus::Overdue {
                group.any_overdue = true;
            }
        }

        let mut receivables: Vec<VendorReceivable> = groups
            .into_iter()
            .map(|(vendor_id, group)| VendorReceivable {
                vendor_id,
                vendor_name: group.vendor_name,
                amount_due: money::to_f64(group.sum),
                order_count: group.order_count,
                status: if group.any_overdue { "Overdue" } else { "Due" }.to_string(),
            })
            .collect();
        receivables.sort_by(|a, b| b.amount_due.total_cmp(&a.amount_due));

        Ok(ReceivablesSummary {
            total_receivables: money::sum_amounts(entries.iter().map(|e| e.total_amount)),
            active_vendors: receivables.len() as i64,
            receivables,
        })
    }

    /// Send a payment reminder and acknowledge with a reference id
    ///
    /// The target vendor comes from an explicit `vendor_id` or from an order
    /// the supplier owns. Delivery runs in the background; the ack does not
    /// wait for it.
    pub async fn send_reminder(
        &self,
        supplier: &AuthUser,
        input: ReminderInput,
        notifier: &ReminderNotifier,
    ) -> Result<ReminderAck, AppError> {
        let vendor_id = self.resolve_reminder_target(supplier, &input).await?;

        let debtor = self
            .debtors
            .find_contact(&vendor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vendor {} not found", vendor_id)))?;

        let outstanding = self.orders.list_outstanding_for_supplier(&supplier.id).await?;
        let vendor_key = vendor_id.to_string();
        let amount_due = money::sum_amounts(
            outstanding
                .iter()
                .filter(|e| e.vendor_id == vendor_key)
                .map(|e| e.total_amount),
        );

        let reference = Uuid::new_v4().to_string();
        notifier.send_payment_reminder(ReminderMessage {
            reference: reference.clone(),
            vendor_name: debtor.name.clone(),
            contact: debtor.contact,
            supplier_name: supplier.name.clone(),
            amount_due,
        });

        Ok(ReminderAck {
            reference,
            vendor_id: vendor_key,
            vendor_name: debtor.name,
            amount_due,
        })
    }

    async fn resolve_reminder_target(
        &self,
        supplier: &AuthUser,
        input: &ReminderInput,
    ) -> Result<RecordId, AppError> {
        if let Some(order_ref) = input.order_id.as_deref() {
            let id = OrderRepository::parse_id(order_ref)?;
            let order = self
                .orders
                .find_by_id(&id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Order {} not found", order_ref)))?;
            if !supplier.owns(&order) {
                return Err(AppError::Forbidden(
                    "Order belongs to a different supplier".to_string(),
                ));
            }
            return Ok(order.vendor);
        }

        if let Some(raw) = input.vendor_id.as_deref() {
            let id: RecordId = raw
                .parse()
                .map_err(|_| AppError::Validation(format!("Invalid vendor reference: {}", raw)))?;
            if id.table() != "vendor" {
                return Err(AppError::Validation(format!(
                    "Invalid vendor reference: {}",
                    raw
                )));
            }
            return Ok(id);
        }

        Err(AppError::Validation(
            "Either vendor_id or order_id is required".to_string(),
        ))
    }
}
