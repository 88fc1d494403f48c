//! Credit and receivables ledger integration tests
//! Run: cargo test -p mandi-server --test credit_ledger

use mandi_server::auth::{AuthUser, Role, directory_for};
use mandi_server::db::apply_schema;
use mandi_server::db::models::{Supplier, Vendor};
use mandi_server::db::repository::{OrderRepository, SupplierRepository, VendorRepository};
use mandi_server::ledger::{CreditPolicy, CreditService, ReminderInput};
use mandi_server::orders::PaymentStatus;
use mandi_server::services::ReminderNotifier;
use mandi_server::utils::AppError;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const DAY_MS: i64 = 86_400_000;
const BASE_TS: i64 = 1_700_000_000_000;

fn policy() -> CreditPolicy {
    CreditPolicy {
        trust_score_increment: 10,
        default_trust_score: 500,
        default_credit_limit: 20_000.0,
        payment_due_days: 7,
    }
}

async fn open_db(tmp: &tempfile::TempDir) -> Surreal<Db> {
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("mandi").use_db("market").await.unwrap();
    apply_schema(&db).await.unwrap();
    db
}

async fn seed_vendor(db: &Surreal<Db>, name: &str) -> Vendor {
    VendorRepository::new(db.clone())
        .create(name, "+91-900000001", None, None)
        .await
        .unwrap()
}

async fn seed_supplier(db: &Surreal<Db>, name: &str) -> Supplier {
    SupplierRepository::new(db.clone())
        .create(name, "+91-900000002", None, true)
        .await
        .unwrap()
}

/// Ledger tests drive the repository directly, line items are irrelevant here
async fn seed_order(
    db: &Surreal<Db>,
    vendor: &Vendor,
    supplier: &Supplier,
    amount: f64,
    ordered_at: i64,
) -> RecordId {
    let order = OrderRepository::new(db.clone())
        .create(
            vendor.id.clone().unwrap(),
            supplier.id.clone().unwrap(),
            vec![],
            amount,
            ordered_at,
        )
        .await
        .unwrap();
    order.id.unwrap()
}

async fn set_payment_status(db: &Surreal<Db>, order: &RecordId, status: &str) {
    db.query("UPDATE $order SET payment_status = $status")
        .bind(("order", order.clone()))
        .bind(("status", status.to_string()))
        .await
        .unwrap();
}

async fn set_due_date(db: &Surreal<Db>, order: &RecordId, due_date: i64) {
    db.query("UPDATE $order SET due_date = $due")
        .bind(("order", order.clone()))
        .bind(("due", due_date))
        .await
        .unwrap();
}

fn vendor_auth(vendor: &Vendor) -> AuthUser {
    AuthUser {
        id: vendor.id.clone().unwrap(),
        name: vendor.name.clone(),
        role: Role::Vendor,
    }
}

fn supplier_auth(supplier: &Supplier) -> AuthUser {
    AuthUser {
        id: supplier.id.clone().unwrap(),
        name: supplier.name.clone(),
        role: Role::Supplier,
    }
}

#[tokio::test]
async fn pay_marks_paid_and_bumps_trust() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let vendor = seed_vendor(&db, "Raju Chaat").await;
    let supplier = seed_supplier(&db, "Fresh Farms").await;
    let order = seed_order(&db, &vendor, &supplier, 450.75, BASE_TS).await;
    let service = CreditService::new(db.clone(), policy());

    let outcome = service
        .pay(&vendor_auth(&vendor), &order.to_string())
        .await
        .unwrap();
    assert_eq!(outcome.payment_status, PaymentStatus::Paid);
    assert_eq!(outcome.total_amount, 450.75);
    // First payment: default score plus one increment
    assert_eq!(outcome.trust_score, 510);

    // The pay path gates on ownership only, repeat payments land again
    let again = service
        .pay(&vendor_auth(&vendor), &order.to_string())
        .await
        .unwrap();
    assert_eq!(again.trust_score, 520);

    let stored = VendorRepository::new(db.clone())
        .find_by_id(&vendor.id.clone().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.trust_score, Some(520));
}

#[tokio::test]
async fn pay_hides_foreign_and_missing_orders_alike() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let vendor = seed_vendor(&db, "Raju Chaat").await;
    let other = seed_vendor(&db, "Pinky Dosa").await;
    let supplier = seed_supplier(&db, "Fresh Farms").await;
    let order = seed_order(&db, &vendor, &supplier, 100.0, BASE_TS).await;
    let service = CreditService::new(db.clone(), policy());

    // Someone else's order and a nonexistent order produce the same answer
    let err = service
        .pay(&vendor_auth(&other), &order.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    let err = service
        .pay(&vendor_auth(&vendor), "order:missing")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");

    // Unpaid throughout, no trust was granted
    let stored = VendorRepository::new(db.clone())
        .find_by_id(&other.id.clone().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.trust_score, None);
}

#[tokio::test]
async fn credit_summary_sums_outstanding_and_annotates() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let vendor = seed_vendor(&db, "Raju Chaat").await;
    let supplier = seed_supplier(&db, "Fresh Farms").await;
    let service = CreditService::new(db.clone(), policy());

    let unpaid = seed_order(&db, &vendor, &supplier, 450.75, BASE_TS).await;
    let overdue = seed_order(&db, &vendor, &supplier, 120.50, BASE_TS + 1_000).await;
    let paid = seed_order(&db, &vendor, &supplier, 999.99, BASE_TS + 2_000).await;
    set_payment_status(&db, &overdue, "OVERDUE").await;
    set_payment_status(&db, &paid, "PAID").await;
    set_due_date(&db, &overdue, BASE_TS + 3 * DAY_MS).await;

    let summary = service
        .vendor_credit_summary(&vendor_auth(&vendor))
        .await
        .unwrap();

    // Defaults surface when the profile has no stored score or limit
    assert_eq!(summary.trust_score, 500);
    assert_eq!(summary.credit_limit, 20_000.0);

    // Paid orders never count toward dues; the sum is exact
    assert_eq!(summary.total_due, 571.25);

    assert_eq!(summary.transactions.len(), 3);
    assert_eq!(summary.transactions[0].order_id, paid.to_string());
    assert_eq!(summary.transactions[0].status, "Paid");
    assert_eq!(summary.transactions[1].status, "Overdue");
    assert_eq!(summary.transactions[2].status, "Due");
    assert_eq!(summary.transactions[0].supplier, "Fresh Farms");

    // Stored due date wins, otherwise the policy offset applies
    assert_eq!(summary.transactions[1].due_date, BASE_TS + 3 * DAY_MS);
    assert_eq!(summary.transactions[2].due_date, BASE_TS + 7 * DAY_MS);
    assert_eq!(
        summary.transactions[0].due_date,
        BASE_TS + 2_000 + 7 * DAY_MS
    );
}

#[tokio::test]
async fn credit_summary_requires_a_profile() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let service = CreditService::new(db.clone(), policy());

    let ghost = AuthUser {
        id: "vendor:ghost".parse::<RecordId>().unwrap(),
        name: "Ghost".to_string(),
        role: Role::Vendor,
    };
    let err = service.vendor_credit_summary(&ghost).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn receivables_group_per_vendor() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let raju = seed_vendor(&db, "Raju Chaat").await;
    let pinky = seed_vendor(&db, "Pinky Dosa").await;
    let supplier = seed_supplier(&db, "Fresh Farms").await;
    let service = CreditService::new(db.clone(), policy());

    // Raju: 450.75 unpaid + 120.50 overdue. Pinky: 200.00 unpaid + one paid.
    seed_order(&db, &raju, &supplier, 450.75, BASE_TS).await;
    let overdue = seed_order(&db, &raju, &supplier, 120.50, BASE_TS + 1_000).await;
    set_payment_status(&db, &overdue, "OVERDUE").await;
    seed_order(&db, &pinky, &supplier, 200.0, BASE_TS + 2_000).await;
    let settled = seed_order(&db, &pinky, &supplier, 5_000.0, BASE_TS + 3_000).await;
    set_payment_status(&db, &settled, "PAID").await;

    let summary = service
        .supplier_receivables(&supplier_auth(&supplier))
        .await
        .unwrap();

    assert_eq!(summary.total_receivables, 771.25);
    assert_eq!(summary.active_vendors, 2);
    assert_eq!(summary.receivables.len(), 2);

    // Largest debtor first
    let first = &summary.receivables[0];
    assert_eq!(first.vendor_name, "Raju Chaat");
    assert_eq!(first.amount_due, 571.25);
    assert_eq!(first.order_count, 2);
    // One overdue order flags the whole group
    assert_eq!(first.status, "Overdue");

    let second = &summary.receivables[1];
    assert_eq!(second.vendor_name, "Pinky Dosa");
    assert_eq!(second.amount_due, 200.0);
    assert_eq!(second.order_count, 1);
    assert_eq!(second.status, "Due");
}

#[tokio::test]
async fn receivables_empty_for_fresh_supplier() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let supplier = seed_supplier(&db, "Fresh Farms").await;
    let service = CreditService::new(db.clone(), policy());

    let summary = service
        .supplier_receivables(&supplier_auth(&supplier))
        .await
        .unwrap();
    assert_eq!(summary.total_receivables, 0.0);
    assert_eq!(summary.active_vendors, 0);
    assert!(summary.receivables.is_empty());
}

#[tokio::test]
async fn reminders_resolve_vendor_and_order_targets() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let vendor = seed_vendor(&db, "Raju Chaat").await;
    let supplier = seed_supplier(&db, "Fresh Farms").await;
    let service = CreditService::new(db.clone(), policy());
    // No URL configured: reminders are logged, never sent
    let notifier = ReminderNotifier::new(None);

    let order = seed_order(&db, &vendor, &supplier, 450.75, BASE_TS).await;
    seed_order(&db, &vendor, &supplier, 120.50, BASE_TS + 1_000).await;

    let ack = service
        .send_reminder(
            &supplier_auth(&supplier),
            ReminderInput {
                vendor_id: Some(vendor.id.clone().unwrap().to_string()),
                order_id: None,
            },
            &notifier,
        )
        .await
        .unwrap();
    assert_eq!(ack.vendor_name, "Raju Chaat");
    assert_eq!(ack.amount_due, 571.25);
    assert!(!ack.reference.is_empty());

    // The order form resolves to the same vendor
    let ack = service
        .send_reminder(
            &supplier_auth(&supplier),
            ReminderInput {
                vendor_id: None,
                order_id: Some(order.to_string()),
            },
            &notifier,
        )
        .await
        .unwrap();
    assert_eq!(ack.vendor_id, vendor.id.clone().unwrap().to_string());
}

#[tokio::test]
async fn reminders_validate_their_target() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let vendor = seed_vendor(&db, "Raju Chaat").await;
    let supplier = seed_supplier(&db, "Fresh Farms").await;
    let rival = seed_supplier(&db, "Mandi Traders").await;
    let service = CreditService::new(db.clone(), policy());
    let notifier = ReminderNotifier::new(None);

    let order = seed_order(&db, &vendor, &supplier, 100.0, BASE_TS).await;

    // Missing both references
    let err = service
        .send_reminder(
            &supplier_auth(&supplier),
            ReminderInput {
                vendor_id: None,
                order_id: None,
            },
            &notifier,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // Another supplier's order
    let err = service
        .send_reminder(
            &supplier_auth(&rival),
            ReminderInput {
                vendor_id: None,
                order_id: Some(order.to_string()),
            },
            &notifier,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");

    // A vendor that does not exist
    let err = service
        .send_reminder(
            &supplier_auth(&supplier),
            ReminderInput {
                vendor_id: Some("vendor:ghost".to_string()),
                order_id: None,
            },
            &notifier,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn directories_resolve_contacts_per_role() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let vendor = seed_vendor(&db, "Raju Chaat").await;
    let supplier = seed_supplier(&db, "Fresh Farms").await;

    let vendors = directory_for(Role::Vendor, db.clone());
    assert_eq!(vendors.role(), Role::Vendor);
    let hit = vendors
        .find_contact(vendor.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.name, "Raju Chaat");
    assert_eq!(hit.contact, "+91-900000001");

    let suppliers = directory_for(Role::Supplier, db.clone());
    assert_eq!(suppliers.role(), Role::Supplier);
    let hit = suppliers
        .find_contact(supplier.id.as_ref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.name, "Fresh Farms");

    let ghost: RecordId = "vendor:ghost".parse().unwrap();
    assert!(vendors.find_contact(&ghost).await.unwrap().is_none());
}
