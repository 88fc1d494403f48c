//! Order lifecycle integration tests
//! Run: cargo test -p mandi-server --test order_lifecycle

use mandi_server::auth::{AuthUser, Role};
use mandi_server::db::apply_schema;
use mandi_server::db::models::{Supplier, Vendor};
use mandi_server::db::repository::{ItemRepository, SupplierRepository, VendorRepository};
use mandi_server::orders::{
    AdvanceOrderInput, CreateOrderInput, FulfillmentStatus, NewOrderLine, OrderService,
    PaymentStatus,
};
use mandi_server::utils::AppError;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

async fn open_db(tmp: &tempfile::TempDir) -> Surreal<Db> {
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("mandi").use_db("market").await.unwrap();
    apply_schema(&db).await.unwrap();
    db
}

struct Seed {
    vendor: Vendor,
    supplier: Supplier,
    item_id: String,
}

/// One vendor, one supplier ("Fresh Farms") with a single catalog item
async fn seed(db: &Surreal<Db>) -> Seed {
    let vendor = VendorRepository::new(db.clone())
        .create("Raju Chaat", "+91-900000001", None, Some("chaat".to_string()))
        .await
        .unwrap();
    let supplier = SupplierRepository::new(db.clone())
        .create("Fresh Farms", "+91-900000002", None, true)
        .await
        .unwrap();
    let item = ItemRepository::new(db.clone())
        .create(
            "Onions",
            "kg",
            24.5,
            supplier.id.clone().unwrap(),
        )
        .await
        .unwrap();
    Seed {
        vendor,
        supplier,
        item_id: item.id.unwrap().to_string(),
    }
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

fn order_input(seed: &Seed) -> CreateOrderInput {
    CreateOrderInput {
        supplier_name: "fresh farms".to_string(),
        items: vec![NewOrderLine {
            item_id: seed.item_id.clone(),
            quantity: 10.0,
        }],
        total_amount: 245.0,
    }
}

#[tokio::test]
async fn create_starts_pending_and_snapshots_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let service = OrderService::new(db.clone());

    // Supplier name resolution is case-insensitive
    let order = service
        .create(&vendor_auth(&seed.vendor), order_input(&seed))
        .await
        .unwrap();

    assert_eq!(order.fulfillment_status, FulfillmentStatus::Pending);
    assert_eq!(order.payment_status, PaymentStatus::Unpaid);
    assert_eq!(order.total_amount, 245.0);
    assert_eq!(order.due_date, None);
    assert_eq!(order.vendor, seed.vendor.id.clone().unwrap());
    assert_eq!(order.supplier, seed.supplier.id.clone().unwrap());

    // Line snapshot carries the catalog name and unit price at order time
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].name, "Onions");
    assert_eq!(order.items[0].unit_price, 24.5);
    assert_eq!(order.items[0].quantity, 10.0);
}

#[tokio::test]
async fn create_rejects_unknown_supplier() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let service = OrderService::new(db.clone());

    let mut input = order_input(&seed);
    input.supplier_name = "Nobody Farms".to_string();

    let err = service
        .create(&vendor_auth(&seed.vendor), input)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn create_rejects_unknown_item_and_empty_lines() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let service = OrderService::new(db.clone());

    let mut input = order_input(&seed);
    input.items[0].item_id = "item:doesnotexist".to_string();
    let err = service
        .create(&vendor_auth(&seed.vendor), input)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidItem(_)), "got {err:?}");

    let mut input = order_input(&seed);
    input.items.clear();
    let err = service
        .create(&vendor_auth(&seed.vendor), input)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn advance_walks_the_full_chain() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let service = OrderService::new(db.clone());
    let supplier = supplier_auth(&seed.supplier);

    let order = service
        .create(&vendor_auth(&seed.vendor), order_input(&seed))
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();

    let chain = [
        FulfillmentStatus::Packed,
        FulfillmentStatus::Shipped,
        FulfillmentStatus::OutForDelivery,
        FulfillmentStatus::Delivered,
    ];
    for target in chain {
        let updated = service.advance(&supplier, &order_id, target).await.unwrap();
        assert_eq!(updated.fulfillment_status, target);
    }

    // DELIVERED is terminal
    let err = service
        .advance(&supplier, &order_id, FulfillmentStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "got {err:?}");
}

#[tokio::test]
async fn advance_rejects_skipped_steps() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let service = OrderService::new(db.clone());

    let order = service
        .create(&vendor_auth(&seed.vendor), order_input(&seed))
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();

    let err = service
        .advance(
            &supplier_auth(&seed.supplier),
            &order_id,
            FulfillmentStatus::Shipped,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "got {err:?}");

    // Moving backwards is just as illegal
    let err = service
        .advance(
            &supplier_auth(&seed.supplier),
            &order_id,
            FulfillmentStatus::Pending,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "got {err:?}");
}

#[tokio::test]
async fn advance_checks_supplier_ownership() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let service = OrderService::new(db.clone());

    let other = SupplierRepository::new(db.clone())
        .create("Mandi Traders", "+91-900000003", None, true)
        .await
        .unwrap();

    let order = service
        .create(&vendor_auth(&seed.vendor), order_input(&seed))
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();

    let err = service
        .advance(
            &supplier_auth(&other),
            &order_id,
            FulfillmentStatus::Packed,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");

    let err = service
        .advance(
            &supplier_auth(&seed.supplier),
            "order:missing",
            FulfillmentStatus::Packed,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn cancel_is_pending_only_and_vendor_owned() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let service = OrderService::new(db.clone());
    let vendor = vendor_auth(&seed.vendor);

    let order = service.create(&vendor, order_input(&seed)).await.unwrap();
    let order_id = order.id.unwrap().to_string();

    let cancelled = service.cancel(&vendor, &order_id).await.unwrap();
    assert_eq!(cancelled.fulfillment_status, FulfillmentStatus::Cancelled);

    // CANCELLED is terminal for fulfillment too
    let err = service
        .advance(
            &supplier_auth(&seed.supplier),
            &order_id,
            FulfillmentStatus::Packed,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "got {err:?}");

    // Once packed, cancellation closes
    let packed = service.create(&vendor, order_input(&seed)).await.unwrap();
    let packed_id = packed.id.unwrap().to_string();
    service
        .advance(
            &supplier_auth(&seed.supplier),
            &packed_id,
            FulfillmentStatus::Packed,
        )
        .await
        .unwrap();
    let err = service.cancel(&vendor, &packed_id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "got {err:?}");

    // A different vendor cannot cancel at all
    let other = VendorRepository::new(db.clone())
        .create("Pinky Dosa", "+91-900000004", None, None)
        .await
        .unwrap();
    let open = service.create(&vendor, order_input(&seed)).await.unwrap();
    let open_id = open.id.unwrap().to_string();
    let err = service
        .cancel(&vendor_auth(&other), &open_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");
}

#[tokio::test]
async fn listings_resolve_the_counterparty_name() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let service = OrderService::new(db.clone());
    let vendor = vendor_auth(&seed.vendor);

    service.create(&vendor, order_input(&seed)).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = service.create(&vendor, order_input(&seed)).await.unwrap();

    let mine = service.list_for_vendor(&vendor).await.unwrap();
    assert_eq!(mine.len(), 2);
    // Newest first
    assert_eq!(mine[0].order_id, newer.id.unwrap().to_string());
    assert_eq!(mine[0].counterparty, "Fresh Farms");
    assert_eq!(mine[0].items.len(), 1);

    let theirs = service
        .list_for_supplier(&supplier_auth(&seed.supplier))
        .await
        .unwrap();
    assert_eq!(theirs.len(), 2);
    assert_eq!(theirs[0].counterparty, "Raju Chaat");

    // A stranger vendor sees nothing
    let stranger = AuthUser {
        id: "vendor:stranger".parse::<RecordId>().unwrap(),
        name: "Stranger".to_string(),
        role: Role::Vendor,
    };
    let none = service.list_for_vendor(&stranger).await.unwrap();
    assert!(none.is_empty());
}
