//! Review and reputation integration tests
//! Run: cargo test -p mandi-server --test review_reputation

use mandi_server::auth::{AuthUser, Role};
use mandi_server::db::apply_schema;
use mandi_server::db::models::{Supplier, Vendor};
use mandi_server::db::repository::{
    ItemRepository, OrderRepository, ReviewRepository, SupplierRepository, VendorRepository,
};
use mandi_server::orders::{CreateOrderInput, FulfillmentStatus, NewOrderLine, OrderService};
use mandi_server::reputation::{AddReviewInput, ReviewPageQuery, ReviewService};
use mandi_server::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const BASE_TS: i64 = 1_700_000_000_000;

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

async fn seed(db: &Surreal<Db>) -> Seed {
    let vendor = VendorRepository::new(db.clone())
        .create("Raju Chaat", "+91-900000001", None, None)
        .await
        .unwrap();
    let supplier = SupplierRepository::new(db.clone())
        .create("Fresh Farms", "+91-900000002", None, true)
        .await
        .unwrap();
    let item = ItemRepository::new(db.clone())
        .create("Onions", "kg", 24.5, supplier.id.clone().unwrap())
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

/// Place an order and walk it to DELIVERED, returns the order id string
async fn delivered_order(db: &Surreal<Db>, seed: &Seed) -> String {
    let orders = OrderService::new(db.clone());
    let order = orders
        .create(
            &vendor_auth(&seed.vendor),
            CreateOrderInput {
                supplier_name: seed.supplier.name.clone(),
                items: vec![NewOrderLine {
                    item_id: seed.item_id.clone(),
                    quantity: 5.0,
                }],
                total_amount: 122.5,
            },
        )
        .await
        .unwrap();
    let order_id = order.id.unwrap().to_string();
    let supplier = supplier_auth(&seed.supplier);
    for target in [
        FulfillmentStatus::Packed,
        FulfillmentStatus::Shipped,
        FulfillmentStatus::OutForDelivery,
        FulfillmentStatus::Delivered,
    ] {
        orders.advance(&supplier, &order_id, target).await.unwrap();
    }
    order_id
}

fn review_input(order_id: &str, rating: i64) -> AddReviewInput {
    AddReviewInput {
        order_id: order_id.to_string(),
        rating,
        comment: "Fresh stock, honest weighing".to_string(),
        image: None,
    }
}

#[tokio::test]
async fn review_requires_a_delivered_order() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let orders = OrderService::new(db.clone());
    let reviews = ReviewService::new(db.clone());

    let pending = orders
        .create(
            &vendor_auth(&seed.vendor),
            CreateOrderInput {
                supplier_name: seed.supplier.name.clone(),
                items: vec![NewOrderLine {
                    item_id: seed.item_id.clone(),
                    quantity: 1.0,
                }],
                total_amount: 24.5,
            },
        )
        .await
        .unwrap();
    let pending_id = pending.id.unwrap().to_string();

    let err = reviews
        .add_review(&vendor_auth(&seed.vendor), review_input(&pending_id, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "got {err:?}");
}

#[tokio::test]
async fn review_checks_ownership_and_existence() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let reviews = ReviewService::new(db.clone());
    let order_id = delivered_order(&db, &seed).await;

    let other = VendorRepository::new(db.clone())
        .create("Pinky Dosa", "+91-900000004", None, None)
        .await
        .unwrap();
    let err = reviews
        .add_review(&vendor_auth(&other), review_input(&order_id, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)), "got {err:?}");

    let err = reviews
        .add_review(&vendor_auth(&seed.vendor), review_input("order:missing", 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn review_validates_rating_and_comment() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let reviews = ReviewService::new(db.clone());
    let order_id = delivered_order(&db, &seed).await;

    for rating in [0, 6, -1] {
        let err = reviews
            .add_review(&vendor_auth(&seed.vendor), review_input(&order_id, rating))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "rating {rating}: {err:?}");
    }

    let mut input = review_input(&order_id, 5);
    input.comment = "   ".to_string();
    let err = reviews
        .add_review(&vendor_auth(&seed.vendor), input)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn review_lands_verified_and_rolls_up_the_rating() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let reviews = ReviewService::new(db.clone());

    let first = delivered_order(&db, &seed).await;
    let second = delivered_order(&db, &seed).await;

    let review = reviews
        .add_review(&vendor_auth(&seed.vendor), review_input(&first, 5))
        .await
        .unwrap();
    // Order-bound reviews are verified purchases by construction
    assert!(review.is_verified);
    assert_eq!(review.rating, 5);

    reviews
        .add_review(&vendor_auth(&seed.vendor), review_input(&second, 4))
        .await
        .unwrap();

    let supplier = SupplierRepository::new(db.clone())
        .find_by_id(&seed.supplier.id.clone().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(supplier.rating, 4.5);
    assert_eq!(supplier.review_count, 2);
}

#[tokio::test]
async fn rollup_rounds_to_one_decimal() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let reviews = ReviewService::new(db.clone());

    for rating in [5, 4, 4] {
        let order_id = delivered_order(&db, &seed).await;
        reviews
            .add_review(&vendor_auth(&seed.vendor), review_input(&order_id, rating))
            .await
            .unwrap();
    }

    // 13 / 3 = 4.333..., stored as 4.3
    let supplier = SupplierRepository::new(db.clone())
        .find_by_id(&seed.supplier.id.clone().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(supplier.rating, 4.3);
    assert_eq!(supplier.review_count, 3);
}

#[tokio::test]
async fn one_review_per_order() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let reviews = ReviewService::new(db.clone());
    let order_id = delivered_order(&db, &seed).await;

    reviews
        .add_review(&vendor_auth(&seed.vendor), review_input(&order_id, 5))
        .await
        .unwrap();
    let err = reviews
        .add_review(&vendor_auth(&seed.vendor), review_input(&order_id, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    // The losing write must not disturb the rollup
    let supplier = SupplierRepository::new(db.clone())
        .find_by_id(&seed.supplier.id.clone().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(supplier.review_count, 1);
    assert_eq!(supplier.rating, 5.0);
}

#[tokio::test]
async fn public_feed_paginates_newest_first() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let order_repo = OrderRepository::new(db.clone());
    let review_repo = ReviewRepository::new(db.clone());
    let service = ReviewService::new(db.clone());

    // Seed the table directly, one order per review
    for i in 0..12i64 {
        let order = order_repo
            .create(
                seed.vendor.id.clone().unwrap(),
                seed.supplier.id.clone().unwrap(),
                vec![],
                50.0,
                BASE_TS + i,
            )
            .await
            .unwrap();
        review_repo
            .create(
                seed.vendor.id.clone().unwrap(),
                seed.supplier.id.clone().unwrap(),
                order.id.unwrap(),
                (i % 5) + 1,
                format!("review {}", i),
                None,
                true,
                BASE_TS + i,
            )
            .await
            .unwrap();
    }

    let page = service
        .list_reviews(ReviewPageQuery {
            page: Some(1),
            limit: Some(5),
        })
        .await
        .unwrap();
    assert_eq!(page.total, 12);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.reviews.len(), 5);
    assert_eq!(page.reviews[0].comment, "review 11");
    assert_eq!(page.reviews[0].vendor_name, "Raju Chaat");
    assert_eq!(page.reviews[0].supplier_name, "Fresh Farms");

    let last = service
        .list_reviews(ReviewPageQuery {
            page: Some(3),
            limit: Some(5),
        })
        .await
        .unwrap();
    assert_eq!(last.reviews.len(), 2);
    assert_eq!(last.reviews[1].comment, "review 0");

    let beyond = service
        .list_reviews(ReviewPageQuery {
            page: Some(9),
            limit: Some(5),
        })
        .await
        .unwrap();
    assert!(beyond.reviews.is_empty());
    assert_eq!(beyond.total, 12);

    // Page zero clamps to the first page
    let clamped = service
        .list_reviews(ReviewPageQuery {
            page: Some(0),
            limit: Some(5),
        })
        .await
        .unwrap();
    assert_eq!(clamped.page, 1);
    assert_eq!(clamped.reviews.len(), 5);
}

#[tokio::test]
async fn supplier_feed_is_scoped() {
    let tmp = tempfile::tempdir().unwrap();
    let db = open_db(&tmp).await;
    let seed = seed(&db).await;
    let service = ReviewService::new(db.clone());

    let order_id = delivered_order(&db, &seed).await;
    service
        .add_review(&vendor_auth(&seed.vendor), review_input(&order_id, 4))
        .await
        .unwrap();

    let rival = SupplierRepository::new(db.clone())
        .create("Mandi Traders", "+91-900000003", None, true)
        .await
        .unwrap();

    let mine = service
        .list_for_supplier(&seed.supplier.id.clone().unwrap().to_string())
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].rating, 4);
    assert!(mine[0].is_verified);

    let empty = service
        .list_for_supplier(&rival.id.clone().unwrap().to_string())
        .await
        .unwrap();
    assert!(empty.is_empty());

    // Malformed references are indistinguishable from absent suppliers
    let err = service.list_for_supplier("not-a-supplier").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {err:?}");
}
