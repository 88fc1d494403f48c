//! Review Repository
//!
//! 评价与订单一对一，由唯一索引 `review_order_unique` 兜底；
//! 重复插入的索引报错在这里翻译成 Duplicate。

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Review, ReviewListEntry};
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const TABLE: &str = "review";
const ORDER_UNIQUE_INDEX: &str = "review_order_unique";

/// Write-shaped review payload with plain record links
#[derive(Serialize)]
struct ReviewCreateDb {
    vendor: RecordId,
    supplier: RecordId,
    order: RecordId,
    rating: i64,
    comment: String,
    image: Option<String>,
    is_verified: bool,
    created_at: i64,
}

#[derive(Deserialize)]
struct RollupRow {
    avg_rating: f64,
    review_count: i64,
}

#[derive(Deserialize)]
struct HistogramRow {
    rating: i64,
    count: i64,
}

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a review for an order
    ///
    /// The one-review-per-order rule is enforced by the unique index on
    /// `order`, so concurrent submissions race safely: exactly one insert
    /// lands and the rest surface as `Duplicate`.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        vendor: RecordId,
        supplier: RecordId,
        order: RecordId,
        rating: i64,
        comment: String,
        image: Option<String>,
        is_verified: bool,
        created_at: i64,
    ) -> RepoResult<Review> {
        let created: Result<Option<Review>, surrealdb::Error> = self
            .base
            .db()
            .create(TABLE)
            .content(ReviewCreateDb {
                vendor,
                supplier,
                order,
                rating,
                comment,
                image,
                is_verified,
                created_at,
            })
            .await;

        match created {
            Ok(Some(review)) => Ok(review),
            Ok(None) => Err(RepoError::Database("Failed to create review".to_string())),
            Err(err) => {
                let message = err.to_string();
                if message.contains(ORDER_UNIQUE_INDEX) || message.contains("already contains") {
                    Err(RepoError::Duplicate(
                        "Order has already been reviewed".to_string(),
                    ))
                } else {
                    Err(err.into())
                }
            }
        }
    }

    /// Mean rating and review count across a supplier's full review set
    ///
    /// Raw mean; display rounding is the caller's concern.
    pub async fn rollup_for_supplier(&self, supplier: &RecordId) -> RepoResult<(f64, i64)> {
        let mut result = self
            .base
            .db()
            .query(
                "LET $ratings = (SELECT VALUE rating FROM review WHERE supplier = $supplier); \
                 RETURN { \
                     avg_rating: math::mean($ratings) OR 0, \
                     review_count: array::len($ratings) \
                 };",
            )
            .bind(("supplier", supplier.clone()))
            .await?;
        let row: Option<RollupRow> = result.take(1)?;
        let row = row.ok_or_else(|| {
            RepoError::Database("Failed to aggregate supplier reviews".to_string())
        })?;
        // math::mean of an empty set is not a number, guard on the count
        if row.review_count == 0 {
            Ok((0.0, 0))
        } else {
            Ok((row.avg_rating, row.review_count))
        }
    }

    /// Review count per star value across all suppliers
    pub async fn rating_histogram(&self) -> RepoResult<Vec<(i64, i64)>> {
        let rows: Vec<HistogramRow> = self
            .base
            .db()
            .query("SELECT rating, count() AS count FROM review GROUP BY rating")
            .await?
            .take(0)?;
        Ok(rows.into_iter().map(|row| (row.rating, row.count)).collect())
    }

    /// All reviews across the platform, newest first
    pub async fn find_all_ordered(&self) -> RepoResult<Vec<ReviewListEntry>> {
        let entries: Vec<ReviewListEntry> = self
            .base
            .db()
            .query(
                "SELECT \
                     <string>id AS review_id, \
                     vendor.name AS vendor_name, \
                     <string>supplier AS supplier_id, \
                     supplier.name AS supplier_name, \
                     rating, \
                     comment, \
                     image, \
                     is_verified, \
                     created_at \
                 FROM review ORDER BY created_at DESC",
            )
            .await?
            .take(0)?;
        Ok(entries)
    }

    /// Reviews for one supplier, newest first
    pub async fn find_by_supplier(&self, supplier: &RecordId) -> RepoResult<Vec<ReviewListEntry>> {
        let entries: Vec<ReviewListEntry> = self
            .base
            .db()
            .query(
                "SELECT \
                     <string>id AS review_id, \
                     vendor.name AS vendor_name, \
                     <string>supplier AS supplier_id, \
                     supplier.name AS supplier_name, \
                     rating, \
                     comment, \
                     image, \
                     is_verified, \
                     created_at \
                 FROM review WHERE supplier = $supplier ORDER BY created_at DESC",
            )
            .bind(("supplier", supplier.clone()))
            .await?
            .take(0)?;
        Ok(entries)
    }
}
