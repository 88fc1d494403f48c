//! 平台统计服务
//!
//! 所有指标按需现算，不落缓存。计数与均值尽量合并进一条
//! 多语句查询，直方图与榜单复用仓储查询。

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::repository::{ReviewRepository, SupplierRepository, surreal_err_to_app};
use crate::reputation::{RatingBreakdown, breakdown_from_counts, round_to_tenth};
use crate::utils::AppError;

/// Leaderboard length
const LEADERBOARD_SIZE: usize = 5;

/// Shown when no supplier qualifies for the top slot yet
const NO_TOP_SUPPLIER: &str = "N/A";

/// Platform-wide statistics snapshot
#[derive(Debug, Serialize)]
pub struct PlatformStats {
    /// Verified suppliers only
    pub total_suppliers: i64,
    /// Orders that reached DELIVERED
    pub total_delivered: i64,
    /// One-decimal mean over every review, 0.0 when there are none
    pub avg_platform_rating: f64,
    pub rating_breakdown: RatingBreakdown,
    pub top_supplier: TopSupplier,
    /// Operational constant from configuration, not derived from orders
    pub on_time_percentage: f64,
}

/// Best-rated verified supplier, or the placeholder entry
#[derive(Debug, Serialize)]
pub struct TopSupplier {
    pub name: String,
    pub rating: f64,
}

/// One leaderboard row
#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub supplier_id: String,
    pub name: String,
    pub rating: f64,
    pub review_count: i64,
    pub is_verified: bool,
}

#[derive(Deserialize)]
struct TotalsRow {
    total_suppliers: i64,
    total_delivered: i64,
    avg_rating: f64,
    review_count: i64,
}

/// Read-only statistics over the whole store
pub struct StatsService {
    db: Surreal<Db>,
    reviews: ReviewRepository,
    suppliers: SupplierRepository,
    on_time_percentage: f64,
}

impl StatsService {
    pub fn new(db: Surreal<Db>, on_time_percentage: f64) -> Self {
        Self {
            reviews: ReviewRepository::new(db.clone()),
            suppliers: SupplierRepository::new(db.clone()),
            db,
            on_time_percentage,
        }
    }

    /// Compute the platform statistics snapshot
    pub async fn platform_stats(&self) -> Result<PlatformStats, AppError> {
        let mut result = self
            .db
            .query(
                "LET $verified = (SELECT VALUE id FROM supplier WHERE is_verified = true); \
                 LET $delivered = (SELECT VALUE id FROM order WHERE fulfillment_status = 'DELIVERED'); \
                 LET $ratings = (SELECT VALUE rating FROM review); \
                 RETURN { \
                     total_suppliers: array::len($verified), \
                     total_delivered: array::len($delivered), \
                     avg_rating: math::mean($ratings) OR 0, \
                     review_count: array::len($ratings) \
                 };",
            )
            .await
            .map_err(surreal_err_to_app)?;
        let totals: Option<TotalsRow> = result.take(3).map_err(surreal_err_to_app)?;
        let totals = totals
            .ok_or_else(|| AppError::Database("Failed to aggregate platform totals".to_string()))?;

        // math::mean of an empty set is not a number, guard on the count
        let avg_platform_rating = if totals.review_count == 0 {
            0.0
        } else {
            round_to_tenth(totals.avg_rating)
        };

        let histogram = self.reviews.rating_histogram().await?;
        let rating_breakdown = breakdown_from_counts(&histogram);

        let top_supplier = self
            .suppliers
            .top_rated()
            .await?
            .into_iter()
            .next()
            .map(|s| TopSupplier {
                name: s.name,
                rating: s.rating,
            })
            .unwrap_or_else(|| TopSupplier {
                name: NO_TOP_SUPPLIER.to_string(),
                rating: 0.0,
            });

        Ok(PlatformStats {
            total_suppliers: totals.total_suppliers,
            total_delivered: totals.total_delivered,
            avg_platform_rating,
            rating_breakdown,
            top_supplier,
            on_time_percentage: self.on_time_percentage,
        })
    }

    /// Top rated verified suppliers with at least one review
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, AppError> {
        let suppliers = self.suppliers.top_rated().await?;
        let entries = suppliers
            .into_iter()
            .take(LEADERBOARD_SIZE)
            .map(|s| LeaderboardEntry {
                supplier_id: s.id.map(|id| id.to_string()).unwrap_or_default(),
                name: s.name,
                rating: s.rating,
                review_count: s.review_count,
                is_verified: s.is_verified,
            })
            .collect();
        Ok(entries)
    }
}
