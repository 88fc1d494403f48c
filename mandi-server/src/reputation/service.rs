//! 评价服务
//!
//! 评价写入与供应商口碑汇总。校验顺序固定：
//! 订单存在 → 归属 → 已送达 → 字段合法，然后唯一索引兜底防重。

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::AuthUser;
use crate::db::models::{Review, ReviewListEntry};
use crate::db::repository::{OrderRepository, ReviewRepository, SupplierRepository};
use crate::orders::FulfillmentStatus;
use crate::reputation::round_to_tenth;
use crate::utils::{AppError, time, validation};

/// Default page size for the public review feed
const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Review submission payload
#[derive(Debug, Deserialize)]
pub struct AddReviewInput {
    pub order_id: String,
    /// Whole stars, 1 to 5
    pub rating: i64,
    pub comment: String,
    pub image: Option<String>,
}

/// Pagination query for the public review feed
#[derive(Debug, Deserialize)]
pub struct ReviewPageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// One page of the public review feed
#[derive(Debug, Serialize)]
pub struct ReviewPage {
    pub reviews: Vec<ReviewListEntry>,
    pub total: i64,
    pub page: u32,
    pub total_pages: u32,
}

/// Review business logic over the repositories
pub struct ReviewService {
    orders: OrderRepository,
    reviews: ReviewRepository,
    suppliers: SupplierRepository,
}

impl ReviewService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            reviews: ReviewRepository::new(db.clone()),
            suppliers: SupplierRepository::new(db),
        }
    }

    /// Submit a review for a delivered order and refresh the supplier rollup
    ///
    /// The unique index on `order` decides duplicate submissions; there is no
    /// check-then-insert window. The rollup recompute always derives from the
    /// full review population, so concurrent recomputes converge on the same
    /// store truth.
    pub async fn add_review(
        &self,
        vendor: &AuthUser,
        input: AddReviewInput,
    ) -> Result<Review, AppError> {
        let order_id = OrderRepository::parse_id(&input.order_id)?;
        let order = self
            .orders
            .find_by_id(&order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", input.order_id)))?;

        if !vendor.owns(&order) {
            return Err(AppError::Forbidden(
                "Order belongs to a different vendor".to_string(),
            ));
        }

        if order.fulfillment_status != FulfillmentStatus::Delivered {
            return Err(AppError::InvalidTransition(format!(
                "Order is not delivered yet (currently {})",
                order.fulfillment_status
            )));
        }

        validation::validate_rating(input.rating)?;
        validation::validate_required_text(&input.comment, "comment", validation::MAX_NOTE_LEN)?;
        validation::validate_optional_text(&input.image, "image", validation::MAX_URL_LEN)?;

        // 经由订单提交的评价必然来自真实采购，直接带已验证标记
        let review = self
            .reviews
            .create(
                order.vendor.clone(),
                order.supplier.clone(),
                order_id,
                input.rating,
                input.comment,
                input.image,
                true,
                time::now_millis(),
            )
            .await?;

        let (mean, count) = self.reviews.rollup_for_supplier(&order.supplier).await?;
        self.suppliers
            .update_rollup(&order.supplier, round_to_tenth(mean), count)
            .await?;

        Ok(review)
    }

    /// Public review feed, newest first, paginated in memory
    pub async fn list_reviews(&self, query: ReviewPageQuery) -> Result<ReviewPage, AppError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        // Workaround: SurrealDB embedded mode (kv-rocksdb) drops the first record
        // when LIMIT is combined with computed fields like <string>id on indexed
        // fields. Review volume stays small, so in-memory pagination is fine.
        let all = self.reviews.find_all_ordered().await?;

        let total = all.len() as i64;
        let total_pages = if total > 0 {
            (all.len() as u32).div_ceil(limit)
        } else {
            1
        };
        let offset = (page as usize - 1) * limit as usize;
        let reviews = all
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();

        Ok(ReviewPage {
            reviews,
            total,
            page,
            total_pages,
        })
    }

    /// All reviews for one supplier, newest first
    pub async fn list_for_supplier(
        &self,
        supplier_id: &str,
    ) -> Result<Vec<ReviewListEntry>, AppError> {
        let id: surrealdb::RecordId = supplier_id
            .parse()
            .map_err(|_| AppError::NotFound(format!("Supplier {} not found", supplier_id)))?;
        if id.table() != "supplier" {
            return Err(AppError::NotFound(format!(
                "Supplier {} not found",
                supplier_id
            )));
        }
        let entries = self.reviews.find_by_supplier(&id).await?;
        Ok(entries)
    }
}
