//! Supplier Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Supplier;
use crate::utils::time;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const TABLE: &str = "supplier";

#[derive(Clone)]
pub struct SupplierRepository {
    base: BaseRepository,
}

impl SupplierRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find supplier by record id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Supplier>> {
        let supplier: Option<Supplier> = self.base.db().select(id.clone()).await?;
        Ok(supplier)
    }

    /// Find supplier by display name, case-insensitive exact match
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Supplier>> {
        let name_owned = name.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM supplier WHERE string::lowercase(name) = $name")
            .bind(("name", name_owned))
            .await?;
        let suppliers: Vec<Supplier> = result.take(0)?;
        Ok(suppliers.into_iter().next())
    }

    /// Create a supplier profile
    pub async fn create(
        &self,
        name: &str,
        contact: &str,
        address: Option<String>,
        is_verified: bool,
    ) -> RepoResult<Supplier> {
        #[derive(Serialize)]
        struct SupplierCreateDb {
            name: String,
            contact: String,
            address: Option<String>,
            is_verified: bool,
            rating: f64,
            review_count: i64,
            created_at: i64,
        }

        let created: Option<Supplier> = self
            .base
            .db()
            .create(TABLE)
            .content(SupplierCreateDb {
                name: name.to_string(),
                contact: contact.to_string(),
                address,
                is_verified,
                rating: 0.0,
                review_count: 0,
                created_at: time::now_millis(),
            })
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create supplier".to_string()))
    }

    /// Write a freshly recomputed reputation rollup
    ///
    /// Only the review engine calls this, always with values derived from
    /// the full review population.
    pub async fn update_rollup(
        &self,
        id: &RecordId,
        rating: f64,
        review_count: i64,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $supplier SET rating = $rating, review_count = $count")
            .bind(("supplier", id.clone()))
            .bind(("rating", rating))
            .bind(("count", review_count))
            .await?;
        Ok(())
    }

    /// Verified suppliers with at least one review, best rated first
    ///
    /// Ties break on review count. Callers take the top N; the full fetch
    /// avoids the embedded-mode LIMIT quirk (see the statistics handlers).
    pub async fn top_rated(&self) -> RepoResult<Vec<Supplier>> {
        let suppliers: Vec<Supplier> = self
            .base
            .db()
            .query(
                "SELECT * FROM supplier \
                 WHERE is_verified = true AND review_count > 0 \
                 ORDER BY rating DESC, review_count DESC",
            )
            .await?
            .take(0)?;
        Ok(suppliers)
    }
}
