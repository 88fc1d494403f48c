//! Vendor Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Vendor;
use crate::utils::time;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const TABLE: &str = "vendor";

#[derive(Clone)]
pub struct VendorRepository {
    base: BaseRepository,
}

impl VendorRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find vendor by record id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Vendor>> {
        let vendor: Option<Vendor> = self.base.db().select(id.clone()).await?;
        Ok(vendor)
    }

    /// Create a vendor profile
    pub async fn create(
        &self,
        name: &str,
        contact: &str,
        address: Option<String>,
        cuisine: Option<String>,
    ) -> RepoResult<Vendor> {
        #[derive(Serialize)]
        struct VendorCreateDb {
            name: String,
            contact: String,
            address: Option<String>,
            cuisine: Option<String>,
            created_at: i64,
        }

        let created: Option<Vendor> = self
            .base
            .db()
            .create(TABLE)
            .content(VendorCreateDb {
                name: name.to_string(),
                contact: contact.to_string(),
                address,
                cuisine,
                created_at: time::now_millis(),
            })
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create vendor".to_string()))
    }

    /// Add trust points earned by a successful payment
    ///
    /// A vendor without a stored score starts from `base_score` before the
    /// increment is applied. Returns the new score.
    pub async fn add_trust_points(
        &self,
        id: &RecordId,
        points: i64,
        base_score: i64,
    ) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $vendor SET trust_score = (trust_score OR $base) + $points RETURN AFTER")
            .bind(("vendor", id.clone()))
            .bind(("base", base_score))
            .bind(("points", points))
            .await?;
        let updated: Vec<Vendor> = result.take(0)?;
        updated
            .into_iter()
            .next()
            .and_then(|v| v.trust_score)
            .ok_or_else(|| RepoError::NotFound(format!("Vendor {} not found", id)))
    }
}
