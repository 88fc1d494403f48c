//! Item Repository
//!
//! Catalog lookups for order-line validation. Catalog management itself
//! happens outside this service.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Item;
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const TABLE: &str = "item";

#[derive(Clone)]
pub struct ItemRepository {
    base: BaseRepository,
}

impl ItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find item by record id
    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Item>> {
        let item: Option<Item> = self.base.db().select(id.clone()).await?;
        Ok(item)
    }

    /// Create a catalog item
    pub async fn create(
        &self,
        name: &str,
        unit: &str,
        price_per_unit: f64,
        supplier: RecordId,
    ) -> RepoResult<Item> {
        #[derive(Serialize)]
        struct ItemCreateDb {
            name: String,
            unit: String,
            price_per_unit: f64,
            supplier: RecordId,
            in_stock: bool,
        }

        let created: Option<Item> = self
            .base
            .db()
            .create(TABLE)
            .content(ItemCreateDb {
                name: name.to_string(),
                unit: unit.to_string(),
                price_per_unit,
                supplier,
                in_stock: true,
            })
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create item".to_string()))
    }
}
