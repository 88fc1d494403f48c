//! Item Model
//!
//! 最小物料目录记录。目录的增删改由外部系统负责，
//! 这里只在下单时校验引用是否真实存在。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Catalog item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    /// Sale unit, e.g. "kg", "dozen"
    pub unit: String,
    pub price_per_unit: f64,
    #[serde(with = "serde_helpers::record_id")]
    pub supplier: RecordId,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub in_stock: bool,
}
