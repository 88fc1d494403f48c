//! Review Model
//!
//! 评价与订单 1:1 绑定 (UNIQUE 索引 `review_order_unique` 兜底)，
//! 写入后不可修改或删除。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Review entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub vendor: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub supplier: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    /// Whole stars, 1 to 5
    pub rating: i64,
    pub comment: String,
    pub image: Option<String>,
    /// Always true on the delivered-order path
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    /// Unix millis
    pub created_at: i64,
}

/// Review list row with both party names resolved in-query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewListEntry {
    pub review_id: String,
    pub vendor_name: String,
    pub supplier_id: String,
    pub supplier_name: String,
    pub rating: i64,
    pub comment: String,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    pub created_at: i64,
}
