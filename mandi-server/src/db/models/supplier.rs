//! Supplier Model
//!
//! 供应商档案与声誉汇总。`rating` / `review_count` 只允许声誉引擎
//! 全量重算后写入，其他路径一律只读。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Supplier entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Resolution key for order creation (matched case-insensitively, exact)
    pub name: String,
    pub contact: String,
    pub address: Option<String>,
    /// Set by the out-of-band verification workflow
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
    /// Rolling average over all reviews, one decimal, 0.0 when unreviewed
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: i64,
    /// Unix millis
    pub created_at: i64,
}
