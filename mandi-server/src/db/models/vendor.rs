//! Vendor Model
//!
//! 采购方（街头摊贩）档案，带信用与信任信号。
//! `trust_score` / `credit_limit` 缺省时由配置补默认值，表里不回写。

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Vendor entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Display name (stall name)
    pub name: String,
    /// Phone or email, free text
    pub contact: String,
    pub address: Option<String>,
    /// Cuisine profile field, display only
    pub cuisine: Option<String>,
    /// Incremented on every successful payment; None means config default
    pub trust_score: Option<i64>,
    /// Surfaced read-only in the credit summary; not enforced against orders
    pub credit_limit: Option<f64>,
    /// Unix millis
    pub created_at: i64,
}
