//! Input validation helpers
//!
//! 文本长度与评分上下限集中管理。SurrealDB 的 string 字段本身
//! 不限长度，长度约束在 API 层面落实。

use crate::utils::AppError;

// === 文本长度上限 ===

/// Entity names: vendor, supplier, item, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Review comments, reminder notes
pub const MAX_NOTE_LEN: usize = 500;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

// === 评分区间 ===

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a star rating (whole stars, 1 to 5).
pub fn validate_rating(rating: i64) -> Result<(), AppError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )));
    }
    Ok(())
}
