//! 时间工具函数
//!
//! 全栈统一使用 Unix millis (i64)，repository 层只接收 `i64`。

use chrono::Utc;

/// 一天的毫秒数
pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// 当前时间 Unix millis
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// 基准时间 + N 天,用于账期推算
pub fn millis_after_days(base: i64, days: i64) -> i64 {
    base + days * MILLIS_PER_DAY
}
