//! 平台统计模块
//!
//! 对外公开的平台级指标与供应商榜单，全部按需现算。

pub mod service;

pub use service::{LeaderboardEntry, PlatformStats, StatsService, TopSupplier};
