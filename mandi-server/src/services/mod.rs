//! 服务层 - 外部协作服务
//!
//! # 服务列表
//!
//! - [`ReminderNotifier`] - 付款提醒投递 (HTTP 网关)

pub mod notifier;

pub use notifier::{ReminderMessage, ReminderNotifier};
