//! 账款领域模块
//!
//! # 模块结构
//!
//! - [`money`] - Decimal 金额计算与校验
//! - [`service`] - 信用摘要、还款、应收分组与付款提醒
//!
//! 账款不单独建表：应付/应收都是订单表上 `payment_status` 的投影，
//! 每次读取全量汇总，杜绝缓存口径漂移。

pub mod money;
pub mod service;

pub use service::{
    CreditPolicy, CreditService, CreditSummary, PaymentOutcome, ReceivablesSummary, ReminderAck,
    ReminderInput, TransactionEntry, VendorReceivable,
};
