//! 订单领域模块
//!
//! # 模块结构
//!
//! - [`lifecycle`] - 履约状态机 (单向推进) 与付款状态轴
//! - [`service`] - 下单、推进、取消与订单列表
//!
//! 两条状态轴相互独立：履约轴只能由供应商按固定顺序推进，
//! 付款轴由采购商通过还款操作切换。

pub mod lifecycle;
pub mod service;

pub use lifecycle::{FulfillmentStatus, PaymentStatus};
pub use service::{AdvanceOrderInput, CreateOrderInput, NewOrderLine, OrderService};
