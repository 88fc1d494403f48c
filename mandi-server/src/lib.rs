//! Mandi Server - 原材料集市撮合平台核心服务
//!
//! # 架构概述
//!
//! 本模块是 Mandi Server 的主入口，提供以下核心功能：
//!
//! - **订单生命周期** (`orders`): 履约状态机，逐级推进，仅待处理可取消
//! - **赊账台账** (`ledger`): 订单支付状态投影出的应付/应收视图
//! - **信誉体系** (`reputation`): 订单驱动的评价与供应商评分汇总
//! - **平台统计** (`stats`): 全局指标与供应商排行榜
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): 外部签发 JWT 的校验与角色门控
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! mandi-server/src/
//! ├── core/          # 配置、状态、错误
//! ├── auth/          # JWT 认证、角色
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (模型、仓储、Schema)
//! ├── orders/        # 订单生命周期
//! ├── ledger/        # 赊账与应收账款
//! ├── reputation/    # 评价与评分
//! ├── stats/         # 平台统计
//! ├── services/      # 外部通知
//! └── utils/         # 工具函数
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod ledger;
pub mod orders;
pub mod reputation;
pub mod services;
pub mod stats;
pub mod utils;

// Re-export 公共类型
pub use auth::{AuthUser, JwtService, Role};
pub use core::{Config, Server, ServerState};
pub use ledger::{CreditPolicy, CreditService};
pub use orders::OrderService;
pub use reputation::ReviewService;
pub use stats::StatsService;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Audit logging macro - 订单与账款的关键变更写入 audit target
#[macro_export]
macro_rules! audit_log {
    ($actor:expr, $action:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "audit",
            actor = $actor,
            action = $action,
            $($key = $value),*
        );
    };
}

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 初始化运行环境 (dotenv, 日志)
///
/// 必须在 [`Config::from_env`] 之前调用，让 `.env` 中的变量生效。
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 缺失不是错误
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/mandi".to_string());
    let logs_dir = std::path::Path::new(&work_dir).join("logs");

    // 日志目录不存在时只输出到控制台
    utils::logger::init_logger_with_file(log_level.as_deref(), logs_dir.to_str());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    __  ___                 __
   /  |/  /___ _____  ____/ / (_)
  / /|_/ / __ `/ __ \/ __  / / /
 / /  / / /_/ / / / / /_/ / / /
/_/  /_/\__,_/_/ /_/\__,_/ /_/
    _____
   / ___/___  ______   _____  _____
   \__ \/ _ \/ ___/ | / / _ \/ ___/
  ___/ /  __/ /   | |/ /  __/ /
 /____/\___/_/    |___/\___/_/
    "#
    );
}
