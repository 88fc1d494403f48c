use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::ledger::CreditPolicy;

/// 服务器配置 - 市场节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/mandi | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | TRUST_SCORE_INCREMENT | 10 | 每次还款的信任加分 |
/// | DEFAULT_TRUST_SCORE | 500 | 未存储时的信任分默认值 |
/// | DEFAULT_CREDIT_LIMIT | 20000 | 未存储时的信用额度默认值 |
/// | PAYMENT_DUE_DAYS | 7 | 无到期日订单的默认账期(天) |
/// | ON_TIME_PERCENTAGE | 95.0 | 平台统计的准时率常量 |
/// | NOTIFIER_URL | (未设置) | 付款提醒网关地址 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/mandi HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,

    // === 账款与信誉常量 ===
    /// 每次成功还款的信任加分
    pub trust_score_increment: i64,
    /// 采购方未存储信任分时的默认值
    pub default_trust_score: i64,
    /// 采购方未存储信用额度时的默认值
    pub default_credit_limit: f64,
    /// 无到期日订单的默认账期 (天)
    pub payment_due_days: i64,
    /// 平台统计里的准时送达率 (运营口径常量，不从订单推导)
    pub on_time_percentage: f64,

    /// 付款提醒网关地址，未设置时提醒只记日志
    pub notifier_url: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/mandi".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),

            trust_score_increment: std::env::var("TRUST_SCORE_INCREMENT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10),
            default_trust_score: std::env::var("DEFAULT_TRUST_SCORE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(500),
            default_credit_limit: std::env::var("DEFAULT_CREDIT_LIMIT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(20000.0),
            payment_due_days: std::env::var("PAYMENT_DUE_DAYS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7),
            on_time_percentage: std::env::var("ON_TIME_PERCENTAGE")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(95.0),

            notifier_url: std::env::var("NOTIFIER_URL").ok(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// 账款服务使用的常量组
    pub fn credit_policy(&self) -> CreditPolicy {
        CreditPolicy {
            trust_score_increment: self.trust_score_increment,
            default_trust_score: self.default_trust_score,
            default_credit_limit: self.default_credit_limit,
            payment_due_days: self.payment_due_days,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
