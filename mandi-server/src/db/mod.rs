//! 数据库服务模块
//!
//! 嵌入式 SurrealDB (RocksDB 后端)，启动时应用 Schema。
//! 表结构全部 SCHEMAFULL，状态字段用 ASSERT 限定合法值，
//! 一单一评的约束由唯一索引 `review_order_unique` 保证。

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "mandi";
const DATABASE: &str = "market";

/// Schema statements, idempotent via IF NOT EXISTS
const SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS vendor SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS name ON vendor TYPE string;
    DEFINE FIELD IF NOT EXISTS contact ON vendor TYPE string;
    DEFINE FIELD IF NOT EXISTS address ON vendor TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS cuisine ON vendor TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS trust_score ON vendor TYPE option<int>;
    DEFINE FIELD IF NOT EXISTS credit_limit ON vendor TYPE option<float>;
    DEFINE FIELD IF NOT EXISTS created_at ON vendor TYPE int;

    DEFINE TABLE IF NOT EXISTS supplier SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS name ON supplier TYPE string;
    DEFINE FIELD IF NOT EXISTS contact ON supplier TYPE string;
    DEFINE FIELD IF NOT EXISTS address ON supplier TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS is_verified ON supplier TYPE bool DEFAULT false;
    DEFINE FIELD IF NOT EXISTS rating ON supplier TYPE float DEFAULT 0.0;
    DEFINE FIELD IF NOT EXISTS review_count ON supplier TYPE int DEFAULT 0;
    DEFINE FIELD IF NOT EXISTS created_at ON supplier TYPE int;
    DEFINE INDEX IF NOT EXISTS supplier_name_idx ON supplier FIELDS name;

    DEFINE TABLE IF NOT EXISTS item SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS name ON item TYPE string;
    DEFINE FIELD IF NOT EXISTS unit ON item TYPE string;
    DEFINE FIELD IF NOT EXISTS price_per_unit ON item TYPE float;
    DEFINE FIELD IF NOT EXISTS supplier ON item TYPE record<supplier>;
    DEFINE FIELD IF NOT EXISTS in_stock ON item TYPE bool DEFAULT true;

    DEFINE TABLE IF NOT EXISTS order SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS vendor ON order TYPE record<vendor>;
    DEFINE FIELD IF NOT EXISTS supplier ON order TYPE record<supplier>;
    DEFINE FIELD IF NOT EXISTS items ON order FLEXIBLE TYPE array;
    DEFINE FIELD IF NOT EXISTS total_amount ON order TYPE float;
    DEFINE FIELD IF NOT EXISTS fulfillment_status ON order TYPE string
        ASSERT $value INSIDE ['PENDING', 'PACKED', 'SHIPPED', 'OUT_FOR_DELIVERY', 'DELIVERED', 'CANCELLED'];
    DEFINE FIELD IF NOT EXISTS payment_status ON order TYPE string
        ASSERT $value INSIDE ['UNPAID', 'PAID', 'OVERDUE'];
    DEFINE FIELD IF NOT EXISTS ordered_at ON order TYPE int;
    DEFINE FIELD IF NOT EXISTS due_date ON order TYPE option<int>;

    DEFINE TABLE IF NOT EXISTS review SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS vendor ON review TYPE record<vendor>;
    DEFINE FIELD IF NOT EXISTS supplier ON review TYPE record<supplier>;
    DEFINE FIELD IF NOT EXISTS order ON review TYPE record<order>;
    DEFINE FIELD IF NOT EXISTS rating ON review TYPE int
        ASSERT $value >= 1 AND $value <= 5;
    DEFINE FIELD IF NOT EXISTS comment ON review TYPE string;
    DEFINE FIELD IF NOT EXISTS image ON review TYPE option<string>;
    DEFINE FIELD IF NOT EXISTS is_verified ON review TYPE bool DEFAULT false;
    DEFINE FIELD IF NOT EXISTS created_at ON review TYPE int;
    DEFINE INDEX IF NOT EXISTS review_order_unique ON review FIELDS order UNIQUE;
";

/// Embedded database service
///
/// Opens the RocksDB-backed store at the given path and applies the
/// schema. The handle is cheap to clone and shared across repositories.
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at `path` and apply the schema
    pub async fn new(path: &str) -> Result<Self, AppError> {
        tracing::info!("Opening database at {}", path);

        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::Database(format!("Failed to select namespace: {}", e)))?;

        apply_schema(&db).await?;

        tracing::info!("Database ready (ns={}, db={})", NAMESPACE, DATABASE);
        Ok(Self { db })
    }
}

/// Apply the table definitions, safe to run on every startup
pub async fn apply_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(SCHEMA)
        .await
        .map_err(|e| AppError::Database(format!("Failed to apply schema: {}", e)))?
        .check()
        .map_err(|e| AppError::Database(format!("Schema statement failed: {}", e)))?;
    Ok(())
}
