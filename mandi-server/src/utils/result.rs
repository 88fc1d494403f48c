//! 统一 Result 别名
//!
//! HTTP 处理器与服务层统一返回 [`AppResult`]，
//! 错误经由 [`AppError`] 的 `IntoResponse` 映射为响应信封。

use crate::AppError;

/// 应用级 Result 类型
pub type AppResult<T> = Result<T, AppError>;
