use thiserror::Error;

/// 进程级错误 - 启动与关闭路径
///
/// 请求路径的错误统一走 [`crate::utils::AppError`]；这里只覆盖
/// 服务器自身起停时的失败。
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

/// 启动路径的 Result 类型别名
pub type Result<T> = std::result::Result<T, ServerError>;
