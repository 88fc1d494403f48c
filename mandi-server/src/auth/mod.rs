//! 认证授权模块
//!
//! 提供 JWT 认证、角色抽象和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`AuthUser`] - 当前调用方上下文
//! - [`Role`] - 买方/卖方角色
//! - [`require_auth`] - 认证中间件
//! - [`require_role`] - 角色检查中间件

pub mod actor;
pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use actor::{ActorContact, ActorDirectory, Role, directory_for};
pub use jwt::{AuthUser, Claims, JwtConfig, JwtError, JwtService};
pub use middleware::{require_auth, require_role};
