//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::AppError;
use crate::auth::{AuthUser, JwtService, Role};
use crate::core::ServerState;
use crate::security_log;

/// 认证中间件 - 要求调用方登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`AuthUser`] 注入请求扩展 (`req.extensions_mut().insert(user)`)。
///
/// # 跳过认证的路径
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径
/// - `/api/health` (健康检查)
/// - `GET /api/reviews*` (公开评价浏览)
/// - `GET /api/stats*` (公开平台统计)
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 InvalidToken |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // 允许 CORS 预检的 OPTIONS 请求 (跳过认证)
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // 非 API 路由跳过认证 (让它们正常返回 404)
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    // 公共 API 路由跳过认证 (评价和统计只读接口对外公开)
    let is_public_api_route = path == "/api/health"
        || (req.method() == http::Method::GET
            && (path == "/api/reviews"
                || path.starts_with("/api/reviews/supplier/")
                || path == "/api/stats"
                || path == "/api/stats/leaderboard"));
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::Unauthorized);
        }
    };

    // 验证令牌
    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = AuthUser::try_from(claims).map_err(|e| {
                security_log!(
                    "WARN",
                    "auth_bad_claims",
                    error = format!("{}", e),
                    uri = format!("{:?}", req.uri())
                );
                AppError::InvalidToken
            })?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}

/// 角色检查中间件 - 要求特定角色
///
/// 订单、账款和评价写入接口按买方/卖方划分，
/// 路由组挂载本中间件限定可访问的角色。
///
/// # 用法
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/orders/vendor", get(handler::list_vendor_orders))
///     .route_layer(middleware::from_fn(require_role(Role::Vendor)));
/// ```
///
/// # 错误
///
/// 角色不符返回 403 Forbidden
pub fn require_role(
    role: Role,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<AuthUser>()
                .ok_or(AppError::Unauthorized)?;

            if user.role != role {
                security_log!(
                    "WARN",
                    "role_denied",
                    user_id = user.id.to_string(),
                    name = user.name.clone(),
                    required_role = role.as_str()
                );
                return Err(AppError::Forbidden(format!("{} role required", role)));
            }

            Ok(next.run(req).await)
        })
    }
}
