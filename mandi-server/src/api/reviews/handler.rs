//! Review API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::AuthUser;
use crate::core::ServerState;
use crate::db::models::{Review, ReviewListEntry};
use crate::reputation::{AddReviewInput, ReviewPage, ReviewPageQuery, ReviewService};
use crate::utils::AppResult;

/// 提交评价（仅限已送达订单的采购方）
pub async fn create(
    State(state): State<ServerState>,
    user: AuthUser,
    Json(payload): Json<AddReviewInput>,
) -> AppResult<Json<Review>> {
    let service = ReviewService::new(state.get_db());
    let review = service.add_review(&user, payload).await?;
    Ok(Json(review))
}

/// 公开评价列表（分页，最新在前）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ReviewPageQuery>,
) -> AppResult<Json<ReviewPage>> {
    let service = ReviewService::new(state.get_db());
    let page = service.list_reviews(query).await?;
    Ok(Json(page))
}

/// 单个供应商的全部评价
pub async fn list_by_supplier(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<ReviewListEntry>>> {
    let service = ReviewService::new(state.get_db());
    let reviews = service.list_for_supplier(&id).await?;
    Ok(Json(reviews))
}
