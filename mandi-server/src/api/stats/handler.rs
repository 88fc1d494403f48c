//! Statistics API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::stats::{LeaderboardEntry, PlatformStats, StatsService};
use crate::utils::AppResult;

/// 平台整体统计
pub async fn platform(State(state): State<ServerState>) -> AppResult<Json<PlatformStats>> {
    let service = StatsService::new(state.get_db(), state.config.on_time_percentage);
    let stats = service.platform_stats().await?;
    Ok(Json(stats))
}

/// 供应商评分排行榜
pub async fn leaderboard(State(state): State<ServerState>) -> AppResult<Json<Vec<LeaderboardEntry>>> {
    let service = StatsService::new(state.get_db(), state.config.on_time_percentage);
    let entries = service.leaderboard().await?;
    Ok(Json(entries))
}
