//! Generation HTTP Handlers
//!
//! 管线入口与状态观察：启动、查询、取消、运行历史

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::pipeline::PipelineStatus;
use crate::application::ports::RunRecord;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub title: String,
    /// 留空时回退为默认作者
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub run_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    /// 是否确有运行被取消
    pub cancelled: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/book/generate - 启动一次生成运行
///
/// 立即返回 run_id；结果通过 /api/book/status 或 /ws/events 观察
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<ApiResponse<GenerateResponse>>, ApiError> {
    let run_id = state.pipeline.start(request.title, request.author)?;
    Ok(Json(ApiResponse::success(GenerateResponse { run_id })))
}

/// GET /api/book/status - 当前管线状态快照
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<PipelineStatus>> {
    Json(ApiResponse::success(state.pipeline.status()))
}

/// POST /api/book/cancel - 取消在途运行
pub async fn cancel(State(state): State<Arc<AppState>>) -> Json<ApiResponse<CancelResponse>> {
    let cancelled = state.pipeline.cancel();
    Json(ApiResponse::success(CancelResponse { cancelled }))
}

/// GET /api/book/runs - 运行历史，最新在前
pub async fn list_runs(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<RunRecord>>> {
    Json(ApiResponse::success(state.runs.list()))
}
