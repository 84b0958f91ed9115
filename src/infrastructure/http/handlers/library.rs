//! Library HTTP Handlers
//!
//! 书库的读取、删除、当前书籍与导出下载

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::book::{Book, BookId};
use crate::infrastructure::export::{html, json};
use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BookIdRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SetViewRequest {
    pub view: String,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub view: Option<String>,
}

/// 导出格式，默认 JSON
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Html,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/library/list - 全部书籍，最近完成的在前
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Book>>>, ApiError> {
    let library = state.store.load_library().await?;
    Ok(Json(ApiResponse::success(library)))
}

/// POST /api/library/get - 按 ID 取单本
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookIdRequest>,
) -> Result<Json<ApiResponse<Book>>, ApiError> {
    let id = BookId::from_uuid(request.id);
    let book = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Book not found: {}", request.id)))?;
    Ok(Json(ApiResponse::success(book)))
}

/// POST /api/library/delete - 按 ID 删除
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let id = BookId::from_uuid(request.id);
    let removed = state.store.remove(&id).await?;
    if !removed {
        return Err(ApiError::NotFound(format!(
            "Book not found: {}",
            request.id
        )));
    }
    tracing::info!(book_id = %request.id, "Book deleted from library");
    Ok(Json(ApiResponse::ok()))
}

/// GET /api/library/export/{id}?format=json|html - 导出下载
///
/// 区别于其余接口，成功时直接返回文件体与下载头，失败时仍走 errno 包装
pub async fn export_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let book_id = BookId::from_uuid(id);
    let book = state
        .store
        .find_by_id(&book_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Book not found: {}", id)))?;

    let (filename, content_type, body) = match query.format {
        ExportFormat::Json => (
            json::json_filename(&book),
            "application/json; charset=utf-8",
            json::to_json(&book)?,
        ),
        ExportFormat::Html => (
            html::html_filename(&book),
            "text/html; charset=utf-8",
            html::render_manuscript(&book),
        ),
    };

    tracing::info!(book_id = %id, %filename, "Book exported for download");

    let headers = [
        (header::CONTENT_TYPE, content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, body).into_response())
}

/// GET /api/book/current - 最近完成运行的成书
pub async fn current_book(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Option<Book>>>, ApiError> {
    let book = state.store.current_book().await?;
    Ok(Json(ApiResponse::success(book)))
}

/// GET /api/view - 最后浏览的视图标识
pub async fn get_view(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ViewResponse>>, ApiError> {
    let view = state.store.last_view().await?;
    Ok(Json(ApiResponse::success(ViewResponse { view })))
}

/// POST /api/view - 记录最后浏览的视图标识
pub async fn set_view(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetViewRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state.store.set_last_view(&request.view).await?;
    Ok(Json(ApiResponse::ok()))
}
