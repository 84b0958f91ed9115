//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/ping                 GET   健康检查
//! - /api/book/generate        POST  启动生成运行（异步，进度通过 WS 推送）
//! - /api/book/status          GET   查询管线状态快照
//! - /api/book/cancel          POST  取消在途运行
//! - /api/book/runs            GET   运行历史
//! - /api/book/current         GET   最近完成的成书
//! - /api/library/list         GET   列出书库全部书籍
//! - /api/library/get          POST  按 ID 获取书籍
//! - /api/library/delete       POST  按 ID 删除书籍
//! - /api/library/export/{id}  GET   导出下载（?format=json|html）
//! - /api/view                 GET   最后浏览的视图标识
//! - /api/view                 POST  记录最后浏览的视图标识
//! - /ws/events                WS    生成事件通知

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/book", book_routes())
        .nest("/library", library_routes())
        .route("/view", get(handlers::get_view).post(handlers::set_view))
}

/// Book 生成路由
fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(handlers::generate))
        .route("/status", get(handlers::status))
        .route("/cancel", post(handlers::cancel))
        .route("/runs", get(handlers::list_runs))
        .route("/current", get(handlers::current_book))
}

/// Library 路由
fn library_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(handlers::list_books))
        .route("/get", post(handlers::get_book))
        .route("/delete", post(handlers::delete_book))
        .route("/export/:id", get(handlers::export_book))
}
