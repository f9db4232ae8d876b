//! API 路由模块
//!
//! # 结构
//!
//! - [`registration`] - 年会报名页面
//! - [`block`] - 报名计数区块和计数接口
//! - [`health`] - 健康检查

pub mod block;
pub mod health;
pub mod registration;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Registration pages - public
        .merge(registration::router())
        // Count block and count API - public
        .merge(block::router())
        // Health API - public route
        .merge(health::router())
}

/// Build a fully configured application with middleware and state
///
/// Used by both the HTTP server and the integration tests
pub fn build_app(state: &ServerState) -> Router {
    build_router()
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone())
}
