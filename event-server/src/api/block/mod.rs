//! Registration count API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /blocks/registration-count | GET | 计数区块 (渲染缓存) |
//! | /api/registrations/count | GET | 计数 JSON (不缓存) |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/blocks/registration-count", get(handler::registration_count_block))
        .route("/api/registrations/count", get(handler::registration_count))
}
