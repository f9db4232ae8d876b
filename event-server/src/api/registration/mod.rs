//! Registration API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /annual/{department}/register | GET | 报名表单 |
//! | /annual/{department}/register | POST | 提交报名 |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/annual/{department}/register",
        get(handler::page).post(handler::submit),
    )
}
