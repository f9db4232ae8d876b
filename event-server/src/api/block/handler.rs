//! Registration count handlers

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, header},
    response::{Html, IntoResponse, Response},
};
use shared::models::RegistrationCount;

use crate::block::BLOCK_ID;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ok};

pub const CACHE_TAG_HEADER: HeaderName = HeaderName::from_static("cache-tag");
pub const RENDER_CACHE_HEADER: HeaderName = HeaderName::from_static("x-render-cache");

/// GET /blocks/registration-count - 报名计数区块
pub async fn registration_count_block(State(state): State<ServerState>) -> AppResult<Response> {
    let (block, cache_status) = match state.render_cache.get(BLOCK_ID) {
        Some(block) => (block, "HIT"),
        None => {
            let query = state.count_query();
            // 快照须在查询之前获取
            let stamp = state.render_cache.stamp(&query.cache_tags());
            let block = query.render().await?;
            state.render_cache.insert(BLOCK_ID, block.clone(), stamp);
            (block, "MISS")
        }
    };

    let tags = HeaderValue::from_str(&block.cache_tags.join(" "))
        .map_err(|e| AppError::internal(format!("Invalid cache tag header: {e}")))?;

    Ok((
        [
            (CACHE_TAG_HEADER, tags),
            (RENDER_CACHE_HEADER, HeaderValue::from_static(cache_status)),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
        ],
        Html(block.html),
    )
        .into_response())
}

/// GET /api/registrations/count - 报名计数
pub async fn registration_count(
    State(state): State<ServerState>,
) -> AppResult<ApiResponse<RegistrationCount>> {
    let count = state.count_query().execute().await?;
    Ok(ok(RegistrationCount { count }))
}
