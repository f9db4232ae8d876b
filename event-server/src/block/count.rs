//! 报名计数区块

use std::sync::Arc;

use askama::Template;
use shared::models::CountFilter;

use super::cache::RenderedBlock;
use super::hooks::{CountAlterPipeline, CountContext};
use crate::db::RecordStore;
use crate::utils::{AppError, AppResult};

/// 计数区块的渲染缓存键
pub const BLOCK_ID: &str = "registration_count";

/// 写入 `record_type` 类型记录时失效的缓存标签
pub fn record_type_tag(record_type: &str) -> String {
    format!("record_type:{record_type}")
}

#[derive(Template)]
#[template(path = "registration_count.html")]
struct RegistrationCountTemplate {
    count: u64,
}

/// 统计某一类型的有效记录
#[derive(Clone)]
pub struct RegistrationCountQuery {
    store: Arc<dyn RecordStore>,
    hooks: Arc<CountAlterPipeline>,
    record_type: String,
}

impl RegistrationCountQuery {
    pub fn new(
        store: Arc<dyn RecordStore>,
        hooks: Arc<CountAlterPipeline>,
        record_type: impl Into<String>,
    ) -> Self {
        Self {
            store,
            hooks,
            record_type: record_type.into(),
        }
    }

    /// 经过修改钩子后的有效记录数
    pub async fn execute(&self) -> AppResult<u64> {
        let filter = CountFilter::active(&self.record_type);
        let raw = self.store.count(&filter).await?;
        let raw = u64::try_from(raw).unwrap_or_default();
        let context = CountContext { filter };
        Ok(self.hooks.apply(raw, &context))
    }

    /// 渲染结果携带的缓存标签
    pub fn cache_tags(&self) -> Vec<String> {
        vec![record_type_tag(&self.record_type)]
    }

    /// 渲染计数区块及其缓存标签
    pub async fn render(&self) -> AppResult<RenderedBlock> {
        let count = self.execute().await?;
        let html = RegistrationCountTemplate { count }
            .render()
            .map_err(|e| AppError::template(e.to_string()))?;
        Ok(RenderedBlock {
            html,
            cache_tags: self.cache_tags(),
        })
    }
}
