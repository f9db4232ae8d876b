//! 报名计数区块
//!
//! - [`RegistrationCountQuery`] - 统计有效报名
//! - [`CountAlterPipeline`] - 修改计数的钩子
//! - [`RenderCache`] - 按缓存标签失效的渲染结果

pub mod cache;
pub mod count;
pub mod hooks;

pub use cache::{CacheStamp, RenderCache, RenderedBlock};
pub use count::{BLOCK_ID, RegistrationCountQuery, record_type_tag};
pub use hooks::{CountAlter, CountAlterPipeline, CountContext};
