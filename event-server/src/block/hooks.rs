//! 计数修改钩子
//!
//! 钩子在构建 [`ServerState`](crate::core::ServerState) 之前注册，
//! 每次计数按注册顺序执行。

use std::fmt;
use std::sync::Arc;

use shared::models::CountFilter;

/// 计数的统计条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountContext {
    pub filter: CountFilter,
}

/// 替换计算出的计数
pub trait CountAlter: Send + Sync {
    fn alter(&self, count: u64, context: &CountContext) -> u64;
}

impl<F> CountAlter for F
where
    F: Fn(u64, &CountContext) -> u64 + Send + Sync,
{
    fn alter(&self, count: u64, context: &CountContext) -> u64 {
        self(count, context)
    }
}

/// 按顺序排列的 [`CountAlter`] 钩子
#[derive(Clone, Default)]
pub struct CountAlterPipeline {
    hooks: Vec<Arc<dyn CountAlter>>,
}

impl CountAlterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: impl CountAlter + 'static) {
        self.hooks.push(Arc::new(hook));
    }

    pub fn with_hook(mut self, hook: impl CountAlter + 'static) -> Self {
        self.register(hook);
        self
    }

    /// 依次将 `count` 传入每个钩子
    pub fn apply(&self, count: u64, context: &CountContext) -> u64 {
        self.hooks
            .iter()
            .fold(count, |current, hook| hook.alter(current, context))
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for CountAlterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountAlterPipeline")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offset(u64);

    impl CountAlter for Offset {
        fn alter(&self, count: u64, _context: &CountContext) -> u64 {
            count + self.0
        }
    }

    fn context() -> CountContext {
        CountContext {
            filter: CountFilter::active("registration"),
        }
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = CountAlterPipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply(7, &context()), 7);
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let pipeline = CountAlterPipeline::new()
            .with_hook(Offset(1))
            .with_hook(|count: u64, _: &CountContext| count * 10);
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.apply(2, &context()), 30);
    }

    #[test]
    fn test_hook_sees_filter() {
        let pipeline = CountAlterPipeline::new().with_hook(|count: u64, ctx: &CountContext| {
            if ctx.filter.record_type == "registration" {
                count
            } else {
                0
            }
        });
        assert_eq!(pipeline.apply(5, &context()), 5);
    }
}
