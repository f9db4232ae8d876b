//! 按标签失效的渲染缓存
//!
//! 每个缓存标签维护一个版本号。渲染前先记录相关标签的版本快照
//! ([`CacheStamp`])，写入时快照随条目一起保存；读取时快照与当前版本
//! 不一致的条目视为未命中。渲染期间发生的失效因此不会被旧结果覆盖。

use dashmap::DashMap;

/// 渲染结果及其缓存标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    pub html: String,
    pub cache_tags: Vec<String>,
}

impl RenderedBlock {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.cache_tags.iter().any(|t| t == tag)
    }
}

/// 标签版本管理器
///
/// 每个标签独立递增，不存在的标签版本为 0
#[derive(Debug, Default)]
pub struct TagVersions {
    versions: DashMap<String, u64>,
}

impl TagVersions {
    /// 递增指定标签的版本号并返回新值
    pub fn increment(&self, tag: &str) -> u64 {
        let mut entry = self.versions.entry(tag.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 获取指定标签的当前版本号
    pub fn get(&self, tag: &str) -> u64 {
        self.versions.get(tag).map(|v| *v).unwrap_or(0)
    }
}

/// 渲染开始前记录的标签版本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStamp(Vec<(String, u64)>);

#[derive(Debug, Clone)]
struct CacheEntry {
    block: RenderedBlock,
    stamp: CacheStamp,
}

/// 区块渲染缓存，按区块 ID 存储
///
/// 条目一直有效，直到某次写入使其任一标签失效
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: DashMap<String, CacheEntry>,
    versions: TagVersions,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在渲染之前调用，记录 `tags` 的当前版本
    pub fn stamp(&self, tags: &[String]) -> CacheStamp {
        CacheStamp(
            tags.iter()
                .map(|tag| (tag.clone(), self.versions.get(tag)))
                .collect(),
        )
    }

    fn is_current(&self, stamp: &CacheStamp) -> bool {
        stamp
            .0
            .iter()
            .all(|(tag, version)| self.versions.get(tag) == *version)
    }

    pub fn get(&self, key: &str) -> Option<RenderedBlock> {
        let entry = self.entries.get(key).map(|e| e.value().clone())?;
        if self.is_current(&entry.stamp) {
            return Some(entry.block);
        }
        self.entries
            .remove_if(key, |_, cached| !self.is_current(&cached.stamp));
        None
    }

    /// 写入渲染结果；快照已过期时丢弃并返回 `false`
    pub fn insert(&self, key: impl Into<String>, block: RenderedBlock, stamp: CacheStamp) -> bool {
        if !self.is_current(&stamp) {
            tracing::debug!("Render result discarded: tags invalidated during render");
            return false;
        }
        self.entries.insert(key.into(), CacheEntry { block, stamp });
        true
    }

    /// 使携带 `tag` 的条目失效，返回移除的条目数
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        // 先递增版本：并发渲染中的旧快照随之过期
        let version = self.versions.increment(tag);
        let before = self.entries.len();
        self.entries.retain(|_, cached| !cached.block.has_tag(tag));
        let removed = before.saturating_sub(self.entries.len());
        tracing::debug!(tag, version, removed, "Render cache invalidated");
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
