//! 标题清理

use std::collections::HashSet;

/// 标题中保留的行内格式标签
const ALLOWED_TAGS: [&str; 12] = [
    "a", "em", "strong", "cite", "blockquote", "code", "ul", "ol", "li", "dl", "dt", "dd",
];

/// 去除提交姓名中的可执行标记
///
/// 返回值是可直接输出的 HTML 片段：`<script>` 和 `<style>` 连同内容删除，
/// 只保留 [`ALLOWED_TAGS`]，文本中的 `&`、`<`、`>` 被转义为实体。
/// 显示时不得再次转义 (askama 中使用 `|safe`)。
pub fn sanitize_title(raw: &str) -> String {
    ammonia::Builder::default()
        .tags(HashSet::from(ALLOWED_TAGS))
        .clean(raw)
        .to_string()
}
