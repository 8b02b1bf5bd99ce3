//! Translation tables for user-facing notices
//!
//! A [`Translator`] is constructed for one language and handed to whatever
//! prints notices. Missing keys fall back to English, then to the key itself.

use serde::{Deserialize, Serialize};

/// Supported notice languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

type Table = &'static [(&'static str, &'static str)];

const EN: Table = &[
    ("numbering.applied", "Updated numbering of {count} header(s) in {document}"),
    ("numbering.unchanged", "Numbering of {document} is already up to date"),
    ("numbering.disabled", "Header numbering is disabled for {document}"),
    ("numbering.removed", "Removed numbering from {count} header(s) in {document}"),
    ("numbering.dry_run", "Dry run, nothing written"),
    ("analyze.empty", "No headers found"),
    ("separator.changed", "Header separator: {separator}"),
    ("toggle.global.on", "Header numbering: On"),
    ("toggle.global.off", "Header numbering: Off"),
    ("toggle.document.on", "Header numbering enabled for {document}"),
    ("toggle.document.off", "Header numbering disabled for {document}"),
    ("directive.added", "Added numbering directives to {document}"),
    ("directive.reset", "Reset numbering directives of {document}"),
    ("directive.removed", "Removed numbering directives from {document}"),
    ("directive.none", "{document} has no numbering directives"),
    ("backlinks.updated", "Updated {count} link(s) in other documents"),
    ("backlinks.none", "No links to this heading"),
    ("backlinks.count", "{count} link(s)"),
    ("backlinks.rolled_back", "Backlink update failed, changes rolled back: {error}"),
    ("backlinks.rollback_failed", "Critical error: failed to roll back backlink changes: {error}"),
    ("bulk.completed", "Processed {processed} document(s), modified {modified}, failed {failed}"),
    ("bulk.nothing", "No header numbering found"),
    ("bulk.numbering", "Numbering all documents..."),
    ("bulk.removing", "Removing numbering from all documents..."),
    ("bulk.failures", "Some documents could not be processed; run with -v for details"),
];

const ZH: Table = &[
    ("numbering.applied", "已更新 {document} 中 {count} 个标题的编号"),
    ("numbering.unchanged", "{document} 的编号已是最新"),
    ("numbering.disabled", "{document} 已禁用标题编号"),
    ("numbering.removed", "已移除 {document} 中 {count} 个标题的编号"),
    ("numbering.dry_run", "试运行，未写入任何内容"),
    ("analyze.empty", "未找到标题"),
    ("separator.changed", "标题分隔符：{separator}"),
    ("toggle.global.on", "标题自动编号：开"),
    ("toggle.global.off", "标题自动编号：关"),
    ("toggle.document.on", "已为 {document} 启用标题编号"),
    ("toggle.document.off", "已为 {document} 禁用标题编号"),
    ("directive.added", "已向 {document} 添加编号指令"),
    ("directive.reset", "已重置 {document} 的编号指令"),
    ("directive.removed", "已从 {document} 移除编号指令"),
    ("directive.none", "{document} 没有编号指令"),
    ("backlinks.updated", "已更新其他文档中的 {count} 个链接"),
    ("backlinks.none", "没有指向该标题的链接"),
    ("backlinks.count", "{count} 个链接"),
    ("backlinks.rolled_back", "反向链接更新失败，已回滚更改：{error}"),
    ("backlinks.rollback_failed", "严重错误：反向链接更改回滚失败：{error}"),
    ("bulk.numbering", "正在为所有文档编号..."),
    ("bulk.removing", "正在移除所有文档的编号..."),
    ("bulk.failures", "部分文档无法处理；使用 -v 查看详情"),
];

impl Language {
    fn table(&self) -> Table {
        match self {
            Language::En => EN,
            Language::Zh => ZH,
        }
    }
}

/// Notice text lookup for one language
#[derive(Debug, Clone, Copy)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub fn new(language: Language) -> Self {
        Translator { language }
    }

    /// Look up `key` and substitute `{name}` placeholders
    pub fn t(&self, key: &str, placeholders: &[(&str, &str)]) -> String {
        let template = lookup(self.language.table(), key)
            .or_else(|| lookup(EN, key))
            .unwrap_or(key);

        let mut text = template.to_string();
        for (name, value) in placeholders {
            text = text.replace(&format!("{{{}}}", name), value);
        }
        text
    }
}

fn lookup(table: Table, key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
