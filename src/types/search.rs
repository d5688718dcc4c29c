use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 一条搜索查询，rationale说明该查询意图补全哪些缺口，仅用于排查，不参与逻辑
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchQuery {
    /// 提交给搜索引擎的查询文本
    pub text: String,
    /// 该查询的意图说明
    pub rationale: String,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rationale: rationale.into(),
        }
    }
}

/// 一条搜索结果摘要，除Extractor之外对其余组件不透明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub source_url: String,
    pub title: String,
    pub snippet: String,
    /// 网页的完整抓取内容，可能缺失
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}
