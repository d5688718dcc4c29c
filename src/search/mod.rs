//! 搜索客户端 - 对接外部网页搜索服务（Tavily）

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SearchConfig;
use crate::types::search::SearchResult;

/// 搜索服务错误分类
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("搜索请求超时（{timeout_seconds}秒）: {query}")]
    Timeout { query: String, timeout_seconds: u64 },

    #[error("搜索服务返回异常状态码 {status}")]
    Http { status: u16 },

    #[error("搜索请求发送失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("搜索响应解析失败: {0}")]
    Malformed(String),
}

/// 搜索服务的能力接口。生产实现对接Tavily，测试中可替换为桩实现
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// 执行一条查询，返回排序后的结果摘要
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;

    /// 服务名称，用于日志
    fn name(&self) -> &str {
        "search"
    }
}

/// Tavily请求体
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    topic: &'a str,
    days: u32,
    max_results: usize,
    include_raw_content: bool,
}

/// Tavily响应体
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResultItem>,
}

/// Tavily单条结果
#[derive(Debug, Deserialize)]
struct TavilyResultItem {
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    raw_content: Option<String>,
}

impl From<TavilyResultItem> for SearchResult {
    fn from(item: TavilyResultItem) -> Self {
        SearchResult {
            source_url: item.url,
            title: item.title,
            snippet: item.content,
            raw_content: item.raw_content,
        }
    }
}

/// Tavily搜索客户端
pub struct TavilyClient {
    config: SearchConfig,
    http: reqwest::Client,
}

impl TavilyClient {
    /// 创建新的Tavily客户端
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("deepdossier-rs")
            .build()?;
        Ok(Self { config, http })
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.config.api_base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let body = TavilyRequest {
            api_key: &self.config.api_key,
            query,
            search_depth: &self.config.search_depth,
            topic: "general",
            days: self.config.days,
            max_results: self.config.max_results,
            include_raw_content: self.config.include_raw_content,
        };

        let request = self.http.post(self.endpoint()).json(&body).send();

        // reqwest客户端已带全局超时，这里再套一层以确保超时必然有界
        let response = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_seconds),
            request,
        )
        .await
        .map_err(|_| SearchError::Timeout {
            query: query.to_string(),
            timeout_seconds: self.config.timeout_seconds,
        })??;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http {
                status: status.as_u16(),
            });
        }

        let parsed: TavilyResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Malformed(e.to_string()))?;

        Ok(parsed.results.into_iter().map(SearchResult::from).collect())
    }

    fn name(&self) -> &str {
        "tavily"
    }
}

// Include tests
#[cfg(test)]
mod tests;
