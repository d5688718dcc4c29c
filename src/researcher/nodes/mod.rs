use anyhow::Result;
use async_trait::async_trait;

use crate::researcher::context::ResearchContext;
use crate::researcher::state::ResearchState;
use crate::types::search::{SearchQuery, SearchResult};
use crate::types::verdict::ReflectionVerdict;

pub mod extractor;
pub mod query_generator;
pub mod reflection;
pub mod research_executor;

pub use extractor::{Extractor, FieldCandidate};
pub use query_generator::QueryGenerator;
pub use reflection::ReflectionEvaluator;
pub use research_executor::ResearchExecutor;

/// 研究循环四个节点的能力接口。GraphRunner只面向该接口驱动循环，
/// 生产实现对接LLM与搜索服务，测试中可替换为脚本化实现
#[async_trait]
pub trait ResearchNodes: Send + Sync {
    /// 生成本轮搜索查询
    async fn generate_queries(&self, state: &ResearchState) -> Result<Vec<SearchQuery>>;

    /// 执行搜索，返回（去重后的结果，失败查询数）。部分失败是常态而非错误
    async fn execute_searches(&self, queries: &[SearchQuery]) -> (Vec<SearchResult>, usize);

    /// 从本轮证据中提取字段候选
    async fn extract_candidates(
        &self,
        state: &ResearchState,
        results: &[SearchResult],
    ) -> Result<Vec<FieldCandidate>>;

    /// 评估画像完整性
    async fn evaluate(
        &self,
        state: &ResearchState,
        required_fields: &[String],
    ) -> Result<ReflectionVerdict>;
}

/// 生产环境的节点实现，对接真实的LLM与搜索服务
pub struct LiveResearchNodes {
    context: ResearchContext,
}

impl LiveResearchNodes {
    pub fn new(context: ResearchContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl ResearchNodes for LiveResearchNodes {
    async fn generate_queries(&self, state: &ResearchState) -> Result<Vec<SearchQuery>> {
        QueryGenerator::generate(&self.context, state).await
    }

    async fn execute_searches(&self, queries: &[SearchQuery]) -> (Vec<SearchResult>, usize) {
        ResearchExecutor::execute(&self.context, queries).await
    }

    async fn extract_candidates(
        &self,
        state: &ResearchState,
        results: &[SearchResult],
    ) -> Result<Vec<FieldCandidate>> {
        Extractor::extract_candidates(&self.context, state, results).await
    }

    async fn evaluate(
        &self,
        state: &ResearchState,
        required_fields: &[String],
    ) -> Result<ReflectionVerdict> {
        ReflectionEvaluator::evaluate(&self.context, state, required_fields).await
    }
}
