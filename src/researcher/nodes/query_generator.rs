use anyhow::{Result, bail};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::researcher::agent_executor::{AgentExecuteParams, CacheScopes, extract};
use crate::researcher::context::ResearchContext;
use crate::researcher::state::ResearchState;
use crate::types::person::Seed;
use crate::types::search::SearchQuery;

/// LLM返回的查询批次
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GeneratedQueries {
    /// 生成的搜索查询列表
    pub queries: Vec<SearchQuery>,
}

const QUERY_WRITER_SYSTEM_PROMPT: &str = r#"你是一个专业的搜索查询策划师，负责为人物背景调研生成精准的网页搜索查询。

你的任务是基于已知的人物线索，生成能够补全缺失字段的搜索查询：
1. 务必锁定正确的人名，结合公司、职位等线索消除同名歧义
2. 如果提供了LinkedIn URL，可以直接把URL放进查询文本，这能保证命中正确的主页
3. 优先针对当前标记为缺失的字段设计查询
4. 不要臆造会导致完全错过目标人物的搜索词
5. 每条查询附带rationale，说明它针对哪个缺失字段

请以结构化的JSON格式返回查询列表。"#;

/// 查询生成节点 - 根据当前画像缺口产出下一轮搜索查询
#[derive(Default)]
pub struct QueryGenerator;

impl QueryGenerator {
    /// 生成一批查询。不重复历史查询文本，数量受配置上限约束
    pub async fn generate(
        context: &ResearchContext,
        state: &ResearchState,
    ) -> Result<Vec<SearchQuery>> {
        let max_queries = context.config.research.max_queries_per_cycle;
        let user_prompt = Self::build_user_prompt(context, state, max_queries);

        let params = AgentExecuteParams {
            prompt_sys: QUERY_WRITER_SYSTEM_PROMPT.to_string(),
            prompt_user: user_prompt,
            cache_scope: CacheScopes::QUERY_GENERATION.to_string(),
            log_tag: "QueryGenerator".to_string(),
        };

        let generated: GeneratedQueries = extract(context, params).await?;
        let queries = sanitize_queries(generated.queries, &state.issued_query_texts(), max_queries);

        if queries.is_empty() {
            bail!("查询生成结果为空或全部与历史查询重复");
        }
        Ok(queries)
    }

    fn build_user_prompt(
        context: &ResearchContext,
        state: &ResearchState,
        max_queries: usize,
    ) -> String {
        let mut prompt = String::new();
        prompt.push_str(&format!(
            "## 调研目标人物\n{}\n\n",
            state.seed.descriptor()
        ));

        // 优先补全的字段：最近一轮评估给出的缺口，首轮按种子缺失字段推导
        let missing = match &state.last_verdict {
            Some(verdict) => verdict.missing_fields.clone(),
            None => state
                .seed
                .absent_core_fields()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };
        if !missing.is_empty() {
            prompt.push_str(&format!("## 待补全字段\n{}\n\n", missing.join(", ")));
        }

        if let Some(verdict) = &state.last_verdict
            && !verdict.follow_up_queries.is_empty()
        {
            prompt.push_str(&format!(
                "## 上一轮评估给出的查询建议（可参考，不必照搬）\n{}\n\n",
                verdict.follow_up_queries.join("\n")
            ));
        }

        let issued = state.issued_query_texts();
        if !issued.is_empty() {
            prompt.push_str(&format!(
                "## 已使用过的查询（禁止原样重复）\n{}\n\n",
                issued.join("\n")
            ));
        }

        prompt.push_str(&format!("最多生成 {} 条查询。", max_queries));
        prompt.push_str(context.config.target_language.prompt_instruction());
        prompt
    }
}

/// 清洗查询批次：去空白、剔除与历史原样重复的文本、批内去重、截断到上限
pub fn sanitize_queries(
    raw: Vec<SearchQuery>,
    issued_texts: &[&str],
    max_queries: usize,
) -> Vec<SearchQuery> {
    let mut seen: Vec<String> = Vec::new();
    let mut queries = Vec::new();

    for mut query in raw {
        query.text = query.text.trim().to_string();
        if query.text.is_empty() {
            continue;
        }
        if issued_texts.contains(&query.text.as_str()) {
            continue;
        }
        if seen.contains(&query.text) {
            continue;
        }
        seen.push(query.text.clone());
        queries.push(query);
        if queries.len() >= max_queries {
            break;
        }
    }
    queries
}

/// 由种子确定性构造兜底查询，保证查询生成失败时流程仍能前进
pub fn fallback_query(seed: &Seed) -> SearchQuery {
    let mut parts = Vec::new();
    for value in [&seed.name, &seed.company, &seed.role, &seed.email] {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            parts.push(v);
        }
    }
    let text = if parts.is_empty() {
        seed.linkedin
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| seed.notes.as_deref().unwrap_or("").trim())
            .to_string()
    } else {
        parts.join(" ")
    };

    SearchQuery::new(text, "种子兜底查询")
}

// Include tests
#[cfg(test)]
mod tests;
