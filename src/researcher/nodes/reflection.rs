use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::researcher::agent_executor::{AgentExecuteParams, CacheScopes, extract};
use crate::researcher::context::ResearchContext;
use crate::researcher::state::ResearchState;
use crate::types::person::Profile;
use crate::types::verdict::ReflectionVerdict;

/// LLM返回的完整性评估
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReflectionOutcome {
    /// 所有必填字段是否都已充分填充
    pub is_satisfactory: bool,
    /// 缺失或不充分的字段名列表
    pub missing_fields: Vec<String>,
    /// 针对缺失信息的1-3条后续查询建议
    pub search_queries: Vec<String>,
    /// 评估理由的简要说明
    pub reasoning: String,
}

const REFLECTION_SYSTEM_PROMPT: &str = r#"你是一个研究分析师，负责审查人物画像的质量与完整性。

你的任务是对比已提取的画像与必填字段要求：
1. 指出缺失的必填字段
2. 指出取值可疑、含占位符或"unknown"标记的字段
3. 针对缺口给出1-3条有针对性的后续搜索查询建议

请以结构化的JSON格式返回评估结果。"#;

/// 完整性评估节点 - 研究循环"是否继续"判定中质量侧的唯一权威
#[derive(Default)]
pub struct ReflectionEvaluator;

impl ReflectionEvaluator {
    /// 评估画像完整性。必填字段齐备即判定完整；存在缺口时借助LLM给出
    /// 评估理由与后续查询建议，推理失败则退化为确定性结论
    pub async fn evaluate(
        context: &ResearchContext,
        state: &ResearchState,
        required_fields: &[String],
    ) -> Result<ReflectionVerdict> {
        let missing = missing_required_fields(&state.profile, required_fields);
        if missing.is_empty() {
            return Ok(ReflectionVerdict::complete("所有必填字段均已填充"));
        }

        let user_prompt = format!(
            "## 必填字段\n{}\n\n## 当前画像\n{}\n\n## 确定性检查发现的缺失字段\n{}\n\n{}",
            required_fields.join(", "),
            serde_json::to_string_pretty(&state.profile)?,
            missing.join(", "),
            context.config.target_language.prompt_instruction()
        );

        let params = AgentExecuteParams {
            prompt_sys: REFLECTION_SYSTEM_PROMPT.to_string(),
            prompt_user: user_prompt,
            cache_scope: CacheScopes::REFLECTION.to_string(),
            log_tag: "ReflectionEvaluator".to_string(),
        };

        let outcome: ReflectionOutcome = extract(context, params).await?;

        // LLM可以补充质量层面的缺口与查询建议，但不能凭空清除必填字段缺口
        let mut missing_fields = missing;
        for field in outcome.missing_fields {
            let field = field.trim().to_lowercase();
            if !field.is_empty() && !missing_fields.contains(&field) {
                missing_fields.push(field);
            }
        }

        Ok(ReflectionVerdict {
            complete: false,
            missing_fields,
            reasoning: outcome.reasoning,
            follow_up_queries: outcome.search_queries,
        })
    }
}

/// 确定性的必填字段缺口检查
pub fn missing_required_fields(profile: &Profile, required_fields: &[String]) -> Vec<String> {
    required_fields
        .iter()
        .filter(|field| profile.get(field).is_none())
        .cloned()
        .collect()
}

/// 不依赖LLM的兜底评估结论
pub fn deterministic_verdict(state: &ResearchState, required_fields: &[String]) -> ReflectionVerdict {
    let missing = missing_required_fields(&state.profile, required_fields);
    if missing.is_empty() {
        ReflectionVerdict::complete("所有必填字段均已填充")
    } else {
        let reasoning = format!("必填字段尚未填充: {}", missing.join(", "));
        ReflectionVerdict::incomplete(missing, reasoning)
    }
}
