use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::researcher::context::ResearchContext;

/// 各节点的缓存类别
pub struct CacheScopes;

impl CacheScopes {
    pub const QUERY_GENERATION: &'static str = "query_generation";
    pub const EXTRACTION: &'static str = "extraction";
    pub const REFLECTION: &'static str = "reflection";
}

/// 节点级LLM调用参数
pub struct AgentExecuteParams {
    pub prompt_sys: String,
    pub prompt_user: String,
    /// 缓存类别，按节点划分
    pub cache_scope: String,
    /// 日志标识
    pub log_tag: String,
}

/// 带缓存的结构化提取。缓存命中时不触发推理；缓存写入失败不影响主流程
pub async fn extract<T>(context: &ResearchContext, params: AgentExecuteParams) -> Result<T>
where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
{
    let cache_key = format!("{}\n---\n{}", params.prompt_sys, params.prompt_user);

    if !context.config.force_refresh
        && let Some(cached) = context
            .cache_manager
            .get::<T>(&params.cache_scope, &cache_key)
            .await
    {
        if context.config.verbose {
            println!("   📦 [{}] 命中缓存，跳过推理", params.log_tag);
        }
        return Ok(cached);
    }

    let result = context
        .llm_client
        .extract::<T>(&params.prompt_sys, &params.prompt_user)
        .await?;

    if let Err(e) = context
        .cache_manager
        .store(&params.cache_scope, &cache_key, &result)
        .await
    {
        eprintln!("⚠️ [{}] 缓存写入失败: {}", params.log_tag, e);
    }

    Ok(result)
}
