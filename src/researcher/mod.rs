// 人物研究循环系统
// GenerateQueries：根据画像缺口生成搜索查询 = seed + last_verdict → queries
// Research：并发执行搜索并按URL去重 = queries → results
// Extract：LLM提出字段候选，确定性合并策略并入画像 = results → profile
// Reflect：完整性评估，决定回边或终止 = profile → verdict
// GraphRunner以有界循环驱动以上四个节点，默认首轮之外最多追加2轮

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::outlet;
use crate::researcher::events::ConsoleEventSink;
use crate::researcher::nodes::LiveResearchNodes;
use crate::researcher::runner::{GraphRunner, ResearchOutcome, RunnerOptions};
use crate::types::person::Seed;

pub mod agent_executor;
pub mod context;
pub mod events;
pub mod nodes;
pub mod runner;
pub mod state;

use crate::researcher::context::ResearchContext;

/// 启动一次人物研究
pub async fn launch(config: &Config, seed: Seed) -> Result<ResearchOutcome> {
    // 凭证缺失是致命配置错误，在任何循环开始前暴露
    config.validate_credentials()?;

    for warning in seed.sanity_warnings() {
        eprintln!("⚠️ {}", warning);
    }

    let context = ResearchContext::new(config.clone())?;

    // 启动时检查模型连接
    context.llm_client.check_connection().await?;

    let events = Arc::new(ConsoleEventSink::new(config.verbose));
    let nodes = LiveResearchNodes::new(context);
    let runner = GraphRunner::new(nodes, RunnerOptions::from_config(config), events);

    // Ctrl-C触发取消，运行以当前画像作为尽力而为的结果收尾
    let cancel = runner.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n🛑 收到中断信号，正在收尾...");
            cancel.cancel();
        }
    });

    let outcome = runner.run(seed).await?;

    outlet::save(config, &outcome).await?;

    Ok(outcome)
}
