use std::time::Duration;

use futures::future::join_all;

use crate::researcher::context::ResearchContext;
use crate::types::search::{SearchQuery, SearchResult};

/// 搜索执行节点 - 并发扇出本轮查询，汇拢并去重结果
#[derive(Default)]
pub struct ResearchExecutor;

impl ResearchExecutor {
    /// 执行一批查询。单条查询失败或超时只损失该条的结果，不中断其余查询；
    /// 返回（按来源URL去重后的结果，失败查询数）
    pub async fn execute(
        context: &ResearchContext,
        queries: &[SearchQuery],
    ) -> (Vec<SearchResult>, usize) {
        let timeout = Duration::from_secs(context.config.search.timeout_seconds);

        let search_futures = queries.iter().map(|query| {
            let client = context.search_client.clone();
            let text = query.text.clone();
            async move {
                match tokio::time::timeout(timeout, client.search(&text)).await {
                    Ok(Ok(results)) => Ok(results),
                    Ok(Err(e)) => {
                        eprintln!("⚠️ 查询失败: {} ... {}", text, e);
                        Err(())
                    }
                    Err(_) => {
                        eprintln!("⚠️ 查询超时: {}", text);
                        Err(())
                    }
                }
            }
        });

        let outcomes = join_all(search_futures).await;

        let mut failed = 0;
        let mut flattened = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(results) => flattened.extend(results),
                Err(()) => failed += 1,
            }
        }

        (dedup_by_url(flattened), failed)
    }
}

/// 按来源URL去重，保留首次出现的条目，结果顺序与到达顺序无关紧要
pub fn dedup_by_url(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen: Vec<String> = Vec::new();
    let mut unique = Vec::new();
    for result in results {
        if seen.contains(&result.source_url) {
            continue;
        }
        seen.push(result.source_url.clone());
        unique.push(result);
    }
    unique
}

// Include tests
#[cfg(test)]
mod tests;
