use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::types::person::{Profile, Seed};
use crate::types::search::{SearchQuery, SearchResult};
use crate::types::verdict::ReflectionVerdict;

/// 单轮循环的追溯记录：发出的查询与取回的原始结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle: u32,
    pub queries: Vec<SearchQuery>,
    pub results: Vec<SearchResult>,
}

/// 一次研究运行的全部可变状态，由GraphRunner独占持有
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchState {
    /// 不可变的输入种子
    pub seed: Seed,
    /// 当前最优画像
    pub profile: Profile,
    /// 每轮的查询与结果记录，只追加，不回放
    pub history: Vec<CycleRecord>,
    /// 已完成的追加循环数，从0开始，每轮恰好递增一次
    pub cycle_count: u32,
    /// 终止标志，置位后画像与历史不再变更
    pub terminal: bool,
    /// 最近一轮的完整性评估结论
    pub last_verdict: Option<ReflectionVerdict>,
}

impl ResearchState {
    /// 以种子创建初始状态。空种子是致命配置错误
    pub fn new(seed: Seed) -> Result<Self> {
        if seed.is_empty() {
            bail!("研究种子为空，至少需要提供姓名、邮箱、公司、LinkedIn、职位、备注之一");
        }
        Ok(Self {
            seed,
            profile: Profile::new(),
            history: Vec::new(),
            cycle_count: 0,
            terminal: false,
            last_verdict: None,
        })
    }

    /// 追加一轮记录。终止后的写入属于状态破坏，直接拒绝
    pub fn record_cycle(&mut self, queries: Vec<SearchQuery>, results: Vec<SearchResult>) {
        debug_assert!(!self.terminal, "terminal状态下不允许追加历史");
        if self.terminal {
            return;
        }
        self.history.push(CycleRecord {
            cycle: self.cycle_count,
            queries,
            results,
        });
    }

    /// 历史中出现过的所有查询文本，用于查询去重
    pub fn issued_query_texts(&self) -> Vec<&str> {
        self.history
            .iter()
            .flat_map(|record| record.queries.iter())
            .map(|q| q.text.as_str())
            .collect()
    }

    /// 标记终止
    pub fn mark_terminal(&mut self) {
        self.terminal = true;
    }

    /// 当前待补全的字段：配置了必填集合时使用之，否则按种子缺失的核心字段推导
    pub fn required_fields(&self, configured: &[String]) -> Vec<String> {
        if !configured.is_empty() {
            return configured.to_vec();
        }
        self.seed
            .absent_core_fields()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

// Include tests
#[cfg(test)]
mod tests;
