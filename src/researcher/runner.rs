use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::researcher::events::{ResearchEvent, ResearchEventSink};
use crate::researcher::nodes::ResearchNodes;
use crate::researcher::nodes::query_generator::fallback_query;
use crate::researcher::nodes::{extractor, reflection};
use crate::researcher::state::{CycleRecord, ResearchState};
use crate::types::person::{Profile, Seed};
use crate::types::search::{SearchQuery, SearchResult};
use crate::types::verdict::ReflectionVerdict;

/// 研究循环的四个状态与终点。严格线性，唯一的回边在Reflect之后；
/// 一轮之内流转的数据随状态携带
#[derive(Debug)]
pub enum ResearchPhase {
    GenerateQueries,
    Research {
        queries: Vec<SearchQuery>,
    },
    Extract {
        queries: Vec<SearchQuery>,
        results: Vec<SearchResult>,
    },
    Reflect,
    Done,
}

/// Reflect之后的转移裁决
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Finish,
    NextCycle,
}

/// 转移规则：画像完整，或循环预算耗尽，则终止；否则递增计数进入下一轮。
/// 预算耗尽是正常的终止转移，不是错误
pub fn decide_transition(complete: bool, cycle_count: u32, max_cycles: u32) -> Transition {
    if complete || cycle_count >= max_cycles {
        Transition::Finish
    } else {
        Transition::NextCycle
    }
}

/// 运行参数
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// 首轮之外允许的最大追加循环数
    pub max_cycles: u32,
    /// 外部指定的必填字段集合，为空时按种子缺失字段推导
    pub required_fields: Vec<String>,
}

impl RunnerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_cycles: config.research.max_cycles,
            required_fields: config.research.required_fields.clone(),
        }
    }
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            max_cycles: 2,
            required_fields: vec![],
        }
    }
}

/// 取消句柄。在每个挂起点检查，取消后以当前画像作为尽力而为的结果返回
#[derive(Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// 一次研究运行的最终产出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchOutcome {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub seed: Seed,
    pub profile: Profile,
    pub verdict: ReflectionVerdict,
    /// 实际使用的追加循环数
    pub cycles_used: u32,
    pub cancelled: bool,
    /// 每轮的查询与原始结果，供追溯
    pub history: Vec<CycleRecord>,
}

/// 状态机驱动器 - 将四个研究节点组合为有界循环。
/// 独占持有ResearchState，循环计数与终止裁决只在这里发生
pub struct GraphRunner<N: ResearchNodes> {
    nodes: N,
    options: RunnerOptions,
    events: Arc<dyn ResearchEventSink>,
    cancel: CancelHandle,
}

impl<N: ResearchNodes> GraphRunner<N> {
    pub fn new(nodes: N, options: RunnerOptions, events: Arc<dyn ResearchEventSink>) -> Self {
        Self {
            nodes,
            options,
            events,
            cancel: CancelHandle::new(),
        }
    }

    /// 获取取消句柄，可在任意时刻从其他任务触发取消
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// 驱动完整的研究循环直到终止。节点级失败在这里被吸收为
    /// "本轮零新证据"语义，只有空种子会在循环开始前报错
    pub async fn run(&self, seed: Seed) -> Result<ResearchOutcome> {
        let mut state = ResearchState::new(seed)?;
        let run_id = Uuid::new_v4();
        let required_fields = state.required_fields(&self.options.required_fields);

        self.events.emit(&ResearchEvent::RunStarted {
            run_id,
            person: state.seed.descriptor(),
        });

        let mut phase = ResearchPhase::GenerateQueries;
        let mut cancelled = false;

        loop {
            if self.cancel.is_cancelled() && !matches!(phase, ResearchPhase::Done) {
                self.events.emit(&ResearchEvent::Cancelled {
                    cycle: state.cycle_count,
                });
                cancelled = true;
                phase = ResearchPhase::Done;
            }

            match phase {
                ResearchPhase::GenerateQueries => {
                    self.events.emit(&ResearchEvent::CycleStarted {
                        cycle: state.cycle_count,
                    });
                    let queries = match self.nodes.generate_queries(&state).await {
                        Ok(queries) => {
                            self.events.emit(&ResearchEvent::QueriesGenerated {
                                cycle: state.cycle_count,
                                queries: queries.clone(),
                            });
                            queries
                        }
                        Err(e) => {
                            eprintln!("❌ 查询生成失败: {}", e);
                            let fallback = fallback_query(&state.seed);
                            self.events.emit(&ResearchEvent::FallbackQueryUsed {
                                cycle: state.cycle_count,
                                query: fallback.text.clone(),
                            });
                            vec![fallback]
                        }
                    };
                    phase = ResearchPhase::Research { queries };
                }
                ResearchPhase::Research { queries } => {
                    let (results, failed) = self.nodes.execute_searches(&queries).await;
                    self.events.emit(&ResearchEvent::SearchCompleted {
                        cycle: state.cycle_count,
                        result_count: results.len(),
                        failed_queries: failed,
                    });
                    phase = ResearchPhase::Extract { queries, results };
                }
                ResearchPhase::Extract { queries, results } => {
                    let candidates = match self.nodes.extract_candidates(&state, &results).await {
                        Ok(candidates) => candidates,
                        Err(e) => {
                            // 无法解析的提取输出等价于本轮零候选
                            eprintln!("❌ 信息提取失败，本轮按零候选处理: {}", e);
                            Vec::new()
                        }
                    };
                    extractor::merge_candidates(&mut state.profile, &candidates, state.cycle_count);
                    state.record_cycle(queries, results);
                    self.events.emit(&ResearchEvent::CandidatesMerged {
                        cycle: state.cycle_count,
                        candidate_count: candidates.len(),
                        populated_fields: state.profile.len(),
                    });
                    phase = ResearchPhase::Reflect;
                }
                ResearchPhase::Reflect => {
                    let verdict = match self.nodes.evaluate(&state, &required_fields).await {
                        Ok(verdict) => verdict,
                        Err(e) => {
                            eprintln!("❌ 完整性评估失败，退化为确定性检查: {}", e);
                            reflection::deterministic_verdict(&state, &required_fields)
                        }
                    };
                    self.events.emit(&ResearchEvent::VerdictReached {
                        cycle: state.cycle_count,
                        complete: verdict.complete,
                        missing_fields: verdict.missing_fields.clone(),
                    });

                    let transition = decide_transition(
                        verdict.complete,
                        state.cycle_count,
                        self.options.max_cycles,
                    );
                    state.last_verdict = Some(verdict);

                    match transition {
                        Transition::Finish => {
                            state.mark_terminal();
                            phase = ResearchPhase::Done;
                        }
                        Transition::NextCycle => {
                            state.cycle_count += 1;
                            phase = ResearchPhase::GenerateQueries;
                        }
                    }
                }
                ResearchPhase::Done => {
                    state.mark_terminal();
                    break;
                }
            }
        }

        let verdict = state
            .last_verdict
            .clone()
            .unwrap_or_else(|| reflection::deterministic_verdict(&state, &required_fields));

        self.events.emit(&ResearchEvent::RunFinished {
            run_id,
            cycles_used: state.cycle_count,
            complete: verdict.complete,
        });

        Ok(ResearchOutcome {
            run_id,
            generated_at: Utc::now(),
            seed: state.seed,
            profile: state.profile,
            verdict,
            cycles_used: state.cycle_count,
            cancelled,
            history: state.history,
        })
    }
}
