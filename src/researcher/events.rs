use uuid::Uuid;

use crate::types::search::SearchQuery;

/// 研究过程的结构化追踪事件，按产生顺序推送给事件接收器
#[derive(Debug, Clone)]
pub enum ResearchEvent {
    RunStarted {
        run_id: Uuid,
        person: String,
    },
    CycleStarted {
        cycle: u32,
    },
    QueriesGenerated {
        cycle: u32,
        queries: Vec<SearchQuery>,
    },
    /// 查询生成失败，已退化为种子兜底查询
    FallbackQueryUsed {
        cycle: u32,
        query: String,
    },
    SearchCompleted {
        cycle: u32,
        result_count: usize,
        failed_queries: usize,
    },
    CandidatesMerged {
        cycle: u32,
        candidate_count: usize,
        populated_fields: usize,
    },
    VerdictReached {
        cycle: u32,
        complete: bool,
        missing_fields: Vec<String>,
    },
    Cancelled {
        cycle: u32,
    },
    RunFinished {
        run_id: Uuid,
        cycles_used: u32,
        complete: bool,
    },
}

/// 事件接收器。只追加、无返回值，由调用方在构造GraphRunner时注入
pub trait ResearchEventSink: Send + Sync {
    fn emit(&self, event: &ResearchEvent);
}

/// 控制台事件接收器
pub struct ConsoleEventSink {
    verbose: bool,
}

impl ConsoleEventSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ResearchEventSink for ConsoleEventSink {
    fn emit(&self, event: &ResearchEvent) {
        match event {
            ResearchEvent::RunStarted { person, .. } => {
                println!("🚀 开始执行Dossier人物研究流程: {}", person);
            }
            ResearchEvent::CycleStarted { cycle } => {
                println!("♻️ 研究循环 第 {} 轮", cycle + 1);
            }
            ResearchEvent::QueriesGenerated { queries, .. } => {
                println!("🔍 生成 {} 条搜索查询", queries.len());
                if self.verbose {
                    for query in queries {
                        println!("   - {} ({})", query.text, query.rationale);
                    }
                }
            }
            ResearchEvent::FallbackQueryUsed { query, .. } => {
                eprintln!("⚠️ 查询生成失败，使用种子兜底查询: {}", query);
            }
            ResearchEvent::SearchCompleted {
                result_count,
                failed_queries,
                ..
            } => {
                if *failed_queries > 0 {
                    eprintln!(
                        "⚠️ 搜索完成，取回 {} 条结果，{} 条查询失败",
                        result_count, failed_queries
                    );
                } else {
                    println!("✓ 搜索完成，取回 {} 条结果", result_count);
                }
            }
            ResearchEvent::CandidatesMerged {
                candidate_count,
                populated_fields,
                ..
            } => {
                println!(
                    "🧩 提取到 {} 个候选值，画像已填充 {} 个字段",
                    candidate_count, populated_fields
                );
            }
            ResearchEvent::VerdictReached {
                complete,
                missing_fields,
                ..
            } => {
                if *complete {
                    println!("✅ 画像完整性评估通过");
                } else {
                    println!("📋 画像尚不完整，缺失字段: {}", missing_fields.join(", "));
                }
            }
            ResearchEvent::Cancelled { cycle } => {
                eprintln!("🛑 研究在第 {} 轮被取消，返回当前画像", cycle + 1);
            }
            ResearchEvent::RunFinished {
                cycles_used,
                complete,
                ..
            } => {
                println!(
                    "✓ Dossier研究流程执行完毕，共 {} 轮，完整性: {}",
                    cycles_used + 1,
                    if *complete { "已达标" } else { "未达标" }
                );
            }
        }
    }
}

/// 空事件接收器，丢弃所有事件
pub struct NullEventSink;

impl ResearchEventSink for NullEventSink {
    fn emit(&self, _event: &ResearchEvent) {}
}
