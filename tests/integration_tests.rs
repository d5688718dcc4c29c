use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

use deepdossier_rs::config::Config;
use deepdossier_rs::outlet;
use deepdossier_rs::researcher::events::{NullEventSink, ResearchEvent, ResearchEventSink};
use deepdossier_rs::researcher::nodes::{FieldCandidate, ResearchNodes};
use deepdossier_rs::researcher::runner::{GraphRunner, RunnerOptions};
use deepdossier_rs::researcher::state::ResearchState;
use deepdossier_rs::types::person::{Confidence, Seed};
use deepdossier_rs::types::search::{SearchQuery, SearchResult};
use deepdossier_rs::types::verdict::ReflectionVerdict;

/// 模拟一个"网络"：查询文本到结果页的固定映射，提取候选按URL查表。
/// 评估端采用确定性的必填字段检查，与生产逻辑同构
struct FakeWebNodes {
    pages: HashMap<String, Vec<SearchResult>>,
    facts: HashMap<String, Vec<FieldCandidate>>,
}

impl FakeWebNodes {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            facts: HashMap::new(),
        }
    }

    fn with_page(
        mut self,
        query_fragment: &str,
        url: &str,
        facts: Vec<(&str, &str, Confidence)>,
    ) -> Self {
        self.pages
            .entry(query_fragment.to_string())
            .or_default()
            .push(SearchResult {
                source_url: url.to_string(),
                title: format!("page at {}", url),
                snippet: "evidence".to_string(),
                raw_content: None,
            });
        self.facts.insert(
            url.to_string(),
            facts
                .into_iter()
                .map(|(field, value, confidence)| FieldCandidate {
                    field: field.to_string(),
                    value: value.to_string(),
                    confidence,
                    source_url: url.to_string(),
                })
                .collect(),
        );
        self
    }
}

#[async_trait]
impl ResearchNodes for FakeWebNodes {
    async fn generate_queries(&self, state: &ResearchState) -> Result<Vec<SearchQuery>> {
        // deterministic query plan: target the currently missing fields
        let missing = match &state.last_verdict {
            Some(verdict) => verdict.missing_fields.clone(),
            None => state
                .seed
                .absent_core_fields()
                .iter()
                .map(|f| f.to_string())
                .collect(),
        };
        let name = state.seed.name.clone().unwrap_or_default();
        Ok(missing
            .iter()
            .map(|field| SearchQuery::new(format!("{} {}", name, field), format!("find {}", field)))
            .collect())
    }

    async fn execute_searches(&self, queries: &[SearchQuery]) -> (Vec<SearchResult>, usize) {
        let mut results = Vec::new();
        let mut failed = 0;
        for query in queries {
            let mut hit = false;
            for (fragment, pages) in &self.pages {
                if query.text.contains(fragment) {
                    results.extend(pages.clone());
                    hit = true;
                }
            }
            if !hit {
                failed += 1;
            }
        }
        // dedup by URL, first occurrence wins
        let mut seen = Vec::new();
        results.retain(|r| {
            if seen.contains(&r.source_url) {
                false
            } else {
                seen.push(r.source_url.clone());
                true
            }
        });
        (results, failed)
    }

    async fn extract_candidates(
        &self,
        _state: &ResearchState,
        results: &[SearchResult],
    ) -> Result<Vec<FieldCandidate>> {
        Ok(results
            .iter()
            .filter_map(|r| self.facts.get(&r.source_url))
            .flatten()
            .cloned()
            .collect())
    }

    async fn evaluate(
        &self,
        state: &ResearchState,
        required_fields: &[String],
    ) -> Result<ReflectionVerdict> {
        let missing: Vec<String> = required_fields
            .iter()
            .filter(|field| state.profile.get(field).is_none())
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(ReflectionVerdict::complete("all required fields filled"))
        } else {
            Ok(ReflectionVerdict::incomplete(missing, "gaps remain"))
        }
    }
}

/// 记录事件序列，校验追踪事件的顺序与内容
#[derive(Default)]
struct RecordingSink {
    labels: std::sync::Mutex<Vec<String>>,
}

impl ResearchEventSink for RecordingSink {
    fn emit(&self, event: &ResearchEvent) {
        let label = match event {
            ResearchEvent::RunStarted { .. } => "run_started",
            ResearchEvent::CycleStarted { .. } => "cycle_started",
            ResearchEvent::QueriesGenerated { .. } => "queries_generated",
            ResearchEvent::FallbackQueryUsed { .. } => "fallback_query",
            ResearchEvent::SearchCompleted { .. } => "search_completed",
            ResearchEvent::CandidatesMerged { .. } => "candidates_merged",
            ResearchEvent::VerdictReached { .. } => "verdict_reached",
            ResearchEvent::Cancelled { .. } => "cancelled",
            ResearchEvent::RunFinished { .. } => "run_finished",
        };
        self.labels.lock().unwrap().push(label.to_string());
    }
}

fn seed_jane() -> Seed {
    Seed {
        name: Some("Jane Doe".to_string()),
        company: Some("Acme".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_convergence_with_conflicting_evidence() {
    // the team page carries a weakly-sourced role while two independent
    // pages agree on a different one, which must win by majority of evidence
    let nodes = FakeWebNodes::new()
        .with_page(
            "email",
            "https://acme.com/team/jane",
            vec![
                ("email", "jane@acme.com", Confidence::High),
                ("role", "Engineer", Confidence::Low),
            ],
        )
        .with_page(
            "role",
            "https://news.example.com/acme-cto",
            vec![("role", "CTO", Confidence::Medium)],
        )
        .with_page(
            "role",
            "https://conf.example.com/speakers",
            vec![("role", "CTO", Confidence::Medium)],
        )
        .with_page(
            "linkedin",
            "https://linkedin.com/in/janedoe",
            vec![("linkedin", "https://linkedin.com/in/janedoe", Confidence::High)],
        );

    let runner = GraphRunner::new(
        nodes,
        RunnerOptions::default(),
        Arc::new(NullEventSink),
    );

    let outcome = runner.run(seed_jane()).await.unwrap();

    assert!(outcome.verdict.complete);
    assert_eq!(outcome.profile.get("email").unwrap().value, "jane@acme.com");
    // majority of evidence replaced the single low-confidence role
    let role = outcome.profile.get("role").unwrap();
    assert_eq!(role.value, "CTO");
    assert!(role.is_confirmed());
    assert!(!role.alternates.is_empty());
    assert_eq!(
        outcome.profile.get("linkedin").unwrap().value,
        "https://linkedin.com/in/janedoe"
    );
}

#[tokio::test]
async fn test_undiscoverable_person_terminates_at_budget() {
    // the fake web knows nothing about this person
    let nodes = FakeWebNodes::new();
    let runner = GraphRunner::new(
        nodes,
        RunnerOptions {
            max_cycles: 2,
            required_fields: vec![],
        },
        Arc::new(NullEventSink),
    );

    let outcome = runner.run(seed_jane()).await.unwrap();

    assert!(!outcome.verdict.complete);
    assert_eq!(outcome.cycles_used, 2);
    assert_eq!(outcome.history.len(), 3);
    assert!(!outcome.verdict.missing_fields.is_empty());
    assert!(outcome.profile.is_empty());
}

#[tokio::test]
async fn test_externally_configured_required_fields() {
    // only the email is required; role/linkedin gaps must not block completion
    let nodes = FakeWebNodes::new().with_page(
        "email",
        "https://acme.com/team/jane",
        vec![("email", "jane@acme.com", Confidence::High)],
    );
    let runner = GraphRunner::new(
        nodes,
        RunnerOptions {
            max_cycles: 2,
            required_fields: vec!["email".to_string()],
        },
        Arc::new(NullEventSink),
    );

    let outcome = runner.run(seed_jane()).await.unwrap();

    assert!(outcome.verdict.complete);
    assert_eq!(outcome.cycles_used, 0);
}

#[tokio::test]
async fn test_event_stream_order_for_single_cycle_run() {
    let nodes = FakeWebNodes::new().with_page(
        "email",
        "https://acme.com/team/jane",
        vec![
            ("email", "jane@acme.com", Confidence::High),
            ("role", "CTO", Confidence::Medium),
            ("linkedin", "https://linkedin.com/in/janedoe", Confidence::High),
        ],
    );
    let sink = Arc::new(RecordingSink::default());
    let runner = GraphRunner::new(nodes, RunnerOptions::default(), sink.clone());

    runner.run(seed_jane()).await.unwrap();

    let labels = sink.labels.lock().unwrap().clone();
    assert_eq!(
        labels,
        vec![
            "run_started",
            "cycle_started",
            "queries_generated",
            "search_completed",
            "candidates_merged",
            "verdict_reached",
            "run_finished",
        ]
    );
}

#[tokio::test]
async fn test_outcome_persists_through_outlet() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        output_path: temp_dir.path().join("dossier.out"),
        ..Default::default()
    };

    let nodes = FakeWebNodes::new().with_page(
        "email",
        "https://acme.com/team/jane",
        vec![
            ("email", "jane@acme.com", Confidence::High),
            ("role", "CTO", Confidence::Medium),
            ("linkedin", "https://linkedin.com/in/janedoe", Confidence::High),
        ],
    );
    let runner = GraphRunner::new(nodes, RunnerOptions::default(), Arc::new(NullEventSink));
    let outcome = runner.run(seed_jane()).await.unwrap();

    outlet::save(&config, &outcome).await.unwrap();

    assert!(config.output_path.join("profile.json").exists());
    assert!(
        config
            .output_path
            .join(config.target_language.get_report_filename())
            .exists()
    );
}
