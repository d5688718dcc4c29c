use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::researcher::agent_executor::{AgentExecuteParams, CacheScopes, extract};
use crate::researcher::context::ResearchContext;
use crate::researcher::state::ResearchState;
use crate::types::person::{AlternateValue, Confidence, Profile, ProfileField, SourceRef};
use crate::types::search::SearchResult;
use crate::utils::token_estimator::TokenEstimator;

/// LLM从证据中提出的单个字段候选值
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldCandidate {
    /// 字段名（如 name、email、company、role、linkedin、years_experience）
    pub field: String,
    /// 候选值
    pub value: String,
    /// 置信度
    pub confidence: Confidence,
    /// 该候选值出自哪个来源URL
    pub source_url: String,
}

/// LLM返回的提取批次
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionOutcome {
    /// 从证据中提取的字段候选列表
    pub candidates: Vec<FieldCandidate>,
}

const EXTRACTION_SYSTEM_PROMPT: &str = r#"你是一个专业的信息提取分析师，负责从网页搜索证据中提取人物画像字段。

你的任务是阅读给定的网页证据，为目标人物提出字段候选值：
1. 常见字段：name、email、company、role、linkedin；也可以提出 years_experience、location 等扩展字段
2. 每个候选值必须注明它出自哪个来源URL，不得编造证据中不存在的信息
3. 按证据质量给出置信度：官方主页、LinkedIn等一手来源为high，新闻报道为medium，间接推断为low
4. 同一字段在不同来源中出现不同的值时，照实全部列出，由下游合并策略裁决

请以结构化的JSON格式返回候选列表。"#;

/// 信息提取节点 - 将原始搜索结果经LLM转化为字段候选，再按确定性策略并入画像
#[derive(Default)]
pub struct Extractor;

impl Extractor {
    /// 从本轮证据中提取字段候选。零证据直接返回空批次，不触发推理
    pub async fn extract_candidates(
        context: &ResearchContext,
        state: &ResearchState,
        results: &[SearchResult],
    ) -> Result<Vec<FieldCandidate>> {
        if results.is_empty() {
            return Ok(Vec::new());
        }

        let sources = format_sources(
            results,
            context.config.search.raw_content_token_limit,
        );
        let user_prompt = format!(
            "## 调研目标人物\n{}\n\n## 网页证据\n{}\n\n{}",
            state.seed.descriptor(),
            sources,
            context.config.target_language.prompt_instruction()
        );

        let params = AgentExecuteParams {
            prompt_sys: EXTRACTION_SYSTEM_PROMPT.to_string(),
            prompt_user: user_prompt,
            cache_scope: CacheScopes::EXTRACTION.to_string(),
            log_tag: "Extractor".to_string(),
        };

        let outcome: ExtractionOutcome = extract(context, params).await?;
        Ok(sanitize_candidates(outcome.candidates))
    }
}

/// 将搜索结果格式化为提示词中的证据部分，完整抓取内容按token上限截断
pub fn format_sources(results: &[SearchResult], raw_content_token_limit: usize) -> String {
    let estimator = TokenEstimator::new();
    let mut formatted = String::from("Sources:\n\n");
    for result in results {
        formatted.push_str(&format!("Source {}:\n===\n", result.title));
        formatted.push_str(&format!("URL: {}\n===\n", result.source_url));
        formatted.push_str(&format!("摘要: {}\n===\n", result.snippet));
        if let Some(raw) = &result.raw_content {
            let bounded = estimator.truncate_to_limit(raw, raw_content_token_limit);
            formatted.push_str(&format!("完整内容: {}\n\n", bounded));
        }
    }
    formatted.trim_end().to_string()
}

/// 清洗候选批次：规范化字段名、剔除空字段/空值/无出处的条目
pub fn sanitize_candidates(raw: Vec<FieldCandidate>) -> Vec<FieldCandidate> {
    raw.into_iter()
        .filter_map(|mut candidate| {
            candidate.field = candidate.field.trim().to_lowercase();
            candidate.value = candidate.value.trim().to_string();
            candidate.source_url = candidate.source_url.trim().to_string();
            if candidate.field.is_empty()
                || candidate.value.is_empty()
                || candidate.source_url.is_empty()
            {
                return None;
            }
            Some(candidate)
        })
        .collect()
}

/// 合并策略（确定性，可离线复现，不依赖模型）：
/// - 画像中缺失的字段由最先到达的候选值填充
/// - 已有字段仅在新候选置信度严格更高，或多数证据（≥2个独立新来源一致且与现有单来源值相左）时被覆盖
/// - 已确认字段（≥2个独立来源）不会被单一新来源推翻，只有更大的一致证据群才能改写
/// - 同置信度的冲突候选保留为备选值，主值保持不变
pub fn merge_candidates(profile: &mut Profile, candidates: &[FieldCandidate], cycle: u32) {
    // 按字段分组，保持组内到达顺序
    let mut grouped: BTreeMap<String, Vec<&FieldCandidate>> = BTreeMap::new();
    for candidate in candidates {
        grouped.entry(candidate.field.clone()).or_default().push(candidate);
    }

    for (field, group) in grouped {
        merge_field(profile, &field, &group, cycle);
    }
}

fn merge_field(profile: &mut Profile, field: &str, group: &[&FieldCandidate], cycle: u32) {
    let mut pending = group.to_vec();

    // 字段缺失时，第一个候选直接成为主值
    if profile.get(field).is_none() {
        if pending.is_empty() {
            return;
        }
        let first = pending.remove(0);
        profile.insert(
            field.to_string(),
            ProfileField::new(
                first.value.clone(),
                first.confidence,
                SourceRef {
                    url: first.source_url.clone(),
                    cycle,
                },
            ),
        );
    }

    let Some(existing) = profile.get_mut(field) else {
        return;
    };

    // 与主值一致的候选只补充出处与置信度
    let (agreeing, conflicting): (Vec<_>, Vec<_>) = pending
        .into_iter()
        .partition(|c| values_equal(&c.value, &existing.value));
    for candidate in agreeing {
        existing.add_source(SourceRef {
            url: candidate.source_url.clone(),
            cycle,
        });
        existing.confidence = existing.confidence.max(candidate.confidence);
    }

    // 冲突候选按值聚类后逐簇裁决
    for cluster in cluster_by_value(&conflicting) {
        let existing_sources = existing.distinct_source_count();
        let overwrite = if existing.is_confirmed() {
            // 已确认字段需要规模更大的一致证据群才能改写
            cluster.distinct_sources >= 2 && cluster.distinct_sources > existing_sources
        } else {
            cluster.confidence > existing.confidence
                || (cluster.distinct_sources >= 2 && existing_sources == 1)
        };

        if overwrite {
            let demoted = AlternateValue {
                value: existing.value.clone(),
                confidence: existing.confidence,
                sources: existing.sources.clone(),
            };
            existing.value = cluster.value.clone();
            existing.confidence = cluster.confidence;
            existing.sources = cluster
                .urls
                .iter()
                .map(|url| SourceRef {
                    url: url.clone(),
                    cycle,
                })
                .collect();
            push_alternate(existing, demoted);
        } else {
            push_alternate(
                existing,
                AlternateValue {
                    value: cluster.value.clone(),
                    confidence: cluster.confidence,
                    sources: cluster
                        .urls
                        .iter()
                        .map(|url| SourceRef {
                            url: url.clone(),
                            cycle,
                        })
                        .collect(),
                },
            );
        }
    }
}

/// 同一字段下按候选值聚出的证据簇
struct ValueCluster {
    value: String,
    confidence: Confidence,
    urls: Vec<String>,
    distinct_sources: usize,
}

/// 将冲突候选按规范化值聚类，簇的顺序跟随首个成员的到达顺序
fn cluster_by_value(candidates: &[&FieldCandidate]) -> Vec<ValueCluster> {
    let mut clusters: Vec<ValueCluster> = Vec::new();
    for candidate in candidates {
        if let Some(cluster) = clusters
            .iter_mut()
            .find(|c| values_equal(&c.value, &candidate.value))
        {
            if !cluster.urls.contains(&candidate.source_url) {
                cluster.urls.push(candidate.source_url.clone());
            }
            cluster.confidence = cluster.confidence.max(candidate.confidence);
        } else {
            clusters.push(ValueCluster {
                value: candidate.value.clone(),
                confidence: candidate.confidence,
                urls: vec![candidate.source_url.clone()],
                distinct_sources: 0,
            });
        }
    }
    for cluster in &mut clusters {
        cluster.distinct_sources = cluster.urls.len();
    }
    clusters
}

/// 值比较忽略大小写与首尾空白
fn values_equal(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// 追加备选值，同值备选合并出处而不重复记录
fn push_alternate(field: &mut ProfileField, alternate: AlternateValue) {
    if values_equal(&alternate.value, &field.value) {
        return;
    }
    if let Some(existing) = field
        .alternates
        .iter_mut()
        .find(|a| values_equal(&a.value, &alternate.value))
    {
        for source in alternate.sources {
            if !existing.sources.iter().any(|s| s.url == source.url) {
                existing.sources.push(source);
            }
        }
        existing.confidence = existing.confidence.max(alternate.confidence);
    } else {
        field.alternates.push(alternate);
    }
}
