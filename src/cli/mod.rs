use crate::config::{Config, LLMProvider};
use crate::i18n::TargetLanguage;
use crate::types::person::Seed;
use clap::Parser;
use std::path::PathBuf;

/// DeepDossier-RS - 由Rust与AI驱动的人物研究引擎
#[derive(Parser, Debug)]
#[command(name = "Dossier (deepdossier-rs)")]
#[command(
    about = "AI-based person research engine. Given a sparse description of a person, it iteratively generates search queries, gathers web evidence, and converges on a structured, source-attributed profile."
)]
#[command(author = "Sopaco")]
#[command(version)]
pub struct Args {
    /// 姓名
    #[arg(short, long)]
    pub name: Option<String>,

    /// 邮箱
    #[arg(short, long)]
    pub email: Option<String>,

    /// 公司
    #[arg(long)]
    pub company: Option<String>,

    /// LinkedIn主页URL
    #[arg(long)]
    pub linkedin: Option<String>,

    /// 职位
    #[arg(long)]
    pub role: Option<String>,

    /// 自由文本补充说明
    #[arg(long)]
    pub notes: Option<String>,

    /// 输出路径
    #[arg(short, long, default_value = "./dossier.out")]
    pub output_path: PathBuf,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 首轮之外允许的最大追加循环数
    #[arg(long)]
    pub max_cycles: Option<u32>,

    /// 每轮生成的最大查询数
    #[arg(long)]
    pub max_queries: Option<usize>,

    /// 必填字段集合（逗号分隔），为空时按种子缺失字段推导
    #[arg(long)]
    pub required_fields: Option<String>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 高能效模型，优先用于Dossier引擎的常规推理任务
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，优先用于Dossier引擎的复杂推理任务，以及作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 搜索服务API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// LLM Provider (openai, moonshot, deepseek, mistral, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// 叙述性内容的目标语言 (zh, en, ja, ko, de, fr, ru)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 是否禁用缓存
    #[arg(long)]
    pub no_cache: bool,

    /// 强制重新研究（忽略已有缓存）
    #[arg(long)]
    pub force_refresh: bool,
}

impl Args {
    /// 将CLI参数拆解为配置与研究种子
    pub fn into_config_and_seed(self) -> (Config, Seed) {
        let seed = self.seed();
        let config = self.into_config();
        (config, seed)
    }

    /// 从CLI参数提取研究种子
    pub fn seed(&self) -> Seed {
        Seed {
            name: self.name.clone(),
            email: self.email.clone(),
            company: self.company.clone(),
            linkedin: self.linkedin.clone(),
            role: self.role.clone(),
            notes: self.notes.clone(),
        }
    }

    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Config {
        let mut config = if let Some(config_path) = &self.config {
            // 如果显式指定了配置文件路径，从该路径加载
            Config::from_file(config_path).unwrap_or_else(|_| {
                panic!("⚠️ 警告: 无法读取配置文件 {:?}", config_path)
            })
        } else {
            // 如果没有显式指定配置文件，尝试从默认位置加载
            let default_config_path = std::env::current_dir()
                .unwrap_or_else(|_| std::path::PathBuf::from("."))
                .join("dossier.toml");

            if default_config_path.exists() {
                Config::from_file(&default_config_path).unwrap_or_else(|_| {
                    panic!(
                        "⚠️ 警告: 无法读取默认配置文件 {:?}",
                        default_config_path
                    )
                })
            } else {
                // 默认配置文件不存在，使用默认值
                Config::default()
            }
        };

        config.output_path = self.output_path;

        // 覆盖研究循环配置
        if let Some(max_cycles) = self.max_cycles {
            config.research.max_cycles = max_cycles;
        }
        if let Some(max_queries) = self.max_queries {
            config.research.max_queries_per_cycle = max_queries;
        }
        if let Some(required_fields) = self.required_fields {
            config.research.required_fields = required_fields
                .split(',')
                .map(|f| f.trim().to_lowercase())
                .filter(|f| !f.is_empty())
                .collect();
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            if let Ok(provider) = provider_str.parse::<LLMProvider>() {
                config.llm.provider = provider;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的provider: {}，使用默认provider",
                    provider_str
                );
            }
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        } else {
            config.llm.model_powerful = config.llm.model_efficient.to_string();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }

        // 覆盖搜索配置
        if let Some(search_api_key) = self.search_api_key {
            config.search.api_key = search_api_key;
        }

        // 目标语言配置
        if let Some(target_language_str) = self.target_language {
            if let Ok(target_language) = target_language_str.parse::<TargetLanguage>() {
                config.target_language = target_language;
            } else {
                eprintln!(
                    "⚠️ 警告: 未知的目标语言: {}，使用默认语言 (中文)",
                    target_language_str
                );
            }
        }

        // 缓存配置
        if self.no_cache {
            config.cache.enabled = false;
        }

        // 其他配置
        config.force_refresh = self.force_refresh;
        config.verbose = self.verbose;

        config
    }
}

// Include tests
#[cfg(test)]
mod tests;
