use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use crate::i18n::TargetLanguage;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::Mistral => write!(f, "mistral"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Gemini => write!(f, "gemini"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// 输出路径
    pub output_path: PathBuf,

    /// 内部工作目录路径 (.dossier)
    pub internal_path: PathBuf,

    /// 叙述性内容的目标语言
    pub target_language: TargetLanguage,

    /// 研究循环配置
    pub research: ResearchConfig,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 搜索服务配置
    pub search: SearchConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// 强制重新研究（忽略已有缓存）
    pub force_refresh: bool,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 研究循环配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResearchConfig {
    /// 首轮之外允许的最大追加循环数
    pub max_cycles: u32,

    /// 每轮生成的最大查询数
    pub max_queries_per_cycle: usize,

    /// 外部指定的必填字段集合，为空时按种子缺失字段推导
    pub required_fields: Vec<String>,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，优先用于Dossier引擎的常规推理任务
    pub model_efficient: String,

    /// 高质量模型，优先用于Dossier引擎的复杂推理任务，以及作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次调用的超时时间（秒）
    pub timeout_seconds: u64,
}

/// 搜索服务配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    /// 搜索服务API KEY
    pub api_key: String,

    /// 搜索服务API地址
    pub api_base_url: String,

    /// 单条查询返回的最大结果数
    pub max_results: usize,

    /// 结果的时效窗口（天）
    pub days: u32,

    /// 搜索深度（basic / advanced）
    pub search_depth: String,

    /// 是否请求网页完整内容
    pub include_raw_content: bool,

    /// 单条查询的超时时间（秒）
    pub timeout_seconds: u64,

    /// 单个来源完整内容送入提示词前的token上限
    pub raw_content_token_limit: usize,
}

/// 缓存配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,

    /// 缓存过期时间（小时）
    pub expire_hours: u64,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// 校验凭证完整性。凭证缺失是致命配置错误，必须在任何研究循环开始前暴露
    pub fn validate_credentials(&self) -> Result<()> {
        if self.llm.api_key.trim().is_empty() {
            bail!(
                "缺少LLM API KEY，请通过环境变量 DOSSIER_LLM_API_KEY、配置文件或 --llm-api-key 提供"
            );
        }
        if self.search.api_key.trim().is_empty() {
            bail!(
                "缺少搜索服务API KEY，请通过环境变量 DOSSIER_SEARCH_API_KEY / TAVILY_API_KEY、配置文件或 --search-api-key 提供"
            );
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("./dossier.out"),
            internal_path: PathBuf::from("./.dossier"),
            target_language: TargetLanguage::default(),
            research: ResearchConfig::default(),
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            cache: CacheConfig::default(),
            force_refresh: false,
            verbose: false,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_cycles: 2,
            max_queries_per_cycle: 4,
            required_fields: vec![],
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("DOSSIER_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api-inference.modelscope.cn/v1"),
            model_efficient: String::from("Qwen/Qwen3-Next-80B-A3B-Instruct"),
            model_powerful: String::from("Qwen/Qwen3-235B-A22B-Instruct-2507"),
            max_tokens: 131072,
            temperature: 0.1,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 120,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("DOSSIER_SEARCH_API_KEY")
                .or_else(|_| std::env::var("TAVILY_API_KEY"))
                .unwrap_or_default(),
            api_base_url: String::from("https://api.tavily.com"),
            max_results: 3,
            days: 360,
            search_depth: String::from("basic"),
            include_raw_content: true,
            timeout_seconds: 30,
            raw_content_token_limit: 1000,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".dossier/cache"),
            expire_hours: 72,
        }
    }
}
