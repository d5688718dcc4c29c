//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::{config::Config, llm::client::utils::evaluate_befitting_model};

mod providers;
pub mod utils;

use providers::ProviderClient;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: Config,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: Config) -> Result<Self> {
        let client = ProviderClient::new(&config.llm)?;
        Ok(Self { client, config })
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 正在检查模型连接...");
        // 使用一个简单的prompt来测试连接
        match self
            .prompt("System: You are a helpful assistant.", "Hello")
            .await
        {
            Ok(_) => {
                println!("✅ 模型连接正常");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }

    /// 通用重试逻辑，用于处理异步操作的重试机制
    async fn retry_with_backoff<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let llm_config = &self.config.llm;
        let max_retries = llm_config.retry_attempts;
        let retry_delay_ms = llm_config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    eprintln!(
                        "❌ 调用模型服务出错，重试中 (第 {} / {}次尝试): {}",
                        retries, max_retries, err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    // 叠加随机抖动，避免对限流中的服务造成整齐的重试尖峰
                    let jitter_ms = rand::rng().random_range(0..retry_delay_ms / 2 + 1);
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms + jitter_ms)).await;
                }
            }
        }
    }

    /// 为出站调用套上超时界限，单个无响应的服务不能拖死整个研究流程
    async fn with_timeout<T, Fut>(&self, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let timeout = Duration::from_secs(self.config.llm.timeout_seconds);
        match tokio::time::timeout(timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!(
                "调用模型服务超时（{}秒）",
                self.config.llm.timeout_seconds
            )),
        }
    }

    /// 数据提取方法
    pub async fn extract<T>(&self, system_prompt: &str, user_prompt: &str) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let (befitting_model, fallover_model) =
            evaluate_befitting_model(&self.config.llm, system_prompt, user_prompt);

        self.extract_inner(system_prompt, user_prompt, befitting_model, fallover_model)
            .await
    }

    async fn extract_inner<T>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        befitting_model: String,
        fallover_model: Option<String>,
    ) -> Result<T>
    where
        T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static,
    {
        let llm_config = &self.config.llm;

        let extractor =
            self.client
                .create_extractor::<T>(&befitting_model, system_prompt, llm_config);

        self.retry_with_backoff(|| async {
            match self.with_timeout(extractor.extract(user_prompt)).await {
                Ok(r) => Ok(r),
                Err(e) => match fallover_model {
                    Some(ref model) => {
                        eprintln!(
                            "❌ 调用模型服务出错，尝试 {} 次均失败，尝试使用备选模型{}...{}",
                            llm_config.retry_attempts, model, e
                        );
                        let user_prompt_with_fixer = format!(
                            "{}\n\n**注意事项**此前我调用大模型过程时存在错误，错误信息为“{}”，你注意你这一次要规避这个错误",
                            user_prompt, e
                        );
                        Box::pin(self.extract_inner(
                            system_prompt,
                            &user_prompt_with_fixer,
                            model.clone(),
                            None,
                        ))
                        .await
                    }
                    None => {
                        eprintln!(
                            "❌ 调用模型服务出错，尝试 {} 次均失败...{}",
                            llm_config.retry_attempts, e
                        );
                        Err(e)
                    }
                },
            }
        })
        .await
    }

    /// 单轮对话方法
    pub async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let (befitting_model, _) =
            evaluate_befitting_model(&self.config.llm, system_prompt, user_prompt);
        let agent = self
            .client
            .create_agent(&befitting_model, system_prompt, &self.config.llm);

        self.retry_with_backoff(|| async { self.with_timeout(agent.prompt(user_prompt)).await })
            .await
    }
}
