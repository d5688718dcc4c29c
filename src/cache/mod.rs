use anyhow::Result;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;

use crate::config::CacheConfig;

/// 缓存管理器，将LLM的结构化输出按提示词哈希落盘，避免重复推理开销
pub struct CacheManager {
    config: CacheConfig,
}

/// 缓存条目
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: u64,
    /// prompt的MD5哈希值，用于缓存键的生成和验证
    pub prompt_hash: String,
    /// 使用的模型名称（可选）
    pub model_name: Option<String>,
}

impl CacheManager {
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// 生成prompt的MD5哈希
    pub fn hash_prompt(&self, prompt: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(prompt.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// 获取缓存文件路径
    fn get_cache_path(&self, category: &str, hash: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(category)
            .join(format!("{}.json", hash))
    }

    /// 检查缓存是否过期
    fn is_expired(&self, timestamp: u64) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        let expire_seconds = self.config.expire_hours * 3600;
        now.saturating_sub(timestamp) > expire_seconds
    }

    /// 获取缓存
    pub async fn get<T>(&self, category: &str, prompt: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        if !self.config.enabled {
            return None;
        }

        let hash = self.hash_prompt(prompt);
        let cache_path = self.get_cache_path(category, &hash);

        if !cache_path.exists() {
            return None;
        }

        match fs::read_to_string(&cache_path).await {
            Ok(content) => match serde_json::from_str::<CacheEntry<T>>(&content) {
                Ok(entry) => {
                    if self.is_expired(entry.timestamp) {
                        // 删除过期缓存
                        let _ = fs::remove_file(&cache_path).await;
                        return None;
                    }
                    Some(entry.data)
                }
                Err(e) => {
                    eprintln!("⚠️ 缓存条目反序列化失败，忽略: {}", e);
                    None
                }
            },
            Err(e) => {
                eprintln!("⚠️ 缓存文件读取失败，忽略: {}", e);
                None
            }
        }
    }

    /// 写入缓存。缓存失败不影响主流程
    pub async fn store<T>(&self, category: &str, prompt: &str, data: &T) -> Result<()>
    where
        T: Serialize,
    {
        if !self.config.enabled {
            return Ok(());
        }

        let hash = self.hash_prompt(prompt);
        let cache_path = self.get_cache_path(category, &hash);

        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let entry = CacheEntry {
            data,
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or(Duration::ZERO)
                .as_secs(),
            prompt_hash: hash,
            model_name: None,
        };

        let content = serde_json::to_string(&entry)?;
        fs::write(&cache_path, content).await?;
        Ok(())
    }

    /// 清空指定类别的缓存
    pub async fn clear_category(&self, category: &str) -> Result<()> {
        let dir = self.config.cache_dir.join(category);
        if dir.exists() {
            fs::remove_dir_all(&dir).await?;
        }
        Ok(())
    }
}
