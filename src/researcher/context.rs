use std::sync::Arc;

use anyhow::Result;

use crate::{
    cache::CacheManager,
    config::Config,
    llm::client::LLMClient,
    search::{SearchProvider, TavilyClient},
};

/// 研究上下文，聚合一次运行所需的外部协作方
#[derive(Clone)]
pub struct ResearchContext {
    /// LLM调用器，用于与AI通信。
    pub llm_client: LLMClient,
    /// 搜索服务客户端
    pub search_client: Arc<dyn SearchProvider>,
    /// 配置
    pub config: Config,
    /// 缓存管理器
    pub cache_manager: Arc<CacheManager>,
}

impl ResearchContext {
    /// 创建新的研究上下文
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.clone())?;
        let search_client: Arc<dyn SearchProvider> =
            Arc::new(TavilyClient::new(config.search.clone())?);
        let cache_manager = Arc::new(CacheManager::new(config.cache.clone()));

        Ok(Self {
            llm_client,
            search_client,
            config,
            cache_manager,
        })
    }

    /// 以自定义搜索实现构建上下文，供扩展与测试使用
    pub fn with_search_client(
        config: Config,
        search_client: Arc<dyn SearchProvider>,
    ) -> Result<Self> {
        let llm_client = LLMClient::new(config.clone())?;
        let cache_manager = Arc::new(CacheManager::new(config.cache.clone()));

        Ok(Self {
            llm_client,
            search_client,
            config,
            cache_manager,
        })
    }
}
