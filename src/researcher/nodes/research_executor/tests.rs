#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::config::Config;
    use crate::researcher::context::ResearchContext;
    use crate::researcher::nodes::research_executor::{ResearchExecutor, dedup_by_url};
    use crate::search::{SearchError, SearchProvider};
    use crate::types::search::{SearchQuery, SearchResult};

    fn result(url: &str) -> SearchResult {
        SearchResult {
            source_url: url.to_string(),
            title: format!("title {}", url),
            snippet: "snippet".to_string(),
            raw_content: None,
        }
    }

    fn query(text: &str) -> SearchQuery {
        SearchQuery::new(text, "r")
    }

    /// Returns a fixed result page for every query, tagged by query text.
    struct EchoSearch;

    #[async_trait]
    impl SearchProvider for EchoSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
            Ok(vec![
                result(&format!("https://a.com/{}", query)),
                result("https://shared.com/page"),
            ])
        }
    }

    /// Fails every query.
    struct FailingSearch;

    #[async_trait]
    impl SearchProvider for FailingSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
            Err(SearchError::Http { status: 500 })
        }
    }

    /// Fails queries containing "bad", answers the rest.
    struct FlakySearch;

    #[async_trait]
    impl SearchProvider for FlakySearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
            if query.contains("bad") {
                Err(SearchError::Http { status: 429 })
            } else {
                Ok(vec![result(&format!("https://ok.com/{}", query))])
            }
        }
    }

    /// Never answers within the configured timeout.
    struct StallingSearch;

    #[async_trait]
    impl SearchProvider for StallingSearch {
        async fn search(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(vec![])
        }
    }

    fn make_context(provider: Arc<dyn SearchProvider>, timeout_seconds: u64) -> ResearchContext {
        let mut config = Config::default();
        config.search.timeout_seconds = timeout_seconds;
        config.cache.enabled = false;
        ResearchContext::with_search_client(config, provider).unwrap()
    }

    #[test]
    fn test_dedup_by_url_keeps_first_occurrence() {
        let results = vec![
            result("https://a.com"),
            result("https://b.com"),
            result("https://a.com"),
        ];

        let unique = dedup_by_url(results);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].source_url, "https://a.com");
        assert_eq!(unique[1].source_url, "https://b.com");
    }

    #[tokio::test]
    async fn test_execute_flattens_and_dedups_across_queries() {
        let context = make_context(Arc::new(EchoSearch), 5);
        let queries = vec![query("q1"), query("q2")];

        let (results, failed) = ResearchExecutor::execute(&context, &queries).await;

        assert_eq!(failed, 0);
        // the shared URL appears once, plus one unique URL per query
        assert_eq!(results.len(), 3);
        let urls: Vec<&str> = results.iter().map(|r| r.source_url.as_str()).collect();
        assert!(urls.contains(&"https://shared.com/page"));
    }

    #[tokio::test]
    async fn test_execute_partial_failure_keeps_other_results() {
        let context = make_context(Arc::new(FlakySearch), 5);
        let queries = vec![query("good"), query("bad"), query("also good")];

        let (results, failed) = ResearchExecutor::execute(&context, &queries).await;

        assert_eq!(failed, 1);
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_execute_all_failed_yields_empty_not_error() {
        let context = make_context(Arc::new(FailingSearch), 5);
        let queries = vec![query("q1"), query("q2")];

        let (results, failed) = ResearchExecutor::execute(&context, &queries).await;

        assert_eq!(failed, 2);
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_execute_timeout_counts_as_failure() {
        let context = make_context(Arc::new(StallingSearch), 1);
        let queries = vec![query("q1")];

        let (results, failed) = ResearchExecutor::execute(&context, &queries).await;

        assert_eq!(failed, 1);
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_execute_empty_query_batch() {
        let context = make_context(Arc::new(EchoSearch), 5);

        let (results, failed) = ResearchExecutor::execute(&context, &[]).await;

        assert_eq!(failed, 0);
        assert!(results.is_empty());
    }
}
