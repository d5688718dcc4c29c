#[cfg(test)]
mod tests {
    use crate::config::SearchConfig;
    use crate::search::{SearchError, TavilyClient, TavilyResponse};
    use crate::types::search::SearchResult;

    #[test]
    fn test_tavily_response_parsing() {
        let body = r#"{
            "query": "Jane Doe Acme",
            "results": [
                {
                    "url": "https://acme.com/team/jane",
                    "title": "Jane Doe - Acme",
                    "content": "Jane Doe is the CTO of Acme.",
                    "raw_content": "Full page text here.",
                    "score": 0.98
                },
                {
                    "url": "https://news.example.com/acme-cto",
                    "title": "Acme names new CTO",
                    "content": "Acme announced Jane Doe as CTO."
                }
            ]
        }"#;

        let parsed: TavilyResponse = serde_json::from_str(body).unwrap();
        let results: Vec<SearchResult> = parsed.results.into_iter().map(Into::into).collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source_url, "https://acme.com/team/jane");
        assert_eq!(results[0].title, "Jane Doe - Acme");
        assert_eq!(results[0].snippet, "Jane Doe is the CTO of Acme.");
        assert_eq!(results[0].raw_content.as_deref(), Some("Full page text here."));
        assert!(results[1].raw_content.is_none());
    }

    #[test]
    fn test_tavily_response_parsing_empty_results() {
        let parsed: TavilyResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(parsed.results.is_empty());

        // Tavily may omit the results array entirely
        let parsed: TavilyResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.results.is_empty());
    }

    #[test]
    fn test_tavily_client_endpoint() {
        let config = SearchConfig {
            api_base_url: "https://api.tavily.com/".to_string(),
            ..Default::default()
        };
        let client = TavilyClient::new(config).unwrap();

        assert_eq!(client.endpoint(), "https://api.tavily.com/search");
    }

    #[test]
    fn test_search_error_display() {
        let timeout = SearchError::Timeout {
            query: "Jane Doe".to_string(),
            timeout_seconds: 30,
        };
        assert!(timeout.to_string().contains("Jane Doe"));

        let http = SearchError::Http { status: 502 };
        assert!(http.to_string().contains("502"));
    }
}
