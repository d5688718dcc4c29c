#[cfg(test)]
mod tests {
    use crate::researcher::nodes::query_generator::{fallback_query, sanitize_queries};
    use crate::types::person::Seed;
    use crate::types::search::SearchQuery;

    fn query(text: &str) -> SearchQuery {
        SearchQuery::new(text, "r")
    }

    #[test]
    fn test_sanitize_drops_blank_and_duplicate_texts() {
        let raw = vec![
            query("  Jane Doe Acme  "),
            query(""),
            query("Jane Doe Acme"),
            query("Jane Doe CTO"),
        ];

        let cleaned = sanitize_queries(raw, &[], 5);

        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].text, "Jane Doe Acme");
        assert_eq!(cleaned[1].text, "Jane Doe CTO");
    }

    #[test]
    fn test_sanitize_rejects_verbatim_history_repeats() {
        let raw = vec![query("Jane Doe Acme"), query("Jane Doe email")];
        let issued = vec!["Jane Doe Acme"];

        let cleaned = sanitize_queries(raw, &issued, 5);

        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].text, "Jane Doe email");
    }

    #[test]
    fn test_sanitize_truncates_to_max() {
        let raw = vec![query("q1"), query("q2"), query("q3"), query("q4"), query("q5")];

        let cleaned = sanitize_queries(raw, &[], 3);

        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned[2].text, "q3");
    }

    #[test]
    fn test_sanitize_all_filtered_yields_empty() {
        let raw = vec![query("old")];
        let issued = vec!["old"];

        assert!(sanitize_queries(raw, &issued, 3).is_empty());
    }

    #[test]
    fn test_fallback_query_joins_seed_fields() {
        let seed = Seed {
            name: Some("Jane Doe".to_string()),
            company: Some("Acme".to_string()),
            role: Some("CTO".to_string()),
            ..Default::default()
        };

        let fallback = fallback_query(&seed);
        assert_eq!(fallback.text, "Jane Doe Acme CTO");
    }

    #[test]
    fn test_fallback_query_is_deterministic() {
        let seed = Seed {
            name: Some("Jane Doe".to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        };

        assert_eq!(fallback_query(&seed).text, fallback_query(&seed).text);
    }

    #[test]
    fn test_fallback_query_email_only_seed() {
        let seed = Seed {
            email: Some("jane@acme.com".to_string()),
            ..Default::default()
        };

        assert_eq!(fallback_query(&seed).text, "jane@acme.com");
    }

    #[test]
    fn test_fallback_query_linkedin_only_seed() {
        let seed = Seed {
            linkedin: Some("https://linkedin.com/in/janedoe".to_string()),
            ..Default::default()
        };

        assert_eq!(
            fallback_query(&seed).text,
            "https://linkedin.com/in/janedoe"
        );
    }
}
