#[cfg(test)]
mod tests {
    use crate::researcher::state::ResearchState;
    use crate::types::person::Seed;
    use crate::types::search::{SearchQuery, SearchResult};

    fn seed_with_name_company() -> Seed {
        Seed {
            name: Some("Jane Doe".to_string()),
            company: Some("Acme".to_string()),
            ..Default::default()
        }
    }

    fn result(url: &str) -> SearchResult {
        SearchResult {
            source_url: url.to_string(),
            title: "t".to_string(),
            snippet: "s".to_string(),
            raw_content: None,
        }
    }

    #[test]
    fn test_new_state_initial_values() {
        let state = ResearchState::new(seed_with_name_company()).unwrap();

        assert_eq!(state.cycle_count, 0);
        assert!(!state.terminal);
        assert!(state.profile.is_empty());
        assert!(state.history.is_empty());
        assert!(state.last_verdict.is_none());
    }

    #[test]
    fn test_empty_seed_is_rejected() {
        assert!(ResearchState::new(Seed::default()).is_err());

        // blank-only fields count as empty
        let blank = Seed {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(ResearchState::new(blank).is_err());
    }

    #[test]
    fn test_single_field_seed_is_accepted() {
        let seed = Seed {
            email: Some("jane@acme.com".to_string()),
            ..Default::default()
        };
        assert!(ResearchState::new(seed).is_ok());
    }

    #[test]
    fn test_record_cycle_and_issued_query_texts() {
        let mut state = ResearchState::new(seed_with_name_company()).unwrap();

        state.record_cycle(
            vec![SearchQuery::new("Jane Doe Acme", "find profile")],
            vec![result("https://a.com")],
        );
        state.cycle_count += 1;
        state.record_cycle(
            vec![SearchQuery::new("Jane Doe Acme email", "find email")],
            vec![],
        );

        assert_eq!(state.history.len(), 2);
        assert_eq!(state.history[0].cycle, 0);
        assert_eq!(state.history[1].cycle, 1);
        assert_eq!(
            state.issued_query_texts(),
            vec!["Jane Doe Acme", "Jane Doe Acme email"]
        );
    }

    #[test]
    fn test_required_fields_configured_takes_precedence() {
        let state = ResearchState::new(seed_with_name_company()).unwrap();
        let configured = vec!["email".to_string(), "location".to_string()];

        assert_eq!(state.required_fields(&configured), configured);
    }

    #[test]
    fn test_required_fields_derived_from_seed_gaps() {
        let state = ResearchState::new(seed_with_name_company()).unwrap();

        // name and company are provided, so the derivable gaps remain
        assert_eq!(state.required_fields(&[]), vec!["email", "role", "linkedin"]);
    }

    #[test]
    fn test_seed_descriptor_format() {
        let seed = Seed {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@acme.com".to_string()),
            ..Default::default()
        };
        let descriptor = seed.descriptor();

        assert!(descriptor.contains("Name: Jane Doe"));
        assert!(descriptor.contains("Email: jane@acme.com"));
        assert!(!descriptor.contains("Company"));
    }

    #[test]
    fn test_seed_sanity_warnings() {
        let seed = Seed {
            name: Some("Jane Doe".to_string()),
            email: Some("not-an-email".to_string()),
            linkedin: Some("https://example.com/janedoe".to_string()),
            ..Default::default()
        };
        assert_eq!(seed.sanity_warnings().len(), 2);

        let clean = Seed {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@acme.com".to_string()),
            linkedin: Some("https://www.linkedin.com/in/jane-doe".to_string()),
            ..Default::default()
        };
        assert!(clean.sanity_warnings().is_empty());
    }
}
