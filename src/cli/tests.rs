#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use crate::config::LLMProvider;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_args_default_values() {
        let args = Args::try_parse_from(["deepdossier-rs"]).unwrap();

        assert!(args.name.is_none());
        assert!(args.email.is_none());
        assert!(args.company.is_none());
        assert_eq!(args.output_path, PathBuf::from("./dossier.out"));
        assert!(!args.verbose);
        assert!(!args.no_cache);
        assert!(!args.force_refresh);
    }

    #[test]
    fn test_args_seed_fields() {
        let args = Args::try_parse_from([
            "deepdossier-rs",
            "-n", "Jane Doe",
            "-e", "jane@acme.com",
            "--company", "Acme",
            "--linkedin", "https://linkedin.com/in/janedoe",
            "--role", "CTO",
            "--notes", "met at RustConf",
        ])
        .unwrap();

        let seed = args.seed();
        assert_eq!(seed.name.as_deref(), Some("Jane Doe"));
        assert_eq!(seed.email.as_deref(), Some("jane@acme.com"));
        assert_eq!(seed.company.as_deref(), Some("Acme"));
        assert_eq!(seed.linkedin.as_deref(), Some("https://linkedin.com/in/janedoe"));
        assert_eq!(seed.role.as_deref(), Some("CTO"));
        assert_eq!(seed.notes.as_deref(), Some("met at RustConf"));
    }

    #[test]
    fn test_into_config_research_overrides() {
        let args = Args::try_parse_from([
            "deepdossier-rs",
            "-n", "Jane Doe",
            "--max-cycles", "4",
            "--max-queries", "5",
            "--required-fields", "Email, Role,,linkedin",
        ])
        .unwrap();

        let config = args.into_config();
        assert_eq!(config.research.max_cycles, 4);
        assert_eq!(config.research.max_queries_per_cycle, 5);
        // required fields are normalized to lowercase, blanks dropped
        assert_eq!(
            config.research.required_fields,
            vec!["email", "role", "linkedin"]
        );
    }

    #[test]
    fn test_into_config_llm_overrides() {
        let args = Args::try_parse_from([
            "deepdossier-rs",
            "--llm-provider", "deepseek",
            "--llm-api-key", "k1",
            "--llm-api-base-url", "https://example.com/v1",
            "--model-efficient", "eff-model",
            "--max-tokens", "4096",
            "--temperature", "0.7",
        ])
        .unwrap();

        let config = args.into_config();
        assert_eq!(config.llm.provider, LLMProvider::DeepSeek);
        assert_eq!(config.llm.api_key, "k1");
        assert_eq!(config.llm.api_base_url, "https://example.com/v1");
        assert_eq!(config.llm.model_efficient, "eff-model");
        // without an explicit powerful model, the efficient model is reused
        assert_eq!(config.llm.model_powerful, "eff-model");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.llm.temperature, 0.7);
    }

    #[test]
    fn test_into_config_unknown_provider_keeps_default() {
        let args = Args::try_parse_from(["deepdossier-rs", "--llm-provider", "wat"]).unwrap();

        let config = args.into_config();
        assert_eq!(config.llm.provider, LLMProvider::OpenAI);
    }

    #[test]
    fn test_into_config_search_override() {
        let args =
            Args::try_parse_from(["deepdossier-rs", "--search-api-key", "tvly-key"]).unwrap();

        let config = args.into_config();
        assert_eq!(config.search.api_key, "tvly-key");
    }

    #[test]
    fn test_into_config_cache_flags() {
        let args =
            Args::try_parse_from(["deepdossier-rs", "--no-cache", "--force-refresh"]).unwrap();

        let config = args.into_config();
        assert!(!config.cache.enabled);
        assert!(config.force_refresh);
    }

    #[test]
    fn test_into_config_target_language() {
        use crate::i18n::TargetLanguage;

        let args =
            Args::try_parse_from(["deepdossier-rs", "--target-language", "en"]).unwrap();

        let config = args.into_config();
        assert_eq!(config.target_language, TargetLanguage::English);
    }

    #[test]
    fn test_into_config_and_seed() {
        let args = Args::try_parse_from([
            "deepdossier-rs",
            "-n", "Jane Doe",
            "--company", "Acme",
            "-v",
        ])
        .unwrap();

        let (config, seed) = args.into_config_and_seed();
        assert!(config.verbose);
        assert_eq!(seed.name.as_deref(), Some("Jane Doe"));
        assert_eq!(seed.company.as_deref(), Some("Acme"));
        assert!(!seed.is_empty());
    }
}
