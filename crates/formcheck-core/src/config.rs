//! Application configuration

use crate::language::Language;
use crate::schema::SchemaRegistry;
use std::env;
use std::path::PathBuf;

/// Process-level settings shared by every validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Language used when the user has not picked one
    pub default_language: Language,

    /// Languages enabled for this deployment (subset of [`Language::ALL`])
    pub supported_languages: Vec<Language>,

    /// Directory holding `empty_json_{en,he}.json`; bundled templates when unset
    pub templates_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `DEFAULT_LANGUAGE`: `en` or `he` (default: `en`; unknown values fall back to `en`)
    /// - `SUPPORTED_LANGUAGES`: comma-separated tags (default: `en,he`; unknown tags are skipped)
    /// - `FORMCHECK_TEMPLATES_DIR`: template directory (default: bundled templates)
    #[must_use = "creates config from environment variables"]
    pub fn from_env() -> Self {
        let default_language = env::var("DEFAULT_LANGUAGE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        let supported_languages = env::var("SUPPORTED_LANGUAGES")
            .map(|s| parse_language_list(&s))
            .unwrap_or_else(|_| Language::ALL.to_vec());

        let templates_dir = env::var("FORMCHECK_TEMPLATES_DIR").ok().map(PathBuf::from);

        Self {
            default_language,
            supported_languages,
            templates_dir,
        }
    }

    /// Build the template registry this configuration points at.
    #[must_use]
    pub fn schema_registry(&self) -> SchemaRegistry {
        self.templates_dir
            .as_deref()
            .map_or_else(SchemaRegistry::bundled, SchemaRegistry::load_from_dir)
    }

    #[must_use]
    pub fn is_supported(&self, language: Language) -> bool {
        self.supported_languages.contains(&language)
    }
}

impl Default for AppConfig {
    #[inline]
    fn default() -> Self {
        Self {
            default_language: Language::English,
            supported_languages: Language::ALL.to_vec(),
            templates_dir: None,
        }
    }
}

fn parse_language_list(list: &str) -> Vec<Language> {
    let mut languages = Vec::new();
    for tag in list.split(',').filter(|t| !t.trim().is_empty()) {
        match tag.parse::<Language>() {
            Ok(lang) if !languages.contains(&lang) => languages.push(lang),
            Ok(_) => {}
            Err(e) => log::warn!("Ignoring SUPPORTED_LANGUAGES entry: {e}"),
        }
    }
    languages
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.default_language, Language::English);
        assert!(config.is_supported(Language::Hebrew));
        assert!(config.templates_dir.is_none());
    }

    #[test]
    fn test_parse_language_list_skips_unknown_and_duplicates() {
        assert_eq!(
            parse_language_list("he, fr,en,he"),
            vec![Language::Hebrew, Language::English]
        );
        assert!(parse_language_list("").is_empty());
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        env::set_var("DEFAULT_LANGUAGE", "he");
        env::set_var("SUPPORTED_LANGUAGES", "he");
        env::set_var("FORMCHECK_TEMPLATES_DIR", "/srv/templates");

        let config = AppConfig::from_env();
        assert_eq!(config.default_language, Language::Hebrew);
        assert_eq!(config.supported_languages, vec![Language::Hebrew]);
        assert!(!config.is_supported(Language::English));
        assert_eq!(config.templates_dir, Some(PathBuf::from("/srv/templates")));

        env::remove_var("DEFAULT_LANGUAGE");
        env::remove_var("SUPPORTED_LANGUAGES");
        env::remove_var("FORMCHECK_TEMPLATES_DIR");
    }

    #[test]
    #[serial]
    fn test_unknown_default_language_falls_back_to_english() {
        env::set_var("DEFAULT_LANGUAGE", "fr");
        assert_eq!(AppConfig::from_env().default_language, Language::English);
        env::remove_var("DEFAULT_LANGUAGE");
    }

    #[test]
    fn test_bundled_registry_without_templates_dir() {
        let registry = AppConfig::default().schema_registry();
        assert!(registry.get(Language::English).is_available());
    }
}
