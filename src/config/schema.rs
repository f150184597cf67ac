use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;

/// Default storefront searched by "Buy From Others"
pub const DEFAULT_SEARCH_URL: &str = "https://priceoye.pk/search";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub store: StoreConfig,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,

    #[serde(default)]
    pub purchase: Option<PurchaseConfig>,

    /// Color theme: "auto", "dark" or "light"
    #[serde(default)]
    pub theme: ThemeMode,
}

impl Config {
    /// Scoring config with defaults filled in
    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    /// Base URL for outbound purchase searches
    pub fn search_url(&self) -> &str {
        self.purchase
            .as_ref()
            .map(|p| p.search_url.as_str())
            .unwrap_or(DEFAULT_SEARCH_URL)
    }
}

/// Connection details for the backend project.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Project URL, e.g. https://abcd.supabase.co
    pub url: String,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PurchaseConfig {
    pub search_url: String,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::BikeVariant;

    #[test]
    fn test_minimal_config_parse() {
        let yaml = r#"
store:
  url: "https://abcd.supabase.co"
  anon_key: "public-key"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.store.url, "https://abcd.supabase.co");
        assert!(config.scoring.is_none());
        assert_eq!(config.theme, ThemeMode::Auto);
        assert_eq!(config.search_url(), DEFAULT_SEARCH_URL);
        assert_eq!(config.effective_scoring(), ScoringConfig::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
store:
  url: "https://abcd.supabase.co"
  anon_key: "public-key"
scoring:
  bike_variant: lifetime_co2
purchase:
  search_url: "https://shop.example.com/find"
theme: light
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(
            config.effective_scoring().bike_variant,
            BikeVariant::LifetimeCo2
        );
        assert_eq!(config.search_url(), "https://shop.example.com/find");
        assert_eq!(config.theme, ThemeMode::Light);
    }

    #[test]
    fn test_missing_store_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("theme: dark");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = r#"
store:
  url: "https://abcd.supabase.co"
  anon_key: "k"
queries: []
"#;
        let result: Result<Config, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            store: StoreConfig {
                url: "https://abcd.supabase.co".to_string(),
                anon_key: "k".to_string(),
            },
            scoring: Some(ScoringConfig::default()),
            purchase: Some(PurchaseConfig::default()),
            theme: ThemeMode::Dark,
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
