use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let url = config.store.url.trim();
    if url.is_empty() {
        errors.push("store.url: must not be empty".to_string());
    } else if let Err(e) = reqwest::Url::parse(url) {
        errors.push(format!("store.url: invalid '{}' - {}", url, e));
    } else if !(url.starts_with("https://") || url.starts_with("http://")) {
        errors.push(format!("store.url: '{}' must use http or https", url));
    }

    if config.store.anon_key.trim().is_empty() {
        errors.push("store.anon_key: must not be empty".to_string());
    }

    if let Some(ref purchase) = config.purchase {
        if let Err(e) = reqwest::Url::parse(&purchase.search_url) {
            errors.push(format!(
                "purchase.search_url: invalid '{}' - {}",
                purchase.search_url, e
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PurchaseConfig, StoreConfig, ThemeMode};

    fn config(url: &str, key: &str) -> Config {
        Config {
            store: StoreConfig {
                url: url.to_string(),
                anon_key: key.to_string(),
            },
            scoring: None,
            purchase: None,
            theme: ThemeMode::Auto,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&config("https://abcd.supabase.co", "key")).is_ok());
    }

    #[test]
    fn test_empty_url() {
        let errors = validate_config(&config("", "key")).unwrap_err();
        assert!(errors[0].contains("store.url"));
    }

    #[test]
    fn test_non_http_url() {
        let errors = validate_config(&config("ftp://abcd.supabase.co", "key")).unwrap_err();
        assert!(errors[0].contains("http or https"));
    }

    #[test]
    fn test_invalid_search_url() {
        let mut c = config("https://abcd.supabase.co", "key");
        c.purchase = Some(PurchaseConfig {
            search_url: "not a url".to_string(),
        });
        let errors = validate_config(&c).unwrap_err();
        assert!(errors[0].contains("purchase.search_url"));
    }

    #[test]
    fn test_collects_all_errors() {
        let errors = validate_config(&config("nope", " ")).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
