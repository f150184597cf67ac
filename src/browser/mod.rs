use anyhow::{Context, Result};
use reqwest::Url;

/// Build the "buy from others" search link for a product name.
///
/// The name goes into the `q` query parameter, percent-encoded.
pub fn purchase_url(search_url: &str, product_name: &str) -> Result<String> {
    let url = Url::parse_with_params(search_url, &[("q", product_name.trim())])
        .with_context(|| format!("Invalid purchase search URL: {}", search_url))?;
    Ok(url.into())
}

/// Open a URL in the user's default browser
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SEARCH_URL;

    #[test]
    fn test_purchase_url_plain_name() {
        assert_eq!(
            purchase_url(DEFAULT_SEARCH_URL, "Infinix").unwrap(),
            "https://priceoye.pk/search?q=Infinix"
        );
    }

    #[test]
    fn test_purchase_url_encodes_spaces_and_ampersands() {
        let url = purchase_url(DEFAULT_SEARCH_URL, " Dawlance Inverter & Co ").unwrap();
        assert_eq!(url, "https://priceoye.pk/search?q=Dawlance+Inverter+%26+Co");
    }

    #[test]
    fn test_purchase_url_custom_base() {
        let url = purchase_url("https://shop.example.com/find?lang=en", "Honda CD 70").unwrap();
        assert_eq!(url, "https://shop.example.com/find?lang=en&q=Honda+CD+70");
    }

    #[test]
    fn test_purchase_url_invalid_base() {
        assert!(purchase_url("not a url", "x").is_err());
    }
}
