use anyhow::{Context, Result};
use reqwest::StatusCode;

use super::error::{extract_error_message, StoreError};
use crate::catalog::Row;
use crate::config::StoreConfig;

const USER_AGENT: &str = concat!("eco-catalog/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client used for data and auth requests
pub fn create_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")
}

/// Authenticated client for the backend's tabular data API.
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    access_token: String,
}

impl StoreClient {
    pub fn new(http: reqwest::Client, config: &StoreConfig, access_token: &str) -> Self {
        Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: access_token.to_string(),
        }
    }

    /// Same client with a fresh access token (after re-authentication)
    pub fn with_access_token(&self, access_token: &str) -> Self {
        Self {
            access_token: access_token.to_string(),
            ..self.clone()
        }
    }

    /// Endpoint returning every column of every row in `table`
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}?select=*", self.base_url, table)
    }

    /// Fetch all rows of a table.
    pub async fn select(&self, table: &str) -> Result<Vec<Row>, StoreError> {
        let response = self
            .http
            .get(self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        parse_rows(&body)
    }
}

fn classify_status(status: StatusCode, body: &str) -> StoreError {
    let message = extract_error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized(message),
        _ => StoreError::Http {
            status: status.as_u16(),
            message,
        },
    }
}

/// Decode a response body into rows. Non-object array elements are skipped.
pub fn parse_rows(body: &str) -> Result<Vec<Row>, StoreError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))?;

    match value {
        serde_json::Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            })
            .collect()),
        other => Err(StoreError::Decode(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StoreClient {
        crate::install_crypto_provider();
        StoreClient::new(
            reqwest::Client::new(),
            &StoreConfig {
                url: "https://abcd.supabase.co/".to_string(),
                anon_key: "anon".to_string(),
            },
            "token",
        )
    }

    #[test]
    fn test_table_url_trims_trailing_slash() {
        assert_eq!(
            client().table_url("cars"),
            "https://abcd.supabase.co/rest/v1/cars?select=*"
        );
    }

    #[test]
    fn test_with_access_token_keeps_endpoint() {
        let refreshed = client().with_access_token("new-token");
        assert_eq!(refreshed.access_token, "new-token");
        assert_eq!(refreshed.base_url, "https://abcd.supabase.co");
    }

    #[test]
    fn test_parse_rows() {
        let rows = parse_rows(r#"[{"id":1,"name":"A"},{"id":2},3]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "A");
    }

    #[test]
    fn test_parse_rows_empty() {
        assert!(parse_rows("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rows_rejects_object() {
        let err = parse_rows(r#"{"message":"nope"}"#).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_parse_rows_rejects_invalid_json() {
        assert!(matches!(parse_rows("<html>"), Err(StoreError::Decode(_))));
    }

    #[test]
    fn test_classify_status() {
        let unauthorized = classify_status(StatusCode::UNAUTHORIZED, r#"{"message":"JWT expired"}"#);
        assert!(unauthorized.is_unauthorized());
        assert_eq!(unauthorized.to_string(), "Not authorized: JWT expired");

        let missing = classify_status(StatusCode::NOT_FOUND, "");
        assert!(matches!(missing, StoreError::Http { status: 404, .. }));
    }
}
