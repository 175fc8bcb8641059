//! Retriever configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Browser-like user agent; the portal rejects some default clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Which retrieval strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Direct JSON API call.
    #[default]
    Api,
    /// HTML scrape of the customer dashboard. Fragile to markup
    /// changes; use only if the API stops answering.
    Scrape,
}

/// Configuration for balance retrieval.
///
/// Endpoint URLs live here rather than in module constants so tests
/// can point a source at a stub server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Landing page fetched once per run to establish session cookies.
    pub landing_url: String,
    /// Balance query API endpoint.
    pub balance_api_url: String,
    /// Customer login page (scrape strategy).
    pub login_url: String,
    /// Post-login dashboard URL, used as a login-success signal
    /// (scrape strategy).
    pub account_info_url: String,
    /// Form field carrying the account number (scrape strategy).
    pub account_field: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Strategy selector.
    pub strategy: Strategy,
    /// Skip TLS certificate verification. The legacy script disabled
    /// verification unconditionally; here it is an explicit opt-in.
    pub accept_invalid_certs: bool,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            landing_url: "https://prepaid.desco.org.bd/customer/".to_string(),
            balance_api_url: "https://prepaid.desco.org.bd/api/tkdes/customer/getBalance"
                .to_string(),
            login_url: "https://prepaid.desco.org.bd/customer/#/customer-login".to_string(),
            account_info_url: "https://prepaid.desco.org.bd/customer/#/customer-info".to_string(),
            account_field: "account_no".to_string(),
            timeout_secs: 15,
            strategy: Strategy::Api,
            accept_invalid_certs: false,
        }
    }
}

impl RetrieverConfig {
    /// Build the HTTP client for one retrieval attempt. The cookie jar
    /// lives and dies with the client; nothing persists across runs.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(self.timeout_secs))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_defaults() {
        let config = RetrieverConfig::default();
        assert_eq!(config.strategy, Strategy::Api);
        assert_eq!(config.timeout_secs, 15);
        assert!(!config.accept_invalid_certs);
        assert!(config.balance_api_url.starts_with("https://prepaid.desco.org.bd/"));
    }

    #[test]
    fn test_config_serialization() {
        let config = RetrieverConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RetrieverConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.strategy, config.strategy);
        assert_eq!(parsed.balance_api_url, config.balance_api_url);
    }

    #[test]
    fn test_strategy_lowercase_names() {
        assert_eq!(serde_json::to_string(&Strategy::Api).unwrap(), "\"api\"");
        assert_eq!(
            serde_json::from_str::<Strategy>("\"scrape\"").unwrap(),
            Strategy::Scrape
        );
    }
}
