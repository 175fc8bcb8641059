//! Direct JSON API balance retrieval (preferred strategy).
//!
//! A best-effort warm-up GET to the landing page establishes any
//! session cookie the API expects, then the balance endpoint is
//! queried with the account number. Expected payload shape:
//! `{"code": 200, "data": {"balance": <number|string>}, "desc": ...}`.

use async_trait::async_trait;
use desco_core::{Balance, BalanceResult, RetrievalError};
use tracing::debug;

use crate::config::RetrieverConfig;
use crate::source::BalanceSource;

/// Success code in the balance payload.
const SUCCESS_CODE: i64 = 200;

/// Fetches the balance via the portal's JSON API.
pub struct ApiBalanceSource {
    config: RetrieverConfig,
}

impl ApiBalanceSource {
    pub fn new(config: RetrieverConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BalanceSource for ApiBalanceSource {
    async fn fetch(&self, account_no: &str) -> BalanceResult {
        let client = self
            .config
            .http_client()
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        // Cookie warm-up. The API has been observed to answer without
        // a session, so a failure here is logged and ignored.
        match client.get(&self.config.landing_url).send().await {
            Ok(response) => debug!("warm-up request returned HTTP {}", response.status()),
            Err(e) => debug!("warm-up request failed: {}", e),
        }

        let response = client
            .get(&self.config.balance_api_url)
            .query(&[("accountNo", account_no), ("meterNo", "")])
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RetrievalError::Network(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RetrievalError::Parse(e.to_string()))?;

        parse_balance_payload(&payload).map(Balance::new)
    }
}

/// Validate the decoded payload and extract the numeric balance.
pub(crate) fn parse_balance_payload(payload: &serde_json::Value) -> Result<f64, RetrievalError> {
    if payload["code"].as_i64() != Some(SUCCESS_CODE) {
        let detail = payload["desc"]
            .as_str()
            .unwrap_or("unexpected response format")
            .to_string();
        return Err(RetrievalError::Api(detail));
    }

    let amount = match &payload["data"]["balance"] {
        serde_json::Value::Number(n) => n.as_f64().ok_or_else(|| {
            RetrievalError::Api(format!("unexpected balance value: {}", n))
        })?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            RetrievalError::Api(format!("unexpected balance value: {:?}", s))
        })?,
        serde_json::Value::Null => {
            return Err(RetrievalError::Api(
                "unexpected response format".to_string(),
            ))
        }
        other => {
            return Err(RetrievalError::Api(format!(
                "unexpected balance value: {}",
                other
            )))
        }
    };

    // A prepaid balance is never negative; a negative figure means the
    // payload is not what this parser thinks it is.
    if amount < 0.0 {
        return Err(RetrievalError::Api(format!(
            "unexpected balance value: {}",
            amount
        )));
    }
    Ok(amount)
}
