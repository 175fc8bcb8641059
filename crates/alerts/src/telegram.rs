//! Telegram message delivery.
//!
//! One message per invocation, single attempt. A delivery failure is
//! reported through the returned outcome and the log, never
//! propagated: the chat channel is presumed unreachable in that case
//! and the external scheduler re-invokes the job anyway.

use serde_json::json;
use std::time::Duration;
use tracing::warn;

/// Default timeout for the send-message call.
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed { detail: String },
}

/// Sends notifications via the Telegram Bot API.
pub struct TelegramNotifier {
    send_url: String,
    chat_id: String,
    send_timeout: Duration,
}

impl TelegramNotifier {
    pub fn new(bot_token: &str, chat_id: &str) -> Self {
        Self::with_api_base("https://api.telegram.org", bot_token, chat_id)
    }

    /// Point at a different API base, for tests against a stub server.
    pub fn with_api_base(api_base: &str, bot_token: &str, chat_id: &str) -> Self {
        Self {
            send_url: format!("{}/bot{}/sendMessage", api_base, bot_token),
            chat_id: chat_id.to_string(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Override the delivery timeout (default 10 s).
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Deliver one message. Never panics; every failure ends up in the
    /// returned outcome.
    pub async fn send(&self, text: &str) -> DeliveryOutcome {
        let client = match reqwest::Client::builder().timeout(self.send_timeout).build() {
            Ok(c) => c,
            Err(e) => return DeliveryOutcome::Failed { detail: e.to_string() },
        };

        let body = json!({ "chat_id": self.chat_id, "text": text });
        match client.post(&self.send_url).json(&body).send().await {
            Ok(response) if response.status().is_success() => DeliveryOutcome::Delivered,
            Ok(response) => {
                let status = response.status();
                warn!("Telegram API returned non-success status: {}", status);
                let detail = match response.text().await {
                    Ok(body) if !body.is_empty() => format!("HTTP {}: {}", status, body),
                    _ => format!("HTTP {}", status),
                };
                DeliveryOutcome::Failed { detail }
            }
            Err(e) => DeliveryOutcome::Failed { detail: e.to_string() },
        }
    }

    #[cfg(test)]
    pub(crate) fn send_url(&self) -> &str {
        &self.send_url
    }

    #[cfg(test)]
    pub(crate) fn send_timeout(&self) -> Duration {
        self.send_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_send_url_construction() {
        let notifier = TelegramNotifier::new("123:abc", "42");
        assert_eq!(
            notifier.send_url(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_api_base_override() {
        let notifier = TelegramNotifier::with_api_base("http://127.0.0.1:9999", "t", "c");
        assert_eq!(notifier.send_url(), "http://127.0.0.1:9999/bott/sendMessage");
    }

    #[test]
    fn test_send_timeout_defaults_and_overrides() {
        let notifier = TelegramNotifier::new("t", "c");
        assert_eq!(notifier.send_timeout(), Duration::from_secs(10));

        let notifier = notifier.with_send_timeout(Duration::from_secs(3));
        assert_eq!(notifier.send_timeout(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_reported_not_raised() {
        // Nothing listens on this port; the failure must come back as
        // an outcome, not a panic.
        let notifier = TelegramNotifier::with_api_base("http://127.0.0.1:9", "t", "c");
        match notifier.send("hello").await {
            DeliveryOutcome::Failed { detail } => assert!(!detail.is_empty()),
            DeliveryOutcome::Delivered => panic!("send to dead port cannot succeed"),
        }
    }
}
