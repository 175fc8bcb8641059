//! Outbound message formatting.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use desco_core::BalanceResult;

/// Product name used in the message header.
const PRODUCT_NAME: &str = "DESCO";

/// Currency code appended to balance amounts.
const CURRENCY: &str = "BDT";

/// Suffix appended when the balance drops below the threshold.
const LOW_BALANCE_WARNING: &str = "\n\n⚠️ Low Balance! Please recharge soon.";

/// Default recharge threshold in BDT.
pub const DEFAULT_LOW_BALANCE_THRESHOLD: f64 = 100.0;

/// Account holder's local timezone.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Dhaka;

/// Formatting configuration.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Timezone for the message timestamp.
    pub timezone: Tz,
    /// Balances strictly below this trigger the recharge warning.
    pub low_balance_threshold: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            low_balance_threshold: DEFAULT_LOW_BALANCE_THRESHOLD,
        }
    }
}

/// Render the outbound message for one retrieval outcome.
///
/// Pure with respect to its inputs: the same result and instant always
/// yield the same string. Failure details are embedded verbatim so the
/// operator can diagnose from the chat message alone.
pub fn format_message(result: &BalanceResult, config: &AlertConfig, now: DateTime<Utc>) -> String {
    let timestamp = now.with_timezone(&config.timezone).format("%d-%b-%Y %I:%M %p");

    let body = match result {
        Ok(balance) => {
            let mut body = format!("{:.2} {}", balance.amount, CURRENCY);
            if balance.amount < config.low_balance_threshold {
                body.push_str(LOW_BALANCE_WARNING);
            }
            body
        }
        Err(e) => format!("Failed to retrieve balance.\nError: {}", e.detail()),
    };

    format!("{} Balance Update ({}):\n\n{}", PRODUCT_NAME, timestamp, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use desco_core::{Balance, RetrievalError};
    use pretty_assertions::assert_eq;

    fn fixed_instant() -> DateTime<Utc> {
        // 06:30 UTC is 12:30 PM in Dhaka (UTC+6).
        Utc.with_ymd_and_hms(2025, 5, 1, 6, 30, 0).unwrap()
    }

    #[test]
    fn test_low_balance_message() {
        let result = Ok(Balance::new(45.5));
        let message = format_message(&result, &AlertConfig::default(), fixed_instant());
        assert_eq!(
            message,
            "DESCO Balance Update (01-May-2025 12:30 PM):\n\n\
             45.50 BDT\n\n⚠️ Low Balance! Please recharge soon."
        );
    }

    #[test]
    fn test_healthy_balance_has_no_warning() {
        let result = Ok(Balance::new(250.0));
        let message = format_message(&result, &AlertConfig::default(), fixed_instant());
        assert!(message.contains("250.00 BDT"));
        assert!(!message.contains("recharge"));
    }

    #[test]
    fn test_threshold_is_strict() {
        let config = AlertConfig::default();
        let at_threshold = format_message(&Ok(Balance::new(100.0)), &config, fixed_instant());
        assert!(!at_threshold.contains("recharge"));

        let below_threshold = format_message(&Ok(Balance::new(99.99)), &config, fixed_instant());
        assert!(below_threshold.contains("recharge"));
    }

    #[test]
    fn test_failure_embeds_detail_verbatim() {
        let result = Err(RetrievalError::Api("invalid account".to_string()));
        let message = format_message(&result, &AlertConfig::default(), fixed_instant());
        assert!(message.contains("Failed to retrieve balance.\nError: invalid account"));
        assert!(!message.contains("recharge"));
    }

    #[test]
    fn test_network_failure_has_no_warning() {
        let result = Err(RetrievalError::Network("connection timed out".to_string()));
        let message = format_message(&result, &AlertConfig::default(), fixed_instant());
        assert!(message.contains("Failed to retrieve balance."));
        assert!(message.contains("connection timed out"));
        assert!(!message.contains("recharge"));
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let result = Ok(Balance::new(45.5));
        let config = AlertConfig::default();
        let now = fixed_instant();
        assert_eq!(
            format_message(&result, &config, now),
            format_message(&result, &config, now)
        );
    }

    #[test]
    fn test_timezone_is_respected() {
        let config = AlertConfig {
            timezone: chrono_tz::UTC,
            ..AlertConfig::default()
        };
        let message = format_message(&Ok(Balance::new(250.0)), &config, fixed_instant());
        assert!(message.contains("01-May-2025 06:30 AM"));
    }
}
