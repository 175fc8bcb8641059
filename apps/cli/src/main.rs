//! DESCO balance bot - scheduled batch job.
//!
//! One run: retrieve the prepaid balance, send exactly one Telegram
//! message, exit. Retrieval and delivery failures are reported through
//! the message body and the log, not the exit code; only missing or
//! invalid configuration fails the process.

use clap::Parser;
use desco_alerts::{format_message, AlertConfig, DeliveryOutcome, TelegramNotifier};
use desco_retriever::{source_for, RetrieverConfig, Strategy};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// DESCO prepaid balance checker
#[derive(Parser, Debug)]
#[command(name = "desco-balance-bot")]
#[command(about = "Checks the DESCO prepaid balance and notifies via Telegram", long_about = None)]
struct Args {
    /// Retrieval strategy: api, scrape
    #[arg(short, long, default_value = "api")]
    strategy: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// IANA timezone for the message timestamp
    #[arg(long, default_value = "Asia/Dhaka")]
    timezone: String,

    /// Balances strictly below this add a recharge warning
    #[arg(long, default_value_t = 100.0)]
    low_balance_threshold: f64,

    /// Per-request timeout in seconds for portal calls
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,

    /// Timeout in seconds for the Telegram send
    #[arg(long, default_value_t = 10)]
    send_timeout_secs: u64,

    /// Skip TLS certificate verification (legacy portal workaround)
    #[arg(long, default_value_t = false)]
    insecure: bool,
}

/// Required credentials, read from the environment before any network
/// call is made.
struct Secrets {
    account_no: String,
    bot_token: String,
    chat_id: String,
}

fn require_env(name: &str) -> Result<String, String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("required environment variable {} is not set", name)),
    }
}

fn load_secrets() -> Result<Secrets, String> {
    Ok(Secrets {
        account_no: require_env("DESCO_ACCOUNT_NO")?,
        bot_token: require_env("BOT_TOKEN")?,
        chat_id: require_env("CHAT_ID")?,
    })
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn parse_strategy(strategy: &str) -> Strategy {
    match strategy.to_lowercase().as_str() {
        "scrape" => Strategy::Scrape,
        _ => Strategy::Api,
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(&args.log_level);

    // Fail fast on configuration problems, before any network call.
    let secrets = match load_secrets() {
        Ok(secrets) => secrets,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    let timezone: chrono_tz::Tz = match args.timezone.parse() {
        Ok(tz) => tz,
        Err(_) => {
            error!("unknown timezone {:?}", args.timezone);
            std::process::exit(2);
        }
    };

    let retriever_config = RetrieverConfig {
        timeout_secs: args.timeout_secs,
        strategy: parse_strategy(&args.strategy),
        accept_invalid_certs: args.insecure,
        ..RetrieverConfig::default()
    };
    if retriever_config.accept_invalid_certs {
        warn!("TLS certificate verification is disabled");
    }

    info!(
        "Checking DESCO balance (strategy: {:?})...",
        retriever_config.strategy
    );

    let source = source_for(&retriever_config);
    let result = source.fetch(&secrets.account_no).await;

    match &result {
        Ok(balance) => info!("Balance retrieved: {:.2} BDT", balance.amount),
        Err(e) => warn!("Balance retrieval failed ({}): {}", e.kind(), e.detail()),
    }

    let alert_config = AlertConfig {
        timezone,
        low_balance_threshold: args.low_balance_threshold,
    };
    let message = format_message(&result, &alert_config, chrono::Utc::now());

    // A notification is attempted regardless of the retrieval outcome,
    // so the operator always hears something.
    let notifier = TelegramNotifier::new(&secrets.bot_token, &secrets.chat_id)
        .with_send_timeout(std::time::Duration::from_secs(args.send_timeout_secs));
    match notifier.send(&message).await {
        DeliveryOutcome::Delivered => info!("Telegram message sent"),
        DeliveryOutcome::Failed { detail } => {
            // No secondary channel exists; the log is the only place
            // this failure is visible.
            error!("Failed to send Telegram message: {}", detail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_strategy() {
        assert_eq!(parse_strategy("api"), Strategy::Api);
        assert_eq!(parse_strategy("scrape"), Strategy::Scrape);
        assert_eq!(parse_strategy("SCRAPE"), Strategy::Scrape);
        assert_eq!(parse_strategy("unknown"), Strategy::Api);
    }

    #[test]
    fn test_require_env_rejects_missing_and_blank() {
        std::env::remove_var("DESCO_TEST_MISSING");
        assert!(require_env("DESCO_TEST_MISSING").is_err());

        std::env::set_var("DESCO_TEST_BLANK", "   ");
        assert!(require_env("DESCO_TEST_BLANK").is_err());

        std::env::set_var("DESCO_TEST_SET", "04212345678");
        assert_eq!(require_env("DESCO_TEST_SET").unwrap(), "04212345678");
    }
}
