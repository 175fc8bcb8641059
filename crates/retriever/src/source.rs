//! Strategy-selectable balance source.

use async_trait::async_trait;
use desco_core::BalanceResult;

use crate::api::ApiBalanceSource;
use crate::config::{RetrieverConfig, Strategy};
use crate::scrape::ScrapeBalanceSource;

/// A method for obtaining the remaining balance of one account.
///
/// Implementations own their HTTP session for the duration of a call
/// and classify every fault into the result; they never panic and
/// never write external state.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn fetch(&self, account_no: &str) -> BalanceResult;
}

/// Build the source selected by the configuration.
pub fn source_for(config: &RetrieverConfig) -> Box<dyn BalanceSource> {
    match config.strategy {
        Strategy::Api => Box::new(ApiBalanceSource::new(config.clone())),
        Strategy::Scrape => Box::new(ScrapeBalanceSource::new(config.clone())),
    }
}
