//! Balance retrieval strategies for the DESCO prepaid portal.
//!
//! Two ways of obtaining the remaining balance exist:
//! - `api`: direct JSON API call (preferred).
//! - `scrape`: HTML scrape of the login-protected dashboard, kept as
//!   a selectable fallback for the day the API disappears.
//!
//! Both produce a [`desco_core::BalanceResult`]; no fault escapes the
//! retrieval stage unclassified.

pub mod api;
pub mod config;
pub mod scrape;
pub mod source;

pub use api::ApiBalanceSource;
pub use config::{RetrieverConfig, Strategy};
pub use scrape::ScrapeBalanceSource;
pub use source::{source_for, BalanceSource};
