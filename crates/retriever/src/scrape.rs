//! HTML scrape of the login-protected dashboard (legacy fallback).
//!
//! Strictly weaker than the API path: login success is guessed from a
//! ranked list of signals and the balance is read out of the page
//! markup, so any template change can break it. Kept selectable for
//! the day the JSON API stops answering.

use async_trait::async_trait;
use desco_core::{Balance, BalanceResult, RetrievalError};
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::config::RetrieverConfig;
use crate::source::BalanceSource;

/// Hidden form fields that commonly carry anti-forgery tokens.
const TOKEN_FIELDS: [&str; 5] = [
    "csrf_token",
    "_token",
    "authenticity_token",
    "__VIEWSTATE",
    "__EVENTVALIDATION",
];

/// Label preceding the balance figure on the dashboard.
const BALANCE_LABEL: &str = "Remaining Balance:";

/// Fetches the balance by logging into the customer dashboard and
/// scraping the page markup.
pub struct ScrapeBalanceSource {
    config: RetrieverConfig,
}

impl ScrapeBalanceSource {
    pub fn new(config: RetrieverConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BalanceSource for ScrapeBalanceSource {
    async fn fetch(&self, account_no: &str) -> BalanceResult {
        let client = self
            .config
            .http_client()
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        let login_page = client
            .get(&self.config.login_url)
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;
        if !login_page.status().is_success() {
            return Err(RetrievalError::Network(format!(
                "HTTP {} fetching login page",
                login_page.status()
            )));
        }
        let login_html = login_page
            .text()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        let mut form: Vec<(String, String)> =
            vec![(self.config.account_field.clone(), account_no.to_string())];
        for (name, value) in hidden_tokens(&login_html) {
            debug!("found hidden token field: {}", name);
            form.push((name, value));
        }

        let post_url = form_action(&login_html)
            .and_then(|action| resolve_action(&self.config.login_url, &action))
            .unwrap_or_else(|| self.config.login_url.clone());
        debug!("posting login form to {}", post_url);

        let login_response = client
            .post(&post_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        let status = login_response.status();
        let final_url = login_response.url().to_string();
        let body = login_response
            .text()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(RetrievalError::Network(format!(
                "HTTP {} from login",
                status
            )));
        }

        if !login_succeeded(&final_url, &self.config.account_info_url, &body) {
            return Err(RetrievalError::Auth(format!(
                "no login success signal (final URL {})",
                final_url
            )));
        }

        let raw = balance_text(&body).ok_or_else(|| {
            RetrievalError::Parse("balance element not found on dashboard".to_string())
        })?;
        debug!("raw balance text: {:?}", raw);

        parse_balance_text(&raw).map(Balance::new)
    }
}

/// Scan the login markup for the known hidden token fields, keeping
/// non-empty values only.
fn hidden_tokens(html: &str) -> Vec<(String, String)> {
    let document = Html::parse_document(html);
    let inputs = match Selector::parse("input") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    let mut tokens = Vec::new();
    for element in document.select(&inputs) {
        let name = match element.value().attr("name") {
            Some(n) => n,
            None => continue,
        };
        if !TOKEN_FIELDS.contains(&name) {
            continue;
        }
        if let Some(value) = element.value().attr("value") {
            if !value.is_empty() {
                tokens.push((name.to_string(), value.to_string()));
            }
        }
    }
    tokens
}

/// Action attribute of the first form on the page, if any.
fn form_action(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let forms = Selector::parse("form").ok()?;
    document
        .select(&forms)
        .next()?
        .value()
        .attr("action")
        .filter(|a| !a.is_empty())
        .map(str::to_string)
}

/// Resolve a possibly relative form action against the login URL.
fn resolve_action(login_url: &str, action: &str) -> Option<String> {
    let base = Url::parse(login_url).ok()?;
    base.join(action).ok().map(|u| u.to_string())
}

/// Ranked login-success signals, evaluated in fixed order: landed on
/// the dashboard URL, a "Logout" control, an "Account Summary"
/// heading. Best effort only; the portal offers nothing structured.
fn login_succeeded(final_url: &str, account_info_url: &str, body: &str) -> bool {
    final_url.trim_end_matches('/') == account_info_url.trim_end_matches('/')
        || body.contains("Logout")
        || body.contains("Account Summary")
}

/// Text of the `<span>` nested in the paragraph labelled with the
/// balance marker.
fn balance_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let paragraphs = Selector::parse("p").ok()?;
    let spans = Selector::parse("span").ok()?;

    for paragraph in document.select(&paragraphs) {
        let text: String = paragraph.text().collect();
        if !text.contains(BALANCE_LABEL) {
            continue;
        }
        if let Some(span) = paragraph.select(&spans).next() {
            let raw: String = span.text().collect();
            let raw = raw.trim().to_string();
            if !raw.is_empty() {
                return Some(raw);
            }
        }
    }
    None
}

/// Strip currency symbols and separators, then parse the remainder.
fn parse_balance_text(raw: &str) -> Result<f64, RetrievalError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return Err(RetrievalError::Parse(format!(
            "no numeric balance in {:?}",
            raw
        )));
    }
    cleaned
        .parse::<f64>()
        .map_err(|_| RetrievalError::Parse(format!("could not parse balance {:?}", raw)))
}
