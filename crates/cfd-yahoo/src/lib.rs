#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/revirator/cfd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance quote provider.
//!
//! This crate provides a [`YahooProvider`] that implements the
//! [`QuoteProvider`] trait from `cfd-core`.
//!
//! # Example
//!
//! ```no_run
//! use cfd_core::{HttpConfig, QuoteProvider, Ticker};
//! use cfd_yahoo::YahooProvider;
//!
//! # async fn example() -> cfd_core::Result<()> {
//! let provider = YahooProvider::new(&HttpConfig::new("someone@example.com"))?;
//! let quote = provider.fetch_quote(&Ticker::new("AAPL")).await?;
//! println!("Price: {}", quote.regular_market_price);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use cfd_core::{DataError, DataProvider, HttpConfig, Quote, QuoteProvider, Result, Ticker};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

/// Yahoo Finance API base URL.
const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance quote provider.
#[derive(Debug, Clone)]
pub struct YahooProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider from the given configuration.
    ///
    /// The `host_header` of the configuration is ignored.
    ///
    /// # Errors
    /// Returns [`DataError::Network`] if the HTTP client cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| DataError::Network(e.to_string()))?;

        Ok(Self::with_client(client))
    }

    /// Create a new Yahoo Finance provider with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: YAHOO_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the chart API URL for a ticker.
    #[must_use]
    pub fn chart_url(&self, ticker: &Ticker) -> String {
        format!(
            "{}/v8/finance/chart/{}?interval=1d&range=1d",
            self.base_url,
            ticker.as_str()
        )
    }
}

/// Parse a chart API body into a [`Quote`].
///
/// # Errors
/// - [`DataError::Parse`] if the body is not a chart response or lacks prices
/// - [`DataError::SymbolNotFound`] for a `Not Found` API error or an empty result
/// - [`DataError::Other`] for any other API-level error
pub fn parse_chart_response(ticker: &Ticker, body: &[u8]) -> Result<Quote> {
    let response: ChartResponse =
        serde_json::from_slice(body).map_err(|e| DataError::Parse(e.to_string()))?;

    if let Some(error) = response.chart.error {
        if error.code == "Not Found" {
            return Err(DataError::SymbolNotFound(ticker.to_string()));
        }
        return Err(DataError::Other(format!(
            "{}: {}",
            error.code,
            error.description.unwrap_or_default()
        )));
    }

    let meta = response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| DataError::SymbolNotFound(ticker.to_string()))?
        .meta;

    match (meta.regular_market_price, meta.chart_previous_close) {
        (Some(price), Some(previous_close)) => Ok(Quote::new(price, previous_close)),
        _ => Err(DataError::Parse(format!(
            "Missing price fields in chart meta for {ticker}"
        ))),
    }
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn description(&self) -> &str {
        "Yahoo Finance chart API for the latest price and previous close"
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    async fn fetch_quote(&self, ticker: &Ticker) -> Result<Quote> {
        if ticker.is_empty() {
            return Err(DataError::InvalidParameter("Empty ticker".to_string()));
        }

        let url = self.chart_url(ticker);
        debug!("Fetching quote: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        if status == StatusCode::NOT_FOUND {
            warn!(ticker = %ticker, "Yahoo Finance does not know the symbol");
            return Err(DataError::SymbolNotFound(ticker.to_string()));
        }

        if status != StatusCode::OK {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(
                ticker = %ticker,
                status = status.as_u16(),
                body = %body,
                "Could not retrieve quote from Yahoo Finance"
            );
            return Err(DataError::Http {
                status: status.as_u16(),
                body,
            });
        }

        parse_chart_response(ticker, &body)
    }
}

// ============================================================================
// Yahoo Finance API Response Types
// ============================================================================

/// Chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
}
