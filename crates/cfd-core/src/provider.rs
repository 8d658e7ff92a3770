//! Provider traits for the external data sources.
//!
//! - [`DataProvider`] - Base trait for all data providers
//! - [`FactsProvider`] - Raw companyfacts by CIK
//! - [`QuoteProvider`] - Latest quote by ticker

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    facts::RawFinancialFacts,
    types::{Quote, Ticker},
};

/// Base trait for all data providers.
pub trait DataProvider: Send + Sync + Debug {
    /// Returns the name of this provider (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Returns a description of this provider.
    fn description(&self) -> &str;
}

/// Provider for raw financial facts.
#[async_trait]
pub trait FactsProvider: DataProvider {
    /// Fetches the companyfacts payload for a 10-digit CIK.
    async fn fetch_financial_facts(&self, cik: &str) -> Result<RawFinancialFacts>;
}

/// Provider for market quotes.
#[async_trait]
pub trait QuoteProvider: DataProvider {
    /// Fetches the latest daily quote for a ticker.
    async fn fetch_quote(&self, ticker: &Ticker) -> Result<Quote>;
}
