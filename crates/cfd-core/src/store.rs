//! Store trait for company records.
//!
//! This module defines the [`CompanyStore`] trait that the page controller
//! reads companies from and writes normalized financials back to.

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Company, Financials, Ticker},
};

/// Trait for reading and updating company records.
///
/// Rows are created elsewhere; implementations only need to read them and
/// replace the cached financials.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// Retrieves a company by ticker.
    ///
    /// Returns `Ok(Some(company))` if the row exists, `Ok(None)` if not.
    async fn get_company(&self, ticker: &Ticker) -> Result<Option<Company>>;

    /// Replaces the cached financials of a company.
    ///
    /// Returns an error if the company does not exist.
    async fn set_financials(&self, ticker: &Ticker, financials: &Financials) -> Result<()>;
}
