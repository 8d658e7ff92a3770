//! In-memory store implementation.

use async_trait::async_trait;
use cfd_core::{Company, CompanyStore, DataError, Financials, Result, Ticker};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Simple in-memory store for testing and development.
///
/// Companies are kept in a `RwLock`-protected `HashMap` keyed by ticker and
/// are lost when the store is dropped. Records are cloned on read.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    companies: RwLock<HashMap<Ticker, Company>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given companies.
    #[must_use]
    pub fn with_companies(companies: impl IntoIterator<Item = Company>) -> Self {
        let companies = companies
            .into_iter()
            .map(|c| (c.ticker.clone(), c))
            .collect();
        Self {
            companies: RwLock::new(companies),
        }
    }

    /// Insert or replace a company.
    pub async fn insert(&self, company: Company) {
        self.companies
            .write()
            .await
            .insert(company.ticker.clone(), company);
    }

    /// Number of stored companies.
    pub async fn len(&self) -> usize {
        self.companies.read().await.len()
    }

    /// Returns true if no company is stored.
    pub async fn is_empty(&self) -> bool {
        self.companies.read().await.is_empty()
    }
}

#[async_trait]
impl CompanyStore for InMemoryStore {
    #[instrument(skip(self), fields(ticker = %ticker))]
    async fn get_company(&self, ticker: &Ticker) -> Result<Option<Company>> {
        let company = self.companies.read().await.get(ticker).cloned();
        debug!(found = company.is_some(), "In-memory lookup");
        Ok(company)
    }

    #[instrument(skip(self, financials), fields(ticker = %ticker))]
    async fn set_financials(&self, ticker: &Ticker, financials: &Financials) -> Result<()> {
        let mut companies = self.companies.write().await;
        let company = companies
            .get_mut(ticker)
            .ok_or_else(|| DataError::Store(format!("No company with ticker {ticker}")))?;
        company.financials = Some(financials.clone());
        Ok(())
    }
}
