//! Page controller: company lookup, lazy financials refresh and quote.

use std::sync::Arc;

use actix_web::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use cfd_core::{
    Company, CompanyStore, DataError, FactsProvider, Financials, QuoteProvider, Ticker, normalize,
};

/// Message shown for any failure whose details must stay in the logs.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong! Please try again later.";

/// Everything the company template needs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanyPage {
    /// The company row as read from the store.
    pub company: Company,
    /// Normalized financials, cached or freshly fetched; empty if unavailable.
    pub financials: Financials,
    /// Current market price, `0.0` if the quote could not be fetched.
    pub price: f64,
    /// Day move in percent, `None` if it cannot be computed.
    pub day_move: Option<f64>,
}

/// Failures that prevent a company page from being rendered.
#[derive(Debug, Error)]
pub enum PageError {
    /// No company row exists for the ticker.
    #[error("Company {0} not found")]
    NotFound(Ticker),

    /// The company store could not be read.
    #[error("Failed to read company: {0}")]
    StoreRead(#[source] DataError),
}

impl PageError {
    /// HTTP status this error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the visitor.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound(ticker) => format!(
                "Company with ticker '{ticker}' does not exist or is not listed on any of the US exchanges."
            ),
            Self::StoreRead(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Builds company pages from the store and the two upstream providers.
///
/// Financials are fetched only when the stored row has none, and are
/// written back after normalization. The quote is fetched on every request,
/// concurrently with the financials.
#[derive(Clone)]
pub struct CompanyPages {
    store: Arc<dyn CompanyStore>,
    facts: Arc<dyn FactsProvider>,
    quotes: Arc<dyn QuoteProvider>,
}

impl std::fmt::Debug for CompanyPages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanyPages")
            .field("store", &"configured")
            .field("facts", &self.facts.name())
            .field("quotes", &self.quotes.name())
            .finish()
    }
}

impl CompanyPages {
    /// Create a controller over the given collaborators.
    #[must_use]
    pub fn new(
        store: Arc<dyn CompanyStore>,
        facts: Arc<dyn FactsProvider>,
        quotes: Arc<dyn QuoteProvider>,
    ) -> Self {
        Self {
            store,
            facts,
            quotes,
        }
    }

    /// Build the page for a ticker. The ticker is upper-cased first.
    ///
    /// # Errors
    /// - [`PageError::NotFound`] if no company row exists
    /// - [`PageError::StoreRead`] if the store cannot be read
    ///
    /// Upstream and persistence failures never surface here; they degrade
    /// the page instead.
    #[instrument(skip(self))]
    pub async fn company_page(&self, ticker: &str) -> Result<CompanyPage, PageError> {
        let ticker = Ticker::new(ticker);

        let company = match self.store.get_company(&ticker).await {
            Ok(Some(company)) => company,
            Ok(None) => {
                debug!(ticker = %ticker, "Unknown ticker");
                return Err(PageError::NotFound(ticker));
            }
            Err(e) => {
                error!(ticker = %ticker, error = %e, "Failed to read company");
                return Err(PageError::StoreRead(e));
            }
        };

        let (financials, (price, day_move)) =
            futures::join!(self.financials(&company), self.quote(&company.ticker));

        Ok(CompanyPage {
            company,
            financials,
            price,
            day_move,
        })
    }

    /// Cached financials, or a fresh fetch that is persisted.
    async fn financials(&self, company: &Company) -> Financials {
        if let Some(financials) = &company.financials {
            debug!(ticker = %company.ticker, "Cache hit for financials");
            return financials.clone();
        }

        debug!(ticker = %company.ticker, "Cache miss for financials");
        info!(ticker = %company.ticker, cik = %company.cik, "Requesting SEC data");

        let raw = match self.facts.fetch_financial_facts(&company.cik).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    provider = self.facts.name(),
                    ticker = %company.ticker,
                    error = %e,
                    "Failed to fetch financial facts"
                );
                return Financials::new();
            }
        };

        let financials = normalize(&raw);
        if financials.is_empty() {
            debug!(ticker = %company.ticker, "No tracked metrics in payload");
        }

        if let Err(e) = self.store.set_financials(&company.ticker, &financials).await {
            error!(
                ticker = %company.ticker,
                error = %e,
                "Failed to store financials"
            );
        }

        financials
    }

    /// Current price and day move; `(0.0, Some(0.0))` when the quote fails.
    async fn quote(&self, ticker: &Ticker) -> (f64, Option<f64>) {
        info!(ticker = %ticker, "Requesting Yahoo data");

        match self.quotes.fetch_quote(ticker).await {
            Ok(quote) => (quote.regular_market_price, quote.day_move_percentage()),
            Err(e) => {
                warn!(
                    provider = self.quotes.name(),
                    ticker = %ticker,
                    error = %e,
                    "Failed to fetch quote"
                );
                (0.0, Some(0.0))
            }
        }
    }
}
