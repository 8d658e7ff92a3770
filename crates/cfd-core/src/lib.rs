#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/revirator/cfd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for company financials.
//!
//! This crate provides the foundational abstractions:
//!
//! - [`Company`](types::Company) and [`Financials`](types::Financials) - Persisted data model
//! - [`RawFinancialFacts`](facts::RawFinancialFacts) - Raw SEC companyfacts payload
//! - [`normalize`](normalize::normalize) - Raw facts to annual/quarterly series
//! - [`FactsProvider`](provider::FactsProvider) / [`QuoteProvider`](provider::QuoteProvider) - Upstream sources
//! - [`CompanyStore`](store::CompanyStore) - Company persistence

/// HTTP provider configuration.
pub mod config;
/// Error types for data operations.
pub mod error;
/// Raw companyfacts schema and canonical metrics.
pub mod facts;
/// Fact normalization.
pub mod normalize;
/// Provider traits for fetching upstream data.
pub mod provider;
/// Company store trait.
pub mod store;
/// Core data types (Ticker, Company, FinancialMetric, Quote, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use config::{DEFAULT_TIMEOUT, HttpConfig};
pub use error::{DataError, Result};
pub use facts::{FactSection, Metric, RawConcept, RawEntry, RawFinancialFacts, RawUnits};
pub use normalize::normalize;
pub use provider::{DataProvider, FactsProvider, QuoteProvider};
pub use store::CompanyStore;
pub use types::{
    Company, FilingForm, FinancialEntry, FinancialMetric, Financials, Quote, Ticker, round2,
};
