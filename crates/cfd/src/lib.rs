#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/revirator/cfd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Company financials dashboard.
//!
//! This crate wires the `cfd-*` crates into a web application. It re-exports
//! the core types, the EDGAR and Yahoo providers and the stores, and adds the
//! [`CompanyPages`] controller, the [`Views`] templates and the actix-web
//! [`server`] routes.
//!
//! # Features
//!
//! - `sqlite` - SQLite-backed company store (default)
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cfd::{CompanyPages, EdgarProvider, HttpConfig, SqliteStore, YahooProvider};
//!
//! let config = HttpConfig::new("someone@example.com").with_host_header("www.sec.gov");
//! let pages = CompanyPages::new(
//!     Arc::new(SqliteStore::new("cfd.sqlite3")?),
//!     Arc::new(EdgarProvider::new(&config)?),
//!     Arc::new(YahooProvider::new(&config)?),
//! );
//!
//! let page = pages.company_page("aapl").await?;
//! println!("{} trades at {}", page.company.name, page.price);
//! ```

// Core types and traits
pub use cfd_core::*;

// Store implementations
pub use cfd_store::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use cfd_store::SqliteStore;

// Providers
pub use cfd_edgar::{EDGAR_HOST, EdgarProvider};
pub use cfd_yahoo::YahooProvider;

mod controller;
pub use controller::{CompanyPage, CompanyPages, GENERIC_ERROR_MESSAGE, PageError};

pub mod server;
pub use server::AppState;

mod views;
pub use views::Views;
