#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/revirator/cfd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Company store implementations.
//!
//! This crate provides implementations of the [`CompanyStore`] trait from `cfd-core`:
//!
//! - [`SqliteStore`] - Persistent SQLite-based store (default, requires `sqlite` feature)
//! - [`InMemoryStore`] - Simple in-memory store for testing

/// In-memory store implementation.
pub mod memory;

/// SQLite-based store implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use cfd_core::CompanyStore;

pub use memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
