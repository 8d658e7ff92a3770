#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/revirator/cfd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR companyfacts client.
//!
//! # Example
//!
//! ```no_run
//! use cfd_core::{FactsProvider, HttpConfig};
//! use cfd_edgar::EdgarProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HttpConfig::new("someone@example.com").with_host_header("www.sec.gov");
//!     let provider = EdgarProvider::new(&config)?;
//!
//!     let facts = provider.fetch_financial_facts("0000320193").await?;
//!     println!("Entity: {:?}", facts.entity_name);
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use cfd_core::{DataError, DataProvider, FactsProvider, HttpConfig, RawFinancialFacts, Result};
use reqwest::StatusCode;
use reqwest::header::HOST;
use tracing::{debug, warn};

/// SEC EDGAR API base URL
const EDGAR_BASE_URL: &str = "https://data.sec.gov";

/// Host header the SEC asks automated clients to send.
pub const EDGAR_HOST: &str = "www.sec.gov";

/// SEC EDGAR companyfacts provider.
///
/// Owns its HTTP client; the identifying user agent and the timeout come from
/// the [`HttpConfig`] it was built with.
#[derive(Debug, Clone)]
pub struct EdgarProvider {
    client: reqwest::Client,
    base_url: String,
    host_header: Option<String>,
}

impl EdgarProvider {
    /// Create a new EDGAR provider from the given configuration.
    ///
    /// The SEC requires an identifying user agent, typically a contact
    /// e-mail address.
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

        Ok(Self::with_client(client, config.host_header.clone()))
    }

    /// Create a new EDGAR provider with a custom HTTP client.
    ///
    /// # Arguments
    /// * `client` - Pre-configured reqwest client
    /// * `host_header` - Optional `Host` header override
    #[must_use]
    pub fn with_client(client: reqwest::Client, host_header: Option<String>) -> Self {
        Self {
            client,
            base_url: EDGAR_BASE_URL.to_string(),
            host_header,
        }
    }

    /// Point the provider at a different API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Companyfacts URL for a CIK. The CIK is used as given.
    #[must_use]
    pub fn facts_url(&self, cik: &str) -> String {
        format!("{}/api/xbrl/companyfacts/CIK{}.json", self.base_url, cik)
    }
}

impl DataProvider for EdgarProvider {
    fn name(&self) -> &str {
        "SEC EDGAR"
    }

    fn description(&self) -> &str {
        "SEC EDGAR companyfacts for fundamental data from 10-K and 10-Q filings"
    }
}

#[async_trait]
impl FactsProvider for EdgarProvider {
    async fn fetch_financial_facts(&self, cik: &str) -> Result<RawFinancialFacts> {
        if cik.is_empty() {
            return Err(DataError::InvalidParameter("Empty CIK".to_string()));
        }

        let url = self.facts_url(cik);
        debug!("Fetching company facts from {}", url);

        let mut request = self.client.get(&url);
        if let Some(host) = &self.host_header {
            request = request.header(HOST, host.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| DataError::Network(e.to_string()))?;

        if status != StatusCode::OK {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(
                cik,
                status = status.as_u16(),
                body = %body,
                "Could not retrieve financial data from EDGAR"
            );
            return Err(DataError::Http {
                status: status.as_u16(),
                body,
            });
        }

        RawFinancialFacts::from_slice(&body).inspect_err(|e| {
            warn!(cik, error = %e, "Could not parse financial data from EDGAR");
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use cfd_core::Metric;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves one canned response and hands back the raw request head.
    async fn serve_once(status: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        serve_bytes(status, "", body.as_bytes().to_vec()).await
    }

    /// Like [`serve_once`] with extra header lines and a binary body.
    async fn serve_bytes(
        status: &str,
        headers: &str,
        body: Vec<u8>,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let mut response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n{headers}Content-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(&body);
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            socket.write_all(&response).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(String::from_utf8_lossy(&head).into_owned());
        });

        (format!("http://{addr}"), rx)
    }

    fn provider(base_url: &str) -> EdgarProvider {
        let config = HttpConfig::new("someone@example.com").with_host_header(EDGAR_HOST);
        EdgarProvider::new(&config).unwrap().with_base_url(base_url)
    }

    #[test]
    fn test_provider_traits() {
        let provider = EdgarProvider::new(&HttpConfig::new("Test test@example.com")).unwrap();

        assert_eq!(provider.name(), "SEC EDGAR");
        assert!(!provider.description().is_empty());
    }

    #[test]
    fn test_facts_url() {
        let provider = EdgarProvider::new(&HttpConfig::new("test@example.com")).unwrap();
        assert_eq!(
            provider.facts_url("0000320193"),
            "https://data.sec.gov/api/xbrl/companyfacts/CIK0000320193.json"
        );

        let provider = provider.with_base_url("http://localhost:1234/");
        assert_eq!(
            provider.facts_url("0000320193"),
            "http://localhost:1234/api/xbrl/companyfacts/CIK0000320193.json"
        );
    }

    #[tokio::test]
    async fn test_empty_cik_rejected() {
        let provider = EdgarProvider::new(&HttpConfig::new("test@example.com")).unwrap();
        let err = provider.fetch_financial_facts("").await.unwrap_err();
        assert!(matches!(err, DataError::InvalidParameter(_)));
    }

    #[tokio::test]
    async fn test_fetch_parses_facts_and_sends_headers() {
        let body = r#"{"cik": 320193, "entityName": "Apple Inc.", "facts": {"us-gaap": {"NetIncomeLoss": {"label": "Net Income", "description": "Profit.", "units": {"USD": [{"end": "2023-09-30", "val": 96995000000, "form": "10-K", "frame": "CY2023"}]}}}}}"#;
        let (base_url, head) = serve_once("200 OK", body).await;

        let facts = provider(&base_url)
            .fetch_financial_facts("0000320193")
            .await
            .unwrap();
        assert!(facts.concept(Metric::NetIncomeLoss).is_some());

        let head = head.await.unwrap().to_lowercase();
        assert!(head.starts_with("get /api/xbrl/companyfacts/cik0000320193.json"));
        assert!(head.contains("user-agent: someone@example.com"));
        assert!(head.contains("host: www.sec.gov"));
        // reqwest joins the encodings without a space.
        let compact = head.replace(' ', "");
        assert!(compact.contains("accept-encoding:gzip,deflate"));
    }

    /// A gzip-compressed companyfacts body with one `EntityPublicFloat` entry.
    const GZIPPED_FACTS: &[u8] = &[
        0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0xab, 0x56, 0x4a, 0xce, 0xcc, 0x56,
        0xb2, 0x52, 0x30, 0x36, 0x32, 0x30, 0xb4, 0x34, 0xd6, 0x51, 0x50, 0x4a, 0x4b, 0x4c, 0x2e, 0x29,
        0x06, 0x0a, 0x54, 0x2b, 0xa5, 0xa4, 0x66, 0x82, 0x69, 0xd7, 0xbc, 0x92, 0xcc, 0x92, 0xca, 0x80,
        0xd2, 0xa4, 0x9c, 0xcc, 0x64, 0xb7, 0x9c, 0xfc, 0xc4, 0x12, 0xb0, 0x68, 0x69, 0x5e, 0x26, 0x54,
        0x5d, 0x68, 0xb0, 0x0b, 0x90, 0x8e, 0xae, 0x56, 0x4a, 0xcd, 0x4b, 0x01, 0x32, 0x94, 0x8c, 0x0c,
        0x8c, 0x8c, 0x75, 0x0d, 0x4c, 0x74, 0x0d, 0x0c, 0x95, 0x80, 0xe6, 0x95, 0x25, 0xe6, 0x00, 0x05,
        0x8d, 0x4c, 0x2d, 0x0d, 0x0d, 0xcd, 0x4c, 0x0d, 0xc0, 0x00, 0x64, 0x4b, 0x7e, 0x51, 0x2e, 0x48,
        0xad, 0xa1, 0x81, 0xae, 0x37, 0x48, 0x55, 0x5a, 0x51, 0x62, 0x6e, 0x2a, 0x48, 0xc0, 0x39, 0x12,
        0xa4, 0x3d, 0xd0, 0xd0, 0x53, 0xa9, 0x36, 0xb6, 0x16, 0x04, 0x00, 0x83, 0x75, 0xa4, 0x49, 0xa1,
        0x00, 0x00, 0x00,
    ];

    #[tokio::test]
    async fn test_gzip_body_is_decoded() {
        let (base_url, _head) =
            serve_bytes("200 OK", "Content-Encoding: gzip\r\n", GZIPPED_FACTS.to_vec()).await;

        let facts = provider(&base_url)
            .fetch_financial_facts("0000320193")
            .await
            .unwrap();

        assert_eq!(facts.cik, Some(320193));
        let float = facts.concept(Metric::EntityPublicFloat).unwrap();
        assert_eq!(float.units.usd[0].val, 2_591_165_000_000.0);
        assert_eq!(float.units.usd[0].frame.as_deref(), Some("CY2023Q1I"));
    }

    #[tokio::test]
    async fn test_non_ok_status_is_http_error() {
        let (base_url, _head) = serve_once("404 Not Found", r#"{"message": "NoSuchKey"}"#).await;

        let err = provider(&base_url)
            .fetch_financial_facts("0000000000")
            .await
            .unwrap_err();
        match err {
            DataError::Http { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("NoSuchKey"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let (base_url, _head) = serve_once("200 OK", "not json").await;

        let err = provider(&base_url)
            .fetch_financial_facts("0000320193")
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }
}
