//! Construction-time configuration shared by the HTTP providers.

use std::time::Duration;

/// Default timeout for a single upstream request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client configuration for the external providers.
///
/// The SEC requires requests to identify the caller, so `user_agent` should
/// carry a contact e-mail address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpConfig {
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Explicit `Host` header, used by the SEC client only.
    pub host_header: Option<String>,
}

impl HttpConfig {
    /// Creates a configuration with the default timeout and no host override.
    #[must_use]
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout: DEFAULT_TIMEOUT,
            host_header: None,
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `Host` header override.
    #[must_use]
    pub fn with_host_header(mut self, host: impl Into<String>) -> Self {
        self.host_header = Some(host.into());
        self
    }
}
