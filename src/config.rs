//! Configuration for the NCBI client and the reference-set builder
//!
//! Both structs are plain values handed to constructors, so differently
//! configured clients can live side by side (e.g. one per mock server in tests).

use std::env;
use std::time::Duration;

use crate::error::{PubMedError, Result};
use crate::rate_limit::RateLimiter;

/// Default NCBI E-utilities endpoint
pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default `tool` identification sent with every request
pub const DEFAULT_TOOL: &str = "pubmed-refset";

/// Default number of identifiers requested for a reference set
pub const DEFAULT_REFSET_LENGTH: usize = 50;

/// Environment variable holding the reference-set length
pub const REFSET_LENGTH_ENV: &str = "REFSET_LENGTH";

/// Configuration for [`PubMedClient`](crate::PubMedClient)
///
/// # Example
///
/// ```
/// use pubmed_refset::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_api_key("your_api_key_here")
///     .with_email("researcher@university.edu")
///     .with_tool("citation-pipeline")
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(config.effective_rate_limit(), 10.0);
/// assert_eq!(config.effective_tool(), "citation-pipeline");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// NCBI API key, raises the allowed request rate
    pub api_key: Option<String>,
    /// Contact email registered with NCBI
    pub email: Option<String>,
    /// Tool name registered with NCBI
    pub tool: Option<String>,
    /// Requests per second, overrides the key-dependent default
    pub rate_limit: Option<f64>,
    /// Base URL of the E-utilities endpoint
    pub base_url: Option<String>,
    /// User agent for the HTTP client
    pub user_agent: Option<String>,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration with NCBI defaults and no API key
    pub fn new() -> Self {
        Self {
            api_key: None,
            email: None,
            tool: None,
            rate_limit: None,
            base_url: None,
            user_agent: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Build a configuration from `NCBI_API_KEY`, `NCBI_EMAIL` and `NCBI_TOOL`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new();
        config.api_key = non_empty("NCBI_API_KEY");
        config.email = non_empty("NCBI_EMAIL");
        config.tool = non_empty("NCBI_TOOL");
        config
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: f64) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Requests per second: explicit override, else 10 with an API key, else 3
    pub fn effective_rate_limit(&self) -> f64 {
        match (self.rate_limit, &self.api_key) {
            (Some(rate), _) => rate,
            (None, Some(_)) => 10.0,
            (None, None) => 3.0,
        }
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("pubmed-refset/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }

    /// Identification parameters appended to every E-utilities request
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(api_key) = &self.api_key {
            params.push(("api_key".to_string(), api_key.clone()));
        }
        if let Some(email) = &self.email {
            params.push(("email".to_string(), email.clone()));
        }
        params.push(("tool".to_string(), self.effective_tool().to_string()));

        params
    }

    pub fn create_rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.effective_rate_limit())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`RefsetBuilder`](crate::RefsetBuilder)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefsetConfig {
    /// Number of identifiers wanted in the final reference set, seed excluded
    pub refset_length: usize,
    /// Drop repeated identifiers from the first/second-order union
    pub dedup_related: bool,
}

impl RefsetConfig {
    pub fn new() -> Self {
        Self {
            refset_length: DEFAULT_REFSET_LENGTH,
            dedup_related: false,
        }
    }

    /// Read `REFSET_LENGTH` from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read `REFSET_LENGTH` through an arbitrary variable lookup
    ///
    /// # Example
    ///
    /// ```
    /// use pubmed_refset::RefsetConfig;
    ///
    /// let config = RefsetConfig::from_lookup(|_| Some("20".to_string())).unwrap();
    /// assert_eq!(config.retmax(), 21);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(raw) = lookup(REFSET_LENGTH_ENV) {
            config.refset_length = raw.trim().parse().map_err(|_| {
                PubMedError::InvalidConfig(format!(
                    "{} must be a non-negative integer, got {:?}",
                    REFSET_LENGTH_ENV, raw
                ))
            })?;

            if config.refset_length.checked_add(1).is_none() {
                return Err(PubMedError::InvalidConfig(format!(
                    "{} is too large: {}",
                    REFSET_LENGTH_ENV, config.refset_length
                )));
            }
        }

        Ok(config)
    }

    pub fn with_refset_length(mut self, refset_length: usize) -> Self {
        self.refset_length = refset_length;
        self
    }

    pub fn with_dedup_related(mut self, dedup_related: bool) -> Self {
        self.dedup_related = dedup_related;
        self
    }

    /// `retmax` for the year-filtered search.
    ///
    /// One more than `refset_length`: the seed article usually comes back in
    /// its own reference set and the caller removes it afterwards.
    pub fn retmax(&self) -> usize {
        self.refset_length.saturating_add(1)
    }
}

impl Default for RefsetConfig {
    fn default() -> Self {
        Self::new()
    }
}
