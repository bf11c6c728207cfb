//! Configuration for the arXiv search client.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// arXiv Atom query endpoint.
    pub const API_URL: &str = "https://export.arxiv.org/api/query";

    /// Registry used for the release check.
    pub const REGISTRY_URL: &str = "https://crates.io";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Upper bound for the release check, which must never hold up a search.
    pub const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

    /// Retries for transient failures. Searches are dispatched exactly once by default.
    pub const MAX_RETRIES: u32 = 0;

    /// Default page size.
    pub const DEFAULT_MAX_RESULTS: u32 = 10;

    /// Largest page arXiv serves in a single call.
    pub const MAX_RESULTS_LIMIT: u32 = 2000;

    /// User agent sent with every request (crates.io rejects anonymous clients).
    pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
}

/// XML namespaces found in arXiv feeds.
pub mod namespaces {
    /// Atom syndication format.
    pub const ATOM: &[u8] = b"http://www.w3.org/2005/Atom";

    /// arXiv extension elements (`primary_category`, `doi`, `comment`, `journal_ref`).
    pub const ARXIV: &[u8] = b"http://arxiv.org/schemas/atom";

    /// OpenSearch result counters.
    pub const OPENSEARCH: &[u8] = b"http://a9.com/-/spec/opensearch/1.1/";
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// arXiv query endpoint (for testing with mock servers).
    pub api_url: String,

    /// Registry base URL for the release check.
    pub registry_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Retries for transient transport failures.
    pub max_retries: u32,

    /// User agent header.
    pub user_agent: String,

    /// Whether the background release check runs.
    pub version_check: bool,
}

impl Config {
    /// Create a configuration pointing at the public arXiv API.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_url: api::API_URL.to_string(),
            registry_url: api::REGISTRY_URL.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            max_retries: api::MAX_RETRIES,
            user_agent: api::USER_AGENT.to_string(),
            version_check: true,
        }
    }

    /// Create a test configuration with both endpoints on a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_url: format!("{}/api/query", base_url),
            registry_url: base_url.to_string(),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_retries: 0,
            user_agent: api::USER_AGENT.to_string(),
            version_check: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `ARXIV_API_URL`, `ARXIV_SEARCH_REGISTRY_URL` and
    /// `ARXIV_SEARCH_NO_VERSION_CHECK`.
    ///
    /// # Errors
    ///
    /// Returns error if a configured URL does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create configuration from a variable lookup.
    ///
    /// Same rules as [`Config::from_env`].
    ///
    /// # Errors
    ///
    /// Returns error if a configured URL does not parse.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(api_url) = lookup("ARXIV_API_URL") {
            url::Url::parse(api_url.trim())?;
            config.api_url = api_url.trim().to_string();
        }
        if let Some(registry_url) = lookup("ARXIV_SEARCH_REGISTRY_URL") {
            url::Url::parse(registry_url.trim())?;
            config.registry_url = registry_url.trim().to_string();
        }
        if lookup("ARXIV_SEARCH_NO_VERSION_CHECK").is_some_and(|v| flag_set(&v)) {
            config.version_check = false;
        }

        Ok(config)
    }

    /// Set the retry budget for transient failures.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Read a boolean environment flag.
///
/// Empty and `n`, `no`, `f`, `false`, `off`, `0` (any case) are unset; any
/// other value is set. Matches clap's `FalseyValueParser`.
#[must_use]
pub fn flag_set(value: &str) -> bool {
    const FALSEY: [&str; 6] = ["n", "no", "f", "false", "off", "0"];
    !value.is_empty() && !FALSEY.iter().any(|f| value.eq_ignore_ascii_case(f))
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
