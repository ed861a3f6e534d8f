//! Configuration constants and validation functions for sitemap documents.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{Result, SitemapError};

/// XML version written in the document declaration.
pub const XML_VERSION: &str = "1.0";

/// Encoding written in the document declaration.
pub const XML_ENCODING: &str = "UTF-8";

/// Default namespace of every sitemap document.
pub const SITEMAPS_ORG_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Google image sitemap extension namespace (prefix `image`).
pub const IMAGE_NAMESPACE: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Google video sitemap extension namespace (prefix `video`).
pub const VIDEO_NAMESPACE: &str = "http://www.google.com/schemas/sitemap-video/1.1";

/// Google news sitemap extension namespace (prefix `news`).
pub const NEWS_NAMESPACE: &str = "http://www.google.com/schemas/sitemap-news/0.9";

/// Maximum number of entries in a single sitemap.
pub const MAXIMUM_ENTRIES: usize = 50_000;

/// Maximum number of entries in a Google news sitemap.
pub const NEWS_MAXIMUM_ENTRIES: usize = 1_000;

/// Advisory maximum size of a rendered sitemap in bytes (10 MiB).
pub const MAXIMUM_FILESIZE: u64 = 10 * 1024 * 1024;

/// Advisory maximum size of a rendered Google sitemap in bytes (50 MiB).
pub const GOOGLE_MAXIMUM_FILESIZE: u64 = 50 * 1024 * 1024;

/// Identifier of the Google ping endpoint.
pub const GOOGLE_PING_IDENTIFIER: &str = "google";

/// Google ping endpoint; the URL-encoded sitemap location is appended.
pub const GOOGLE_PING_URL: &str = "http://www.google.com/webmasters/tools/ping?sitemap=";

/// Ping request timeout in seconds.
pub const PING_TIMEOUT_SECS: u64 = 10;

/// W3C datetime format used for rendered dates.
pub const W3C_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Name prefix required for validation callbacks.
pub const VALIDATION_PREFIX: &str = "validation_";

/// Name prefix required for content callbacks.
pub const CONTENT_PREFIX: &str = "content_";

/// Environment variable overriding the ping timeout.
pub const PING_TIMEOUT_ENV: &str = "SITEMAP_PING_TIMEOUT_SECS";

/// User agent string identifying this library.
const USER_AGENT: &str = concat!("regelrecht-sitemap/", env!("CARGO_PKG_VERSION"));

/// Node name pattern: an XML name without a namespace colon.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NODE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("valid regex"));

/// Check whether a string is an absolute URL with a host.
///
/// # Examples
/// ```
/// use regelrecht_sitemap::config::is_valid_url;
///
/// assert!(is_valid_url("http://example.com/a"));
/// assert!(!is_valid_url("not a url"));
/// assert!(!is_valid_url("mailto:someone@example.com"));
/// ```
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    match url::Url::parse(value) {
        Ok(parsed) => parsed.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}

/// Validate a URL argument.
///
/// # Returns
/// * `Ok(())` if the URL is absolute and has a host
/// * `Err(SitemapError::InvalidParameter)` otherwise
pub fn validate_url(value: &str) -> Result<()> {
    if is_valid_url(value) {
        Ok(())
    } else {
        Err(SitemapError::InvalidParameter(format!(
            "'{value}' is not a valid URL"
        )))
    }
}

/// Validate a schema node name.
///
/// Names become XML tag names after prefixing, so they must be XML names
/// and must not contain a namespace colon themselves.
pub fn validate_node_name(name: &str) -> Result<()> {
    if NODE_NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(SitemapError::Configuration(format!(
            "'{name}' is not a valid node name"
        )))
    }
}

/// Validate a namespace prefix. The empty prefix denotes the default namespace.
pub fn validate_namespace_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() || NODE_NAME_PATTERN.is_match(prefix) {
        Ok(())
    } else {
        Err(SitemapError::InvalidParameter(format!(
            "'{prefix}' is not a valid namespace prefix"
        )))
    }
}

/// Build the request URL for a ping submission.
///
/// The sitemap location is form-urlencoded and appended to the endpoint.
///
/// # Examples
/// ```
/// use regelrecht_sitemap::config::ping_request_url;
///
/// assert_eq!(
///     ping_request_url("http://ping.example/?sitemap=", "http://example.com/sitemap.xml"),
///     "http://ping.example/?sitemap=http%3A%2F%2Fexample.com%2Fsitemap.xml"
/// );
/// ```
#[must_use]
pub fn ping_request_url(endpoint: &str, sitemap_url: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(sitemap_url.as_bytes()).collect();
    format!("{endpoint}{encoded}")
}

/// Settings for ping submissions.
#[derive(Debug, Clone)]
pub struct PingConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl PingConfig {
    /// Create a configuration with the default timeout and user agent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(PING_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Read overrides from the environment.
    ///
    /// `SITEMAP_PING_TIMEOUT_SECS` sets the timeout; unparsable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let timeout_secs = std::env::var(PING_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(PING_TIMEOUT_SECS);

        Self::new().with_timeout(Duration::from_secs(timeout_secs))
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for PingConfig {
    fn default() -> Self {
        Self::new()
    }
}
