//! Ping submission to search engine endpoints.

use reqwest::blocking::Client;

use crate::config::{ping_request_url, PingConfig};
use crate::error::{Result, SitemapError};

/// Submits a sitemap location to a ping endpoint.
pub trait PingNotifier {
    /// Submit `sitemap_url` to `endpoint`.
    ///
    /// # Errors
    /// `Submission` if the endpoint cannot be reached or does not answer
    /// with status 200.
    fn submit(&self, endpoint: &str, sitemap_url: &str) -> Result<()>;
}

/// Blocking HTTP notifier. Failed submissions are reported, never retried.
#[derive(Debug, Clone)]
pub struct HttpPingNotifier {
    client: Client,
}

impl HttpPingNotifier {
    /// Create a notifier with a client configured from `config`.
    pub fn new(config: &PingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }

    /// Use an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl PingNotifier for HttpPingNotifier {
    fn submit(&self, endpoint: &str, sitemap_url: &str) -> Result<()> {
        let url = ping_request_url(endpoint, sitemap_url);
        tracing::debug!(url = %url, "Submitting ping");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| SitemapError::Submission {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            Ok(())
        } else {
            Err(SitemapError::Submission {
                url,
                reason: format!("unexpected status {status}"),
            })
        }
    }
}
