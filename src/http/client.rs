use anyhow::{Context, Result};
use log::warn;
use rand::seq::SliceRandom;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::ScraperSettings;
use crate::errors::fetch_context;

/// HTML fetcher with a bounded retry/fallback chain:
/// direct fetch, optional proxy fetch, then one delayed direct retry.
pub struct FetchClient {
    client: Client,
    user_agents: &'static [&'static str],
    direct_timeout: Duration,
    proxy_timeout: Duration,
    retry_timeout: Duration,
    retry_backoff: Duration,
    proxy_url: Option<String>,
}

impl FetchClient {
    pub fn new(settings: &ScraperSettings) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            user_agents: settings.user_agents,
            direct_timeout: Duration::from_secs(settings.direct_timeout_secs),
            proxy_timeout: Duration::from_secs(settings.proxy_timeout_secs),
            retry_timeout: Duration::from_secs(settings.retry_timeout_secs),
            retry_backoff: Duration::from_millis(settings.retry_backoff_ms),
            proxy_url: settings.proxy_url.clone(),
        })
    }

    /// Fetch a page body, falling through the retry chain. Never blocks
    /// past the sum of the configured timeouts.
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        match self.get_body(url, self.direct_timeout).await {
            Ok(body) => return Ok(body),
            Err(e) => warn!("Direct fetch failed for {}: {}", url, e),
        }

        if let Some(proxy) = &self.proxy_url {
            let proxied = Self::build_proxy_url(proxy, url);
            match self.get_body(&proxied, self.proxy_timeout).await {
                Ok(body) => return Ok(body),
                Err(e) => warn!("Proxy fetch failed for {}: {}", url, e),
            }
        }

        sleep(self.retry_backoff).await;
        self.get_body(url, self.retry_timeout)
            .await
            .context(fetch_context(url))
    }

    async fn get_body(&self, url: &str, timeout: Duration) -> Result<String> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header("User-Agent", self.pick_user_agent())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .send()
            .await
            .context("Failed to send GET request")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let body = response.text().await.context("Failed to read body")?;
        if body.trim().is_empty() {
            anyhow::bail!("Empty response body");
        }
        Ok(body)
    }

    fn pick_user_agent(&self) -> &str {
        self.user_agents
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or("Mozilla/5.0")
    }

    fn build_proxy_url(proxy: &str, target: &str) -> String {
        let separator = if proxy.contains('?') { '&' } else { '?' };
        format!("{}{}url={}", proxy, separator, urlencoding::encode(target))
    }
}
