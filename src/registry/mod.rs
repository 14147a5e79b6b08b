use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::ScraperSettings;
use crate::domain::TournamentPages;
use crate::errors::parse_context;
use crate::identity::normalize;

/// Client for the remote tournament registry: a JSON document mapping
/// tournament names to their per-dataset page URLs.
pub struct RemoteRegistry {
    client: Client,
    registry_url: String,
}

impl RemoteRegistry {
    pub fn new(settings: &ScraperSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.registry_timeout_secs))
            .build()
            .context("Failed to build registry HTTP client")?;

        Ok(Self {
            client,
            registry_url: settings.registry_url.clone(),
        })
    }

    /// Look up a tournament's page URLs. Tournament names are matched by
    /// normalized form, so "big rock" finds "Big Rock".
    pub async fn tournament_pages(&self, tournament: &str) -> Result<TournamentPages> {
        let document = self.fetch_registry().await?;
        let entry = Self::find_entry(&document, tournament).with_context(|| {
            format!("Tournament '{}' not found in remote registry", tournament)
        })?;

        serde_json::from_value(entry.clone()).context(parse_context("tournament registry entry"))
    }

    async fn fetch_registry(&self) -> Result<Value> {
        self.client
            .get(&self.registry_url)
            .send()
            .await
            .context("Failed to fetch tournament registry")?
            .json()
            .await
            .context(parse_context("tournament registry JSON"))
    }

    fn find_entry<'a>(document: &'a Value, tournament: &str) -> Option<&'a Value> {
        let entries = document.as_object()?;
        let wanted = normalize(tournament);
        entries
            .iter()
            .find(|(name, _)| normalize(name) == wanted)
            .map(|(_, value)| value)
    }
}
