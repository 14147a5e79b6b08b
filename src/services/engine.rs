use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDateTime};
use log::{info, warn};
use scraper::Html;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::CacheStore;
use crate::config::{AppConfig, DataSource};
use crate::domain::{Boat, Event, LeaderboardRow, RefreshCounts};
use crate::feed;
use crate::hooks;
use crate::http::FetchClient;
use crate::images::ImageFetcher;
use crate::leaderboard;
use crate::pagination::{discover, EmptyPageTally};
use crate::registry::RemoteRegistry;
use crate::roster;

const PARTICIPANTS: &str = "participants";
const EVENTS: &str = "events";
const LEADERBOARD: &str = "leaderboard";
const DEMO_EVENTS: &str = "demo_events";

#[derive(Debug, Serialize)]
pub struct DatasetStatus {
    pub last_refreshed: Option<NaiveDateTime>,
    pub fresh: bool,
}

#[derive(Debug, Serialize)]
pub struct EngineStatus {
    pub mode: &'static str,
    pub tournament: String,
    pub participants: DatasetStatus,
    pub events: DatasetStatus,
    pub leaderboard: DatasetStatus,
}

/// Facade over the scraping pipeline: owns the cache, the fetch client, the
/// registry lookup, and the image collaborator.
///
/// Query operations are freshness-gated: a dataset refreshes when its
/// freshness window lapsed or its artifact is missing, and a failed refresh
/// degrades to the last-known persisted data rather than erroring out.
pub struct TournamentEngine {
    config: AppConfig,
    store: CacheStore,
    client: FetchClient,
    registry: RemoteRegistry,
    images: Arc<ImageFetcher>,
}

impl TournamentEngine {
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = CacheStore::new(&config.cache_dir)?;
        let client = FetchClient::new(&config.scraper)?;
        let registry = RemoteRegistry::new(&config.scraper)?;
        let images = Arc::new(ImageFetcher::new(&config.images, store.images_dir())?);

        Ok(Self {
            config,
            store,
            client,
            registry,
            images,
        })
    }

    pub fn source(&self) -> DataSource {
        self.config.source
    }

    // --- Query Operations ---

    pub async fn participants(&self, tournament: &str, force: bool) -> Result<Vec<Boat>> {
        let window = self.config.freshness.participants_minutes;
        if let Some(cached) = self.serve_cached(tournament, PARTICIPANTS, window, force) {
            return Ok(cached);
        }

        match self.refresh_participants(tournament).await {
            Ok(boats) => Ok(boats),
            Err(e) => Ok(self.degrade(tournament, PARTICIPANTS, e)),
        }
    }

    pub async fn events(&self, tournament: &str, force: bool) -> Result<Vec<Event>> {
        match self.config.source {
            DataSource::Live => self.live_events(tournament, force).await,
            DataSource::Demo => self.demo_events(tournament, force).await,
        }
    }

    pub async fn leaderboard(&self, tournament: &str, force: bool) -> Result<Vec<LeaderboardRow>> {
        let window = self.config.freshness.leaderboard_minutes;
        if let Some(cached) = self.serve_cached(tournament, LEADERBOARD, window, force) {
            return Ok(cached);
        }

        match self.refresh_leaderboard(tournament).await {
            Ok(rows) => Ok(rows),
            Err(e) => Ok(self.degrade(tournament, LEADERBOARD, e)),
        }
    }

    /// Currently open catch attempts. Live data pairs hook-ups to
    /// resolutions per boat in FIFO order; demo data pairs via the
    /// correlation ids the synthetic injector assigns.
    pub async fn active_hooks(&self, tournament: &str) -> Result<Vec<Event>> {
        let events = self.events(tournament, false).await?;
        let active = match self.config.source {
            DataSource::Live => hooks::active_hooks(&events),
            DataSource::Demo => hooks::active_hooks_by_correlation(&events),
        };
        Ok(active)
    }

    pub async fn refresh_all(&self, tournament: &str) -> Result<RefreshCounts> {
        info!("Starting full refresh for {}", tournament);
        let participants = self.participants(tournament, true).await?;
        let events = self.events(tournament, true).await?;
        let leaderboard = self.leaderboard(tournament, true).await?;

        Ok(RefreshCounts {
            participants: participants.len(),
            events: events.len(),
            leaderboard: leaderboard.len(),
        })
    }

    pub fn status(&self, tournament: &str) -> EngineStatus {
        EngineStatus {
            mode: match self.config.source {
                DataSource::Live => "live",
                DataSource::Demo => "demo",
            },
            tournament: tournament.to_string(),
            participants: self.dataset_status(
                tournament,
                PARTICIPANTS,
                self.config.freshness.participants_minutes,
            ),
            events: self.dataset_status(tournament, EVENTS, self.config.freshness.events_minutes),
            leaderboard: self.dataset_status(
                tournament,
                LEADERBOARD,
                self.config.freshness.leaderboard_minutes,
            ),
        }
    }

    /// Path to the stored image behind an emitted `image_path` entry, when
    /// downloaded. The identifier is re-normalized so arbitrary request
    /// strings cannot escape the images directory.
    pub fn boat_image(&self, uid: &str) -> Option<std::path::PathBuf> {
        let uid = crate::identity::normalize(uid);
        if self.images.has_image(&uid) {
            Some(self.images.image_path(&uid))
        } else {
            None
        }
    }

    fn dataset_status(&self, tournament: &str, dataset: &str, window: i64) -> DatasetStatus {
        let key = CacheStore::dataset_key(tournament, dataset);
        DatasetStatus {
            last_refreshed: self.store.last_refreshed(&key),
            fresh: self.store.is_fresh(&key, window),
        }
    }

    // --- Refresh Paths ---

    async fn refresh_participants(&self, tournament: &str) -> Result<Vec<Boat>> {
        let pages = self.registry.tournament_pages(tournament).await?;
        let url = pages
            .participants
            .with_context(|| format!("No participants URL configured for {}", tournament))?;

        let html = self.client.fetch_html(&url).await?;
        let entries = {
            let page = Html::parse_document(&html);
            roster::parse_roster(&page, &url)
        };

        for entry in &entries {
            if let Some(image_url) = &entry.image_url {
                self.images.submit(&entry.boat.uid, image_url, &url);
            }
        }

        let boats: Vec<Boat> = entries.into_iter().map(|e| e.boat).collect();
        self.store.save_dataset(tournament, PARTICIPANTS, &boats)?;
        self.store
            .touch(&CacheStore::dataset_key(tournament, PARTICIPANTS))?;

        info!("Refreshed {} participants for {}", boats.len(), tournament);
        Ok(boats)
    }

    async fn live_events(&self, tournament: &str, force: bool) -> Result<Vec<Event>> {
        let window = self.config.freshness.events_minutes;
        if let Some(cached) = self.serve_cached(tournament, EVENTS, window, force) {
            return Ok(cached);
        }

        match self.refresh_events(tournament).await {
            Ok(events) => Ok(events),
            Err(e) => Ok(self.degrade(tournament, EVENTS, e)),
        }
    }

    async fn refresh_events(&self, tournament: &str) -> Result<Vec<Event>> {
        let pages = self.registry.tournament_pages(tournament).await?;
        let feed_url = pages
            .events
            .with_context(|| format!("No events URL configured for {}", tournament))?;

        let roster = self.roster_index(tournament);
        let year = Local::now().year();

        let first_html = self.client.fetch_html(&feed_url).await?;
        let (page_urls, first_events) = {
            let page = Html::parse_document(&first_html);
            (discover(&feed_url, &page), feed::parse_events(&page, &roster, year))
        };

        let mut events = Vec::new();
        let mut tally = EmptyPageTally::new();
        let mut stop = tally.record(feed::merge_events(&mut events, first_events));

        for url in page_urls.iter().skip(1) {
            if stop {
                break;
            }
            let found = match self.client.fetch_html(url).await {
                Ok(html) => {
                    let page_events = {
                        let page = Html::parse_document(&html);
                        feed::parse_events(&page, &roster, year)
                    };
                    feed::merge_events(&mut events, page_events)
                }
                Err(e) => {
                    warn!("Failed to fetch feed page {}: {}", url, e);
                    0
                }
            };
            stop = tally.record(found);
        }

        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.store.save_dataset(tournament, EVENTS, &events)?;
        self.store
            .touch(&CacheStore::dataset_key(tournament, EVENTS))?;

        info!(
            "Refreshed {} events across up to {} page(s) for {}",
            events.len(),
            page_urls.len(),
            tournament
        );
        Ok(events)
    }

    async fn refresh_leaderboard(&self, tournament: &str) -> Result<Vec<LeaderboardRow>> {
        let pages = self.registry.tournament_pages(tournament).await?;
        let url = pages
            .leaderboard
            .with_context(|| format!("No leaderboard URL configured for {}", tournament))?;

        let html = self.client.fetch_html(&url).await?;
        let rows = {
            let page = Html::parse_document(&html);
            leaderboard::build_leaderboard(&page)
        };

        self.store.save_dataset(tournament, LEADERBOARD, &rows)?;
        self.store
            .touch(&CacheStore::dataset_key(tournament, LEADERBOARD))?;

        info!("Refreshed {} leaderboard rows for {}", rows.len(), tournament);
        Ok(rows)
    }

    // --- Demo Dataset ---

    async fn demo_events(&self, tournament: &str, force: bool) -> Result<Vec<Event>> {
        if !force {
            if let Some(cached) = self.store.load_dataset(tournament, DEMO_EVENTS) {
                return Ok(cached);
            }
        }
        self.build_demo_dataset(tournament).await
    }

    /// Rebuild the demo dataset: refresh the live feed, then inject a
    /// correlated synthetic hook-up ahead of each resolution lacking one.
    pub async fn build_demo_dataset(&self, tournament: &str) -> Result<Vec<Event>> {
        let live = self.live_events(tournament, true).await?;
        let mut events = hooks::inject_synthetic_hookups(live);
        events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        self.store.save_dataset(tournament, DEMO_EVENTS, &events)?;
        info!(
            "Built demo dataset with {} events for {}",
            events.len(),
            tournament
        );
        Ok(events)
    }

    // --- Helpers ---

    /// Serve a cached dataset only when its freshness window holds AND its
    /// artifact is present on disk. The two conditions are independent:
    /// fresh metadata over a missing or corrupt artifact still refreshes.
    fn serve_cached<T>(&self, tournament: &str, dataset: &str, window: i64, force: bool) -> Option<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        if force {
            return None;
        }
        let key = CacheStore::dataset_key(tournament, dataset);
        if !self.store.is_fresh(&key, window) || !self.store.dataset_exists(tournament, dataset) {
            return None;
        }
        self.store.load_dataset(tournament, dataset)
    }

    fn roster_index(&self, tournament: &str) -> HashMap<String, Boat> {
        let boats: Vec<Boat> = self
            .store
            .load_dataset(tournament, PARTICIPANTS)
            .unwrap_or_default();
        boats.into_iter().map(|b| (b.uid.clone(), b)).collect()
    }

    /// Fall back to the last-known persisted dataset. When none exists an
    /// empty one is persisted so downstream consumers see a stable shape.
    fn degrade<T>(&self, tournament: &str, dataset: &str, error: anyhow::Error) -> Vec<T>
    where
        T: Serialize + serde::de::DeserializeOwned,
    {
        warn!("Refresh of {} failed for {}: {:#}", dataset, tournament, error);

        match self.store.load_dataset(tournament, dataset) {
            Some(data) => data,
            None => {
                let empty: Vec<T> = Vec::new();
                if let Err(e) = self.store.save_dataset(tournament, dataset, &empty) {
                    warn!("Failed to persist empty {} dataset: {:#}", dataset, e);
                }
                empty
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventKind;
    use chrono::NaiveDate;

    fn temp_engine(name: &str, source: DataSource) -> TournamentEngine {
        let mut config = AppConfig::new(source);
        config.cache_dir = std::env::temp_dir().join(format!(
            "sportfish_engine_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&config.cache_dir);
        TournamentEngine::new(config).unwrap()
    }

    fn event(uid: &str, kind: EventKind, minute: u32, hookup_id: Option<&str>) -> Event {
        Event {
            timestamp: NaiveDate::from_ymd_opt(2025, 6, 14)
                .unwrap()
                .and_hms_opt(14, minute, 0)
                .unwrap(),
            kind,
            boat: uid.to_string(),
            uid: uid.to_string(),
            details: String::new(),
            hookup_id: hookup_id.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_fresh_events_served_from_cache() {
        let engine = temp_engine("fresh_events", DataSource::Live);
        let cached = vec![event("reel_tight", EventKind::Released, 5, None)];

        engine.store.save_dataset("Big Rock", EVENTS, &cached).unwrap();
        engine
            .store
            .touch(&CacheStore::dataset_key("Big Rock", EVENTS))
            .unwrap();

        let events = engine.events("Big Rock", false).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].uid, "reel_tight");
    }

    #[tokio::test]
    async fn test_demo_hooks_pair_by_correlation() {
        let engine = temp_engine("demo_hooks", DataSource::Demo);
        let dataset = vec![
            event("reel_tight", EventKind::HookedUp, 5, Some("reel_tight_a")),
            event("reel_tight", EventKind::Released, 30, Some("reel_tight_a")),
            event("wave_dancer", EventKind::HookedUp, 10, Some("wave_dancer_b")),
        ];
        engine
            .store
            .save_dataset("Big Rock", DEMO_EVENTS, &dataset)
            .unwrap();

        let active = engine.active_hooks("Big Rock").await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].uid, "wave_dancer");
    }

    #[tokio::test]
    async fn test_status_reflects_touched_datasets() {
        let engine = temp_engine("status", DataSource::Live);
        engine
            .store
            .touch(&CacheStore::dataset_key("Big Rock", EVENTS))
            .unwrap();

        let status = engine.status("Big Rock");
        assert_eq!(status.mode, "live");
        assert!(status.events.fresh);
        assert!(status.events.last_refreshed.is_some());
        assert!(!status.participants.fresh);
        assert!(status.participants.last_refreshed.is_none());
    }

    #[test]
    fn test_fresh_metadata_without_artifact_forces_refresh() {
        let engine = temp_engine("gate", DataSource::Live);
        engine
            .store
            .touch(&CacheStore::dataset_key("Big Rock", EVENTS))
            .unwrap();

        // Fresh metadata alone is not enough to serve from cache.
        let cached: Option<Vec<Event>> = engine.serve_cached("Big Rock", EVENTS, 2, false);
        assert!(cached.is_none());

        let dataset = vec![event("reel_tight", EventKind::Released, 5, None)];
        engine.store.save_dataset("Big Rock", EVENTS, &dataset).unwrap();
        let cached: Option<Vec<Event>> = engine.serve_cached("Big Rock", EVENTS, 2, false);
        assert_eq!(cached.unwrap().len(), 1);

        // force bypasses the gate entirely.
        let forced: Option<Vec<Event>> = engine.serve_cached("Big Rock", EVENTS, 2, true);
        assert!(forced.is_none());
    }

    #[test]
    fn test_boat_image_resolves_normalized_uid() {
        let engine = temp_engine("boat_image", DataSource::Live);
        std::fs::write(engine.images.image_path("reel_tight"), b"jpeg bytes").unwrap();

        // Display-name lookups resolve to the same stored file.
        assert!(engine.boat_image("reel_tight").is_some());
        assert!(engine.boat_image("Reel Tight").is_some());
        assert!(engine.boat_image("wave_dancer").is_none());
        // Traversal-ish input normalizes to a plain identifier, not a path.
        assert!(engine.boat_image("../../cache").is_none());
    }

    #[test]
    fn test_roster_index_keyed_by_uid() {
        let engine = temp_engine("roster_index", DataSource::Live);
        let boats = vec![Boat {
            uid: "reel_tight".to_string(),
            boat: "Reel Tight".to_string(),
            boat_type: String::new(),
            image_path: "/boat-image/reel_tight".to_string(),
        }];
        engine.store.save_dataset("Big Rock", PARTICIPANTS, &boats).unwrap();

        let index = engine.roster_index("Big Rock");
        assert_eq!(index.get("reel_tight").unwrap().boat, "Reel Tight");
    }
}
