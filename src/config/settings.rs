use std::path::PathBuf;

/// Where event data comes from: the live feed, or the locally built demo
/// dataset with synthetic hook-ups injected. Chosen once at startup and
/// injected into the engine; nothing else branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DataSource {
    #[default]
    Live,
    Demo,
}

pub struct ScraperSettings {
    pub user_agents: &'static [&'static str],
    pub direct_timeout_secs: u64,
    pub proxy_timeout_secs: u64,
    pub retry_timeout_secs: u64,
    pub retry_backoff_ms: u64,
    /// Optional proxy endpoint tried between the two direct attempts.
    pub proxy_url: Option<String>,
    pub registry_url: String,
    pub registry_timeout_secs: u64,
}

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0 Safari/537.36",
];

const REGISTRY_URL: &str = "https://js9467.github.io/Brtourney/settings.json";

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            user_agents: USER_AGENTS,
            direct_timeout_secs: 12,
            proxy_timeout_secs: 18,
            retry_timeout_secs: 10,
            retry_backoff_ms: 500,
            proxy_url: None,
            registry_url: REGISTRY_URL.to_string(),
            registry_timeout_secs: 12,
        }
    }
}

/// Maximum age, per dataset, before cached data is eligible for re-fetch.
pub struct FreshnessSettings {
    pub participants_minutes: i64,
    pub events_minutes: i64,
    pub leaderboard_minutes: i64,
}

impl Default for FreshnessSettings {
    fn default() -> Self {
        Self {
            participants_minutes: 1440,
            events_minutes: 2,
            leaderboard_minutes: 2,
        }
    }
}

pub struct ImageSettings {
    pub max_workers: usize,
    pub timeout_secs: u64,
    pub retry_pause_ms: u64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            max_workers: 6,
            timeout_secs: 12,
            retry_pause_ms: 400,
        }
    }
}

pub struct AppConfig {
    pub scraper: ScraperSettings,
    pub freshness: FreshnessSettings,
    pub images: ImageSettings,
    pub source: DataSource,
    pub cache_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DataSource::Live)
    }
}

impl AppConfig {
    pub fn new(source: DataSource) -> Self {
        Self {
            scraper: ScraperSettings::default(),
            freshness: FreshnessSettings::default(),
            images: ImageSettings::default(),
            source,
            cache_dir: PathBuf::from("cache"),
        }
    }
}
