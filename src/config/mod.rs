pub mod settings;

pub use settings::{AppConfig, DataSource, FreshnessSettings, ImageSettings, ScraperSettings};
