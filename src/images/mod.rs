use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Client;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::sleep;

use crate::config::ImageSettings;

const DOWNLOAD_ATTEMPTS: u32 = 2;

/// Background boat image downloader.
///
/// Submissions are fire-and-forget: each spawns a task gated by a worker
/// semaphore, and an in-flight registry ensures only one task per uid runs
/// at a time. Already-downloaded images are skipped up front.
pub struct ImageFetcher {
    client: Client,
    images_dir: PathBuf,
    in_flight: Arc<Mutex<HashSet<String>>>,
    workers: Arc<Semaphore>,
    retry_pause: Duration,
}

impl ImageFetcher {
    pub fn new(settings: &ImageSettings, images_dir: PathBuf) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to build image HTTP client")?;

        fs::create_dir_all(&images_dir).context("Failed to create images directory")?;

        Ok(Self {
            client,
            images_dir,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            workers: Arc::new(Semaphore::new(settings.max_workers)),
            retry_pause: Duration::from_millis(settings.retry_pause_ms),
        })
    }

    pub fn image_path(&self, uid: &str) -> PathBuf {
        self.images_dir.join(format!("{uid}.jpg"))
    }

    pub fn has_image(&self, uid: &str) -> bool {
        fs::metadata(self.image_path(uid))
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    /// Queue a download for `uid` unless the image already exists or a
    /// download for it is already running. The referring page URL is sent
    /// along since some galleries reject referer-less image requests.
    pub fn submit(self: &Arc<Self>, uid: &str, image_url: &str, referer: &str) {
        if self.has_image(uid) {
            return;
        }
        if !self.claim(uid) {
            debug!("Image download for {} already in flight", uid);
            return;
        }

        let fetcher = Arc::clone(self);
        let uid = uid.to_string();
        let image_url = image_url.to_string();
        let referer = referer.to_string();

        tokio::spawn(async move {
            let _permit = fetcher.workers.acquire().await;
            if let Err(e) = fetcher.download(&uid, &image_url, &referer).await {
                warn!("Image download failed for {}: {}", uid, e);
            }
            fetcher.release(&uid);
        });
    }

    async fn download(&self, uid: &str, image_url: &str, referer: &str) -> Result<()> {
        let mut last_error = None;

        for attempt in 1..=DOWNLOAD_ATTEMPTS {
            match self.fetch_bytes(image_url, referer).await {
                Ok(bytes) => {
                    write_image_atomic(&self.image_path(uid), &bytes)?;
                    debug!("Saved image for {} ({} bytes)", uid, bytes.len());
                    return Ok(());
                }
                Err(e) => {
                    if attempt < DOWNLOAD_ATTEMPTS {
                        sleep(self.retry_pause).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("No download attempts made")))
    }

    async fn fetch_bytes(&self, image_url: &str, referer: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(image_url)
            .header("Referer", referer)
            .send()
            .await
            .context("Failed to send image request")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let bytes = response.bytes().await.context("Failed to read image body")?;
        if bytes.is_empty() {
            anyhow::bail!("Empty image body");
        }
        Ok(bytes.to_vec())
    }

    fn claim(&self, uid: &str) -> bool {
        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        in_flight.insert(uid.to_string())
    }

    fn release(&self, uid: &str) {
        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        in_flight.remove(uid);
    }
}

/// Write via a sibling temp file and rename. An interrupted write must never
/// leave a partial artifact behind: `has_image` would treat it as present and
/// the corrupt image would never be re-fetched.
fn write_image_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("jpg.tmp");
    fs::write(&tmp, bytes).context("Failed to write temp image file")?;
    fs::rename(&tmp, path).context("Failed to move image file into place")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_fetcher(name: &str) -> Arc<ImageFetcher> {
        let dir = std::env::temp_dir().join(format!(
            "sportfish_images_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        Arc::new(ImageFetcher::new(&ImageSettings::default(), dir).unwrap())
    }

    #[test]
    fn test_claim_is_exclusive_until_released() {
        let fetcher = temp_fetcher("claim");

        assert!(fetcher.claim("reel_tight"));
        assert!(!fetcher.claim("reel_tight"));
        fetcher.release("reel_tight");
        assert!(fetcher.claim("reel_tight"));
    }

    #[test]
    fn test_existing_image_detected() {
        let fetcher = temp_fetcher("existing");

        assert!(!fetcher.has_image("reel_tight"));
        fs::write(fetcher.image_path("reel_tight"), b"jpeg bytes").unwrap();
        assert!(fetcher.has_image("reel_tight"));
    }

    #[test]
    fn test_empty_image_file_not_counted() {
        let fetcher = temp_fetcher("empty");
        fs::write(fetcher.image_path("reel_tight"), b"").unwrap();
        assert!(!fetcher.has_image("reel_tight"));
    }

    #[test]
    fn test_image_write_is_atomic() {
        let fetcher = temp_fetcher("atomic");
        let path = fetcher.image_path("reel_tight");

        write_image_atomic(&path, b"jpeg bytes").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"jpeg bytes");
        assert!(fetcher.has_image("reel_tight"));

        let leftovers: Vec<_> = fs::read_dir(&fetcher.images_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
