//! Disk-backed team logo cache.
//!
//! Logos are downloaded once per abbreviation, trimmed to their opaque
//! bounding box, scaled so the longest edge is 64 pixels, and saved as
//! `<dir>/<lowercase-abbreviation>.png`. A file on disk short-circuits the
//! network forever: the cache has no invalidation or refresh policy.

use image::{DynamicImage, GenericImageView, RgbaImage};
use log::{debug, error};
use reqwest::Client;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest edge of a cached logo, in pixels.
pub const LOGO_EDGE: u32 = 64;

#[derive(Debug)]
pub enum LogoError {
    Http(reqwest::Error),
    Image(image::ImageError),
}

impl fmt::Display for LogoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogoError::Http(e) => write!(f, "download failed: {e}"),
            LogoError::Image(e) => write!(f, "image processing failed: {e}"),
        }
    }
}

#[derive(Debug)]
pub struct LogoCache {
    client: Client,
    dir: PathBuf,
    /// Abbreviations already tried this process; failures are not retried.
    attempted: HashSet<String>,
}

impl LogoCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(err) = std::fs::create_dir_all(&dir) {
            error!("could not create logo cache dir {}: {err}", dir.display());
        }
        Self {
            client: Client::builder()
                .user_agent("nflboard/0.1 (led matrix scoreboard)")
                .build()
                .unwrap_or_default(),
            dir,
            attempted: HashSet::new(),
        }
    }

    /// Cache file path for an abbreviation, whether or not the file exists.
    pub fn path_for(&self, abbreviation: &str) -> PathBuf {
        self.dir.join(format!("{}.png", abbreviation.to_lowercase()))
    }

    /// Return the local logo path, downloading and processing it on first
    /// reference. An existing file skips the network entirely. Any failure is
    /// logged and yields `None`; the caller skips drawing that logo.
    pub async fn ensure(&mut self, abbreviation: &str, url: &str) -> Option<PathBuf> {
        let destination = self.path_for(abbreviation);
        if destination.exists() {
            return Some(destination);
        }

        // One download attempt per abbreviation per process.
        if !self.attempted.insert(abbreviation.to_lowercase()) {
            return None;
        }

        debug!("caching logo for {abbreviation} from {url}");
        match self.download_and_store(url, &destination).await {
            Ok(()) => Some(destination),
            Err(err) => {
                error!("failed to cache logo {url}: {err}");
                None
            }
        }
    }

    async fn download_and_store(&self, url: &str, destination: &Path) -> Result<(), LogoError> {
        let bytes = self
            .client
            .get(url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(LogoError::Http)?
            .bytes()
            .await
            .map_err(LogoError::Http)?;

        let decoded = image::load_from_memory(&bytes).map_err(LogoError::Image)?;
        let prepared = prepare_logo(decoded);
        prepared
            .save_with_format(destination, image::ImageFormat::Png)
            .map_err(LogoError::Image)?;
        Ok(())
    }
}

/// Trim fully transparent borders and scale so the longest edge is
/// `LOGO_EDGE`, preserving aspect ratio. Images already small enough are left
/// at their trimmed size.
fn prepare_logo(img: DynamicImage) -> DynamicImage {
    let rgba = img.to_rgba8();
    let trimmed = match opaque_bounds(&rgba) {
        Some((x, y, w, h)) => DynamicImage::ImageRgba8(rgba).crop_imm(x, y, w, h),
        // Fully transparent image: nothing to trim.
        None => DynamicImage::ImageRgba8(rgba),
    };
    if trimmed.width().max(trimmed.height()) > LOGO_EDGE {
        trimmed.thumbnail(LOGO_EDGE, LOGO_EDGE)
    } else {
        trimmed
    }
}

/// Bounding box (x, y, width, height) of the non-transparent pixels, or
/// `None` when every pixel is fully transparent.
fn opaque_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut seen = false;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel.0[3] > 0 {
            seen = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if seen {
        Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
    } else {
        None
    }
}
