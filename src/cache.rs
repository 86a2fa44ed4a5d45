//! Disk-backed cache for landing-page captures.
//!
//! This module provides [`CaptureCache`], which maps a logical capture key
//! to a JPEG on disk with a time-to-live, falling through to a [`Capture`]
//! source on a miss.
//!
//! # Cache Layout
//!
//! One file per key under the configured directory: `<cacheKey>.jpg`.
//! The file's modification time is the freshness clock - no sidecar
//! metadata, no index.
//!
//! # Freshness
//!
//! | On-disk state | Outcome |
//! |---------------|---------|
//! | File present, age < TTL | Hit - bytes returned, no capture |
//! | File present, age ≥ TTL | Stale - file deleted, treated as a miss |
//! | File absent | Miss - capture, persist, return |
//! | Stat fails (not "missing") | Logged, treated as a miss |
//!
//! # Concurrency
//!
//! Two simultaneous resolves for the same key may both miss and both
//! capture, with the last writer winning on disk. This is a deliberate
//! relaxation: each write is a single complete capture, so the surviving
//! file is always valid, and the worst case is one redundant screenshot
//! per TTL window. There is no per-key single-flight lock.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use subscription_pdf_api::{
//!     BrowserSession, CaptureCache, ChromeBrowserFactory, PageCaptureEngine,
//! };
//!
//! let session = Arc::new(BrowserSession::new(Box::new(ChromeBrowserFactory::with_defaults())));
//! let engine = PageCaptureEngine::new(session);
//! let cache = CaptureCache::new("storage/capture-cache", Duration::from_secs(7 * 24 * 60 * 60));
//!
//! let data_uri = cache.resolve(
//!     "TEST_PLAN_INSTITUCIONAL_PIN",
//!     "https://x/landing?msisdn=56111111111&nohe=true",
//!     &engine,
//! )?;
//! assert!(data_uri.starts_with("data:image/jpeg;base64,"));
//! # Ok::<(), subscription_pdf_api::PdfServiceError>(())
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::capture::Capture;
use crate::config::ServiceConfig;
use crate::error::{PdfServiceError, Result};

/// On-disk freshness of a cached capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheState {
    /// Present and younger than the TTL.
    Fresh,
    /// Present but at or past the TTL.
    Stale,
    /// Absent (or unreadable, which is treated the same way).
    Miss,
}

/// Disk-backed, TTL-bounded store of landing-page screenshots.
///
/// The directory and TTL are explicit construction-time values; nothing is
/// derived from the executable location.
#[derive(Debug, Clone)]
pub struct CaptureCache {
    dir: PathBuf,
    ttl: Duration,
}

impl CaptureCache {
    /// Create a cache over `dir` with the given TTL.
    ///
    /// The directory is created lazily on first resolve.
    pub fn new<P: Into<PathBuf>>(dir: P, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// Create a cache from the service configuration.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.cache_dir.clone(), config.cache_ttl)
    }

    /// The configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// On-disk path for a capture key.
    pub fn path_for(&self, cache_key: &str) -> PathBuf {
        self.dir.join(format!("{}.jpg", cache_key))
    }

    /// Create the cache directory if absent. Idempotent.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| PdfServiceError::CacheIo(format!("creating {:?}: {}", self.dir, e)))
    }

    /// Resolve a capture key to a `data:image/jpeg;base64,...` URI.
    ///
    /// Serves a fresh cached file without touching the network; deletes a
    /// stale file and recaptures; captures and persists on a plain miss.
    ///
    /// # Errors
    ///
    /// Propagates capture failures ([`PdfServiceError::Launch`] /
    /// [`Navigation`](PdfServiceError::Navigation) /
    /// [`Capture`](PdfServiceError::Capture)) and
    /// [`PdfServiceError::CacheIo`] if the fresh result cannot be persisted.
    /// Read-side filesystem surprises never abort resolution - they are
    /// logged and handled as a miss.
    pub fn resolve(&self, cache_key: &str, url: &str, source: &dyn Capture) -> Result<String> {
        self.ensure_dir()?;
        let path = self.path_for(cache_key);

        match self.probe(&path) {
            CacheState::Fresh => {
                match fs::read(&path) {
                    Ok(bytes) => {
                        log::info!("Capture cache hit for {}", cache_key);
                        return Ok(to_data_uri(&bytes));
                    }
                    Err(e) => {
                        // Raced with an external delete between stat and
                        // read; recapture rather than fail the request.
                        log::error!("Cache read failed for {}: {} (recapturing)", cache_key, e);
                    }
                }
            }
            CacheState::Stale => {
                log::info!("Capture cache entry for {} expired, discarding", cache_key);
                if let Err(e) = fs::remove_file(&path) {
                    if e.kind() != ErrorKind::NotFound {
                        log::warn!("Failed to delete stale capture {:?}: {}", path, e);
                    }
                }
            }
            CacheState::Miss => {
                log::info!("Capture cache miss for {}", cache_key);
            }
        }

        log::debug!("Capturing {} for key {}", url, cache_key);
        let bytes = source.capture(url)?;

        fs::write(&path, &bytes)
            .map_err(|e| PdfServiceError::CacheIo(format!("writing {:?}: {}", path, e)))?;
        log::debug!("Persisted capture for {} ({} bytes)", cache_key, bytes.len());

        Ok(to_data_uri(&bytes))
    }

    /// Explicit presence/freshness probe.
    ///
    /// "File missing" is an expected state, not an error; only other stat
    /// failures are noteworthy, and even those only get logged.
    fn probe(&self, path: &Path) -> CacheState {
        let meta = match fs::metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return CacheState::Miss,
            Err(e) => {
                log::error!("Cache stat failed for {:?}: {}", path, e);
                return CacheState::Miss;
            }
        };

        let modified = match meta.modified() {
            Ok(modified) => modified,
            Err(e) => {
                log::error!("Cache mtime unavailable for {:?}: {}", path, e);
                return CacheState::Miss;
            }
        };

        match SystemTime::now().duration_since(modified) {
            Ok(age) if age < self.ttl => CacheState::Fresh,
            Ok(_) => CacheState::Stale,
            // mtime in the future (clock skew); the file cannot be stale
            Err(_) => CacheState::Fresh,
        }
    }
}

/// Base64-encode image bytes into a JPEG data URI.
fn to_data_uri(bytes: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", BASE64.encode(bytes))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Capture source that records every invocation.
    struct CountingSource {
        bytes: Vec<u8>,
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new(bytes: Vec<u8>) -> Self {
            Self {
                bytes,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Capture for CountingSource {
        fn capture(&self, _url: &str) -> crate::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.bytes.clone())
        }
    }

    const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    /// A fresh cached file must be served without invoking capture.
    #[test]
    fn test_fresh_hit_skips_capture() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CaptureCache::new(dir.path(), WEEK);
        let source = CountingSource::new(vec![9, 9, 9]);

        fs::write(cache.path_for("PLAN_INSTITUCIONAL_WIFI"), [1, 2, 3]).unwrap();

        let uri = cache
            .resolve("PLAN_INSTITUCIONAL_WIFI", "https://x/landing", &source)
            .unwrap();

        assert_eq!(source.calls(), 0, "Hit must not reach the network");
        assert_eq!(uri, format!("data:image/jpeg;base64,{}", BASE64.encode([1, 2, 3])));
    }

    /// A miss captures exactly once and persists the result under the key.
    #[test]
    fn test_miss_captures_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CaptureCache::new(dir.path(), WEEK);
        let source = CountingSource::new(vec![4, 5, 6]);

        let uri = cache
            .resolve("PLAN_INSTITUCIONAL_PIN", "https://x/landing", &source)
            .unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(uri, format!("data:image/jpeg;base64,{}", BASE64.encode([4, 5, 6])));
        assert_eq!(
            fs::read(cache.path_for("PLAN_INSTITUCIONAL_PIN")).unwrap(),
            vec![4, 5, 6],
            "Capture must be persisted for the next request"
        );
    }

    /// A stale entry is discarded and recaptured; the new bytes replace the
    /// old file.
    #[test]
    fn test_stale_entry_is_recaptured() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CaptureCache::new(dir.path(), Duration::from_millis(20));
        let source = CountingSource::new(vec![7, 7]);

        let path = cache.path_for("OLD_KEY");
        fs::write(&path, [1]).unwrap();
        std::thread::sleep(Duration::from_millis(50));

        let uri = cache.resolve("OLD_KEY", "https://x/landing", &source).unwrap();

        assert_eq!(source.calls(), 1, "Stale entry must trigger exactly one capture");
        assert_eq!(uri, format!("data:image/jpeg;base64,{}", BASE64.encode([7, 7])));
        assert_eq!(fs::read(&path).unwrap(), vec![7, 7]);
    }

    /// Back-to-back resolves within the TTL only capture once.
    #[test]
    fn test_second_resolve_hits() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CaptureCache::new(dir.path(), WEEK);
        let source = CountingSource::new(vec![1]);

        cache.resolve("K", "https://x/landing", &source).unwrap();
        cache.resolve("K", "https://x/landing", &source).unwrap();

        assert_eq!(source.calls(), 1);
    }

    /// The cache directory is created on demand, repeatedly.
    #[test]
    fn test_ensure_dir_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("capture-cache");
        let cache = CaptureCache::new(&nested, WEEK);

        cache.ensure_dir().unwrap();
        cache.ensure_dir().unwrap();

        assert!(nested.is_dir());
    }

    /// Capture failures propagate untouched; nothing is written.
    #[test]
    fn test_capture_error_propagates() {
        struct FailingSource;
        impl Capture for FailingSource {
            fn capture(&self, url: &str) -> crate::Result<Vec<u8>> {
                Err(PdfServiceError::Navigation {
                    url: url.to_string(),
                    cause: "timeout".to_string(),
                })
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let cache = CaptureCache::new(dir.path(), WEEK);

        let result = cache.resolve("K", "https://x/landing", &FailingSource);
        assert!(matches!(result, Err(PdfServiceError::Navigation { .. })));
        assert!(!cache.path_for("K").exists());
    }

    /// Keys map to `<key>.jpg` inside the configured directory.
    #[test]
    fn test_path_for_layout() {
        let cache = CaptureCache::new("/var/cache/captures", WEEK);
        assert_eq!(
            cache.path_for("TEST_PLAN_INSTITUCIONAL_HE"),
            PathBuf::from("/var/cache/captures/TEST_PLAN_INSTITUCIONAL_HE.jpg")
        );
    }
}
