//! Landing-page screenshot capture.
//!
//! This module provides [`PageCaptureEngine`], which drives the shared
//! browser session to screenshot an externally hosted landing page, and the
//! [`Capture`] trait that lets the cache layer substitute a mock source in
//! tests.
//!
//! # Tab Lifecycle
//!
//! Every capture opens its own isolated tab and closes it on the way out -
//! on success, on navigation failure, and on screenshot failure alike. Tab
//! state never crosses requests.
//!
//! ```text
//! Browser (shared process)
//! ├── Tab (new) ◀── opened for this capture
//! │   ├── Set User-Agent
//! │   ├── Navigate (bounded by timeout)
//! │   ├── JPEG screenshot
//! │   └── Close tab ◀── always, on every path
//! └── (other tabs belong to concurrent operations)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use subscription_pdf_api::{BrowserSession, Capture, ChromeBrowserFactory, PageCaptureEngine};
//!
//! let session = Arc::new(BrowserSession::new(Box::new(ChromeBrowserFactory::with_defaults())));
//! let engine = PageCaptureEngine::new(Arc::clone(&session));
//!
//! let jpeg = engine.capture("https://example.com/landing?msisdn=-1&nohe=true")?;
//! assert!(!jpeg.is_empty());
//! # Ok::<(), subscription_pdf_api::PdfServiceError>(())
//! ```

use std::sync::Arc;
use std::time::Duration;

use headless_chrome::Tab;
use headless_chrome::protocol::cdp::Page;

use crate::error::{PdfServiceError, Result};
use crate::session::BrowserSession;

/// Default bound on navigation, in seconds.
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 60;

/// Default JPEG quality for landing captures.
pub const DEFAULT_JPEG_QUALITY: u32 = 80;

/// Identifying header sent with every capture navigation.
///
/// Some landing pages serve a degraded variant to obviously-automated
/// clients; a realistic desktop UA keeps the capture representative.
const CAPTURE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Options for a single screenshot capture.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Capture the full scroll extent instead of the viewport only.
    pub full_page: bool,

    /// JPEG quality, 0-100.
    pub quality: u32,

    /// Bound on navigation and screenshot operations.
    pub timeout: Duration,
}

impl Default for CaptureOptions {
    /// Viewport-only JPEG at quality 80 with a 60 s navigation bound.
    fn default() -> Self {
        Self {
            full_page: false,
            quality: DEFAULT_JPEG_QUALITY,
            timeout: Duration::from_secs(DEFAULT_NAVIGATION_TIMEOUT_SECS),
        }
    }
}

/// A source of screenshot bytes for a URL.
///
/// The cache resolves misses through this trait; tests substitute a
/// counting mock to observe exactly when the network is hit.
pub trait Capture: Send + Sync {
    /// Capture the page at `url` as JPEG bytes.
    ///
    /// # Errors
    ///
    /// - [`PdfServiceError::Launch`] if the browser cannot be (re)launched
    /// - [`PdfServiceError::Navigation`] if the target is unreachable or
    ///   times out - no internal retry
    /// - [`PdfServiceError::Capture`] if the screenshot itself fails
    fn capture(&self, url: &str) -> Result<Vec<u8>>;
}

/// Captures landing pages on the shared browser session.
pub struct PageCaptureEngine {
    session: Arc<BrowserSession>,
    options: CaptureOptions,
}

impl PageCaptureEngine {
    /// Create an engine with default [`CaptureOptions`].
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self::with_options(session, CaptureOptions::default())
    }

    /// Create an engine with explicit options.
    pub fn with_options(session: Arc<BrowserSession>, options: CaptureOptions) -> Self {
        Self { session, options }
    }

    /// Capture `url` with per-call options, overriding the engine defaults.
    pub fn capture_with(&self, url: &str, options: &CaptureOptions) -> Result<Vec<u8>> {
        let browser = self.session.acquire()?;

        let tab = browser.new_tab().map_err(|e| {
            log::error!("❌ Failed to open capture tab: {}", e);
            PdfServiceError::Capture(format!("failed to open tab: {}", e))
        })?;

        // The tab must be closed on every path out of here.
        let result = capture_on_tab(&tab, url, options);
        close_tab_safely(&tab);

        match &result {
            Ok(bytes) => log::info!("✅ Captured {} ({} bytes)", url, bytes.len()),
            Err(e) => log::warn!("❌ Capture of {} failed: {}", url, e),
        }

        result
    }
}

impl Capture for PageCaptureEngine {
    fn capture(&self, url: &str) -> Result<Vec<u8>> {
        self.capture_with(url, &self.options)
    }
}

/// Navigate and screenshot on an already-open tab.
///
/// Separated from the tab open/close bracket so the caller can guarantee
/// cleanup around it.
fn capture_on_tab(tab: &Tab, url: &str, options: &CaptureOptions) -> Result<Vec<u8>> {
    tab.set_default_timeout(options.timeout);

    tab.set_user_agent(CAPTURE_USER_AGENT, None, None)
        .map_err(|e| PdfServiceError::Capture(format!("failed to set user agent: {}", e)))?;

    log::debug!("Navigating to capture target: {}", url);
    tab.navigate_to(url)
        .map_err(|e| PdfServiceError::Navigation {
            url: url.to_string(),
            cause: e.to_string(),
        })?
        .wait_until_navigated()
        .map_err(|e| PdfServiceError::Navigation {
            url: url.to_string(),
            cause: e.to_string(),
        })?;

    let clip = if options.full_page {
        Some(full_page_clip(tab)?)
    } else {
        None
    };

    tab.capture_screenshot(
        Page::CaptureScreenshotFormatOption::Jpeg,
        Some(options.quality),
        clip,
        true,
    )
    .map_err(|e| PdfServiceError::Capture(e.to_string()))
}

/// Build a screenshot clip covering the document's full scroll extent.
fn full_page_clip(tab: &Tab) -> Result<Page::Viewport> {
    let width = eval_dimension(tab, "document.documentElement.scrollWidth")?;
    let height = eval_dimension(tab, "document.documentElement.scrollHeight")?;

    Ok(Page::Viewport {
        x: 0.0,
        y: 0.0,
        width,
        height,
        scale: 1.0,
    })
}

/// Evaluate a page expression expected to yield a number.
fn eval_dimension(tab: &Tab, expr: &str) -> Result<f64> {
    let object = tab
        .evaluate(expr, false)
        .map_err(|e| PdfServiceError::Capture(format!("failed to evaluate {}: {}", expr, e)))?;

    object
        .value
        .and_then(|v| v.as_f64())
        .ok_or_else(|| PdfServiceError::Capture(format!("{} did not yield a number", expr)))
}

/// Close a tab, ignoring errors.
///
/// The screenshot or PDF is already in hand when this runs; a close failure
/// must not discard it. Orphaned tab resources go away with the browser
/// process.
pub(crate) fn close_tab_safely(tab: &Tab) {
    if let Err(e) = tab.close(true) {
        log::warn!("Failed to close tab (continuing anyway): {}", e);
    } else {
        log::trace!("Tab closed");
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies the capture defaults: viewport-only, quality 80,
    /// 60 s navigation bound.
    #[test]
    fn test_capture_options_defaults() {
        let options = CaptureOptions::default();

        assert!(!options.full_page);
        assert_eq!(options.quality, 80);
        assert_eq!(options.timeout, Duration::from_secs(60));
    }

    /// Verifies that Capture is object-safe - the cache stores it behind
    /// a reference.
    #[test]
    fn test_capture_trait_is_object_safe() {
        struct FixedBytes(Vec<u8>);

        impl Capture for FixedBytes {
            fn capture(&self, _url: &str) -> Result<Vec<u8>> {
                Ok(self.0.clone())
            }
        }

        let source: &dyn Capture = &FixedBytes(vec![0xFF, 0xD8]);
        assert_eq!(source.capture("https://x/landing").unwrap(), vec![0xFF, 0xD8]);
    }

    /// Verifies the engine surfaces a launch failure from the session
    /// without attempting any tab work.
    #[test]
    fn test_capture_propagates_launch_failure() {
        use crate::factory::mock::MockBrowserFactory;

        let session = Arc::new(BrowserSession::new(Box::new(
            MockBrowserFactory::always_fails("no chrome"),
        )));
        let engine = PageCaptureEngine::new(session);

        let result = engine.capture("https://x/landing");
        assert!(matches!(result, Err(PdfServiceError::Launch(_))));
    }
}
