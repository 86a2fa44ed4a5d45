//! Shared browser session with lifecycle management.
//!
//! This module provides [`BrowserSession`], the owner of the single headless
//! Chrome process shared by every capture and render operation.
//!
//! # Overview
//!
//! The session manager provides:
//! - **Lazy launch**: the browser process starts on first [`acquire()`](BrowserSession::acquire)
//! - **Liveness probing**: every acquire verifies the process still answers CDP
//! - **Transparent relaunch**: a dead process is replaced before the caller sees it
//! - **Graceful shutdown**: an explicit [`shutdown()`](BrowserSession::shutdown) closes the process
//!
//! # Architecture
//!
//! ```text
//! BrowserSession
//!   ├─ factory: Box<dyn BrowserFactory>   (how to launch)
//!   ├─ current: Mutex<Option<Browser>>    (the one live process)
//!   └─ shutting_down: AtomicBool
//! ```
//!
//! # Critical Invariants
//!
//! 1. At most one process is "current" at a time. Launch and probe are
//!    serialized under the `current` mutex, so concurrent first-callers
//!    coalesce onto a single launch instead of racing two processes.
//! 2. Clones handed out by `acquire()` may briefly outlive a relaunch while
//!    an in-flight operation finishes on the old process. That overlap is
//!    accepted; the old process exits when its last clone drops.
//! 3. The process is never closed per-request. Only `shutdown()` closes it.
//!
//! # Example
//!
//! ```rust,no_run
//! use subscription_pdf_api::{BrowserSession, ChromeBrowserFactory};
//!
//! let session = BrowserSession::new(Box::new(ChromeBrowserFactory::with_defaults()));
//!
//! // First acquire launches Chrome; later acquires reuse it.
//! let browser = session.acquire()?;
//! let _tab = browser.new_tab().expect("failed to open tab");
//! // ... capture or print ...
//!
//! // At service shutdown:
//! session.shutdown();
//! # Ok::<(), subscription_pdf_api::PdfServiceError>(())
//! ```

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use headless_chrome::Browser;

use crate::error::{PdfServiceError, Result};
use crate::factory::BrowserFactory;

/// Owner of the shared headless browser process.
///
/// Constructor-injected wherever a browser is needed - typically wrapped in
/// an `Arc` and stored in the service state. There is deliberately no
/// module-level singleton; tests inject a
/// [`MockBrowserFactory`](crate::factory::mock::MockBrowserFactory) instead.
pub struct BrowserSession {
    /// Factory used for the initial launch and every relaunch.
    factory: Box<dyn BrowserFactory>,

    /// The current browser process, if one has been launched.
    ///
    /// The mutex serializes launch, probe, and relaunch. `Browser` is a
    /// cheap handle (internally reference-counted), so callers get clones
    /// and never hold this lock across navigation or printing.
    current: Mutex<Option<Browser>>,

    /// Set once by `shutdown()`; acquires are rejected afterwards.
    shutting_down: AtomicBool,
}

impl BrowserSession {
    /// Create a session around the given factory.
    ///
    /// Does not launch anything; the process starts on first `acquire()`.
    pub fn new(factory: Box<dyn BrowserFactory>) -> Self {
        Self {
            factory,
            current: Mutex::new(None),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Return a handle to a live browser process.
    ///
    /// Launches the process if none exists yet. If one exists, probes it
    /// with a CDP version query; a failed probe discards the dead process
    /// and relaunches transparently - callers only ever see a relaunch
    /// failure, never the stale-process error.
    ///
    /// # Errors
    ///
    /// - [`PdfServiceError::Launch`] if the (re)launch fails or the session
    ///   is shutting down.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let browser = session.acquire()?;
    /// let tab = browser.new_tab()?;
    /// ```
    pub fn acquire(&self) -> Result<Browser> {
        if self.shutting_down.load(Ordering::Acquire) {
            return Err(PdfServiceError::Launch(
                "browser session is shutting down".to_string(),
            ));
        }

        let mut current = self.current.lock().unwrap();

        if let Some(browser) = current.as_ref() {
            // Liveness probe: a version query round-trips through CDP, so it
            // fails whenever the process has died or the socket is gone.
            match browser.get_version() {
                Ok(info) => {
                    log::trace!("Browser liveness probe ok ({})", info.product);
                    return Ok(browser.clone());
                }
                Err(e) => {
                    log::warn!("⚠️ Browser liveness probe failed, relaunching: {}", e);
                    *current = None;
                }
            }
        }

        log::info!("Launching headless browser...");
        let browser = self.factory.create().map_err(|e| {
            log::error!("❌ Browser launch failed: {}", e);
            e
        })?;
        log::info!("✅ Browser launched");

        *current = Some(browser.clone());
        Ok(browser)
    }

    /// Whether a browser process has been launched and not shut down.
    ///
    /// Does not probe liveness; a crashed-but-not-yet-replaced process
    /// still counts until the next `acquire()` notices.
    pub fn is_launched(&self) -> bool {
        self.current.lock().unwrap().is_some()
    }

    /// Whether `shutdown()` has been called.
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// Gracefully terminate the browser process.
    ///
    /// Rejects further acquires and drops the current handle. The process
    /// exits once in-flight operations release their clones.
    pub fn shutdown(&self) {
        log::info!("Shutting down browser session...");
        self.shutting_down.store(true, Ordering::Release);

        let browser = self.current.lock().unwrap().take();
        match browser {
            Some(_browser) => {
                // Dropped here; the process exits with its last handle.
                log::info!("✅ Browser session closed");
            }
            None => {
                log::debug!("No browser was launched, nothing to close");
            }
        }
    }
}

impl std::fmt::Debug for BrowserSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserSession")
            .field("launched", &self.is_launched())
            .field("shutting_down", &self.is_shutting_down())
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::mock::MockBrowserFactory;

    /// Verifies that a launch failure propagates as a Launch error with the
    /// factory's message, and that nothing is cached.
    #[test]
    fn test_acquire_propagates_launch_failure() {
        let factory = MockBrowserFactory::always_fails("chrome missing");
        let counter = factory.counter();
        let session = BrowserSession::new(Box::new(factory));

        let result = session.acquire();
        assert!(
            matches!(result, Err(PdfServiceError::Launch(ref msg)) if msg == "chrome missing")
        );
        assert!(!session.is_launched(), "Failed launch must not be cached");
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    /// Verifies that a failed launch is retried on the next acquire rather
    /// than poisoning the session.
    #[test]
    fn test_acquire_retries_after_failure() {
        let factory = MockBrowserFactory::always_fails("still missing");
        let counter = factory.counter();
        let session = BrowserSession::new(Box::new(factory));

        let _ = session.acquire();
        let _ = session.acquire();

        assert_eq!(
            counter.load(std::sync::atomic::Ordering::SeqCst),
            2,
            "Each acquire should attempt a fresh launch"
        );
    }

    /// Verifies that shutdown rejects subsequent acquires without touching
    /// the factory.
    #[test]
    fn test_shutdown_rejects_acquire() {
        let factory = MockBrowserFactory::always_fails("unused");
        let counter = factory.counter();
        let session = BrowserSession::new(Box::new(factory));

        session.shutdown();
        assert!(session.is_shutting_down());

        let result = session.acquire();
        assert!(matches!(result, Err(PdfServiceError::Launch(_))));
        assert_eq!(
            counter.load(std::sync::atomic::Ordering::SeqCst),
            0,
            "Shutdown must short-circuit before the factory"
        );
    }

    /// Verifies shutdown is safe when nothing was ever launched.
    #[test]
    fn test_shutdown_without_launch() {
        let session = BrowserSession::new(Box::new(MockBrowserFactory::always_fails("unused")));
        session.shutdown();
        assert!(!session.is_launched());
    }

    /// Verifies the Debug representation used in startup logs.
    #[test]
    fn test_debug_format() {
        let session = BrowserSession::new(Box::new(MockBrowserFactory::always_fails("unused")));
        let formatted = format!("{:?}", session);
        assert!(formatted.contains("launched: false"));
    }
}
