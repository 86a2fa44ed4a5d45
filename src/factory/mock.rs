//! Mock browser factory for testing.
//!
//! This module provides a mock implementation of [`BrowserFactory`] that
//! can be configured to succeed or fail, useful for exercising session
//! manager behavior without requiring Chrome to be installed.
//!
//! # Feature Flag
//!
//! Only available when:
//! - The `test-utils` feature is enabled, OR
//! - During testing (`#[cfg(test)]`)
//!
//! # Example
//!
//! ```rust,ignore
//! use subscription_pdf_api::factory::mock::MockBrowserFactory;
//!
//! // Factory that always fails
//! let factory = MockBrowserFactory::always_fails("Chrome not installed");
//!
//! // Factory that fails after N successful launches
//! let factory = MockBrowserFactory::fail_after_n(3, "Resource exhausted");
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use headless_chrome::Browser;

use super::BrowserFactory;
use crate::error::{PdfServiceError, Result};

/// Mock browser factory for testing without Chrome.
///
/// Can be configured to:
/// - Attempt real launches (requires Chrome)
/// - Always fail with a specific error
/// - Fail after N successful launches
/// - Track launch attempts for verification
///
/// # Thread Safety
///
/// `Send + Sync`; state tracked with atomics.
pub struct MockBrowserFactory {
    /// Whether to fail on every launch.
    should_fail: bool,

    /// Custom error message when failing.
    error_message: String,

    /// Number of launch attempts (for verification in tests).
    creation_count: Arc<AtomicUsize>,

    /// Optional: fail after this many successful launches.
    fail_after: Option<usize>,
}

impl MockBrowserFactory {
    /// Create a mock factory that attempts real browser launches.
    ///
    /// Note: still requires Chrome to be installed to actually launch.
    /// For pure mocking without Chrome, use [`always_fails`](Self::always_fails).
    pub fn new() -> Self {
        Self {
            should_fail: false,
            error_message: String::new(),
            creation_count: Arc::new(AtomicUsize::new(0)),
            fail_after: None,
        }
    }

    /// Create a mock factory that always fails with the given message.
    ///
    /// Useful for testing launch-error propagation without Chrome.
    pub fn always_fails<S: Into<String>>(message: S) -> Self {
        Self {
            should_fail: true,
            error_message: message.into(),
            creation_count: Arc::new(AtomicUsize::new(0)),
            fail_after: None,
        }
    }

    /// Create a mock factory that fails after N successful launches.
    pub fn fail_after_n<S: Into<String>>(n: usize, message: S) -> Self {
        Self {
            should_fail: false,
            error_message: message.into(),
            creation_count: Arc::new(AtomicUsize::new(0)),
            fail_after: Some(n),
        }
    }

    /// Number of launch attempts made through this factory.
    pub fn creation_count(&self) -> usize {
        self.creation_count.load(Ordering::SeqCst)
    }

    /// Clone of the shared attempt counter, for assertions after the
    /// factory has been boxed into a session.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.creation_count)
    }
}

impl Default for MockBrowserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserFactory for MockBrowserFactory {
    fn create(&self) -> Result<Browser> {
        let attempt = self.creation_count.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            log::debug!("MockBrowserFactory failing launch (attempt {})", attempt + 1);
            return Err(PdfServiceError::Launch(self.error_message.clone()));
        }

        if let Some(n) = self.fail_after {
            if attempt >= n {
                log::debug!(
                    "MockBrowserFactory failing launch after {} successes",
                    n
                );
                return Err(PdfServiceError::Launch(self.error_message.clone()));
            }
        }

        // Real launch path; requires an installed Chrome.
        let options = super::create_chrome_options(None)
            .map_err(|e| PdfServiceError::Configuration(e.to_string()))?;
        Browser::new(options).map_err(|e| PdfServiceError::Launch(e.to_string()))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies that the always-fails factory returns a Launch error with
    /// the configured message and counts the attempt.
    #[test]
    fn test_always_fails() {
        let factory = MockBrowserFactory::always_fails("no chrome here");

        let result = factory.create();
        assert!(matches!(result, Err(PdfServiceError::Launch(ref msg)) if msg == "no chrome here"));
        assert_eq!(factory.creation_count(), 1);

        let _ = factory.create();
        assert_eq!(factory.creation_count(), 2);
    }

    /// Verifies the shared counter survives boxing.
    #[test]
    fn test_shared_counter() {
        let factory = MockBrowserFactory::always_fails("boom");
        let counter = factory.counter();

        let boxed: Box<dyn BrowserFactory> = Box::new(factory);
        let _ = boxed.create();
        let _ = boxed.create();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
