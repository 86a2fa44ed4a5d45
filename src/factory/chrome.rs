//! Chrome/Chromium browser factory implementation.
//!
//! This module provides [`ChromeBrowserFactory`] for launching the headless
//! Chrome instance that serves both landing-page captures and PDF printing.
//!
//! # Example
//!
//! ```rust,ignore
//! use subscription_pdf_api::ChromeBrowserFactory;
//!
//! // Auto-detect a Chrome installation
//! let factory = ChromeBrowserFactory::with_defaults();
//!
//! // Or specify a custom binary
//! let factory = ChromeBrowserFactory::with_path("/usr/bin/chromium".to_string());
//! ```

use headless_chrome::{Browser, LaunchOptions};

use super::BrowserFactory;
use crate::error::{PdfServiceError, Result};

/// Factory for launching Chrome/Chromium browser processes.
///
/// Handles Chrome-specific launch options and binary path detection.
///
/// # Thread Safety
///
/// `Send + Sync`; safely shared by the session manager across threads.
pub struct ChromeBrowserFactory {
    /// Function that generates launch options for each launch attempt.
    launch_options_fn: Box<dyn Fn() -> Result<LaunchOptions<'static>> + Send + Sync>,
}

impl ChromeBrowserFactory {
    /// Create a factory with a custom launch options function.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use subscription_pdf_api::{ChromeBrowserFactory, create_chrome_options, PdfServiceError};
    ///
    /// let factory = ChromeBrowserFactory::new(|| {
    ///     create_chrome_options(Some("/custom/path"))
    ///         .map_err(|e| PdfServiceError::Configuration(e.to_string()))
    /// });
    /// ```
    pub fn new<F>(launch_options_fn: F) -> Self
    where
        F: Fn() -> Result<LaunchOptions<'static>> + Send + Sync + 'static,
    {
        Self {
            launch_options_fn: Box::new(launch_options_fn),
        }
    }

    /// Create a factory with an auto-detected Chrome path.
    ///
    /// Lets `headless_chrome` search the common installation paths on
    /// Linux, macOS, and Windows.
    pub fn with_defaults() -> Self {
        log::debug!("Creating ChromeBrowserFactory with auto-detect");
        Self::new(|| {
            create_chrome_options(None).map_err(|e| PdfServiceError::Configuration(e.to_string()))
        })
    }

    /// Create a factory with a custom Chrome binary path.
    ///
    /// Use when Chrome is installed in a non-standard location, e.g. a
    /// bundled Chromium in a container image.
    pub fn with_path(chrome_path: String) -> Self {
        log::debug!(
            "Creating ChromeBrowserFactory with custom path: {}",
            chrome_path
        );
        Self::new(move || {
            create_chrome_options(Some(&chrome_path))
                .map_err(|e| PdfServiceError::Configuration(e.to_string()))
        })
    }

    /// Create a factory from an optional configured path.
    ///
    /// Convenience for wiring [`ServiceConfig::chrome_path`](crate::ServiceConfig)
    /// straight through.
    pub fn from_config_path(chrome_path: Option<String>) -> Self {
        match chrome_path {
            Some(path) => Self::with_path(path),
            None => Self::with_defaults(),
        }
    }
}

impl BrowserFactory for ChromeBrowserFactory {
    /// Launch a new Chrome browser process.
    ///
    /// # Errors
    ///
    /// * [`PdfServiceError::Configuration`] if launch options generation fails.
    /// * [`PdfServiceError::Launch`] if Chrome fails to start.
    fn create(&self) -> Result<Browser> {
        let options = (self.launch_options_fn)()?;

        log::debug!("Launching Chrome browser...");
        Browser::new(options).map_err(|e| {
            log::error!("❌ Chrome launch failed: {}", e);
            PdfServiceError::Launch(e.to_string())
        })
    }
}

/// Create Chrome launch options with an optional custom binary path.
///
/// The flag set targets stable unattended operation in containers:
/// sandboxing off, `/dev/shm` avoided, GPU paths disabled, background
/// throttling disabled so off-screen tabs keep rendering, and web security
/// relaxed so landing pages can pull cross-origin assets into the capture.
///
/// # Parameters
///
/// * `chrome_path` - Optional custom Chrome binary path. `None` auto-detects.
///
/// # Errors
///
/// Returns an error if the options builder fails (rare, usually a bug).
pub fn create_chrome_options(
    chrome_path: Option<&str>,
) -> std::result::Result<LaunchOptions<'static>, Box<dyn std::error::Error + Send + Sync>> {
    match chrome_path {
        Some(path) => log::debug!("Creating Chrome options with custom path: {}", path),
        None => log::debug!("Creating Chrome options (auto-detect browser)"),
    }

    let mut builder = LaunchOptions::default_builder();

    if let Some(path) = chrome_path {
        builder.path(Some(path.to_string().into()));
    }

    builder
        .headless(true)
        .sandbox(false) // required in containers
        .disable_default_args(true)
        .args(vec![
            // Container friendliness
            "--no-first-run".as_ref(),
            "--no-zygote".as_ref(),
            "--disable-dev-shm-usage".as_ref(),
            "--disable-breakpad".as_ref(),
            "--disable-crash-reporter".as_ref(),
            // GPU and rendering
            "--disable-gpu".as_ref(),
            "--disable-accelerated-2d-canvas".as_ref(),
            "--disable-software-rasterizer".as_ref(),
            // Keep off-screen tabs rendering at full speed
            "--disable-background-timer-throttling".as_ref(),
            "--disable-backgrounding-occluded-windows".as_ref(),
            "--disable-renderer-backgrounding".as_ref(),
            "--disable-ipc-flooding-protection".as_ref(),
            // Landing pages pull assets from other origins
            "--disable-web-security".as_ref(),
            "--disable-features=site-per-process".as_ref(),
            // Trim unused surface
            "--disable-extensions".as_ref(),
            "--disable-component-extensions-with-background-pages".as_ref(),
            "--disable-default-apps".as_ref(),
            "--disable-sync".as_ref(),
            "--disable-hang-monitor".as_ref(),
        ])
        .build()
        .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> {
            let path_msg = chrome_path.unwrap_or("auto-detect");
            log::error!(
                "❌ Failed to build Chrome launch options (path: {}): {}",
                path_msg,
                e
            );
            e.into()
        })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies that ChromeBrowserFactory can be instantiated in every mode.
    ///
    /// Does not actually launch browsers.
    #[test]
    fn test_chrome_factory_creation() {
        let _factory = ChromeBrowserFactory::with_defaults();
        let _factory_with_path = ChromeBrowserFactory::with_path("/custom/chrome/path".to_string());
        let _factory_auto = ChromeBrowserFactory::from_config_path(None);
        let _factory_configured =
            ChromeBrowserFactory::from_config_path(Some("/custom/chrome/path".to_string()));
    }

    /// Verifies that Chrome launch options build for both path modes.
    ///
    /// Confirms the flag set is accepted by the builder without launching.
    #[test]
    fn test_create_chrome_options() {
        let result = create_chrome_options(None);
        assert!(
            result.is_ok(),
            "Auto-detect Chrome options should build successfully: {:?}",
            result.err()
        );

        let result = create_chrome_options(Some("/custom/chrome/path"));
        assert!(
            result.is_ok(),
            "Custom path Chrome options should build successfully: {:?}",
            result.err()
        );
    }
}
