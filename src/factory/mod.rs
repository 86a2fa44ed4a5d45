//! Browser factory implementations.
//!
//! This module provides the [`BrowserFactory`] trait and implementations
//! for launching the shared headless browser process.
//!
//! # Overview
//!
//! The factory abstracts browser launching so the session manager can be
//! exercised with a mock in tests, and so a custom Chrome binary path can
//! be injected from configuration.
//!
//! # Available Factories
//!
//! | Factory | Description |
//! |---------|-------------|
//! | [`ChromeBrowserFactory`] | Launches Chrome/Chromium |
//! | [`mock::MockBrowserFactory`] | For testing (feature-gated) |
//!
//! # Example
//!
//! ```rust,ignore
//! use subscription_pdf_api::{BrowserFactory, ChromeBrowserFactory};
//!
//! let factory = ChromeBrowserFactory::with_defaults();
//! let browser = factory.create()?;
//! ```

mod chrome;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use chrome::{ChromeBrowserFactory, create_chrome_options};

use crate::error::Result;
use headless_chrome::Browser;

/// Trait for the browser factory seam.
///
/// Abstracts browser launching so the session manager can substitute a mock
/// in tests, and so deployments can supply custom launch configurations.
///
/// # Thread Safety
///
/// Requires `Send + Sync`: the factory is shared by the session manager
/// across concurrent render operations.
pub trait BrowserFactory: Send + Sync {
    /// Launch a new browser process.
    ///
    /// # Errors
    ///
    /// - [`PdfServiceError::Configuration`](crate::PdfServiceError::Configuration) -
    ///   invalid launch options
    /// - [`PdfServiceError::Launch`](crate::PdfServiceError::Launch) -
    ///   binary not found, launch fails, etc.
    fn create(&self) -> Result<Browser>;
}
