//! Configuration for the subscription PDF service.
//!
//! This module provides [`ServiceConfig`] and [`ServiceConfigBuilder`] for
//! configuring the capture cache, asset locations, and the HTTP listener.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use subscription_pdf_api::ServiceConfigBuilder;
//!
//! let config = ServiceConfigBuilder::new()
//!     .port(8080)
//!     .cache_ttl(Duration::from_secs(3 * 24 * 60 * 60))
//!     .cache_dir("storage/capture-cache")
//!     .build()
//!     .expect("Invalid configuration");
//!
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.cache_ttl.as_secs(), 3 * 24 * 60 * 60);
//! ```
//!
//! # Environment Configuration
//!
//! When the `env-config` feature is enabled, configuration can be loaded from
//! environment variables and an optional `app.env` file:
//!
//! ```rust,ignore
//! use subscription_pdf_api::config::env::from_env;
//!
//! let config = from_env()?;
//! ```
//!
//! See [`mod@env`] for the available variables.

use std::path::PathBuf;
use std::time::Duration;

/// Seconds in one day, for the TTL-in-days conversion.
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Configuration for the subscription PDF service.
///
/// All paths are explicit construction-time values; nothing is derived from
/// the executable location at runtime.
///
/// # Fields Overview
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `port` | 3000 | HTTP listen port |
/// | `cache_ttl` | 7 days | Max age of a cached landing capture |
/// | `cache_dir` | `storage/capture-cache` | Directory holding `<key>.jpg` files |
/// | `assets_dir` | `public` | Static asset root (logo images) |
/// | `template_path` | `templates/bill-subscription.html` | Handlebars template |
/// | `chrome_path` | auto | Custom Chrome binary path |
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// HTTP listen port.
    pub port: u16,

    /// Time-to-live for cached landing captures.
    ///
    /// A cached screenshot older than this is discarded and recaptured on
    /// the next request that needs it.
    pub cache_ttl: Duration,

    /// Directory holding one JPEG per capture key.
    ///
    /// Created on first use if absent.
    pub cache_dir: PathBuf,

    /// Root directory for static assets consumed read-only by the renderer.
    pub assets_dir: PathBuf,

    /// Path to the subscription confirmation HTML template.
    pub template_path: PathBuf,

    /// Custom Chrome/Chromium binary path. `None` lets `headless_chrome`
    /// auto-detect an installation.
    pub chrome_path: Option<String>,
}

impl Default for ServiceConfig {
    /// Production defaults matching the deployed service layout.
    ///
    /// # Example
    ///
    /// ```rust
    /// use subscription_pdf_api::ServiceConfig;
    ///
    /// let config = ServiceConfig::default();
    /// assert_eq!(config.port, 3000);
    /// assert_eq!(config.cache_ttl.as_secs(), 7 * 24 * 60 * 60);
    /// ```
    fn default() -> Self {
        Self {
            port: 3000,
            cache_ttl: Duration::from_secs(7 * SECS_PER_DAY),
            cache_dir: PathBuf::from("storage/capture-cache"),
            assets_dir: PathBuf::from("public"),
            template_path: PathBuf::from("templates/bill-subscription.html"),
            chrome_path: None,
        }
    }
}

/// Builder for [`ServiceConfig`] with validation.
///
/// # Example
///
/// ```rust
/// use subscription_pdf_api::ServiceConfigBuilder;
///
/// let config = ServiceConfigBuilder::new()
///     .port(8080)
///     .assets_dir("assets")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.port, 8080);
/// ```
///
/// # Validation
///
/// [`build()`](Self::build) rejects a zero `cache_ttl` - a TTL of zero would
/// turn every request into a fresh network capture, defeating the cache.
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: ServiceConfig::default(),
        }
    }

    /// Set the HTTP listen port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the capture cache time-to-live.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Set the capture cache directory.
    pub fn cache_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    /// Set the static asset root directory.
    pub fn assets_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.config.assets_dir = dir.into();
        self
    }

    /// Set the HTML template path.
    pub fn template_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.template_path = path.into();
        self
    }

    /// Set a custom Chrome binary path.
    pub fn chrome_path<S: Into<String>>(mut self, path: S) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `cache_ttl` is zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use subscription_pdf_api::ServiceConfigBuilder;
    ///
    /// let config = ServiceConfigBuilder::new()
    ///     .cache_ttl(Duration::from_secs(0))
    ///     .build();
    /// assert!(config.is_err());
    /// ```
    pub fn build(self) -> std::result::Result<ServiceConfig, String> {
        if self.config.cache_ttl.is_zero() {
            return Err("cache_ttl must be greater than zero".to_string());
        }

        Ok(self.config)
    }
}

impl Default for ServiceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Configuration (feature-gated)
// ============================================================================

/// Environment-based configuration loading.
///
/// Only available when the `env-config` feature is enabled. Uses `dotenvy`
/// to load an optional `app.env` file from the current directory before
/// reading the process environment.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `PORT` | u16 | 3000 | HTTP listen port |
/// | `LANDING_TTL_DAYS` | u64 | 7 | Capture cache TTL in days |
/// | `CAPTURE_CACHE_DIR` | String | `storage/capture-cache` | Cache directory |
/// | `PUBLIC_DIR` | String | `public` | Static asset root |
/// | `TEMPLATE_PATH` | String | `templates/bill-subscription.html` | HTML template |
/// | `CHROME_PATH` | String | auto | Custom Chrome binary path |
///
/// # Example `app.env` File
///
/// ```text
/// PORT=3000
/// LANDING_TTL_DAYS=7
/// # CHROME_PATH=/usr/bin/google-chrome
/// ```
#[cfg(feature = "env-config")]
pub mod env {
    use super::*;
    use crate::error::PdfServiceError;

    /// Default environment file name.
    pub const ENV_FILE_NAME: &str = "app.env";

    /// Load environment variables from the `app.env` file.
    ///
    /// Automatically called by [`from_env`]; call it explicitly to load the
    /// file earlier or to inspect the error.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)` if the file was found and loaded
    /// - `Err(dotenvy::Error)` if it was absent or unparseable
    pub fn load_env_file() -> Result<std::path::PathBuf, dotenvy::Error> {
        dotenvy::from_filename(ENV_FILE_NAME)
    }

    /// Load configuration from environment variables.
    ///
    /// Reads each variable with a sensible default; also loads `app.env` if
    /// present. The file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`PdfServiceError::Configuration`] if the resulting values
    /// fail validation.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use subscription_pdf_api::config::env::from_env;
    ///
    /// std::env::set_var("LANDING_TTL_DAYS", "3");
    /// let config = from_env()?;
    /// assert_eq!(config.cache_ttl.as_secs(), 3 * 24 * 60 * 60);
    /// ```
    pub fn from_env() -> Result<ServiceConfig, PdfServiceError> {
        match load_env_file() {
            Ok(path) => {
                log::info!("Loaded configuration from: {:?}", path);
            }
            Err(e) => {
                log::debug!(
                    "No {} file found or failed to load: {} (using environment variables and defaults)",
                    ENV_FILE_NAME,
                    e
                );
            }
        }

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000u16);

        let ttl_days = std::env::var("LANDING_TTL_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(7u64);

        let cache_dir = std::env::var("CAPTURE_CACHE_DIR")
            .unwrap_or_else(|_| "storage/capture-cache".to_string());

        let assets_dir = std::env::var("PUBLIC_DIR").unwrap_or_else(|_| "public".to_string());

        let template_path = std::env::var("TEMPLATE_PATH")
            .unwrap_or_else(|_| "templates/bill-subscription.html".to_string());

        log::info!("Loading service configuration from environment:");
        log::info!("   - Port: {}", port);
        log::info!("   - Landing capture TTL: {} days", ttl_days);
        log::info!("   - Cache dir: {}", cache_dir);
        log::info!("   - Assets dir: {}", assets_dir);
        log::info!("   - Template: {}", template_path);

        let mut builder = ServiceConfigBuilder::new()
            .port(port)
            .cache_ttl(Duration::from_secs(ttl_days * SECS_PER_DAY))
            .cache_dir(cache_dir)
            .assets_dir(assets_dir)
            .template_path(template_path);

        if let Some(chrome) = chrome_path_from_env() {
            log::info!("   - Chrome path: {}", chrome);
            builder = builder.chrome_path(chrome);
        }

        builder.build().map_err(PdfServiceError::Configuration)
    }

    /// Get the Chrome binary path from the `CHROME_PATH` variable.
    ///
    /// Returns `None` when unset, in which case `headless_chrome`
    /// auto-detects an installation.
    pub fn chrome_path_from_env() -> Option<String> {
        std::env::var("CHROME_PATH").ok()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies that the builder sets every configuration value.
    #[test]
    fn test_config_builder() {
        let config = ServiceConfigBuilder::new()
            .port(8080)
            .cache_ttl(Duration::from_secs(SECS_PER_DAY))
            .cache_dir("/tmp/captures")
            .assets_dir("/srv/assets")
            .template_path("/srv/templates/bill.html")
            .chrome_path("/usr/bin/chromium")
            .build()
            .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_ttl.as_secs(), SECS_PER_DAY);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/captures"));
        assert_eq!(config.assets_dir, PathBuf::from("/srv/assets"));
        assert_eq!(config.template_path, PathBuf::from("/srv/templates/bill.html"));
        assert_eq!(config.chrome_path.as_deref(), Some("/usr/bin/chromium"));
    }

    /// Verifies that a zero TTL is rejected at build time.
    #[test]
    fn test_config_rejects_zero_ttl() {
        let result = ServiceConfigBuilder::new()
            .cache_ttl(Duration::from_secs(0))
            .build();

        assert!(result.is_err());
        let err_msg = result.unwrap_err();
        assert!(
            err_msg.contains("cache_ttl must be greater than zero"),
            "Expected validation error message, got: {}",
            err_msg
        );
    }

    /// Verifies the deployed-service defaults.
    #[test]
    fn test_config_defaults() {
        let config = ServiceConfig::default();

        assert_eq!(config.port, 3000, "Default port should be 3000");
        assert_eq!(
            config.cache_ttl,
            Duration::from_secs(7 * SECS_PER_DAY),
            "Default TTL should be 7 days"
        );
        assert_eq!(config.cache_dir, PathBuf::from("storage/capture-cache"));
        assert_eq!(config.assets_dir, PathBuf::from("public"));
        assert_eq!(
            config.template_path,
            PathBuf::from("templates/bill-subscription.html")
        );
        assert!(config.chrome_path.is_none(), "Chrome path should auto-detect");
    }

    /// Verifies that ServiceConfigBuilder implements Default.
    #[test]
    fn test_builder_default() {
        let builder: ServiceConfigBuilder = Default::default();
        let config = builder.build().unwrap();

        assert_eq!(config.port, 3000);
    }
}
