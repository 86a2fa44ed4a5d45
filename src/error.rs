//! Error types for the subscription PDF service.
//!
//! This module provides [`PdfServiceError`], a unified error type for the
//! browser session, capture, cache, and render operations, plus the JSON
//! [`ErrorResponse`] body returned by the HTTP surface.
//!
//! # Example
//!
//! ```rust
//! use subscription_pdf_api::{PdfServiceError, Result};
//!
//! fn load_template() -> Result<String> {
//!     Err(PdfServiceError::AssetMissing("templates/bill-subscription.html".to_string()))
//! }
//!
//! match load_template() {
//!     Ok(html) => println!("Loaded {} bytes", html.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Errors that can occur while generating a subscription PDF.
///
/// Each variant corresponds to one operational failure class. Variants carry
/// the underlying cause as a string so the HTTP boundary can report a single
/// descriptive message without re-wrapping.
#[derive(Debug, thiserror::Error)]
pub enum PdfServiceError {
    /// The headless browser process failed to start.
    ///
    /// Fatal to the calling operation; a later request may succeed once the
    /// underlying condition (missing binary, resource limits) clears.
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Navigation to a capture or render target failed or timed out.
    ///
    /// Carries the URL and the underlying cause. Never retried internally;
    /// retry policy belongs to the caller.
    #[error("navigation to {url} failed: {cause}")]
    Navigation {
        /// The URL that could not be loaded.
        url: String,
        /// The underlying browser error.
        cause: String,
    },

    /// Taking the screenshot itself failed after a successful navigation.
    #[error("screenshot capture failed: {0}")]
    Capture(String),

    /// Unexpected filesystem failure while reading or writing the capture
    /// cache (anything other than "file missing").
    #[error("capture cache I/O error: {0}")]
    CacheIo(String),

    /// A required static asset (logo image or HTML template) is absent.
    #[error("image not found at: {0}")]
    AssetMissing(String),

    /// Template compilation or substitution failed.
    #[error("template error: {0}")]
    Template(String),

    /// PDF printing failed or timed out.
    #[error("PDF generation failed: {0}")]
    Render(String),

    /// Invalid configuration provided.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl PdfServiceError {
    /// Returns the HTTP status code for this error.
    ///
    /// The service contract reports generation failures with a JSON body;
    /// upstream-shaped failures map to gateway codes so reverse proxies can
    /// distinguish them from faults in the service itself.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use subscription_pdf_api::PdfServiceError;
    ///
    /// let error = PdfServiceError::Launch("chrome not found".to_string());
    /// assert_eq!(error.status_code(), 500);
    ///
    /// let error = PdfServiceError::Navigation {
    ///     url: "https://x/landing".to_string(),
    ///     cause: "timeout".to_string(),
    /// };
    /// assert_eq!(error.status_code(), 502);
    /// ```
    pub fn status_code(&self) -> u16 {
        match self {
            // Upstream errors (the landing page, not us)
            Self::Navigation { .. } | Self::Capture(_) => 502,

            // Everything else is our problem
            Self::Launch(_)
            | Self::CacheIo(_)
            | Self::AssetMissing(_)
            | Self::Template(_)
            | Self::Render(_)
            | Self::Configuration(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    ///
    /// Stable identifiers for programmatic handling by API clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Launch(_) => "BROWSER_LAUNCH_FAILED",
            Self::Navigation { .. } => "NAVIGATION_FAILED",
            Self::Capture(_) => "CAPTURE_FAILED",
            Self::CacheIo(_) => "CACHE_IO_ERROR",
            Self::AssetMissing(_) => "ASSET_MISSING",
            Self::Template(_) => "TEMPLATE_ERROR",
            Self::Render(_) => "PDF_GENERATION_FAILED",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Convenience conversion from [`String`] to [`PdfServiceError::Configuration`].
impl From<String> for PdfServiceError {
    fn from(msg: String) -> Self {
        PdfServiceError::Configuration(msg)
    }
}

/// Convenience conversion from `&str` to [`PdfServiceError::Configuration`].
impl From<&str> for PdfServiceError {
    fn from(msg: &str) -> Self {
        PdfServiceError::Configuration(msg.to_string())
    }
}

/// Result type alias using [`PdfServiceError`].
pub type Result<T> = std::result::Result<T, PdfServiceError>;

/// JSON error response returned by the HTTP surface.
///
/// ```json
/// {
///     "error": "Failed to generate PDF",
///     "details": "navigation to https://x/landing failed: timeout"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Generic failure description for the endpoint.
    pub error: String,

    /// The underlying error message.
    pub details: String,
}

impl From<&PdfServiceError> for ErrorResponse {
    fn from(err: &PdfServiceError) -> Self {
        Self {
            error: "Failed to generate PDF".to_string(),
            details: err.to_string(),
        }
    }
}

impl From<PdfServiceError> for ErrorResponse {
    fn from(err: PdfServiceError) -> Self {
        Self::from(&err)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies error type conversions from String and &str.
    #[test]
    fn test_error_conversion() {
        let error: PdfServiceError = "test error".into();
        match error {
            PdfServiceError::Configuration(msg) => {
                assert_eq!(msg, "test error", "Error message should be preserved");
            }
            _ => panic!("Expected Configuration error variant"),
        }

        let error: PdfServiceError = "another error".to_string().into();
        match error {
            PdfServiceError::Configuration(msg) => {
                assert_eq!(msg, "another error", "Error message should be preserved");
            }
            _ => panic!("Expected Configuration error variant"),
        }
    }

    /// Verifies that error Display formatting carries the cause.
    #[test]
    fn test_error_display() {
        let error = PdfServiceError::Launch("chrome not found".to_string());
        assert_eq!(error.to_string(), "browser launch failed: chrome not found");

        let error = PdfServiceError::Navigation {
            url: "https://x/landing".to_string(),
            cause: "dns failure".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "navigation to https://x/landing failed: dns failure"
        );

        let error = PdfServiceError::AssetMissing("public/images/logo_wom.png".to_string());
        assert_eq!(
            error.to_string(),
            "image not found at: public/images/logo_wom.png"
        );

        let error = PdfServiceError::Render("print timed out".to_string());
        assert_eq!(error.to_string(), "PDF generation failed: print timed out");
    }

    /// Verifies HTTP status mapping for each variant class.
    #[test]
    fn test_status_codes() {
        assert_eq!(PdfServiceError::Launch(String::new()).status_code(), 500);
        assert_eq!(
            PdfServiceError::Navigation {
                url: String::new(),
                cause: String::new()
            }
            .status_code(),
            502
        );
        assert_eq!(PdfServiceError::Capture(String::new()).status_code(), 502);
        assert_eq!(PdfServiceError::CacheIo(String::new()).status_code(), 500);
        assert_eq!(
            PdfServiceError::AssetMissing(String::new()).status_code(),
            500
        );
        assert_eq!(PdfServiceError::Render(String::new()).status_code(), 500);
    }

    /// Verifies the error body shape consumed by API clients.
    #[test]
    fn test_error_response_from_error() {
        let error = PdfServiceError::Render("tab closed".to_string());
        let response = ErrorResponse::from(&error);

        assert_eq!(response.error, "Failed to generate PDF");
        assert!(response.details.contains("tab closed"));

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"details\""));
    }

    /// Verifies that PdfServiceError implements std::error::Error.
    #[test]
    fn test_error_is_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<PdfServiceError>();
    }

    /// Verifies that PdfServiceError is Send + Sync for thread safety.
    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PdfServiceError>();
    }
}
