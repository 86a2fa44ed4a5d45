//! # subscription-pdf-api
//!
//! Subscription confirmation PDF service built on a shared headless Chrome
//! session.
//!
//! The service composes static assets, time-formatted subscription data,
//! and cached screenshots of externally hosted landing pages into an HTML
//! template, then prints that HTML to PDF - all on one long-lived browser
//! process that is health-probed and relaunched transparently when it dies.
//!
//! ## Features
//!
//! - **Shared Browser Session**: one lazily-launched Chrome process; liveness
//!   probe and transparent relaunch on every acquire
//! - **Isolated Captures**: every screenshot and every print opens its own
//!   tab, closed on all paths, so request state never crosses
//! - **TTL-Bounded Capture Cache**: landing screenshots cached on disk as
//!   `<key>.jpg`, refreshed after 7 days (configurable)
//! - **Fail-Fast Assets**: missing logos or template abort the render with a
//!   descriptive error before any browser work
//! - **Axum Binary**: `POST /api/pdf/generate` returning the PDF as an
//!   attachment, `GET /health` for probes
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │       POST /api/pdf/generate (axum)         │
//! └─────────────────┬───────────────────────────┘
//!                   │ spawn_blocking
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │        SubscriptionPdfGenerator             │
//! │  dates → captures → template → print        │
//! └───────┬─────────────────────────┬───────────┘
//!         │                         │
//!         ▼                         ▼
//! ┌───────────────────┐   ┌─────────────────────┐
//! │   CaptureCache    │   │   print_to_pdf      │
//! │  <key>.jpg + TTL  │   │  (A4, 20mm margins) │
//! └───────┬───────────┘   └──────────┬──────────┘
//!         │ miss                     │
//!         ▼                          │
//! ┌───────────────────┐              │
//! │ PageCaptureEngine │              │
//! └───────┬───────────┘              │
//!         ▼                          ▼
//! ┌─────────────────────────────────────────────┐
//! │            BrowserSession                   │
//! │   (one headless Chrome, probe + relaunch)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use subscription_pdf_api::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::default();
//!
//!     let session = Arc::new(BrowserSession::new(Box::new(
//!         ChromeBrowserFactory::from_config_path(config.chrome_path.clone()),
//!     )));
//!     let cache = CaptureCache::from_config(&config);
//!     let generator = SubscriptionPdfGenerator::new(Arc::clone(&session), cache, config);
//!
//!     let document: SubscriptionDocument = serde_json::from_str(r#"{
//!         "msisdn": "56911112222",
//!         "product": "Test Plan",
//!         "subscriptionDate": "2024-01-15T10:00:00Z",
//!         "landingUrlBase": "https://x/landing",
//!         "channel": 1
//!     }"#)?;
//!
//!     let artifact = generator.generate(document)?;
//!     std::fs::write(&artifact.file_name, &artifact.data)?;
//!
//!     session.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Configuration
//!
//! With the `env-config` feature (default), configuration loads from an
//! optional `app.env` file and the process environment:
//!
//! ```text
//! PORT=3000
//! LANDING_TTL_DAYS=7
//! CAPTURE_CACHE_DIR=storage/capture-cache
//! PUBLIC_DIR=public
//! TEMPLATE_PATH=templates/bill-subscription.html
//! # CHROME_PATH=/usr/bin/google-chrome
//! ```
//!
//! ## Concurrency Model
//!
//! The browser process is a shared mutable resource; every capture and every
//! render opens its own tab, so page state never crosses requests. A process
//! crash affects all in-flight operations at once - the session manager's
//! relaunch-on-probe-failure is the sole recovery mechanism; operations are
//! not retried individually.
//!
//! Concurrent cache resolves for the same key may both capture (last writer
//! wins on disk); see [`cache`] for why this relaxation is accepted.
//!
//! ## Testing
//!
//! For testing without Chrome, enable the `test-utils` feature and inject
//! [`MockBrowserFactory`](factory::mock::MockBrowserFactory):
//!
//! ```rust,ignore
//! use subscription_pdf_api::factory::mock::MockBrowserFactory;
//!
//! let session = BrowserSession::new(Box::new(
//!     MockBrowserFactory::always_fails("Test mode"),
//! ));
//! assert!(session.acquire().is_err());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// Modules
// ============================================================================

pub mod cache;
pub mod capture;
pub mod config;
pub mod error;
pub mod factory;
pub mod prelude;
pub mod service;
pub mod session;

// ============================================================================
// Re-exports (Public API)
// ============================================================================

pub use cache::CaptureCache;
pub use capture::{Capture, CaptureOptions, PageCaptureEngine};
pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use error::{ErrorResponse, PdfServiceError, Result};
pub use factory::{BrowserFactory, ChromeBrowserFactory, create_chrome_options};
pub use service::{
    HealthResponse, LandingCapture, PdfArtifact, SubscriptionDocument, SubscriptionPdfGenerator,
    derive_landing_captures,
};
pub use session::BrowserSession;

// Feature-gated re-exports
#[cfg(feature = "env-config")]
pub use config::env::{chrome_path_from_env, from_env};

// ============================================================================
// Convenience type aliases
// ============================================================================

/// Shared browser session handle for web handlers.
///
/// The session is internally synchronized; handlers clone the `Arc` and call
/// [`BrowserSession::acquire`] directly.
pub type SharedBrowserSession = std::sync::Arc<BrowserSession>;
