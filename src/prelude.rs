//! Convenient imports for common usage patterns.
//!
//! This module re-exports the most commonly used types from
//! `subscription-pdf-api`, allowing you to get started with a single import.
//!
//! # Usage
//!
//! ```rust,ignore
//! use subscription_pdf_api::prelude::*;
//! ```
//!
//! This imports:
//!
//! - [`BrowserSession`] - Shared browser session manager
//! - [`BrowserFactory`] / [`ChromeBrowserFactory`] - Launch seam
//! - [`PageCaptureEngine`] / [`Capture`] / [`CaptureOptions`] - Screenshot engine
//! - [`CaptureCache`] - TTL-bounded capture cache
//! - [`SubscriptionPdfGenerator`] - Render pipeline
//! - [`SubscriptionDocument`] / [`PdfArtifact`] - Payload and result types
//! - [`ServiceConfig`] / [`ServiceConfigBuilder`] - Configuration
//! - [`PdfServiceError`] / [`Result`] - Error handling
//! - [`SharedBrowserSession`] - Type alias for shared state

// Core types
pub use crate::cache::CaptureCache;
pub use crate::capture::{Capture, CaptureOptions, PageCaptureEngine};
pub use crate::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::error::{ErrorResponse, PdfServiceError, Result};
pub use crate::factory::{BrowserFactory, ChromeBrowserFactory};
pub use crate::service::{
    HealthResponse, PdfArtifact, SubscriptionDocument, SubscriptionPdfGenerator,
};
pub use crate::session::BrowserSession;
pub use crate::SharedBrowserSession;

// Feature-gated exports
#[cfg(feature = "env-config")]
pub use crate::config::env::{chrome_path_from_env, from_env};

// Re-export Arc for convenience (commonly needed with SharedBrowserSession)
pub use std::sync::Arc;
