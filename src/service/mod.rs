//! Subscription PDF rendering service module.
//!
//! The **framework-agnostic core** of the service: the document payload,
//! the landing-capture derivation rule, and the renderer pipeline. The HTTP
//! binary (`src/main.rs`) is a thin layer over this module.
//!
//! # Module Overview
//!
//! | File | Contents |
//! |------|----------|
//! | `types.rs` | [`SubscriptionDocument`], [`PdfArtifact`], [`HealthResponse`] |
//! | `landing.rs` | [`derive_landing_captures`] - the capture URL/key rule |
//! | `pdf.rs` | [`SubscriptionPdfGenerator`] - the render pipeline |
//!
//! # Design
//!
//! The module follows the "thin handler, thick service" split: HTTP concerns
//! (routing, status codes, headers) stay in the binary; everything a test
//! needs to exercise lives here and takes injected collaborators - the
//! browser session, the capture cache, and the configuration.
//!
//! # Blocking Behavior
//!
//! [`SubscriptionPdfGenerator::generate`] blocks the calling thread (CDP
//! calls are synchronous). Wrap it in `tokio::task::spawn_blocking` from
//! async contexts.

mod landing;
mod pdf;
mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use landing::{LandingCapture, derive_landing_captures};
pub use pdf::{DEFAULT_RENDER_TIMEOUT_SECS, SubscriptionPdfGenerator};
pub use types::{HealthResponse, PdfArtifact, SubscriptionDocument};

// ============================================================================
// Module-level tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify all expected types are exported.
    #[test]
    fn test_type_exports() {
        let _: SubscriptionDocument = SubscriptionDocument::default();
        let _: PdfArtifact = PdfArtifact::new(vec![], "test.pdf".to_string());
        let _: HealthResponse = HealthResponse::default();

        let (_, _): (LandingCapture, LandingCapture) =
            derive_landing_captures("Test Plan", 1, 87, "https://x/landing");
    }

    /// Verify the render timeout constant is exported and sane.
    #[test]
    fn test_constant_exports() {
        assert_eq!(DEFAULT_RENDER_TIMEOUT_SECS, 60);
    }
}
