//! Landing capture derivation.
//!
//! Derives the two landing-page capture targets (URL plus cache key) from a
//! subscription document. The constants and the key format are part of the
//! cached-artifact contract: changing them would orphan every existing cache
//! entry and change which landing variant appears in the PDF, so this is a
//! pure function kept in one place.
//!
//! # Derivation
//!
//! | Channel | Subscriber number | Query flag |
//! |---------|-------------------|------------|
//! | 2 (header enrichment) | `56111111112` | `&SponsorId=57` (carrier 1) / `&SponsorId=87` (other carriers) |
//! | any other | `-1` | `&nohe=true` |
//!
//! The second capture is channel-independent: subscriber `56111111111` with
//! `&nohe=true`, keyed `<PRODUCT>_INSTITUCIONAL_PIN`.

/// Synthetic subscriber number for the header-enrichment flow (channel 2).
const HE_TEST_MSISDN: &str = "56111111112";

/// Synthetic subscriber number for the PIN landing capture.
const PIN_TEST_MSISDN: &str = "56111111111";

/// Sentinel subscriber number for non-HE channels.
const NO_HE_MSISDN: &str = "-1";

/// Sponsor code attached for carrier 1 on the HE flow.
const SPONSOR_CARRIER_1: u32 = 57;

/// Sponsor code attached for every other carrier on the HE flow.
const SPONSOR_DEFAULT: u32 = 87;

/// A capture target: the URL to screenshot and the logical key it is
/// cached under. Two different URLs sharing a key are intentionally the
/// same cached artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingCapture {
    /// Fully assembled landing URL.
    pub url: String,

    /// Case-normalized, filesystem-safe cache key.
    pub cache_key: String,
}

/// Derive the two capture targets for a subscription.
///
/// Pure function of `(product, channel, carrier_id, landing_url_base)`.
/// Returns `(institutional, pin)` in template order.
///
/// # Example
///
/// ```rust
/// use subscription_pdf_api::service::derive_landing_captures;
///
/// let (first, second) = derive_landing_captures("Test Plan", 1, 87, "https://x/landing");
///
/// assert_eq!(first.url, "https://x/landing?msisdn=-1&nohe=true");
/// assert_eq!(first.cache_key, "TEST_PLAN_INSTITUCIONAL_WIFI");
/// assert_eq!(second.cache_key, "TEST_PLAN_INSTITUCIONAL_PIN");
/// ```
pub fn derive_landing_captures(
    product: &str,
    channel: u8,
    carrier_id: u32,
    landing_url_base: &str,
) -> (LandingCapture, LandingCapture) {
    let is_he = channel == 2;

    let msisdn = if is_he { HE_TEST_MSISDN } else { NO_HE_MSISDN };
    let flag = if is_he {
        let sponsor = if carrier_id == 1 {
            SPONSOR_CARRIER_1
        } else {
            SPONSOR_DEFAULT
        };
        format!("&SponsorId={}", sponsor)
    } else {
        "&nohe=true".to_string()
    };

    let product_key = product.replace(' ', "_").to_uppercase();

    let first = LandingCapture {
        url: format!("{}?msisdn={}{}", landing_url_base, msisdn, flag),
        cache_key: format!(
            "{}_INSTITUCIONAL_{}",
            product_key,
            if is_he { "HE" } else { "WIFI" }
        ),
    };

    let second = LandingCapture {
        url: format!("{}?msisdn={}&nohe=true", landing_url_base, PIN_TEST_MSISDN),
        cache_key: format!("{}_INSTITUCIONAL_PIN", product_key),
    };

    (first, second)
}

// ============================================================================
// Unit Tests
// ============================================================================
