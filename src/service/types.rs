//! Shared types for the subscription PDF service.
//!
//! This module defines the request payload ([`SubscriptionDocument`]) and
//! the generation result ([`PdfArtifact`]) exchanged between the HTTP
//! surface and the renderer.
//!
//! # Overview
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SubscriptionDocument`] | The `POST /api/pdf/generate` JSON body |
//! | [`PdfArtifact`] | Generated PDF bytes plus the download file name |
//! | [`HealthResponse`] | `GET /health` body |

use serde::{Deserialize, Serialize};

/// The subscription confirmation payload.
///
/// Field names follow the upstream camelCase JSON contract. The two
/// `*OptimImage` fields arrive empty and are populated with data URIs by
/// the renderer after capture resolution; `currentDate` is always
/// overwritten with the render-time date.
///
/// # Example
///
/// ```rust
/// use subscription_pdf_api::SubscriptionDocument;
///
/// let document: SubscriptionDocument = serde_json::from_str(
///     r#"{
///         "msisdn": "56911112222",
///         "product": "Test Plan",
///         "carrierId": 87,
///         "subscriptionDate": "2024-01-15T10:00:00Z",
///         "pin": 4711,
///         "landingUrlBase": "https://x/landing",
///         "channel": 1
///     }"#,
/// ).unwrap();
///
/// assert_eq!(document.product, "Test Plan");
/// assert!(document.subscription_time.is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubscriptionDocument {
    /// Subscriber number the confirmation is addressed to.
    pub msisdn: String,

    /// Product name; also the stem of both capture cache keys.
    pub product: String,

    /// Carrier identifier; selects the sponsor code on HE-flow captures.
    pub carrier_id: Option<u32>,

    /// Subscription timestamp as sent by the upstream system (RFC 3339 or
    /// a naive date/datetime). Reformatted to `DD/MM/YYYY` by the renderer.
    pub subscription_date: String,

    /// Subscription time of day. Derived from `subscription_date` when
    /// absent.
    pub subscription_time: Option<String>,

    /// Confirmation PIN; upstream sends a string, a number, or null.
    pub pin: Option<serde_json::Value>,

    /// Deactivation timestamp, when the subscription has ended.
    /// Reformatted when present, omitted when absent - never defaulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deactivation_date: Option<String>,

    /// Who triggered the deactivation, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deactivated_by: Option<String>,

    /// Render-time date, `DD/MM/YYYY`. Always set by the renderer.
    pub current_date: Option<String>,

    /// Data URI of the first landing capture (institutional flow).
    pub first_optim_image: Option<String>,

    /// Data URI of the second landing capture (PIN flow).
    pub second_optim_image: Option<String>,

    /// Base URL of the landing page to capture.
    pub landing_url_base: Option<String>,

    /// Subscription channel code; channel 2 is the header-enrichment flow.
    pub channel: Option<u8>,
}

/// A generated PDF, ready to hand to the HTTP layer.
///
/// Created once per request; never cached.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    /// The complete PDF file content.
    pub data: Vec<u8>,

    /// Download file name, `Subscription_YYYYMMDD_HHmmss.pdf`.
    pub file_name: String,
}

impl PdfArtifact {
    /// Create a new artifact.
    pub fn new(data: Vec<u8>, file_name: String) -> Self {
        Self { data, file_name }
    }

    /// `Content-Disposition` header value for the download response.
    ///
    /// # Example
    ///
    /// ```rust
    /// use subscription_pdf_api::PdfArtifact;
    ///
    /// let artifact = PdfArtifact::new(vec![], "Subscription_20240115_100000.pdf".to_string());
    /// assert_eq!(
    ///     artifact.content_disposition(),
    ///     "attachment; filename=\"Subscription_20240115_100000.pdf\""
    /// );
    /// ```
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.file_name)
    }

    /// Size of the PDF in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Health check response.
///
/// ```text
/// GET /health
///
/// {
///     "status": "healthy",
///     "service": "subscription-pdf-api"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` when the endpoint answers at all.
    pub status: String,

    /// Service name identifier.
    pub service: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "subscription-pdf-api".to_string(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifies the camelCase wire contract and defaults for absent fields.
    #[test]
    fn test_document_deserializes_camel_case() {
        let document: SubscriptionDocument = serde_json::from_str(
            r#"{
                "msisdn": "56911112222",
                "product": "Test Plan",
                "carrierId": 1,
                "subscriptionDate": "2024-01-15T10:00:00Z",
                "subscriptionTime": "10:00 AM",
                "pin": "1234",
                "deactivationDate": "2024-02-15T10:00:00Z",
                "landingUrlBase": "https://x/landing",
                "channel": 2
            }"#,
        )
        .unwrap();

        assert_eq!(document.msisdn, "56911112222");
        assert_eq!(document.carrier_id, Some(1));
        assert_eq!(document.subscription_time.as_deref(), Some("10:00 AM"));
        assert_eq!(document.channel, Some(2));
        assert!(document.first_optim_image.is_none());
    }

    /// Verifies that the PIN accepts string, number, and null, matching
    /// the upstream contract.
    #[test]
    fn test_pin_accepts_mixed_types() {
        let with_number: SubscriptionDocument =
            serde_json::from_str(r#"{"pin": 4711}"#).unwrap();
        assert_eq!(with_number.pin, Some(serde_json::json!(4711)));

        let with_string: SubscriptionDocument =
            serde_json::from_str(r#"{"pin": "4711"}"#).unwrap();
        assert_eq!(with_string.pin, Some(serde_json::json!("4711")));

        let with_null: SubscriptionDocument = serde_json::from_str(r#"{"pin": null}"#).unwrap();
        assert_eq!(with_null.pin, Some(serde_json::Value::Null));
    }

    /// Verifies that an absent deactivation date stays absent through a
    /// serialize round trip (the template must not see a placeholder).
    #[test]
    fn test_absent_deactivation_date_not_serialized() {
        let document = SubscriptionDocument {
            product: "Test Plan".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&document).unwrap();
        assert!(json.get("deactivationDate").is_none());
        assert!(json.get("deactivatedBy").is_none());
    }

    /// Verifies the attachment header for the generated artifact.
    #[test]
    fn test_artifact_content_disposition() {
        let artifact = PdfArtifact::new(
            vec![0x25, 0x50, 0x44, 0x46],
            "Subscription_20240115_100000.pdf".to_string(),
        );

        assert_eq!(
            artifact.content_disposition(),
            "attachment; filename=\"Subscription_20240115_100000.pdf\""
        );
        assert_eq!(artifact.size(), 4);
    }

    /// Verifies the health body shape.
    #[test]
    fn test_health_response_default() {
        let response = HealthResponse::default();
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "subscription-pdf-api");
    }
}
