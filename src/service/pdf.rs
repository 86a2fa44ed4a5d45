//! Subscription PDF rendering.
//!
//! This module contains [`SubscriptionPdfGenerator`], the pipeline that
//! turns a [`SubscriptionDocument`] into a finished PDF:
//!
//! ```text
//! SubscriptionDocument
//!   │
//!   ├─ 1. embed static logos (fail fast if missing)
//!   ├─ 2. normalize dates (current / subscription / time / deactivation)
//!   ├─ 3. resolve two landing captures through the cache
//!   ├─ 4. compile the Handlebars template
//!   ├─ 5. print to PDF on the shared browser (A4, 20 mm margins)
//!   └─ 6. name the artifact Subscription_YYYYMMDD_HHmmss.pdf
//! ```
//!
//! # Blocking Behavior
//!
//! **[`generate()`](SubscriptionPdfGenerator::generate) blocks the calling
//! thread** - browser navigation and printing are synchronous CDP calls.
//! In an async context, always wrap it:
//!
//! ```rust,ignore
//! let artifact = tokio::task::spawn_blocking(move || {
//!     generator.generate(document)
//! }).await??;
//! ```
//!
//! # Error Handling
//!
//! Any failure in steps 1-5 is wrapped exactly once into
//! [`PdfServiceError::Render`] ("PDF generation failed: <cause>"). Partial
//! artifacts are never returned.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use handlebars::Handlebars;
use headless_chrome::Tab;
use headless_chrome::types::PrintToPdfOptions;
use serde::Serialize;

use crate::cache::CaptureCache;
use crate::capture::{PageCaptureEngine, close_tab_safely};
use crate::config::ServiceConfig;
use crate::error::{PdfServiceError, Result};
use crate::service::landing::derive_landing_captures;
use crate::service::types::{PdfArtifact, SubscriptionDocument};
use crate::session::BrowserSession;

/// Bound on the print-to-PDF navigation and render, in seconds.
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 60;

/// Display format for every date on the document.
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Display format for the derived subscription time, e.g. `10:05 AM`.
const TIME_FORMAT: &str = "%-I:%M %p";

/// Timestamp embedded in the artifact file name.
const FILE_NAME_TIMESTAMP: &str = "%Y%m%d_%H%M%S";

/// Static logos embedded into the template as data URIs.
#[derive(Debug, Serialize)]
struct LogoImages {
    dizzb: String,
    wom: String,
}

/// Renders subscription confirmations to PDF.
///
/// Holds the shared browser session (for printing), a capture engine bound
/// to the same session (for landing screenshots), the capture cache, and
/// the service configuration. One instance serves all requests; every
/// operation opens its own tab, so renders can run concurrently.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use subscription_pdf_api::{
///     BrowserSession, CaptureCache, ChromeBrowserFactory, ServiceConfig,
///     SubscriptionDocument, SubscriptionPdfGenerator,
/// };
///
/// let config = ServiceConfig::default();
/// let session = Arc::new(BrowserSession::new(Box::new(ChromeBrowserFactory::with_defaults())));
/// let cache = CaptureCache::from_config(&config);
/// let generator = SubscriptionPdfGenerator::new(session, cache, config);
///
/// let document: SubscriptionDocument = serde_json::from_str(r#"{
///     "msisdn": "56911112222",
///     "product": "Test Plan",
///     "subscriptionDate": "2024-01-15T10:00:00Z",
///     "landingUrlBase": "https://x/landing",
///     "channel": 1
/// }"#).unwrap();
///
/// let artifact = generator.generate(document)?;
/// assert!(artifact.data.starts_with(b"%PDF"));
/// # Ok::<(), subscription_pdf_api::PdfServiceError>(())
/// ```
pub struct SubscriptionPdfGenerator {
    session: Arc<BrowserSession>,
    engine: PageCaptureEngine,
    cache: CaptureCache,
    config: ServiceConfig,
}

impl SubscriptionPdfGenerator {
    /// Create a generator over the shared session, cache, and configuration.
    pub fn new(session: Arc<BrowserSession>, cache: CaptureCache, config: ServiceConfig) -> Self {
        let engine = PageCaptureEngine::new(Arc::clone(&session));
        Self {
            session,
            engine,
            cache,
            config,
        }
    }

    /// Generate the subscription confirmation PDF.
    ///
    /// # Errors
    ///
    /// Every internal failure - missing asset, navigation error, print
    /// timeout - surfaces as a single [`PdfServiceError::Render`] carrying
    /// the underlying cause.
    pub fn generate(&self, document: SubscriptionDocument) -> Result<PdfArtifact> {
        log::info!(
            "Generating subscription PDF (product='{}', channel={:?})",
            document.product,
            document.channel
        );

        self.generate_inner(document).map_err(|e| match e {
            wrapped @ PdfServiceError::Render(_) => wrapped,
            other => PdfServiceError::Render(other.to_string()),
        })
    }

    fn generate_inner(&self, document: SubscriptionDocument) -> Result<PdfArtifact> {
        self.cache.ensure_dir()?;

        let images = LogoImages {
            dizzb: self.image_to_data_url("images/logo_dizzb.png")?,
            wom: self.image_to_data_url("images/logo_wom.png")?,
        };

        let mut document = process_dates(document);

        self.resolve_captures(&mut document)?;

        let html = self.compile_template(&document, &images)?;

        let data = self.print_to_pdf(&html)?;

        let file_name = artifact_file_name(Local::now());
        log::info!(
            "✅ Subscription PDF generated: {} ({} bytes)",
            file_name,
            data.len()
        );

        Ok(PdfArtifact::new(data, file_name))
    }

    /// Resolve both landing captures and write the data URIs onto the
    /// document's image fields.
    fn resolve_captures(&self, document: &mut SubscriptionDocument) -> Result<()> {
        let base = document
            .landing_url_base
            .as_deref()
            .ok_or_else(|| PdfServiceError::Render("landingUrlBase is required".to_string()))?;

        url::Url::parse(base).map_err(|e| {
            PdfServiceError::Render(format!("invalid landingUrlBase '{}': {}", base, e))
        })?;

        let channel = document.channel.unwrap_or(0);
        let carrier_id = document.carrier_id.unwrap_or(0);
        let (first, second) =
            derive_landing_captures(&document.product, channel, carrier_id, base);

        log::debug!(
            "Resolving landing captures: {} / {}",
            first.cache_key,
            second.cache_key
        );

        document.first_optim_image =
            Some(self.cache.resolve(&first.cache_key, &first.url, &self.engine)?);
        document.second_optim_image =
            Some(self.cache.resolve(&second.cache_key, &second.url, &self.engine)?);

        Ok(())
    }

    /// Read a static asset under the configured assets directory and
    /// return it as a data URI.
    ///
    /// Any read failure is an [`PdfServiceError::AssetMissing`] - the logos
    /// ship with the deployment, so their absence is a packaging fault
    /// worth failing fast on.
    fn image_to_data_url(&self, relative: &str) -> Result<String> {
        let path = self.config.assets_dir.join(relative);

        let bytes = fs::read(&path).map_err(|e| {
            log::error!("❌ Static asset unreadable at {:?}: {}", path, e);
            PdfServiceError::AssetMissing(path.display().to_string())
        })?;

        Ok(format!(
            "data:image/{};base64,{}",
            mime_subtype(&path),
            BASE64.encode(bytes)
        ))
    }

    /// Compile the Handlebars template with the populated document.
    fn compile_template(
        &self,
        document: &SubscriptionDocument,
        images: &LogoImages,
    ) -> Result<String> {
        let source = fs::read_to_string(&self.config.template_path).map_err(|e| {
            log::error!(
                "❌ Template unreadable at {:?}: {}",
                self.config.template_path,
                e
            );
            PdfServiceError::AssetMissing(self.config.template_path.display().to_string())
        })?;

        let mut context = serde_json::to_value(document)
            .map_err(|e| PdfServiceError::Template(e.to_string()))?;
        context["images"] =
            serde_json::to_value(images).map_err(|e| PdfServiceError::Template(e.to_string()))?;

        Handlebars::new()
            .render_template(&source, &context)
            .map_err(|e| PdfServiceError::Template(e.to_string()))
    }

    /// Print the compiled HTML to PDF on a fresh tab of the shared browser.
    fn print_to_pdf(&self, html: &str) -> Result<Vec<u8>> {
        let browser = self.session.acquire()?;

        let tab = browser.new_tab().map_err(|e| {
            PdfServiceError::Render(format!("failed to open print tab: {}", e))
        })?;

        // The tab must be closed on every path out of here.
        let result = print_on_tab(&tab, html);
        close_tab_safely(&tab);
        result
    }
}

/// Navigate a tab to the composed HTML and print it.
fn print_on_tab(tab: &Tab, html: &str) -> Result<Vec<u8>> {
    tab.set_default_timeout(Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS));

    // Hand the HTML to Chrome as a data URL; embedded images are already
    // data URIs, so the page settles without any network fetches.
    let data_url = format!(
        "data:text/html;charset=utf-8,{}",
        urlencoding::encode(html)
    );

    tab.navigate_to(&data_url)
        .map_err(|e| PdfServiceError::Render(format!("failed to load document: {}", e)))?
        .wait_until_navigated()
        .map_err(|e| PdfServiceError::Render(format!("document did not settle: {}", e)))?;

    tab.print_to_pdf(Some(print_options()))
        .map_err(|e| PdfServiceError::Render(e.to_string()))
}

/// A4 portrait with 20 mm margins on all sides, backgrounds on.
fn print_options() -> PrintToPdfOptions {
    const MM_PER_INCH: f64 = 25.4;
    let margin = 20.0 / MM_PER_INCH;

    PrintToPdfOptions {
        landscape: Some(false),
        display_header_footer: Some(false),
        print_background: Some(true),
        // A4 in inches
        paper_width: Some(8.27),
        paper_height: Some(11.69),
        margin_top: Some(margin),
        margin_bottom: Some(margin),
        margin_left: Some(margin),
        margin_right: Some(margin),
        ..Default::default()
    }
}

/// Normalize the document's date fields for display.
///
/// - `currentDate` is always set to today.
/// - `subscriptionDate` is reformatted to `DD/MM/YYYY`; when no explicit
///   `subscriptionTime` was supplied, the time of day is derived from it
///   first.
/// - `deactivationDate` is reformatted when present and left absent
///   otherwise.
///
/// Unparseable upstream values pass through unchanged rather than failing
/// the render.
fn process_dates(mut document: SubscriptionDocument) -> SubscriptionDocument {
    document.current_date = Some(Local::now().format(DATE_FORMAT).to_string());

    match parse_upstream_datetime(&document.subscription_date) {
        Some(parsed) => {
            if document.subscription_time.is_none() {
                document.subscription_time = Some(parsed.format(TIME_FORMAT).to_string());
            }
            document.subscription_date = parsed.format(DATE_FORMAT).to_string();
        }
        None => {
            log::warn!(
                "Unparseable subscriptionDate '{}', passing through unchanged",
                document.subscription_date
            );
        }
    }

    document.deactivation_date = document.deactivation_date.map(|raw| {
        parse_upstream_datetime(&raw)
            .map(|parsed| parsed.format(DATE_FORMAT).to_string())
            .unwrap_or(raw)
    });

    document
}

/// Parse an upstream timestamp.
///
/// Accepts RFC 3339 (converted to local time), naive datetimes with or
/// without fractional seconds, and bare dates (midnight).
fn parse_upstream_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Artifact file name for a generation instant.
fn artifact_file_name(now: DateTime<Local>) -> String {
    format!("Subscription_{}.pdf", now.format(FILE_NAME_TIMESTAMP))
}

/// Image MIME subtype from the file extension.
fn mime_subtype(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("png")
        .to_lowercase()
}

// ============================================================================
// Unit Tests
// ============================================================================
