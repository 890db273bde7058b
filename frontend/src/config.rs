//! Application configuration.
//!
//! Centralized configuration for the PDFTool frontend. The constants are the
//! defaults; [`FrontendConfig`] can be deserialized from JSON (for instance a
//! `<script type="application/json">` block rendered by the server) to
//! override any of them.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationRule;

/// Base path of the PDF API.
pub const API_BASE: &str = "/api/v1/pdf";

/// Application name shown in the header and page title.
pub const APP_NAME: &str = "PDFTool";

/// Maximum file size for upload (in bytes).
///
/// 100 MB limit, matches the server's `PDFTOOL_MAX_FILE_SIZE` default.
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Extensions accepted by default.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".pdf"];

/// Upload timeout (5 minutes).
pub const UPLOAD_TIMEOUT_MS: u32 = 300_000;

/// Default toast lifetime.
pub const NOTIFICATION_DURATION_MS: u32 = 5_000;

/// Toast lifetime for the theme-switch confirmation.
pub const THEME_NOTIFICATION_DURATION_MS: u32 = 2_000;

/// `localStorage` key holding the theme preference.
pub const THEME_STORAGE_KEY: &str = "pdftool-theme";

/// Form field carrying the file of a single-file upload.
pub const FILE_FIELD: &str = "file";

/// Repeated form field carrying the files of a batch upload.
pub const FILES_FIELD: &str = "files";

/// Element ids the page template is expected to provide.
pub const DROP_ZONE_ID: &str = "dropZone";
pub const FILE_INPUT_ID: &str = "fileInput";
pub const LOADING_OVERLAY_ID: &str = "loadingOverlay";
pub const THEME_ICON_SELECTOR: &str = ".theme-icon";

/// PDF API endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Merge several PDFs (batch upload).
    Merge,
    /// Document information.
    Info,
    /// Page extraction.
    Pages,
    /// Text or image watermark.
    Watermark,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [Endpoint::Merge, Endpoint::Info, Endpoint::Pages, Endpoint::Watermark];

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Merge => "merge",
            Endpoint::Info => "info",
            Endpoint::Pages => "pages",
            Endpoint::Watermark => "watermark",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.path() == path)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Endpoint::Merge => "Merge PDFs",
            Endpoint::Info => "Document info",
            Endpoint::Pages => "Extract pages",
            Endpoint::Watermark => "Add watermark",
        }
    }

    /// Whether the endpoint takes the repeated `files` field.
    pub fn is_batch(&self) -> bool {
        matches!(self, Endpoint::Merge)
    }

    /// Full URL under `api_base`.
    pub fn url(&self, api_base: &str) -> String {
        format!("{}/{}", api_base.trim_end_matches('/'), self.path())
    }
}

/// HTTP mechanism used for uploads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// `XMLHttpRequest`, reports upload progress.
    #[default]
    Xhr,
    /// `fetch`, no progress.
    Fetch,
}

/// Element ids looked up once at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementIds {
    pub drop_zone: String,
    pub file_input: String,
    pub loading_overlay: String,
    pub theme_icon_selector: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            drop_zone: DROP_ZONE_ID.to_string(),
            file_input: FILE_INPUT_ID.to_string(),
            loading_overlay: LOADING_OVERLAY_ID.to_string(),
            theme_icon_selector: THEME_ICON_SELECTOR.to_string(),
        }
    }
}

/// Runtime configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrontendConfig {
    /// Base path of the PDF API
    pub api_base: String,
    /// Extension / size rule applied to every selected file
    pub rule: ValidationRule,
    /// Upload timeout in milliseconds
    pub upload_timeout_ms: u32,
    /// Default toast lifetime in milliseconds (0 = sticky)
    pub notification_duration_ms: u32,
    /// Upload transport
    pub transport: TransportKind,
    /// DOM element ids
    pub elements: ElementIds,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE.to_string(),
            rule: ValidationRule::default(),
            upload_timeout_ms: UPLOAD_TIMEOUT_MS,
            notification_duration_ms: NOTIFICATION_DURATION_MS,
            transport: TransportKind::default(),
            elements: ElementIds::default(),
        }
    }
}

impl FrontendConfig {
    /// Parse a JSON override; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        endpoint.url(&self.api_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = FrontendConfig::from_json(r#"{"apiBase": "/pdf/", "uploadTimeoutMs": 1000}"#).unwrap();

        assert_eq!(config.upload_timeout_ms, 1000);
        assert_eq!(config.notification_duration_ms, NOTIFICATION_DURATION_MS);
        assert_eq!(config.rule, ValidationRule::default());
        assert_eq!(config.transport, TransportKind::Xhr);
        assert_eq!(config.elements.drop_zone, "dropZone");
        assert_eq!(config.endpoint_url(Endpoint::Info), "/pdf/info");
    }

    #[test]
    fn test_fetch_transport_override() {
        let config = FrontendConfig::from_json(r#"{"transport": "fetch", "rule": {"maxSize": 10}}"#).unwrap();

        assert_eq!(config.transport, TransportKind::Fetch);
        assert_eq!(config.rule.max_size, 10);
        assert_eq!(config.rule.allowed_extensions, vec![".pdf".to_string()]);
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(Endpoint::Merge.url(API_BASE), "/api/v1/pdf/merge");
        assert!(Endpoint::Merge.is_batch());
        assert!(!Endpoint::Watermark.is_batch());
        assert_eq!(Endpoint::from_path("pages"), Some(Endpoint::Pages));
        assert_eq!(Endpoint::from_path("split"), None);
    }
}
