//! Error types for the PDFTool frontend.
//!
//! - [`ValidationError`] - a selected file violates the [`ValidationRule`](crate::ValidationRule)
//! - [`UploadError`] - terminal failure of an upload session
//! - [`AppError`] - DOM, storage and setup failures
//!
//! Validation errors convert into [`UploadError`] via `From`, so `?` works
//! inside the upload path.

use thiserror::Error;
use wasm_bindgen::JsValue;

// =============================================================================
// Validation Errors
// =============================================================================

/// A file rejected by the validator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Extension not in the allowed set.
    #[error("File {file} is not a supported type (allowed: {allowed})")]
    UnsupportedType { file: String, allowed: String },

    /// File larger than the configured limit.
    #[error("File {file} exceeds the size limit of {limit}")]
    TooLarge { file: String, limit: String },

    /// Nothing to upload.
    #[error("No file selected")]
    NoFiles,
}

impl ValidationError {
    /// Name of the offending file.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            ValidationError::UnsupportedType { file, .. } | ValidationError::TooLarge { file, .. } => Some(file.as_str()),
            ValidationError::NoFiles => None,
        }
    }
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Terminal failure of an upload.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum UploadError {
    /// Rejected locally, nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Transport-level failure (connection refused, CORS, offline...).
    #[error("Network error, please check your connection")]
    Network,

    /// The configured timeout elapsed.
    #[error("Upload timed out after {0} ms, please retry")]
    Timeout(u32),

    /// Server answered outside the 2xx range.
    #[error("Upload failed: HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// 2xx answer whose body is not valid JSON.
    #[error("Server returned an invalid response: {0}")]
    BadResponse(String),

    /// Cancelled by the caller.
    #[error("Upload cancelled")]
    Cancelled,

    /// The request could not be built or sent at all.
    #[error("Failed to send request: {0}")]
    Transport(String),
}

impl UploadError {
    /// Short machine-readable failure reason.
    pub fn reason(&self) -> &'static str {
        match self {
            UploadError::Validation(_) => "validation",
            UploadError::Network => "network",
            UploadError::Timeout(_) => "timeout",
            UploadError::Http { .. } => "http",
            UploadError::BadResponse(_) => "bad-response",
            UploadError::Cancelled => "cancelled",
            UploadError::Transport(_) => "transport",
        }
    }
}

// =============================================================================
// Application Errors
// =============================================================================

/// DOM and setup failures.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AppError {
    /// An expected element is absent from the page.
    #[error("Element not found: {0}")]
    MissingElement(String),

    /// A DOM call threw.
    #[error("DOM error: {0}")]
    Dom(String),

    /// `localStorage` is unavailable or refused the write.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn dom(err: JsValue) -> Self {
        AppError::Dom(js_error_message(&err))
    }

    pub fn storage(err: JsValue) -> Self {
        AppError::Storage(js_error_message(&err))
    }
}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;

/// For best-effort DOM calls whose failure should be logged, not returned.
pub trait WarnOnErr<T> {
    fn warn_on_err(self, action: &str) -> Option<T>;
}

impl<T> WarnOnErr<T> for AppResult<T> {
    fn warn_on_err(self, action: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("{} failed: {}", action, e);
                None
            }
        }
    }
}

/// Best-effort readable message out of a thrown JS value.
pub fn js_error_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        let validation: UploadError = ValidationError::TooLarge {
            file: "a.pdf".into(),
            limit: "100 MB".into(),
        }
        .into();

        assert_eq!(validation.reason(), "validation");
        assert_eq!(UploadError::Timeout(10).reason(), "timeout");
        assert_eq!(UploadError::BadResponse("eof".into()).reason(), "bad-response");
        assert_eq!(UploadError::Network.reason(), "network");
    }

    #[test]
    fn test_messages_name_file_and_status() {
        let err = ValidationError::UnsupportedType {
            file: "notes.txt".into(),
            allowed: ".pdf".into(),
        };
        assert_eq!(err.to_string(), "File notes.txt is not a supported type (allowed: .pdf)");
        assert_eq!(err.file_name(), Some("notes.txt"));

        let http = UploadError::Http { status: 413, status_text: "Payload Too Large".into() };
        assert!(http.to_string().contains("413"));
    }

    #[test]
    fn test_warn_on_err_keeps_value_and_swallows_failure() {
        let ok: AppResult<u8> = Ok(3);
        assert_eq!(ok.warn_on_err("read"), Some(3));

        let failed: AppResult<u8> = Err(AppError::Dom("detached node".into()));
        assert_eq!(failed.warn_on_err("highlight"), None);
    }
}
