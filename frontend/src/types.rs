//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **File Types** - metadata of user-selected files
//! - **Notification Types** - toast records and severities
//! - **Upload Types** - terminal upload outcome

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::UploadError;

// =============================================================================
// File Types
// =============================================================================

/// Metadata describing a user-selected file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// File name, including extension
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type reported by the browser, if any
    pub mime_type: Option<String>,
    /// Last modification time, if known
    pub last_modified: Option<DateTime<Utc>>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: None,
            last_modified: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Something the validator can inspect and a transport can send.
pub trait FileSource: Clone + 'static {
    fn descriptor(&self) -> FileDescriptor;
}

impl FileSource for FileDescriptor {
    fn descriptor(&self) -> FileDescriptor {
        self.clone()
    }
}

impl FileSource for web_sys::File {
    fn descriptor(&self) -> FileDescriptor {
        let mime_type = self.type_();
        FileDescriptor {
            name: self.name(),
            size: self.size() as u64,
            mime_type: (!mime_type.is_empty()).then_some(mime_type),
            last_modified: DateTime::from_timestamp_millis(self.last_modified() as i64),
        }
    }
}

// =============================================================================
// Notification Types
// =============================================================================

/// Notification severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    /// CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Success => "notification-success",
            Severity::Error => "notification-error",
            Severity::Warning => "notification-warning",
            Severity::Info => "notification-info",
        }
    }

    /// Icon shown before the message.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "✅",
            Severity::Error => "❌",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        }
    }
}

/// Identifier of a live notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub u64);

/// A toast currently owned by the [`Notifier`](crate::Notifier).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    /// Auto-dismiss delay; 0 keeps the toast until closed by hand
    pub duration_ms: u32,
}

// =============================================================================
// Upload Types
// =============================================================================

/// Terminal result of an upload session.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadOutcome {
    /// Parsed JSON body of the 2xx response.
    Success(serde_json::Value),
    Failure(UploadError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success(_))
    }

    pub fn into_result(self) -> Result<serde_json::Value, UploadError> {
        match self {
            UploadOutcome::Success(value) => Ok(value),
            UploadOutcome::Failure(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_serialization() {
        let file = FileDescriptor::new("report.pdf", 2048).with_mime_type("application/pdf");
        let json = serde_json::to_value(&file).unwrap();

        assert_eq!(json["name"], "report.pdf");
        assert_eq!(json["mimeType"], "application/pdf");
        assert!(json["lastModified"].is_null());
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        assert_eq!(Severity::Error.css_class(), "notification-error");
    }
}
