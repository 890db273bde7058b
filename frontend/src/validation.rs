//! File validation against an extension whitelist and a size limit.
//!
//! The two predicates are pure; [`ValidationRule`] bundles them with the
//! user-facing error messages used by the drop zone and the upload session.

use serde::{Deserialize, Serialize};

use crate::config::{ALLOWED_EXTENSIONS, MAX_FILE_SIZE};
use crate::error::ValidationError;
use crate::format::format_size;
use crate::types::{FileDescriptor, FileSource};

/// True iff the name ends with one of `allowed_extensions`, ignoring case.
///
/// An empty extension list matches nothing.
pub fn validate_type<S: AsRef<str>>(file: &FileDescriptor, allowed_extensions: &[S]) -> bool {
    let name = file.name.to_lowercase();
    allowed_extensions
        .iter()
        .any(|ext| name.ends_with(&ext.as_ref().to_lowercase()))
}

/// True iff the file is at most `max_bytes` long.
pub fn validate_size(file: &FileDescriptor, max_bytes: u64) -> bool {
    file.size <= max_bytes
}

/// Extension whitelist plus size limit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidationRule {
    pub allowed_extensions: Vec<String>,
    pub max_size: u64,
}

impl Default for ValidationRule {
    fn default() -> Self {
        Self {
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_size: MAX_FILE_SIZE,
        }
    }
}

impl ValidationRule {
    pub fn new<I, S>(allowed_extensions: I, max_size: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_extensions: allowed_extensions.into_iter().map(Into::into).collect(),
            max_size,
        }
    }

    /// Type first, then size.
    pub fn check(&self, file: &FileDescriptor) -> Result<(), ValidationError> {
        if !validate_type(file, self.allowed_extensions.as_slice()) {
            return Err(ValidationError::UnsupportedType {
                file: file.name.clone(),
                allowed: self.allowed_extensions.join(", "),
            });
        }
        if !validate_size(file, self.max_size) {
            return Err(ValidationError::TooLarge {
                file: file.name.clone(),
                limit: format_size(self.max_size),
            });
        }
        Ok(())
    }

    /// Split files into accepted ones and rejections, keeping input order.
    pub fn partition<F: FileSource>(&self, files: Vec<F>) -> (Vec<F>, Vec<ValidationError>) {
        let mut accepted = Vec::with_capacity(files.len());
        let mut rejected = Vec::new();

        for file in files {
            match self.check(&file.descriptor()) {
                Ok(()) => accepted.push(file),
                Err(e) => rejected.push(e),
            }
        }

        (accepted, rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> FileDescriptor {
        FileDescriptor::new(name, size)
    }

    #[test]
    fn test_type_is_case_insensitive() {
        assert!(validate_type(&file("a.PDF", 1), &[".pdf"]));
        assert!(validate_type(&file("a.pdf", 1), &[".PDF"]));
        assert!(!validate_type(&file("a.txt", 1), &[".pdf"]));
        assert!(!validate_type(&file("pdf", 1), &[".pdf"]));
    }

    #[test]
    fn test_empty_extension_set_matches_nothing() {
        let none: [&str; 0] = [];
        assert!(!validate_type(&file("a.pdf", 1), &none));
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(validate_size(&file("a.pdf", 100), 100));
        assert!(!validate_size(&file("a.pdf", 101), 100));
        assert!(validate_size(&file("empty.pdf", 0), 0));
    }

    #[test]
    fn test_check_reports_type_before_size() {
        let rule = ValidationRule::new([".pdf"], 10);

        let err = rule.check(&file("huge.doc", 1_000)).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType { .. }));

        let err = rule.check(&file("huge.pdf", 1_000)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLarge { file: "huge.pdf".into(), limit: "10 Bytes".into() }
        );
    }

    #[test]
    fn test_partition_keeps_order() {
        let rule = ValidationRule::default();
        let files = vec![file("a.pdf", 1), file("b.txt", 1), file("c.pdf", 2)];

        let (accepted, rejected) = rule.partition(files);

        let names: Vec<_> = accepted.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.pdf", "c.pdf"]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].file_name(), Some("b.txt"));
    }

    #[test]
    fn test_default_rule() {
        let rule = ValidationRule::default();
        assert_eq!(rule.allowed_extensions, vec![".pdf".to_string()]);
        assert_eq!(rule.max_size, 100 * 1024 * 1024);
    }
}
