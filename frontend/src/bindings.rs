//! JavaScript API.
//!
//! Thin `#[wasm_bindgen]` exports over the formatter and the validator, for
//! pages that want the helpers without the Leptos UI.

use wasm_bindgen::prelude::*;
use web_sys::File;

use crate::format::format_size;
use crate::types::FileSource;
use crate::validation::{validate_size, validate_type, ValidationRule};

#[wasm_bindgen(js_name = formatFileSize)]
pub fn format_file_size(bytes: f64) -> String {
    format_size(bytes.max(0.0) as u64)
}

#[wasm_bindgen(js_name = validateFileType)]
pub fn validate_file_type(file: &File, allowed_extensions: JsValue) -> Result<bool, JsValue> {
    let allowed: Vec<String> = serde_wasm_bindgen::from_value(allowed_extensions)?;
    Ok(validate_type(&file.descriptor(), allowed.as_slice()))
}

#[wasm_bindgen(js_name = validateFileSize)]
pub fn validate_file_size(file: &File, max_size: f64) -> bool {
    validate_size(&file.descriptor(), max_size.max(0.0) as u64)
}

/// `null` when the file passes `rule` (the default rule if omitted),
/// otherwise the message the UI would show.
#[wasm_bindgen(js_name = checkFile)]
pub fn check_file(file: &File, rule: JsValue) -> Result<Option<String>, JsValue> {
    let rule: ValidationRule = if rule.is_undefined() || rule.is_null() {
        ValidationRule::default()
    } else {
        serde_wasm_bindgen::from_value(rule)?
    };
    Ok(rule.check(&file.descriptor()).err().map(|e| e.to_string()))
}

/// `{ name, size, mimeType, lastModified }`
#[wasm_bindgen(js_name = describeFile)]
pub fn describe_file(file: &File) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(&file.descriptor())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size_clamps_input() {
        assert_eq!(format_file_size(2048.0), "2 KB");
        assert_eq!(format_file_size(-5.0), "0 Bytes");
        assert_eq!(format_file_size(1.9), "1 Bytes");
    }
}
