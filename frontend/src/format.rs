//! Human-readable byte counts.

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const STEP: u64 = 1024;

/// Format a byte count with a binary unit and at most two decimals.
///
/// ```
/// use pdftool_frontend::format_size;
///
/// assert_eq!(format_size(0), "0 Bytes");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    // floor(log1024(bytes)) in integer arithmetic, capped at the largest unit
    let mut unit = 0;
    let mut threshold = STEP;
    while unit < UNITS.len() - 1 && bytes >= threshold {
        unit += 1;
        threshold = threshold.saturating_mul(STEP);
    }

    let value = bytes as f64 / (STEP as f64).powi(unit as i32);
    let rounded = (value * 100.0).round() / 100.0;

    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_size(0), "0 Bytes");
    }

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(100 * 1024 * 1024), "100 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_two_decimals() {
        // 1234 / 1024 = 1.205078...
        assert_eq!(format_size(1234), "1.21 KB");
        // just under 1 MB rounds up inside the KB unit
        assert_eq!(format_size(1024 * 1024 - 1), "1024 KB");
    }

    #[test]
    fn test_caps_at_gigabytes() {
        assert_eq!(format_size(5 * 1024u64.pow(4)), "5120 GB");
        assert!(format_size(u64::MAX).ends_with(" GB"));
    }
}
