//! Human readable byte sizes for build statistics.

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with binary (1024) steps and one decimal.
///
/// Trailing `.0` is dropped, so `1024` renders as `1 KB` and `1536` as
/// `1.5 KB`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = round1(value);
    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, UNITS[unit])
    }
}

/// Round to one decimal place.
#[inline]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage saved going from `original` to `compressed`, rounded to one
/// decimal. Zero when there is nothing to compare.
pub fn saved_ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    round1((original as f64 - compressed as f64) / original as f64 * 100.0)
}
