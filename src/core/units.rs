//! Human-readable byte sizes (decimal units)

/// Decimal units, smallest first
const UNITS: &[&str] = &["B", "kB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Default number of decimal places
pub const DEFAULT_PRECISION: usize = 1;

/// Most decimal places ever printed; an f64 carries no more than this
pub const MAX_PRECISION: usize = 16;

/// Format a byte count with [`DEFAULT_PRECISION`] decimals
pub fn human_size(bytes: u128) -> String {
    format_size(bytes, DEFAULT_PRECISION)
}

/// Format a byte count using the largest unit that keeps the value below 1000
///
/// Plain bytes are printed without decimals. The scale never goes past `YB`,
/// so huge counts show up as large `YB` values. `precision` is clamped to
/// [`MAX_PRECISION`].
pub fn format_size(bytes: u128, precision: usize) -> String {
    let precision = precision.min(MAX_PRECISION);
    if bytes < 1000 {
        return format!("{} {}", bytes, UNITS[0]);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    // 999_999 B would round to "1000.0 kB"; step up instead
    let scale = 10f64.powi(precision as i32);
    if (value * scale).round() / scale >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    format!("{:.*} {}", precision, value, UNITS[unit])
}

/// Percentage of `part` in `whole`, 0.0 when `whole` is zero
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
