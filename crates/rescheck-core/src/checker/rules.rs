//! File size rule shared by the file checkers.

/// Whether `current` is an acceptable size for a file last seen at `previous` bytes.
///
/// Growth is always fine. A shrink is fine while the drop, in percent of
/// `previous`, stays strictly below `threshold_percent`. A missing `previous`
/// (not applicable) or a zero `previous` accepts anything; an unknown
/// `current` against a known size does not pass.
pub fn is_file_size_acceptable(
    current: Option<u64>,
    previous: Option<u64>,
    threshold_percent: f64,
) -> bool {
    let previous = match previous {
        None | Some(0) => return true,
        Some(p) => p,
    };
    let Some(current) = current else {
        return false;
    };

    let percent = (current as f64 - previous as f64) * 100.0 / previous as f64;
    percent >= 0.0 || percent.abs() < threshold_percent
}
