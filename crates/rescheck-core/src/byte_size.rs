//! Human-readable byte counts.
//!
//! Units are powers of 1024. Values are printed with one or two decimal
//! places (`1.5 KB`, `1.01 KB`, `1023.0 B`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const CONVERSION_FACTOR: f64 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("the number of bytes must be greater than or equal to zero (got {0})")]
pub struct ByteSizeError(pub i64);

/// Byte units ordered by magnitude: 1 unit = 1024^magnitude bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ByteUnit {
    Byte,
    Kilobyte,
    Megabyte,
    Gigabyte,
}

impl ByteUnit {
    /// Largest first, for unit selection.
    const DESCENDING: [ByteUnit; 4] = [
        ByteUnit::Gigabyte,
        ByteUnit::Megabyte,
        ByteUnit::Kilobyte,
        ByteUnit::Byte,
    ];

    pub fn magnitude(self) -> u32 {
        match self {
            ByteUnit::Byte => 0,
            ByteUnit::Kilobyte => 1,
            ByteUnit::Megabyte => 2,
            ByteUnit::Gigabyte => 3,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            ByteUnit::Byte => "B",
            ByteUnit::Kilobyte => "KB",
            ByteUnit::Megabyte => "MB",
            ByteUnit::Gigabyte => "GB",
        }
    }

    /// Number of bytes in one of this unit.
    pub fn bytes_per_unit(self) -> f64 {
        CONVERSION_FACTOR.powi(self.magnitude() as i32)
    }

    /// Converts `bytes` into this unit, e.g. `ByteUnit::Megabyte.convert(1572864)` is `"1.5 MB"`.
    pub fn convert(self, bytes: i64) -> Result<String, ByteSizeError> {
        check_non_negative(bytes)?;
        let converted = bytes as f64 / self.bytes_per_unit();
        Ok(format!("{} {}", format_decimal(converted), self.suffix())
            .trim_end()
            .to_string())
    }

    fn fits(self, bytes: i64) -> bool {
        self.bytes_per_unit() <= bytes as f64
    }
}

impl fmt::Display for ByteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for ByteUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "B" | "BYTE" => Ok(ByteUnit::Byte),
            "KB" | "KILOBYTE" => Ok(ByteUnit::Kilobyte),
            "MB" | "MEGABYTE" => Ok(ByteUnit::Megabyte),
            "GB" | "GIGABYTE" => Ok(ByteUnit::Gigabyte),
            other => Err(format!("unknown byte unit: {other}")),
        }
    }
}

/// Expresses `bytes` in the largest unit whose size does not exceed it.
///
/// A value of exactly `1024^k` is reported in unit `k` (`1024` is `"1.0 KB"`).
pub fn human_readable(bytes: i64) -> Result<String, ByteSizeError> {
    check_non_negative(bytes)?;
    let unit = ByteUnit::DESCENDING
        .into_iter()
        .find(|u| u.fits(bytes))
        .unwrap_or(ByteUnit::Byte);
    unit.convert(bytes)
}

fn check_non_negative(bytes: i64) -> Result<(), ByteSizeError> {
    if bytes < 0 {
        return Err(ByteSizeError(bytes));
    }
    Ok(())
}

/// `0.0#` pattern: at least one, at most two decimal places.
fn format_decimal(value: f64) -> String {
    let two = format!("{value:.2}");
    match two.strip_suffix('0') {
        Some(one) => one.to_string(),
        None => two,
    }
}
