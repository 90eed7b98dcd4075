//! `rescheck size` – print a byte count in human readable form.

use anyhow::Result;
use rescheck_core::{human_readable, ByteUnit};

pub fn run_size(bytes: i64, unit: Option<ByteUnit>) -> Result<()> {
    println!("{}", format_size(bytes, unit)?);
    Ok(())
}

fn format_size(bytes: i64, unit: Option<ByteUnit>) -> Result<String> {
    let text = match unit {
        Some(unit) => unit.convert(bytes)?,
        None => human_readable(bytes)?,
    };
    Ok(text)
}
