//! Size parsing and formatting utilities, compatible with `du`.
//!
//! This module provides functions for parsing du-style size strings
//! (like "100M" or "2G") into byte values, and for formatting raw byte
//! counts back into the human-readable form `du -h` prints. Both sides
//! use 1024-based unit steps so reports line up visually with du output.

use anyhow::Result;

/// Parse a du-style size string into bytes.
///
/// Accepts an integer magnitude followed by an optional unit suffix from
/// the du table: `K`, `M`, `G`, `T`, `P` (1024-based). A bare number is
/// taken as bytes. The suffix is case-insensitive and surrounding
/// whitespace is ignored.
///
/// # Arguments
///
/// * `size_str` - A string representing the size (e.g., "100M", "34K", "2048")
///
/// # Returns
///
/// - `Ok(u64)` - The size in bytes
/// - `Err(anyhow::Error)` - If the string format is invalid or causes overflow
///
/// # Errors
///
/// This function will return an error if:
/// - The magnitude is empty or not an unsigned integer (e.g., "M", "1.5G", "-1K")
/// - The suffix is not in the du unit table (e.g., "10X")
/// - The resulting value would overflow `u64`
///
/// # Examples
///
/// ```
/// # use superdu::utils::parse_size;
/// # use anyhow::Result;
/// # fn main() -> Result<()> {
/// assert_eq!(parse_size("100K")?, 102_400);
/// assert_eq!(parse_size("1M")?, 1_048_576);
/// assert_eq!(parse_size("512")?, 512);
/// # Ok(())
/// # }
/// ```
pub fn parse_size(size_str: &str) -> Result<u64> {
    let size_str = size_str.trim().to_uppercase();
    let (number_str, multiplier) = split_size_unit(&size_str)?;

    let number: u64 = number_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size magnitude: '{number_str}'"))?;

    number
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("Size value overflow: {number} * {multiplier}"))
}

/// Split a size string into its numeric part and the unit multiplier.
///
/// The numeric part is the leading run of ASCII digits; everything after
/// it must be a known du suffix (or empty).
fn split_size_unit(size_str: &str) -> Result<(&str, u64)> {
    const UNITS: &[(&str, u64)] = &[
        ("", 1),
        ("K", 1 << 10),
        ("M", 1 << 20),
        ("G", 1 << 30),
        ("T", 1 << 40),
        ("P", 1 << 50),
    ];

    let digits_end = size_str
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(size_str.len());
    let (number_str, suffix) = size_str.split_at(digits_end);

    for (unit, multiplier) in UNITS {
        if suffix == *unit {
            return Ok((number_str, *multiplier));
        }
    }

    Err(anyhow::anyhow!("Unknown size suffix: '{suffix}'"))
}

/// Format a byte count the way `du -h` does.
///
/// Divides by 1024 through the suffix table `"" K M G T P E Z`, printing
/// one decimal place; magnitudes beyond the table spill into `Yi`.
/// Negative values keep their sign (sizes can go negative transiently on
/// inconsistent input).
#[must_use]
pub fn format_size(num: i64) -> String {
    const UNITS: &[&str] = &["", "K", "M", "G", "T", "P", "E", "Z"];

    #[allow(clippy::cast_precision_loss)]
    let mut num = num as f64;
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{num:3.1} {unit}");
        }
        num /= 1024.0;
    }
    format!("{num:.1} Yi")
}
