//! Structured JSON output for scripting and piping.
//!
//! This module provides serializable data structures that represent the
//! final report. When the `--json` flag is passed, these structures are
//! serialized to stdout as a single JSON object, replacing all
//! human-readable output.

use serde::Serialize;

use crate::tree::ReducedEntry;
use crate::utils::format_size;

/// Top-level JSON output emitted when `--json` is active.
#[derive(Serialize, Debug)]
pub struct JsonOutput {
    /// Where the measurements came from: `"measured"` (du was invoked)
    /// or `"file"` (precomputed du output).
    pub source: String,

    /// Surviving entries, ascending by size.
    pub entries: Vec<JsonEntry>,

    /// Aggregated summary statistics.
    pub summary: JsonSummary,
}

/// A single report entry in the JSON output.
#[derive(Serialize, Debug)]
pub struct JsonEntry {
    /// Canonical absolute path of the directory.
    pub path: String,

    /// Exclusive size in KiB blocks, as reduced from du's measurements.
    pub size_kib: i64,

    /// Human-readable formatted size (e.g. `"97.7 M"`).
    pub size_formatted: String,

    /// Whether this entry is a forest root (reported even below threshold).
    pub root: bool,
}

/// Aggregated summary across all surviving entries.
#[derive(Serialize, Debug)]
pub struct JsonSummary {
    /// Number of surviving entries.
    pub total_entries: usize,

    /// Total exclusive size across all entries, in KiB blocks.
    pub total_kib: i64,

    /// Human-readable formatted total size.
    pub total_formatted: String,
}

impl JsonOutput {
    /// Build a `JsonOutput` from the selected report entries.
    #[must_use]
    pub fn from_entries(source: &str, entries: &[ReducedEntry]) -> Self {
        Self {
            source: source.to_string(),
            entries: entries.iter().map(JsonEntry::from_entry).collect(),
            summary: JsonSummary::from_entries(entries),
        }
    }
}

impl JsonEntry {
    /// Convert a `ReducedEntry` into its JSON form.
    #[must_use]
    pub fn from_entry(entry: &ReducedEntry) -> Self {
        Self {
            path: entry.path.display().to_string(),
            size_kib: entry.size,
            size_formatted: format_size(entry.size.saturating_mul(1024)),
            root: entry.is_root,
        }
    }
}

impl JsonSummary {
    /// Compute summary statistics from the selected entries.
    #[must_use]
    pub fn from_entries(entries: &[ReducedEntry]) -> Self {
        let total_kib: i64 = entries.iter().map(|entry| entry.size).sum();

        Self {
            total_entries: entries.len(),
            total_kib,
            total_formatted: format_size(total_kib.saturating_mul(1024)),
        }
    }
}
