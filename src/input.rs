//! Acquisition of raw disk-usage measurements.
//!
//! This module is the boundary to the measurement collaborator: it either
//! spawns `du` and captures its output, or reads a file of precomputed du
//! output. Both paths produce the same record shape — one (size, path)
//! pair per tab-separated line — which the normalizer turns into the
//! in-memory mapping.

use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::MeasureOptions;

/// A single raw measurement: the size and path fields of one du output line.
///
/// The size is kept as a string here; parsing (and its fatal-on-garbage
/// policy) belongs to the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuRecord {
    /// Size field as printed by du (a block count in the caller-chosen unit).
    pub size: String,

    /// Path field, verbatim.
    pub path: String,
}

/// Run `du` over a directory and collect its per-directory measurements.
///
/// Invokes `du [-x] -t <threshold> <path>` so that du itself already
/// excludes entries below the threshold, and parses the tab-separated
/// output. A spinner is shown while du runs unless `quiet` is set
/// (required for `--json` mode so only the JSON reaches stdout).
///
/// # Errors
///
/// Returns an error if:
/// - `du` cannot be spawned (not installed, not in `PATH`)
/// - `du` exits with a non-zero status
/// - The output is not valid UTF-8 or a line has no tab separator
pub fn run_du(path: &Path, options: &MeasureOptions, quiet: bool) -> Result<Vec<DuRecord>> {
    let mut command = Command::new("du");
    if options.one_filesystem {
        command.arg("-x");
    }
    command.args(["-t", &options.threshold]);
    command.arg(path);

    let spinner = (!quiet).then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Measuring {}...", path.display()));
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner
    });

    let output = command
        .output()
        .with_context(|| format!("Failed to run du on {}", path.display()))?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if !output.status.success() {
        bail!(
            "du exited with status {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8(output.stdout).context("du produced non-UTF-8 output")?;
    parse_records(&stdout)
}

/// Read precomputed du output from a file.
///
/// A missing or unreadable file is fatal. Line terminators (`\n` and
/// `\r\n`) are stripped; any other trailing whitespace stays part of the
/// path, since filenames may legitimately end in spaces.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line has no tab
/// separator.
pub fn read_du_file(path: &Path) -> Result<Vec<DuRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read du output file {}", path.display()))?;
    parse_records(&content)
}

/// Parse du output text into records, one per non-empty line.
///
/// Each line must contain at least one tab; the size field is everything
/// before the first tab, the path is everything after it.
fn parse_records(text: &str) -> Result<Vec<DuRecord>> {
    let mut records = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }

        let Some((size, path)) = line.split_once('\t') else {
            bail!("Malformed du output on line {}: no tab separator", index + 1);
        };

        records.push(DuRecord {
            size: size.to_string(),
            path: path.to_string(),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records_basic() {
        let records = parse_records("100\t/a\n40\t/a/b\n").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], DuRecord {
            size: "100".to_string(),
            path: "/a".to_string(),
        });
        assert_eq!(records[1].path, "/a/b");
    }

    #[test]
    fn test_parse_records_missing_final_newline() {
        let records = parse_records("100\t/a\n40\t/a/b").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].size, "40");
        assert_eq!(records[1].path, "/a/b");
    }

    #[test]
    fn test_parse_records_crlf_terminators() {
        let records = parse_records("100\t/a\r\n40\t/a/b\r\n").unwrap();

        assert_eq!(records[0].path, "/a");
        assert_eq!(records[1].path, "/a/b");
    }

    #[test]
    fn test_parse_records_preserves_trailing_spaces_in_path() {
        // Filenames may end in spaces; only line terminators are stripped.
        let records = parse_records("100\t/a/weird \n").unwrap();

        assert_eq!(records[0].path, "/a/weird ");
    }

    #[test]
    fn test_parse_records_path_containing_tab() {
        // Only the first tab separates fields.
        let records = parse_records("100\t/a/with\ttab\n").unwrap();

        assert_eq!(records[0].size, "100");
        assert_eq!(records[0].path, "/a/with\ttab");
    }

    #[test]
    fn test_parse_records_skips_empty_lines() {
        let records = parse_records("100\t/a\n\n40\t/a/b\n").unwrap();

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_records_rejects_untabbed_line() {
        let result = parse_records("100 /a\n");

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("line 1"));
    }

    #[test]
    fn test_read_du_file_missing_is_fatal() {
        let result = read_du_file(Path::new("/nonexistent/du_output.txt"));

        assert!(result.is_err());
    }
}
