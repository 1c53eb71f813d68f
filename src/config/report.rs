//! Report configuration for reduction and rendering.

/// Configuration for the reduction threshold and report layout.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    /// Minimum size of interest as a du-style size string (e.g. `"100M"`).
    /// Parsed once, then converted to KiB blocks to match du's unit.
    pub threshold: String,

    /// Cap on the path column width in the human-readable report.
    pub max_width: usize,
}
