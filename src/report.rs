//! Report selection and text rendering.
//!
//! After reduction, this module picks which entries appear in the final
//! report and lays them out. Entries are ordered ascending by size so
//! the biggest space consumers end up at the bottom of the terminal,
//! right above the next prompt.

use std::cmp::Ordering;

use crate::tree::{ReducedEntry, UsageTree};
use crate::utils::format_size;

/// Select the entries that make it into the final report.
///
/// Keeps entries with size at or above the threshold. Forest roots are
/// kept regardless of size: they cannot have been pruned, and dropping
/// them here would silently lose the space they account for.
///
/// Entries are sorted ascending by size, ties broken by path so the
/// output is deterministic.
#[must_use]
pub fn select_entries(tree: &UsageTree, threshold: i64) -> Vec<ReducedEntry> {
    let mut selected: Vec<ReducedEntry> = tree
        .entries()
        .into_iter()
        .filter(|entry| entry.size >= threshold || entry.is_root)
        .collect();

    selected.sort_by(compare_entries);
    selected
}

/// Ascending by size, then by path.
fn compare_entries(a: &ReducedEntry, b: &ReducedEntry) -> Ordering {
    a.size.cmp(&b.size).then_with(|| a.path.cmp(&b.path))
}

/// Render the selected entries as the human-readable report.
///
/// Each line shows the path left-justified and padded with `_` up to the
/// column width, followed by the humanized size. The column width adapts
/// to the longest path (plus one space of separation) but never exceeds
/// `max_width`; longer paths simply overflow their column. Sizes are in
/// KiB blocks and are scaled to bytes for formatting, mirroring du's own
/// `-h` output.
#[must_use]
pub fn render_report(entries: &[ReducedEntry], max_width: usize) -> String {
    let width = column_width(entries, max_width);

    let mut report = String::new();
    for entry in entries {
        let label = format!("{} ", entry.path.display());
        report.push_str(&format!(
            "{label:_<width$} {}\n",
            format_size(entry.size.saturating_mul(1024))
        ));
    }
    report
}

/// Column width: longest path plus its trailing space, capped at `max_width`.
fn column_width(entries: &[ReducedEntry], max_width: usize) -> usize {
    entries
        .iter()
        .map(|entry| entry.path.display().to_string().chars().count() + 1)
        .max()
        .unwrap_or(0)
        .min(max_width)
}
