//! Entry normalization: raw records to the canonical usage mapping.
//!
//! This module turns raw (size, path) measurement records into a mapping
//! from canonical absolute path to integer size. Canonicalization is
//! purely lexical: relative paths are joined against the supplied working
//! directory and `.`/`..` components are resolved without ever touching
//! the filesystem, so symlinks are not followed and the result is
//! deterministic for a given input.
//!
//! Duplicate policy: if two records canonicalize to the same path, the
//! later record silently overwrites the earlier one (last-write-wins).
//! du never emits the same directory twice, but concatenated or
//! hand-edited input files can; the last value is taken as the freshest
//! measurement.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use crate::input::DuRecord;

/// The usage mapping: canonical absolute path to size.
///
/// Sizes are signed so that the exclusivization pass can represent
/// transiently negative values on inconsistent input. A `BTreeMap` keeps
/// iteration order deterministic (lexicographic by path).
pub type UsageMap = BTreeMap<PathBuf, i64>;

/// Build the canonical usage mapping from raw measurement records.
///
/// Each record's path is canonicalized against `cwd` and its size parsed
/// as an integer. Later records overwrite earlier ones that canonicalize
/// to the same path (see module docs).
///
/// # Errors
///
/// Returns an error if any record's size field is not an integer. This is
/// fatal by design: a garbled size means the measurement stream itself is
/// corrupt, and partial results would be misleading.
pub fn normalize_entries(records: &[DuRecord], cwd: &Path) -> Result<UsageMap> {
    let mut entries = UsageMap::new();

    for record in records {
        let size: i64 = record
            .size
            .trim()
            .parse()
            .with_context(|| format!("Invalid size '{}' for path '{}'", record.size, record.path))?;

        entries.insert(canonicalize_lexically(Path::new(&record.path), cwd), size);
    }

    Ok(entries)
}

/// Resolve a path to a canonical absolute form without touching the
/// filesystem.
///
/// Relative paths are joined against `cwd` (which must be absolute).
/// `.` components are dropped and `..` pops the previous component;
/// popping past the root leaves the root in place, matching OS path
/// semantics (`/..` is `/`). Symlinks are deliberately not resolved:
/// the report should show paths the way du printed them, not their
/// targets.
#[must_use]
pub fn canonicalize_lexically(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut canonical = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keeps prefix and root components in place: pop() refuses
                // to remove them.
                canonical.pop();
            }
            other => canonical.push(other),
        }
    }

    canonical
}
