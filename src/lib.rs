//! # superdu
//!
//! A better way to inspect filesystem usage: look directly in the tree
//! where the space is being taken.
//!
//! du's raw output double-counts every nested directory (a parent's size
//! includes all of its children) and drowns the interesting entries in
//! thousands of small ones. This crate reduces a du run to the handful
//! of directories where space is actually concentrated:
//!
//! 1. [`normalize`] turns raw (size, path) records into a mapping keyed
//!    by canonical absolute path.
//! 2. [`tree`] builds an explicit forest from the path-prefix structure,
//!    converts cumulative sizes into exclusive sizes, and merges every
//!    below-threshold directory upward into its nearest surviving
//!    ancestor — roots are never removed.
//! 3. [`report`] selects and orders the survivors and renders the padded
//!    text report; [`output`] provides the JSON form.
//!
//! [`input`] is the boundary to the measurement collaborator (spawning
//! du or reading a saved du run), and [`utils`] holds the du-compatible
//! size parsing and formatting.
//!
//! The reduction itself is a pure, single-threaded, in-memory transform:
//! no I/O, no shared state, deterministic for a given input.

pub mod config;
pub mod input;
pub mod normalize;
pub mod output;
pub mod report;
pub mod tree;
pub mod utils;

pub use config::{FileConfig, MeasureOptions, ReportOptions};
pub use input::DuRecord;
pub use normalize::{UsageMap, normalize_entries};
pub use report::{render_report, select_entries};
pub use tree::{ReducedEntry, UsageTree};
