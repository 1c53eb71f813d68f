//! Utility functions and helpers.
//!
//! This module contains utility functions used throughout the application,
//! such as du-compatible size parsing and formatting helpers.

pub mod size;

pub use size::{format_size, parse_size};
