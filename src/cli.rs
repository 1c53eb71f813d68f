//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments, options, and their validation
//! using the [clap](https://docs.rs/clap/) library. It provides structured access
//! to user input and handles argument conflicts and defaults.
//!
//! Helper methods on [`Cli`] accept a [`FileConfig`] reference so that config-file
//! values act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use superdu::config::file::{FileConfig, expand_tilde};
use superdu::config::{MeasureOptions, ReportOptions};

/// Default minimum size of interest when neither the CLI nor the config
/// file provides one.
const DEFAULT_THRESHOLD: &str = "100M";

/// Default cap on the path column width in the human-readable report.
const DEFAULT_MAX_WIDTH: usize = 80;

/// Command-line arguments controlling how du is invoked.
#[derive(Parser)]
struct MeasureArgs {
    /// Skip directories on different filesystems
    ///
    /// Passes `-x` to du so that mount points are not descended into.
    /// Useful when measuring `/` without pulling in network mounts.
    #[arg(short = 'x', long)]
    one_file_system: bool,

    /// Use a file with du output instead of calling du
    ///
    /// The file must contain du's tab-separated output (size, then path,
    /// one entry per line). The size unit of the file must match the unit
    /// used for the threshold (KiB blocks by du convention).
    #[arg(short = 'f', long)]
    input_file: Option<PathBuf>,
}

/// Command-line arguments controlling reduction and report layout.
#[derive(Parser)]
struct ReportArgs {
    /// Exclude entries smaller than this size (e.g. 34M)
    ///
    /// A du-style size string: an integer with an optional 1024-based
    /// suffix from K, M, G, T, P. Entries whose exclusive size falls
    /// below this after reduction are merged into their nearest
    /// surviving ancestor. Defaults to 100M.
    #[arg(short = 't', long)]
    threshold: Option<String>,

    /// Maximum width of the path column
    ///
    /// The path column grows with the longest surviving path but never
    /// beyond this cap; longer paths overflow their column instead of
    /// being truncated.
    #[arg(long)]
    max_width: Option<usize>,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
///
/// This struct defines the complete command-line interface for superdu,
/// combining all argument groups and providing the main entry point for
/// command parsing.
///
/// Helper methods accept a [`FileConfig`] reference so that config-file values
/// act as defaults when the corresponding CLI argument is not provided.
#[derive(Parser)]
#[command(name = "superdu")]
#[command(
    about = "A better way to inspect filesystem usage: look directly in the tree where the space is being taken"
)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand (e.g. `config`)
    #[command(subcommand)]
    pub subcommand: Option<Commands>,

    /// Directory to measure
    ///
    /// Defaults to the current directory if not specified (or to the
    /// `path` value from the config file, when set).
    path: Option<PathBuf>,

    /// Output the report as a single JSON object for scripting/piping
    ///
    /// When enabled, all human-readable output (progress spinner, padded
    /// columns) is suppressed and a single JSON document is printed to
    /// stdout.
    #[arg(long)]
    json: bool,

    /// Measurement options
    #[command(flatten)]
    measure: MeasureArgs,

    /// Report options
    #[command(flatten)]
    report: ReportArgs,
}

impl Cli {
    /// Whether the `--json` flag was passed on the command line.
    ///
    /// The config file can also enable JSON output; callers combine this
    /// with [`FileConfig`] after loading it (the flag alone decides
    /// whether config-load warnings are printable).
    #[must_use]
    pub const fn json(&self) -> bool {
        self.json
    }

    /// Resolve the directory to measure from CLI args, config file, or default.
    ///
    /// Priority: CLI argument > config file `path` > current directory (`.`).
    /// Tilde expansion is applied to paths originating from the config file.
    #[must_use]
    pub fn directory(&self, config: &FileConfig) -> PathBuf {
        if let Some(ref path) = self.path {
            return path.clone();
        }

        if let Some(ref path) = config.path {
            return expand_tilde(path);
        }

        PathBuf::from(".")
    }

    /// The precomputed du output file to read, if any.
    ///
    /// This is CLI-only: reading a fixed file is a per-invocation choice,
    /// not a persistent preference.
    #[must_use]
    pub fn input_file(&self) -> Option<PathBuf> {
        self.measure.input_file.clone()
    }

    /// Extract measurement options from CLI args and config file.
    ///
    /// The threshold is shared with the report options so that du's own
    /// `-t` pre-filter and the reduction threshold always agree.
    #[must_use]
    pub fn measure_options(&self, config: &FileConfig) -> MeasureOptions {
        MeasureOptions {
            one_filesystem: self.measure.one_file_system
                || config.measure.one_filesystem.unwrap_or(false),
            threshold: self.threshold(config),
        }
    }

    /// Extract report options from CLI args and config file.
    ///
    /// Priority: CLI argument > config file > hardcoded default
    /// (threshold `100M`, column cap 80).
    #[must_use]
    pub fn report_options(&self, config: &FileConfig) -> ReportOptions {
        ReportOptions {
            threshold: self.threshold(config),
            max_width: self
                .report
                .max_width
                .or(config.report.max_width)
                .unwrap_or(DEFAULT_MAX_WIDTH),
        }
    }

    /// The effective threshold string (CLI > config file > `100M`).
    fn threshold(&self, config: &FileConfig) -> String {
        self.report
            .threshold
            .clone()
            .or_else(|| config.report.threshold.clone())
            .unwrap_or_else(|| DEFAULT_THRESHOLD.to_string())
    }
}
