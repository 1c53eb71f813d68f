//! # superdu
//!
//! A better way to inspect filesystem usage: look directly in the tree
//! where the space is being taken.
//!
//! superdu runs `du` (or reads precomputed du output), converts the
//! cumulative per-directory sizes into exclusive sizes, merges everything
//! below a size-of-interest threshold upward, and prints one padded line
//! per directory that actually holds space — biggest last.
//!
//! ## Usage
//!
//! ```bash
//! # Measure the current directory, 100M threshold
//! superdu
//!
//! # Measure / without crossing filesystems, 1G threshold
//! superdu -x -t 1G /
//!
//! # Reduce a saved du run instead of invoking du
//! superdu -f du_output.txt
//! ```

mod cli;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::process::exit;
use superdu::{
    config::FileConfig,
    input::{DuRecord, read_du_file, run_du},
    normalize::normalize_entries,
    output::JsonOutput,
    report::{render_report, select_entries},
    tree::UsageTree,
    utils::parse_size,
};

use cli::{Cli, Commands, ConfigCommand};

/// Entry point for the superdu application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and
/// printing any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// This function orchestrates the full pipeline: parse arguments, acquire
/// measurements (du or file), normalize, reduce the tree, and render the
/// report as text or JSON.
///
/// # Errors
///
/// Returns errors from threshold parsing, spawning du, reading the input
/// file, malformed measurement records, or JSON serialization.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    if let Some(Commands::Config { command }) = &args.subcommand {
        return handle_config_command(command);
    }

    let file_config = load_config(args.json());
    let json_mode = args.json() || file_config.report.json.unwrap_or(false);

    let report_options = args.report_options(&file_config);
    let measure_options = args.measure_options(&file_config);

    // du reports KiB blocks; the threshold must be in the same unit.
    let threshold_bytes = parse_size(&report_options.threshold)?;
    let threshold_kib = i64::try_from(threshold_bytes / 1024)
        .context("Threshold too large to represent in KiB")?;

    let (source, records) = acquire_records(&args, &file_config, &measure_options, json_mode)?;

    let cwd = env::current_dir().context("Failed to determine the current directory")?;
    let entries = normalize_entries(&records, &cwd)?;

    if entries.is_empty() {
        return print_empty_result(json_mode, source, "✨ Nothing above the threshold!");
    }

    let mut tree = UsageTree::from_entries(&entries);
    tree.exclusivize();
    tree.prune(threshold_kib);

    let selected = select_entries(&tree, threshold_kib);

    if json_mode {
        let output = JsonOutput::from_entries(source, &selected);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_report(&selected, report_options.max_width));
    }

    Ok(())
}

// ── Helper functions ────────────────────────────────────────────────────

/// Acquire raw measurement records from the configured source.
///
/// Returns the source tag used in JSON output (`"file"` or `"measured"`)
/// together with the records.
fn acquire_records(
    args: &Cli,
    config: &FileConfig,
    measure_options: &superdu::config::MeasureOptions,
    json_mode: bool,
) -> Result<(&'static str, Vec<DuRecord>)> {
    if let Some(input_file) = args.input_file() {
        return Ok(("file", read_du_file(&input_file)?));
    }

    let dir: PathBuf = args.directory(config);
    Ok(("measured", run_du(&dir, measure_options, json_mode)?))
}

/// Emit an empty-report result in JSON or human-readable form.
fn print_empty_result(json_mode: bool, source: &str, message: &str) -> Result<()> {
    if json_mode {
        let output = JsonOutput::from_entries(source, &[]);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", message.green());
    }
    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config(json_mode: bool) -> FileConfig {
    match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            if !json_mode {
                eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }
    }
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# superdu configuration
# All values shown are their defaults. Uncomment and change as needed.

# Default directory to measure (defaults to current directory when not set)
# path = "."

[report]
# Exclude entries with an exclusive size smaller than this (e.g. "34M", "1G")
# threshold = "100M"

# Output a JSON document instead of the human-readable report
# json = false

# Maximum width of the path column in the human-readable report
# max_width = 80

[measure]
# Skip directories on different filesystems (du -x)
# one_filesystem = false
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load()?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    fn show_str(val: Option<&str>, default: &str) -> String {
        val.map_or_else(
            || format!("\"{default}\"  (default)"),
            |v| format!("\"{v}\""),
        )
    }
    fn show_bool(val: Option<bool>, default: bool) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_usize(val: Option<usize>, default: usize) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }

    let path_str = config.path.as_ref().map_or_else(
        || "\".\"  (default)".to_string(),
        |p| format!("\"{}\"", p.display()),
    );

    format!(
        "\
path           = {path}

[report]
threshold      = {threshold}
json           = {json}
max_width      = {max_width}

[measure]
one_filesystem = {one_filesystem}",
        path = path_str,
        threshold = show_str(config.report.threshold.as_deref(), "100M"),
        json = show_bool(config.report.json, false),
        max_width = show_usize(config.report.max_width, 80),
        one_filesystem = show_bool(config.measure.one_filesystem, false),
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        anyhow::bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {e}",
                parent.display()
            )
        })?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}
