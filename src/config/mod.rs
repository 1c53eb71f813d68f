//! Configuration types and the persistent configuration file.
//!
//! Options are split by the component they steer: [`MeasureOptions`] for
//! the du invocation, [`ReportOptions`] for reduction and rendering.
//! [`FileConfig`] is the optional TOML file whose values act as defaults
//! underneath CLI arguments.

pub mod file;
pub mod measure;
pub mod report;

pub use file::FileConfig;
pub use measure::MeasureOptions;
pub use report::ReportOptions;
