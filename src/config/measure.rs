//! Measurement configuration for the du invocation.

/// Configuration for how du is invoked.
#[derive(Clone, Debug)]
pub struct MeasureOptions {
    /// Whether to pass `-x` so du skips directories on other filesystems.
    pub one_filesystem: bool,

    /// Threshold string passed through to du's `-t` flag, so du already
    /// excludes entries below the size of interest. Must stay in sync
    /// with the report threshold or the reduction sees a pre-filtered
    /// view it did not ask for.
    pub threshold: String,
}
