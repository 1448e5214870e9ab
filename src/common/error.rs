use std::path::PathBuf;

use thiserror::Error;

/// Failures of the overlay engine that callers must branch on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OverlayError {
    /// Area fractions cannot be normalised against an empty precinct.
    #[error("precinct '{0}' has zero planar area after cleaning")]
    ZeroAreaPrecinct(String),

    /// A remote overlay response could not be turned into a result.
    #[error("malformed overlay response: {0}")]
    MalformedResponse(String),
}

/// Invalid class breakpoints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    #[error("breakpoint {index} is not finite ({value})")]
    NonFinite { index: usize, value: f64 },

    #[error("breakpoints must be non-decreasing: {prev} > {next} at position {index}")]
    Decreasing { index: usize, prev: f64, next: f64 },
}

/// Every candidate of an ordered fallback list failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FallbackError {
    #[error("no candidates to attempt")]
    NoCandidates,

    #[error("all {attempts} candidate(s) failed, last error: {last}")]
    Exhausted { attempts: usize, last: String },
}

/// Configuration loading or validation error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
