//! Error types for compile-argument derivation
//!
//! These never cross the resolver boundary: argument derivation degrades to
//! an empty list on any failure. The types exist so the dry-run layer can
//! report precisely what went wrong to the log.

use std::time::Duration;

/// Why a dry-run compile produced no usable output.
#[derive(Debug, thiserror::Error)]
pub enum DryRunError {
    #[error("Failed to launch {program}: {source}")]
    LaunchFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dry-run compile exceeded {timeout:?} and was killed")]
    TimedOut { timeout: Duration },

    #[error("Dry-run compile exited with {status}: {stderr}")]
    NonZeroExit { status: i32, stderr: String },

    #[error("Dry-run compile I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DryRunError {
    pub fn launch_failed(program: &str, source: std::io::Error) -> Self {
        Self::LaunchFailed {
            program: program.to_string(),
            source,
        }
    }
}
