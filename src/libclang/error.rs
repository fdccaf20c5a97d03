//! Error types for the dynamic libclang loader

use std::path::PathBuf;

use crate::libclang::version::LibraryVersion;

/// Why a libclang shared library could not be put into service.
///
/// Load errors are non-fatal to the host process: the indexer reports
/// "unavailable" and every downstream feature degrades to empty results.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// None of the candidate paths pointed at a usable library. Carries the
    /// per-candidate diagnostics accumulated during the search.
    #[error("No usable libclang found; attempted {} candidate path(s)", attempts.len())]
    NoUsableLibrary { attempts: Vec<String> },

    /// The dynamic loader could not open the file at all.
    #[error("Failed to open library {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    /// A required entry point was missing. One missing symbol fails the
    /// whole candidate; there is no partially-resolved state.
    #[error("Missing required entry point '{symbol}' in {path}")]
    MissingSymbol { path: PathBuf, symbol: String },

    /// The library loaded but reported a version below the required minimum.
    #[error("Library {path} is version {found}, but {required} or later is required")]
    VersionTooOld {
        path: PathBuf,
        found: LibraryVersion,
        required: LibraryVersion,
    },

    /// The version banner could not be parsed at all.
    #[error("Could not determine version of {path}: {reason}")]
    VersionUnreadable { path: PathBuf, reason: String },
}

/// Errors from library lifecycle operations after load.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Library is not loaded")]
    NotLoaded,
}
