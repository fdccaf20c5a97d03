//! Library lifecycle
//!
//! `LibclangLibrary` is the session-owned handle through which everything
//! else reaches libclang. It starts unloaded, is loaded at most once, and
//! hands out `Arc<dyn LibclangApi>` clones while loaded. Callers that hold
//! an API clone past `unload` keep the underlying shared object alive until
//! the last clone drops.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::libclang::api::LibclangApi;
use crate::libclang::dynamic::DynamicLibclang;
use crate::libclang::error::{LibraryError, LoadError};
use crate::libclang::version::LibraryVersion;

enum State {
    Unloaded,
    Loaded {
        api: Arc<dyn LibclangApi>,
        version: LibraryVersion,
        path: Option<PathBuf>,
    },
}

pub struct LibclangLibrary {
    state: State,
}

impl LibclangLibrary {
    pub fn new() -> Self {
        Self {
            state: State::Unloaded,
        }
    }

    /// Search the candidate paths and load the first usable library.
    pub fn load(
        candidates: &[PathBuf],
        required_version: LibraryVersion,
    ) -> Result<Self, LoadError> {
        let dynamic = DynamicLibclang::load(candidates, required_version)?;
        let version = dynamic.version();
        let path = dynamic.path().to_path_buf();
        Ok(Self {
            state: State::Loaded {
                api: Arc::new(dynamic),
                version,
                path: Some(path),
            },
        })
    }

    /// Wrap an already-constructed API implementation. Used by tests to
    /// substitute a fake without touching the dynamic loader.
    pub fn from_api(api: Arc<dyn LibclangApi>, version: LibraryVersion) -> Self {
        Self {
            state: State::Loaded {
                api,
                version,
                path: None,
            },
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded { .. })
    }

    /// The loaded library's version; empty when unloaded.
    pub fn version(&self) -> LibraryVersion {
        match &self.state {
            State::Loaded { version, .. } => *version,
            State::Unloaded => LibraryVersion::default(),
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        match &self.state {
            State::Loaded { path, .. } => path.as_ref(),
            State::Unloaded => None,
        }
    }

    pub fn api(&self) -> Result<Arc<dyn LibclangApi>, LibraryError> {
        match &self.state {
            State::Loaded { api, .. } => Ok(Arc::clone(api)),
            State::Unloaded => Err(LibraryError::NotLoaded),
        }
    }

    /// Release this handle's reference to the library.
    ///
    /// Every translation unit, diagnostic, and completion result obtained
    /// through the library must already be disposed.
    pub fn unload(&mut self) -> Result<(), LibraryError> {
        match std::mem::replace(&mut self.state, State::Unloaded) {
            State::Loaded { version, path, .. } => {
                info!(
                    "Unloading libclang {}{}",
                    version,
                    path.map(|p| format!(" ({})", p.display())).unwrap_or_default()
                );
                Ok(())
            }
            State::Unloaded => Err(LibraryError::NotLoaded),
        }
    }
}

impl Default for LibclangLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libclang::testing::FakeLibclang;

    #[test]
    fn test_unloaded_by_default() {
        let lib = LibclangLibrary::new();
        assert!(!lib.is_loaded());
        assert!(lib.version().is_empty());
        assert!(lib.api().is_err());
    }

    #[test]
    fn test_from_api_reports_loaded() {
        let fake = Arc::new(FakeLibclang::new("clang version 14.0.6"));
        let lib = LibclangLibrary::from_api(fake, LibraryVersion::new(14, 0, 6));
        assert!(lib.is_loaded());
        assert_eq!(lib.version(), LibraryVersion::new(14, 0, 6));
        assert!(lib.api().is_ok());
        assert!(lib.path().is_none());
    }

    #[test]
    fn test_unload_transitions_to_unloaded() {
        let fake = Arc::new(FakeLibclang::new("clang version 14.0.6"));
        let mut lib = LibclangLibrary::from_api(fake, LibraryVersion::new(14, 0, 6));
        assert!(lib.unload().is_ok());
        assert!(!lib.is_loaded());
        assert!(matches!(lib.unload(), Err(LibraryError::NotLoaded)));
    }
}
