//! Unsaved-buffer overlay
//!
//! Tracks editor buffers whose content differs from disk. Every parse,
//! reparse, and completion call receives the overlay as an array of
//! `CXUnsavedFile` records so the foreign library sees what the editor sees.
//!
//! Entries are keyed by a caller-supplied document id, which lets the host
//! re-point an id at a new path (rename) without leaving a duplicate behind.
//! An update with `dirty = false` is a removal: a buffer that matches disk
//! has nothing to overlay.

use std::ffi::CString;
use std::os::raw::c_ulong;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::trace;

use crate::libclang::ffi::CXUnsavedFile;

#[derive(Debug, Clone)]
struct Entry {
    id: String,
    path: PathBuf,
    contents: String,
}

/// Shared overlay of dirty editor buffers.
///
/// Internally synchronized: the editor's document-update path writes while
/// the indexer's parse path reads. Readers take a point-in-time copy via
/// [`snapshot`](Self::snapshot); they never observe a half-applied update.
#[derive(Debug, Default)]
pub struct UnsavedFiles {
    entries: RwLock<Vec<Entry>>,
}

impl UnsavedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the buffer for `id`, replacing any previous entry for the same
    /// id. `dirty = false` removes the entry instead.
    pub fn update(&self, id: &str, path: &Path, contents: &str, dirty: bool) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // remove-before-insert so a renamed doc never leaves two entries
        entries.retain(|e| e.id != id);
        if dirty {
            trace!("Overlay update: {} ({} bytes)", path.display(), contents.len());
            entries.push(Entry {
                id: id.to_string(),
                path: path.to_path_buf(),
                contents: contents.to_string(),
            });
        } else {
            trace!("Overlay clean: {}", path.display());
        }
    }

    /// Remove the entry for `id`; no-op when absent.
    pub fn remove(&self, id: &str) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.retain(|e| e.id != id);
    }

    /// Clear the overlay. Used on session suspend/detach.
    pub fn remove_all(&self) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current contents for `id`, if overlaid.
    pub fn contents_for(&self, id: &str) -> Option<String> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.contents.clone())
    }

    /// Copy the overlay out into the array form the foreign calls consume.
    ///
    /// The snapshot owns the path and content buffers; the `CXUnsavedFile`
    /// records point into them and stay valid for the snapshot's lifetime,
    /// which must cover the foreign call it is passed to.
    pub fn snapshot(&self) -> UnsavedFilesSnapshot {
        let entries = match self.entries.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        let mut filenames = Vec::with_capacity(entries.len());
        let mut contents: Vec<Vec<u8>> = Vec::with_capacity(entries.len());
        for entry in &entries {
            // a path with an interior NUL cannot be represented to the
            // foreign library; skip the entry rather than fail the call
            let Ok(filename) = CString::new(entry.path.to_string_lossy().as_bytes()) else {
                continue;
            };
            filenames.push(filename);
            contents.push(entry.contents.as_bytes().to_vec());
        }

        let files = filenames
            .iter()
            .zip(&contents)
            .map(|(filename, body)| CXUnsavedFile {
                filename: filename.as_ptr(),
                contents: body.as_ptr() as *const std::os::raw::c_char,
                length: body.len() as c_ulong,
            })
            .collect();

        UnsavedFilesSnapshot {
            _filenames: filenames,
            _contents: contents,
            files,
        }
    }
}

/// Owning flattened form of the overlay.
///
/// Heap buffers are pinned for the snapshot's lifetime, so the raw pointers
/// in `files` remain valid even if the snapshot value itself moves.
pub struct UnsavedFilesSnapshot {
    _filenames: Vec<CString>,
    _contents: Vec<Vec<u8>>,
    files: Vec<CXUnsavedFile>,
}

impl UnsavedFilesSnapshot {
    pub fn as_slice(&self) -> &[CXUnsavedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
