//! Translation unit cache
//!
//! `SourceIndex` owns every foreign translation-unit handle and is the only
//! component allowed to dispose one. Each cached entry remembers the compile
//! arguments and on-disk mtime that produced it; a lookup compares both and
//! takes the cheapest sufficient path:
//!
//! - args and mtime unchanged: return the cached handle, zero foreign calls
//! - mtime changed: reparse in place; a failed reparse falls through to a
//!   full rebuild rather than returning a broken handle
//! - args changed at all (order-sensitive): dispose and parse from scratch
//!
//! When the library is unavailable every operation degrades to an empty
//! facade. Nothing here panics on foreign failure.

use std::collections::BTreeMap;
use std::ffi::CString;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use tracing::{debug, warn};

use crate::compdb::CompilationDatabase;
use crate::libclang::api::LibclangApi;
use crate::libclang::ffi::{CXIndex, CXTranslationUnit};
use crate::libclang::library::LibclangLibrary;

use super::completion::CodeCompleteResults;
use super::cursor::Cursor;
use super::location::FileLocation;
use super::translation_unit::TranslationUnit;
use super::unsaved_files::UnsavedFiles;

/// Extensions the indexer considers translation units.
const TRANSLATION_UNIT_EXTENSIONS: &[&str] =
    &["c", "cc", "cpp", "cxx", "m", "mm", "h", "hh", "hpp"];

/// True when `path` names a file the indexer should track.
pub fn is_indexable_translation_unit(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            TRANSLATION_UNIT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// C sources get C flags from the resolver; everything else is C++.
fn is_cpp_source(path: &Path) -> bool {
    !matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("c") | Some("m")
    )
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

struct StoredTranslationUnit {
    args: Vec<String>,
    mtime: SystemTime,
    handle: CXTranslationUnit,
}

pub struct SourceIndex {
    api: Option<Arc<dyn LibclangApi>>,
    compilation_db: Arc<dyn CompilationDatabase>,
    unsaved: Arc<UnsavedFiles>,
    /// Foreign index handle, created on first parse.
    index: Option<CXIndex>,
    global_options: u32,
    units: BTreeMap<PathBuf, StoredTranslationUnit>,
}

impl SourceIndex {
    pub fn new(
        api: Option<Arc<dyn LibclangApi>>,
        compilation_db: Arc<dyn CompilationDatabase>,
        global_options: u32,
    ) -> Self {
        Self {
            api,
            compilation_db,
            unsaved: Arc::new(UnsavedFiles::new()),
            index: None,
            global_options,
            units: BTreeMap::new(),
        }
    }

    /// Wire the index to a library handle; an unloaded library produces a
    /// permanently degraded (but functional) index.
    pub fn from_library(
        library: &LibclangLibrary,
        compilation_db: Arc<dyn CompilationDatabase>,
        global_options: u32,
    ) -> Self {
        Self::new(library.api().ok(), compilation_db, global_options)
    }

    pub fn unsaved_files(&self) -> Arc<UnsavedFiles> {
        Arc::clone(&self.unsaved)
    }

    pub fn is_loaded(&self) -> bool {
        self.api.is_some()
    }

    // ------------------------------------------------------------------
    // Global options
    // ------------------------------------------------------------------

    pub fn global_options(&self) -> u32 {
        match (&self.api, self.index) {
            (Some(api), Some(index)) => api.index_get_global_options(index),
            _ => self.global_options,
        }
    }

    pub fn set_global_options(&mut self, options: u32) {
        self.global_options = options;
        if let (Some(api), Some(index)) = (&self.api, self.index) {
            api.index_set_global_options(index, options);
        }
    }

    // ------------------------------------------------------------------
    // Cache operations
    // ------------------------------------------------------------------

    /// Parse ahead of need so the first interactive query is fast.
    pub fn prime_translation_unit(&mut self, path: &Path) {
        let _ = self.get_translation_unit(path);
    }

    /// Fetch the translation unit for `path`, parsing or refreshing as
    /// required. Always returns a facade; failures come back empty.
    pub fn get_translation_unit(&mut self, path: &Path) -> TranslationUnit {
        let Some(api) = self.api.clone() else {
            debug!(
                "libclang unavailable; no translation unit for {}",
                path.display()
            );
            return TranslationUnit::empty();
        };

        let args = self
            .compilation_db
            .compile_args_for_translation_unit(path, is_cpp_source(path));
        let mtime = file_mtime(path);

        let mut rebuild = false;
        if let Some(stored) = self.units.get_mut(path) {
            if stored.args == args {
                if mtime == Some(stored.mtime) {
                    // fresh: no foreign call at all
                    return TranslationUnit::new(api, stored.handle);
                }

                let snapshot = self.unsaved.snapshot();
                let options = api.default_reparse_options(stored.handle);
                let started = Instant::now();
                let status =
                    api.reparse_translation_unit(stored.handle, snapshot.as_slice(), options);
                if status == 0 {
                    crate::log_index_timing!(
                        tracing::Level::DEBUG,
                        "reparse",
                        path,
                        started.elapsed()
                    );
                    if let Some(mtime) = mtime {
                        stored.mtime = mtime;
                    }
                    return TranslationUnit::new(api, stored.handle);
                }
                warn!(
                    "Reparse failed for {} (status {}); rebuilding",
                    path.display(),
                    status
                );
                rebuild = true;
            } else {
                debug!("Compile arguments changed for {}; rebuilding", path.display());
                rebuild = true;
            }
        }

        if rebuild {
            self.dispose_entry(path);
        }

        self.parse_new(api, path, args, mtime)
    }

    fn parse_new(
        &mut self,
        api: Arc<dyn LibclangApi>,
        path: &Path,
        args: Vec<String>,
        mtime: Option<SystemTime>,
    ) -> TranslationUnit {
        let Some(index) = self.ensure_index(&api) else {
            return TranslationUnit::empty();
        };
        let Ok(file_name) = CString::new(path.to_string_lossy().as_bytes()) else {
            return TranslationUnit::empty();
        };

        let c_args: Vec<CString> = args
            .iter()
            .filter_map(|arg| CString::new(arg.as_str()).ok())
            .collect();
        let arg_ptrs: Vec<*const c_char> = c_args.iter().map(|arg| arg.as_ptr()).collect();

        let snapshot = self.unsaved.snapshot();
        let options = api.default_editing_translation_unit_options();
        let started = Instant::now();
        let handle =
            api.parse_translation_unit(index, &file_name, &arg_ptrs, snapshot.as_slice(), options);
        if handle.is_null() {
            warn!("Parse produced no translation unit for {}", path.display());
            return TranslationUnit::empty();
        }

        crate::log_index_timing!(tracing::Level::DEBUG, "parse", path, started.elapsed());
        debug!(
            "Parsed {} ({} compile args, {} unsaved files)",
            path.display(),
            args.len(),
            snapshot.len()
        );
        self.units.insert(
            path.to_path_buf(),
            StoredTranslationUnit {
                args,
                mtime: mtime.unwrap_or(SystemTime::UNIX_EPOCH),
                handle,
            },
        );
        TranslationUnit::new(api, handle)
    }

    fn ensure_index(&mut self, api: &Arc<dyn LibclangApi>) -> Option<CXIndex> {
        if let Some(index) = self.index {
            return Some(index);
        }
        let index = api.create_index(0, 0);
        if index.is_null() {
            warn!("clang_createIndex returned null");
            return None;
        }
        api.index_set_global_options(index, self.global_options);
        self.index = Some(index);
        Some(index)
    }

    /// Dispose and forget the entry for `path`; no-op when absent. Must be
    /// called when a file is deleted, renamed away, or closed for good.
    pub fn remove_translation_unit(&mut self, path: &Path) {
        self.dispose_entry(path);
    }

    /// Dispose every entry. Used at index shutdown.
    pub fn remove_all_translation_units(&mut self) {
        let paths: Vec<PathBuf> = self.units.keys().cloned().collect();
        for path in paths {
            self.dispose_entry(&path);
        }
    }

    fn dispose_entry(&mut self, path: &Path) {
        if let Some(stored) = self.units.remove(path) {
            if let Some(api) = &self.api {
                api.dispose_translation_unit(stored.handle);
            }
        }
    }

    /// Snapshot of everything currently indexed.
    pub fn indexed_translation_units(&self) -> BTreeMap<PathBuf, TranslationUnit> {
        let Some(api) = &self.api else {
            return BTreeMap::new();
        };
        self.units
            .iter()
            .map(|(path, stored)| {
                (
                    path.clone(),
                    TranslationUnit::new(Arc::clone(api), stored.handle),
                )
            })
            .collect()
    }

    pub fn has_translation_unit(&self, path: &Path) -> bool {
        self.units.contains_key(path)
    }

    // ------------------------------------------------------------------
    // Query entry points
    // ------------------------------------------------------------------

    /// Code completion at (path, line, column), refreshing the translation
    /// unit first so completion sees current buffer state.
    pub fn code_complete_at(&mut self, path: &Path, line: u32, column: u32) -> CodeCompleteResults {
        let tu = self.get_translation_unit(path);
        let snapshot = self.unsaved.snapshot();
        tu.code_complete_at(path, line, column, &snapshot)
    }

    /// The cursor referenced at a file location: resolve the AST node under
    /// the position, then follow it to its referenced declaration.
    pub fn referenced_cursor_for_file_location(
        &mut self,
        location: &FileLocation,
    ) -> Option<Cursor> {
        let tu = self.get_translation_unit(&location.file_path);
        let cursor = tu.cursor_at(&location.file_path, location.line, location.column)?;
        if !(cursor.is_declaration() || cursor.is_reference() || cursor.is_expression()) {
            return None;
        }
        let referenced = cursor.referenced();
        if referenced.is_null() {
            return None;
        }
        Some(referenced)
    }
}

impl Drop for SourceIndex {
    fn drop(&mut self) {
        self.remove_all_translation_units();
        if let (Some(api), Some(index)) = (&self.api, self.index.take()) {
            api.dispose_index(index);
        }
    }
}
