//! Translation unit facade
//!
//! A non-owning view over a cached translation-unit handle. The cache in
//! `source_index.rs` is the only disposer; facades handed to callers are
//! valid until the cache entry is removed or rebuilt, which the
//! single-threaded session model guarantees does not happen mid-query.
//!
//! The empty facade stands in whenever there is nothing to query (library
//! unavailable, parse failed) so callers see "no results" instead of errors.

use std::ffi::CString;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::libclang::api::LibclangApi;
use crate::libclang::ffi::{
    CXTranslationUnit, CODE_COMPLETE_INCLUDE_BRIEF_COMMENTS, CODE_COMPLETE_INCLUDE_MACROS,
};
use crate::libclang::string::owned_string;

use super::completion::CodeCompleteResults;
use super::cursor::Cursor;
use super::diagnostic::Diagnostic;
use super::location::{location_in_unit, SourceLocation, SourceRange};
use super::token::TokenSet;
use super::unsaved_files::UnsavedFilesSnapshot;

#[derive(Clone)]
pub struct TranslationUnit {
    inner: Option<TuInner>,
}

#[derive(Clone)]
struct TuInner {
    api: Arc<dyn LibclangApi>,
    raw: CXTranslationUnit,
}

impl TranslationUnit {
    pub(crate) fn new(api: Arc<dyn LibclangApi>, raw: CXTranslationUnit) -> Self {
        debug_assert!(!raw.is_null());
        Self {
            inner: Some(TuInner { api, raw }),
        }
    }

    /// The "no translation unit available" facade.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    pub fn spelling(&self) -> String {
        match &self.inner {
            Some(inner) => owned_string(
                inner.api.as_ref(),
                inner.api.get_translation_unit_spelling(inner.raw),
            ),
            None => String::new(),
        }
    }

    /// The root cursor covering the whole translation unit.
    pub fn cursor(&self) -> Option<Cursor> {
        let inner = self.inner.as_ref()?;
        Some(Cursor::new(
            Arc::clone(&inner.api),
            inner.api.get_translation_unit_cursor(inner.raw),
        ))
    }

    pub fn num_diagnostics(&self) -> u32 {
        match &self.inner {
            Some(inner) => inner.api.get_num_diagnostics(inner.raw),
            None => 0,
        }
    }

    /// `index` must come from `num_diagnostics`.
    pub fn diagnostic(&self, index: u32) -> Option<Diagnostic> {
        let inner = self.inner.as_ref()?;
        let raw = inner.api.get_diagnostic(inner.raw, index);
        if raw.is_null() {
            return None;
        }
        Some(Diagnostic::new(Arc::clone(&inner.api), raw))
    }

    /// Resolve (file, line, column) within this unit. `None` when the file
    /// is not part of the unit's include closure.
    pub fn source_location(&self, path: &Path, line: u32, column: u32) -> Option<SourceLocation> {
        let inner = self.inner.as_ref()?;
        let file_name = CString::new(path.to_string_lossy().as_bytes()).ok()?;
        location_in_unit(&inner.api, inner.raw, &file_name, line, column)
    }

    /// The AST node at (file, line, column), if any.
    pub fn cursor_at(&self, path: &Path, line: u32, column: u32) -> Option<Cursor> {
        let inner = self.inner.as_ref()?;
        let location = self.source_location(path, line, column)?;
        let cursor = Cursor::new(
            Arc::clone(&inner.api),
            inner.api.get_cursor(inner.raw, location.raw()),
        );
        if cursor.is_null() {
            return None;
        }
        Some(cursor)
    }

    pub fn tokens(&self, range: &SourceRange) -> Option<TokenSet> {
        let inner = self.inner.as_ref()?;
        Some(TokenSet::tokenize(
            Arc::clone(&inner.api),
            inner.raw,
            range.raw(),
        ))
    }

    /// Run code completion at (file, line, column) with the given overlay
    /// snapshot. Always returns a result set; failures come back empty.
    pub fn code_complete_at(
        &self,
        path: &Path,
        line: u32,
        column: u32,
        unsaved: &UnsavedFilesSnapshot,
    ) -> CodeCompleteResults {
        let Some(inner) = self.inner.as_ref() else {
            return CodeCompleteResults::empty();
        };
        let Ok(file_name) = CString::new(path.to_string_lossy().as_bytes()) else {
            return CodeCompleteResults::empty();
        };

        let options = inner.api.default_code_complete_options()
            | CODE_COMPLETE_INCLUDE_MACROS
            | CODE_COMPLETE_INCLUDE_BRIEF_COMMENTS;
        let raw = inner.api.code_complete_at(
            inner.raw,
            &file_name,
            line,
            column,
            unsaved.as_slice(),
            options,
        );
        if raw.is_null() {
            debug!(
                "Code completion returned no results for {}:{}:{}",
                path.display(),
                line,
                column
            );
            return CodeCompleteResults::empty();
        }
        CodeCompleteResults::new(Arc::clone(&inner.api), raw)
    }

    pub(crate) fn raw(&self) -> Option<CXTranslationUnit> {
        self.inner.as_ref().map(|inner| inner.raw)
    }
}

impl std::fmt::Debug for TranslationUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationUnit")
            .field("empty", &self.is_empty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::unsaved_files::UnsavedFiles;
    use crate::libclang::testing::FakeLibclang;

    #[test]
    fn test_empty_unit_yields_nothing() {
        let tu = TranslationUnit::empty();
        assert!(tu.is_empty());
        assert_eq!(tu.spelling(), "");
        assert!(tu.cursor().is_none());
        assert_eq!(tu.num_diagnostics(), 0);
        assert!(tu.cursor_at(Path::new("/a.cpp"), 1, 1).is_none());
        let results =
            tu.code_complete_at(Path::new("/a.cpp"), 1, 1, &UnsavedFiles::new().snapshot());
        assert!(results.is_empty());
    }

    #[test]
    fn test_cursor_at_resolves_through_library() {
        let api: Arc<dyn LibclangApi> = Arc::new(FakeLibclang::new("clang version 14.0.6"));
        let tu = TranslationUnit::new(Arc::clone(&api), 0x1000 as *mut _);
        let cursor = tu.cursor_at(Path::new("/src/a.cpp"), 3, 7);
        assert!(cursor.is_some());
    }

    #[test]
    fn test_completion_passes_overlay() {
        let fake = Arc::new(FakeLibclang::new("clang version 14.0.6"));
        let api: Arc<dyn LibclangApi> = fake.clone();
        let tu = TranslationUnit::new(Arc::clone(&api), 0x1000 as *mut _);

        let overlay = UnsavedFiles::new();
        overlay.update("doc1", Path::new("/src/a.cpp"), "int main() {}", true);
        let results = tu.code_complete_at(Path::new("/src/a.cpp"), 1, 1, &overlay.snapshot());
        drop(results);

        let names = fake.last_unsaved_names.lock().unwrap();
        assert_eq!(names.as_slice(), ["/src/a.cpp"]);
    }
}
