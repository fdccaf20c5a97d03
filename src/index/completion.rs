//! Code completion facades
//!
//! `CodeCompleteResults` owns the foreign result set and disposes it exactly
//! once in `Drop`; it cannot be cloned. The empty variant (no translation
//! unit, completion failed, library unavailable) carries no handle and is
//! what every degraded path returns.

use std::sync::Arc;

use crate::libclang::api::LibclangApi;
use crate::libclang::ffi::{
    Availability, CXCodeCompleteResults, CXCompletionString, CompletionChunkKind,
};
use crate::libclang::string::owned_string;

use super::diagnostic::Diagnostic;

pub struct CodeCompleteResults {
    inner: Option<ResultsInner>,
}

struct ResultsInner {
    api: Arc<dyn LibclangApi>,
    raw: *mut CXCodeCompleteResults,
}

impl CodeCompleteResults {
    /// Takes ownership of a non-null result set.
    pub(crate) fn new(api: Arc<dyn LibclangApi>, raw: *mut CXCodeCompleteResults) -> Self {
        debug_assert!(!raw.is_null());
        Self {
            inner: Some(ResultsInner { api, raw }),
        }
    }

    /// The "nothing to show" result set.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> u32 {
        match &self.inner {
            Some(inner) => unsafe { (*inner.raw).num_results },
            None => 0,
        }
    }

    /// Sort results in the foreign library's canonical order, in place.
    pub fn sort(&mut self) {
        if let Some(inner) = &self.inner {
            let (results, count) = unsafe { ((*inner.raw).results, (*inner.raw).num_results) };
            inner.api.sort_code_completion_results(results, count);
        }
    }

    /// `index` must come from `len`; the foreign array is not bounds-checked.
    pub fn result(&self, index: u32) -> Option<CodeCompletionResult> {
        let inner = self.inner.as_ref()?;
        if index >= self.len() {
            return None;
        }
        let raw = unsafe { *(*inner.raw).results.add(index as usize) };
        Some(CodeCompletionResult {
            api: Arc::clone(&inner.api),
            cursor_kind: raw.cursor_kind,
            completion_string: raw.completion_string,
        })
    }

    pub fn num_diagnostics(&self) -> u32 {
        match &self.inner {
            Some(inner) => inner.api.code_complete_get_num_diagnostics(inner.raw),
            None => 0,
        }
    }

    pub fn diagnostic(&self, index: u32) -> Option<Diagnostic> {
        let inner = self.inner.as_ref()?;
        let raw = inner.api.code_complete_get_diagnostic(inner.raw, index);
        if raw.is_null() {
            return None;
        }
        Some(Diagnostic::new(Arc::clone(&inner.api), raw))
    }
}

impl Drop for CodeCompleteResults {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.api.dispose_code_complete_results(inner.raw);
        }
    }
}

impl std::fmt::Debug for CodeCompleteResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeCompleteResults")
            .field("len", &self.len())
            .finish()
    }
}

/// One completion candidate.
///
/// The completion string is owned by the parent result set; results are
/// consumed before the set is dropped in all call paths (the session layer
/// copies what it needs out immediately).
pub struct CodeCompletionResult {
    api: Arc<dyn LibclangApi>,
    cursor_kind: i32,
    completion_string: CXCompletionString,
}

impl CodeCompletionResult {
    /// Raw `CXCursorKind` of the completed entity.
    pub fn cursor_kind(&self) -> i32 {
        self.cursor_kind
    }

    pub fn num_chunks(&self) -> u32 {
        self.api.get_num_completion_chunks(self.completion_string)
    }

    pub fn chunk_kind(&self, index: u32) -> CompletionChunkKind {
        CompletionChunkKind::from_raw(
            self.api
                .get_completion_chunk_kind(self.completion_string, index),
        )
    }

    pub fn chunk_text(&self, index: u32) -> String {
        owned_string(
            self.api.as_ref(),
            self.api
                .get_completion_chunk_text(self.completion_string, index),
        )
    }

    /// The text the user would type to select this candidate.
    pub fn typed_text(&self) -> String {
        for index in 0..self.num_chunks() {
            if self.chunk_kind(index) == CompletionChunkKind::TypedText {
                return self.chunk_text(index);
            }
        }
        String::new()
    }

    pub fn priority(&self) -> u32 {
        self.api.get_completion_priority(self.completion_string)
    }

    pub fn availability(&self) -> Availability {
        Availability::from_raw(self.api.get_completion_availability(self.completion_string))
    }

    pub fn brief_comment(&self) -> String {
        owned_string(
            self.api.as_ref(),
            self.api.get_completion_brief_comment(self.completion_string),
        )
    }
}
