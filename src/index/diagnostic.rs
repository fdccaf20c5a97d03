//! Diagnostic facades
//!
//! `Diagnostic` and `DiagnosticSet` own their foreign handle exclusively and
//! release it exactly once in `Drop`. Neither is `Clone`: a copy would mean
//! a double dispose against the foreign library.

use std::sync::Arc;

use crate::libclang::api::LibclangApi;
use crate::libclang::ffi::{CXDiagnostic, CXDiagnosticSet, DiagnosticSeverity};
use crate::libclang::string::owned_string;

use super::location::{SourceLocation, SourceRange};

/// One replacement suggested by the compiler.
#[derive(Debug, Clone)]
pub struct FixIt {
    pub replacement: String,
    pub range: SourceRange,
}

pub struct Diagnostic {
    api: Arc<dyn LibclangApi>,
    raw: CXDiagnostic,
}

impl Diagnostic {
    /// Takes ownership of `raw`; the facade becomes its single disposer.
    pub(crate) fn new(api: Arc<dyn LibclangApi>, raw: CXDiagnostic) -> Self {
        Self { api, raw }
    }

    pub fn severity(&self) -> DiagnosticSeverity {
        DiagnosticSeverity::from_raw(self.api.get_diagnostic_severity(self.raw))
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(
            Arc::clone(&self.api),
            self.api.get_diagnostic_location(self.raw),
        )
    }

    pub fn spelling(&self) -> String {
        owned_string(
            self.api.as_ref(),
            self.api.get_diagnostic_spelling(self.raw),
        )
    }

    pub fn category(&self) -> String {
        owned_string(
            self.api.as_ref(),
            self.api.get_diagnostic_category_text(self.raw),
        )
    }

    /// Render the diagnostic the way the compiler would print it.
    pub fn format(&self) -> String {
        let options = self.api.default_diagnostic_display_options();
        owned_string(
            self.api.as_ref(),
            self.api.format_diagnostic(self.raw, options),
        )
    }

    pub fn num_ranges(&self) -> u32 {
        self.api.get_diagnostic_num_ranges(self.raw)
    }

    /// `index` must come from `num_ranges`; out-of-range indexes are
    /// undefined behavior in the foreign library.
    pub fn range(&self, index: u32) -> SourceRange {
        SourceRange::new(
            Arc::clone(&self.api),
            self.api.get_diagnostic_range(self.raw, index),
        )
    }

    pub fn num_fixits(&self) -> u32 {
        self.api.get_diagnostic_num_fixits(self.raw)
    }

    pub fn fixit(&self, index: u32) -> FixIt {
        let mut replacement_range = self.api.get_null_range();
        let replacement = owned_string(
            self.api.as_ref(),
            self.api
                .get_diagnostic_fixit(self.raw, index, &mut replacement_range),
        );
        FixIt {
            replacement,
            range: SourceRange::new(Arc::clone(&self.api), replacement_range),
        }
    }

    /// Child notes attached to this diagnostic.
    pub fn children(&self) -> DiagnosticSet {
        DiagnosticSet::new(
            Arc::clone(&self.api),
            self.api.get_child_diagnostics(self.raw),
        )
    }
}

impl Drop for Diagnostic {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            self.api.dispose_diagnostic(self.raw);
        }
    }
}

impl std::fmt::Debug for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostic")
            .field("severity", &self.severity())
            .field("spelling", &self.spelling())
            .finish()
    }
}

pub struct DiagnosticSet {
    api: Arc<dyn LibclangApi>,
    raw: CXDiagnosticSet,
}

impl DiagnosticSet {
    pub(crate) fn new(api: Arc<dyn LibclangApi>, raw: CXDiagnosticSet) -> Self {
        Self { api, raw }
    }

    pub fn len(&self) -> u32 {
        if self.raw.is_null() {
            return 0;
        }
        self.api.get_num_diagnostics_in_set(self.raw)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `index` must come from `len`.
    pub fn diagnostic(&self, index: u32) -> Diagnostic {
        Diagnostic::new(
            Arc::clone(&self.api),
            self.api.get_diagnostic_in_set(self.raw, index),
        )
    }
}

impl Drop for DiagnosticSet {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            self.api.dispose_diagnostic_set(self.raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libclang::testing::FakeLibclang;

    #[test]
    fn test_null_set_is_empty() {
        let api: Arc<dyn LibclangApi> = Arc::new(FakeLibclang::new("clang version 14.0.6"));
        let set = DiagnosticSet::new(api, std::ptr::null_mut());
        assert!(set.is_empty());
        // drop of a null set must not call into the library
    }
}
