//! The foreign libclang API as a trait
//!
//! One method per required entry point, grouped the way `clang-c/Index.h`
//! groups them. The production implementation is the dynamic-load adapter in
//! `dynamic.rs`; tests substitute an in-memory fake. Methods add no error
//! handling of their own: foreign failure surfaces as the library's sentinel
//! values (null handles, non-zero status codes) and it is each query facade's
//! job to translate those.
//!
//! Handle arguments must come from the same implementation instance that
//! produced them; mixing handles across instances is undefined behavior in
//! the foreign library.

use std::ffi::CStr;
use std::os::raw::c_char;

use crate::libclang::ffi::{
    CXCodeCompleteResults, CXCompletionResult, CXCompletionString, CXCursor, CXDiagnostic,
    CXDiagnosticSet, CXFile, CXIndex, CXSourceLocation, CXSourceRange, CXString, CXToken,
    CXTranslationUnit, CXUnsavedFile,
};

/// Location decomposed into its file/line/column/offset parts.
#[derive(Debug, Clone, Copy)]
pub struct PhysicalLocation {
    pub file: CXFile,
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

pub trait LibclangApi: Send + Sync {
    // ------------------------------------------------------------------
    // strings
    // ------------------------------------------------------------------
    fn get_cstring(&self, string: CXString) -> *const c_char;
    fn dispose_string(&self, string: CXString);

    // ------------------------------------------------------------------
    // indexes
    // ------------------------------------------------------------------
    fn create_index(&self, exclude_decls_from_pch: i32, display_diagnostics: i32) -> CXIndex;
    fn dispose_index(&self, index: CXIndex);
    fn index_set_global_options(&self, index: CXIndex, options: u32);
    fn index_get_global_options(&self, index: CXIndex) -> u32;

    // ------------------------------------------------------------------
    // files
    // ------------------------------------------------------------------
    fn get_file(&self, tu: CXTranslationUnit, file_name: &CStr) -> CXFile;
    fn get_file_name(&self, file: CXFile) -> CXString;
    fn get_file_time(&self, file: CXFile) -> i64;

    // ------------------------------------------------------------------
    // source locations and ranges
    // ------------------------------------------------------------------
    fn get_null_location(&self) -> CXSourceLocation;
    fn equal_locations(&self, lhs: CXSourceLocation, rhs: CXSourceLocation) -> bool;
    fn get_location(
        &self,
        tu: CXTranslationUnit,
        file: CXFile,
        line: u32,
        column: u32,
    ) -> CXSourceLocation;
    fn get_location_for_offset(
        &self,
        tu: CXTranslationUnit,
        file: CXFile,
        offset: u32,
    ) -> CXSourceLocation;
    /// Macro-expansion site of the location. Implementations fall back to
    /// the older instantiation-location entry point where the expansion
    /// variant is not exported.
    fn get_expansion_location(&self, location: CXSourceLocation) -> PhysicalLocation;
    fn get_spelling_location(&self, location: CXSourceLocation) -> PhysicalLocation;
    fn location_is_from_main_file(&self, location: CXSourceLocation) -> bool;
    fn location_is_in_system_header(&self, location: CXSourceLocation) -> bool;

    fn get_null_range(&self) -> CXSourceRange;
    fn get_range(&self, begin: CXSourceLocation, end: CXSourceLocation) -> CXSourceRange;
    fn equal_ranges(&self, lhs: CXSourceRange, rhs: CXSourceRange) -> bool;
    fn range_is_null(&self, range: CXSourceRange) -> bool;
    fn get_range_start(&self, range: CXSourceRange) -> CXSourceLocation;
    fn get_range_end(&self, range: CXSourceRange) -> CXSourceLocation;

    // ------------------------------------------------------------------
    // translation units
    // ------------------------------------------------------------------
    fn parse_translation_unit(
        &self,
        index: CXIndex,
        source_filename: &CStr,
        args: &[*const c_char],
        unsaved_files: &[CXUnsavedFile],
        options: u32,
    ) -> CXTranslationUnit;
    /// Returns the foreign status code; zero means success.
    fn reparse_translation_unit(
        &self,
        tu: CXTranslationUnit,
        unsaved_files: &[CXUnsavedFile],
        options: u32,
    ) -> i32;
    fn dispose_translation_unit(&self, tu: CXTranslationUnit);
    fn default_editing_translation_unit_options(&self) -> u32;
    fn default_reparse_options(&self, tu: CXTranslationUnit) -> u32;
    fn default_save_options(&self, tu: CXTranslationUnit) -> u32;
    fn save_translation_unit(&self, tu: CXTranslationUnit, file_name: &CStr, options: u32) -> i32;
    fn get_translation_unit_spelling(&self, tu: CXTranslationUnit) -> CXString;
    fn get_translation_unit_cursor(&self, tu: CXTranslationUnit) -> CXCursor;

    // ------------------------------------------------------------------
    // diagnostics
    // ------------------------------------------------------------------
    fn get_num_diagnostics(&self, tu: CXTranslationUnit) -> u32;
    fn get_diagnostic(&self, tu: CXTranslationUnit, index: u32) -> CXDiagnostic;
    fn dispose_diagnostic(&self, diagnostic: CXDiagnostic);
    fn format_diagnostic(&self, diagnostic: CXDiagnostic, options: u32) -> CXString;
    fn default_diagnostic_display_options(&self) -> u32;
    fn get_diagnostic_severity(&self, diagnostic: CXDiagnostic) -> i32;
    fn get_diagnostic_location(&self, diagnostic: CXDiagnostic) -> CXSourceLocation;
    fn get_diagnostic_spelling(&self, diagnostic: CXDiagnostic) -> CXString;
    fn get_diagnostic_category_text(&self, diagnostic: CXDiagnostic) -> CXString;
    fn get_diagnostic_num_ranges(&self, diagnostic: CXDiagnostic) -> u32;
    fn get_diagnostic_range(&self, diagnostic: CXDiagnostic, index: u32) -> CXSourceRange;
    fn get_diagnostic_num_fixits(&self, diagnostic: CXDiagnostic) -> u32;
    fn get_diagnostic_fixit(
        &self,
        diagnostic: CXDiagnostic,
        index: u32,
        replacement_range: &mut CXSourceRange,
    ) -> CXString;
    fn get_child_diagnostics(&self, diagnostic: CXDiagnostic) -> CXDiagnosticSet;
    fn get_num_diagnostics_in_set(&self, set: CXDiagnosticSet) -> u32;
    fn get_diagnostic_in_set(&self, set: CXDiagnosticSet, index: u32) -> CXDiagnostic;
    fn dispose_diagnostic_set(&self, set: CXDiagnosticSet);

    // ------------------------------------------------------------------
    // cursors
    // ------------------------------------------------------------------
    fn get_null_cursor(&self) -> CXCursor;
    fn get_cursor(&self, tu: CXTranslationUnit, location: CXSourceLocation) -> CXCursor;
    fn cursor_is_null(&self, cursor: CXCursor) -> bool;
    fn equal_cursors(&self, lhs: CXCursor, rhs: CXCursor) -> bool;
    fn hash_cursor(&self, cursor: CXCursor) -> u32;
    fn get_cursor_kind(&self, cursor: CXCursor) -> i32;
    fn is_declaration(&self, kind: i32) -> bool;
    fn is_reference(&self, kind: i32) -> bool;
    fn is_expression(&self, kind: i32) -> bool;
    fn is_invalid(&self, kind: i32) -> bool;
    fn get_cursor_kind_spelling(&self, kind: i32) -> CXString;
    fn get_cursor_location(&self, cursor: CXCursor) -> CXSourceLocation;
    fn get_cursor_extent(&self, cursor: CXCursor) -> CXSourceRange;
    fn get_cursor_spelling(&self, cursor: CXCursor) -> CXString;
    fn get_cursor_display_name(&self, cursor: CXCursor) -> CXString;
    fn get_cursor_usr(&self, cursor: CXCursor) -> CXString;
    fn get_cursor_referenced(&self, cursor: CXCursor) -> CXCursor;
    fn get_cursor_definition(&self, cursor: CXCursor) -> CXCursor;
    fn is_cursor_definition(&self, cursor: CXCursor) -> bool;
    fn get_canonical_cursor(&self, cursor: CXCursor) -> CXCursor;

    // ------------------------------------------------------------------
    // tokens
    // ------------------------------------------------------------------
    fn tokenize(&self, tu: CXTranslationUnit, range: CXSourceRange) -> (*mut CXToken, u32);
    fn annotate_tokens(&self, tu: CXTranslationUnit, tokens: &[CXToken], cursors: &mut [CXCursor]);
    fn dispose_tokens(&self, tu: CXTranslationUnit, tokens: *mut CXToken, num_tokens: u32);
    fn get_token_kind(&self, token: CXToken) -> i32;
    fn get_token_spelling(&self, tu: CXTranslationUnit, token: CXToken) -> CXString;
    fn get_token_location(&self, tu: CXTranslationUnit, token: CXToken) -> CXSourceLocation;
    fn get_token_extent(&self, tu: CXTranslationUnit, token: CXToken) -> CXSourceRange;

    // ------------------------------------------------------------------
    // code completion
    // ------------------------------------------------------------------
    fn code_complete_at(
        &self,
        tu: CXTranslationUnit,
        complete_filename: &CStr,
        line: u32,
        column: u32,
        unsaved_files: &[CXUnsavedFile],
        options: u32,
    ) -> *mut CXCodeCompleteResults;
    fn default_code_complete_options(&self) -> u32;
    fn sort_code_completion_results(&self, results: *mut CXCompletionResult, num_results: u32);
    fn dispose_code_complete_results(&self, results: *mut CXCodeCompleteResults);
    fn code_complete_get_num_diagnostics(&self, results: *mut CXCodeCompleteResults) -> u32;
    fn code_complete_get_diagnostic(
        &self,
        results: *mut CXCodeCompleteResults,
        index: u32,
    ) -> CXDiagnostic;
    fn get_num_completion_chunks(&self, completion_string: CXCompletionString) -> u32;
    fn get_completion_chunk_kind(&self, completion_string: CXCompletionString, chunk: u32) -> i32;
    fn get_completion_chunk_text(
        &self,
        completion_string: CXCompletionString,
        chunk: u32,
    ) -> CXString;
    fn get_completion_priority(&self, completion_string: CXCompletionString) -> u32;
    fn get_completion_availability(&self, completion_string: CXCompletionString) -> i32;
    fn get_completion_brief_comment(&self, completion_string: CXCompletionString) -> CXString;

    // ------------------------------------------------------------------
    // miscellaneous
    // ------------------------------------------------------------------
    fn get_clang_version(&self) -> CXString;
    fn toggle_crash_recovery(&self, enabled: bool);
}
