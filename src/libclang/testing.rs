//! In-memory stand-in for the foreign library
//!
//! `FakeLibclang` implements `LibclangApi` without any shared object behind
//! it. Handles are unique non-null pointers minted from a counter; strings
//! come back empty except the version banner. Tests use the call counters to
//! assert lifecycle invariants (every parse disposed exactly once, reparse
//! instead of rebuild on unchanged args) and flip the failure switches to
//! exercise fallback paths.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::sync::atomic::{AtomicBool, AtomicIsize, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::libclang::api::{LibclangApi, PhysicalLocation};
use crate::libclang::ffi::{
    CXCodeCompleteResults, CXCompletionResult, CXCompletionString, CXCursor, CXDiagnostic,
    CXDiagnosticSet, CXFile, CXIndex, CXSourceLocation, CXSourceRange, CXString, CXToken,
    CXTranslationUnit, CXUnsavedFile,
};

fn null_location() -> CXSourceLocation {
    CXSourceLocation {
        ptr_data: [std::ptr::null(); 2],
        int_data: 0,
    }
}

fn null_range() -> CXSourceRange {
    CXSourceRange {
        ptr_data: [std::ptr::null(); 2],
        begin_int_data: 0,
        end_int_data: 0,
    }
}

fn null_cursor() -> CXCursor {
    CXCursor {
        kind: 0,
        xdata: 0,
        data: [std::ptr::null(); 3],
    }
}

fn null_string() -> CXString {
    CXString {
        data: std::ptr::null(),
        private_flags: 0,
    }
}

pub struct FakeLibclang {
    version_banner: CString,
    next_handle: AtomicUsize,

    pub indexes_created: AtomicUsize,
    pub indexes_disposed: AtomicUsize,
    pub parses: AtomicUsize,
    pub reparses: AtomicUsize,
    pub tu_disposals: AtomicUsize,
    pub saves: AtomicUsize,
    pub completions: AtomicUsize,
    /// Allocated minus disposed completion result sets; zero when balanced.
    pub completions_live: AtomicIsize,

    pub fail_parse: AtomicBool,
    pub fail_reparse: AtomicBool,
    pub fail_save: AtomicBool,

    /// Arguments seen by the most recent parse call.
    pub last_parse_args: Mutex<Vec<String>>,
    /// Unsaved-file names seen by the most recent parse/reparse/completion.
    pub last_unsaved_names: Mutex<Vec<String>>,
    /// Paths handed to `save_translation_unit`, in call order.
    pub saved_paths: Mutex<Vec<String>>,
}

impl FakeLibclang {
    pub fn new(version_banner: &str) -> Self {
        Self {
            // fake constructor, panicking on an interior NUL is fine
            version_banner: CString::new(version_banner).unwrap(),
            next_handle: AtomicUsize::new(0x1000),
            indexes_created: AtomicUsize::new(0),
            indexes_disposed: AtomicUsize::new(0),
            parses: AtomicUsize::new(0),
            reparses: AtomicUsize::new(0),
            tu_disposals: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
            completions: AtomicUsize::new(0),
            completions_live: AtomicIsize::new(0),
            fail_parse: AtomicBool::new(false),
            fail_reparse: AtomicBool::new(false),
            fail_save: AtomicBool::new(false),
            last_parse_args: Mutex::new(Vec::new()),
            last_unsaved_names: Mutex::new(Vec::new()),
            saved_paths: Mutex::new(Vec::new()),
        }
    }

    fn mint_handle(&self) -> *mut c_void {
        self.next_handle.fetch_add(16, Ordering::SeqCst) as *mut c_void
    }

    fn record_unsaved(&self, unsaved_files: &[CXUnsavedFile]) {
        let names = unsaved_files
            .iter()
            .map(|u| {
                unsafe { CStr::from_ptr(u.filename) }
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        *self.last_unsaved_names.lock().unwrap() = names;
    }

    pub fn parses(&self) -> usize {
        self.parses.load(Ordering::SeqCst)
    }

    pub fn reparses(&self) -> usize {
        self.reparses.load(Ordering::SeqCst)
    }

    pub fn tu_disposals(&self) -> usize {
        self.tu_disposals.load(Ordering::SeqCst)
    }
}

impl LibclangApi for FakeLibclang {
    fn get_cstring(&self, string: CXString) -> *const c_char {
        string.data as *const c_char
    }

    fn dispose_string(&self, _string: CXString) {}

    fn create_index(&self, _exclude_decls_from_pch: i32, _display_diagnostics: i32) -> CXIndex {
        self.indexes_created.fetch_add(1, Ordering::SeqCst);
        self.mint_handle()
    }

    fn dispose_index(&self, _index: CXIndex) {
        self.indexes_disposed.fetch_add(1, Ordering::SeqCst);
    }

    fn index_set_global_options(&self, _index: CXIndex, _options: u32) {}

    fn index_get_global_options(&self, _index: CXIndex) -> u32 {
        0
    }

    fn get_file(&self, _tu: CXTranslationUnit, _file_name: &CStr) -> CXFile {
        self.mint_handle()
    }

    fn get_file_name(&self, _file: CXFile) -> CXString {
        null_string()
    }

    fn get_file_time(&self, _file: CXFile) -> i64 {
        0
    }

    fn get_null_location(&self) -> CXSourceLocation {
        null_location()
    }

    fn equal_locations(&self, lhs: CXSourceLocation, rhs: CXSourceLocation) -> bool {
        lhs.ptr_data[0] == rhs.ptr_data[0] && lhs.int_data == rhs.int_data
    }

    fn get_location(
        &self,
        _tu: CXTranslationUnit,
        file: CXFile,
        line: u32,
        column: u32,
    ) -> CXSourceLocation {
        CXSourceLocation {
            ptr_data: [file as *const c_void, std::ptr::null()],
            int_data: line * 1000 + column,
        }
    }

    fn get_location_for_offset(
        &self,
        _tu: CXTranslationUnit,
        file: CXFile,
        offset: u32,
    ) -> CXSourceLocation {
        CXSourceLocation {
            ptr_data: [file as *const c_void, std::ptr::null()],
            int_data: offset,
        }
    }

    fn get_expansion_location(&self, location: CXSourceLocation) -> PhysicalLocation {
        PhysicalLocation {
            file: location.ptr_data[0] as *mut c_void,
            line: location.int_data / 1000,
            column: location.int_data % 1000,
            offset: location.int_data,
        }
    }

    fn get_spelling_location(&self, location: CXSourceLocation) -> PhysicalLocation {
        self.get_expansion_location(location)
    }

    fn location_is_from_main_file(&self, _location: CXSourceLocation) -> bool {
        true
    }

    fn location_is_in_system_header(&self, _location: CXSourceLocation) -> bool {
        false
    }

    fn get_null_range(&self) -> CXSourceRange {
        null_range()
    }

    fn get_range(&self, begin: CXSourceLocation, end: CXSourceLocation) -> CXSourceRange {
        CXSourceRange {
            ptr_data: [begin.ptr_data[0], std::ptr::null()],
            begin_int_data: begin.int_data,
            end_int_data: end.int_data,
        }
    }

    fn equal_ranges(&self, lhs: CXSourceRange, rhs: CXSourceRange) -> bool {
        lhs.begin_int_data == rhs.begin_int_data && lhs.end_int_data == rhs.end_int_data
    }

    fn range_is_null(&self, range: CXSourceRange) -> bool {
        range.ptr_data[0].is_null() && range.begin_int_data == 0 && range.end_int_data == 0
    }

    fn get_range_start(&self, range: CXSourceRange) -> CXSourceLocation {
        CXSourceLocation {
            ptr_data: [range.ptr_data[0], std::ptr::null()],
            int_data: range.begin_int_data,
        }
    }

    fn get_range_end(&self, range: CXSourceRange) -> CXSourceLocation {
        CXSourceLocation {
            ptr_data: [range.ptr_data[0], std::ptr::null()],
            int_data: range.end_int_data,
        }
    }

    fn parse_translation_unit(
        &self,
        _index: CXIndex,
        _source_filename: &CStr,
        args: &[*const c_char],
        unsaved_files: &[CXUnsavedFile],
        _options: u32,
    ) -> CXTranslationUnit {
        self.parses.fetch_add(1, Ordering::SeqCst);
        *self.last_parse_args.lock().unwrap() = args
            .iter()
            .map(|&a| unsafe { CStr::from_ptr(a) }.to_string_lossy().into_owned())
            .collect();
        self.record_unsaved(unsaved_files);
        if self.fail_parse.load(Ordering::SeqCst) {
            return std::ptr::null_mut();
        }
        self.mint_handle()
    }

    fn reparse_translation_unit(
        &self,
        _tu: CXTranslationUnit,
        unsaved_files: &[CXUnsavedFile],
        _options: u32,
    ) -> i32 {
        self.reparses.fetch_add(1, Ordering::SeqCst);
        self.record_unsaved(unsaved_files);
        if self.fail_reparse.load(Ordering::SeqCst) {
            1
        } else {
            0
        }
    }

    fn dispose_translation_unit(&self, _tu: CXTranslationUnit) {
        self.tu_disposals.fetch_add(1, Ordering::SeqCst);
    }

    fn default_editing_translation_unit_options(&self) -> u32 {
        0
    }

    fn default_reparse_options(&self, _tu: CXTranslationUnit) -> u32 {
        0
    }

    fn default_save_options(&self, _tu: CXTranslationUnit) -> u32 {
        0
    }

    fn save_translation_unit(&self, _tu: CXTranslationUnit, file_name: &CStr, _options: u32) -> i32 {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.saved_paths
            .lock()
            .unwrap()
            .push(file_name.to_string_lossy().into_owned());
        if self.fail_save.load(Ordering::SeqCst) {
            1
        } else {
            0
        }
    }

    fn get_translation_unit_spelling(&self, _tu: CXTranslationUnit) -> CXString {
        null_string()
    }

    fn get_translation_unit_cursor(&self, tu: CXTranslationUnit) -> CXCursor {
        CXCursor {
            kind: 350, // CXCursor_TranslationUnit
            xdata: 0,
            data: [tu as *const c_void, std::ptr::null(), std::ptr::null()],
        }
    }

    fn get_num_diagnostics(&self, _tu: CXTranslationUnit) -> u32 {
        0
    }

    fn get_diagnostic(&self, _tu: CXTranslationUnit, _index: u32) -> CXDiagnostic {
        std::ptr::null_mut()
    }

    fn dispose_diagnostic(&self, _diagnostic: CXDiagnostic) {}

    fn format_diagnostic(&self, _diagnostic: CXDiagnostic, _options: u32) -> CXString {
        null_string()
    }

    fn default_diagnostic_display_options(&self) -> u32 {
        0
    }

    fn get_diagnostic_severity(&self, _diagnostic: CXDiagnostic) -> i32 {
        0
    }

    fn get_diagnostic_location(&self, _diagnostic: CXDiagnostic) -> CXSourceLocation {
        null_location()
    }

    fn get_diagnostic_spelling(&self, _diagnostic: CXDiagnostic) -> CXString {
        null_string()
    }

    fn get_diagnostic_category_text(&self, _diagnostic: CXDiagnostic) -> CXString {
        null_string()
    }

    fn get_diagnostic_num_ranges(&self, _diagnostic: CXDiagnostic) -> u32 {
        0
    }

    fn get_diagnostic_range(&self, _diagnostic: CXDiagnostic, _index: u32) -> CXSourceRange {
        null_range()
    }

    fn get_diagnostic_num_fixits(&self, _diagnostic: CXDiagnostic) -> u32 {
        0
    }

    fn get_diagnostic_fixit(
        &self,
        _diagnostic: CXDiagnostic,
        _index: u32,
        _replacement_range: &mut CXSourceRange,
    ) -> CXString {
        null_string()
    }

    fn get_child_diagnostics(&self, _diagnostic: CXDiagnostic) -> CXDiagnosticSet {
        std::ptr::null_mut()
    }

    fn get_num_diagnostics_in_set(&self, _set: CXDiagnosticSet) -> u32 {
        0
    }

    fn get_diagnostic_in_set(&self, _set: CXDiagnosticSet, _index: u32) -> CXDiagnostic {
        std::ptr::null_mut()
    }

    fn dispose_diagnostic_set(&self, _set: CXDiagnosticSet) {}

    fn get_null_cursor(&self) -> CXCursor {
        null_cursor()
    }

    fn get_cursor(&self, _tu: CXTranslationUnit, location: CXSourceLocation) -> CXCursor {
        CXCursor {
            kind: 101, // CXCursor_DeclRefExpr
            xdata: 0,
            data: [location.ptr_data[0], std::ptr::null(), std::ptr::null()],
        }
    }

    fn cursor_is_null(&self, cursor: CXCursor) -> bool {
        cursor.data[0].is_null()
    }

    fn equal_cursors(&self, lhs: CXCursor, rhs: CXCursor) -> bool {
        lhs.kind == rhs.kind && lhs.data[0] == rhs.data[0]
    }

    fn hash_cursor(&self, cursor: CXCursor) -> u32 {
        cursor.data[0] as usize as u32
    }

    fn get_cursor_kind(&self, cursor: CXCursor) -> i32 {
        cursor.kind
    }

    fn is_declaration(&self, kind: i32) -> bool {
        (1..=39).contains(&kind)
    }

    fn is_reference(&self, kind: i32) -> bool {
        (40..=49).contains(&kind)
    }

    fn is_expression(&self, kind: i32) -> bool {
        (100..=199).contains(&kind)
    }

    fn is_invalid(&self, kind: i32) -> bool {
        (70..=73).contains(&kind)
    }

    fn get_cursor_kind_spelling(&self, _kind: i32) -> CXString {
        null_string()
    }

    fn get_cursor_location(&self, cursor: CXCursor) -> CXSourceLocation {
        CXSourceLocation {
            ptr_data: [cursor.data[0], std::ptr::null()],
            int_data: 0,
        }
    }

    fn get_cursor_extent(&self, cursor: CXCursor) -> CXSourceRange {
        CXSourceRange {
            ptr_data: [cursor.data[0], std::ptr::null()],
            begin_int_data: 0,
            end_int_data: 0,
        }
    }

    fn get_cursor_spelling(&self, _cursor: CXCursor) -> CXString {
        null_string()
    }

    fn get_cursor_display_name(&self, _cursor: CXCursor) -> CXString {
        null_string()
    }

    fn get_cursor_usr(&self, _cursor: CXCursor) -> CXString {
        null_string()
    }

    fn get_cursor_referenced(&self, cursor: CXCursor) -> CXCursor {
        CXCursor {
            kind: 8, // CXCursor_FunctionDecl
            xdata: 0,
            data: cursor.data,
        }
    }

    fn get_cursor_definition(&self, cursor: CXCursor) -> CXCursor {
        cursor
    }

    fn is_cursor_definition(&self, _cursor: CXCursor) -> bool {
        false
    }

    fn get_canonical_cursor(&self, cursor: CXCursor) -> CXCursor {
        cursor
    }

    fn tokenize(&self, _tu: CXTranslationUnit, _range: CXSourceRange) -> (*mut CXToken, u32) {
        (std::ptr::null_mut(), 0)
    }

    fn annotate_tokens(
        &self,
        _tu: CXTranslationUnit,
        _tokens: &[CXToken],
        _cursors: &mut [CXCursor],
    ) {
    }

    fn dispose_tokens(&self, _tu: CXTranslationUnit, _tokens: *mut CXToken, _num_tokens: u32) {}

    fn get_token_kind(&self, token: CXToken) -> i32 {
        token.int_data[0] as i32
    }

    fn get_token_spelling(&self, _tu: CXTranslationUnit, _token: CXToken) -> CXString {
        null_string()
    }

    fn get_token_location(&self, _tu: CXTranslationUnit, _token: CXToken) -> CXSourceLocation {
        null_location()
    }

    fn get_token_extent(&self, _tu: CXTranslationUnit, _token: CXToken) -> CXSourceRange {
        null_range()
    }

    fn code_complete_at(
        &self,
        _tu: CXTranslationUnit,
        _complete_filename: &CStr,
        _line: u32,
        _column: u32,
        unsaved_files: &[CXUnsavedFile],
        _options: u32,
    ) -> *mut CXCodeCompleteResults {
        self.completions.fetch_add(1, Ordering::SeqCst);
        self.record_unsaved(unsaved_files);
        self.completions_live.fetch_add(1, Ordering::SeqCst);
        Box::into_raw(Box::new(CXCodeCompleteResults {
            results: std::ptr::null_mut(),
            num_results: 0,
        }))
    }

    fn default_code_complete_options(&self) -> u32 {
        0
    }

    fn sort_code_completion_results(&self, _results: *mut CXCompletionResult, _num_results: u32) {}

    fn dispose_code_complete_results(&self, results: *mut CXCodeCompleteResults) {
        self.completions_live.fetch_sub(1, Ordering::SeqCst);
        if !results.is_null() {
            drop(unsafe { Box::from_raw(results) });
        }
    }

    fn code_complete_get_num_diagnostics(&self, _results: *mut CXCodeCompleteResults) -> u32 {
        0
    }

    fn code_complete_get_diagnostic(
        &self,
        _results: *mut CXCodeCompleteResults,
        _index: u32,
    ) -> CXDiagnostic {
        std::ptr::null_mut()
    }

    fn get_num_completion_chunks(&self, _completion_string: CXCompletionString) -> u32 {
        0
    }

    fn get_completion_chunk_kind(
        &self,
        _completion_string: CXCompletionString,
        _chunk: u32,
    ) -> i32 {
        0
    }

    fn get_completion_chunk_text(
        &self,
        _completion_string: CXCompletionString,
        _chunk: u32,
    ) -> CXString {
        null_string()
    }

    fn get_completion_priority(&self, _completion_string: CXCompletionString) -> u32 {
        0
    }

    fn get_completion_availability(&self, _completion_string: CXCompletionString) -> i32 {
        0
    }

    fn get_completion_brief_comment(&self, _completion_string: CXCompletionString) -> CXString {
        null_string()
    }

    fn get_clang_version(&self) -> CXString {
        CXString {
            data: self.version_banner.as_ptr() as *const c_void,
            private_flags: 0,
        }
    }

    fn toggle_crash_recovery(&self, _enabled: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libclang::string::owned_string;

    #[test]
    fn test_version_banner_round_trips() {
        let fake = FakeLibclang::new("clang version 14.0.6");
        let banner = owned_string(&fake, fake.get_clang_version());
        assert_eq!(banner, "clang version 14.0.6");
    }

    #[test]
    fn test_handles_are_unique_and_non_null() {
        let fake = FakeLibclang::new("clang version 14.0.6");
        let a = fake.create_index(0, 0);
        let b = fake.create_index(0, 0);
        assert!(!a.is_null());
        assert!(!b.is_null());
        assert_ne!(a, b);
        assert_eq!(fake.indexes_created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_completion_results_balance() {
        let fake = FakeLibclang::new("clang version 14.0.6");
        let tu = fake.mint_handle();
        let file = CString::new("test.cpp").unwrap();
        let results = fake.code_complete_at(tu, &file, 1, 1, &[], 0);
        assert!(!results.is_null());
        assert_eq!(fake.completions_live.load(Ordering::SeqCst), 1);
        fake.dispose_code_complete_results(results);
        assert_eq!(fake.completions_live.load(Ordering::SeqCst), 0);
    }
}
