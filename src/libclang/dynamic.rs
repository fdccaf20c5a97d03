//! Dynamic-load adapter for libclang
//!
//! Opens a libclang shared library at runtime and resolves every required
//! entry point by name into a typed table. Resolution is all-or-nothing: a
//! single missing symbol fails the candidate and the search moves on, so a
//! constructed adapter always has a complete table. The one exception is
//! `clang_getExpansionLocation`, which older libraries do not export; it is
//! held as an `Option` and falls back to `clang_getInstantiationLocation`.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_uint};
use std::path::{Path, PathBuf};

use libloading::Library;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::libclang::api::{LibclangApi, PhysicalLocation};
use crate::libclang::error::LoadError;
use crate::libclang::ffi::{
    CXCodeCompleteResults, CXCompletionResult, CXCompletionString, CXCursor, CXDiagnostic,
    CXDiagnosticSet, CXFile, CXIndex, CXSourceLocation, CXSourceRange, CXString, CXToken,
    CXTranslationUnit, CXUnsavedFile,
};
use crate::libclang::version::LibraryVersion;

// ============================================================================
// Entry Point Table
// ============================================================================

/// Declares the table of required entry points and its by-name resolver.
///
/// Each entry is `rust_name: "c_symbol": fn(args) -> ret`. The resolved
/// pointers are plain copies; they stay valid for as long as the owning
/// `Library` handle is open, which `DynamicLibclang` guarantees by holding
/// both together.
macro_rules! entry_points {
    ($( $field:ident : $symbol:literal : fn($($arg:ty),*) -> $ret:ty; )+) => {
        struct EntryPoints {
            $( $field: unsafe extern "C" fn($($arg),*) -> $ret, )+
        }

        impl EntryPoints {
            fn resolve(lib: &Library, path: &Path) -> Result<Self, LoadError> {
                unsafe {
                    Ok(Self {
                        $(
                            $field: *lib
                                .get::<unsafe extern "C" fn($($arg),*) -> $ret>(
                                    concat!($symbol, "\0").as_bytes(),
                                )
                                .map_err(|_| LoadError::MissingSymbol {
                                    path: path.to_path_buf(),
                                    symbol: $symbol.to_string(),
                                })?,
                        )+
                    })
                }
            }
        }
    };
}

entry_points! {
    // strings
    get_cstring: "clang_getCString": fn(CXString) -> *const c_char;
    dispose_string: "clang_disposeString": fn(CXString) -> ();

    // indexes
    create_index: "clang_createIndex": fn(c_int, c_int) -> CXIndex;
    dispose_index: "clang_disposeIndex": fn(CXIndex) -> ();
    index_set_global_options: "clang_CXIndex_setGlobalOptions": fn(CXIndex, c_uint) -> ();
    index_get_global_options: "clang_CXIndex_getGlobalOptions": fn(CXIndex) -> c_uint;

    // files
    get_file: "clang_getFile": fn(CXTranslationUnit, *const c_char) -> CXFile;
    get_file_name: "clang_getFileName": fn(CXFile) -> CXString;
    get_file_time: "clang_getFileTime": fn(CXFile) -> i64;

    // source locations
    get_null_location: "clang_getNullLocation": fn() -> CXSourceLocation;
    equal_locations: "clang_equalLocations": fn(CXSourceLocation, CXSourceLocation) -> c_uint;
    get_location: "clang_getLocation": fn(CXTranslationUnit, CXFile, c_uint, c_uint) -> CXSourceLocation;
    get_location_for_offset: "clang_getLocationForOffset": fn(CXTranslationUnit, CXFile, c_uint) -> CXSourceLocation;
    get_instantiation_location: "clang_getInstantiationLocation": fn(CXSourceLocation, *mut CXFile, *mut c_uint, *mut c_uint, *mut c_uint) -> ();
    get_spelling_location: "clang_getSpellingLocation": fn(CXSourceLocation, *mut CXFile, *mut c_uint, *mut c_uint, *mut c_uint) -> ();
    location_is_from_main_file: "clang_Location_isFromMainFile": fn(CXSourceLocation) -> c_int;
    location_is_in_system_header: "clang_Location_isInSystemHeader": fn(CXSourceLocation) -> c_int;

    // source ranges
    get_null_range: "clang_getNullRange": fn() -> CXSourceRange;
    get_range: "clang_getRange": fn(CXSourceLocation, CXSourceLocation) -> CXSourceRange;
    equal_ranges: "clang_equalRanges": fn(CXSourceRange, CXSourceRange) -> c_uint;
    range_is_null: "clang_Range_isNull": fn(CXSourceRange) -> c_int;
    get_range_start: "clang_getRangeStart": fn(CXSourceRange) -> CXSourceLocation;
    get_range_end: "clang_getRangeEnd": fn(CXSourceRange) -> CXSourceLocation;

    // translation units
    parse_translation_unit: "clang_parseTranslationUnit": fn(CXIndex, *const c_char, *const *const c_char, c_int, *mut CXUnsavedFile, c_uint, c_uint) -> CXTranslationUnit;
    reparse_translation_unit: "clang_reparseTranslationUnit": fn(CXTranslationUnit, c_uint, *mut CXUnsavedFile, c_uint) -> c_int;
    dispose_translation_unit: "clang_disposeTranslationUnit": fn(CXTranslationUnit) -> ();
    default_editing_translation_unit_options: "clang_defaultEditingTranslationUnitOptions": fn() -> c_uint;
    default_reparse_options: "clang_defaultReparseOptions": fn(CXTranslationUnit) -> c_uint;
    default_save_options: "clang_defaultSaveOptions": fn(CXTranslationUnit) -> c_uint;
    save_translation_unit: "clang_saveTranslationUnit": fn(CXTranslationUnit, *const c_char, c_uint) -> c_int;
    get_translation_unit_spelling: "clang_getTranslationUnitSpelling": fn(CXTranslationUnit) -> CXString;
    get_translation_unit_cursor: "clang_getTranslationUnitCursor": fn(CXTranslationUnit) -> CXCursor;

    // diagnostics
    get_num_diagnostics: "clang_getNumDiagnostics": fn(CXTranslationUnit) -> c_uint;
    get_diagnostic: "clang_getDiagnostic": fn(CXTranslationUnit, c_uint) -> CXDiagnostic;
    dispose_diagnostic: "clang_disposeDiagnostic": fn(CXDiagnostic) -> ();
    format_diagnostic: "clang_formatDiagnostic": fn(CXDiagnostic, c_uint) -> CXString;
    default_diagnostic_display_options: "clang_defaultDiagnosticDisplayOptions": fn() -> c_uint;
    get_diagnostic_severity: "clang_getDiagnosticSeverity": fn(CXDiagnostic) -> c_int;
    get_diagnostic_location: "clang_getDiagnosticLocation": fn(CXDiagnostic) -> CXSourceLocation;
    get_diagnostic_spelling: "clang_getDiagnosticSpelling": fn(CXDiagnostic) -> CXString;
    get_diagnostic_category_text: "clang_getDiagnosticCategoryText": fn(CXDiagnostic) -> CXString;
    get_diagnostic_num_ranges: "clang_getDiagnosticNumRanges": fn(CXDiagnostic) -> c_uint;
    get_diagnostic_range: "clang_getDiagnosticRange": fn(CXDiagnostic, c_uint) -> CXSourceRange;
    get_diagnostic_num_fixits: "clang_getDiagnosticNumFixIts": fn(CXDiagnostic) -> c_uint;
    get_diagnostic_fixit: "clang_getDiagnosticFixIt": fn(CXDiagnostic, c_uint, *mut CXSourceRange) -> CXString;
    get_child_diagnostics: "clang_getChildDiagnostics": fn(CXDiagnostic) -> CXDiagnosticSet;
    get_num_diagnostics_in_set: "clang_getNumDiagnosticsInSet": fn(CXDiagnosticSet) -> c_uint;
    get_diagnostic_in_set: "clang_getDiagnosticInSet": fn(CXDiagnosticSet, c_uint) -> CXDiagnostic;
    dispose_diagnostic_set: "clang_disposeDiagnosticSet": fn(CXDiagnosticSet) -> ();

    // cursors
    get_null_cursor: "clang_getNullCursor": fn() -> CXCursor;
    get_cursor: "clang_getCursor": fn(CXTranslationUnit, CXSourceLocation) -> CXCursor;
    cursor_is_null: "clang_Cursor_isNull": fn(CXCursor) -> c_int;
    equal_cursors: "clang_equalCursors": fn(CXCursor, CXCursor) -> c_uint;
    hash_cursor: "clang_hashCursor": fn(CXCursor) -> c_uint;
    get_cursor_kind: "clang_getCursorKind": fn(CXCursor) -> c_int;
    is_declaration: "clang_isDeclaration": fn(c_int) -> c_uint;
    is_reference: "clang_isReference": fn(c_int) -> c_uint;
    is_expression: "clang_isExpression": fn(c_int) -> c_uint;
    is_invalid: "clang_isInvalid": fn(c_int) -> c_uint;
    get_cursor_kind_spelling: "clang_getCursorKindSpelling": fn(c_int) -> CXString;
    get_cursor_location: "clang_getCursorLocation": fn(CXCursor) -> CXSourceLocation;
    get_cursor_extent: "clang_getCursorExtent": fn(CXCursor) -> CXSourceRange;
    get_cursor_spelling: "clang_getCursorSpelling": fn(CXCursor) -> CXString;
    get_cursor_display_name: "clang_getCursorDisplayName": fn(CXCursor) -> CXString;
    get_cursor_usr: "clang_getCursorUSR": fn(CXCursor) -> CXString;
    get_cursor_referenced: "clang_getCursorReferenced": fn(CXCursor) -> CXCursor;
    get_cursor_definition: "clang_getCursorDefinition": fn(CXCursor) -> CXCursor;
    is_cursor_definition: "clang_isCursorDefinition": fn(CXCursor) -> c_uint;
    get_canonical_cursor: "clang_getCanonicalCursor": fn(CXCursor) -> CXCursor;

    // tokens
    tokenize: "clang_tokenize": fn(CXTranslationUnit, CXSourceRange, *mut *mut CXToken, *mut c_uint) -> ();
    annotate_tokens: "clang_annotateTokens": fn(CXTranslationUnit, *mut CXToken, c_uint, *mut CXCursor) -> ();
    dispose_tokens: "clang_disposeTokens": fn(CXTranslationUnit, *mut CXToken, c_uint) -> ();
    get_token_kind: "clang_getTokenKind": fn(CXToken) -> c_int;
    get_token_spelling: "clang_getTokenSpelling": fn(CXTranslationUnit, CXToken) -> CXString;
    get_token_location: "clang_getTokenLocation": fn(CXTranslationUnit, CXToken) -> CXSourceLocation;
    get_token_extent: "clang_getTokenExtent": fn(CXTranslationUnit, CXToken) -> CXSourceRange;

    // code completion
    code_complete_at: "clang_codeCompleteAt": fn(CXTranslationUnit, *const c_char, c_uint, c_uint, *mut CXUnsavedFile, c_uint, c_uint) -> *mut CXCodeCompleteResults;
    default_code_complete_options: "clang_defaultCodeCompleteOptions": fn() -> c_uint;
    sort_code_completion_results: "clang_sortCodeCompletionResults": fn(*mut CXCompletionResult, c_uint) -> ();
    dispose_code_complete_results: "clang_disposeCodeCompleteResults": fn(*mut CXCodeCompleteResults) -> ();
    code_complete_get_num_diagnostics: "clang_codeCompleteGetNumDiagnostics": fn(*mut CXCodeCompleteResults) -> c_uint;
    code_complete_get_diagnostic: "clang_codeCompleteGetDiagnostic": fn(*mut CXCodeCompleteResults, c_uint) -> CXDiagnostic;
    get_num_completion_chunks: "clang_getNumCompletionChunks": fn(CXCompletionString) -> c_uint;
    get_completion_chunk_kind: "clang_getCompletionChunkKind": fn(CXCompletionString, c_uint) -> c_int;
    get_completion_chunk_text: "clang_getCompletionChunkText": fn(CXCompletionString, c_uint) -> CXString;
    get_completion_priority: "clang_getCompletionPriority": fn(CXCompletionString) -> c_uint;
    get_completion_availability: "clang_getCompletionAvailability": fn(CXCompletionString) -> c_int;
    get_completion_brief_comment: "clang_getCompletionBriefComment": fn(CXCompletionString) -> CXString;

    // miscellaneous
    get_clang_version: "clang_getClangVersion": fn() -> CXString;
    toggle_crash_recovery: "clang_toggleCrashRecovery": fn(c_uint) -> ();
}

type ExpansionLocationFn =
    unsafe extern "C" fn(CXSourceLocation, *mut CXFile, *mut c_uint, *mut c_uint, *mut c_uint);

// ============================================================================
// Dynamic Adapter
// ============================================================================

/// A libclang shared library opened via the platform dynamic loader.
pub struct DynamicLibclang {
    entry: EntryPoints,

    /// Newer expansion-location variant; absent on some platforms, in which
    /// case `get_instantiation_location` is used instead.
    get_expansion_location: Option<ExpansionLocationFn>,

    version: LibraryVersion,
    path: PathBuf,

    /// Keeps the resolved pointers alive. Declared last so it drops last.
    _lib: Library,
}

impl std::fmt::Debug for DynamicLibclang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicLibclang")
            .field("path", &self.path)
            .field("version", &self.version)
            .field(
                "has_expansion_location",
                &self.get_expansion_location.is_some(),
            )
            .finish()
    }
}

impl DynamicLibclang {
    /// Try each candidate path in order; the first that opens, resolves
    /// completely, and meets the version floor wins. A failed candidate
    /// leaves no state behind.
    pub fn load(
        candidates: &[PathBuf],
        required_version: LibraryVersion,
    ) -> Result<Self, LoadError> {
        let mut attempts = Vec::new();

        for path in candidates {
            if !path.exists() {
                attempts.push(format!("{}: file not found", path.display()));
                continue;
            }

            match Self::try_load(path, required_version) {
                Ok(lib) => {
                    info!(
                        "Loaded libclang {} from {}",
                        lib.version,
                        path.display()
                    );
                    return Ok(lib);
                }
                Err(e) => {
                    debug!("Rejected libclang candidate {}: {}", path.display(), e);
                    attempts.push(format!("{}: {}", path.display(), e));
                }
            }
        }

        Err(LoadError::NoUsableLibrary { attempts })
    }

    fn try_load(path: &Path, required_version: LibraryVersion) -> Result<Self, LoadError> {
        let lib = unsafe { Library::new(path) }.map_err(|e| LoadError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let entry = EntryPoints::resolve(&lib, path)?;

        let get_expansion_location = unsafe {
            lib.get::<ExpansionLocationFn>(b"clang_getExpansionLocation\0")
                .ok()
                .map(|s| *s)
        };

        // Resolve the version before committing to this candidate. The
        // string is copied and disposed inline; the adapter is not built yet.
        let banner = unsafe {
            let cx = (entry.get_clang_version)();
            let c_str = (entry.get_cstring)(cx);
            let banner = if c_str.is_null() {
                String::new()
            } else {
                CStr::from_ptr(c_str).to_string_lossy().into_owned()
            };
            (entry.dispose_string)(cx);
            banner
        };

        let version =
            LibraryVersion::parse(&banner).map_err(|e| LoadError::VersionUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if version < required_version {
            return Err(LoadError::VersionTooOld {
                path: path.to_path_buf(),
                found: version,
                required: required_version,
            });
        }

        Ok(Self {
            entry,
            get_expansion_location,
            version,
            path: path.to_path_buf(),
            _lib: lib,
        })
    }

    pub fn version(&self) -> LibraryVersion {
        self.version
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Baseline compile flags required by this library installation: an
    /// include path into its bundled headers, plus platform stdlib flags
    /// for C++ sources.
    pub fn builtin_compile_args(&self, is_cpp: bool) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(lib_dir) = self.path.parent() {
            let builtin = lib_dir
                .join("clang")
                .join(self.version.to_string())
                .join("include");
            if builtin.exists() {
                args.push(format!("-I{}", builtin.display()));
            }
        }

        if is_cpp {
            args.push("-x".to_string());
            args.push("c++".to_string());
            if cfg!(target_os = "macos") {
                args.push("-stdlib=libc++".to_string());
            }
        }

        args
    }

}

/// Well-known libclang install locations for the current platform,
/// newest-first. An embedded/bundled path, if the host ships one, should be
/// prepended by the caller.
pub fn default_library_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if cfg!(target_os = "macos") {
        paths.push(PathBuf::from(
            "/Applications/Xcode.app/Contents/Developer/Toolchains/XcodeDefault.xctoolchain/usr/lib/libclang.dylib",
        ));
        paths.push(PathBuf::from(
            "/Library/Developer/CommandLineTools/usr/lib/libclang.dylib",
        ));
        return paths;
    }

    // versioned LLVM install trees, e.g. /usr/lib/llvm-18/lib/libclang.so.1
    let mut llvm_dirs: Vec<PathBuf> = WalkDir::new("/usr/lib")
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_dir()
                && e.file_name().to_string_lossy().starts_with("llvm-")
        })
        .map(|e| e.into_path())
        .collect();
    // newest toolchain first
    llvm_dirs.sort();
    llvm_dirs.reverse();

    for dir in llvm_dirs {
        let lib_dir = dir.join("lib");
        let mut sos: Vec<PathBuf> = WalkDir::new(&lib_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("libclang.so")
            })
            .map(|e| e.into_path())
            .collect();
        sos.sort();
        paths.extend(sos);
    }

    for fixed in [
        "/usr/lib/libclang.so",
        "/usr/lib/x86_64-linux-gnu/libclang.so",
        "/usr/local/lib/libclang.so",
    ] {
        paths.push(PathBuf::from(fixed));
    }

    paths
}

// ============================================================================
// LibclangApi Forwarding
// ============================================================================

impl LibclangApi for DynamicLibclang {
    fn get_cstring(&self, string: CXString) -> *const c_char {
        unsafe { (self.entry.get_cstring)(string) }
    }

    fn dispose_string(&self, string: CXString) {
        unsafe { (self.entry.dispose_string)(string) }
    }

    fn create_index(&self, exclude_decls_from_pch: i32, display_diagnostics: i32) -> CXIndex {
        unsafe { (self.entry.create_index)(exclude_decls_from_pch, display_diagnostics) }
    }

    fn dispose_index(&self, index: CXIndex) {
        unsafe { (self.entry.dispose_index)(index) }
    }

    fn index_set_global_options(&self, index: CXIndex, options: u32) {
        unsafe { (self.entry.index_set_global_options)(index, options) }
    }

    fn index_get_global_options(&self, index: CXIndex) -> u32 {
        unsafe { (self.entry.index_get_global_options)(index) }
    }

    fn get_file(&self, tu: CXTranslationUnit, file_name: &CStr) -> CXFile {
        unsafe { (self.entry.get_file)(tu, file_name.as_ptr()) }
    }

    fn get_file_name(&self, file: CXFile) -> CXString {
        unsafe { (self.entry.get_file_name)(file) }
    }

    fn get_file_time(&self, file: CXFile) -> i64 {
        unsafe { (self.entry.get_file_time)(file) }
    }

    fn get_null_location(&self) -> CXSourceLocation {
        unsafe { (self.entry.get_null_location)() }
    }

    fn equal_locations(&self, lhs: CXSourceLocation, rhs: CXSourceLocation) -> bool {
        unsafe { (self.entry.equal_locations)(lhs, rhs) != 0 }
    }

    fn get_location(
        &self,
        tu: CXTranslationUnit,
        file: CXFile,
        line: u32,
        column: u32,
    ) -> CXSourceLocation {
        unsafe { (self.entry.get_location)(tu, file, line, column) }
    }

    fn get_location_for_offset(
        &self,
        tu: CXTranslationUnit,
        file: CXFile,
        offset: u32,
    ) -> CXSourceLocation {
        unsafe { (self.entry.get_location_for_offset)(tu, file, offset) }
    }

    fn get_expansion_location(&self, location: CXSourceLocation) -> PhysicalLocation {
        let mut file: CXFile = std::ptr::null_mut();
        let (mut line, mut column, mut offset): (c_uint, c_uint, c_uint) = (0, 0, 0);
        unsafe {
            match self.get_expansion_location {
                Some(f) => f(location, &mut file, &mut line, &mut column, &mut offset),
                None => (self.entry.get_instantiation_location)(
                    location,
                    &mut file,
                    &mut line,
                    &mut column,
                    &mut offset,
                ),
            }
        }
        PhysicalLocation {
            file,
            line,
            column,
            offset,
        }
    }

    fn get_spelling_location(&self, location: CXSourceLocation) -> PhysicalLocation {
        let mut file: CXFile = std::ptr::null_mut();
        let (mut line, mut column, mut offset): (c_uint, c_uint, c_uint) = (0, 0, 0);
        unsafe {
            (self.entry.get_spelling_location)(
                location,
                &mut file,
                &mut line,
                &mut column,
                &mut offset,
            )
        }
        PhysicalLocation {
            file,
            line,
            column,
            offset,
        }
    }

    fn location_is_from_main_file(&self, location: CXSourceLocation) -> bool {
        unsafe { (self.entry.location_is_from_main_file)(location) != 0 }
    }

    fn location_is_in_system_header(&self, location: CXSourceLocation) -> bool {
        unsafe { (self.entry.location_is_in_system_header)(location) != 0 }
    }

    fn get_null_range(&self) -> CXSourceRange {
        unsafe { (self.entry.get_null_range)() }
    }

    fn get_range(&self, begin: CXSourceLocation, end: CXSourceLocation) -> CXSourceRange {
        unsafe { (self.entry.get_range)(begin, end) }
    }

    fn equal_ranges(&self, lhs: CXSourceRange, rhs: CXSourceRange) -> bool {
        unsafe { (self.entry.equal_ranges)(lhs, rhs) != 0 }
    }

    fn range_is_null(&self, range: CXSourceRange) -> bool {
        unsafe { (self.entry.range_is_null)(range) != 0 }
    }

    fn get_range_start(&self, range: CXSourceRange) -> CXSourceLocation {
        unsafe { (self.entry.get_range_start)(range) }
    }

    fn get_range_end(&self, range: CXSourceRange) -> CXSourceLocation {
        unsafe { (self.entry.get_range_end)(range) }
    }

    fn parse_translation_unit(
        &self,
        index: CXIndex,
        source_filename: &CStr,
        args: &[*const c_char],
        unsaved_files: &[CXUnsavedFile],
        options: u32,
    ) -> CXTranslationUnit {
        unsafe {
            (self.entry.parse_translation_unit)(
                index,
                source_filename.as_ptr(),
                args.as_ptr(),
                args.len() as c_int,
                unsaved_files.as_ptr() as *mut CXUnsavedFile,
                unsaved_files.len() as c_uint,
                options,
            )
        }
    }

    fn reparse_translation_unit(
        &self,
        tu: CXTranslationUnit,
        unsaved_files: &[CXUnsavedFile],
        options: u32,
    ) -> i32 {
        unsafe {
            (self.entry.reparse_translation_unit)(
                tu,
                unsaved_files.len() as c_uint,
                unsaved_files.as_ptr() as *mut CXUnsavedFile,
                options,
            )
        }
    }

    fn dispose_translation_unit(&self, tu: CXTranslationUnit) {
        unsafe { (self.entry.dispose_translation_unit)(tu) }
    }

    fn default_editing_translation_unit_options(&self) -> u32 {
        unsafe { (self.entry.default_editing_translation_unit_options)() }
    }

    fn default_reparse_options(&self, tu: CXTranslationUnit) -> u32 {
        unsafe { (self.entry.default_reparse_options)(tu) }
    }

    fn default_save_options(&self, tu: CXTranslationUnit) -> u32 {
        unsafe { (self.entry.default_save_options)(tu) }
    }

    fn save_translation_unit(&self, tu: CXTranslationUnit, file_name: &CStr, options: u32) -> i32 {
        unsafe { (self.entry.save_translation_unit)(tu, file_name.as_ptr(), options) }
    }

    fn get_translation_unit_spelling(&self, tu: CXTranslationUnit) -> CXString {
        unsafe { (self.entry.get_translation_unit_spelling)(tu) }
    }

    fn get_translation_unit_cursor(&self, tu: CXTranslationUnit) -> CXCursor {
        unsafe { (self.entry.get_translation_unit_cursor)(tu) }
    }

    fn get_num_diagnostics(&self, tu: CXTranslationUnit) -> u32 {
        unsafe { (self.entry.get_num_diagnostics)(tu) }
    }

    fn get_diagnostic(&self, tu: CXTranslationUnit, index: u32) -> CXDiagnostic {
        unsafe { (self.entry.get_diagnostic)(tu, index) }
    }

    fn dispose_diagnostic(&self, diagnostic: CXDiagnostic) {
        unsafe { (self.entry.dispose_diagnostic)(diagnostic) }
    }

    fn format_diagnostic(&self, diagnostic: CXDiagnostic, options: u32) -> CXString {
        unsafe { (self.entry.format_diagnostic)(diagnostic, options) }
    }

    fn default_diagnostic_display_options(&self) -> u32 {
        unsafe { (self.entry.default_diagnostic_display_options)() }
    }

    fn get_diagnostic_severity(&self, diagnostic: CXDiagnostic) -> i32 {
        unsafe { (self.entry.get_diagnostic_severity)(diagnostic) }
    }

    fn get_diagnostic_location(&self, diagnostic: CXDiagnostic) -> CXSourceLocation {
        unsafe { (self.entry.get_diagnostic_location)(diagnostic) }
    }

    fn get_diagnostic_spelling(&self, diagnostic: CXDiagnostic) -> CXString {
        unsafe { (self.entry.get_diagnostic_spelling)(diagnostic) }
    }

    fn get_diagnostic_category_text(&self, diagnostic: CXDiagnostic) -> CXString {
        unsafe { (self.entry.get_diagnostic_category_text)(diagnostic) }
    }

    fn get_diagnostic_num_ranges(&self, diagnostic: CXDiagnostic) -> u32 {
        unsafe { (self.entry.get_diagnostic_num_ranges)(diagnostic) }
    }

    fn get_diagnostic_range(&self, diagnostic: CXDiagnostic, index: u32) -> CXSourceRange {
        unsafe { (self.entry.get_diagnostic_range)(diagnostic, index) }
    }

    fn get_diagnostic_num_fixits(&self, diagnostic: CXDiagnostic) -> u32 {
        unsafe { (self.entry.get_diagnostic_num_fixits)(diagnostic) }
    }

    fn get_diagnostic_fixit(
        &self,
        diagnostic: CXDiagnostic,
        index: u32,
        replacement_range: &mut CXSourceRange,
    ) -> CXString {
        unsafe { (self.entry.get_diagnostic_fixit)(diagnostic, index, replacement_range) }
    }

    fn get_child_diagnostics(&self, diagnostic: CXDiagnostic) -> CXDiagnosticSet {
        unsafe { (self.entry.get_child_diagnostics)(diagnostic) }
    }

    fn get_num_diagnostics_in_set(&self, set: CXDiagnosticSet) -> u32 {
        unsafe { (self.entry.get_num_diagnostics_in_set)(set) }
    }

    fn get_diagnostic_in_set(&self, set: CXDiagnosticSet, index: u32) -> CXDiagnostic {
        unsafe { (self.entry.get_diagnostic_in_set)(set, index) }
    }

    fn dispose_diagnostic_set(&self, set: CXDiagnosticSet) {
        unsafe { (self.entry.dispose_diagnostic_set)(set) }
    }

    fn get_null_cursor(&self) -> CXCursor {
        unsafe { (self.entry.get_null_cursor)() }
    }

    fn get_cursor(&self, tu: CXTranslationUnit, location: CXSourceLocation) -> CXCursor {
        unsafe { (self.entry.get_cursor)(tu, location) }
    }

    fn cursor_is_null(&self, cursor: CXCursor) -> bool {
        unsafe { (self.entry.cursor_is_null)(cursor) != 0 }
    }

    fn equal_cursors(&self, lhs: CXCursor, rhs: CXCursor) -> bool {
        unsafe { (self.entry.equal_cursors)(lhs, rhs) != 0 }
    }

    fn hash_cursor(&self, cursor: CXCursor) -> u32 {
        unsafe { (self.entry.hash_cursor)(cursor) }
    }

    fn get_cursor_kind(&self, cursor: CXCursor) -> i32 {
        unsafe { (self.entry.get_cursor_kind)(cursor) }
    }

    fn is_declaration(&self, kind: i32) -> bool {
        unsafe { (self.entry.is_declaration)(kind) != 0 }
    }

    fn is_reference(&self, kind: i32) -> bool {
        unsafe { (self.entry.is_reference)(kind) != 0 }
    }

    fn is_expression(&self, kind: i32) -> bool {
        unsafe { (self.entry.is_expression)(kind) != 0 }
    }

    fn is_invalid(&self, kind: i32) -> bool {
        unsafe { (self.entry.is_invalid)(kind) != 0 }
    }

    fn get_cursor_kind_spelling(&self, kind: i32) -> CXString {
        unsafe { (self.entry.get_cursor_kind_spelling)(kind) }
    }

    fn get_cursor_location(&self, cursor: CXCursor) -> CXSourceLocation {
        unsafe { (self.entry.get_cursor_location)(cursor) }
    }

    fn get_cursor_extent(&self, cursor: CXCursor) -> CXSourceRange {
        unsafe { (self.entry.get_cursor_extent)(cursor) }
    }

    fn get_cursor_spelling(&self, cursor: CXCursor) -> CXString {
        unsafe { (self.entry.get_cursor_spelling)(cursor) }
    }

    fn get_cursor_display_name(&self, cursor: CXCursor) -> CXString {
        unsafe { (self.entry.get_cursor_display_name)(cursor) }
    }

    fn get_cursor_usr(&self, cursor: CXCursor) -> CXString {
        unsafe { (self.entry.get_cursor_usr)(cursor) }
    }

    fn get_cursor_referenced(&self, cursor: CXCursor) -> CXCursor {
        unsafe { (self.entry.get_cursor_referenced)(cursor) }
    }

    fn get_cursor_definition(&self, cursor: CXCursor) -> CXCursor {
        unsafe { (self.entry.get_cursor_definition)(cursor) }
    }

    fn is_cursor_definition(&self, cursor: CXCursor) -> bool {
        unsafe { (self.entry.is_cursor_definition)(cursor) != 0 }
    }

    fn get_canonical_cursor(&self, cursor: CXCursor) -> CXCursor {
        unsafe { (self.entry.get_canonical_cursor)(cursor) }
    }

    fn tokenize(&self, tu: CXTranslationUnit, range: CXSourceRange) -> (*mut CXToken, u32) {
        let mut tokens: *mut CXToken = std::ptr::null_mut();
        let mut num_tokens: c_uint = 0;
        unsafe { (self.entry.tokenize)(tu, range, &mut tokens, &mut num_tokens) }
        (tokens, num_tokens)
    }

    fn annotate_tokens(&self, tu: CXTranslationUnit, tokens: &[CXToken], cursors: &mut [CXCursor]) {
        debug_assert_eq!(tokens.len(), cursors.len());
        unsafe {
            (self.entry.annotate_tokens)(
                tu,
                tokens.as_ptr() as *mut CXToken,
                tokens.len() as c_uint,
                cursors.as_mut_ptr(),
            )
        }
    }

    fn dispose_tokens(&self, tu: CXTranslationUnit, tokens: *mut CXToken, num_tokens: u32) {
        unsafe { (self.entry.dispose_tokens)(tu, tokens, num_tokens) }
    }

    fn get_token_kind(&self, token: CXToken) -> i32 {
        unsafe { (self.entry.get_token_kind)(token) }
    }

    fn get_token_spelling(&self, tu: CXTranslationUnit, token: CXToken) -> CXString {
        unsafe { (self.entry.get_token_spelling)(tu, token) }
    }

    fn get_token_location(&self, tu: CXTranslationUnit, token: CXToken) -> CXSourceLocation {
        unsafe { (self.entry.get_token_location)(tu, token) }
    }

    fn get_token_extent(&self, tu: CXTranslationUnit, token: CXToken) -> CXSourceRange {
        unsafe { (self.entry.get_token_extent)(tu, token) }
    }

    fn code_complete_at(
        &self,
        tu: CXTranslationUnit,
        complete_filename: &CStr,
        line: u32,
        column: u32,
        unsaved_files: &[CXUnsavedFile],
        options: u32,
    ) -> *mut CXCodeCompleteResults {
        unsafe {
            (self.entry.code_complete_at)(
                tu,
                complete_filename.as_ptr(),
                line,
                column,
                unsaved_files.as_ptr() as *mut CXUnsavedFile,
                unsaved_files.len() as c_uint,
                options,
            )
        }
    }

    fn default_code_complete_options(&self) -> u32 {
        unsafe { (self.entry.default_code_complete_options)() }
    }

    fn sort_code_completion_results(&self, results: *mut CXCompletionResult, num_results: u32) {
        unsafe { (self.entry.sort_code_completion_results)(results, num_results) }
    }

    fn dispose_code_complete_results(&self, results: *mut CXCodeCompleteResults) {
        unsafe { (self.entry.dispose_code_complete_results)(results) }
    }

    fn code_complete_get_num_diagnostics(&self, results: *mut CXCodeCompleteResults) -> u32 {
        unsafe { (self.entry.code_complete_get_num_diagnostics)(results) }
    }

    fn code_complete_get_diagnostic(
        &self,
        results: *mut CXCodeCompleteResults,
        index: u32,
    ) -> CXDiagnostic {
        unsafe { (self.entry.code_complete_get_diagnostic)(results, index) }
    }

    fn get_num_completion_chunks(&self, completion_string: CXCompletionString) -> u32 {
        unsafe { (self.entry.get_num_completion_chunks)(completion_string) }
    }

    fn get_completion_chunk_kind(&self, completion_string: CXCompletionString, chunk: u32) -> i32 {
        unsafe { (self.entry.get_completion_chunk_kind)(completion_string, chunk) }
    }

    fn get_completion_chunk_text(
        &self,
        completion_string: CXCompletionString,
        chunk: u32,
    ) -> CXString {
        unsafe { (self.entry.get_completion_chunk_text)(completion_string, chunk) }
    }

    fn get_completion_priority(&self, completion_string: CXCompletionString) -> u32 {
        unsafe { (self.entry.get_completion_priority)(completion_string) }
    }

    fn get_completion_availability(&self, completion_string: CXCompletionString) -> i32 {
        unsafe { (self.entry.get_completion_availability)(completion_string) }
    }

    fn get_completion_brief_comment(&self, completion_string: CXCompletionString) -> CXString {
        unsafe { (self.entry.get_completion_brief_comment)(completion_string) }
    }

    fn get_clang_version(&self) -> CXString {
        unsafe { (self.entry.get_clang_version)() }
    }

    fn toggle_crash_recovery(&self, enabled: bool) {
        unsafe { (self.entry.toggle_crash_recovery)(if enabled { 1 } else { 0 }) }
    }
}
