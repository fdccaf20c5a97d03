//! Raw libclang C ABI types
//!
//! A minimal `#[repr(C)]` mirror of the `clang-c/Index.h` surface this
//! subsystem calls. Handles are opaque pointers; the small by-value structs
//! (cursor, location, range, token) match libclang's layouts exactly and
//! must never be reinterpreted on this side.

use std::os::raw::{c_char, c_int, c_uint, c_ulong, c_void};

// ============================================================================
// Opaque Handles
// ============================================================================

pub type CXIndex = *mut c_void;
pub type CXTranslationUnit = *mut c_void;
pub type CXFile = *mut c_void;
pub type CXDiagnostic = *mut c_void;
pub type CXDiagnosticSet = *mut c_void;
pub type CXCompletionString = *mut c_void;

// ============================================================================
// By-Value Structs
// ============================================================================

/// Foreign string handle. Must be copied out with `clang_getCString` and
/// released with `clang_disposeString`; never stored.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CXString {
    pub data: *const c_void,
    pub private_flags: c_uint,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CXSourceLocation {
    pub ptr_data: [*const c_void; 2],
    pub int_data: c_uint,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CXSourceRange {
    pub ptr_data: [*const c_void; 2],
    pub begin_int_data: c_uint,
    pub end_int_data: c_uint,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CXCursor {
    pub kind: c_int,
    pub xdata: c_int,
    pub data: [*const c_void; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CXToken {
    pub int_data: [c_uint; 4],
    pub ptr_data: *mut c_void,
}

/// One dirty editor buffer handed to parse/reparse/completion calls.
/// `filename` and `contents` must outlive the foreign call.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CXUnsavedFile {
    pub filename: *const c_char,
    pub contents: *const c_char,
    pub length: c_ulong,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CXCompletionResult {
    pub cursor_kind: c_int,
    pub completion_string: CXCompletionString,
}

#[repr(C)]
#[derive(Debug)]
pub struct CXCodeCompleteResults {
    pub results: *mut CXCompletionResult,
    pub num_results: c_uint,
}

// ============================================================================
// Option Bits
// ============================================================================

pub const TRANSLATION_UNIT_NONE: c_uint = 0x0;
pub const TRANSLATION_UNIT_DETAILED_PREPROCESSING_RECORD: c_uint = 0x01;
pub const TRANSLATION_UNIT_INCOMPLETE: c_uint = 0x02;
pub const TRANSLATION_UNIT_PRECOMPILED_PREAMBLE: c_uint = 0x04;
pub const TRANSLATION_UNIT_CACHE_COMPLETION_RESULTS: c_uint = 0x08;
pub const TRANSLATION_UNIT_FOR_SERIALIZATION: c_uint = 0x10;
pub const TRANSLATION_UNIT_INCLUDE_BRIEF_COMMENTS: c_uint = 0x80;

pub const GLOBAL_OPT_NONE: c_uint = 0x0;
pub const GLOBAL_OPT_THREAD_BACKGROUND_PRIORITY_FOR_INDEXING: c_uint = 0x1;
pub const GLOBAL_OPT_THREAD_BACKGROUND_PRIORITY_FOR_EDITING: c_uint = 0x2;

pub const CODE_COMPLETE_INCLUDE_MACROS: c_uint = 0x01;
pub const CODE_COMPLETE_INCLUDE_CODE_PATTERNS: c_uint = 0x02;
pub const CODE_COMPLETE_INCLUDE_BRIEF_COMMENTS: c_uint = 0x04;

/// `clang_saveTranslationUnit` success return code.
pub const SAVE_ERROR_NONE: c_int = 0;

// ============================================================================
// Enumerations
// ============================================================================

/// Severity levels reported for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    Ignored,
    Note,
    Warning,
    Error,
    Fatal,
}

impl DiagnosticSeverity {
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            0 => DiagnosticSeverity::Ignored,
            1 => DiagnosticSeverity::Note,
            2 => DiagnosticSeverity::Warning,
            3 => DiagnosticSeverity::Error,
            _ => DiagnosticSeverity::Fatal,
        }
    }
}

/// Token kinds returned by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Punctuation,
    Keyword,
    Identifier,
    Literal,
    Comment,
}

impl TokenKind {
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            0 => TokenKind::Punctuation,
            1 => TokenKind::Keyword,
            2 => TokenKind::Identifier,
            3 => TokenKind::Literal,
            _ => TokenKind::Comment,
        }
    }
}

/// Availability of a completion result or cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Deprecated,
    NotAvailable,
    NotAccessible,
}

impl Availability {
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            0 => Availability::Available,
            1 => Availability::Deprecated,
            2 => Availability::NotAvailable,
            _ => Availability::NotAccessible,
        }
    }
}

/// Chunk kinds within a completion string (`CXCompletionChunkKind`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionChunkKind {
    Optional,
    TypedText,
    Text,
    Placeholder,
    Informative,
    CurrentParameter,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    LeftAngle,
    RightAngle,
    Comma,
    ResultType,
    Colon,
    SemiColon,
    Equal,
    HorizontalSpace,
    VerticalSpace,
}

impl CompletionChunkKind {
    pub fn from_raw(raw: c_int) -> Self {
        match raw {
            0 => CompletionChunkKind::Optional,
            1 => CompletionChunkKind::TypedText,
            2 => CompletionChunkKind::Text,
            3 => CompletionChunkKind::Placeholder,
            4 => CompletionChunkKind::Informative,
            5 => CompletionChunkKind::CurrentParameter,
            6 => CompletionChunkKind::LeftParen,
            7 => CompletionChunkKind::RightParen,
            8 => CompletionChunkKind::LeftBracket,
            9 => CompletionChunkKind::RightBracket,
            10 => CompletionChunkKind::LeftBrace,
            11 => CompletionChunkKind::RightBrace,
            12 => CompletionChunkKind::LeftAngle,
            13 => CompletionChunkKind::RightAngle,
            14 => CompletionChunkKind::Comma,
            15 => CompletionChunkKind::ResultType,
            16 => CompletionChunkKind::Colon,
            17 => CompletionChunkKind::SemiColon,
            18 => CompletionChunkKind::Equal,
            19 => CompletionChunkKind::HorizontalSpace,
            _ => CompletionChunkKind::VerticalSpace,
        }
    }
}
