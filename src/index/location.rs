//! Source location and range facades

use std::path::PathBuf;
use std::sync::Arc;

use crate::libclang::api::LibclangApi;
use crate::libclang::ffi::{CXSourceLocation, CXSourceRange, CXTranslationUnit};
use crate::libclang::string::owned_string;

/// A plain (path, line, column) triple used at the inbound boundary.
/// Lines and columns are 1-based, as the foreign library counts them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    pub file_path: PathBuf,
    pub line: u32,
    pub column: u32,
}

impl FileLocation {
    pub fn new(file_path: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column,
        }
    }
}

/// A location inside a translation unit.
///
/// Cheap value wrapper; equality and nullness delegate to the foreign
/// library because distinct handle values can denote the same position.
#[derive(Clone)]
pub struct SourceLocation {
    api: Arc<dyn LibclangApi>,
    raw: CXSourceLocation,
}

impl SourceLocation {
    pub(crate) fn new(api: Arc<dyn LibclangApi>, raw: CXSourceLocation) -> Self {
        Self { api, raw }
    }

    pub(crate) fn raw(&self) -> CXSourceLocation {
        self.raw
    }

    pub(crate) fn api(&self) -> &Arc<dyn LibclangApi> {
        &self.api
    }

    pub fn is_null(&self) -> bool {
        self.api.equal_locations(self.raw, self.api.get_null_location())
    }

    pub fn is_from_main_file(&self) -> bool {
        self.api.location_is_from_main_file(self.raw)
    }

    pub fn is_in_system_header(&self) -> bool {
        self.api.location_is_in_system_header(self.raw)
    }

    /// The macro-expansion site, decomposed to (path, line, column).
    pub fn expansion_location(&self) -> FileLocation {
        let physical = self.api.get_expansion_location(self.raw);
        let path = owned_string(self.api.as_ref(), self.api.get_file_name(physical.file));
        FileLocation::new(path, physical.line, physical.column)
    }

    /// The spelling site (where the text literally appears).
    pub fn spelling_location(&self) -> FileLocation {
        let physical = self.api.get_spelling_location(self.raw);
        let path = owned_string(self.api.as_ref(), self.api.get_file_name(physical.file));
        FileLocation::new(path, physical.line, physical.column)
    }

    /// Byte offset of the expansion site within its file.
    pub fn offset(&self) -> u32 {
        self.api.get_expansion_location(self.raw).offset
    }
}

impl PartialEq for SourceLocation {
    fn eq(&self, other: &Self) -> bool {
        self.api.equal_locations(self.raw, other.raw)
    }
}

impl std::fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loc = self.expansion_location();
        write!(f, "{}:{}:{}", loc.file_path.display(), loc.line, loc.column)
    }
}

/// A half-open region between two source locations.
#[derive(Clone)]
pub struct SourceRange {
    api: Arc<dyn LibclangApi>,
    raw: CXSourceRange,
}

impl SourceRange {
    pub(crate) fn new(api: Arc<dyn LibclangApi>, raw: CXSourceRange) -> Self {
        Self { api, raw }
    }

    pub(crate) fn raw(&self) -> CXSourceRange {
        self.raw
    }

    pub fn is_null(&self) -> bool {
        self.api.range_is_null(self.raw)
    }

    pub fn start(&self) -> SourceLocation {
        SourceLocation::new(Arc::clone(&self.api), self.api.get_range_start(self.raw))
    }

    pub fn end(&self) -> SourceLocation {
        SourceLocation::new(Arc::clone(&self.api), self.api.get_range_end(self.raw))
    }
}

impl PartialEq for SourceRange {
    fn eq(&self, other: &Self) -> bool {
        self.api.equal_ranges(self.raw, other.raw)
    }
}

impl std::fmt::Debug for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}, {:?})", self.start(), self.end())
    }
}

/// Resolve a (file, line, column) triple to a location within `tu`.
/// Returns `None` when the file is not part of the translation unit.
pub(crate) fn location_in_unit(
    api: &Arc<dyn LibclangApi>,
    tu: CXTranslationUnit,
    file_name: &std::ffi::CStr,
    line: u32,
    column: u32,
) -> Option<SourceLocation> {
    let file = api.get_file(tu, file_name);
    if file.is_null() {
        return None;
    }
    let raw = api.get_location(tu, file, line, column);
    Some(SourceLocation::new(Arc::clone(api), raw))
}
