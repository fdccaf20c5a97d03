//! Cursor facade
//!
//! A cursor identifies one AST node. Wrappers are cheap value copies; the
//! foreign library decides equality, hashing, and nullness. String accessors
//! copy out and dispose immediately.

use std::sync::Arc;

use crate::libclang::api::LibclangApi;
use crate::libclang::ffi::CXCursor;
use crate::libclang::string::owned_string;

use super::location::{SourceLocation, SourceRange};

#[derive(Clone)]
pub struct Cursor {
    api: Arc<dyn LibclangApi>,
    raw: CXCursor,
}

impl Cursor {
    pub(crate) fn new(api: Arc<dyn LibclangApi>, raw: CXCursor) -> Self {
        Self { api, raw }
    }

    pub(crate) fn raw(&self) -> CXCursor {
        self.raw
    }

    pub fn is_null(&self) -> bool {
        self.api.cursor_is_null(self.raw)
    }

    pub fn is_valid(&self) -> bool {
        !self.is_null() && !self.api.is_invalid(self.kind())
    }

    /// Raw `CXCursorKind` value.
    pub fn kind(&self) -> i32 {
        self.api.get_cursor_kind(self.raw)
    }

    pub fn kind_spelling(&self) -> String {
        owned_string(
            self.api.as_ref(),
            self.api.get_cursor_kind_spelling(self.kind()),
        )
    }

    pub fn is_declaration(&self) -> bool {
        self.api.is_declaration(self.kind())
    }

    pub fn is_reference(&self) -> bool {
        self.api.is_reference(self.kind())
    }

    pub fn is_expression(&self) -> bool {
        self.api.is_expression(self.kind())
    }

    pub fn spelling(&self) -> String {
        owned_string(self.api.as_ref(), self.api.get_cursor_spelling(self.raw))
    }

    pub fn display_name(&self) -> String {
        owned_string(
            self.api.as_ref(),
            self.api.get_cursor_display_name(self.raw),
        )
    }

    /// Unified Symbol Resolution string; stable across translation units.
    pub fn usr(&self) -> String {
        owned_string(self.api.as_ref(), self.api.get_cursor_usr(self.raw))
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(
            Arc::clone(&self.api),
            self.api.get_cursor_location(self.raw),
        )
    }

    pub fn extent(&self) -> SourceRange {
        SourceRange::new(Arc::clone(&self.api), self.api.get_cursor_extent(self.raw))
    }

    /// The cursor this one refers to (e.g. the declaration behind a
    /// reference). Null when the cursor refers to nothing.
    pub fn referenced(&self) -> Cursor {
        Cursor::new(
            Arc::clone(&self.api),
            self.api.get_cursor_referenced(self.raw),
        )
    }

    /// The definition of the referenced entity, if visible in this
    /// translation unit.
    pub fn definition(&self) -> Cursor {
        Cursor::new(
            Arc::clone(&self.api),
            self.api.get_cursor_definition(self.raw),
        )
    }

    pub fn is_definition(&self) -> bool {
        self.api.is_cursor_definition(self.raw)
    }

    pub fn canonical(&self) -> Cursor {
        Cursor::new(
            Arc::clone(&self.api),
            self.api.get_canonical_cursor(self.raw),
        )
    }

    pub fn hash(&self) -> u32 {
        self.api.hash_cursor(self.raw)
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.api.equal_cursors(self.raw, other.raw)
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("kind", &self.kind())
            .field("null", &self.is_null())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libclang::testing::FakeLibclang;

    fn fake() -> Arc<dyn LibclangApi> {
        Arc::new(FakeLibclang::new("clang version 14.0.6"))
    }

    #[test]
    fn test_null_cursor() {
        let api = fake();
        let cursor = Cursor::new(Arc::clone(&api), api.get_null_cursor());
        assert!(cursor.is_null());
        assert!(!cursor.is_valid());
    }

    #[test]
    fn test_equality_delegates_to_library() {
        let api = fake();
        let a = Cursor::new(Arc::clone(&api), api.get_null_cursor());
        let b = Cursor::new(Arc::clone(&api), api.get_null_cursor());
        assert_eq!(a, b);
    }

    #[test]
    fn test_referenced_keeps_identity() {
        let api = fake();
        let loc = api.get_location(std::ptr::null_mut(), 0x42 as *mut _, 1, 1);
        let cursor = Cursor::new(Arc::clone(&api), api.get_cursor(std::ptr::null_mut(), loc));
        assert!(cursor.is_expression());
        let referenced = cursor.referenced();
        assert!(!referenced.is_null());
        assert!(referenced.is_declaration());
    }
}
