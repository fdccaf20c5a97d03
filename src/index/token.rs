//! Token facade and tokenizer
//!
//! `TokenSet` owns the array returned by the foreign tokenizer and releases
//! it once in `Drop`. Individual `Token` views borrow from the set and are
//! only valid while it lives, which the lifetime parameter enforces.

use std::sync::Arc;

use crate::libclang::api::LibclangApi;
use crate::libclang::ffi::{CXSourceRange, CXToken, CXTranslationUnit, TokenKind};
use crate::libclang::string::owned_string;

use super::cursor::Cursor;
use super::location::{SourceLocation, SourceRange};

pub struct TokenSet {
    api: Arc<dyn LibclangApi>,
    tu: CXTranslationUnit,
    tokens: *mut CXToken,
    count: u32,
}

impl TokenSet {
    /// Tokenize `range` within `tu`. An empty set is returned for a null
    /// range or a range with no tokens.
    pub(crate) fn tokenize(
        api: Arc<dyn LibclangApi>,
        tu: CXTranslationUnit,
        range: CXSourceRange,
    ) -> Self {
        let (tokens, count) = api.tokenize(tu, range);
        Self {
            api,
            tu,
            tokens,
            count,
        }
    }

    pub fn len(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn raw_tokens(&self) -> &[CXToken] {
        if self.tokens.is_null() || self.count == 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.tokens, self.count as usize) }
    }

    pub fn token(&self, index: u32) -> Option<Token<'_>> {
        self.raw_tokens().get(index as usize).map(|raw| Token {
            set: self,
            raw: *raw,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Token<'_>> {
        self.raw_tokens().iter().map(move |raw| Token {
            set: self,
            raw: *raw,
        })
    }

    /// Pair every token with the most specific cursor covering it.
    pub fn annotate(&self) -> Vec<Cursor> {
        let raw_tokens = self.raw_tokens();
        if raw_tokens.is_empty() {
            return Vec::new();
        }
        let mut cursors = vec![self.api.get_null_cursor(); raw_tokens.len()];
        self.api.annotate_tokens(self.tu, raw_tokens, &mut cursors);
        cursors
            .into_iter()
            .map(|raw| Cursor::new(Arc::clone(&self.api), raw))
            .collect()
    }
}

impl Drop for TokenSet {
    fn drop(&mut self) {
        if !self.tokens.is_null() && self.count > 0 {
            self.api.dispose_tokens(self.tu, self.tokens, self.count);
        }
    }
}

/// A view of one token within its owning set.
pub struct Token<'a> {
    set: &'a TokenSet,
    raw: CXToken,
}

impl Token<'_> {
    pub fn kind(&self) -> TokenKind {
        TokenKind::from_raw(self.set.api.get_token_kind(self.raw))
    }

    pub fn spelling(&self) -> String {
        owned_string(
            self.set.api.as_ref(),
            self.set.api.get_token_spelling(self.set.tu, self.raw),
        )
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(
            Arc::clone(&self.set.api),
            self.set.api.get_token_location(self.set.tu, self.raw),
        )
    }

    pub fn extent(&self) -> SourceRange {
        SourceRange::new(
            Arc::clone(&self.set.api),
            self.set.api.get_token_extent(self.set.tu, self.raw),
        )
    }
}
