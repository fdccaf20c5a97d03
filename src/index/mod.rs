//! Translation unit cache and query facades
//!
//! The indexer side of the subsystem: a cache of parsed translation units
//! keyed by path, the overlay of dirty editor buffers, and the value/owning
//! facades callers use to query the parsed state.

pub mod completion;
pub mod cursor;
pub mod diagnostic;
pub mod location;
pub mod source_index;
pub mod token;
pub mod translation_unit;
pub mod unsaved_files;

pub use completion::{CodeCompleteResults, CodeCompletionResult};
pub use cursor::Cursor;
pub use diagnostic::{Diagnostic, DiagnosticSet, FixIt};
pub use location::{FileLocation, SourceLocation, SourceRange};
pub use source_index::{is_indexable_translation_unit, SourceIndex};
pub use token::{Token, TokenSet};
pub use translation_unit::TranslationUnit;
pub use unsaved_files::{UnsavedFiles, UnsavedFilesSnapshot};
