//! Clang-based source indexing for R package native code
//!
//! Loads libclang at runtime, keeps a cache of parsed translation units for
//! the files an editor session has open, derives per-file compiler arguments
//! by scraping R/Rcpp dry-run compiles, and exposes query facades (cursors,
//! locations, diagnostics, tokens, code completion) over the parsed state.
//!
//! The subsystem is built to degrade, not fail: a missing libclang, a parse
//! error, or a broken R toolchain each produce empty results and a log line,
//! never a panic or a hard error to the host.
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::sync::Arc;
//! use clang_index::compdb::{RcppCompilationDatabase, ResolverConfig, RScriptExecutor};
//! use clang_index::index::SourceIndex;
//! use clang_index::libclang::{default_library_paths, LibclangLibrary, LibraryVersion};
//!
//! let library = LibclangLibrary::load(&default_library_paths(), LibraryVersion::new(3, 4, 0))?;
//! let executor = Arc::new(RScriptExecutor::new("Rscript".into(), "R".into(), true));
//! let config = ResolverConfig {
//!     package_dir: None,
//!     scratch_dir: std::env::temp_dir().join("clang-index"),
//!     baseline_args_c: vec![],
//!     baseline_args_cpp: vec![],
//!     clang_version: library.version(),
//! };
//! let database = Arc::new(RcppCompilationDatabase::new(config, executor, library.api().ok()));
//! let mut index = SourceIndex::from_library(&library, database, 0);
//! # Ok::<(), clang_index::libclang::LoadError>(())
//! ```

pub mod compdb;
pub mod index;
pub mod libclang;
pub mod logging;

pub use compdb::{CompilationDatabase, RcppCompilationDatabase, ResolverConfig};
pub use index::{
    CodeCompleteResults, Cursor, Diagnostic, FileLocation, SourceIndex, SourceLocation,
    SourceRange, TranslationUnit, UnsavedFiles,
};
pub use libclang::{LibclangLibrary, LibraryVersion, LoadError};
pub use logging::{init_logging, LogConfig};
