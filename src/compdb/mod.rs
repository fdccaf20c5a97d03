//! Compile-argument derivation via the R build tooling
//!
//! The indexer cannot guess include paths and defines; the R toolchain
//! knows them. This module derives per-file compiler arguments by running
//! dry-run compiles through R, caches the results behind invalidation
//! fingerprints, and exposes them through the host-facing
//! `CompilationDatabase` trait.

pub mod dry_run;
pub mod error;
pub mod fingerprint;
pub mod makevars;
pub mod resolver;

pub use dry_run::{DryRunExecutor, DryRunOutput, RScriptExecutor, DEFAULT_DRY_RUN_TIMEOUT};
pub use error::DryRunError;
pub use resolver::{CompilationDatabase, RcppCompilationDatabase, ResolverConfig};
