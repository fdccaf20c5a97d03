//! Dynamic libclang binding
//!
//! Loads a libclang shared library at runtime, resolves its entry points,
//! and exposes them behind the `LibclangApi` trait. Nothing above this
//! module touches a raw symbol: the trait is the seam between the indexer
//! and the foreign library, and the seam tests swap in for a fake.

pub mod api;
pub mod dynamic;
pub mod error;
pub mod ffi;
pub mod library;
pub mod string;
#[cfg(test)]
pub mod testing;
pub mod version;

pub use api::LibclangApi;
pub use dynamic::{default_library_paths, DynamicLibclang};
pub use error::{LibraryError, LoadError};
pub use library::LibclangLibrary;
pub use version::LibraryVersion;
