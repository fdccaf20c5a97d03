//! Library version handling
//!
//! Parses the version string reported by `clang_getClangVersion` and orders
//! versions component-wise as integers. The integer comparison matters:
//! a naive string compare would sort "9.0.0" after "10.0.0".

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersionParseError {
    #[error("No 'clang version' marker in output: {0:?}")]
    MarkerNotFound(String),
    #[error("Invalid version component: {0}")]
    InvalidComponent(String),
}

/// A libclang version as (major, minor, patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LibraryVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl LibraryVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// A zero version means "never resolved".
    pub fn is_empty(&self) -> bool {
        self.major == 0
    }

    /// Extract the version from `clang_getClangVersion` output.
    ///
    /// Format examples:
    ///   "clang version 3.4 (tags/RELEASE_34/final)"
    ///   "Ubuntu clang version 14.0.0-1ubuntu1.1"
    ///   "Apple LLVM version 15.0.0 (clang-1500.3.9.4)"
    pub fn parse(output: &str) -> Result<Self, VersionParseError> {
        let marker = "version ";
        let start = output
            .find(marker)
            .ok_or_else(|| VersionParseError::MarkerNotFound(output.to_string()))?
            + marker.len();

        // take the dotted numeric run, stopping at whitespace or variant suffix
        let version_str: String = output[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let mut parts = version_str.split('.');
        let major = Self::component(parts.next())?;
        let minor = Self::component(parts.next())?;
        // old releases report two components ("3.4"); patch defaults to zero
        let patch = match parts.next() {
            Some(p) if !p.is_empty() => Self::component(Some(p))?,
            _ => 0,
        };

        Ok(Self::new(major, minor, patch))
    }

    fn component(part: Option<&str>) -> Result<u32, VersionParseError> {
        part.and_then(|s| s.parse::<u32>().ok())
            .ok_or_else(|| VersionParseError::InvalidComponent(part.unwrap_or("").to_string()))
    }
}

impl std::fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
