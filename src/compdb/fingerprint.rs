//! Invalidation fingerprints
//!
//! Two kinds of fingerprint gate argument re-derivation:
//!
//! - package fingerprint: existence and mtime of the build configuration
//!   files (DESCRIPTION, src/Makevars, src/Makevars.win)
//! - standalone fingerprint: the file's dependency-declaration attribute
//!   comments (`// [[Rcpp::...]]`)
//!
//! Both are deliberately shallow. A changed header does not change either
//! fingerprint, so stale arguments persist until something the fingerprint
//! covers moves. That imprecision is long-standing observed behavior, kept.

use std::path::Path;
use std::sync::OnceLock;
use std::time::UNIX_EPOCH;

use regex::Regex;
use sha2::{Digest, Sha256};

/// Matches one dependency-declaration attribute comment line.
fn attribute_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*//\s*\[\[Rcpp::(\w+)(\(.*?\))?\]\]\s*$").unwrap_or_else(|e| {
            // pattern is a compile-time constant; this cannot fail at runtime
            panic!("invalid attribute pattern: {e}")
        })
    })
}

fn hex_digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Fingerprint of a set of build configuration files: each path's existence
/// plus last-write time, concatenated and hashed. A missing file still
/// contributes (so creating it later changes the fingerprint).
pub fn build_files_fingerprint<P: AsRef<Path>>(paths: &[P]) -> String {
    let mut summary = String::new();
    for path in paths {
        let path = path.as_ref();
        summary.push_str(&path.to_string_lossy());
        summary.push('=');
        match std::fs::metadata(path) {
            Ok(metadata) => {
                let mtime = metadata
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_nanos())
                    .unwrap_or(0);
                summary.push_str(&mtime.to_string());
            }
            Err(_) => summary.push_str("absent"),
        }
        summary.push(';');
    }
    hex_digest(&summary)
}

/// Fingerprint of a standalone source file: its attribute comment lines
/// only. Edits elsewhere in the file do not change it.
pub fn attributes_fingerprint(source: &str) -> String {
    let attributes: Vec<&str> = source
        .lines()
        .filter(|line| attribute_regex().is_match(line))
        .collect();
    hex_digest(&attributes.join("\n"))
}
