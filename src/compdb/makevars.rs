//! Makevars flag extraction
//!
//! Packages put extra compiler flags in `src/Makevars` under the variables
//! `PKG_CPPFLAGS`, `PKG_CFLAGS`, and `PKG_CXXFLAGS`. This reads those
//! assignments (folding backslash line continuations first) and returns the
//! flag tokens, with relative includes (`-I.` and `-I..` prefixes, e.g.
//! `-I../inst/include`) rewritten to absolute paths anchored at the
//! package's `src/` directory.
//!
//! Make expressions (`$(...)`) are skipped: expanding them would require
//! running make, and the flags they typically hold are rediscovered by the
//! dry-run compile anyway.

use std::path::Path;

use tracing::debug;

const FLAG_VARIABLES: &[&str] = &["PKG_CPPFLAGS", "PKG_CFLAGS", "PKG_CXXFLAGS"];

/// Extract flag tokens from Makevars content. `src_dir` anchors relative
/// include rewrites.
pub fn extract_flags(content: &str, src_dir: &Path) -> Vec<String> {
    let mut flags = Vec::new();

    for line in fold_continuations(content) {
        let Some(assignment) = flag_assignment(&line) else {
            continue;
        };
        for token in assignment.split_whitespace() {
            if token.contains("$(") {
                continue;
            }
            if !token.starts_with('-') {
                continue;
            }
            flags.push(rewrite_relative_include(token, src_dir));
        }
    }

    flags
}

/// Read and extract flags from a Makevars file; missing or unreadable files
/// contribute nothing.
pub fn read_flags(path: &Path, src_dir: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => extract_flags(&content, src_dir),
        Err(e) => {
            if path.exists() {
                debug!("Could not read {}: {}", path.display(), e);
            }
            Vec::new()
        }
    }
}

/// Join lines ending in a backslash with their continuation.
fn fold_continuations(content: &str) -> Vec<String> {
    let mut folded = Vec::new();
    let mut pending = String::new();

    for line in content.lines() {
        let trimmed_end = line.trim_end();
        if let Some(stripped) = trimmed_end.strip_suffix('\\') {
            pending.push_str(stripped);
            pending.push(' ');
        } else {
            pending.push_str(trimmed_end);
            folded.push(std::mem::take(&mut pending));
        }
    }
    if !pending.is_empty() {
        folded.push(pending);
    }

    folded
}

/// The right-hand side of a recognized flag-variable assignment, if `line`
/// is one.
fn flag_assignment(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    for variable in FLAG_VARIABLES {
        if let Some(rest) = trimmed.strip_prefix(variable) {
            // accept "=", ":=", "+=" with optional surrounding space
            let rest = rest.trim_start();
            let rest = rest
                .strip_prefix("+=")
                .or_else(|| rest.strip_prefix(":="))
                .or_else(|| rest.strip_prefix('='))?;
            return Some(rest.trim());
        }
    }
    None
}

/// Prefix rewrite: `-I..` (package root) checked before `-I.` (src dir) so
/// forms like `-I../inst/include` anchor at the right level.
fn rewrite_relative_include(token: &str, src_dir: &Path) -> String {
    if let Some(rest) = token.strip_prefix("-I..") {
        let parent = src_dir.parent().unwrap_or(src_dir);
        return format!("-I{}{}", parent.display(), rest);
    }
    if let Some(rest) = token.strip_prefix("-I.") {
        return format!("-I{}{}", src_dir.display(), rest);
    }
    token.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn src_dir() -> PathBuf {
        PathBuf::from("/pkg/src")
    }

    #[test]
    fn test_extracts_recognized_variables() {
        let content = "\
PKG_CPPFLAGS = -DNDEBUG -I/opt/include
PKG_CXXFLAGS = -std=c++14
OTHER_VAR = -Inot-this
";
        let flags = extract_flags(content, &src_dir());
        assert_eq!(flags, vec!["-DNDEBUG", "-I/opt/include", "-std=c++14"]);
    }

    #[test]
    fn test_backslash_continuation() {
        let content = "PKG_CPPFLAGS = -DFIRST \\\n    -DSECOND \\\n    -DTHIRD\n";
        let flags = extract_flags(content, &src_dir());
        assert_eq!(flags, vec!["-DFIRST", "-DSECOND", "-DTHIRD"]);
    }

    #[test]
    fn test_relative_includes_rewritten() {
        let content = "PKG_CPPFLAGS = -I. -I.. -I../inst/include\n";
        let flags = extract_flags(content, &src_dir());
        assert_eq!(
            flags,
            vec!["-I/pkg/src", "-I/pkg", "-I/pkg/inst/include"]
        );
    }

    #[test]
    fn test_inst_include_anchors_at_package_root() {
        // the standard place packages keep public headers
        let flags = extract_flags("PKG_CPPFLAGS = -I../inst/include\n", &src_dir());
        assert_eq!(flags, vec!["-I/pkg/inst/include"]);
    }

    #[test]
    fn test_src_relative_include_rewritten() {
        let flags = extract_flags("PKG_CPPFLAGS = -I./vendor\n", &src_dir());
        assert_eq!(flags, vec!["-I/pkg/src/vendor"]);
    }

    #[test]
    fn test_make_expressions_skipped() {
        let content = "PKG_CXXFLAGS = $(SHLIB_OPENMP_CXXFLAGS) -DUSE_OMP\n";
        let flags = extract_flags(content, &src_dir());
        assert_eq!(flags, vec!["-DUSE_OMP"]);
    }

    #[test]
    fn test_plus_equals_assignment() {
        let content = "PKG_CFLAGS += -O2\n";
        let flags = extract_flags(content, &src_dir());
        assert_eq!(flags, vec!["-O2"]);
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let flags = read_flags(Path::new("/no/such/Makevars"), &src_dir());
        assert!(flags.is_empty());
    }

    #[test]
    fn test_non_flag_tokens_skipped() {
        let content = "PKG_CPPFLAGS = -Iinclude all.o extra\n";
        let flags = extract_flags(content, &src_dir());
        assert_eq!(flags, vec!["-Iinclude"]);
    }
}
