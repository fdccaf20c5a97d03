//! Compile-argument derivation
//!
//! Arguments come from asking the R build tooling what it would run and
//! scraping the echoed compiler command line. Derivation is expensive (an R
//! subprocess), so results are cached and re-derived only when the relevant
//! fingerprint moves:
//!
//! - files inside a recognized package tree share one package-level argument
//!   list, gated on the build configuration files' fingerprint
//! - standalone files get per-file arguments, gated on their attribute
//!   comments
//!
//! Derivation never raises. A failed or timed-out dry run logs, yields
//! baseline-only flags for this call, and is retried on the next request.

use std::collections::HashMap;
use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use regex::Regex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::compdb::dry_run::DryRunExecutor;
use crate::compdb::{fingerprint, makevars};
use crate::libclang::api::LibclangApi;
use crate::libclang::ffi::{SAVE_ERROR_NONE, TRANSLATION_UNIT_FOR_SERIALIZATION};
use crate::libclang::version::LibraryVersion;

/// Host-facing capability: where compile arguments come from.
pub trait CompilationDatabase: Send + Sync {
    fn has_translation_unit(&self, path: &Path) -> bool;
    fn translation_units(&self) -> Vec<PathBuf>;
    /// Ordered compile arguments for `path`. Empty means "give up
    /// gracefully", not "retry".
    fn compile_args_for_translation_unit(&self, path: &Path, is_cpp: bool) -> Vec<String>;
    /// Force re-derivation of the package-level argument list on next use.
    fn rebuild_package_compilation_database(&self);
}

/// Extensions compiled as part of a package's native code.
const SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "m", "mm"];

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Flag tokens worth scraping out of an echoed compiler command line.
/// The pattern is intentionally literal-minded; it has matched real R
/// toolchain output for years and downstream behavior depends on its quirks.
fn scrape_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"[ \t]-(?:[IDif]|std)(?:"[^"]+"|[^ ]+)"#)
            .unwrap_or_else(|e| panic!("invalid scrape pattern: {e}"))
    })
}

/// Find the compile line for `file_name` (`-c <file> -o <stem>`) in dry-run
/// output and pull the flag tokens out of it.
pub(crate) fn scrape_compile_args(output: &str, file_name: &str) -> Vec<String> {
    let needle = format!("-c {} -o", file_name);
    for line in output.lines() {
        if line.contains(&needle) {
            return scrape_regex()
                .find_iter(line)
                .map(|m| m.as_str().trim().to_string())
                .collect();
        }
    }
    Vec::new()
}

/// The `LinkingTo` packages from DESCRIPTION content, version constraints
/// stripped. Handles the field spilling onto indented continuation lines.
pub(crate) fn parse_linking_to(description: &str) -> Vec<String> {
    let mut value = String::new();
    let mut collecting = false;
    for line in description.lines() {
        if collecting {
            if line.starts_with(' ') || line.starts_with('\t') {
                value.push(' ');
                value.push_str(line.trim());
                continue;
            }
            break;
        }
        if let Some(rest) = line.strip_prefix("LinkingTo:") {
            value.push_str(rest.trim());
            collecting = true;
        }
    }

    value
        .split(',')
        .map(|entry| {
            entry
                .split('(')
                .next()
                .unwrap_or("")
                .trim()
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Root of a recognized package tree, when the session is inside one.
    pub package_dir: Option<PathBuf>,
    /// Scratch directory for probe sources and the precompiled header.
    pub scratch_dir: PathBuf,
    /// Baseline flags for C sources (bundled-header include path etc.).
    pub baseline_args_c: Vec<String>,
    /// Baseline flags for C++ sources.
    pub baseline_args_cpp: Vec<String>,
    /// Keys the precompiled-header directory; a version change discards
    /// old headers.
    pub clang_version: LibraryVersion,
}

struct StandaloneRecord {
    fingerprint: String,
    args: Vec<String>,
}

#[derive(Default)]
struct State {
    package_fingerprint: Option<String>,
    package_args: Vec<String>,
    standalone: HashMap<PathBuf, StandaloneRecord>,
    /// Cached after the first attempt, success or not; a failed PCH build
    /// is not retried within a session.
    pch_args: Option<Vec<String>>,
}

/// Argument resolver backed by the R/Rcpp build tooling.
pub struct RcppCompilationDatabase {
    config: ResolverConfig,
    executor: Arc<dyn DryRunExecutor>,
    api: Option<Arc<dyn LibclangApi>>,
    state: Mutex<State>,
}

impl RcppCompilationDatabase {
    pub fn new(
        config: ResolverConfig,
        executor: Arc<dyn DryRunExecutor>,
        api: Option<Arc<dyn LibclangApi>>,
    ) -> Self {
        Self {
            config,
            executor,
            api,
            state: Mutex::new(State::default()),
        }
    }

    fn in_package(&self, path: &Path) -> bool {
        self.config
            .package_dir
            .as_ref()
            .map(|dir| path.starts_with(dir))
            .unwrap_or(false)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, State> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    // ------------------------------------------------------------------
    // Package-level derivation
    // ------------------------------------------------------------------

    fn package_args(&self, state: &mut State, package_dir: &Path) -> Vec<String> {
        let description = package_dir.join("DESCRIPTION");
        let makevars_path = package_dir.join("src").join("Makevars");
        let makevars_win = package_dir.join("src").join("Makevars.win");

        let current = fingerprint::build_files_fingerprint(&[
            &description,
            &makevars_path,
            &makevars_win,
        ]);
        if state.package_fingerprint.as_deref() == Some(current.as_str()) {
            return state.package_args.clone();
        }

        info!(
            "Deriving package compile arguments for {}",
            package_dir.display()
        );
        let mut args = match self.derive_package_args(&description) {
            Some(args) => args,
            None => return Vec::new(), // not cached; retried next call
        };
        args.extend(makevars::read_flags(
            &makevars_path,
            &package_dir.join("src"),
        ));

        state.package_fingerprint = Some(current);
        state.package_args = args.clone();
        args
    }

    fn derive_package_args(&self, description: &Path) -> Option<Vec<String>> {
        let linking_to = std::fs::read_to_string(description)
            .map(|content| parse_linking_to(&content))
            .unwrap_or_default();

        let probe_dir = self.config.scratch_dir.join("probe");
        if let Err(e) = std::fs::create_dir_all(&probe_dir) {
            warn!("Could not create probe directory: {}", e);
            return None;
        }
        let probe_path = probe_dir.join("sourcecpp_probe.cpp");

        let mut probe = String::new();
        for package in &linking_to {
            probe.push_str(&format!("// [[Rcpp::depends({})]]\n", package));
        }
        probe.push_str("#include <Rcpp.h>\n");
        if let Err(e) = std::fs::write(&probe_path, probe) {
            warn!("Could not write probe source: {}", e);
            return None;
        }

        match self.executor.source_cpp_dry_run(&probe_path) {
            Ok(output) => {
                let combined = format!("{}\n{}", output.stdout, output.stderr);
                Some(scrape_compile_args(&combined, "sourcecpp_probe.cpp"))
            }
            Err(e) => {
                warn!("Package dry-run compile failed: {}", e);
                None
            }
        }
    }

    // ------------------------------------------------------------------
    // Standalone derivation
    // ------------------------------------------------------------------

    fn standalone_args(&self, state: &mut State, path: &Path, is_cpp: bool) -> Vec<String> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                debug!("Could not read {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let current = fingerprint::attributes_fingerprint(&source);
        if let Some(record) = state.standalone.get(path) {
            if record.fingerprint == current {
                return record.args.clone();
            }
        }

        debug!("Deriving compile arguments for {}", path.display());
        let result = if is_cpp {
            self.executor.source_cpp_dry_run(path)
        } else {
            self.executor.shlib_dry_run(path)
        };
        let args = match result {
            Ok(output) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let combined = format!("{}\n{}", output.stdout, output.stderr);
                scrape_compile_args(&combined, &file_name)
            }
            Err(e) => {
                warn!("Dry-run compile failed for {}: {}", path.display(), e);
                return Vec::new(); // not cached; retried next call
            }
        };

        state.standalone.insert(
            path.to_path_buf(),
            StandaloneRecord {
                fingerprint: current,
                args: args.clone(),
            },
        );
        args
    }

    // ------------------------------------------------------------------
    // Precompiled header
    // ------------------------------------------------------------------

    fn pch_args(&self, state: &mut State, scraped: &[String]) -> Vec<String> {
        if let Some(args) = &state.pch_args {
            return args.clone();
        }
        let args = self.build_precompiled_header(scraped).unwrap_or_default();
        state.pch_args = Some(args.clone());
        args
    }

    /// Parse a `#include <Rcpp.h>` probe once and serialize it, so later
    /// parses of real sources skip re-reading the Rcpp headers.
    fn build_precompiled_header(&self, scraped: &[String]) -> Option<Vec<String>> {
        let api = self.api.as_ref()?;

        let pch_root = self.config.scratch_dir.join("pch");
        let pch_dir = pch_root.join(self.config.clang_version.to_string());
        if !pch_dir.exists() {
            // a version change invalidates headers built by older clangs
            let _ = std::fs::remove_dir_all(&pch_root);
            if let Err(e) = std::fs::create_dir_all(&pch_dir) {
                warn!("Could not create PCH directory: {}", e);
                return None;
            }
        }
        let pch_path = pch_dir.join("Rcpp.pch");

        if !pch_path.exists() {
            let probe_path = pch_dir.join("pch_probe.cpp");
            if let Err(e) = std::fs::write(&probe_path, "#include <Rcpp.h>\n") {
                warn!("Could not write PCH probe: {}", e);
                return None;
            }

            let mut all_args = self.config.baseline_args_cpp.clone();
            all_args.extend(scraped.iter().cloned());
            let c_args: Vec<CString> = all_args
                .iter()
                .filter_map(|arg| CString::new(arg.as_str()).ok())
                .collect();
            let arg_ptrs: Vec<*const std::os::raw::c_char> =
                c_args.iter().map(|arg| arg.as_ptr()).collect();
            let probe_name = CString::new(probe_path.to_string_lossy().as_bytes()).ok()?;
            let pch_name = CString::new(pch_path.to_string_lossy().as_bytes()).ok()?;

            let index = api.create_index(0, 0);
            if index.is_null() {
                return None;
            }
            let tu = api.parse_translation_unit(
                index,
                &probe_name,
                &arg_ptrs,
                &[],
                TRANSLATION_UNIT_FOR_SERIALIZATION,
            );
            if tu.is_null() {
                warn!("PCH probe failed to parse");
                api.dispose_index(index);
                return None;
            }
            let status = api.save_translation_unit(tu, &pch_name, api.default_save_options(tu));
            api.dispose_translation_unit(tu);
            api.dispose_index(index);
            if status != SAVE_ERROR_NONE {
                warn!("PCH serialization failed (status {})", status);
                return None;
            }
            info!("Built precompiled header at {}", pch_path.display());
        }

        Some(vec![
            "-include-pch".to_string(),
            pch_path.display().to_string(),
        ])
    }
}

impl CompilationDatabase for RcppCompilationDatabase {
    fn has_translation_unit(&self, path: &Path) -> bool {
        if !is_source_file(path) {
            return false;
        }
        match &self.config.package_dir {
            Some(dir) => path.starts_with(dir.join("src")),
            None => true,
        }
    }

    fn translation_units(&self) -> Vec<PathBuf> {
        let Some(dir) = &self.config.package_dir else {
            return Vec::new();
        };
        let mut units: Vec<PathBuf> = WalkDir::new(dir.join("src"))
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_source_file(path))
            .collect();
        units.sort();
        units
    }

    fn compile_args_for_translation_unit(&self, path: &Path, is_cpp: bool) -> Vec<String> {
        let mut state = self.lock_state();

        let scraped = match (&self.config.package_dir, self.in_package(path)) {
            (Some(dir), true) => {
                let dir = dir.clone();
                self.package_args(&mut state, &dir)
            }
            _ => self.standalone_args(&mut state, path, is_cpp),
        };

        let mut args = if is_cpp {
            self.config.baseline_args_cpp.clone()
        } else {
            self.config.baseline_args_c.clone()
        };
        if is_cpp {
            args.extend(self.pch_args(&mut state, &scraped));
        }
        args.extend(scraped);
        args
    }

    fn rebuild_package_compilation_database(&self) {
        debug!("Package compilation database invalidated");
        self.lock_state().package_fingerprint = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compdb::dry_run::DryRunOutput;
    use crate::compdb::error::DryRunError;
    use crate::libclang::testing::FakeLibclang;
    use std::fs;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    struct CountingExecutor {
        cpp_runs: AtomicUsize,
        c_runs: AtomicUsize,
        fail: AtomicBool,
        last_probe_source: Mutex<String>,
    }

    impl CountingExecutor {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                cpp_runs: AtomicUsize::new(0),
                c_runs: AtomicUsize::new(0),
                fail: AtomicBool::new(false),
                last_probe_source: Mutex::new(String::new()),
            })
        }

        fn canned_output(path: &Path) -> DryRunOutput {
            let name = path.file_name().unwrap().to_string_lossy();
            let stem = path.file_stem().unwrap().to_string_lossy();
            DryRunOutput {
                stdout: format!(
                    "g++ -std=gnu++14 -I/usr/share/R/include -I\"/usr/lib/R/site-library/Rcpp/include\" -DNDEBUG -fpic -g -O2 -c {name} -o {stem}.o\n"
                ),
                stderr: String::new(),
            }
        }
    }

    impl DryRunExecutor for CountingExecutor {
        fn source_cpp_dry_run(&self, path: &Path) -> Result<DryRunOutput, DryRunError> {
            self.cpp_runs.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(DryRunError::NonZeroExit {
                    status: 1,
                    stderr: "no Rcpp".to_string(),
                });
            }
            if let Ok(source) = fs::read_to_string(path) {
                *self.last_probe_source.lock().unwrap() = source;
            }
            Ok(Self::canned_output(path))
        }

        fn shlib_dry_run(&self, path: &Path) -> Result<DryRunOutput, DryRunError> {
            self.c_runs.fetch_add(1, Ordering::SeqCst);
            Ok(Self::canned_output(path))
        }
    }

    fn package_fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("DESCRIPTION"),
            "Package: demo\nLinkingTo: Rcpp,\n    RcppArmadillo (>= 0.9)\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/Makevars"),
            "PKG_CPPFLAGS = -I. -DPKG_LOCAL\n",
        )
        .unwrap();
        fs::write(dir.path().join("src/demo.cpp"), "#include <Rcpp.h>\n").unwrap();
        dir
    }

    fn resolver_for(
        package: Option<&TempDir>,
        scratch: &TempDir,
        executor: Arc<CountingExecutor>,
    ) -> RcppCompilationDatabase {
        let config = ResolverConfig {
            package_dir: package.map(|d| d.path().to_path_buf()),
            scratch_dir: scratch.path().to_path_buf(),
            baseline_args_c: vec!["-I/builtin".to_string()],
            baseline_args_cpp: vec!["-I/builtin".to_string(), "-x".to_string(), "c++".to_string()],
            clang_version: LibraryVersion::new(14, 0, 6),
        };
        RcppCompilationDatabase::new(config, executor, None)
    }

    fn bump_mtime(path: &Path) {
        let file = fs::File::options().write(true).open(path).unwrap();
        let later = SystemTime::now() + Duration::from_secs(60);
        file.set_times(fs::FileTimes::new().set_modified(later))
            .unwrap();
    }

    #[test]
    fn test_scrape_takes_flags_from_compile_line() {
        let output = "\
R CMD SHLIB stuff
g++ -std=gnu++14 -I/usr/share/R/include -I\"/opt/with space/include\" -DNDEBUG -fpic -c probe.cpp -o probe.o
g++ -shared -o sourceCpp_1.so probe.o
";
        let args = scrape_compile_args(output, "probe.cpp");
        assert_eq!(
            args,
            vec![
                "-std=gnu++14",
                "-I/usr/share/R/include",
                "-I\"/opt/with space/include\"",
                "-DNDEBUG",
                "-fpic",
            ]
        );
    }

    #[test]
    fn test_scrape_ignores_other_lines() {
        let args = scrape_compile_args("g++ -shared -o out.so probe.o\n", "probe.cpp");
        assert!(args.is_empty());
    }

    #[test]
    fn test_parse_linking_to_with_continuation_and_versions() {
        let description = "Package: demo\nLinkingTo: Rcpp,\n    RcppArmadillo (>= 0.9),\n\tBH\nSuggests: testthat\n";
        assert_eq!(
            parse_linking_to(description),
            vec!["Rcpp", "RcppArmadillo", "BH"]
        );
    }

    #[test]
    fn test_package_args_are_fingerprint_gated() {
        let package = package_fixture();
        let scratch = TempDir::new().unwrap();
        let executor = CountingExecutor::new();
        let db = resolver_for(Some(&package), &scratch, Arc::clone(&executor));
        let source = package.path().join("src/demo.cpp");

        let first = db.compile_args_for_translation_unit(&source, true);
        let second = db.compile_args_for_translation_unit(&source, true);

        assert_eq!(first, second);
        assert_eq!(executor.cpp_runs.load(Ordering::SeqCst), 1);

        bump_mtime(&package.path().join("src/Makevars"));
        let _third = db.compile_args_for_translation_unit(&source, true);
        assert_eq!(executor.cpp_runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_package_args_include_scraped_and_makevars_flags() {
        let package = package_fixture();
        let scratch = TempDir::new().unwrap();
        let executor = CountingExecutor::new();
        let db = resolver_for(Some(&package), &scratch, Arc::clone(&executor));
        let source = package.path().join("src/demo.cpp");

        let args = db.compile_args_for_translation_unit(&source, true);

        // baseline first, then scraped, then Makevars
        assert_eq!(args[0], "-I/builtin");
        assert!(args.contains(&"-DNDEBUG".to_string()));
        assert!(args.contains(&"-DPKG_LOCAL".to_string()));
        let rewritten = format!("-I{}", package.path().join("src").display());
        assert!(args.contains(&rewritten));
    }

    #[test]
    fn test_probe_declares_linking_to_dependencies() {
        let package = package_fixture();
        let scratch = TempDir::new().unwrap();
        let executor = CountingExecutor::new();
        let db = resolver_for(Some(&package), &scratch, Arc::clone(&executor));

        let _ = db.compile_args_for_translation_unit(&package.path().join("src/demo.cpp"), true);

        let probe = executor.last_probe_source.lock().unwrap();
        assert!(probe.contains("// [[Rcpp::depends(Rcpp)]]"));
        assert!(probe.contains("// [[Rcpp::depends(RcppArmadillo)]]"));
        assert!(probe.contains("#include <Rcpp.h>"));
    }

    #[test]
    fn test_standalone_args_gated_on_attributes() {
        let scratch = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("script.cpp");
        fs::write(&source, "// [[Rcpp::depends(BH)]]\nint f() { return 1; }\n").unwrap();

        let executor = CountingExecutor::new();
        let db = resolver_for(None, &scratch, Arc::clone(&executor));

        let _ = db.compile_args_for_translation_unit(&source, true);
        // body-only edit: fingerprint unchanged, no new dry run
        fs::write(&source, "// [[Rcpp::depends(BH)]]\nint f() { return 2; }\n").unwrap();
        let _ = db.compile_args_for_translation_unit(&source, true);
        assert_eq!(executor.cpp_runs.load(Ordering::SeqCst), 1);

        // attribute edit: re-derive
        fs::write(&source, "// [[Rcpp::depends(RcppEigen)]]\nint f() { return 2; }\n").unwrap();
        let _ = db.compile_args_for_translation_unit(&source, true);
        assert_eq!(executor.cpp_runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_c_files_route_to_shlib() {
        let scratch = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("impl.c");
        fs::write(&source, "int f(void) { return 1; }\n").unwrap();

        let executor = CountingExecutor::new();
        let db = resolver_for(None, &scratch, Arc::clone(&executor));

        let _ = db.compile_args_for_translation_unit(&source, false);
        assert_eq!(executor.c_runs.load(Ordering::SeqCst), 1);
        assert_eq!(executor.cpp_runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dry_run_failure_degrades_to_baseline_and_retries() {
        let scratch = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("script.cpp");
        fs::write(&source, "int f();\n").unwrap();

        let executor = CountingExecutor::new();
        executor.fail.store(true, Ordering::SeqCst);
        let db = resolver_for(None, &scratch, Arc::clone(&executor));

        let args = db.compile_args_for_translation_unit(&source, true);
        assert_eq!(args, vec!["-I/builtin", "-x", "c++"]);

        // failure is not cached: the next call tries again
        let _ = db.compile_args_for_translation_unit(&source, true);
        assert_eq!(executor.cpp_runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_translation_units_lists_package_sources() {
        let package = package_fixture();
        fs::write(package.path().join("src/extra.c"), "int g(void);\n").unwrap();
        fs::write(package.path().join("src/notes.txt"), "not code\n").unwrap();
        let scratch = TempDir::new().unwrap();
        let db = resolver_for(Some(&package), &scratch, CountingExecutor::new());

        let units = db.translation_units();
        assert_eq!(units.len(), 2);
        assert!(units.iter().all(|u| db.has_translation_unit(u)));
        assert!(!db.has_translation_unit(&package.path().join("src/notes.txt")));
    }

    #[test]
    fn test_rebuild_forces_rederivation() {
        let package = package_fixture();
        let scratch = TempDir::new().unwrap();
        let executor = CountingExecutor::new();
        let db = resolver_for(Some(&package), &scratch, Arc::clone(&executor));
        let source = package.path().join("src/demo.cpp");

        let _ = db.compile_args_for_translation_unit(&source, true);
        db.rebuild_package_compilation_database();
        let _ = db.compile_args_for_translation_unit(&source, true);
        assert_eq!(executor.cpp_runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_pch_built_once_when_library_available() {
        let scratch = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("script.cpp");
        fs::write(&source, "int f();\n").unwrap();

        let fake = Arc::new(FakeLibclang::new("clang version 14.0.6"));
        let api: Arc<dyn LibclangApi> = fake.clone();
        let config = ResolverConfig {
            package_dir: None,
            scratch_dir: scratch.path().to_path_buf(),
            baseline_args_c: vec![],
            baseline_args_cpp: vec![],
            clang_version: LibraryVersion::new(14, 0, 6),
        };
        let db = RcppCompilationDatabase::new(config, CountingExecutor::new(), Some(api));

        let args = db.compile_args_for_translation_unit(&source, true);
        assert!(args.contains(&"-include-pch".to_string()));
        assert_eq!(fake.saves.load(Ordering::SeqCst), 1);

        // cached: no second serialization
        let _ = db.compile_args_for_translation_unit(&source, true);
        assert_eq!(fake.saves.load(Ordering::SeqCst), 1);
        // probe parse and index are balanced out
        assert_eq!(fake.parses(), fake.tu_disposals());
        assert_eq!(
            fake.indexes_created.load(Ordering::SeqCst),
            fake.indexes_disposed.load(Ordering::SeqCst)
        );
    }

    #[test]
    fn test_no_pch_for_c_sources() {
        let scratch = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("impl.c");
        fs::write(&source, "int f(void);\n").unwrap();

        let fake = Arc::new(FakeLibclang::new("clang version 14.0.6"));
        let api: Arc<dyn LibclangApi> = fake.clone();
        let config = ResolverConfig {
            package_dir: None,
            scratch_dir: scratch.path().to_path_buf(),
            baseline_args_c: vec![],
            baseline_args_cpp: vec![],
            clang_version: LibraryVersion::new(14, 0, 6),
        };
        let db = RcppCompilationDatabase::new(config, CountingExecutor::new(), Some(api));

        let args = db.compile_args_for_translation_unit(&source, false);
        assert!(!args.contains(&"-include-pch".to_string()));
        assert_eq!(fake.saves.load(Ordering::SeqCst), 0);
    }
}
