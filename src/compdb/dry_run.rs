//! Dry-run compile subprocess execution
//!
//! Compile flags are derived by asking the R build tooling what it *would*
//! run: `Rcpp::sourceCpp(dryRun = TRUE)` for C++ sources and
//! `R CMD SHLIB --dry-run` for C sources. Both print the compiler invocation
//! without compiling; the resolver scrapes flags out of that text.
//!
//! The subprocess is synchronous and can take seconds on a cold R start, so
//! every invocation runs under a wall-clock timeout; an expired process is
//! killed and reported as a timeout rather than hanging the session.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

use super::error::DryRunError;

pub const DEFAULT_DRY_RUN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct DryRunOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Seam over the dry-run subprocess so tests can substitute canned output
/// and count invocations.
pub trait DryRunExecutor: Send + Sync {
    /// `Rcpp::sourceCpp(<path>, showOutput = TRUE, dryRun = TRUE)`.
    fn source_cpp_dry_run(&self, path: &Path) -> Result<DryRunOutput, DryRunError>;

    /// `R CMD SHLIB --dry-run <file>`, run from the file's directory.
    fn shlib_dry_run(&self, path: &Path) -> Result<DryRunOutput, DryRunError>;
}

/// Production executor shelling out to the R installation.
pub struct RScriptExecutor {
    rscript_path: PathBuf,
    r_path: PathBuf,
    /// `--vanilla` when true, `--no-save --no-restore` otherwise (profiles
    /// that set up library paths still need to run in the latter mode).
    vanilla: bool,
    timeout: Duration,
}

impl RScriptExecutor {
    pub fn new(rscript_path: PathBuf, r_path: PathBuf, vanilla: bool) -> Self {
        Self {
            rscript_path,
            r_path,
            vanilla,
            timeout: DEFAULT_DRY_RUN_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn run(&self, mut command: Command, program: &str) -> Result<DryRunOutput, DryRunError> {
        debug!("Running dry-run compile: {:?}", command);
        let child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DryRunError::launch_failed(program, e))?;
        wait_with_timeout(child, self.timeout)
    }
}

impl DryRunExecutor for RScriptExecutor {
    fn source_cpp_dry_run(&self, path: &Path) -> Result<DryRunOutput, DryRunError> {
        // forward slashes keep the path safe inside the R string literal
        let r_path = path.to_string_lossy().replace('\\', "/").replace('\'', "\\'");
        let expr = format!(
            "Rcpp::sourceCpp('{}', showOutput = TRUE, dryRun = TRUE)",
            r_path
        );

        let mut command = Command::new(&self.rscript_path);
        command.arg("--slave");
        if self.vanilla {
            command.arg("--vanilla");
        } else {
            command.args(["--no-save", "--no-restore"]);
        }
        command.arg("-e").arg(expr);
        self.run(command, "Rscript")
    }

    fn shlib_dry_run(&self, path: &Path) -> Result<DryRunOutput, DryRunError> {
        let mut command = Command::new(&self.r_path);
        command.args(["CMD", "SHLIB", "--dry-run"]);
        if let Some(file_name) = path.file_name() {
            command.arg(file_name);
        } else {
            command.arg(path);
        }
        if let Some(parent) = path.parent() {
            command.current_dir(parent);
        }
        self.run(command, "R")
    }
}

/// Poll the child until it exits or the deadline passes; kill on expiry.
/// Output pipes are drained on reader threads so a chatty child cannot
/// block on a full pipe.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<DryRunOutput, DryRunError> {
    let stdout_reader = child.stdout.take().map(spawn_pipe_reader);
    let stderr_reader = child.stderr.take().map(spawn_pipe_reader);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(DryRunError::TimedOut { timeout });
                }
                std::thread::sleep(Duration::from_millis(50));
            }
        }
    };

    let stdout = join_pipe_reader(stdout_reader);
    let stderr = join_pipe_reader(stderr_reader);

    if !status.success() {
        return Err(DryRunError::NonZeroExit {
            status: status.code().unwrap_or(-1),
            stderr,
        });
    }

    Ok(DryRunOutput { stdout, stderr })
}

fn spawn_pipe_reader<R: Read + Send + 'static>(mut pipe: R) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

fn join_pipe_reader(handle: Option<std::thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor_with(program: &str, timeout: Duration) -> RScriptExecutor {
        RScriptExecutor::new(PathBuf::from(program), PathBuf::from(program), true)
            .with_timeout(timeout)
    }

    #[test]
    fn test_launch_failure_is_reported() {
        let executor = executor_with("/definitely/not/rscript", DEFAULT_DRY_RUN_TIMEOUT);
        let result = executor.source_cpp_dry_run(Path::new("/tmp/probe.cpp"));
        assert!(matches!(result, Err(DryRunError::LaunchFailed { .. })));
    }

    #[test]
    fn test_timeout_kills_hung_process() {
        // `sleep` accepts the extra arguments and just hangs, standing in
        // for a wedged R session
        let executor = executor_with("/bin/sleep", Duration::from_millis(200));
        let mut command = Command::new("/bin/sleep");
        command.arg("60");
        let started = Instant::now();
        let result = executor.run(command, "sleep");
        assert!(matches!(result, Err(DryRunError::TimedOut { .. })));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_captures_stdout() {
        let executor = executor_with("/bin/echo", DEFAULT_DRY_RUN_TIMEOUT);
        let mut command = Command::new("/bin/echo");
        command.arg("g++ -I/usr/include -c probe.cpp -o probe.o");
        let output = executor.run(command, "echo").unwrap();
        assert!(output.stdout.contains("-c probe.cpp -o probe.o"));
    }

    #[test]
    fn test_nonzero_exit_carries_stderr() {
        let executor = executor_with("/bin/sh", DEFAULT_DRY_RUN_TIMEOUT);
        let mut command = Command::new("/bin/sh");
        command.args(["-c", "echo boom >&2; exit 3"]);
        match executor.run(command, "sh") {
            Err(DryRunError::NonZeroExit { status, stderr }) => {
                assert_eq!(status, 3);
                assert!(stderr.contains("boom"));
            }
            other => panic!("expected NonZeroExit, got {:?}", other.map(|_| ())),
        }
    }
}
