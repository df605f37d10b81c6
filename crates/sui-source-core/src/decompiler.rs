//! External decompiler invocation.
//!
//! [`Decompiler`] is the only thing the pipeline knows about decompilation.
//! [`RevelaDecompiler`] implements it by running `revela -b <file>` as a
//! subprocess with a wall-clock limit, capturing stdout and stderr separately.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info};

/// Where operators can get the decompiler.
pub const REVELA_RELEASES_URL: &str = "https://github.com/verichains/revela/releases/tag/v1.0.0";

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum DecompileError {
    #[error("decompiler binary {binary:?} not found")]
    Unavailable { binary: String },
    #[error("decompiler timed out after {0:?}")]
    Timeout(Duration),
    #[error("decompiler exited with code {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
    #[error("decompiler produced no output")]
    EmptyOutput,
    #[error("failed to run decompiler: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns one bytecode file into source text.
pub trait Decompiler: Send + Sync {
    fn decompile(&self, bytecode_path: &Path) -> Result<String, DecompileError>;
}

/// Runs the `revela` executable.
#[derive(Debug, Clone)]
pub struct RevelaDecompiler {
    binary: PathBuf,
    timeout: Duration,
    probe_timeout: Duration,
}

impl RevelaDecompiler {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            probe_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Check the binary runs: `<binary> --help` must exit 0 within the probe timeout.
    pub fn probe(&self) -> Result<(), DecompileError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--help");
        let output = run_with_timeout(&mut cmd, &self.binary, self.probe_timeout)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(DecompileError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Decompiler for RevelaDecompiler {
    fn decompile(&self, bytecode_path: &Path) -> Result<String, DecompileError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-b").arg(bytecode_path);
        debug!(binary = %self.binary.display(), path = %bytecode_path.display(), "running decompiler");

        let output = match run_with_timeout(&mut cmd, &self.binary, self.timeout) {
            Ok(output) => output,
            Err(e @ DecompileError::Timeout(_)) => {
                error!(path = %bytecode_path.display(), "revela command timed out");
                return Err(e);
            }
            Err(e @ DecompileError::Unavailable { .. }) => {
                error!("revela binary not found. Make sure it's installed and in PATH.");
                info!("For local testing without revela, install it from: {REVELA_RELEASES_URL}");
                return Err(e);
            }
            Err(e) => {
                error!(error = %e, "error running revela");
                return Err(e);
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(code = ?output.status.code(), %stderr, "revela failed");
            return Err(DecompileError::Failed {
                code: output.status.code(),
                stderr,
            });
        }

        let source = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if source.is_empty() {
            return Err(DecompileError::EmptyOutput);
        }
        Ok(source)
    }
}

struct CapturedOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// Spawn `cmd`, drain its pipes on reader threads and wait at most `timeout`.
///
/// On timeout the child's whole process group is killed and the child reaped
/// before returning. Reader threads are detached rather than joined, so a
/// descendant that escaped the kill and still holds the pipes cannot stall
/// the caller.
fn run_with_timeout(
    cmd: &mut Command,
    binary: &Path,
    timeout: Duration,
) -> Result<CapturedOutput, DecompileError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let mut child = cmd.spawn().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DecompileError::Unavailable {
            binary: binary.display().to_string(),
        },
        _ => DecompileError::Io(e),
    })?;

    let stdout_handle = drain(child.stdout.take());
    let stderr_handle = drain(child.stderr.take());

    let status = match wait_with_deadline(&mut child, timeout) {
        Ok(status) => status,
        Err(e) => {
            drop(stdout_handle);
            drop(stderr_handle);
            return Err(e);
        }
    };

    Ok(CapturedOutput {
        status,
        stdout: stdout_handle.join().unwrap_or_default(),
        stderr: stderr_handle.join().unwrap_or_default(),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<ExitStatus, DecompileError> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if start.elapsed() >= timeout {
            kill_process_group(child);
            let _ = child.kill();
            let _ = child.wait();
            return Err(DecompileError::Timeout(timeout));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Wrapper scripts fork; their descendants share the child's process group.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    if let Ok(pid) = i32::try_from(child.id()) {
        // SAFETY: plain signal delivery to the group created at spawn.
        let rc = unsafe { libc::kill(-pid, libc::SIGKILL) };
        if rc != 0 {
            debug!(pid, error = %std::io::Error::last_os_error(), "failed to kill process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}
