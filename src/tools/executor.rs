//! Child-process execution with captured output and an optional deadline.
//!
//! A non-zero exit status is data, not an error: several wrapped tools exit
//! non-zero on benign warnings while still writing a usable report, so the
//! real success determination belongs to the artifact verifier. Only a spawn
//! fault or an exceeded deadline comes back as an error.

use std::ffi::OsString;
use std::io::Read;
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::tools::runtime::ExecutionEnvironment;
use crate::{CaduceusError, Result};

/// Captured outcome of one child process run.
#[derive(Debug, Clone)]
pub struct ExecutionOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionOutput {
    /// Stdout and stderr joined, the way installer logs are recorded.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
            (false, true) => self.stdout.clone(),
            _ => self.stderr.clone(),
        }
    }
}

/// Run `program` with `args`, an environment overlay, and an optional working
/// directory, capturing stdout and stderr separately.
///
/// With a timeout, the child is killed and reaped once the deadline passes
/// and the call reports `Timeout` for `tool` instead of hanging.
pub fn run_command(
    tool: &str,
    program: &Path,
    args: &[OsString],
    env: &ExecutionEnvironment,
    cwd: Option<&Path>,
    timeout: Option<Duration>,
) -> Result<ExecutionOutput> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    env.apply(&mut cmd);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    // The child becomes its own process-group leader so a timeout can take
    // down everything it spawned (FastQC is a wrapper around a JVM).
    #[cfg(unix)]
    cmd.process_group(0);

    debug!(tool, program = %program.display(), ?args, "spawning child process");
    let mut child = cmd.spawn()?;

    // Drain both pipes concurrently so a chatty child can't deadlock on a
    // full pipe buffer while we wait on the other stream.
    let stdout_reader = spawn_reader(child.stdout.take());
    let stderr_reader = spawn_reader(child.stderr.take());

    let status = wait_with_deadline(tool, &mut child, timeout)?;

    let stdout = collect(stdout_reader);
    let stderr = collect(stderr_reader);
    debug!(tool, code = ?status.code(), "child process exited");

    Ok(ExecutionOutput {
        exit_code: status.code(),
        success: status.success(),
        stdout,
        stderr,
    })
}

fn spawn_reader<R: Read + Send + 'static>(stream: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    stream.map(|mut reader| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).ok();
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}

/// Wait for the child, polling `try_wait` so a deadline can interrupt the
/// wait. On timeout the child is killed and reaped before returning.
fn wait_with_deadline(
    tool: &str,
    child: &mut Child,
    timeout: Option<Duration>,
) -> Result<ExitStatus> {
    let Some(limit) = timeout else {
        return Ok(child.wait()?);
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if start.elapsed() >= limit {
            kill_process_tree(child);
            child.wait().ok();
            return Err(CaduceusError::Timeout {
                tool: tool.to_string(),
                seconds: limit.as_secs(),
            });
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

/// Kill the child and everything it spawned. The child is its own group
/// leader, so signaling its group reaches grandchildren too.
#[cfg(unix)]
fn kill_process_tree(child: &mut Child) {
    let pgid = child.id() as libc::pid_t;
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
    child.kill().ok();
}

#[cfg(not(unix))]
fn kill_process_tree(child: &mut Child) {
    child.kill().ok();
}

/// How long a version probe may take before it is abandoned.
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Ask an executable for its version. Some tools (Java among them) print it
/// on stderr, so whichever stream has content wins.
pub fn probe_version(name: &str, exe: &Path, version_arg: &str) -> Option<String> {
    let args = [OsString::from(version_arg)];
    let output = run_command(
        name,
        exe,
        &args,
        &ExecutionEnvironment::new(),
        None,
        Some(VERSION_PROBE_TIMEOUT),
    )
    .ok()?;
    first_nonempty_line(&output)
}

fn first_nonempty_line(output: &ExecutionOutput) -> Option<String> {
    let text = if output.stdout.trim().is_empty() {
        output.stderr.trim()
    } else {
        output.stdout.trim()
    };
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}
