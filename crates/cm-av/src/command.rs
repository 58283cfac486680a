//! Builder for executing external tool commands with timeout support.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// Default command timeout: 5 minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// How long to keep reading stderr after the child has exited. A descendant
/// that inherited the pipe can hold it open indefinitely.
const STDERR_GRACE: Duration = Duration::from_secs(1);

/// How a single tool invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The process exited on its own.
    Completed {
        /// Exit code, or -1 if the process was terminated by a signal.
        exit_code: i32,
        /// Captured standard error (lossy UTF-8).
        stderr: String,
    },
    /// The process outlived its deadline and was killed.
    TimedOut {
        /// The deadline that was exceeded.
        after: Duration,
    },
}

impl ExecutionOutcome {
    /// True when the process exited with code 0.
    pub fn success(&self) -> bool {
        matches!(self, ExecutionOutcome::Completed { exit_code: 0, .. })
    }
}

/// A builder for constructing and executing external tool invocations.
///
/// Arguments are kept as a discrete list and handed straight to the OS;
/// no shell is involved. The child's stdin is bound to null so a tool that
/// tries to prompt (ffmpeg does, on overwrite) can never hang the caller.
///
/// # Example
///
/// ```no_run
/// use cm_av::{ExecutionOutcome, ToolCommand};
/// use std::path::PathBuf;
///
/// # async fn example() -> cm_core::Result<()> {
/// let outcome = ToolCommand::new(PathBuf::from("ffmpeg"))
///     .arg("-y")
///     .args(["-i", "/media/in.wav"])
///     .arg("/media/out.aac")
///     .run()
///     .await?;
/// if let ExecutionOutcome::Completed { exit_code, .. } = outcome {
///     println!("ffmpeg exited with {exit_code}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    /// The program that will be executed.
    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    /// Arguments, excluding the program itself.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// The configured deadline.
    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }

    /// Full argument vector with the program as element zero.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Short tool name for messages (file name of the program path).
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Run the command once, waiting at most the configured timeout.
    ///
    /// A non-zero exit is *not* an error here; it is reported through
    /// [`ExecutionOutcome::Completed`] so the caller can decide. On timeout
    /// the child is killed and reaped before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`cm_core::Error::Tool`] if the process cannot be spawned or
    /// waited on.
    pub async fn run(&self) -> cm_core::Result<ExecutionOutcome> {
        let program_name = self.program_name();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| cm_core::Error::tool(&program_name, format!("failed to spawn: {e}")))?;

        // Drain stderr concurrently so a chatty tool never blocks on a full pipe.
        let captured = Arc::new(Mutex::new(Vec::new()));
        let stderr_reader = child.stderr.take().map(|mut pipe| {
            let captured = Arc::clone(&captured);
            tokio::spawn(async move {
                let mut chunk = [0u8; 4096];
                loop {
                    match pipe.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            if let Ok(mut buf) = captured.lock() {
                                buf.extend_from_slice(&chunk[..n]);
                            }
                        }
                    }
                }
            })
        });

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => {
                if let Some(mut handle) = stderr_reader {
                    if tokio::time::timeout(STDERR_GRACE, &mut handle).await.is_err() {
                        tracing::debug!("{program_name} exited but its stderr is still open");
                        handle.abort();
                    }
                }
                let exit_code = status.code().unwrap_or(-1);
                tracing::debug!("{program_name} exited with code {exit_code}");
                Ok(ExecutionOutcome::Completed {
                    exit_code,
                    stderr: take_captured(&captured),
                })
            }
            Ok(Err(e)) => {
                if let Some(handle) = stderr_reader {
                    handle.abort();
                }
                Err(cm_core::Error::tool(
                    program_name,
                    format!("I/O error waiting for process: {e}"),
                ))
            }
            Err(_elapsed) => {
                // kill() also waits, so the child is reaped once this returns.
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill timed-out {program_name}: {e}");
                }
                if let Some(handle) = stderr_reader {
                    handle.abort();
                }
                tracing::warn!("{program_name} timed out after {:?}", self.timeout);
                Ok(ExecutionOutcome::TimedOut {
                    after: self.timeout,
                })
            }
        }
    }
}

/// Everything the stderr reader has collected so far, as lossy UTF-8.
fn take_captured(captured: &Mutex<Vec<u8>>) -> String {
    captured
        .lock()
        .map(|buf| String::from_utf8_lossy(&buf).into_owned())
        .unwrap_or_default()
}
