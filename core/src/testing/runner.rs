use std::{
    io,
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use anyhow::Context as _;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::Command,
    time::Instant,
};

use super::{driver, result::RunReport};
use crate::literal;
use crate::model::EntryPoint;

/// Runs a submission for one testcase input in its own interpreter process.
///
/// Every call owns its child process, its temporary program file and its deadline
/// timer, so concurrent calls never interfere with each other.
#[derive(Debug, Clone)]
pub struct CodeRunner {
    interpreter: PathBuf,
    stdout_capture_max_bytes: usize,
    stderr_capture_max_bytes: usize,
}

impl Default for CodeRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeRunner {
    const DEFAULT_INTERPRETER: &str = "python3";
    const DEFAULT_CAPTURE_MAX_BYTES: usize = 64 * 1024;

    pub fn new() -> Self {
        Self {
            interpreter: Self::DEFAULT_INTERPRETER.into(),
            stdout_capture_max_bytes: Self::DEFAULT_CAPTURE_MAX_BYTES,
            stderr_capture_max_bytes: Self::DEFAULT_CAPTURE_MAX_BYTES,
        }
    }

    pub fn interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn stdout_capture_max_bytes(mut self, n: usize) -> Self {
        self.stdout_capture_max_bytes = n;
        self
    }

    pub fn stderr_capture_max_bytes(mut self, n: usize) -> Self {
        self.stderr_capture_max_bytes = n;
        self
    }

    pub fn get_interpreter(&self) -> &Path {
        &self.interpreter
    }

    /// Never fails: problems of the runner itself are reported as an `IE` report.
    pub async fn run(
        &self,
        code: &str,
        input_text: &str,
        entry: &EntryPoint,
        time_limit: Duration,
    ) -> RunReport {
        self.try_run(code, input_text, entry, time_limit)
            .await
            .unwrap_or_else(|e| {
                log::error!("Code execution error: {:#}", e);
                RunReport::internal_error(&e)
            })
    }

    async fn try_run(
        &self,
        code: &str,
        input_text: &str,
        entry: &EntryPoint,
        time_limit: Duration,
    ) -> anyhow::Result<RunReport> {
        let args = literal::normalize(input_text);
        let source =
            driver::render(code, &args, entry).context("Failed to generate driver program")?;

        // removed on drop, whichever way this function returns
        let program = tempfile::Builder::new()
            .prefix("pjudge-")
            .suffix(".py")
            .tempfile()
            .context("Failed to create temporary program file")?;
        tokio::fs::write(program.path(), source)
            .await
            .with_context(|| format!("Failed to write {}", program.path().to_string_lossy()))?;

        self.exec_program(program.path(), time_limit).await
    }

    async fn exec_program(&self, program: &Path, time_limit: Duration) -> anyhow::Result<RunReport> {
        let start_at = Instant::now();

        let mut proc = Command::new(&self.interpreter)
            .arg(program)
            .env("PYTHONIOENCODING", "utf-8")
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| {
                format!(
                    "Failed to spawn '{} {}'",
                    self.interpreter.to_string_lossy(),
                    program.to_string_lossy()
                )
            })?;
        log::debug!("Spawned pid={:?} for {}", proc.id(), program.to_string_lossy());

        let mut stdout = proc.stdout.take().context("Failed to open stdout")?;
        let mut stderr = proc.stderr.take().context("Failed to open stderr")?;

        let res = tokio::time::timeout(time_limit, async {
            tokio::try_join!(
                read_capped(&mut stdout, self.stdout_capture_max_bytes),
                read_capped(&mut stderr, self.stderr_capture_max_bytes),
                proc.wait(),
            )
            .context("Failed to communicate with subprocess")
        })
        .await;

        let elapsed = start_at.elapsed();

        match res {
            Err(_) => {
                // partial output is discarded on purpose.
                // Only the interpreter itself is killed; processes it spawned are not tracked.
                proc.kill()
                    .await
                    .unwrap_or_else(|e| log::warn!("Failed to kill TLE process: {:#}", e));
                Ok(RunReport::timed_out(time_limit))
            }

            Ok(Err(e)) => Err(e),

            Ok(Ok((stdout_buf, stderr_buf, exit_status))) => {
                log::debug!("Exited with {} in {}ms", exit_status, elapsed.as_millis());
                if exit_status.success() {
                    Ok(RunReport::exited_ok(
                        &String::from_utf8_lossy(&stdout_buf),
                        elapsed,
                    ))
                } else {
                    Ok(RunReport::exited_ng(
                        &String::from_utf8_lossy(&stderr_buf),
                        elapsed,
                    ))
                }
            }
        }
    }
}

/// Read until EOF keeping at most `max_bytes`; the rest is drained and dropped
/// so the child never blocks on a full pipe.
async fn read_capped<R>(reader: &mut R, max_bytes: usize) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut dropped = 0usize;
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        let room = max_bytes.saturating_sub(buf.len());
        let kept = n.min(room);
        buf.extend_from_slice(&chunk[..kept]);
        dropped += n - kept;
    }
    if dropped > 0 {
        log::debug!("Dropped {} bytes of output over the {} bytes cap", dropped, max_bytes);
    }
    Ok(buf)
}
