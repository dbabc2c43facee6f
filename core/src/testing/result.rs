use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Verdict {
    /// Accepted
    AC,
    /// Wrong answer, including `Error: ...` lines printed by the driver
    WA,
    /// Time limit exceeded
    TLE,
    /// Runtime error: the interpreter exited nonzero
    RE,
    /// Internal error: the runner itself failed
    IE,
}

/// What the runner observed for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub success: bool,
    /// Trimmed stdout, present only on a zero exit
    pub output: Option<String>,
    pub error: Option<String>,
    pub elapsed: Duration,
    /// `None` on a zero exit: only the judge knows whether the output is right.
    pub failure: Option<Verdict>,
}

impl RunReport {
    pub(crate) fn exited_ok(stdout: &str, elapsed: Duration) -> Self {
        Self {
            success: true,
            output: Some(stdout.trim().to_owned()),
            error: None,
            elapsed,
            failure: None,
        }
    }

    pub(crate) fn exited_ng(stderr: &str, elapsed: Duration) -> Self {
        let stderr = stderr.trim();
        let error = if stderr.is_empty() {
            "Runtime error occurred".to_owned()
        } else {
            stderr.to_owned()
        };
        Self {
            success: false,
            output: None,
            error: Some(error),
            elapsed,
            failure: Some(Verdict::RE),
        }
    }

    pub(crate) fn timed_out(limit: Duration) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(format!(
                "Code execution timed out after {} seconds",
                limit.as_secs_f64()
            )),
            elapsed: limit,
            failure: Some(Verdict::TLE),
        }
    }

    pub(crate) fn internal_error(e: &anyhow::Error) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(format!("Execution error: {:#}", e)),
            elapsed: Duration::ZERO,
            failure: Some(Verdict::IE),
        }
    }

    /// Verdict against an expected output (compared after trimming both sides).
    pub fn verdict(&self, expected_output: &str) -> Verdict {
        if let Some(v) = self.failure {
            return v;
        }
        match &self.output {
            Some(actual) if actual == expected_output.trim() => Verdict::AC,
            _ => Verdict::WA,
        }
    }
}
