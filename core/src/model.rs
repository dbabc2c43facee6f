use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::testing::Verdict;

pub type ProblemId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub sample_input: String,
    pub sample_output: String,
    pub entry_point: EntryPoint,
    pub test_cases: Vec<TestCase>,

    /// Seconds
    #[serde(default = "Problem::default_time_limit")]
    pub time_limit: u64,
}

impl Problem {
    pub const DEFAULT_TIME_LIMIT: u64 = 5;

    fn default_time_limit() -> u64 {
        Self::DEFAULT_TIME_LIMIT
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.time_limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

/// The single function a problem expects the submission to define.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub function: String,
    pub kind: EntryKind,
}

/// How the normalized input is shaped into the entry point's arguments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    /// `f(args[0], args[1])`, e.g. `two_sum(nums, target)`
    Pair,
    /// `f(str(args))`, e.g. `is_palindrome(s)`
    Text,
    /// `f(int(args))`, e.g. `fibonacci(n)`
    Integer,
}

impl EntryPoint {
    pub fn new(function: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            function: function.into(),
            kind,
        }
    }

    /// Whether `function` can be named in Python source as is.
    pub fn is_valid_identifier(&self) -> bool {
        let mut chars = self.function.chars();
        let Some(head) = chars.next() else {
            return false
        };
        (head.is_ascii_alphabetic() || head == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub problem_id: ProblemId,
    pub code: String,
    #[serde(default = "Submission::default_language")]
    pub language: String,
}

impl Submission {
    pub const EXECUTED_LANGUAGE: &str = "python";

    fn default_language() -> String {
        Self::EXECUTED_LANGUAGE.to_owned()
    }

    pub fn new(problem_id: impl Into<ProblemId>, code: impl Into<String>) -> Self {
        Self {
            problem_id: problem_id.into(),
            code: code.into(),
            language: Self::default_language(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub output: Option<String>,
    pub error: Option<String>,
    #[serde(with = "secs_f64")]
    pub execution_time: Duration,
    pub test_results: Vec<TestCaseResult>,
    pub total_passed: usize,
    pub total_tests: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    /// 1-based
    pub test_case: usize,
    pub input: String,
    pub expected_output: String,
    pub actual_output: String,
    pub passed: bool,
    pub error: Option<String>,
    #[serde(with = "secs_f64")]
    pub execution_time: Duration,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub problem_id: ProblemId,
    pub code: String,
    pub language: String,
    pub result: ExecutionResult,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(submission: Submission, result: ExecutionResult) -> Self {
        let Submission {
            problem_id,
            code,
            language,
        } = submission;
        Self {
            id: Uuid::new_v4(),
            problem_id,
            code,
            language,
            result,
            submitted_at: Utc::now(),
        }
    }
}

/// (De)serialize a `Duration` as floating-point seconds.
pub mod secs_f64 {
    use std::time::Duration;

    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn entry_point_identifier() {
        assert!(EntryPoint::new("two_sum", EntryKind::Pair).is_valid_identifier());
        assert!(EntryPoint::new("_f2", EntryKind::Text).is_valid_identifier());
        assert!(!EntryPoint::new("", EntryKind::Text).is_valid_identifier());
        assert!(!EntryPoint::new("2fast", EntryKind::Text).is_valid_identifier());
        assert!(!EntryPoint::new("f(); import os", EntryKind::Text).is_valid_identifier());
    }

    #[test]
    fn problem_time_limit_defaults_to_5_seconds() {
        let json = r#"{
            "id": "p", "title": "P", "description": "", "difficulty": "Easy",
            "sample_input": "1", "sample_output": "1",
            "entry_point": {"function": "f", "kind": "integer"},
            "test_cases": [{"input": "1", "expected_output": "1"}]
        }"#;
        let p: Problem = serde_json::from_str(json).unwrap();
        assert_eq!(p.time_limit, 5);
        assert_eq!(p.deadline(), Duration::from_secs(5));
        assert_eq!(p.entry_point.kind, EntryKind::Integer);
    }

    #[test]
    fn submission_language_defaults_to_python() {
        let s: Submission = serde_json::from_str(r#"{"problem_id": "x", "code": ""}"#).unwrap();
        assert_eq!(s.language, "python");
    }

    #[test]
    fn execution_time_serializes_as_seconds() {
        let r = TestCaseResult {
            test_case: 1,
            input: "7".into(),
            expected_output: "13".into(),
            actual_output: "13".into(),
            passed: true,
            error: None,
            execution_time: Duration::from_millis(1500),
            verdict: Verdict::AC,
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["execution_time"], serde_json::json!(1.5));
        assert_eq!(v["verdict"], serde_json::json!("AC"));
        assert_eq!(v["test_case"], serde_json::json!(1));

        let back: TestCaseResult = serde_json::from_value(v).unwrap();
        assert_eq!(back, r);
    }
}
