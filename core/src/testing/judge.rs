use std::time::Duration;

use crate::model::{ExecutionResult, Problem, Submission, TestCase, TestCaseResult};

use super::{result::Verdict, runner::CodeRunner};

/// Judges a submission against every testcase of a problem, in declared order.
#[derive(Debug, Clone, Default)]
pub struct Judge {
    runner: CodeRunner,
}

impl Judge {
    pub fn new(runner: CodeRunner) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &CodeRunner {
        &self.runner
    }

    /// Runs all testcases sequentially, even after a failure or a timeout.
    pub async fn judge(&self, problem: &Problem, submission: &Submission) -> ExecutionResult {
        let mut test_results = Vec::with_capacity(problem.test_cases.len());
        for (i, t) in problem.test_cases.iter().enumerate() {
            let res = self.judge_testcase(problem, submission, i + 1, t).await;
            log::debug!(
                "{} #{}: {} [{}ms]",
                problem.id,
                res.test_case,
                res.verdict,
                res.execution_time.as_millis()
            );
            test_results.push(res);
        }

        let total_tests = test_results.len();
        let total_passed = test_results.iter().filter(|r| r.passed).count();
        let execution_time: Duration = test_results.iter().map(|r| r.execution_time).sum();

        log::info!(
            "Judged {}: passed {}/{} in {}ms",
            problem.id,
            total_passed,
            total_tests,
            execution_time.as_millis()
        );

        ExecutionResult {
            success: total_passed == total_tests,
            output: Some(format!(
                "Passed {}/{} test cases",
                total_passed, total_tests
            )),
            error: None,
            execution_time,
            test_results,
            total_passed,
            total_tests,
        }
    }

    async fn judge_testcase(
        &self,
        problem: &Problem,
        submission: &Submission,
        ord: usize,
        t: &TestCase,
    ) -> TestCaseResult {
        let report = self
            .runner
            .run(
                &submission.code,
                &t.input,
                &problem.entry_point,
                problem.deadline(),
            )
            .await;

        let verdict = report.verdict(&t.expected_output);
        TestCaseResult {
            test_case: ord,
            input: t.input.clone(),
            expected_output: t.expected_output.trim().to_owned(),
            actual_output: report.output.unwrap_or_default(),
            passed: verdict == Verdict::AC,
            error: report.error,
            execution_time: report.elapsed,
            verdict,
        }
    }
}
