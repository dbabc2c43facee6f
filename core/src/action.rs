use crate::catalog::{CatalogError, ProblemCatalog};
use crate::model::{ExecutionResult, Submission, SubmissionRecord};
use crate::store::{StoreError, SubmissionStore};
use crate::testing::Judge;

#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error("Problem not found: '{0}'")]
    ProblemNotFound(String),

    #[error("Catalog lookup failed: {0}")]
    Catalog(#[source] CatalogError),

    #[error("Failed to record submission: {0}")]
    Store(#[from] StoreError),
}

impl From<CatalogError> for ExecuteError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(id) => Self::ProblemNotFound(id),
            e => Self::Catalog(e),
        }
    }
}

/// Judge a submission against its problem and record it.
///
/// However badly the submitted code behaves, a known problem always yields an
/// `ExecutionResult`. Only an unknown problem id or a collaborator failure is an error.
pub async fn execute(
    catalog: &dyn ProblemCatalog,
    store: &dyn SubmissionStore,
    judge: &Judge,
    submission: Submission,
) -> Result<ExecutionResult, ExecuteError> {
    let problem = catalog.find(&submission.problem_id)?;

    if !submission
        .language
        .eq_ignore_ascii_case(Submission::EXECUTED_LANGUAGE)
    {
        log::warn!(
            "Language '{}' is not supported; running the code as {}",
            submission.language,
            Submission::EXECUTED_LANGUAGE
        );
    }

    let result = judge.judge(problem, &submission).await;

    store
        .append(SubmissionRecord::new(submission, result.clone()))
        .await?;
    Ok(result)
}
