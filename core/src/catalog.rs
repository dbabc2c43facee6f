use std::collections::HashSet;
use std::path::Path;

use crate::config::Asset;
use crate::model::Problem;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Problem not found: '{0}'")]
    NotFound(String),

    #[error("Duplicate problem id '{0}'")]
    DuplicateId(String),

    #[error("Problem '{id}' declares an invalid entry point function name '{function}'")]
    InvalidEntryPoint { id: String, function: String },

    #[error("Problem '{0}' has no testcases")]
    NoTestcase(String),

    #[error("Invalid built-in catalog: {0}")]
    Builtin(#[source] serde_json::Error),

    #[error(transparent)]
    Fs(#[from] fsutil::Error),
}

/// Read-only lookup of problems by id.
pub trait ProblemCatalog: Send + Sync {
    fn problems(&self) -> &[Problem];

    fn find(&self, id: &str) -> Result<&Problem> {
        self.problems()
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_owned()))
    }
}

/// A catalog fixed at load time.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    problems: Vec<Problem>,
}

impl StaticCatalog {
    const BUILTIN_FILENAME: &str = "problems.json";

    pub fn new(problems: Vec<Problem>) -> Result<Self> {
        let mut ids = HashSet::new();
        for p in &problems {
            if !ids.insert(p.id.as_str()) {
                return Err(CatalogError::DuplicateId(p.id.clone()));
            }
            if !p.entry_point.is_valid_identifier() {
                return Err(CatalogError::InvalidEntryPoint {
                    id: p.id.clone(),
                    function: p.entry_point.function.clone(),
                });
            }
            if p.test_cases.is_empty() {
                return Err(CatalogError::NoTestcase(p.id.clone()));
            }
        }
        Ok(Self { problems })
    }

    /// `two-sum`, `palindrome-check` and `fibonacci`.
    pub fn builtin() -> Result<Self> {
        let json = Asset::text(Self::BUILTIN_FILENAME);
        let problems = serde_json::from_str(&json).map_err(CatalogError::Builtin)?;
        Self::new(problems)
    }

    pub fn from_json_file(filepath: impl AsRef<Path>) -> Result<Self> {
        let problems = fsutil::read_json_with_deserialize(filepath)?;
        Self::new(problems)
    }
}

impl ProblemCatalog for StaticCatalog {
    fn problems(&self) -> &[Problem] {
        &self.problems
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{EntryKind, EntryPoint, TestCase};

    fn problem(id: &str, function: &str) -> Problem {
        Problem {
            id: id.to_owned(),
            title: id.to_uppercase(),
            description: String::new(),
            difficulty: "Easy".to_owned(),
            sample_input: "1".to_owned(),
            sample_output: "1".to_owned(),
            entry_point: EntryPoint::new(function, EntryKind::Integer),
            test_cases: vec![TestCase {
                input: "1".to_owned(),
                expected_output: "1".to_owned(),
            }],
            time_limit: 1,
        }
    }

    #[test]
    fn builtin_catalog_loads() {
        let c = StaticCatalog::builtin().unwrap();
        let ids: Vec<_> = c.problems().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["two-sum", "palindrome-check", "fibonacci"]);

        let two_sum = c.find("two-sum").unwrap();
        assert_eq!(two_sum.entry_point, EntryPoint::new("two_sum", EntryKind::Pair));
        assert_eq!(two_sum.time_limit, 3);
        assert_eq!(two_sum.test_cases.len(), 4);
        assert_eq!(two_sum.test_cases[0].input, "[2, 7, 11, 15]\n9");

        let pal = c.find("palindrome-check").unwrap();
        assert_eq!(pal.entry_point.kind, EntryKind::Text);
        assert_eq!(pal.time_limit, 2);
        assert_eq!(pal.test_cases.len(), 5);

        let fib = c.find("fibonacci").unwrap();
        assert_eq!(fib.entry_point.kind, EntryKind::Integer);
        assert_eq!(fib.test_cases.len(), 5);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let c = StaticCatalog::builtin().unwrap();
        let err = c.find("no-such-problem").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(id) if id == "no-such-problem"));
    }

    #[test]
    fn reject_invalid_catalogs() {
        let err = StaticCatalog::new(vec![problem("a", "f"), problem("a", "g")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "a"));

        let err = StaticCatalog::new(vec![problem("a", "os.system")]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEntryPoint { .. }));

        let mut p = problem("a", "f");
        p.test_cases.clear();
        let err = StaticCatalog::new(vec![p]).unwrap_err();
        assert!(matches!(err, CatalogError::NoTestcase(_)));
    }

    #[test]
    fn load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("problems.json");
        fsutil::write(&path, serde_json::to_string(&vec![problem("x", "f")]).unwrap()).unwrap();

        let c = StaticCatalog::from_json_file(&path).unwrap();
        assert_eq!(c.find("x").unwrap().entry_point.function, "f");

        let err = StaticCatalog::from_json_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Fs(_)));
    }
}
