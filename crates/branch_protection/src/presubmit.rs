//! Presubmit job definitions and derived branch requirements.
//!
//! Presubmit jobs report a status context on every pull request they run
//! against. Jobs that run unconditionally on a branch (always, or whenever
//! matching files change) gate merging: their contexts are derived into the
//! branch's required status checks by the resolver.
//!
//! # TOML Format
//!
//! The job table is keyed by `"org/repo"`:
//!
//! ```toml
//! [[presubmits."k8s/test-infra"]]
//! name = "pull-test-infra-unit"
//! always_run = true
//! branches = ["main", "release-.*"]
//!
//! [[presubmits."k8s/test-infra"]]
//! name = "pull-test-infra-lint"
//! context = "lint"
//! run_if_changed = "\\.go$"
//! optional = true
//! ```

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigurationError, ConfigurationResult};

#[cfg(test)]
#[path = "presubmit_tests.rs"]
mod tests;

/// Read access to a presubmit job record.
///
/// Implemented by [`Presubmit`]; callers holding their own job records can
/// implement it to feed [`branch_requirements`] directly.
pub trait PresubmitJob {
    /// The status context the job reports.
    fn context(&self) -> &str;

    /// Whether the job runs against pull requests targeting `branch`.
    fn runs_against_branch(&self, branch: &str) -> bool;

    fn always_run(&self) -> bool;

    /// The changed-files expression that triggers the job, if any.
    fn run_if_changed(&self) -> Option<&str>;

    /// Whether the job's context must pass before merging.
    fn context_required(&self) -> bool;

    /// Whether the job runs without being requested manually.
    fn runs_unconditionally(&self) -> bool {
        self.always_run() || self.run_if_changed().is_some_and(|expr| !expr.is_empty())
    }
}

/// Branch applicability of a job.
///
/// With no patterns a job runs against every branch. `skip_branches` takes
/// precedence over `branches`. Patterns are regular expressions matched
/// against the whole branch name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "BrancherSpec", into = "BrancherSpec")]
pub struct Brancher {
    branches: Vec<String>,
    skip_branches: Vec<String>,
    include: Option<Regex>,
    exclude: Option<Regex>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BrancherSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    branches: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    skip_branches: Vec<String>,
}

impl Brancher {
    /// Creates a brancher from include and skip patterns.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if a pattern is not a valid regex.
    pub fn new(branches: Vec<String>, skip_branches: Vec<String>) -> ConfigurationResult<Self> {
        let include = compile_patterns("branches", &branches)?;
        let exclude = compile_patterns("skip_branches", &skip_branches)?;
        Ok(Self {
            branches,
            skip_branches,
            include,
            exclude,
        })
    }

    /// A brancher that matches every branch.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    pub fn skip_branches(&self) -> &[String] {
        &self.skip_branches
    }

    pub fn runs_against_all_branches(&self) -> bool {
        self.branches.is_empty() && self.skip_branches.is_empty()
    }

    /// Returns `true` if a job with this brancher runs against `branch`.
    pub fn should_run(&self, branch: &str) -> bool {
        if self.exclude.as_ref().is_some_and(|re| re.is_match(branch)) {
            return false;
        }
        self.include.as_ref().map_or(true, |re| re.is_match(branch))
    }
}

impl PartialEq for Brancher {
    fn eq(&self, other: &Self) -> bool {
        self.branches == other.branches && self.skip_branches == other.skip_branches
    }
}

impl Eq for Brancher {}

impl TryFrom<BrancherSpec> for Brancher {
    type Error = ConfigurationError;

    fn try_from(spec: BrancherSpec) -> Result<Self, Self::Error> {
        Brancher::new(spec.branches, spec.skip_branches)
    }
}

impl From<Brancher> for BrancherSpec {
    fn from(brancher: Brancher) -> Self {
        BrancherSpec {
            branches: brancher.branches,
            skip_branches: brancher.skip_branches,
        }
    }
}

fn compile_patterns(field: &str, patterns: &[String]) -> ConfigurationResult<Option<Regex>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let alternation = patterns
        .iter()
        .map(|p| format!("(?:{p})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("^(?:{alternation})$"))
        .map(Some)
        .map_err(|e| ConfigurationError::InvalidConfiguration {
            field: field.to_string(),
            reason: e.to_string(),
        })
}

/// A presubmit job as it appears in the configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presubmit {
    pub name: String,

    /// Reported status context; defaults to the job name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    #[serde(default)]
    pub always_run: bool,

    /// Regex over changed file paths that triggers the job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_if_changed: Option<String>,

    /// Optional jobs report a context that does not block merging.
    #[serde(default)]
    pub optional: bool,

    /// Jobs that skip reporting never post a context.
    #[serde(default)]
    pub skip_report: bool,

    #[serde(flatten)]
    pub brancher: Brancher,
}

impl Presubmit {
    /// Creates a job that runs on demand against every branch.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: None,
            always_run: false,
            run_if_changed: None,
            optional: false,
            skip_report: false,
            brancher: Brancher::all(),
        }
    }

    /// Checks the job for values that deserialize but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an empty name or an invalid
    /// `run_if_changed` expression.
    pub fn validate(&self) -> ConfigurationResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigurationError::InvalidConfiguration {
                field: "presubmits.name".to_string(),
                reason: "job name must not be empty".to_string(),
            });
        }
        if let Some(expr) = &self.run_if_changed {
            Regex::new(expr).map_err(|e| ConfigurationError::InvalidConfiguration {
                field: format!("presubmits.{}.run_if_changed", self.name),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}

impl PresubmitJob for Presubmit {
    fn context(&self) -> &str {
        self.context.as_deref().unwrap_or(&self.name)
    }

    fn runs_against_branch(&self, branch: &str) -> bool {
        self.brancher.should_run(branch)
    }

    fn always_run(&self) -> bool {
        self.always_run
    }

    fn run_if_changed(&self) -> Option<&str> {
        self.run_if_changed.as_deref()
    }

    fn context_required(&self) -> bool {
        !(self.optional || self.skip_report)
    }
}

/// Splits the jobs that gate merging on `branch` into required and optional contexts.
///
/// Contexts keep the order of the job list.
pub fn job_requirements<J: PresubmitJob>(jobs: &[J], branch: &str) -> (Vec<String>, Vec<String>) {
    let mut required = Vec::new();
    let mut optional = Vec::new();
    for job in jobs {
        if !job.runs_against_branch(branch) || !job.runs_unconditionally() {
            continue;
        }
        if job.context_required() {
            required.push(job.context().to_string());
        } else {
            optional.push(job.context().to_string());
        }
    }
    (required, optional)
}

/// Returns the required and optional presubmit contexts for a branch.
///
/// Repositories without jobs in the table have no requirements.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use branch_protection::{branch_requirements, Presubmit};
///
/// let mut unit = Presubmit::new("unit");
/// unit.always_run = true;
/// let mut presubmits = HashMap::new();
/// presubmits.insert("k8s/test-infra".to_string(), vec![unit]);
///
/// let (required, optional) = branch_requirements("k8s", "test-infra", "main", &presubmits);
/// assert_eq!(required, vec!["unit"]);
/// assert!(optional.is_empty());
/// ```
pub fn branch_requirements<J: PresubmitJob>(
    org: &str,
    repo: &str,
    branch: &str,
    presubmits: &HashMap<String, Vec<J>>,
) -> (Vec<String>, Vec<String>) {
    match presubmits.get(&format!("{org}/{repo}")) {
        Some(jobs) => job_requirements(jobs, branch),
        None => (Vec::new(), Vec::new()),
    }
}
