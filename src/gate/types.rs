use crate::platform::types::PullRequestSummary;

/// Required-check names from branch protection.
///
/// `Unknown` means no filtering is possible, which is not the same as a policy
/// that requires nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequiredChecks {
    Unknown,
    Known(Vec<String>),
}

impl RequiredChecks {
    /// Build a known set, keeping first-seen order and dropping duplicates.
    pub fn known<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !set.contains(&name) {
                set.push(name);
            }
        }
        RequiredChecks::Known(set)
    }

    /// Whether a check with this name is in scope. Everything is in scope when unknown.
    pub fn admits(&self, name: &str) -> bool {
        match self {
            RequiredChecks::Unknown => true,
            RequiredChecks::Known(names) => names.iter().any(|n| n == name),
        }
    }
}

/// A lookup that either produced a value or fell back to a safe default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Resolved(T),
    Degraded { reason: String },
}

impl Lookup<RequiredChecks> {
    /// Collapse a degraded lookup into the permissive default.
    pub fn into_required_checks(self) -> RequiredChecks {
        match self {
            Lookup::Resolved(checks) => checks,
            Lookup::Degraded { .. } => RequiredChecks::Unknown,
        }
    }
}

/// Overall state of the selected check runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Every selected run has completed.
    pub complete: bool,
    /// Every completed run concluded with an acceptable conclusion.
    pub acceptable: bool,
    /// At least one completed run concluded with an unacceptable conclusion.
    pub unacceptable: bool,
    /// Names of the selected runs that have not completed yet.
    pub pending: Vec<String>,
}

/// Result of one best-effort side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    Applied,
    Skipped,
    Failed(String),
}

/// What the dispatcher did about the pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub assignment: SideEffect,
    pub review_request: SideEffect,
}

/// How a run ended. Every variant is a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Some selected checks are still running; a later trigger will retry.
    ChecksIncomplete { pending: Vec<String> },
    /// Checks finished but nothing called for action.
    NothingToDo,
    /// The PR closed while we were waiting, so nothing was changed.
    PullRequestClosed { pr: u64 },
    /// Assignment and review request were attempted.
    ActionTaken { pr: PullRequestSummary, report: DispatchReport },
}
