use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether a pull request is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullState {
    Open,
    Closed,
}

/// The minimal view of a pull request the gate needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestSummary {
    pub number: u64,
    pub title: String,
    /// Name of the branch the PR merges into. `None` when the source did not say.
    pub base_ref: Option<String>,
    pub state: PullState,
}

/// Lifecycle status of a check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Queued,
    InProgress,
    Completed,
    Waiting,
    Requested,
    Pending,
    #[serde(other)]
    Unknown,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Queued => "queued",
            CheckStatus::InProgress => "in_progress",
            CheckStatus::Completed => "completed",
            CheckStatus::Waiting => "waiting",
            CheckStatus::Requested => "requested",
            CheckStatus::Pending => "pending",
            CheckStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a completed check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
    /// A conclusion this build does not know about. Never parsed from inputs,
    /// so it matches neither the acceptable nor the unacceptable set.
    #[serde(other)]
    Unknown,
}

impl CheckConclusion {
    /// Every conclusion a finished check run is documented to report.
    /// `stale` is set by GitHub itself and is left out on purpose.
    pub const ALL_VALID: [CheckConclusion; 7] = [
        CheckConclusion::Success,
        CheckConclusion::Failure,
        CheckConclusion::Neutral,
        CheckConclusion::Cancelled,
        CheckConclusion::Skipped,
        CheckConclusion::TimedOut,
        CheckConclusion::ActionRequired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckConclusion::Success => "success",
            CheckConclusion::Failure => "failure",
            CheckConclusion::Neutral => "neutral",
            CheckConclusion::Cancelled => "cancelled",
            CheckConclusion::Skipped => "skipped",
            CheckConclusion::TimedOut => "timed_out",
            CheckConclusion::ActionRequired => "action_required",
            CheckConclusion::Stale => "stale",
            CheckConclusion::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CheckConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckConclusion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "success" => Ok(CheckConclusion::Success),
            "failure" => Ok(CheckConclusion::Failure),
            "neutral" => Ok(CheckConclusion::Neutral),
            "cancelled" => Ok(CheckConclusion::Cancelled),
            "skipped" => Ok(CheckConclusion::Skipped),
            "timed_out" => Ok(CheckConclusion::TimedOut),
            "action_required" => Ok(CheckConclusion::ActionRequired),
            "stale" => Ok(CheckConclusion::Stale),
            other => Err(format!("unknown check conclusion '{other}'")),
        }
    }
}

/// A single named status report attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRun {
    pub name: String,
    pub status: CheckStatus,
    /// Only set once `status` is `Completed`.
    pub conclusion: Option<CheckConclusion>,
}

impl CheckRun {
    /// Build a check run, dropping any conclusion reported for a run that
    /// has not completed.
    pub fn new(
        name: impl Into<String>,
        status: CheckStatus,
        conclusion: Option<CheckConclusion>,
    ) -> Self {
        let conclusion = if status == CheckStatus::Completed {
            conclusion
        } else {
            None
        };
        Self {
            name: name.into(),
            status,
            conclusion,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == CheckStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conclusion_parses_wire_names() {
        for conclusion in CheckConclusion::ALL_VALID {
            assert_eq!(conclusion.as_str().parse::<CheckConclusion>(), Ok(conclusion));
        }
        assert!("passed".parse::<CheckConclusion>().is_err());
    }

    #[test]
    fn test_unknown_status_deserializes() {
        let status: CheckStatus = serde_json::from_str("\"something_new\"").unwrap();
        assert_eq!(status, CheckStatus::Unknown);
        let status: CheckStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, CheckStatus::InProgress);
    }

    #[test]
    fn test_unknown_conclusion_deserializes() {
        let conclusion: CheckConclusion = serde_json::from_str("\"startup_failure\"").unwrap();
        assert_eq!(conclusion, CheckConclusion::Unknown);
        assert!(!CheckConclusion::ALL_VALID.contains(&CheckConclusion::Unknown));
        assert!("unknown".parse::<CheckConclusion>().is_err());
    }

    #[test]
    fn test_incomplete_run_has_no_conclusion() {
        let run = CheckRun::new(
            "ci",
            CheckStatus::InProgress,
            Some(CheckConclusion::Success),
        );
        assert_eq!(run.conclusion, None);
        assert!(!run.is_completed());

        let run = CheckRun::new("ci", CheckStatus::Completed, Some(CheckConclusion::Failure));
        assert_eq!(run.conclusion, Some(CheckConclusion::Failure));
    }
}
