//! Recording in-memory platform used by the gate tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::platform::types::*;
use crate::platform::Platform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListPullRequests,
    GetPullRequest(u64),
    ListCheckRuns(String),
    RequiredStatusChecks(String),
    AddAssignees(u64, Vec<String>),
    RequestReviewers(u64, Vec<String>),
}

/// What the branch protection endpoint answers.
#[derive(Debug, Clone, Default)]
pub enum Policy {
    Required(Vec<String>),
    #[default]
    NotConfigured,
    Fails,
}

#[derive(Debug, Default)]
pub struct MockPlatform {
    pub pulls: Vec<PullRequestSummary>,
    pub check_runs: Vec<CheckRun>,
    pub policy: Policy,
    pub fail_assignees: bool,
    pub fail_reviewers: bool,
    pub(crate) calls: Mutex<Vec<Call>>,
}

impl MockPlatform {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|&c| predicate(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn pull(number: u64, title: &str, base_ref: &str) -> PullRequestSummary {
    PullRequestSummary {
        number,
        title: title.to_string(),
        base_ref: Some(base_ref.to_string()),
        state: PullState::Open,
    }
}

pub fn completed(name: &str, conclusion: CheckConclusion) -> CheckRun {
    CheckRun::new(name, CheckStatus::Completed, Some(conclusion))
}

pub fn running(name: &str) -> CheckRun {
    CheckRun::new(name, CheckStatus::InProgress, None)
}

#[async_trait]
impl Platform for MockPlatform {
    async fn list_pull_requests(&self) -> Result<Vec<PullRequestSummary>> {
        self.record(Call::ListPullRequests);
        Ok(self.pulls.clone())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestSummary> {
        self.record(Call::GetPullRequest(number));
        self.pulls
            .iter()
            .find(|p| p.number == number)
            .cloned()
            .ok_or_else(|| AppError::GitHubApi(format!("pull request #{number} not found")))
    }

    async fn list_check_runs(&self, git_ref: &str) -> Result<Vec<CheckRun>> {
        self.record(Call::ListCheckRuns(git_ref.to_string()));
        Ok(self.check_runs.clone())
    }

    async fn required_status_checks(&self, branch: &str) -> Result<Option<Vec<String>>> {
        self.record(Call::RequiredStatusChecks(branch.to_string()));
        match &self.policy {
            Policy::Required(names) => Ok(Some(names.clone())),
            Policy::NotConfigured => Ok(None),
            Policy::Fails => Err(AppError::GitHubApi("Bad credentials".to_string())),
        }
    }

    async fn add_assignees(&self, number: u64, assignees: &[String]) -> Result<()> {
        self.record(Call::AddAssignees(number, assignees.to_vec()));
        if self.fail_assignees {
            return Err(AppError::GitHubApi("Validation Failed".to_string()));
        }
        Ok(())
    }

    async fn request_reviewers(&self, number: u64, reviewers: &[String]) -> Result<()> {
        self.record(Call::RequestReviewers(number, reviewers.to_vec()));
        if self.fail_reviewers {
            return Err(AppError::GitHubApi(
                "Reviews may only be requested from collaborators".to_string(),
            ));
        }
        Ok(())
    }
}
