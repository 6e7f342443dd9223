pub mod github;
#[cfg(test)]
pub mod mock;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use types::*;

/// The hosting-platform calls the gate makes. Every call is scoped to the
/// repository the platform was built for.
#[async_trait]
pub trait Platform: Send + Sync {
    /// List pull requests in every state, most recently updated first.
    async fn list_pull_requests(&self) -> Result<Vec<PullRequestSummary>>;

    /// Fetch a single pull request by number.
    async fn get_pull_request(&self, number: u64) -> Result<PullRequestSummary>;

    /// List every check run reported for a commit reference.
    async fn list_check_runs(&self, git_ref: &str) -> Result<Vec<CheckRun>>;

    /// Required status-check names from a branch's protection policy.
    ///
    /// Returns `Ok(None)` when the branch has no such policy configured.
    async fn required_status_checks(&self, branch: &str) -> Result<Option<Vec<String>>>;

    /// Add assignees to a pull request.
    async fn add_assignees(&self, number: u64, assignees: &[String]) -> Result<()>;

    /// Request reviews on a pull request.
    async fn request_reviewers(&self, number: u64, reviewers: &[String]) -> Result<()>;
}
