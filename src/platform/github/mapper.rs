use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::platform::types;

/// One page of `GET /repos/{owner}/{repo}/commits/{ref}/check-runs`.
#[derive(Debug, Deserialize)]
pub struct CheckRunsPage {
    pub total_count: u64,
    pub check_runs: Vec<CheckRunPayload>,
}

#[derive(Debug, Deserialize)]
pub struct CheckRunPayload {
    pub name: String,
    pub status: types::CheckStatus,
    pub conclusion: Option<types::CheckConclusion>,
}

/// `GET /repos/{owner}/{repo}/branches/{branch}/protection/required_status_checks`.
#[derive(Debug, Deserialize)]
pub struct RequiredStatusChecksPayload {
    #[serde(default)]
    pub contexts: Vec<String>,
    #[serde(default)]
    pub checks: Vec<StatusCheckPayload>,
}

#[derive(Debug, Deserialize)]
pub struct StatusCheckPayload {
    pub context: String,
}

/// The parts of a failed API call the gate decides on.
#[derive(Debug)]
pub struct ApiFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl From<octocrab::Error> for ApiFailure {
    fn from(e: octocrab::Error) -> Self {
        match e {
            octocrab::Error::GitHub { source, .. } => ApiFailure {
                status: Some(source.status_code.as_u16()),
                message: source.message.clone(),
            },
            other => ApiFailure {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

/// A 404 from the required-status-checks endpoint means the branch has no
/// such policy. Anything else is a real failure.
pub fn map_required_checks_response(
    branch: &str,
    response: std::result::Result<RequiredStatusChecksPayload, ApiFailure>,
) -> Result<Option<Vec<String>>> {
    match response {
        Ok(payload) => Ok(Some(map_required_checks(payload))),
        Err(ApiFailure {
            status: Some(404),
            message,
        }) => {
            tracing::debug!(branch, message = %message, "No required status checks policy");
            Ok(None)
        }
        Err(failure) => Err(AppError::GitHubApi(format!(
            "Failed to fetch required status checks for {branch}: {}",
            failure.message
        ))),
    }
}

/// Map octocrab PullRequest to our summary type.
pub fn map_pull_request(pr: &octocrab::models::pulls::PullRequest) -> types::PullRequestSummary {
    let state = match pr.state {
        Some(octocrab::models::IssueState::Open) => types::PullState::Open,
        _ => types::PullState::Closed,
    };
    let base_ref = Some(pr.base.ref_field.clone()).filter(|r| !r.is_empty());

    types::PullRequestSummary {
        number: pr.number,
        title: pr.title.clone().unwrap_or_default(),
        base_ref,
        state,
    }
}

pub fn map_check_run(run: CheckRunPayload) -> types::CheckRun {
    types::CheckRun::new(run.name, run.status, run.conclusion)
}

/// Merge the legacy `contexts` list with the newer `checks` entries,
/// keeping first-seen order and dropping duplicates.
pub fn map_required_checks(payload: RequiredStatusChecksPayload) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let from_checks = payload.checks.into_iter().map(|c| c.context);
    for name in payload.contexts.into_iter().chain(from_checks) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
