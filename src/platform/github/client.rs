use std::future::Future;

use async_trait::async_trait;
use octocrab::{params, Octocrab};
use serde::Serialize;

use crate::context::RepoId;
use crate::error::{AppError, Result};
use crate::platform::types::*;
use crate::platform::Platform;

use super::mapper::{self, ApiFailure, CheckRunsPage, RequiredStatusChecksPayload};

const PER_PAGE: u8 = 100;

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[derive(Serialize)]
struct AssigneesBody<'a> {
    assignees: &'a [String],
}

#[derive(Serialize)]
struct ReviewersBody<'a> {
    reviewers: &'a [String],
}

pub struct GitHubPlatform {
    client: Octocrab,
    repo: RepoId,
}

impl GitHubPlatform {
    /// Build a token-authenticated client scoped to one repository.
    /// `api_url` overrides the API base for GitHub Enterprise Server.
    pub fn new(token: &str, repo: RepoId, api_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| AppError::Config(format!("Invalid GitHub API URL {url}: {e}")))?;
        }
        let client = builder
            .build()
            .map_err(|e| AppError::GitHubApi(format!("Failed to build octocrab client: {e}")))?;

        Ok(Self { client, repo })
    }

    fn repo_path(&self) -> String {
        format!("/repos/{}/{}", self.repo.owner, self.repo.name)
    }
}

#[async_trait]
impl Platform for GitHubPlatform {
    async fn list_pull_requests(&self) -> Result<Vec<PullRequestSummary>> {
        let page = self
            .client
            .pulls(&self.repo.owner, &self.repo.name)
            .list()
            .state(params::State::All)
            .sort(params::pulls::Sort::Updated)
            .direction(params::Direction::Descending)
            .per_page(PER_PAGE)
            .send()
            .await?;

        Ok(page.items.iter().map(mapper::map_pull_request).collect())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequestSummary> {
        let pr = self
            .client
            .pulls(&self.repo.owner, &self.repo.name)
            .get(number)
            .await?;

        Ok(mapper::map_pull_request(&pr))
    }

    async fn list_check_runs(&self, git_ref: &str) -> Result<Vec<CheckRun>> {
        let url = format!(
            "{}/commits/{}/check-runs",
            self.repo_path(),
            urlencoding::encode(git_ref)
        );
        let client = &self.client;
        let url = url.as_str();

        collect_check_runs(move |page| async move {
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            client
                .get::<CheckRunsPage, _, _>(url, Some(&params))
                .await
                .map_err(|e| AppError::GitHubApi(format!("Failed to list check runs: {e}")))
        })
        .await
    }

    async fn required_status_checks(&self, branch: &str) -> Result<Option<Vec<String>>> {
        let url = format!(
            "{}/branches/{}/protection/required_status_checks",
            self.repo_path(),
            urlencoding::encode(branch)
        );

        let response = self
            .client
            .get::<RequiredStatusChecksPayload, _, _>(&url, None::<&()>)
            .await
            .map_err(ApiFailure::from);

        mapper::map_required_checks_response(branch, response)
    }

    async fn add_assignees(&self, number: u64, assignees: &[String]) -> Result<()> {
        let url = format!("{}/issues/{number}/assignees", self.repo_path());
        let response: serde_json::Value = self
            .client
            .post(&url, Some(&AssigneesBody { assignees }))
            .await
            .map_err(|e| AppError::GitHubApi(format!("Failed to add assignees: {e}")))?;

        crate::logging::debug_json(&format!("add_assignees({number}) > response"), &response);
        Ok(())
    }

    async fn request_reviewers(&self, number: u64, reviewers: &[String]) -> Result<()> {
        let url = format!("{}/pulls/{number}/requested_reviewers", self.repo_path());
        let response: serde_json::Value = self
            .client
            .post(&url, Some(&ReviewersBody { reviewers }))
            .await
            .map_err(|e| AppError::GitHubApi(format!("Failed to request reviewers: {e}")))?;

        crate::logging::debug_json(&format!("request_reviewers({number}) > response"), &response);
        Ok(())
    }
}

/// Fetch pages starting at 1 until `total_count` runs are collected or a
/// page comes back empty.
async fn collect_check_runs<F, Fut>(mut fetch_page: F) -> Result<Vec<CheckRun>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<CheckRunsPage>>,
{
    let mut runs = Vec::new();
    let mut page = 1;
    loop {
        let body = fetch_page(page).await?;
        let fetched = body.check_runs.len();
        runs.extend(body.check_runs.into_iter().map(mapper::map_check_run));
        tracing::debug!(page, fetched, total = body.total_count, "Fetched check-run page");

        if fetched == 0 || runs.len() as u64 >= body.total_count {
            return Ok(runs);
        }
        page += 1;
    }
}
