use tokio::sync::OnceCell;

use crate::context::ExecutionContext;
use crate::error::{AppError, Result};
use crate::platform::types::{PullRequestSummary, PullState};
use crate::platform::Platform;

/// Finds the pull request the workflow run belongs to. The first successful
/// resolution is cached for the lifetime of the resolver.
pub struct PullRequestResolver<'a> {
    platform: &'a dyn Platform,
    context: &'a ExecutionContext,
    cached: OnceCell<PullRequestSummary>,
}

impl<'a> PullRequestResolver<'a> {
    pub fn new(platform: &'a dyn Platform, context: &'a ExecutionContext) -> Self {
        Self {
            platform,
            context,
            cached: OnceCell::new(),
        }
    }

    pub async fn resolve(&self) -> Result<&PullRequestSummary> {
        if let Some(pr) = self.cached.get() {
            tracing::debug!(pr = pr.number, "Reusing resolved PR");
            return Ok(pr);
        }
        tracing::debug!("PR not yet resolved; fetching...");
        self.cached.get_or_try_init(|| self.fetch()).await
    }

    async fn fetch(&self) -> Result<PullRequestSummary> {
        if let Some(pr) = self.context.pull_requests.first() {
            tracing::debug!(pr = pr.number, "Found PR in workflow_run.pull_requests");
            return Ok(pr.clone());
        }

        // The workflow run can arrive without associated PRs (e.g. runs from forks),
        // so look for the most recently updated PR whose title matches the run's title.
        let title = &self.context.display_title;
        tracing::debug!(title = %title, "No associated PR; searching by title");
        let pulls = self.platform.list_pull_requests().await?;
        let matching: Vec<&PullRequestSummary> =
            pulls.iter().filter(|p| &p.title == title).collect();
        crate::logging::debug_json("resolve > matching pull requests", &matching);

        matching
            .first()
            .map(|pr| (*pr).clone())
            .ok_or_else(|| AppError::PullRequestNotFound {
                strategy: "workflow_run.pull_requests[0]".to_string(),
                title: title.clone(),
            })
    }

    /// Direct, uncached lookup of whether a PR is still open.
    pub async fn is_open(&self, number: u64) -> Result<bool> {
        let pr = self.platform.get_pull_request(number).await?;
        Ok(pr.state == PullState::Open)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RepoId;
    use crate::platform::mock::{pull, Call, MockPlatform};

    fn context(title: &str, pull_requests: Vec<PullRequestSummary>) -> ExecutionContext {
        ExecutionContext {
            repo: RepoId::parse("octo/widgets").unwrap(),
            head_sha: "abc123".to_string(),
            display_title: title.to_string(),
            pull_requests,
        }
    }

    #[tokio::test]
    async fn test_uses_associated_pull_request() {
        let platform = MockPlatform::default();
        let ctx = context("Whatever", vec![pull(7, "", "main"), pull(8, "", "main")]);
        let resolver = PullRequestResolver::new(&platform, &ctx);

        let pr = resolver.resolve().await.unwrap();
        assert_eq!(pr.number, 7);
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_title_search() {
        let platform = MockPlatform {
            pulls: vec![
                pull(3, "Other change", "main"),
                pull(9, "Add frobnicator", "release"),
                pull(2, "Add frobnicator", "main"),
            ],
            ..Default::default()
        };
        let ctx = context("Add frobnicator", vec![]);
        let resolver = PullRequestResolver::new(&platform, &ctx);

        let pr = resolver.resolve().await.unwrap();
        assert_eq!(pr.number, 9);
        assert_eq!(pr.base_ref.as_deref(), Some("release"));
    }

    #[tokio::test]
    async fn test_title_must_match_exactly() {
        let platform = MockPlatform {
            pulls: vec![pull(3, "add frobnicator", "main")],
            ..Default::default()
        };
        let ctx = context("Add frobnicator", vec![]);
        let resolver = PullRequestResolver::new(&platform, &ctx);

        let err = resolver.resolve().await.unwrap_err();
        match err {
            AppError::PullRequestNotFound { strategy, title } => {
                assert!(strategy.contains("pull_requests"));
                assert_eq!(title, "Add frobnicator");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_resolution_is_cached() {
        let platform = MockPlatform {
            pulls: vec![pull(5, "Bump deps", "main")],
            ..Default::default()
        };
        let ctx = context("Bump deps", vec![]);
        let resolver = PullRequestResolver::new(&platform, &ctx);

        let first = resolver.resolve().await.unwrap().clone();
        let second = resolver.resolve().await.unwrap();
        assert_eq!(&first, second);
        assert_eq!(platform.count(|c| *c == Call::ListPullRequests), 1);
    }

    #[tokio::test]
    async fn test_is_open_is_not_cached() {
        let mut closed = pull(5, "Bump deps", "main");
        closed.state = PullState::Closed;
        let platform = MockPlatform {
            pulls: vec![pull(4, "Open one", "main"), closed],
            ..Default::default()
        };
        let ctx = context("Bump deps", vec![]);
        let resolver = PullRequestResolver::new(&platform, &ctx);

        assert!(resolver.is_open(4).await.unwrap());
        assert!(!resolver.is_open(5).await.unwrap());
        assert!(resolver.is_open(4).await.unwrap());
        assert_eq!(platform.count(|c| matches!(c, Call::GetPullRequest(_))), 3);
    }
}
