use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::platform::types::{PullRequestSummary, PullState};

/// Repository identity, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn parse(full_name: &str) -> Result<Self> {
        match full_name.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(AppError::Context(format!(
                "Invalid repository name: {full_name}"
            ))),
        }
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The workflow execution the gate runs for. Fixed for the whole run.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionContext {
    pub repo: RepoId,
    pub head_sha: String,
    pub display_title: String,
    pub pull_requests: Vec<PullRequestSummary>,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    workflow_run: Option<WorkflowRunPayload>,
}

#[derive(Debug, Deserialize)]
struct WorkflowRunPayload {
    head_sha: String,
    #[serde(default)]
    display_title: String,
    #[serde(default)]
    pull_requests: Vec<PullRequestPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: u64,
    #[serde(default)]
    title: Option<String>,
    base: Option<RefPayload>,
    #[serde(default)]
    state: Option<PullState>,
}

#[derive(Debug, Deserialize)]
struct RefPayload {
    #[serde(rename = "ref")]
    ref_name: Option<String>,
}

impl From<PullRequestPayload> for PullRequestSummary {
    fn from(pr: PullRequestPayload) -> Self {
        PullRequestSummary {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            base_ref: pr
                .base
                .and_then(|b| b.ref_name)
                .filter(|r| !r.is_empty()),
            state: pr.state.unwrap_or(PullState::Open),
        }
    }
}

impl ExecutionContext {
    /// Build the context from the Actions runner environment.
    /// Explicit arguments take precedence over `GITHUB_REPOSITORY` and `GITHUB_EVENT_PATH`.
    pub fn from_env(repository: Option<&str>, event_path: Option<&Path>) -> Result<Self> {
        let repository = match repository {
            Some(r) => r.to_string(),
            None => std::env::var("GITHUB_REPOSITORY")
                .map_err(|_| AppError::Context("GITHUB_REPOSITORY is not set".to_string()))?,
        };
        let event_path = match event_path {
            Some(p) => p.to_path_buf(),
            None => std::env::var_os("GITHUB_EVENT_PATH")
                .map(PathBuf::from)
                .ok_or_else(|| AppError::Context("GITHUB_EVENT_PATH is not set".to_string()))?,
        };

        let payload = std::fs::read(&event_path).map_err(|e| {
            AppError::Context(format!(
                "Failed to read event payload at {}: {e}",
                event_path.display()
            ))
        })?;

        Self::from_event(RepoId::parse(&repository)?, &payload)
    }

    /// Build the context from a raw `workflow_run` event payload.
    pub fn from_event(repo: RepoId, payload: &[u8]) -> Result<Self> {
        let event: EventPayload = serde_json::from_slice(payload)?;
        let run = event.workflow_run.ok_or_else(|| {
            AppError::Context("Event payload has no workflow_run object".to_string())
        })?;

        Ok(Self {
            repo,
            head_sha: run.head_sha,
            display_title: run.display_title,
            pull_requests: run.pull_requests.into_iter().map(Into::into).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepoId {
        RepoId::parse("octo/widgets").unwrap()
    }

    #[test]
    fn test_parse_repo() {
        let repo = repo();
        assert_eq!(repo.owner, "octo");
        assert_eq!(repo.name, "widgets");
        assert_eq!(repo.to_string(), "octo/widgets");
        assert!(RepoId::parse("widgets").is_err());
        assert!(RepoId::parse("/widgets").is_err());
    }

    #[test]
    fn test_from_event_with_pull_requests() {
        let payload = br#"{
            "action": "completed",
            "workflow_run": {
                "id": 30433642,
                "head_sha": "acb5820ced9479c074f688cc328bf03f341a511d",
                "display_title": "Add widget frobnicator",
                "pull_requests": [
                    {"id": 1, "number": 42, "head": {"ref": "feature"}, "base": {"ref": "main", "sha": "abc"}}
                ]
            }
        }"#;
        let ctx = ExecutionContext::from_event(repo(), payload).unwrap();
        assert_eq!(ctx.head_sha, "acb5820ced9479c074f688cc328bf03f341a511d");
        assert_eq!(ctx.display_title, "Add widget frobnicator");
        assert_eq!(ctx.pull_requests.len(), 1);
        assert_eq!(ctx.pull_requests[0].number, 42);
        assert_eq!(ctx.pull_requests[0].base_ref.as_deref(), Some("main"));
        assert_eq!(ctx.pull_requests[0].state, PullState::Open);
    }

    #[test]
    fn test_from_event_without_pull_requests() {
        let payload = br#"{"workflow_run": {"head_sha": "abc", "display_title": "Fix", "pull_requests": []}}"#;
        let ctx = ExecutionContext::from_event(repo(), payload).unwrap();
        assert!(ctx.pull_requests.is_empty());
    }

    #[test]
    fn test_from_event_rejects_other_events() {
        let payload = br#"{"action": "opened", "issue": {"number": 1}}"#;
        let err = ExecutionContext::from_event(repo(), payload).unwrap_err();
        assert!(err.to_string().contains("workflow_run"));
    }

    #[test]
    fn test_from_env_reads_event_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("event.json");
        std::fs::write(
            &path,
            r#"{"workflow_run": {"head_sha": "deadbeef", "display_title": "Bump deps"}}"#,
        )
        .unwrap();

        let ctx = ExecutionContext::from_env(Some("octo/widgets"), Some(&path)).unwrap();
        assert_eq!(ctx.repo, repo());
        assert_eq!(ctx.head_sha, "deadbeef");
        assert_eq!(ctx.display_title, "Bump deps");
    }

    #[test]
    fn test_from_env_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("missing.json");
        let err = ExecutionContext::from_env(Some("octo/widgets"), Some(&path)).unwrap_err();
        assert!(matches!(err, AppError::Context(_)));
    }
}
