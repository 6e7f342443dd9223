use crate::error::Result;
use crate::gate::resolver::PullRequestResolver;
use crate::gate::types::{Lookup, RequiredChecks};
use crate::platform::types::CheckRun;
use crate::platform::Platform;

/// All check runs reported for `git_ref`, unfiltered.
pub async fn fetch_check_runs(platform: &dyn Platform, git_ref: &str) -> Result<Vec<CheckRun>> {
    tracing::info!(sha = %git_ref, "Retrieving check runs...");
    let runs = platform.list_check_runs(git_ref).await?;
    tracing::info!(count = runs.len(), "Retrieved check runs");
    crate::logging::debug_json("fetch_check_runs > runs", &runs);
    Ok(runs)
}

/// Required-check names for the PR's base branch.
///
/// Never fails the run: a missing policy resolves to `Unknown`, and any other
/// problem comes back as `Degraded`.
pub async fn resolve_required_checks(
    platform: &dyn Platform,
    resolver: &PullRequestResolver<'_>,
) -> Lookup<RequiredChecks> {
    let pr = match resolver.resolve().await {
        Ok(pr) => pr,
        Err(e) => {
            tracing::warn!(error = %e, "Could not resolve PR; proceeding assuming there are no required checks");
            return Lookup::Degraded {
                reason: e.to_string(),
            };
        }
    };

    let Some(base_ref) = pr.base_ref.as_deref() else {
        tracing::error!(pr = pr.number, "Error getting base ref for PR");
        return Lookup::Degraded {
            reason: format!("base ref unknown for PR #{}", pr.number),
        };
    };
    tracing::info!(base_ref, "Retrieving branch protection information...");

    match platform.required_status_checks(base_ref).await {
        Ok(Some(names)) => {
            crate::logging::debug_json("resolve_required_checks > names", &names);
            Lookup::Resolved(RequiredChecks::known(names))
        }
        Ok(None) => {
            tracing::warn!(
                base_ref,
                "Branch has no required status checks policy; proceeding assuming there are no required checks"
            );
            Lookup::Resolved(RequiredChecks::Unknown)
        }
        Err(e) => {
            tracing::warn!(
                base_ref,
                error = %e,
                "Proceeding assuming there are no required checks"
            );
            Lookup::Degraded {
                reason: e.to_string(),
            }
        }
    }
}
