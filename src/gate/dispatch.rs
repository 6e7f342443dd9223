use std::time::Duration;

use crate::gate::types::{DispatchReport, SideEffect};
use crate::platform::Platform;

/// What to do about the pull request, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Every check is acceptable: wait, then ask for review.
    DelayThenRequest(Duration),
    /// Something concluded unacceptably: ask for attention right away.
    RequestNow,
    Nothing,
}

/// Pick the action for a classification.
///
/// An acceptable result with no delay configured does nothing; only an
/// unacceptable result triggers an immediate request.
pub fn decide(acceptable: bool, unacceptable: bool, delay_seconds: u64) -> Action {
    if acceptable && delay_seconds > 0 {
        Action::DelayThenRequest(Duration::from_secs(delay_seconds))
    } else if unacceptable {
        Action::RequestNow
    } else {
        Action::Nothing
    }
}

/// Assign the PR and request reviews. Each call is attempted on its own and a
/// failure is only logged.
pub async fn assign_and_request_reviewers(
    platform: &dyn Platform,
    pr: u64,
    assignees: &[String],
    reviewers: &[String],
) -> DispatchReport {
    let assignment = if assignees.is_empty() {
        tracing::info!("Assignees not set. Skipping PR assignment...");
        SideEffect::Skipped
    } else {
        tracing::info!(pr, assignees = %assignees.join(","), "Setting assignees");
        match platform.add_assignees(pr, assignees).await {
            Ok(()) => SideEffect::Applied,
            Err(e) => {
                tracing::warn!(pr, error = %e, "Error assigning PR to: [{}]", assignees.join(","));
                SideEffect::Failed(e.to_string())
            }
        }
    };

    let review_request = if reviewers.is_empty() {
        tracing::info!("Reviewers not set. Skipping requesting review...");
        SideEffect::Skipped
    } else {
        tracing::info!(pr, reviewers = %reviewers.join(","), "Requesting reviewers");
        match platform.request_reviewers(pr, reviewers).await {
            Ok(()) => SideEffect::Applied,
            Err(e) => {
                tracing::warn!(pr, error = %e, "Error requesting reviewer(s) on PR: [{}]", reviewers.join(","));
                SideEffect::Failed(e.to_string())
            }
        }
    };

    DispatchReport {
        assignment,
        review_request,
    }
}
