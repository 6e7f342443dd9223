//! The decision pipeline: resolve the PR, gather and classify its check runs,
//! then decide whether to ask for human attention.
//!
//! Every step runs sequentially. The PR is resolved before anything else so
//! later steps reuse the cached value instead of searching again.

pub mod checks;
pub mod classify;
pub mod dispatch;
pub mod resolver;
pub mod types;

use crate::config::UserInputs;
use crate::context::ExecutionContext;
use crate::error::Result;
use crate::logging::LogGroup;
use crate::platform::types::CheckRun;
use crate::platform::Platform;

use dispatch::Action;
use resolver::PullRequestResolver;
use types::{Classification, RequiredChecks, RunOutcome};

pub struct Gate<'a> {
    platform: &'a dyn Platform,
    context: &'a ExecutionContext,
    inputs: &'a UserInputs,
    resolver: PullRequestResolver<'a>,
}

impl<'a> Gate<'a> {
    pub fn new(
        platform: &'a dyn Platform,
        context: &'a ExecutionContext,
        inputs: &'a UserInputs,
    ) -> Self {
        Self {
            platform,
            context,
            inputs,
            resolver: PullRequestResolver::new(platform, context),
        }
    }

    pub fn resolver(&self) -> &PullRequestResolver<'a> {
        &self.resolver
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let noun = self.inputs.check_noun();

        {
            let _group = LogGroup::new("Gathering inputs...");
            crate::logging::debug_json("context", self.context);
            let pr = self.resolver.resolve().await?;
            tracing::info!(pr = pr.number, "PR #: {}", pr.number);
            tracing::debug!(inputs = ?self.inputs, "Inputs");
        }

        let selected = self.checks_to_check(noun).await?;

        let classification = self.compute_status(noun, &selected);
        if !classification.complete {
            tracing::warn!("All {noun} runs have *NOT* completed. Exiting.");
            return Ok(RunOutcome::ChecksIncomplete {
                pending: classification.pending,
            });
        }

        self.dispatch(classification.acceptable, classification.unacceptable)
            .await
    }

    async fn checks_to_check(&self, noun: &str) -> Result<Vec<CheckRun>> {
        let _group = LogGroup::new(format!("Getting {noun} to check..."));
        let all = checks::fetch_check_runs(self.platform, &self.context.head_sha).await?;

        // Looked up once, outside the filter.
        let required = if self.inputs.required_checks_only {
            checks::resolve_required_checks(self.platform, &self.resolver)
                .await
                .into_required_checks()
        } else {
            RequiredChecks::Unknown
        };

        let selected = classify::select_checks(all, self.inputs.required_checks_only, &required);
        tracing::info!("{noun}s to check:");
        for line in classify::describe(&selected) {
            tracing::info!("    - {line}");
        }
        Ok(selected)
    }

    fn compute_status(&self, noun: &str, selected: &[CheckRun]) -> Classification {
        let _group = LogGroup::new(format!("Computing {noun} run status..."));
        let classification = classify::classify(
            selected,
            &self.inputs.acceptable_conclusions,
            &self.inputs.unacceptable_conclusions,
        );

        if classification.complete {
            tracing::info!(count = selected.len(), "All {noun} runs have completed.");
            tracing::info!("All {noun}s are Acceptable:   {}", classification.acceptable);
            tracing::info!("Any {noun}s are Unacceptable: {}", classification.unacceptable);
        } else {
            tracing::info!(
                pending = %classification.pending.join(","),
                "Found {} completed {noun}s",
                selected.len() - classification.pending.len()
            );
        }
        classification
    }

    /// Act on a complete classification.
    pub async fn dispatch(&self, acceptable: bool, unacceptable: bool) -> Result<RunOutcome> {
        let pr = self.resolver.resolve().await?;
        let noun = self.inputs.check_noun();
        let _group = LogGroup::new(format!("Taking action on PR #{}", pr.number));

        match dispatch::decide(
            acceptable,
            unacceptable,
            self.inputs.delay_before_requesting_reviews,
        ) {
            Action::DelayThenRequest(delay) => {
                tracing::info!(
                    "All {noun} runs have acceptable conclusions. Waiting for {} seconds...",
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
                tracing::info!("Finished waiting for {} seconds.", delay.as_secs());
            }
            Action::RequestNow => {
                tracing::info!("Some {noun} runs have unacceptable conclusions.");
            }
            Action::Nothing => {
                tracing::info!("Nothing to do.");
                return Ok(RunOutcome::NothingToDo);
            }
        }

        if self.inputs.require_open_pull_request && !self.resolver.is_open(pr.number).await? {
            tracing::info!(pr = pr.number, "PR is no longer open. Skipping assignment and review request.");
            return Ok(RunOutcome::PullRequestClosed { pr: pr.number });
        }

        let report = dispatch::assign_and_request_reviewers(
            self.platform,
            pr.number,
            &self.inputs.assignees,
            &self.inputs.reviewers,
        )
        .await;

        Ok(RunOutcome::ActionTaken {
            pr: pr.clone(),
            report,
        })
    }
}
