use std::collections::BTreeSet;

use crate::gate::types::{Classification, RequiredChecks};
use crate::platform::types::{CheckConclusion, CheckRun};

/// Narrow the check runs to the ones the gate looks at.
pub fn select_checks(
    all: Vec<CheckRun>,
    required_only: bool,
    required: &RequiredChecks,
) -> Vec<CheckRun> {
    if !required_only {
        return all;
    }
    all.into_iter().filter(|run| required.admits(&run.name)).collect()
}

pub fn classify(
    selected: &[CheckRun],
    acceptable: &BTreeSet<CheckConclusion>,
    unacceptable: &BTreeSet<CheckConclusion>,
) -> Classification {
    let (completed, pending): (Vec<&CheckRun>, Vec<&CheckRun>) =
        selected.iter().partition(|run| run.is_completed());

    let is_in = |set: &BTreeSet<CheckConclusion>, run: &CheckRun| {
        run.conclusion.is_some_and(|c| set.contains(&c))
    };

    Classification {
        complete: pending.is_empty(),
        acceptable: completed.iter().all(|&run| is_in(acceptable, run)),
        unacceptable: completed.iter().any(|&run| is_in(unacceptable, run)),
        pending: pending.iter().map(|run| run.name.clone()).collect(),
    }
}

/// One line per selected run: `#idx [status | conclusion] -> name`.
pub fn describe(selected: &[CheckRun]) -> Vec<String> {
    selected
        .iter()
        .enumerate()
        .map(|(idx, run)| {
            let conclusion = run.conclusion.map(|c| c.as_str()).unwrap_or("");
            format!(
                "#{idx:>2}) [{:>12} | {conclusion:>16}] -> {}",
                run.status.as_str(),
                run.name
            )
        })
        .collect()
}
