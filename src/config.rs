use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::platform::types::CheckConclusion;

/// Action inputs exactly as the runner hands them over: strings, possibly blank.
///
/// The runner exports each input as `INPUT_<NAME>`; the config crate lowercases
/// those keys, so every field accepts both spellings.
#[derive(Deserialize, Default, Clone)]
pub struct RawInputs {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "acceptableconclusions", alias = "acceptableConclusions")]
    pub acceptable_conclusions: Option<String>,
    #[serde(default, rename = "unacceptableconclusions", alias = "unacceptableConclusions")]
    pub unacceptable_conclusions: Option<String>,
    #[serde(default)]
    pub assignees: Option<String>,
    #[serde(default)]
    pub reviewers: Option<String>,
    #[serde(default, rename = "requiredchecksonly", alias = "requiredChecksOnly")]
    pub required_checks_only: Option<String>,
    #[serde(
        default,
        rename = "delaybeforerequestingreviews",
        alias = "delayBeforeRequestingReviews"
    )]
    pub delay_before_requesting_reviews: Option<String>,
    #[serde(default, rename = "requireopenpullrequest", alias = "requireOpenPullRequest")]
    pub require_open_pull_request: Option<String>,
}

// Manual Debug impl to avoid leaking the token
impl std::fmt::Debug for RawInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawInputs")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("acceptable_conclusions", &self.acceptable_conclusions)
            .field("unacceptable_conclusions", &self.unacceptable_conclusions)
            .field("assignees", &self.assignees)
            .field("reviewers", &self.reviewers)
            .field("required_checks_only", &self.required_checks_only)
            .field("delay_before_requesting_reviews", &self.delay_before_requesting_reviews)
            .field("require_open_pull_request", &self.require_open_pull_request)
            .finish()
    }
}

impl RawInputs {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Inputs passed by the Actions runner as INPUT_<NAME>
        Self::load_from(config_path, config::Environment::with_prefix("INPUT"))
    }

    /// Layer `env` over the optional file at `config_path`.
    pub fn load_from(config_path: Option<&str>, env: config::Environment) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }
        builder = builder.add_source(env);

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

/// Parsed, validated user inputs. Immutable for the run.
#[derive(Clone, PartialEq, Eq)]
pub struct UserInputs {
    pub token: String,
    pub acceptable_conclusions: BTreeSet<CheckConclusion>,
    pub unacceptable_conclusions: BTreeSet<CheckConclusion>,
    pub assignees: Vec<String>,
    pub reviewers: Vec<String>,
    pub required_checks_only: bool,
    pub delay_before_requesting_reviews: u64,
    pub require_open_pull_request: bool,
}

impl std::fmt::Debug for UserInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserInputs")
            .field("token", &"[REDACTED]")
            .field("acceptable_conclusions", &self.acceptable_conclusions)
            .field("unacceptable_conclusions", &self.unacceptable_conclusions)
            .field("assignees", &self.assignees)
            .field("reviewers", &self.reviewers)
            .field("required_checks_only", &self.required_checks_only)
            .field("delay_before_requesting_reviews", &self.delay_before_requesting_reviews)
            .field("require_open_pull_request", &self.require_open_pull_request)
            .finish()
    }
}

impl UserInputs {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::from_raw(RawInputs::load(config_path)?)
    }

    pub fn from_raw(raw: RawInputs) -> Result<Self> {
        let token = non_blank(raw.token.as_deref())
            .ok_or_else(|| AppError::Config("Input required and not supplied: token".to_string()))?
            .to_string();

        let acceptable_conclusions = parse_conclusions(
            "acceptableConclusions",
            raw.acceptable_conclusions.as_deref(),
            &CheckConclusion::ALL_VALID,
        )?;
        let unacceptable_conclusions = parse_conclusions(
            "unacceptableConclusions",
            raw.unacceptable_conclusions.as_deref(),
            &[],
        )?;

        let delay_before_requesting_reviews =
            match non_blank(raw.delay_before_requesting_reviews.as_deref()) {
                None => 0,
                Some(value) => value.parse::<u64>().map_err(|_| {
                    AppError::Config(format!(
                        "delayBeforeRequestingReviews must be a non-negative number of seconds, got '{value}'"
                    ))
                })?,
            };

        Ok(Self {
            token,
            acceptable_conclusions,
            unacceptable_conclusions,
            assignees: split_csv(raw.assignees.as_deref()),
            reviewers: split_csv(raw.reviewers.as_deref()),
            required_checks_only: parse_flag(raw.required_checks_only.as_deref(), true),
            delay_before_requesting_reviews,
            require_open_pull_request: parse_flag(raw.require_open_pull_request.as_deref(), false),
        })
    }

    /// How log lines refer to the checks being inspected.
    pub fn check_noun(&self) -> &'static str {
        if self.required_checks_only {
            "required check"
        } else {
            "check"
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Split a CSV input, trimming items and dropping empty ones.
fn split_csv(value: Option<&str>) -> Vec<String> {
    non_blank(value)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Only the literal `true` enables a flag; a blank input takes the default.
fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match non_blank(value) {
        Some(v) => v == "true",
        None => default,
    }
}

fn parse_conclusions(
    name: &str,
    value: Option<&str>,
    default: &[CheckConclusion],
) -> Result<BTreeSet<CheckConclusion>> {
    if non_blank(value).is_none() {
        return Ok(default.iter().copied().collect());
    }
    split_csv(value)
        .iter()
        .map(|item| {
            item.parse::<CheckConclusion>()
                .map_err(|e| AppError::Config(format!("{name}: {e}")))
        })
        .collect()
}
