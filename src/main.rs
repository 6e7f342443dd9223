use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use review_gate::config::UserInputs;
use review_gate::context::ExecutionContext;
use review_gate::gate::types::RunOutcome;
use review_gate::gate::Gate;
use review_gate::logging::{self, LogFormat};
use review_gate::platform::github::GitHubPlatform;

#[derive(Parser)]
#[command(
    name = "review-gate",
    about = "Request reviewers once a pull request's checks settle"
)]
struct Cli {
    /// Path to an inputs file, layered under INPUT_* environment variables
    #[arg(short, long)]
    config: Option<String>,

    /// Workflow run event payload (defaults to GITHUB_EVENT_PATH)
    #[arg(long)]
    event_path: Option<PathBuf>,

    /// Repository as owner/name (defaults to GITHUB_REPOSITORY)
    #[arg(long)]
    repository: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    match run(&cli).await {
        Ok(outcome) => {
            match outcome {
                RunOutcome::ChecksIncomplete { pending } => {
                    tracing::info!(pending = %pending.join(","), "Checks still running; a later run will decide")
                }
                RunOutcome::NothingToDo => tracing::info!("No action taken"),
                RunOutcome::PullRequestClosed { pr } => tracing::info!(pr, "PR closed; no action taken"),
                RunOutcome::ActionTaken { pr, report } => tracing::info!(
                    pr = pr.number,
                    assignment = ?report.assignment,
                    review_request = ?report.review_request,
                    "Action taken"
                ),
            }
            tracing::info!("Completed.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            logging::set_failed(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<RunOutcome> {
    let inputs = UserInputs::load(cli.config.as_deref()).context("Failed to load inputs")?;
    let context = ExecutionContext::from_env(cli.repository.as_deref(), cli.event_path.as_deref())
        .context("Failed to read the workflow run context")?;

    let api_url = std::env::var("GITHUB_API_URL").ok();
    let platform = GitHubPlatform::new(&inputs.token, context.repo.clone(), api_url.as_deref())?;

    let outcome = Gate::new(&platform, &context, &inputs).run().await?;
    Ok(outcome)
}
