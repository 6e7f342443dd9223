use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Install the global subscriber. `RUST_LOG` wins; otherwise the runner's
/// debug flag decides between `debug` and `info`.
pub fn init(format: LogFormat) {
    let default_level = if runner_debug() { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

fn runner_debug() -> bool {
    std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1")
}

/// Workflow commands (`::group::`, `::error::`) only mean something on an Actions runner.
fn workflow_commands_enabled() -> bool {
    std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true")
}

/// A collapsible section of the run log. Closed when dropped, so an early
/// return or `?` never leaves a group open.
pub struct LogGroup {
    title: String,
    markers: bool,
}

impl LogGroup {
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let markers = workflow_commands_enabled();
        if markers {
            println!("::group::{title}");
        } else {
            tracing::info!(group = %title, "begin");
        }
        Self { title, markers }
    }
}

impl Drop for LogGroup {
    fn drop(&mut self) {
        if self.markers {
            println!("::endgroup::");
        } else {
            tracing::debug!(group = %self.title, "end");
        }
    }
}

/// Surface the run's failure reason on the workflow summary.
pub fn set_failed(message: &str) {
    if workflow_commands_enabled() {
        println!("::error::{}", escape_data(message));
    }
}

/// Workflow command data must not contain raw `%`, CR or LF.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Pretty-print a value at debug level between BEGIN/END markers.
pub fn debug_json<T: Serialize + ?Sized>(name: &str, value: &T) {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            tracing::debug!("====== BEGIN {name} ======");
            tracing::debug!("{json}");
            tracing::debug!("======= END {name} =======");
        }
        Err(e) => tracing::debug!(error = %e, "Could not serialize {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_data() {
        assert_eq!(escape_data("100% broken\nline two"), "100%25 broken%0Aline two");
        assert_eq!(escape_data("plain"), "plain");
    }
}
