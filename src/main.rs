//! Actions Metrics Entry Point
//!
//! Binary entry of the GitHub Action. Reads the action inputs and the run
//! context from the environment, then hands off to the event dispatcher.
//!
//! # Usage
//!
//! ```yaml
//! on:
//!   workflow_run:
//!     workflows: ['**']
//!     types: [completed]
//!
//! jobs:
//!   metrics:
//!     runs-on: ubuntu-latest
//!     steps:
//!       - uses: actions-metrics/actions-metrics@v1
//!         with:
//!           github-token: ${{ secrets.GITHUB_TOKEN }}
//!           collect-job-metrics: true
//! ```

use std::error::Error;
use std::process::ExitCode;

use log::info;

use actions_metrics::config::{ActionInputs, GitHubContext};
use actions_metrics::{run, APP_NAME, VERSION};

/// Configures the logging system with GitHub Actions annotations.
///
/// Warnings and errors are rendered as workflow commands so they surface
/// in the run summary; debug records are hidden unless step debug logging
/// is enabled on the runner.
fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Error => writeln!(buf, "::error::{}", record.args()),
                log::Level::Warn => writeln!(buf, "::warning::{}", record.args()),
                log::Level::Debug | log::Level::Trace => {
                    writeln!(buf, "::debug::{}", record.args())
                }
                log::Level::Info => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Main application entry point.
async fn run_action() -> Result<(), Box<dyn Error>> {
    setup_logging();

    info!("{} v{}", APP_NAME, VERSION);

    let inputs = ActionInputs::from_env();
    let context = GitHubContext::from_env()?;

    info!(
        "Processing {} event for {}",
        context.event_name, context.repository
    );

    run::run(context, inputs).await
}

#[tokio::main]
async fn main() -> ExitCode {
    match run_action().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("::error::{}", e);
            ExitCode::FAILURE
        }
    }
}
