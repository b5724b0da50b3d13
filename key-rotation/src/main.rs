// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::process::ExitCode;

use clap::Parser;
use iam_key_rotation::application::Application;
use iam_key_rotation::configuration::RotationOptions;
use iam_key_rotation::constants::{
    EXIT_FAILURE, EXIT_PARTIAL_FAILURE, EXIT_SUCCESS, EXIT_USAGE,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        // stdout is reserved for the confirmation prompts
        .with_writer(std::io::stderr)
        // this needs to be set to remove duplicated information in the log.
        .with_current_span(false)
        .with_ansi(false)
        .without_time()
        // remove the name of the function from every log entry
        .with_target(false)
        .init();

    // get configuration options from arguments and environment variables
    let options = match RotationOptions::try_parse() {
        Ok(options) => options,
        Err(err) => {
            let code = if err.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    tracing::info!("[rotation] {:?}", &options);

    let application = match Application::build(options).await {
        Ok(application) => application,
        Err(err) => {
            tracing::error!("[rotation] unable to start: {}", err);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    match application.run().await {
        Ok(outcome) if outcome.is_partial_failure() => {
            tracing::warn!(
                "[rotation] finished with {} failed steps out of {} recorded actions",
                outcome.failures,
                outcome.summary.len()
            );
            ExitCode::from(EXIT_PARTIAL_FAILURE)
        }
        Ok(outcome) => {
            tracing::info!(
                "[rotation] finished, {} actions recorded, notified: {}",
                outcome.summary.len(),
                outcome.notified
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(err) => {
            tracing::error!("[rotation] run aborted: {}", err);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
