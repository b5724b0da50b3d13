// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::process::ExitCode;

use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region};
use clap::Parser;
use iam_orphan_policy::configuration::OrphanOptions;
use iam_orphan_policy::constants::{EXIT_FAILURE, EXIT_PARTIAL_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
use iam_orphan_policy::finder::OrphanPolicyFinder;
use iam_orphan_policy::models::OrphanReport;
use iam_orphan_policy::store::IamPolicyStore;
use tracing_subscriber::EnvFilter;

async fn run(options: OrphanOptions) -> Result<OrphanReport> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &options.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let sdk_config = loader.load().await;

    let store = IamPolicyStore::new(aws_sdk_iam::Client::new(&sdk_config));
    let finder = OrphanPolicyFinder::new(&store);

    finder
        .run(options.scope, options.mode(), &options.policy_names)
        .await
        .with_context(|| format!("unable to list {} managed policies", options.scope))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with_writer(std::io::stderr)
        // this needs to be set to remove duplicated information in the log.
        .with_current_span(false)
        .with_ansi(false)
        .without_time()
        // remove the name of the function from every log entry
        .with_target(false)
        .init();

    let options = match OrphanOptions::try_parse() {
        Ok(options) => options,
        Err(err) => {
            let code = if err.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    tracing::info!("[orphan] {:?}", &options);

    match run(options).await {
        Ok(report) => {
            tracing::info!(
                "[orphan] described: {:?}, deleted: {:?}, failed: {:?}",
                report.described,
                report.deleted,
                report.failed
            );
            if report.is_partial_failure() {
                ExitCode::from(EXIT_PARTIAL_FAILURE)
            } else {
                ExitCode::from(EXIT_SUCCESS)
            }
        }
        Err(err) => {
            tracing::error!("[orphan] {:?}", err);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
