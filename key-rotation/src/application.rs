// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use aws_config::{BehaviorVersion, Region};
use chrono::{DateTime, Utc};

use crate::configuration::RotationOptions;
use crate::confirm::{ConfirmationProvider, TerminalPrompt};
use crate::directory::{IamDirectory, IdentityDirectory, load_key_inventory};
use crate::errors::AppError;
use crate::evaluator::{LifecycleEvaluator, Thresholds};
use crate::models::ActionSummary;
use crate::notifier::{Notifier, SnsNotifier, compose_notification};
use crate::remediation::RemediationEngine;
use crate::report::{ReportPolling, fetch_credential_report};
use crate::storage::{ObjectStore, S3ObjectStore};

/// Everything one run talks to.
pub struct Collaborators<'a> {
    pub directory: &'a dyn IdentityDirectory,
    pub store: &'a dyn ObjectStore,
    pub notifier: &'a dyn Notifier,
    pub confirmation: &'a dyn ConfirmationProvider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub summary: ActionSummary,
    pub notified: bool,
    /// Failed mutations plus a failed notification.
    pub failures: usize,
}

impl RunOutcome {
    pub fn is_partial_failure(&self) -> bool {
        self.failures > 0
    }
}

/// One full audit: passwords, then keys, then the notification.
#[tracing::instrument(skip(collaborators))]
pub async fn run_rotation(
    collaborators: &Collaborators<'_>,
    thresholds: Thresholds,
    polling: ReportPolling,
    now: DateTime<Utc>,
) -> Result<RunOutcome, AppError> {
    let evaluator = LifecycleEvaluator::new(now.date_naive(), thresholds);
    let mut summary = ActionSummary::new();

    match collaborators.directory.max_password_age().await? {
        Some(max_age) => {
            let report = fetch_credential_report(collaborators.directory, polling).await?;
            for warning in evaluator.evaluate_passwords(&report, max_age) {
                summary.record(warning.to_string());
            }
        }
        None => tracing::warn!("[rotation] no maximum password age set, skipping password checks"),
    }

    tracing::info!("[rotation] checking access keys");
    let inventory = load_key_inventory(collaborators.directory).await?;
    let keys = evaluator.evaluate_keys(&inventory)?;

    let engine = RemediationEngine::new(
        collaborators.directory,
        collaborators.store,
        collaborators.confirmation,
        thresholds,
    );
    let summary = engine.remediate(&keys, summary).await;

    let mut failures = summary.failures();
    let mut notified = false;
    if let Some(notification) = compose_notification(&summary, now) {
        match collaborators.notifier.publish(&notification).await {
            Ok(()) => notified = true,
            Err(err) => {
                tracing::error!("[rotation] {}", err);
                failures += 1;
            }
        }
    } else {
        tracing::info!("[rotation] nothing to report");
    }

    Ok(RunOutcome {
        summary,
        notified,
        failures,
    })
}

/// AWS backed collaborators built from the command line options.
pub struct Application {
    options: RotationOptions,
    directory: IamDirectory,
    store: S3ObjectStore,
    notifier: SnsNotifier,
    confirmation: TerminalPrompt,
}

impl Application {
    pub async fn build(options: RotationOptions) -> Result<Self, AppError> {
        if options.bucket.trim().is_empty() {
            return Err(AppError::ConfigError("bucket name is empty".to_string()));
        }
        if options.topic_arn.trim().is_empty() {
            return Err(AppError::ConfigError("topic ARN is empty".to_string()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &options.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        tracing::info!(
            "[rotation] region: {:?}, bucket: {}",
            sdk_config.region(),
            options.bucket
        );

        Ok(Self {
            directory: IamDirectory::new(aws_sdk_iam::Client::new(&sdk_config)),
            store: S3ObjectStore::new(aws_sdk_s3::Client::new(&sdk_config), &options.bucket),
            notifier: SnsNotifier::new(aws_sdk_sns::Client::new(&sdk_config), &options.topic_arn),
            confirmation: TerminalPrompt,
            options,
        })
    }

    pub async fn run(&self) -> Result<RunOutcome, AppError> {
        let collaborators = Collaborators {
            directory: &self.directory,
            store: &self.store,
            notifier: &self.notifier,
            confirmation: &self.confirmation,
        };

        run_rotation(
            &collaborators,
            self.options.thresholds(),
            self.options.report_polling(),
            Utc::now(),
        )
        .await
    }
}
