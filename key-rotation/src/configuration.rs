// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::time::Duration;

use clap::Parser;

use crate::constants::{
    DEFAULT_GRACE_DAYS, DEFAULT_KEY_AGE_DAYS, DEFAULT_REPORT_MAX_ATTEMPTS,
    DEFAULT_REPORT_POLL_INTERVAL_SECS,
};
use crate::evaluator::Thresholds;
use crate::report::ReportPolling;

#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Audits IAM passwords and rotates expired access keys",
    long_about = None
)]
pub struct RotationOptions {
    /// Access keys at least this many days old are rotated and deactivated
    #[arg(long, default_value_t = DEFAULT_KEY_AGE_DAYS, env("ROTATION_KEY_AGE_DAYS"),
        value_parser = clap::value_parser!(i64).range(1..))]
    pub key_age_days: i64,
    /// Warning window before expiry and idle window for unused keys
    #[arg(long, default_value_t = DEFAULT_GRACE_DAYS, env("ROTATION_GRACE_DAYS"),
        value_parser = clap::value_parser!(i64).range(1..))]
    pub grace_days: i64,
    /// Bucket receiving the credential files of replacement keys
    #[arg(long, env("ROTATION_BUCKET_NAME"))]
    pub bucket: String,
    /// SNS topic receiving the end-of-run summary
    #[arg(long, env("ROTATION_TOPIC_ARN"))]
    pub topic_arn: String,
    #[arg(long, default_value_t = DEFAULT_REPORT_POLL_INTERVAL_SECS, env("ROTATION_REPORT_POLL_INTERVAL_SECS"))]
    pub report_poll_interval_secs: u64,
    #[arg(long, default_value_t = DEFAULT_REPORT_MAX_ATTEMPTS, env("ROTATION_REPORT_MAX_ATTEMPTS"),
        value_parser = clap::value_parser!(u32).range(1..))]
    pub report_max_attempts: u32,
    #[arg(long, env("AWS_REGION"))]
    pub region: Option<String>,
}

impl RotationOptions {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            key_age_days: self.key_age_days,
            grace_days: self.grace_days,
        }
    }

    pub fn report_polling(&self) -> ReportPolling {
        ReportPolling {
            interval: Duration::from_secs(self.report_poll_interval_secs),
            max_attempts: self.report_max_attempts,
        }
    }
}

impl Default for RotationOptions {
    fn default() -> Self {
        RotationOptions {
            key_age_days: DEFAULT_KEY_AGE_DAYS,
            grace_days: DEFAULT_GRACE_DAYS,
            bucket: "access-keys".to_string(),
            topic_arn: "arn:aws:sns:us-east-1:123456789012:iam_keys_rotation".to_string(),
            report_poll_interval_secs: DEFAULT_REPORT_POLL_INTERVAL_SECS,
            report_max_attempts: DEFAULT_REPORT_MAX_ATTEMPTS,
            region: None,
        }
    }
}
