// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use async_trait::async_trait;
use aws_sdk_sns::Client;
use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::ActionSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub message: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, notification: &Notification) -> Result<(), AppError>;
}

/// Builds the end-of-run notification, or `None` when nothing happened.
pub fn compose_notification(summary: &ActionSummary, now: DateTime<Utc>) -> Option<Notification> {
    if summary.is_empty() {
        return None;
    }

    let mut message = format!(
        "The following actions were taken by the access key rotation run at {}:",
        now.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for line in summary.lines() {
        message.push_str("\n ");
        message.push_str(line);
    }

    Some(Notification {
        subject: format!("Expire Users Report for {}", now.format("%Y-%m-%d")),
        message,
    })
}

pub struct SnsNotifier {
    client: Client,
    topic_arn: String,
}

impl SnsNotifier {
    pub fn new(client: Client, topic_arn: impl Into<String>) -> Self {
        Self {
            client,
            topic_arn: topic_arn.into(),
        }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    #[tracing::instrument(skip(self, notification), fields(topic_arn = %self.topic_arn))]
    async fn publish(&self, notification: &Notification) -> Result<(), AppError> {
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(&notification.subject)
            .message(&notification.message)
            .send()
            .await
            .map_err(|err| {
                AppError::Notification(aws_sdk_sns::error::DisplayErrorContext(&err).to_string())
            })?;

        tracing::info!(
            "[rotation] published summary, message id: {:?}",
            output.message_id()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_summary_has_no_notification() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 8, 0, 0).unwrap();
        assert_eq!(compose_notification(&ActionSummary::new(), now), None);
    }

    #[test]
    fn test_compose_notification() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 8, 5, 0).unwrap();
        let mut summary = ActionSummary::new();
        summary.record("alice's password will expire in 10 days");
        summary.record("User bob's key AKIA2 has not been used yet or in the last 15 days");

        let notification = compose_notification(&summary, now).unwrap();

        assert_eq!(notification.subject, "Expire Users Report for 2024-06-30");
        assert_eq!(
            notification.message,
            "The following actions were taken by the access key rotation run at 2024-06-30 08:05:00 UTC:\n \
             alice's password will expire in 10 days\n \
             User bob's key AKIA2 has not been used yet or in the last 15 days"
        );
    }
}
