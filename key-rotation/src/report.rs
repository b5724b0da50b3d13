// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Credential report retrieval.
//!
//! IAM generates the report asynchronously. [`fetch_credential_report`]
//! requests generation and polls at a fixed interval until the report is
//! complete, giving up after [`ReportPolling::max_attempts`].

use std::time::Duration;

use serde::Deserialize;

use crate::constants::REPORT_EMPTY_MARKERS;
use crate::directory::{IdentityDirectory, ReportState};
use crate::errors::AppError;
use crate::models::CredentialReportRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPolling {
    pub interval: Duration,
    pub max_attempts: u32,
}

/// Only the columns the password check needs; the rest are ignored.
#[derive(Debug, Deserialize)]
struct RawReportRow {
    user: String,
    password_enabled: String,
    password_last_changed: String,
}

impl From<RawReportRow> for CredentialReportRow {
    fn from(raw: RawReportRow) -> Self {
        let last_changed = raw.password_last_changed.trim();
        let password_last_changed = if last_changed.is_empty()
            || REPORT_EMPTY_MARKERS.contains(&last_changed)
        {
            None
        } else {
            Some(last_changed.to_string())
        };

        Self {
            user: raw.user,
            password_enabled: raw.password_enabled.trim().eq_ignore_ascii_case("true"),
            password_last_changed,
        }
    }
}

pub fn parse_credential_report(content: &[u8]) -> Result<Vec<CredentialReportRow>, AppError> {
    let mut reader = csv::Reader::from_reader(content);
    let mut rows = Vec::new();
    for raw in reader.deserialize::<RawReportRow>() {
        rows.push(raw?.into());
    }
    Ok(rows)
}

/// Generates the credential report and returns its parsed rows.
///
/// # Errors
///
/// - [`AppError::ReportTimeout`] when the report is not complete after
///   `max_attempts` polls
/// - any provider or parse error, unchanged
#[tracing::instrument(skip(directory))]
pub async fn fetch_credential_report(
    directory: &dyn IdentityDirectory,
    polling: ReportPolling,
) -> Result<Vec<CredentialReportRow>, AppError> {
    for attempt in 1..=polling.max_attempts {
        if directory.generate_credential_report().await? == ReportState::Complete {
            match directory.credential_report().await {
                Ok(content) => {
                    let rows = parse_credential_report(&content)?;
                    tracing::info!("[rotation] credential report has {} users", rows.len());
                    return Ok(rows);
                }
                Err(AppError::ReportNotReady) => {}
                Err(err) => return Err(err),
            }
        }

        tracing::debug!(
            "[rotation] credential report not ready (attempt {}/{}), sleeping for {:#?}",
            attempt,
            polling.max_attempts,
            polling.interval
        );
        if attempt < polling.max_attempts {
            tokio::time::sleep(polling.interval).await;
        }
    }

    Err(AppError::ReportTimeout(polling.max_attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessKeyRecord, KeyLastUsed, NewAccessKey};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    const REPORT: &str = "\
user,arn,user_creation_time,password_enabled,password_last_used,password_last_changed,password_next_rotation,mfa_active
<root_account>,arn:aws:iam::123456789012:root,2020-01-01T00:00:00+00:00,not_supported,2024-06-01T00:00:00+00:00,not_supported,not_supported,true
alice,arn:aws:iam::123456789012:user/alice,2021-03-04T10:00:00+00:00,true,2024-06-20T09:00:00+00:00,2024-04-11T10:00:00+00:00,2024-07-10T10:00:00+00:00,true
deploy-bot,arn:aws:iam::123456789012:user/deploy-bot,2022-05-06T10:00:00+00:00,false,N/A,N/A,N/A,false
";

    #[test]
    fn test_parse_credential_report() {
        let rows = parse_credential_report(REPORT.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].user, "<root_account>");
        assert!(!rows[0].password_enabled);
        assert_eq!(rows[0].password_last_changed, None);

        assert_eq!(
            rows[1],
            CredentialReportRow {
                user: "alice".to_string(),
                password_enabled: true,
                password_last_changed: Some("2024-04-11T10:00:00+00:00".to_string()),
            }
        );

        assert!(!rows[2].password_enabled);
        assert_eq!(rows[2].password_last_changed, None);
    }

    #[test]
    fn test_parse_credential_report_missing_column() {
        let result = parse_credential_report(b"user,arn\nalice,arn:aws:iam::1:user/alice\n");
        assert!(matches!(result, Err(AppError::ReportParse(_))));
    }

    /// Report generation completes at once, but the download is refused
    /// `not_ready_fetches` times before the content is served.
    struct SlowDownload {
        not_ready_fetches: u32,
        fetches: AtomicU32,
    }

    impl SlowDownload {
        fn new(not_ready_fetches: u32) -> Self {
            Self {
                not_ready_fetches,
                fetches: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl IdentityDirectory for SlowDownload {
        async fn list_users(&self) -> Result<Vec<String>, AppError> {
            Ok(Vec::new())
        }

        async fn list_access_keys(&self, _user: &str) -> Result<Vec<AccessKeyRecord>, AppError> {
            Ok(Vec::new())
        }

        async fn access_key_last_used(&self, access_key_id: &str) -> Result<KeyLastUsed, AppError> {
            Ok(KeyLastUsed::never_used(access_key_id))
        }

        async fn create_access_key(&self, _user: &str) -> Result<NewAccessKey, AppError> {
            unimplemented!()
        }

        async fn deactivate_access_key(
            &self,
            _user: &str,
            _access_key_id: &str,
        ) -> Result<(), AppError> {
            unimplemented!()
        }

        async fn delete_access_key(&self, _user: &str, _access_key_id: &str) -> Result<(), AppError> {
            unimplemented!()
        }

        async fn generate_credential_report(&self) -> Result<ReportState, AppError> {
            Ok(ReportState::Complete)
        }

        async fn credential_report(&self) -> Result<Vec<u8>, AppError> {
            let fetch = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            if fetch <= self.not_ready_fetches {
                return Err(AppError::ReportNotReady);
            }
            Ok(REPORT.as_bytes().to_vec())
        }

        async fn max_password_age(&self) -> Result<Option<i64>, AppError> {
            Ok(Some(90))
        }
    }

    fn polling(max_attempts: u32) -> ReportPolling {
        ReportPolling {
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    #[tokio::test]
    async fn test_fetch_retries_download_until_ready() {
        let directory = SlowDownload::new(2);

        let rows = fetch_credential_report(&directory, polling(3)).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].user, "alice");
        assert_eq!(directory.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_gives_up_when_download_stays_unavailable() {
        let directory = SlowDownload::new(2);

        let result = fetch_credential_report(&directory, polling(2)).await;

        assert_eq!(result, Err(AppError::ReportTimeout(2)));
        assert_eq!(directory.fetches.load(Ordering::SeqCst), 2);
    }
}
