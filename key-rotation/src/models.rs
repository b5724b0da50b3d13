// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use zeroize::ZeroizeOnDrop;

/// One user row of the IAM credential report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialReportRow {
    pub user: String,
    pub password_enabled: bool,
    /// Raw report timestamp, `None` when the report carries no value.
    pub password_last_changed: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessKeyRecord {
    pub owner: String,
    pub access_key_id: String,
    pub status: KeyStatus,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLastUsed {
    pub access_key_id: String,
    /// `None` when the key has never been used by any service.
    pub service_name: Option<String>,
    pub last_used: Option<DateTime<Utc>>,
}

impl KeyLastUsed {
    pub fn never_used(access_key_id: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            service_name: None,
            last_used: None,
        }
    }
}

/// Lifecycle state of one access key for the current run.
///
/// At most one of `expired` and `about_to_expire` is set. `unused` is
/// computed independently of both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyClassification {
    pub owner: String,
    pub access_key_id: String,
    pub status: KeyStatus,
    pub created: NaiveDate,
    pub expiry_days: i64,
    pub expired: bool,
    pub about_to_expire: bool,
    pub unused: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordWarningKind {
    Expired { days_ago: i64 },
    ExpiringSoon { days_left: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordWarning {
    pub user: String,
    pub kind: PasswordWarningKind,
}

impl fmt::Display for PasswordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PasswordWarningKind::Expired { days_ago } => {
                write!(f, "{}'s password expired {} days ago", self.user, days_ago)
            }
            PasswordWarningKind::ExpiringSoon { days_left } => {
                write!(f, "{}'s password will expire in {} days", self.user, days_left)
            }
        }
    }
}

/// Credential material of a freshly created access key.
#[derive(Clone, ZeroizeOnDrop)]
pub struct NewAccessKey {
    pub access_key_id: String,
    pub secret_access_key: String,
}

// Custom Debug implementation to prevent accidental logging of sensitive data
impl fmt::Debug for NewAccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccessKey")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .finish()
    }
}

/// Ordered record of everything a run did, delivered once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSummary {
    lines: Vec<String>,
    failures: usize,
}

impl ActionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Records a failed step; it is reported like any other line and counted.
    pub fn record_failure(&mut self, line: impl Into<String>) {
        self.failures += 1;
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}
