// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Lifecycle evaluation of passwords and access keys.
//!
//! The evaluator is pure: it reads the credential report rows and the key
//! inventory gathered by the caller and returns warnings and
//! classifications. Nothing is remembered between calls.

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{
    AccessKeyRecord, CredentialReportRow, KeyClassification, KeyLastUsed, PasswordWarning,
    PasswordWarningKind,
};
use crate::policy::days_remaining;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Maximum access key age in days.
    pub key_age_days: i64,
    /// Warning window before expiry; also the idle window for `unused`.
    pub grace_days: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct LifecycleEvaluator {
    today: NaiveDate,
    thresholds: Thresholds,
}

impl LifecycleEvaluator {
    pub fn new(today: NaiveDate, thresholds: Thresholds) -> Self {
        Self { today, thresholds }
    }

    /// Reports passwords that expired or expire within the grace window.
    ///
    /// Users without console password (service accounts) are skipped.
    #[tracing::instrument(skip(self, report))]
    pub fn evaluate_passwords(
        &self,
        report: &[CredentialReportRow],
        max_password_age: i64,
    ) -> Vec<PasswordWarning> {
        let mut warnings = Vec::new();

        for row in report.iter().filter(|row| row.password_enabled) {
            let Some(last_changed) = row.password_last_changed.as_deref() else {
                tracing::warn!("[rotation] no password change date for {}", row.user);
                continue;
            };

            let remaining = match days_remaining(last_changed, max_password_age, self.today) {
                Ok(remaining) => remaining,
                Err(err) => {
                    tracing::warn!("[rotation] skipping password of {}: {}", row.user, err);
                    continue;
                }
            };

            let kind = if remaining <= 0 {
                PasswordWarningKind::Expired {
                    days_ago: remaining.abs(),
                }
            } else if remaining < self.thresholds.grace_days {
                PasswordWarningKind::ExpiringSoon {
                    days_left: remaining,
                }
            } else {
                continue;
            };

            warnings.push(PasswordWarning {
                user: row.user.clone(),
                kind,
            });
        }

        warnings
    }

    /// Classifies every key of the inventory, in inventory order.
    #[tracing::instrument(skip(self, inventory))]
    pub fn evaluate_keys(
        &self,
        inventory: &[(AccessKeyRecord, KeyLastUsed)],
    ) -> Result<Vec<KeyClassification>, AppError> {
        inventory
            .iter()
            .map(|(record, last_used)| self.classify_key(record, last_used))
            .collect()
    }

    pub fn classify_key(
        &self,
        record: &AccessKeyRecord,
        last_used: &KeyLastUsed,
    ) -> Result<KeyClassification, AppError> {
        let expiry_days = days_remaining(&record.created, self.thresholds.key_age_days, self.today)?;
        let expired = expiry_days <= 0;
        let about_to_expire = !expired && expiry_days < self.thresholds.grace_days;

        let unused = match (&last_used.service_name, &last_used.last_used) {
            (Some(_), Some(last_used)) => {
                days_remaining(last_used, self.thresholds.grace_days, self.today)? <= 0
            }
            _ => true,
        };

        Ok(KeyClassification {
            owner: record.owner.clone(),
            access_key_id: record.access_key_id.clone(),
            status: record.status,
            created: record.created.date_naive(),
            expiry_days,
            expired,
            about_to_expire,
            unused,
        })
    }
}
