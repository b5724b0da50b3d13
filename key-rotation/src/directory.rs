// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! IAM identity directory access.
//!
//! [`IdentityDirectory`] is the seam between the rotation logic and IAM.
//! [`IamDirectory`] implements it with `aws-sdk-iam`; tests substitute
//! in-memory directories.

use async_trait::async_trait;
use aws_sdk_iam::Client;
use aws_sdk_iam::primitives::DateTime as SmithyDateTime;
use aws_sdk_iam::types::{ReportStateType, StatusType};
use chrono::{DateTime, Utc};

use crate::constants::NEVER_USED_SERVICE;
use crate::errors::AppError;
use crate::models::{AccessKeyRecord, KeyLastUsed, KeyStatus, NewAccessKey};

/// Generation state of the credential report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportState {
    Started,
    InProgress,
    Complete,
}

#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn list_users(&self) -> Result<Vec<String>, AppError>;

    async fn list_access_keys(&self, user: &str) -> Result<Vec<AccessKeyRecord>, AppError>;

    async fn access_key_last_used(&self, access_key_id: &str) -> Result<KeyLastUsed, AppError>;

    async fn create_access_key(&self, user: &str) -> Result<NewAccessKey, AppError>;

    async fn deactivate_access_key(&self, user: &str, access_key_id: &str)
    -> Result<(), AppError>;

    async fn delete_access_key(&self, user: &str, access_key_id: &str) -> Result<(), AppError>;

    async fn generate_credential_report(&self) -> Result<ReportState, AppError>;

    /// Returns the raw CSV report, or [`AppError::ReportNotReady`] while
    /// it is still being generated.
    async fn credential_report(&self) -> Result<Vec<u8>, AppError>;

    /// Maximum password age of the account policy, `None` when the account
    /// has no policy or the policy does not expire passwords.
    async fn max_password_age(&self) -> Result<Option<i64>, AppError>;
}

/// Gathers every key of every user together with its last-used data.
///
/// Users and keys are visited one at a time, in listing order.
#[tracing::instrument(skip(directory))]
pub async fn load_key_inventory(
    directory: &dyn IdentityDirectory,
) -> Result<Vec<(AccessKeyRecord, KeyLastUsed)>, AppError> {
    let users = directory.list_users().await?;
    tracing::debug!("[rotation] found {} users", users.len());

    let mut inventory = Vec::new();
    for user in users {
        for record in directory.list_access_keys(&user).await? {
            let last_used = directory.access_key_last_used(&record.access_key_id).await?;
            inventory.push((record, last_used));
        }
    }

    tracing::info!("[rotation] loaded {} access keys", inventory.len());

    Ok(inventory)
}

pub struct IamDirectory {
    client: Client,
}

impl IamDirectory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn to_chrono(value: &SmithyDateTime) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
        .ok_or_else(|| AppError::InvalidDate(format!("{value:?}")))
}

#[async_trait]
impl IdentityDirectory for IamDirectory {
    #[tracing::instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<String>, AppError> {
        let users = self
            .client
            .list_users()
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(AppError::provider("ListUsers"))?;

        Ok(users
            .into_iter()
            .map(|user| user.user_name().to_string())
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn list_access_keys(&self, user: &str) -> Result<Vec<AccessKeyRecord>, AppError> {
        let keys = self
            .client
            .list_access_keys()
            .user_name(user)
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(AppError::provider("ListAccessKeys"))?;

        keys.iter()
            .map(|key| {
                let access_key_id = key
                    .access_key_id()
                    .ok_or(AppError::MissingField("AccessKeyId"))?;
                let created = key
                    .create_date()
                    .ok_or(AppError::MissingField("CreateDate"))?;
                let status = match key.status() {
                    Some(StatusType::Active) => KeyStatus::Active,
                    _ => KeyStatus::Inactive,
                };

                Ok(AccessKeyRecord {
                    owner: key.user_name().unwrap_or(user).to_string(),
                    access_key_id: access_key_id.to_string(),
                    status,
                    created: to_chrono(created)?,
                })
            })
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn access_key_last_used(&self, access_key_id: &str) -> Result<KeyLastUsed, AppError> {
        let output = self
            .client
            .get_access_key_last_used()
            .access_key_id(access_key_id)
            .send()
            .await
            .map_err(AppError::provider("GetAccessKeyLastUsed"))?;

        let Some(last_used) = output.access_key_last_used() else {
            return Ok(KeyLastUsed::never_used(access_key_id));
        };

        let service_name = Some(last_used.service_name())
            .filter(|name| !name.is_empty() && *name != NEVER_USED_SERVICE)
            .map(str::to_string);
        let last_used = match last_used.last_used_date() {
            Some(date) if service_name.is_some() => Some(to_chrono(date)?),
            _ => None,
        };

        Ok(KeyLastUsed {
            access_key_id: access_key_id.to_string(),
            service_name,
            last_used,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn create_access_key(&self, user: &str) -> Result<NewAccessKey, AppError> {
        let output = self
            .client
            .create_access_key()
            .user_name(user)
            .send()
            .await
            .map_err(AppError::provider("CreateAccessKey"))?;

        let key = output
            .access_key()
            .ok_or(AppError::MissingField("AccessKey"))?;

        Ok(NewAccessKey {
            access_key_id: key.access_key_id().to_string(),
            secret_access_key: key.secret_access_key().to_string(),
        })
    }

    #[tracing::instrument(skip(self))]
    async fn deactivate_access_key(
        &self,
        user: &str,
        access_key_id: &str,
    ) -> Result<(), AppError> {
        self.client
            .update_access_key()
            .user_name(user)
            .access_key_id(access_key_id)
            .status(StatusType::Inactive)
            .send()
            .await
            .map_err(AppError::provider("UpdateAccessKey"))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_access_key(&self, user: &str, access_key_id: &str) -> Result<(), AppError> {
        self.client
            .delete_access_key()
            .user_name(user)
            .access_key_id(access_key_id)
            .send()
            .await
            .map_err(AppError::provider("DeleteAccessKey"))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn generate_credential_report(&self) -> Result<ReportState, AppError> {
        let output = self
            .client
            .generate_credential_report()
            .send()
            .await
            .map_err(AppError::provider("GenerateCredentialReport"))?;

        Ok(match output.state() {
            Some(ReportStateType::Complete) => ReportState::Complete,
            Some(ReportStateType::Started) => ReportState::Started,
            _ => ReportState::InProgress,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn credential_report(&self) -> Result<Vec<u8>, AppError> {
        let output = match self.client.get_credential_report().send().await {
            Ok(output) => output,
            Err(err)
                if err.as_service_error().is_some_and(|e| {
                    e.is_credential_report_not_ready_exception()
                        || e.is_credential_report_not_present_exception()
                        || e.is_credential_report_expired_exception()
                }) =>
            {
                return Err(AppError::ReportNotReady);
            }
            Err(err) => return Err(AppError::provider("GetCredentialReport")(err)),
        };

        let content = output.content().ok_or(AppError::MissingField("Content"))?;
        Ok(content.as_ref().to_vec())
    }

    #[tracing::instrument(skip(self))]
    async fn max_password_age(&self) -> Result<Option<i64>, AppError> {
        match self.client.get_account_password_policy().send().await {
            Ok(output) => Ok(output
                .password_policy()
                .and_then(|policy| policy.max_password_age())
                .map(i64::from)),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_no_such_entity_exception()) =>
            {
                Ok(None)
            }
            Err(err) => Err(AppError::provider("GetAccountPasswordPolicy")(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_chrono_keeps_instant() {
        let smithy = SmithyDateTime::from_secs(1_718_000_000);
        let converted = to_chrono(&smithy).unwrap();
        assert_eq!(converted.timestamp(), 1_718_000_000);
    }
}
