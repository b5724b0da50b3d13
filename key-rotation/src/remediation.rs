// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Remediation of classified access keys.
//!
//! Each key gets at most one action, chosen by [`decide`] in priority order:
//!
//! | Priority | Condition | Action |
//! |----------|-----------|--------|
//! | 1 | status is `Inactive` | delete after operator confirmation |
//! | 2 | expired | create a replacement, store its credentials, deactivate the old key |
//! | 3 | unused | informational line only |
//! | 4 | anything else | nothing |
//!
//! Every provider step can fail on its own. A failure is logged, recorded in
//! the [`ActionSummary`] and the engine moves on to the next step and the
//! next key. Destructive calls are never retried.

use crate::confirm::ConfirmationProvider;
use crate::directory::IdentityDirectory;
use crate::evaluator::Thresholds;
use crate::models::{ActionSummary, KeyClassification, KeyStatus};
use crate::storage::{ObjectStore, store_credentials};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationAction {
    ConfirmDelete,
    Rotate,
    ReportUnused,
    None,
}

pub fn decide(key: &KeyClassification) -> RemediationAction {
    if key.status == KeyStatus::Inactive {
        RemediationAction::ConfirmDelete
    } else if key.expired {
        RemediationAction::Rotate
    } else if key.unused {
        RemediationAction::ReportUnused
    } else {
        RemediationAction::None
    }
}

pub struct RemediationEngine<'a> {
    directory: &'a dyn IdentityDirectory,
    store: &'a dyn ObjectStore,
    confirmation: &'a dyn ConfirmationProvider,
    thresholds: Thresholds,
}

impl<'a> RemediationEngine<'a> {
    pub fn new(
        directory: &'a dyn IdentityDirectory,
        store: &'a dyn ObjectStore,
        confirmation: &'a dyn ConfirmationProvider,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            directory,
            store,
            confirmation,
            thresholds,
        }
    }

    /// Applies the decided action to every key and hands the summary back.
    #[tracing::instrument(skip_all, fields(keys = keys.len()))]
    pub async fn remediate(
        &self,
        keys: &[KeyClassification],
        mut summary: ActionSummary,
    ) -> ActionSummary {
        for key in keys {
            match decide(key) {
                RemediationAction::ConfirmDelete => self.confirm_delete(key, &mut summary).await,
                RemediationAction::Rotate => self.rotate(key, &mut summary).await,
                RemediationAction::ReportUnused => summary.record(format!(
                    "User {}'s key {} has not been used yet or in the last {} days",
                    key.owner, key.access_key_id, self.thresholds.grace_days
                )),
                RemediationAction::None => {
                    tracing::trace!("[rotation] no action for key {}", key.access_key_id);
                }
            }
        }

        summary
    }

    async fn confirm_delete(&self, key: &KeyClassification, summary: &mut ActionSummary) {
        let prompt = format!(
            "\nUser {}'s key {} is inactive. Would you like it to be deleted (Y/N)? ",
            key.owner, key.access_key_id
        );
        if !self.confirmation.confirm(&prompt).await {
            tracing::info!("[rotation] keeping inactive key {}", key.access_key_id);
            return;
        }

        match self
            .directory
            .delete_access_key(&key.owner, &key.access_key_id)
            .await
        {
            Ok(()) => {
                tracing::info!("[rotation] deleted key {} of {}", key.access_key_id, key.owner);
                summary.record(format!(
                    "The access key {} belonging to user {} has been deleted",
                    key.access_key_id, key.owner
                ));
            }
            Err(err) => {
                tracing::error!("[rotation] failed to delete key {}: {}", key.access_key_id, err);
                summary.record_failure(format!(
                    "Failed to delete the access key {} belonging to user {}: {}",
                    key.access_key_id, key.owner, err
                ));
            }
        }
    }

    async fn rotate(&self, key: &KeyClassification, summary: &mut ActionSummary) {
        tracing::info!(
            "[rotation] key {} of {} expired {} days ago",
            key.access_key_id,
            key.owner,
            key.expiry_days.abs()
        );

        self.replace(key, summary).await;

        // the expired key is deactivated even when no replacement exists
        match self
            .directory
            .deactivate_access_key(&key.owner, &key.access_key_id)
            .await
        {
            Ok(()) => summary.record(format!(
                "The access key {} belonging to user {} has been automatically deactivated since it is at least {} days old",
                key.access_key_id, key.owner, self.thresholds.key_age_days
            )),
            Err(err) => {
                tracing::error!(
                    "[rotation] failed to deactivate key {}: {}",
                    key.access_key_id,
                    err
                );
                summary.record_failure(format!(
                    "Failed to deactivate the access key {} belonging to user {}: {}",
                    key.access_key_id, key.owner, err
                ));
            }
        }
    }

    async fn replace(&self, key: &KeyClassification, summary: &mut ActionSummary) {
        let new_key = match self.directory.create_access_key(&key.owner).await {
            Ok(new_key) => new_key,
            Err(err) => {
                tracing::error!(
                    "[rotation] failed to create a replacement key for {}: {}",
                    key.owner,
                    err
                );
                summary.record_failure(format!(
                    "Failed to generate a new key for user {}: {}",
                    key.owner, err
                ));
                return;
            }
        };

        match store_credentials(self.store, &new_key).await {
            Ok(location) => summary.record(format!(
                "Generated new key {} for user {}. Credentials can be found at {}",
                new_key.access_key_id, key.owner, location
            )),
            Err(err) => {
                tracing::error!(
                    "[rotation] failed to store credentials of {}: {}",
                    new_key.access_key_id,
                    err
                );
                summary.record_failure(format!(
                    "Generated new key {} for user {} but its credentials could not be stored: {}",
                    new_key.access_key_id, key.owner, err
                ));
            }
        }
    }
}
