// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Orphan managed policy discovery and removal.
//!
//! A target is always dumped before anything is deleted. Deletion is two
//! phase: IAM refuses to delete a policy that still has non-default
//! versions, so those go first and the policy itself (with its default
//! version) last.

use std::collections::HashSet;

use crate::errors::AppError;
use crate::models::{ManagedPolicy, Mode, OrphanCandidate, OrphanReport, PolicyScope};
use crate::store::PolicyStore;

/// Keeps the policies attached to nothing.
pub fn find_orphans(policies: Vec<ManagedPolicy>) -> Vec<OrphanCandidate> {
    policies
        .into_iter()
        .filter(|policy| policy.attachment_count == 0)
        .map(OrphanCandidate::from)
        .collect()
}

/// Restricts `orphans` to the requested names, or keeps all of them when
/// nothing was requested. Requested names that are not orphans are ignored.
pub fn resolve_targets(orphans: Vec<OrphanCandidate>, requested: &[String]) -> Vec<OrphanCandidate> {
    if requested.is_empty() {
        return orphans;
    }

    let requested: HashSet<&str> = requested.iter().map(String::as_str).collect();
    orphans
        .into_iter()
        .filter(|orphan| requested.contains(orphan.name.as_str()))
        .collect()
}

/// Number of distinct requested names that matched no target.
pub fn skipped_requests(targets: &[OrphanCandidate], requested: &[String]) -> usize {
    let matched: HashSet<&str> = targets.iter().map(|target| target.name.as_str()).collect();
    requested
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .difference(&matched)
        .count()
}

pub struct OrphanPolicyFinder<'a> {
    store: &'a dyn PolicyStore,
}

impl<'a> OrphanPolicyFinder<'a> {
    pub fn new(store: &'a dyn PolicyStore) -> Self {
        Self { store }
    }

    /// Lists, filters and processes every target.
    ///
    /// # Errors
    ///
    /// Only a failed policy listing is returned; per-policy failures end up
    /// in [`OrphanReport::failed`].
    #[tracing::instrument(skip(self))]
    pub async fn run(
        &self,
        scope: PolicyScope,
        mode: Mode,
        requested: &[String],
    ) -> Result<OrphanReport, AppError> {
        let policies = self.store.list_policies(scope).await?;
        let total = policies.len();
        let orphans = find_orphans(policies);

        tracing::info!("[orphan] {} of {} policies are orphans", orphans.len(), total);

        let targets = resolve_targets(orphans, requested);
        let skipped = skipped_requests(&targets, requested);
        if skipped > 0 {
            tracing::warn!(
                "[orphan] {} requested policies are not orphans or do not exist",
                skipped
            );
        }

        let mut report = OrphanReport::default();
        for target in &targets {
            if let Err(err) = self.process(target, mode, &mut report).await {
                tracing::error!("[orphan] {}: {}", target.name, err);
                report.failed.push((target.name.clone(), err.to_string()));
            }
        }

        Ok(report)
    }

    async fn process(
        &self,
        target: &OrphanCandidate,
        mode: Mode,
        report: &mut OrphanReport,
    ) -> Result<(), AppError> {
        self.dump(target).await?;
        report.described.push(target.name.clone());

        if mode == Mode::Delete {
            self.delete(target).await?;
            report.deleted.push(target.name.clone());
        }

        Ok(())
    }

    async fn dump(&self, target: &OrphanCandidate) -> Result<(), AppError> {
        let document = self
            .store
            .policy_document(&target.arn, &target.default_version_id)
            .await?;
        let pretty = serde_json::to_string_pretty(&document)?;

        tracing::info!(
            "[orphan] policy {} ({}) version {}:\n{}",
            target.name,
            target.arn,
            target.default_version_id,
            pretty
        );

        Ok(())
    }

    async fn delete(&self, target: &OrphanCandidate) -> Result<(), AppError> {
        tracing::info!("[orphan] deleting policy {}", target.name);

        let versions = self.store.list_policy_versions(&target.arn).await?;
        for version in versions.iter().filter(|version| !version.is_default) {
            self.store
                .delete_policy_version(&target.arn, &version.version_id)
                .await?;
            tracing::debug!(
                "[orphan] deleted version {} of {}",
                version.version_id,
                target.name
            );
        }

        // removes the default version along with the policy
        self.store.delete_policy(&target.arn).await
    }
}
