// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Describe and delete runs against an in-memory policy store that records
//! every call in order.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use iam_orphan_policy::errors::AppError;
use iam_orphan_policy::finder::OrphanPolicyFinder;
use iam_orphan_policy::models::{ManagedPolicy, Mode, OrphanReport, PolicyScope, PolicyVersion};
use iam_orphan_policy::store::PolicyStore;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    GetDocument(String, String),
    ListVersions(String),
    DeleteVersion(String, String),
    DeletePolicy(String),
}

#[derive(Default)]
struct FakeStore {
    policies: Vec<ManagedPolicy>,
    versions: HashMap<String, Vec<PolicyVersion>>,
    fail_documents: HashSet<String>,
    fail_version_deletes: HashSet<String>,
    fail_listing: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeStore {
    fn with_policy(mut self, name: &str, attachments: i32, non_default_versions: usize) -> Self {
        let arn = arn(name);
        let mut versions = vec![PolicyVersion {
            version_id: format!("v{}", non_default_versions + 1),
            is_default: true,
        }];
        versions.extend((1..=non_default_versions).map(|n| PolicyVersion {
            version_id: format!("v{n}"),
            is_default: false,
        }));
        self.versions.insert(arn.clone(), versions);
        self.policies.push(ManagedPolicy {
            name: name.to_string(),
            arn,
            default_version_id: format!("v{}", non_default_versions + 1),
            attachment_count: attachments,
        });
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::DeleteVersion(..) | Call::DeletePolicy(_)))
            .collect()
    }
}

#[async_trait]
impl PolicyStore for FakeStore {
    async fn list_policies(&self, _scope: PolicyScope) -> Result<Vec<ManagedPolicy>, AppError> {
        if self.fail_listing {
            return Err(AppError::Provider {
                operation: "ListPolicies",
                target: "Local".to_string(),
                detail: "AccessDenied".to_string(),
            });
        }
        Ok(self.policies.clone())
    }

    async fn policy_document(&self, arn: &str, version_id: &str) -> Result<Value, AppError> {
        self.record(Call::GetDocument(arn.to_string(), version_id.to_string()));
        if self.fail_documents.contains(arn) {
            return Err(AppError::Provider {
                operation: "GetPolicyVersion",
                target: arn.to_string(),
                detail: "NoSuchEntity".to_string(),
            });
        }
        Ok(json!({"Version": "2012-10-17", "Statement": []}))
    }

    async fn list_policy_versions(&self, arn: &str) -> Result<Vec<PolicyVersion>, AppError> {
        self.record(Call::ListVersions(arn.to_string()));
        Ok(self.versions.get(arn).cloned().unwrap_or_default())
    }

    async fn delete_policy_version(&self, arn: &str, version_id: &str) -> Result<(), AppError> {
        self.record(Call::DeleteVersion(arn.to_string(), version_id.to_string()));
        if self.fail_version_deletes.contains(arn) {
            return Err(AppError::Provider {
                operation: "DeletePolicyVersion",
                target: arn.to_string(),
                detail: "Throttling".to_string(),
            });
        }
        Ok(())
    }

    async fn delete_policy(&self, arn: &str) -> Result<(), AppError> {
        self.record(Call::DeletePolicy(arn.to_string()));
        Ok(())
    }
}

fn arn(name: &str) -> String {
    format!("arn:aws:iam::123456789012:policy/{name}")
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

// =============================================================================
// Delete mode
// =============================================================================

#[tokio::test]
async fn test_delete_named_orphan_removes_versions_before_policy() {
    let store = FakeStore::default()
        .with_policy("Foo", 0, 2)
        .with_policy("Bar", 0, 1);
    let finder = OrphanPolicyFinder::new(&store);

    let report = finder
        .run(PolicyScope::Local, Mode::Delete, &names(&["Foo"]))
        .await
        .unwrap();

    assert_eq!(
        store.calls(),
        vec![
            Call::GetDocument(arn("Foo"), "v3".to_string()),
            Call::ListVersions(arn("Foo")),
            Call::DeleteVersion(arn("Foo"), "v1".to_string()),
            Call::DeleteVersion(arn("Foo"), "v2".to_string()),
            Call::DeletePolicy(arn("Foo")),
        ]
    );
    assert_eq!(report.described, ["Foo"]);
    assert_eq!(report.deleted, ["Foo"]);
    assert!(!report.is_partial_failure());
}

#[tokio::test]
async fn test_delete_all_orphans_skips_attached_policies() {
    let store = FakeStore::default()
        .with_policy("Foo", 0, 0)
        .with_policy("Attached", 3, 1)
        .with_policy("Bar", 0, 1);
    let finder = OrphanPolicyFinder::new(&store);

    let report = finder
        .run(PolicyScope::Local, Mode::Delete, &[])
        .await
        .unwrap();

    assert_eq!(report.deleted, ["Foo", "Bar"]);
    assert!(
        store
            .calls()
            .iter()
            .all(|call| !format!("{call:?}").contains("Attached"))
    );
    assert_eq!(
        store.mutations(),
        vec![
            Call::DeletePolicy(arn("Foo")),
            Call::DeleteVersion(arn("Bar"), "v1".to_string()),
            Call::DeletePolicy(arn("Bar")),
        ]
    );
}

#[tokio::test]
async fn test_requested_names_that_are_not_orphans_are_ignored() {
    let store = FakeStore::default()
        .with_policy("Foo", 0, 0)
        .with_policy("Attached", 1, 0);
    let finder = OrphanPolicyFinder::new(&store);

    let report = finder
        .run(
            PolicyScope::Local,
            Mode::Delete,
            &names(&["Attached", "Missing"]),
        )
        .await
        .unwrap();

    assert!(store.calls().is_empty());
    assert_eq!(report, OrphanReport::default());
}

#[tokio::test]
async fn test_failed_version_delete_keeps_policy_and_continues() {
    let mut store = FakeStore::default()
        .with_policy("Foo", 0, 2)
        .with_policy("Bar", 0, 0);
    store.fail_version_deletes.insert(arn("Foo"));
    let finder = OrphanPolicyFinder::new(&store);

    let report = finder
        .run(PolicyScope::Local, Mode::Delete, &[])
        .await
        .unwrap();

    // the first failed version delete stops work on Foo only
    assert_eq!(
        store.mutations(),
        vec![
            Call::DeleteVersion(arn("Foo"), "v1".to_string()),
            Call::DeletePolicy(arn("Bar")),
        ]
    );
    assert_eq!(report.deleted, ["Bar"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "Foo");
    assert!(report.is_partial_failure());
}

#[tokio::test]
async fn test_no_mutation_without_document_dump() {
    let mut store = FakeStore::default().with_policy("Foo", 0, 1);
    store.fail_documents.insert(arn("Foo"));
    let finder = OrphanPolicyFinder::new(&store);

    let report = finder
        .run(PolicyScope::Local, Mode::Delete, &[])
        .await
        .unwrap();

    assert!(store.mutations().is_empty());
    assert!(report.described.is_empty());
    assert_eq!(report.failed[0].0, "Foo");
}

// =============================================================================
// Describe mode
// =============================================================================

#[tokio::test]
async fn test_describe_only_dumps() {
    let store = FakeStore::default()
        .with_policy("Foo", 0, 2)
        .with_policy("Bar", 0, 0);
    let finder = OrphanPolicyFinder::new(&store);

    let report = finder
        .run(PolicyScope::Local, Mode::Describe, &[])
        .await
        .unwrap();

    assert_eq!(
        store.calls(),
        vec![
            Call::GetDocument(arn("Foo"), "v3".to_string()),
            Call::GetDocument(arn("Bar"), "v1".to_string()),
        ]
    );
    assert_eq!(report.described, ["Foo", "Bar"]);
    assert!(report.deleted.is_empty());
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let store = FakeStore {
        fail_listing: true,
        ..FakeStore::default()
    };
    let finder = OrphanPolicyFinder::new(&store);

    let result = finder.run(PolicyScope::Local, Mode::Describe, &[]).await;

    assert!(matches!(result, Err(AppError::Provider { operation: "ListPolicies", .. })));
}
