// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use std::fmt;

use clap::ValueEnum;

/// A customer or AWS managed policy as listed by IAM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedPolicy {
    pub name: String,
    pub arn: String,
    pub default_version_id: String,
    pub attachment_count: i32,
}

/// A managed policy attached to no user, group or role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanCandidate {
    pub name: String,
    pub arn: String,
    pub default_version_id: String,
    pub attachment_count: i32,
}

impl From<ManagedPolicy> for OrphanCandidate {
    fn from(policy: ManagedPolicy) -> Self {
        Self {
            name: policy.name,
            arn: policy.arn,
            default_version_id: policy.default_version_id,
            attachment_count: policy.attachment_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyVersion {
    pub version_id: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Dump the documents only.
    Describe,
    /// Dump the documents, then delete the policies.
    Delete,
}

/// Which managed policies to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PolicyScope {
    /// Customer managed policies
    #[default]
    Local,
    /// AWS managed policies
    Aws,
    All,
}

impl fmt::Display for PolicyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyScope::Local => f.write_str("Local"),
            PolicyScope::Aws => f.write_str("AWS"),
            PolicyScope::All => f.write_str("All"),
        }
    }
}

/// What happened to each target of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrphanReport {
    pub described: Vec<String>,
    pub deleted: Vec<String>,
    /// Policy name and reason.
    pub failed: Vec<(String, String)>,
}

impl OrphanReport {
    pub fn is_partial_failure(&self) -> bool {
        !self.failed.is_empty()
    }
}
