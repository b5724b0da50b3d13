// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! Managed policy access.
//!
//! [`PolicyStore`] is what the finder needs from IAM; [`IamPolicyStore`]
//! implements it with `aws-sdk-iam`.

use async_trait::async_trait;
use aws_sdk_iam::Client;
use aws_sdk_iam::types::PolicyScopeType;
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{ManagedPolicy, PolicyScope, PolicyVersion};

#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn list_policies(&self, scope: PolicyScope) -> Result<Vec<ManagedPolicy>, AppError>;

    async fn policy_document(&self, arn: &str, version_id: &str) -> Result<Value, AppError>;

    async fn list_policy_versions(&self, arn: &str) -> Result<Vec<PolicyVersion>, AppError>;

    async fn delete_policy_version(&self, arn: &str, version_id: &str) -> Result<(), AppError>;

    async fn delete_policy(&self, arn: &str) -> Result<(), AppError>;
}

/// IAM returns policy documents URL-encoded.
pub fn decode_policy_document(encoded: &str) -> Result<Value, AppError> {
    let decoded = urlencoding::decode(encoded)?;
    Ok(serde_json::from_str(&decoded)?)
}

pub struct IamPolicyStore {
    client: Client,
}

impl IamPolicyStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl From<PolicyScope> for PolicyScopeType {
    fn from(scope: PolicyScope) -> Self {
        match scope {
            PolicyScope::Local => PolicyScopeType::Local,
            PolicyScope::Aws => PolicyScopeType::Aws,
            PolicyScope::All => PolicyScopeType::All,
        }
    }
}

#[async_trait]
impl PolicyStore for IamPolicyStore {
    #[tracing::instrument(skip(self))]
    async fn list_policies(&self, scope: PolicyScope) -> Result<Vec<ManagedPolicy>, AppError> {
        let policies = self
            .client
            .list_policies()
            .scope(scope.into())
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(AppError::provider("ListPolicies", &scope.to_string()))?;

        policies
            .iter()
            .map(|policy| {
                Ok(ManagedPolicy {
                    name: policy
                        .policy_name()
                        .ok_or(AppError::MissingField("PolicyName"))?
                        .to_string(),
                    arn: policy
                        .arn()
                        .ok_or(AppError::MissingField("Arn"))?
                        .to_string(),
                    default_version_id: policy
                        .default_version_id()
                        .ok_or(AppError::MissingField("DefaultVersionId"))?
                        .to_string(),
                    attachment_count: policy
                        .attachment_count()
                        .ok_or(AppError::MissingField("AttachmentCount"))?,
                })
            })
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn policy_document(&self, arn: &str, version_id: &str) -> Result<Value, AppError> {
        let output = self
            .client
            .get_policy_version()
            .policy_arn(arn)
            .version_id(version_id)
            .send()
            .await
            .map_err(AppError::provider("GetPolicyVersion", arn))?;

        let document = output
            .policy_version()
            .and_then(|version| version.document())
            .ok_or(AppError::MissingField("PolicyVersion.Document"))?;

        decode_policy_document(document)
    }

    #[tracing::instrument(skip(self))]
    async fn list_policy_versions(&self, arn: &str) -> Result<Vec<PolicyVersion>, AppError> {
        let versions = self
            .client
            .list_policy_versions()
            .policy_arn(arn)
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(AppError::provider("ListPolicyVersions", arn))?;

        versions
            .iter()
            .map(|version| {
                Ok(PolicyVersion {
                    version_id: version
                        .version_id()
                        .ok_or(AppError::MissingField("VersionId"))?
                        .to_string(),
                    is_default: version.is_default_version(),
                })
            })
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn delete_policy_version(&self, arn: &str, version_id: &str) -> Result<(), AppError> {
        self.client
            .delete_policy_version()
            .policy_arn(arn)
            .version_id(version_id)
            .send()
            .await
            .map_err(AppError::provider("DeletePolicyVersion", arn))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_policy(&self, arn: &str) -> Result<(), AppError> {
        self.client
            .delete_policy()
            .policy_arn(arn)
            .send()
            .await
            .map_err(AppError::provider("DeletePolicy", arn))?;
        Ok(())
    }
}
