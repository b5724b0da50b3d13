// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use aws_sdk_iam::error::DisplayErrorContext;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AppError {
    #[error("{operation} failed for {target}: {detail}")]
    Provider {
        operation: &'static str,
        target: String,
        detail: String,
    },
    #[error("missing field in provider response: {0}")]
    MissingField(&'static str),
    #[error("invalid policy document: {0}")]
    PolicyDocument(String),
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl AppError {
    /// Builds a mapper from an AWS SDK error into [`AppError::Provider`].
    pub fn provider<E>(operation: &'static str, target: &str) -> impl FnOnce(E) -> AppError
    where
        E: std::error::Error,
    {
        let target = target.to_string();
        move |source| AppError::Provider {
            operation,
            target,
            detail: DisplayErrorContext(&source).to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(source: serde_json::Error) -> Self {
        AppError::PolicyDocument(source.to_string())
    }
}

impl From<std::string::FromUtf8Error> for AppError {
    fn from(source: std::string::FromUtf8Error) -> Self {
        AppError::PolicyDocument(source.to_string())
    }
}
