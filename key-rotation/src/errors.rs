// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use aws_sdk_iam::error::DisplayErrorContext;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AppError {
    #[error("credential report is not ready")]
    ReportNotReady,
    #[error("credential report still not ready after {0} attempts")]
    ReportTimeout(u32),
    #[error("unable to parse credential report: {0}")]
    ReportParse(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("{operation} failed: {detail}")]
    Provider {
        operation: &'static str,
        detail: String,
    },
    #[error("unable to store credentials at {location}: {detail}")]
    Storage { location: String, detail: String },
    #[error("unable to publish notification: {0}")]
    Notification(String),
    #[error("missing field in provider response: {0}")]
    MissingField(&'static str),
    #[error("configuration error: {0}")]
    ConfigError(String),
    #[error("io error: {0}")]
    Io(String),
}

impl AppError {
    /// Builds a mapper from an AWS SDK error into [`AppError::Provider`],
    /// keeping the full error context chain for the log.
    pub fn provider<E>(operation: &'static str) -> impl FnOnce(E) -> AppError
    where
        E: std::error::Error,
    {
        move |source| {
            let detail = DisplayErrorContext(&source).to_string();
            tracing::debug!("[rotation] {} error: {}", operation, detail);
            AppError::Provider { operation, detail }
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(source: csv::Error) -> Self {
        AppError::ReportParse(source.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        tracing::error!("{:?}", source);
        AppError::Io(source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_keeps_operation() {
        let source = std::io::Error::other("throttled");
        let err = AppError::provider("DeleteAccessKey")(source);
        match &err {
            AppError::Provider { operation, detail } => {
                assert_eq!(*operation, "DeleteAccessKey");
                assert!(detail.contains("throttled"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("DeleteAccessKey failed"));
    }

    #[test]
    fn test_report_timeout_message() {
        assert_eq!(
            AppError::ReportTimeout(5).to_string(),
            "credential report still not ready after 5 attempts"
        );
    }
}
