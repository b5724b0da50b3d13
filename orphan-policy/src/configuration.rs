// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use clap::{ArgAction, ArgGroup, Parser};

use crate::constants::{MAX_POLICY_NAME_LENGTH, POLICY_NAME_SYMBOLS};
use crate::errors::AppError;
use crate::models::{Mode, PolicyScope};

#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Describes and deletes all or the requested orphan IAM managed policies",
    long_about = None
)]
#[command(group(ArgGroup::new("mode").required(true).args(["describe", "delete"])))]
pub struct OrphanOptions {
    /// Dumps all or the requested orphan policies
    #[arg(short = 'S', long, action = ArgAction::SetTrue)]
    pub describe: bool,
    /// Dumps, then deletes all or the requested orphan policies
    #[arg(short = 'D', long, action = ArgAction::SetTrue)]
    pub delete: bool,
    /// Orphan policies to act on, all orphan policies when empty
    #[arg(short = 'p', long = "policy_names", num_args = 0.., value_parser = parse_policy_name)]
    pub policy_names: Vec<String>,
    #[arg(long, value_enum, default_value_t = PolicyScope::Local, env("ORPHAN_POLICY_SCOPE"))]
    pub scope: PolicyScope,
    #[arg(long, env("AWS_REGION"))]
    pub region: Option<String>,
}

impl OrphanOptions {
    pub fn mode(&self) -> Mode {
        if self.delete {
            Mode::Delete
        } else {
            Mode::Describe
        }
    }
}

impl Default for OrphanOptions {
    fn default() -> Self {
        OrphanOptions {
            describe: true,
            delete: false,
            policy_names: Vec::new(),
            scope: PolicyScope::Local,
            region: None,
        }
    }
}

/// Accepts names IAM itself would accept: 1 to 128 characters of ASCII
/// alphanumerics and `+=,.@_-`.
pub fn validate_policy_name(name: &str) -> Result<(), AppError> {
    if name.is_empty() || name.len() > MAX_POLICY_NAME_LENGTH {
        return Err(AppError::ValidationError(format!(
            "policy name must be 1 to {MAX_POLICY_NAME_LENGTH} characters: {name:?}"
        )));
    }
    if let Some(invalid) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !POLICY_NAME_SYMBOLS.contains(*c))
    {
        return Err(AppError::ValidationError(format!(
            "invalid character {invalid:?} in policy name {name:?}"
        )));
    }
    Ok(())
}

fn parse_policy_name(value: &str) -> Result<String, AppError> {
    validate_policy_name(value)?;
    Ok(value.to_string())
}
