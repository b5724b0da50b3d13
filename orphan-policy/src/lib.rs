// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # IAM Orphan Policy
//!
//! Finds managed policies that are attached to no user, group or role,
//! dumps their default version document for the audit trail and optionally
//! deletes them.
//!
//! ## Modules
//!
//! - [`configuration`]: CLI argument parsing with clap
//! - [`constants`]: name limits and exit codes
//! - [`errors`]: application error type
//! - [`finder`]: orphan filtering, target resolution, describe and delete
//! - [`models`]: policies, versions, run report
//! - [`store`]: IAM managed policy access
//!
//! ## Usage
//!
//! ```bash
//! iam-orphan-policy --describe
//! iam-orphan-policy --delete --policy_names Foo Bar
//! ```

pub mod configuration;
pub mod constants;
pub mod errors;
pub mod finder;
pub mod models;
pub mod store;
