// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! # IAM Key Rotation
//!
//! Audits IAM console passwords and access keys of every user in an account
//! and remediates expired keys.
//!
//! ## Pipeline
//!
//! ```text
//! credential report --+
//!                     +-> LifecycleEvaluator -> RemediationEngine -> Notifier (SNS)
//! key inventory ------+                             |
//!                                                   +-> ObjectStore (S3)
//! ```
//!
//! - Passwords that expired or expire within the grace window are reported.
//! - Expired access keys get a replacement (credentials written to S3) and
//!   are deactivated.
//! - Inactive access keys are deleted after the operator confirms.
//! - Unused access keys are reported.
//!
//! Everything done during a run is collected into one summary that is
//! published to an SNS topic at the end. A run with nothing to say publishes
//! nothing.
//!
//! ## Modules
//!
//! - [`application`]: wiring of the AWS collaborators and the run itself
//! - [`configuration`]: CLI argument parsing with clap
//! - [`confirm`]: operator confirmation (terminal prompt or fixed answer)
//! - [`constants`]: defaults and exit codes
//! - [`directory`]: IAM users, access keys and credential report access
//! - [`errors`]: application error type
//! - [`evaluator`]: password warnings and access key classification
//! - [`models`]: report rows, key records, classifications, summary
//! - [`notifier`]: end-of-run notification
//! - [`policy`]: day arithmetic against age windows
//! - [`remediation`]: per-key decision and actions
//! - [`report`]: credential report polling and parsing
//! - [`storage`]: credential file upload
//!
//! ## Usage
//!
//! ```bash
//! iam-key-rotation --bucket access-keys-bucket \
//!     --topic-arn arn:aws:sns:us-east-1:123456789012:iam_keys_rotation
//! ```

pub mod application;
pub mod configuration;
pub mod confirm;
pub mod constants;
pub mod directory;
pub mod errors;
pub mod evaluator;
pub mod models;
pub mod notifier;
pub mod policy;
pub mod remediation;
pub mod report;
pub mod storage;
