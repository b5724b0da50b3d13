// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

/// Access keys older than this many days are expired.
pub const DEFAULT_KEY_AGE_DAYS: i64 = 90;
/// Warning window before expiry, and the idle window for the unused flag.
pub const DEFAULT_GRACE_DAYS: i64 = 15;

pub const DEFAULT_REPORT_POLL_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_REPORT_MAX_ATTEMPTS: u32 = 30;

/// Service name returned by `GetAccessKeyLastUsed` for a key that was never used.
pub const NEVER_USED_SERVICE: &str = "N/A";

/// Credential report markers meaning "no value".
pub const REPORT_EMPTY_MARKERS: [&str; 3] = ["N/A", "not_supported", "no_information"];

pub const CREDENTIAL_FILE_HEADER: [&str; 2] = ["AccessKeyId", "SecretAccessKey"];
pub const CREDENTIAL_FILE_EXTENSION: &str = "csv";

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_PARTIAL_FAILURE: u8 = 3;
