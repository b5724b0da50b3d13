// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

/// IAM limits policy names to 128 characters.
pub const MAX_POLICY_NAME_LENGTH: usize = 128;

/// Characters IAM accepts in a policy name besides ASCII alphanumerics.
pub const POLICY_NAME_SYMBOLS: &str = "+=,.@_-";

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;
pub const EXIT_PARTIAL_FAILURE: u8 = 3;
