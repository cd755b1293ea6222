/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// The target part size for a multipart copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PartSize {
    /// Use the default part size of 50 MiB.
    #[default]
    Auto,

    /// Target part size explicitly given.
    ///
    /// NOTE: This is a suggestion and will be used if possible but may be adjusted for an individual request
    /// as required by the underlying API (at most 10,000 parts per upload).
    Target(u64),
}

/// The concurrency settings to use for a single multipart copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConcurrencySetting {
    /// Use the default number of in-flight part copies.
    #[default]
    Auto,

    /// Explicitly configured number of in-flight part copies.
    Explicit(usize),
}
