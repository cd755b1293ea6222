/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */
#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

//! Server-side copies of Amazon S3 objects.
//!
//! A copy is either a single `CopyObject` request or, when requested, a multipart copy: the
//! destination is assembled from independent `UploadPartCopy` requests that are dispatched
//! concurrently and then completed (or aborted) as a single upload. No object data passes
//! through the caller.
//!
//! # Examples
//!
//! Copy an object into a bucket in another region using a multipart copy:
//!
//! ```no_run
//! # async fn example() -> Result<(), aws_s3_copy_manager::error::Error> {
//! let config = aws_s3_copy_manager::from_env().load().await;
//! let client = aws_s3_copy_manager::Client::new(config);
//!
//! let output = client
//!     .object("target-bucket", "backups/archive.tar")
//!     .copy_from("source-bucket/archive.tar")
//!     .multipart_copy(true)
//!     .copy_source_region("ap-southeast-1")
//!     .send()
//!     .await?;
//!
//! if let Some(parts) = output.parts_copied() {
//!     println!("copied {parts} parts");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! See [`Object::copy_to`](crate::object::Object::copy_to) and
//! [`Object::copy_from`](crate::object::Object::copy_from) for the available options.

pub(crate) const MEBIBYTE: u64 = 1024 * 1024;

/// Default number of part copies in flight for a single multipart copy
pub(crate) const DEFAULT_CONCURRENCY: usize = 10;

/// Error types emitted by `aws-s3-copy-manager`
pub mod error;

/// Common types used by `aws-s3-copy-manager`
pub mod types;

/// Source and destination locations
pub mod locator;

/// The storage backend contract and its Amazon S3 implementation
pub mod backend;

/// Copy manager client
pub mod client;

/// Object handles
pub mod object;

/// Copy manager operations
pub mod operation;

/// Copy manager configuration
pub mod config;

pub use self::client::Client;
use self::config::loader::ConfigLoader;
pub use self::config::Config;

/// Create a config loader
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
