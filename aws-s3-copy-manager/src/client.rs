/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::config::DEFAULT_PART_SIZE_BYTES;
use crate::error::Error;
use crate::object::Object;
use crate::operation::copy::{Copy, CopyInput, CopyOutput};
use crate::types::{ConcurrencySetting, PartSize};
use crate::Config;
use crate::DEFAULT_CONCURRENCY;
use std::sync::Arc;

/// Copy manager client for Amazon Simple Storage Service.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations, e.g. config, backends, etc
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Handle {
    /// Get the concrete number of workers to use based on the concurrency setting.
    pub(crate) fn num_workers(&self) -> usize {
        match self.config.concurrency() {
            ConcurrencySetting::Explicit(concurrency) => *concurrency,
            ConcurrencySetting::Auto => DEFAULT_CONCURRENCY,
        }
    }

    /// Get the concrete target part size to use for multipart copies
    pub(crate) fn part_size_bytes(&self) -> u64 {
        match self.config.part_size() {
            PartSize::Auto => DEFAULT_PART_SIZE_BYTES,
            PartSize::Target(explicit) => *explicit,
        }
    }
}

impl Client {
    /// Creates a new client from a copy manager config.
    pub fn new(config: Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// A handle to the object `key` in `bucket`.
    ///
    /// No request is made until a copy is sent.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// async fn backup(client: &aws_s3_copy_manager::Client) -> Result<(), aws_s3_copy_manager::error::Error> {
    ///     client
    ///         .object("my-bucket", "my-key")
    ///         .copy_to("backup-bucket/my-key")
    ///         .multipart_copy(true)
    ///         .send()
    ///         .await?;
    ///     Ok(())
    /// }
    /// ```
    pub fn object(&self, bucket: impl Into<String>, key: impl Into<String>) -> Object {
        Object::new(self.handle.clone(), bucket.into(), key.into())
    }

    /// Run a prebuilt copy.
    ///
    /// The input is only read, so the same input can be sent again.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aws_s3_copy_manager::operation::copy::CopyInput;
    ///
    /// async fn copy(client: &aws_s3_copy_manager::Client) -> Result<(), aws_s3_copy_manager::error::Error> {
    ///     let input = CopyInput::builder()
    ///         .source("source-bucket/archive.tar")
    ///         .destination("target-bucket/archive.tar")
    ///         .multipart_copy(true)
    ///         .content_length(300 * 1024 * 1024)
    ///         .build()?;
    ///
    ///     let output = client.copy(&input).await?;
    ///     assert_eq!(Some(6), output.parts_copied());
    ///     Ok(())
    /// }
    /// ```
    pub async fn copy(&self, input: &CopyInput) -> Result<CopyOutput, Error> {
        Copy::orchestrate(self.handle.clone(), input).await
    }
}
