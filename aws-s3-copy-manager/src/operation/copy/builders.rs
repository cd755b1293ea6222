/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use aws_sdk_s3::types::{ObjectCannedAcl, StorageClass};

use crate::backend::{CopyBackend, SharedBackend};
use crate::error::Error;

use super::{CopyInputBuilder, CopyOutput, PassthroughFields};

/// Fluent builder for constructing a single object copy
#[derive(Debug)]
pub struct CopyFluentBuilder {
    handle: Arc<crate::client::Handle>,
    inner: CopyInputBuilder,
}

impl CopyFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>, inner: CopyInputBuilder) -> Self {
        Self { handle, inner }
    }

    /// Send the copy and wait for it to finish
    pub async fn send(self) -> Result<CopyOutput, Error> {
        let input = self.inner.build()?;
        crate::operation::copy::Copy::orchestrate(self.handle, &input).await
    }

    /// Access the copy as a reference to its input builder
    pub fn as_input(&self) -> &CopyInputBuilder {
        &self.inner
    }

    /// Perform the copy as a multipart copy: the destination is assembled from ranged
    /// `UploadPartCopy` requests. Defaults to `false`.
    ///
    /// Fails with [`SizeTooSmall`](crate::error::ErrorKind::SizeTooSmall) for sources smaller
    /// than 5 MiB.
    pub fn multipart_copy(mut self, input: bool) -> Self {
        self.inner = self.inner.multipart_copy(input);
        self
    }

    /// Size of each part of a multipart copy, at least 5 MiB. Defaults to the client's
    /// configured part size.
    pub fn part_size(mut self, input: u64) -> Self {
        self.inner = self.inner.part_size(input);
        self
    }

    /// Size of each part of a multipart copy, at least 5 MiB. Defaults to the client's
    /// configured part size.
    pub fn set_part_size(mut self, input: Option<u64>) -> Self {
        self.inner = self.inner.set_part_size(input);
        self
    }

    /// Alias of [`part_size`](Self::part_size).
    pub fn min_part_size(mut self, input: u64) -> Self {
        self.inner = self.inner.min_part_size(input);
        self
    }

    /// Size of the source object in bytes. When set, the size is not queried with
    /// `HeadObject`.
    pub fn content_length(mut self, input: u64) -> Self {
        self.inner = self.inner.content_length(input);
        self
    }

    /// Size of the source object in bytes. When set, the size is not queried with
    /// `HeadObject`.
    pub fn set_content_length(mut self, input: Option<u64>) -> Self {
        self.inner = self.inner.set_content_length(input);
        self
    }

    /// Backend used to query the size of the source object, e.g. a client for the source
    /// object's region.
    pub fn copy_source_client(mut self, input: impl CopyBackend + 'static) -> Self {
        self.inner = self.inner.copy_source_client(input);
        self
    }

    /// Backend used to query the size of the source object, e.g. a client for the source
    /// object's region.
    pub fn set_copy_source_client(mut self, input: Option<SharedBackend>) -> Self {
        self.inner = self.inner.set_copy_source_client(input);
        self
    }

    /// Region of the source object, when it differs from the client's region.
    ///
    /// Ignored when a [`copy_source_client`](Self::copy_source_client) is given or the source
    /// is an [`Object`](crate::object::Object), whose own client is used instead.
    pub fn copy_source_region(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.copy_source_region(input);
        self
    }

    /// Region of the source object, when it differs from the client's region.
    pub fn set_copy_source_region(mut self, input: Option<String>) -> Self {
        self.inner = self.inner.set_copy_source_region(input);
        self
    }

    /// Request fields forwarded to the backend.
    pub fn passthrough(mut self, input: PassthroughFields) -> Self {
        self.inner = self.inner.passthrough(input);
        self
    }

    /// The canned ACL to apply to the new object.
    pub fn acl(mut self, input: ObjectCannedAcl) -> Self {
        self.inner = self.inner.acl(input);
        self
    }

    /// A standard MIME type describing the format of the object data.
    pub fn content_type(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.content_type(input);
        self
    }

    /// Adds a key-value pair to the metadata of the new object.
    pub fn metadata(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.inner = self.inner.metadata(k, v);
        self
    }

    /// Storage class of the new object.
    pub fn storage_class(mut self, input: StorageClass) -> Self {
        self.inner = self.inner.storage_class(input);
        self
    }
}

impl crate::operation::copy::input::CopyInputBuilder {
    /// Send a copy built from this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<CopyOutput, Error> {
        let input = self.build()?;
        client.copy(&input).await
    }
}
