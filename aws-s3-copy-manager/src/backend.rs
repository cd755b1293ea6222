/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::types::{RequestCharged, ServerSideEncryption};

use crate::error::Error;
use crate::operation::copy::PassthroughFields;

/// Amazon S3 implementation of the backend contract
pub mod sdk;

/// A reference counted [`CopyBackend`]
pub type SharedBackend = Arc<dyn CopyBackend>;

/// The requests a copy needs from the storage service.
///
/// Every method is a single request/response round trip. Retries for transient failures are
/// the implementation's concern.
///
/// The crate ships an implementation for [`aws_sdk_s3::Client`].
#[async_trait]
pub trait CopyBackend: fmt::Debug + Send + Sync {
    /// Fetch the metadata of an object without its body
    async fn head_object(&self, request: HeadObjectRequest) -> Result<HeadObjectResponse, Error>;

    /// Copy an object in a single request
    async fn copy_object(&self, request: CopyObjectRequest) -> Result<CopyObjectResponse, Error>;

    /// Start a multipart upload
    async fn create_multipart_upload(
        &self,
        request: CreateMultipartUploadRequest,
    ) -> Result<CreateMultipartUploadResponse, Error>;

    /// Copy a byte range of an existing object as one part of a multipart upload
    async fn upload_part_copy(
        &self,
        request: UploadPartCopyRequest,
    ) -> Result<UploadPartCopyResponse, Error>;

    /// Assemble the uploaded parts into the final object
    async fn complete_multipart_upload(
        &self,
        request: CompleteMultipartUploadRequest,
    ) -> Result<CompleteMultipartUploadResponse, Error>;

    /// Discard a multipart upload and any parts uploaded so far
    async fn abort_multipart_upload(&self, request: AbortMultipartUploadRequest)
        -> Result<(), Error>;
}

/// Builds backends bound to a specific region.
///
/// Construction must not issue any requests.
pub trait BackendFactory: fmt::Debug + Send + Sync {
    /// Create a backend that sends requests to `region`
    fn for_region(&self, region: &str) -> SharedBackend;
}

/// `HeadObject` request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadObjectRequest {
    /// Bucket of the object
    pub bucket: String,
    /// Unescaped object key
    pub key: String,
    /// Specific version to query
    pub version_id: Option<String>,
}

/// `HeadObject` response
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadObjectResponse {
    /// Size of the object in bytes
    pub content_length: u64,
}

/// `CopyObject` request
#[derive(Clone, Debug, PartialEq)]
pub struct CopyObjectRequest {
    /// Destination bucket
    pub bucket: String,
    /// Unescaped destination key
    pub key: String,
    /// Source of the copy, `bucket/key[?versionId=id]`
    pub copy_source: String,
    /// Additional request fields given by the caller
    pub passthrough: PassthroughFields,
}

/// `CopyObject` response
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CopyObjectResponse {
    /// Entity tag of the new object
    pub e_tag: Option<String>,
    /// Version of the new object
    pub version_id: Option<String>,
    /// Version of the source object that was copied
    pub copy_source_version_id: Option<String>,
    /// Expiration rule applied to the new object
    pub expiration: Option<String>,
    /// Server-side encryption applied to the new object
    pub server_side_encryption: Option<ServerSideEncryption>,
    /// Whether the requester was charged
    pub request_charged: Option<RequestCharged>,
}

/// `CreateMultipartUpload` request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateMultipartUploadRequest {
    /// Destination bucket
    pub bucket: String,
    /// Unescaped destination key
    pub key: String,
}

/// `CreateMultipartUpload` response
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateMultipartUploadResponse {
    /// ID of the new multipart upload
    pub upload_id: String,
}

/// `UploadPartCopy` request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPartCopyRequest {
    /// Destination bucket
    pub bucket: String,
    /// Unescaped destination key
    pub key: String,
    /// 1-based part number
    pub part_number: i32,
    /// Source of the copy, `bucket/key[?versionId=id]`
    pub copy_source: String,
    /// Inclusive range of the source to copy, `bytes=<start>-<end>`
    pub copy_source_range: String,
    /// The multipart upload the part belongs to
    pub upload_id: String,
}

/// `UploadPartCopy` response
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPartCopyResponse {
    /// Entity tag of the copied part
    pub e_tag: String,
}

/// A part referenced when completing a multipart upload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedPart {
    /// Entity tag returned when the part was copied
    pub e_tag: String,
    /// 1-based part number
    pub part_number: i32,
}

/// `CompleteMultipartUpload` request
#[derive(Clone, Debug, PartialEq)]
pub struct CompleteMultipartUploadRequest {
    /// Destination bucket
    pub bucket: String,
    /// Unescaped destination key
    pub key: String,
    /// The multipart upload to complete
    pub upload_id: String,
    /// Every part of the upload ordered by part number
    pub parts: Vec<CompletedPart>,
    /// Additional request fields given by the caller
    pub passthrough: PassthroughFields,
}

/// `CompleteMultipartUpload` response
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompleteMultipartUploadResponse {
    /// Entity tag of the assembled object
    pub e_tag: Option<String>,
    /// Version of the assembled object
    pub version_id: Option<String>,
    /// Expiration rule applied to the assembled object
    pub expiration: Option<String>,
    /// Server-side encryption applied to the assembled object
    pub server_side_encryption: Option<ServerSideEncryption>,
    /// Whether the requester was charged
    pub request_charged: Option<RequestCharged>,
}

/// `AbortMultipartUpload` request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbortMultipartUploadRequest {
    /// Destination bucket
    pub bucket: String,
    /// Unescaped destination key
    pub key: String,
    /// The multipart upload to abort
    pub upload_id: String,
}
