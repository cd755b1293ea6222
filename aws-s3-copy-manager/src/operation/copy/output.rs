/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::types::{RequestCharged, ServerSideEncryption};

use crate::backend::{CompleteMultipartUploadResponse, CopyObjectResponse};

/// Common response fields for copying an object
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CopyOutput {
    pub(crate) e_tag: Option<String>,
    pub(crate) version_id: Option<String>,
    pub(crate) copy_source_version_id: Option<String>,
    pub(crate) expiration: Option<String>,
    pub(crate) server_side_encryption: Option<ServerSideEncryption>,
    pub(crate) request_charged: Option<RequestCharged>,
    pub(crate) upload_id: Option<String>,
    pub(crate) parts_copied: Option<usize>,
}

impl CopyOutput {
    /// Entity tag of the new object.
    pub fn e_tag(&self) -> Option<&str> {
        self.e_tag.as_deref()
    }

    /// Version ID of the new object, if versioning is enabled on the destination bucket.
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// Version of the source object that was copied. Only reported for a single `CopyObject`.
    pub fn copy_source_version_id(&self) -> Option<&str> {
        self.copy_source_version_id.as_deref()
    }

    /// If the object expiration is configured, the expiry date and the rule ID.
    pub fn expiration(&self) -> Option<&str> {
        self.expiration.as_deref()
    }

    /// The server-side encryption algorithm used when storing the new object.
    pub fn server_side_encryption(&self) -> Option<&ServerSideEncryption> {
        self.server_side_encryption.as_ref()
    }

    /// Whether the requester was charged.
    pub fn request_charged(&self) -> Option<&RequestCharged> {
        self.request_charged.as_ref()
    }

    /// ID of the multipart upload the object was assembled from.
    pub fn upload_id(&self) -> Option<&str> {
        self.upload_id.as_deref()
    }

    /// Number of parts copied, for a multipart copy.
    pub fn parts_copied(&self) -> Option<usize> {
        self.parts_copied
    }
}

impl From<CopyObjectResponse> for CopyOutput {
    fn from(value: CopyObjectResponse) -> Self {
        CopyOutput {
            e_tag: value.e_tag,
            version_id: value.version_id,
            copy_source_version_id: value.copy_source_version_id,
            expiration: value.expiration,
            server_side_encryption: value.server_side_encryption,
            request_charged: value.request_charged,
            upload_id: None,
            parts_copied: None,
        }
    }
}

impl CopyOutput {
    pub(crate) fn from_multipart(
        upload_id: String,
        parts_copied: usize,
        resp: CompleteMultipartUploadResponse,
    ) -> Self {
        CopyOutput {
            e_tag: resp.e_tag,
            version_id: resp.version_id,
            copy_source_version_id: None,
            expiration: resp.expiration,
            server_side_encryption: resp.server_side_encryption,
            request_charged: resp.request_charged,
            upload_id: Some(upload_id),
            parts_copied: Some(parts_copied),
        }
    }
}
