/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use aws_sdk_s3::types::{
    MetadataDirective, ObjectCannedAcl, RequestPayer, ServerSideEncryption, StorageClass,
    TaggingDirective,
};
use aws_smithy_types::error::operation::BuildError;

use crate::backend::{CopyBackend, SharedBackend};
use crate::locator::ObjectRef;

/// Input type for a single object copy
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct CopyInput {
    source: ObjectRef,
    destination: ObjectRef,
    options: CopyOptions,
}

impl CopyInput {
    /// Creates a new builder-style object to manufacture [`CopyInput`].
    pub fn builder() -> CopyInputBuilder {
        CopyInputBuilder::default()
    }

    /// The object to copy from.
    pub fn source(&self) -> &ObjectRef {
        &self.source
    }

    /// The object to copy to.
    pub fn destination(&self) -> &ObjectRef {
        &self.destination
    }

    /// Options controlling how the copy is performed.
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }
}

/// Options controlling how a copy is performed
#[non_exhaustive]
#[derive(Clone, Debug, Default)]
pub struct CopyOptions {
    multipart_copy: bool,
    part_size: Option<u64>,
    content_length: Option<u64>,
    copy_source_client: Option<SharedBackend>,
    copy_source_region: Option<String>,
    passthrough: PassthroughFields,
}

impl CopyOptions {
    /// Whether the copy is performed as a multipart copy.
    pub fn multipart_copy(&self) -> bool {
        self.multipart_copy
    }

    /// Part size requested for a multipart copy. The client's configured part size is used
    /// when unset.
    pub fn part_size(&self) -> Option<u64> {
        self.part_size
    }

    /// Size of the source object, when known by the caller.
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Backend used to query the size of the source object.
    pub fn copy_source_client(&self) -> Option<&SharedBackend> {
        self.copy_source_client.as_ref()
    }

    /// Region of the source object.
    pub fn copy_source_region(&self) -> Option<&str> {
        self.copy_source_region.as_deref()
    }

    /// Request fields forwarded to the copy requests.
    pub fn passthrough(&self) -> &PassthroughFields {
        &self.passthrough
    }
}

impl PartialEq for CopyOptions {
    fn eq(&self, other: &Self) -> bool {
        let same_client = match (&self.copy_source_client, &other.copy_source_client) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_client
            && self.multipart_copy == other.multipart_copy
            && self.part_size == other.part_size
            && self.content_length == other.content_length
            && self.copy_source_region == other.copy_source_region
            && self.passthrough == other.passthrough
    }
}

/// Optional request fields forwarded to the backend.
///
/// Every field that is set is sent with a single `CopyObject` request. For a multipart copy only
/// the fields `CompleteMultipartUpload` accepts are forwarded (see
/// [`for_completion`](PassthroughFields::for_completion)).
#[derive(Clone, Default, PartialEq)]
pub struct PassthroughFields {
    /// The canned ACL to apply to the object.
    pub acl: Option<ObjectCannedAcl>,
    /// Caching behavior along the request/reply chain.
    pub cache_control: Option<String>,
    /// Presentational information for the object.
    pub content_disposition: Option<String>,
    /// Content encodings applied to the object.
    pub content_encoding: Option<String>,
    /// The language the content is in.
    pub content_language: Option<String>,
    /// A standard MIME type describing the format of the object data.
    pub content_type: Option<String>,
    /// A map of metadata to store with the object.
    pub metadata: Option<HashMap<String, String>>,
    /// Whether the metadata is copied from the source or replaced.
    pub metadata_directive: Option<MetadataDirective>,
    /// The tag-set for the object, encoded as URL query parameters.
    pub tagging: Option<String>,
    /// Whether the tag-set is copied from the source or replaced.
    pub tagging_directive: Option<TaggingDirective>,
    /// Storage class of the new object.
    pub storage_class: Option<StorageClass>,
    /// Server-side encryption algorithm for the new object.
    pub server_side_encryption: Option<ServerSideEncryption>,
    /// KMS key ID to use for object encryption.
    pub sse_kms_key_id: Option<String>,
    /// Redirect requests for the object to another object or URL.
    pub website_redirect_location: Option<String>,
    /// Confirms that the requester knows they will be charged for the request.
    pub request_payer: Option<RequestPayer>,
    /// The account ID of the expected destination bucket owner.
    pub expected_bucket_owner: Option<String>,
    /// The account ID of the expected source bucket owner.
    pub expected_source_bucket_owner: Option<String>,
    /// The algorithm to use when encrypting the object with a customer-provided key.
    pub sse_customer_algorithm: Option<String>,
    /// The customer-provided encryption key.
    pub sse_customer_key: Option<String>,
    /// The MD5 digest of the customer-provided encryption key.
    pub sse_customer_key_md5: Option<String>,
    /// Copies the object if its entity tag matches.
    pub copy_source_if_match: Option<String>,
    /// Copies the object if its entity tag does not match.
    pub copy_source_if_none_match: Option<String>,
}

impl PassthroughFields {
    /// The subset of fields accepted by `CompleteMultipartUpload`
    pub fn for_completion(&self) -> PassthroughFields {
        PassthroughFields {
            request_payer: self.request_payer.clone(),
            expected_bucket_owner: self.expected_bucket_owner.clone(),
            sse_customer_algorithm: self.sse_customer_algorithm.clone(),
            sse_customer_key: self.sse_customer_key.clone(),
            sse_customer_key_md5: self.sse_customer_key_md5.clone(),
            ..Default::default()
        }
    }
}

impl fmt::Debug for PassthroughFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatter = f.debug_struct("PassthroughFields");
        formatter.field("acl", &self.acl);
        formatter.field("cache_control", &self.cache_control);
        formatter.field("content_disposition", &self.content_disposition);
        formatter.field("content_encoding", &self.content_encoding);
        formatter.field("content_language", &self.content_language);
        formatter.field("content_type", &self.content_type);
        formatter.field("metadata", &self.metadata);
        formatter.field("metadata_directive", &self.metadata_directive);
        formatter.field("tagging", &self.tagging);
        formatter.field("tagging_directive", &self.tagging_directive);
        formatter.field("storage_class", &self.storage_class);
        formatter.field("server_side_encryption", &self.server_side_encryption);
        formatter.field("sse_kms_key_id", &"*** Sensitive Data Redacted ***");
        formatter.field("website_redirect_location", &self.website_redirect_location);
        formatter.field("request_payer", &self.request_payer);
        formatter.field("expected_bucket_owner", &self.expected_bucket_owner);
        formatter.field(
            "expected_source_bucket_owner",
            &self.expected_source_bucket_owner,
        );
        formatter.field("sse_customer_algorithm", &self.sse_customer_algorithm);
        formatter.field("sse_customer_key", &"*** Sensitive Data Redacted ***");
        formatter.field("sse_customer_key_md5", &self.sse_customer_key_md5);
        formatter.field("copy_source_if_match", &self.copy_source_if_match);
        formatter.field("copy_source_if_none_match", &self.copy_source_if_none_match);
        formatter.finish()
    }
}

/// A builder for [`CopyInput`].
#[non_exhaustive]
#[derive(Clone, Default, Debug)]
pub struct CopyInputBuilder {
    pub(crate) source: Option<ObjectRef>,
    pub(crate) destination: Option<ObjectRef>,
    pub(crate) options: CopyOptions,
}

impl CopyInputBuilder {
    /// The object to copy from. This field is required.
    pub fn source(mut self, input: impl Into<ObjectRef>) -> Self {
        self.source = Some(input.into());
        self
    }

    /// The object to copy from. This field is required.
    pub fn set_source(mut self, input: Option<ObjectRef>) -> Self {
        self.source = input;
        self
    }

    /// The object to copy to. This field is required.
    pub fn destination(mut self, input: impl Into<ObjectRef>) -> Self {
        self.destination = Some(input.into());
        self
    }

    /// The object to copy to. This field is required.
    pub fn set_destination(mut self, input: Option<ObjectRef>) -> Self {
        self.destination = input;
        self
    }

    /// Perform the copy as a multipart copy. Defaults to `false`.
    pub fn multipart_copy(mut self, input: bool) -> Self {
        self.options.multipart_copy = input;
        self
    }

    /// Size of each part of a multipart copy, at least 5 MiB.
    pub fn part_size(mut self, input: u64) -> Self {
        self.options.part_size = Some(input);
        self
    }

    /// Size of each part of a multipart copy, at least 5 MiB.
    pub fn set_part_size(mut self, input: Option<u64>) -> Self {
        self.options.part_size = input;
        self
    }

    /// Alias of [`part_size`](Self::part_size).
    pub fn min_part_size(self, input: u64) -> Self {
        self.part_size(input)
    }

    /// Size of the source object. When set, the size is not queried from the backend.
    pub fn content_length(mut self, input: u64) -> Self {
        self.options.content_length = Some(input);
        self
    }

    /// Size of the source object. When set, the size is not queried from the backend.
    pub fn set_content_length(mut self, input: Option<u64>) -> Self {
        self.options.content_length = input;
        self
    }

    /// Backend used to query the size of the source object.
    pub fn copy_source_client(self, input: impl CopyBackend + 'static) -> Self {
        self.set_copy_source_client(Some(Arc::new(input)))
    }

    /// Backend used to query the size of the source object.
    pub fn set_copy_source_client(mut self, input: Option<SharedBackend>) -> Self {
        self.options.copy_source_client = input;
        self
    }

    /// Region of the source object, when it differs from the client's region.
    pub fn copy_source_region(self, input: impl Into<String>) -> Self {
        self.set_copy_source_region(Some(input.into()))
    }

    /// Region of the source object, when it differs from the client's region.
    pub fn set_copy_source_region(mut self, input: Option<String>) -> Self {
        self.options.copy_source_region = input;
        self
    }

    /// Request fields forwarded to the backend.
    pub fn passthrough(mut self, input: PassthroughFields) -> Self {
        self.options.passthrough = input;
        self
    }

    /// The canned ACL to apply to the new object.
    pub fn acl(mut self, input: ObjectCannedAcl) -> Self {
        self.options.passthrough.acl = Some(input);
        self
    }

    /// A standard MIME type describing the format of the object data.
    pub fn content_type(mut self, input: impl Into<String>) -> Self {
        self.options.passthrough.content_type = Some(input.into());
        self
    }

    /// Adds a key-value pair to the metadata of the new object.
    pub fn metadata(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.options
            .passthrough
            .metadata
            .get_or_insert_with(HashMap::new)
            .insert(k.into(), v.into());
        self
    }

    /// Storage class of the new object.
    pub fn storage_class(mut self, input: StorageClass) -> Self {
        self.options.passthrough.storage_class = Some(input);
        self
    }

    /// Consumes the builder and constructs a [`CopyInput`]
    pub fn build(self) -> Result<CopyInput, BuildError> {
        let source = self
            .source
            .ok_or_else(|| BuildError::missing_field("source", "a copy source is required"))?;
        let destination = self.destination.ok_or_else(|| {
            BuildError::missing_field("destination", "a copy destination is required")
        })?;
        Ok(CopyInput {
            source,
            destination,
            options: self.options,
        })
    }
}

#[cfg(test)]
mod test {
    use super::{CopyInput, PassthroughFields};
    use aws_sdk_s3::types::{ObjectCannedAcl, RequestPayer};

    #[test]
    fn test_build_requires_both_sides() {
        assert!(CopyInput::builder().source("bucket/key").build().is_err());
        assert!(CopyInput::builder()
            .destination("bucket/key")
            .build()
            .is_err());
    }

    #[test]
    fn test_min_part_size_is_part_size() {
        let input = CopyInput::builder()
            .source("bucket/key")
            .destination("bucket/key2")
            .min_part_size(10 * 1024 * 1024)
            .build()
            .unwrap();
        assert_eq!(Some(10 * 1024 * 1024), input.options().part_size());
        assert!(!input.options().multipart_copy());
    }

    #[test]
    fn test_completion_fields() {
        let fields = PassthroughFields {
            acl: Some(ObjectCannedAcl::Private),
            request_payer: Some(RequestPayer::Requester),
            sse_customer_key: Some("secret".to_owned()),
            ..Default::default()
        };
        let completion = fields.for_completion();
        assert_eq!(None, completion.acl);
        assert_eq!(Some(RequestPayer::Requester), completion.request_payer);
        assert_eq!(Some("secret"), completion.sse_customer_key.as_deref());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let fields = PassthroughFields {
            sse_customer_key: Some("secret".to_owned()),
            ..Default::default()
        };
        assert!(!format!("{fields:?}").contains("secret"));
    }
}
