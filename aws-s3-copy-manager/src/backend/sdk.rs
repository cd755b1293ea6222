/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart as SdkCompletedPart};
use aws_types::region::Region;
use tracing::Instrument;

use super::{
    AbortMultipartUploadRequest, BackendFactory, CompleteMultipartUploadRequest,
    CompleteMultipartUploadResponse, CopyBackend, CopyObjectRequest, CopyObjectResponse,
    CreateMultipartUploadRequest, CreateMultipartUploadResponse, HeadObjectRequest,
    HeadObjectResponse, SharedBackend, UploadPartCopyRequest, UploadPartCopyResponse,
};
use crate::error::{self, Error};

#[async_trait]
impl CopyBackend for aws_sdk_s3::Client {
    async fn head_object(&self, request: HeadObjectRequest) -> Result<HeadObjectResponse, Error> {
        let resp = self
            .head_object()
            .bucket(request.bucket)
            .key(request.key)
            .set_version_id(request.version_id)
            .send()
            .instrument(tracing::debug_span!("send-head-object"))
            .await?;

        let content_length = resp
            .content_length()
            .ok_or_else(|| error::missing_field("HeadObject", "Content-Length"))?;
        let content_length = u64::try_from(content_length)
            .map_err(|_| error::missing_field("HeadObject", "non-negative Content-Length"))?;

        Ok(HeadObjectResponse { content_length })
    }

    async fn copy_object(&self, request: CopyObjectRequest) -> Result<CopyObjectResponse, Error> {
        let fields = request.passthrough;
        let resp = self
            .copy_object()
            .bucket(request.bucket)
            .key(request.key)
            .copy_source(request.copy_source)
            .set_acl(fields.acl)
            .set_cache_control(fields.cache_control)
            .set_content_disposition(fields.content_disposition)
            .set_content_encoding(fields.content_encoding)
            .set_content_language(fields.content_language)
            .set_content_type(fields.content_type)
            .set_metadata(fields.metadata)
            .set_metadata_directive(fields.metadata_directive)
            .set_tagging(fields.tagging)
            .set_tagging_directive(fields.tagging_directive)
            .set_storage_class(fields.storage_class)
            .set_server_side_encryption(fields.server_side_encryption)
            .set_ssekms_key_id(fields.sse_kms_key_id)
            .set_website_redirect_location(fields.website_redirect_location)
            .set_request_payer(fields.request_payer)
            .set_expected_bucket_owner(fields.expected_bucket_owner)
            .set_expected_source_bucket_owner(fields.expected_source_bucket_owner)
            .set_sse_customer_algorithm(fields.sse_customer_algorithm)
            .set_sse_customer_key(fields.sse_customer_key)
            .set_sse_customer_key_md5(fields.sse_customer_key_md5)
            .set_copy_source_if_match(fields.copy_source_if_match)
            .set_copy_source_if_none_match(fields.copy_source_if_none_match)
            .send()
            .instrument(tracing::debug_span!("send-copy-object"))
            .await?;

        Ok(CopyObjectResponse {
            e_tag: resp.copy_object_result.and_then(|result| result.e_tag),
            version_id: resp.version_id,
            copy_source_version_id: resp.copy_source_version_id,
            expiration: resp.expiration,
            server_side_encryption: resp.server_side_encryption,
            request_charged: resp.request_charged,
        })
    }

    async fn create_multipart_upload(
        &self,
        request: CreateMultipartUploadRequest,
    ) -> Result<CreateMultipartUploadResponse, Error> {
        let resp = self
            .create_multipart_upload()
            .bucket(request.bucket)
            .key(request.key)
            .send()
            .instrument(tracing::debug_span!("send-create-multipart-upload"))
            .await?;

        let upload_id = resp
            .upload_id
            .ok_or_else(|| error::missing_field("CreateMultipartUpload", "UploadId"))?;
        Ok(CreateMultipartUploadResponse { upload_id })
    }

    async fn upload_part_copy(
        &self,
        request: UploadPartCopyRequest,
    ) -> Result<UploadPartCopyResponse, Error> {
        let part_number = request.part_number;
        let resp = self
            .upload_part_copy()
            .bucket(request.bucket)
            .key(request.key)
            .part_number(part_number)
            .copy_source(request.copy_source)
            .copy_source_range(request.copy_source_range)
            .upload_id(request.upload_id)
            .send()
            .instrument(tracing::debug_span!("send-upload-part-copy", part_number))
            .await?;

        let e_tag = resp
            .copy_part_result
            .and_then(|result| result.e_tag)
            .ok_or_else(|| error::missing_field("UploadPartCopy", "CopyPartResult.ETag"))?;
        Ok(UploadPartCopyResponse { e_tag })
    }

    async fn complete_multipart_upload(
        &self,
        request: CompleteMultipartUploadRequest,
    ) -> Result<CompleteMultipartUploadResponse, Error> {
        let parts = request
            .parts
            .into_iter()
            .map(|part| {
                SdkCompletedPart::builder()
                    .e_tag(part.e_tag)
                    .part_number(part.part_number)
                    .build()
            })
            .collect::<Vec<_>>();

        let fields = request.passthrough;
        let resp = self
            .complete_multipart_upload()
            .bucket(request.bucket)
            .key(request.key)
            .upload_id(request.upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .set_request_payer(fields.request_payer)
            .set_expected_bucket_owner(fields.expected_bucket_owner)
            .set_sse_customer_algorithm(fields.sse_customer_algorithm)
            .set_sse_customer_key(fields.sse_customer_key)
            .set_sse_customer_key_md5(fields.sse_customer_key_md5)
            .send()
            .instrument(tracing::debug_span!("send-complete-multipart-upload"))
            .await?;

        Ok(CompleteMultipartUploadResponse {
            e_tag: resp.e_tag,
            version_id: resp.version_id,
            expiration: resp.expiration,
            server_side_encryption: resp.server_side_encryption,
            request_charged: resp.request_charged,
        })
    }

    async fn abort_multipart_upload(
        &self,
        request: AbortMultipartUploadRequest,
    ) -> Result<(), Error> {
        self.abort_multipart_upload()
            .bucket(request.bucket)
            .key(request.key)
            .upload_id(request.upload_id)
            .send()
            .instrument(tracing::debug_span!("send-abort-multipart-upload"))
            .await?;
        Ok(())
    }
}

/// Builds Amazon S3 clients for other regions from the configuration of a base client.
///
/// Everything but the region (credentials, retry settings, HTTP client, ...) is shared with the
/// base client.
#[derive(Debug, Clone)]
pub struct SdkBackendFactory {
    base: aws_sdk_s3::Client,
}

impl SdkBackendFactory {
    /// Create a factory deriving its clients from `base`
    pub fn new(base: aws_sdk_s3::Client) -> Self {
        Self { base }
    }
}

impl SdkBackendFactory {
    fn client_for_region(&self, region: &str) -> aws_sdk_s3::Client {
        let config = self
            .base
            .config()
            .to_builder()
            .region(Region::new(region.to_owned()))
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }
}

impl BackendFactory for SdkBackendFactory {
    fn for_region(&self, region: &str) -> SharedBackend {
        Arc::new(self.client_for_region(region))
    }
}
