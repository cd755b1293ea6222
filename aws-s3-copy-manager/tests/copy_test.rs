/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_s3_copy_manager::{
    error::ErrorKind, locator::ObjectDescriptor, operation::copy::PassthroughFields, Client,
    Config,
};
use aws_sdk_s3::types::{ObjectCannedAcl, StorageClass};
use std::sync::Arc;
use test_common::{RecordingBackend, RecordingFactory, MEBIBYTE};

fn test_client(backend: &RecordingBackend) -> Client {
    let config = Config::builder().backend(backend.clone()).build().unwrap();
    Client::new(config)
}

#[tokio::test]
async fn test_copy_from_sends_single_copy_object() {
    let backend = RecordingBackend::default();
    let client = test_client(&backend);

    let output = client
        .object("target-bucket", "target-key")
        .copy_from("source-bucket/source/key%20path")
        .send()
        .await
        .unwrap();

    let copies = backend.copy_requests();
    assert_eq!(1, copies.len());
    assert_eq!("target-bucket", copies[0].bucket);
    assert_eq!("target-key", copies[0].key);
    assert_eq!("source-bucket/source/key%20path", copies[0].copy_source);
    assert_eq!(1, backend.calls().len());

    assert_eq!(Some("copy-etag"), output.e_tag());
    assert_eq!(None, output.parts_copied());
    assert_eq!(None, output.upload_id());
}

#[tokio::test]
async fn test_copy_from_descriptor_escapes_key() {
    let backend = RecordingBackend::default();
    let client = test_client(&backend);

    let source = ObjectDescriptor::builder()
        .bucket("source-bucket")
        .key("unescaped/source/key path")
        .version_id("source-version-id")
        .build();
    client
        .object("target-bucket", "target-key")
        .copy_from(source)
        .send()
        .await
        .unwrap();

    assert_eq!(
        "source-bucket/unescaped/source/key%20path?versionId=source-version-id",
        backend.copy_requests()[0].copy_source
    );
}

#[tokio::test]
async fn test_copy_to_uses_object_as_source() {
    let backend = RecordingBackend::default();
    let client = test_client(&backend);

    client
        .object("source-bucket", "source key")
        .with_version_id("v1")
        .copy_to("target-bucket/target-key")
        .send()
        .await
        .unwrap();

    let copies = backend.copy_requests();
    assert_eq!("target-bucket", copies[0].bucket);
    assert_eq!("target-key", copies[0].key);
    assert_eq!("source-bucket/source%20key?versionId=v1", copies[0].copy_source);
}

#[tokio::test]
async fn test_copy_to_object_target() {
    let backend = RecordingBackend::default();
    let client = test_client(&backend);

    let target = client.object("target-bucket", "target key");
    client
        .object("source-bucket", "source-key")
        .copy_to(&target)
        .send()
        .await
        .unwrap();

    let copies = backend.copy_requests();
    assert_eq!("target-bucket", copies[0].bucket);
    assert_eq!("target key", copies[0].key);
    assert_eq!("source-bucket/source-key", copies[0].copy_source);
}

#[tokio::test]
async fn test_destination_version_is_ignored() {
    let backend = RecordingBackend::default();
    let client = test_client(&backend);

    let target = ObjectDescriptor::builder()
        .bucket("target-bucket")
        .key("target-key")
        .version_id("ignored")
        .build();
    client
        .object("source-bucket", "source-key")
        .copy_to(target)
        .send()
        .await
        .unwrap();

    let copies = backend.copy_requests();
    assert_eq!("target-bucket", copies[0].bucket);
    assert_eq!("target-key", copies[0].key);
}

#[tokio::test]
async fn test_passthrough_fields_forwarded() {
    let backend = RecordingBackend::default();
    let client = test_client(&backend);

    client
        .object("target-bucket", "target-key")
        .copy_from("source-bucket/source-key")
        .acl(ObjectCannedAcl::PublicRead)
        .content_type("text/plain")
        .storage_class(StorageClass::StandardIa)
        .metadata("origin", "backup")
        .send()
        .await
        .unwrap();

    let passthrough = &backend.copy_requests()[0].passthrough;
    assert_eq!(Some(ObjectCannedAcl::PublicRead), passthrough.acl);
    assert_eq!(Some("text/plain"), passthrough.content_type.as_deref());
    assert_eq!(Some(StorageClass::StandardIa), passthrough.storage_class);
    assert_eq!(
        Some("backup"),
        passthrough
            .metadata
            .as_ref()
            .and_then(|m| m.get("origin"))
            .map(String::as_str)
    );
}

#[tokio::test]
async fn test_multipart_options_ignored_for_single_copy() {
    let backend = RecordingBackend::default();
    let client = test_client(&backend);

    client
        .object("target-bucket", "target-key")
        .copy_from("source-bucket/source-key")
        .passthrough(PassthroughFields {
            cache_control: Some("no-cache".to_owned()),
            ..Default::default()
        })
        .content_length(MEBIBYTE)
        .send()
        .await
        .unwrap();

    assert_eq!(1, backend.calls().len());
    assert_eq!(1, backend.copy_requests().len());
}

#[tokio::test]
async fn test_copy_error_propagated() {
    let backend = RecordingBackend::default().fail_copy("AccessDenied");
    let client = test_client(&backend);

    let err = client
        .object("target-bucket", "target-key")
        .copy_from("source-bucket/source-key")
        .send()
        .await
        .unwrap_err();

    assert_eq!(&ErrorKind::BackendError, err.kind());
    assert_eq!(Some("AccessDenied"), err.code());
}

#[tokio::test]
async fn test_malformed_sources_rejected() {
    let backend = RecordingBackend::default();
    let client = test_client(&backend);

    for source in ["no-slash", "/key", "bucket/", "bucket/key?versionId="] {
        let err = client
            .object("target-bucket", "target-key")
            .copy_from(source)
            .send()
            .await
            .unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind(), "{source}");
    }

    let err = client
        .object("target-bucket", "target-key")
        .copy_from(ObjectDescriptor::builder().bucket("bucket").build())
        .send()
        .await
        .unwrap_err();
    assert_eq!(&ErrorKind::InputInvalid, err.kind());

    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_source_region_routes_size_query() {
    let default_backend = RecordingBackend::new("default");
    let regional_backend = RecordingBackend::new("eu-west-1").with_content_length(12 * MEBIBYTE);
    let factory = RecordingFactory::new(regional_backend.clone());
    let config = Config::builder()
        .backend(default_backend.clone())
        .backend_factory(factory.clone())
        .build()
        .unwrap();
    let client = Client::new(config);

    let output = client
        .object("target-bucket", "target-key")
        .copy_from("source-bucket/source-key")
        .multipart_copy(true)
        .part_size(5 * MEBIBYTE)
        .copy_source_region("eu-west-1")
        .send()
        .await
        .unwrap();

    assert_eq!(vec!["eu-west-1".to_owned()], factory.regions());
    assert_eq!(1, regional_backend.head_requests().len());
    assert!(default_backend.head_requests().is_empty());

    // the copy itself goes to the destination backend
    assert!(regional_backend.part_requests().is_empty());
    assert_eq!(3, default_backend.part_requests().len());
    assert_eq!(Some(3), output.parts_copied());
}

#[tokio::test]
async fn test_descriptor_source_region_routes_size_query() {
    let default_backend = RecordingBackend::new("default");
    let regional_backend = RecordingBackend::new("us-west-2").with_content_length(12 * MEBIBYTE);
    let factory = RecordingFactory::new(regional_backend.clone());
    let config = Config::builder()
        .backend(default_backend.clone())
        .backend_factory(factory.clone())
        .build()
        .unwrap();
    let client = Client::new(config);

    let source = ObjectDescriptor::builder()
        .bucket("source-bucket")
        .key("source key")
        .build();
    client
        .object("target-bucket", "target-key")
        .copy_from(source)
        .multipart_copy(true)
        .set_copy_source_region(Some("us-west-2".to_owned()))
        .send()
        .await
        .unwrap();

    assert_eq!(vec!["us-west-2".to_owned()], factory.regions());
    let heads = regional_backend.head_requests();
    assert_eq!(1, heads.len());
    assert_eq!("source key", heads[0].key);
    assert!(default_backend.head_requests().is_empty());
}

#[tokio::test]
async fn test_source_region_requires_factory() {
    let backend = RecordingBackend::default();
    let client = test_client(&backend);

    let err = client
        .object("target-bucket", "target-key")
        .copy_from("source-bucket/source-key")
        .multipart_copy(true)
        .copy_source_region("eu-west-1")
        .send()
        .await
        .unwrap_err();

    assert_eq!(&ErrorKind::InputInvalid, err.kind());
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_source_client_routes_size_query() {
    let default_backend = RecordingBackend::new("default");
    let source_backend = RecordingBackend::new("source").with_content_length(12 * MEBIBYTE);
    let factory = RecordingFactory::new(RecordingBackend::new("regional"));
    let config = Config::builder()
        .backend(default_backend.clone())
        .backend_factory(factory.clone())
        .build()
        .unwrap();
    let client = Client::new(config);

    client
        .object("target-bucket", "target-key")
        .copy_from("source-bucket/source-key")
        .multipart_copy(true)
        .copy_source_client(source_backend.clone())
        .copy_source_region("eu-west-1")
        .send()
        .await
        .unwrap();

    assert_eq!(1, source_backend.head_requests().len());
    assert!(default_backend.head_requests().is_empty());
    assert!(factory.regions().is_empty());
}

#[tokio::test]
async fn test_source_object_routes_size_query_to_its_client() {
    let source_backend = RecordingBackend::new("source").with_content_length(12 * MEBIBYTE);
    let source_client = test_client(&source_backend);
    let target_backend = RecordingBackend::new("target");
    let target_client = test_client(&target_backend);

    let source = source_client.object("source-bucket", "source key");
    target_client
        .object("target-bucket", "target-key")
        .copy_from(&source)
        .multipart_copy(true)
        .send()
        .await
        .unwrap();

    let heads = source_backend.head_requests();
    assert_eq!(1, heads.len());
    assert_eq!("source key", heads[0].key);
    assert!(target_backend.head_requests().is_empty());
    assert_eq!(1, target_backend.create_requests().len());
    for part in target_backend.part_requests() {
        assert_eq!("source-bucket/source%20key", part.copy_source);
    }
}

#[tokio::test]
async fn test_missing_source_reported_as_not_found() {
    let backend = RecordingBackend::default().fail_head("NotFound");
    let client = test_client(&backend);

    let err = client
        .object("target-bucket", "target-key")
        .copy_from("source-bucket/source-key")
        .multipart_copy(true)
        .send()
        .await
        .unwrap_err();

    assert_eq!(&ErrorKind::NotFound, err.kind());
    assert!(backend.create_requests().is_empty());
}

#[tokio::test]
async fn test_shared_source_client() {
    let source_backend = RecordingBackend::new("source").with_content_length(12 * MEBIBYTE);
    let default_backend = RecordingBackend::new("default");
    let client = test_client(&default_backend);

    let shared: aws_s3_copy_manager::backend::SharedBackend = Arc::new(source_backend.clone());
    for _ in 0..2 {
        client
            .object("target-bucket", "target-key")
            .copy_from("source-bucket/source-key")
            .multipart_copy(true)
            .set_copy_source_client(Some(shared.clone()))
            .send()
            .await
            .unwrap();
    }

    assert_eq!(2, source_backend.head_requests().len());
    assert!(default_backend.head_requests().is_empty());
}
