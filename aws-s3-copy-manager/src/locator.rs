/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::sync::Arc;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::backend::SharedBackend;
use crate::error::{self, Error};

const VERSION_ID_MARKER: &str = "?versionId=";

/// Bytes escaped in keys taken from structured sources: everything outside the
/// unreserved set, with `/` preserved as the path separator.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Anything that identifies an object by bucket, key and (optionally) version.
///
/// Values implementing this trait can be used as the source or target of a copy through
/// [`ObjectRef::from_identity`]. They are treated exactly like an [`ObjectDescriptor`].
pub trait ObjectIdentity {
    /// The bucket the object lives in
    fn bucket(&self) -> &str;

    /// The (unescaped) object key
    fn key(&self) -> &str;

    /// The object version, if a specific version is addressed
    fn version_id(&self) -> Option<&str> {
        None
    }
}

/// A structured description of an object location.
///
/// Keys given here are unescaped; they are percent-encoded when building the copy source.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectDescriptor {
    /// The bucket name
    pub bucket: Option<String>,

    /// The object key
    pub key: Option<String>,

    /// The object version
    pub version_id: Option<String>,
}

impl ObjectDescriptor {
    /// Creates a new builder-style object to manufacture [`ObjectDescriptor`]
    pub fn builder() -> ObjectDescriptorBuilder {
        ObjectDescriptorBuilder::default()
    }

    /// The bucket name
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The object key
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// The object version
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }
}

/// A builder for [`ObjectDescriptor`]
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectDescriptorBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) version_id: Option<String>,
}

impl ObjectDescriptorBuilder {
    /// The bucket name
    pub fn bucket(self, input: impl Into<String>) -> Self {
        self.set_bucket(Some(input.into()))
    }

    /// The bucket name
    pub fn set_bucket(mut self, input: Option<String>) -> Self {
        self.bucket = input;
        self
    }

    /// The object key
    pub fn key(self, input: impl Into<String>) -> Self {
        self.set_key(Some(input.into()))
    }

    /// The object key
    pub fn set_key(mut self, input: Option<String>) -> Self {
        self.key = input;
        self
    }

    /// The object version
    pub fn version_id(self, input: impl Into<String>) -> Self {
        self.set_version_id(Some(input.into()))
    }

    /// The object version
    pub fn set_version_id(mut self, input: Option<String>) -> Self {
        self.version_id = input;
        self
    }

    /// Consumes the builder and constructs an [`ObjectDescriptor`]
    ///
    /// Required fields are validated when the descriptor is used.
    pub fn build(self) -> ObjectDescriptor {
        ObjectDescriptor {
            bucket: self.bucket,
            key: self.key,
            version_id: self.version_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Shape {
    /// `bucket/key[?versionId=id]`, already encoded
    CopySource(String),
    Descriptor(ObjectDescriptor),
}

/// The source or target of a copy, in any of the accepted shapes.
///
/// * a copy source string of the form `bucket/key[?versionId=id]`. The key is expected to be
///   URL encoded already and is used verbatim.
/// * an [`ObjectDescriptor`] or a `(bucket, key)` tuple. The key is URL encoded for you.
/// * an [`Object`](crate::object::Object) handle or any [`ObjectIdentity`].
#[derive(Clone)]
pub struct ObjectRef {
    shape: Shape,
    backend: Option<SharedBackend>,
}

impl ObjectRef {
    /// Reference the object identified by `value`
    pub fn from_identity<T>(value: &T) -> Self
    where
        T: ObjectIdentity + ?Sized,
    {
        let descriptor = ObjectDescriptor::builder()
            .bucket(value.bucket())
            .key(value.key())
            .set_version_id(value.version_id().map(str::to_owned))
            .build();
        descriptor.into()
    }

    /// Attach the backend that owns the referenced object.
    pub(crate) fn with_backend(mut self, backend: SharedBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The backend the referenced object is bound to, if it came from a handle
    pub(crate) fn backend(&self) -> Option<&SharedBackend> {
        self.backend.as_ref()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("shape", &self.shape)
            .field("bound_backend", &self.backend.is_some())
            .finish()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        let same_backend = match (&self.backend, &other.backend) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        self.shape == other.shape && same_backend
    }
}

impl From<&str> for ObjectRef {
    fn from(value: &str) -> Self {
        value.to_owned().into()
    }
}

impl From<String> for ObjectRef {
    fn from(value: String) -> Self {
        ObjectRef {
            shape: Shape::CopySource(value),
            backend: None,
        }
    }
}

impl From<ObjectDescriptor> for ObjectRef {
    fn from(value: ObjectDescriptor) -> Self {
        ObjectRef {
            shape: Shape::Descriptor(value),
            backend: None,
        }
    }
}

impl<B, K> From<(B, K)> for ObjectRef
where
    B: Into<String>,
    K: Into<String>,
{
    fn from((bucket, key): (B, K)) -> Self {
        ObjectDescriptor::builder().bucket(bucket).key(key).build().into()
    }
}

/// A resolved, canonical object location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectLocator {
    bucket: String,
    key: String,
    version_id: Option<String>,
    copy_source: String,
}

impl ObjectLocator {
    /// The bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The unescaped object key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The object version, if one was addressed
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// The `x-amz-copy-source` value addressing this object: `bucket/key[?versionId=id]`
    pub fn copy_source(&self) -> &str {
        &self.copy_source
    }
}

/// Resolve any accepted object reference into an [`ObjectLocator`].
///
/// Fails with [`ErrorKind::InputInvalid`](crate::error::ErrorKind::InputInvalid) when the
/// reference is malformed (e.g. a copy source without a `/`, or a descriptor without a key).
pub fn resolve(value: &ObjectRef) -> Result<ObjectLocator, Error> {
    match &value.shape {
        Shape::CopySource(copy_source) => parse_copy_source(copy_source),
        Shape::Descriptor(descriptor) => from_descriptor(descriptor),
    }
}

fn parse_copy_source(copy_source: &str) -> Result<ObjectLocator, Error> {
    let (bucket, remainder) = copy_source.split_once('/').ok_or_else(|| {
        error::invalid_input(format!(
            "copy source `{copy_source}` is not of the form `bucket/key`"
        ))
    })?;

    let (encoded_key, version_id) = match remainder.split_once(VERSION_ID_MARKER) {
        Some((key, version_id)) => (key, Some(version_id)),
        None => (remainder, None),
    };

    if bucket.is_empty() || encoded_key.is_empty() {
        return Err(error::invalid_input(format!(
            "copy source `{copy_source}` must name both a bucket and a key"
        )));
    }
    if version_id == Some("") {
        return Err(error::invalid_input(format!(
            "copy source `{copy_source}` has an empty version id"
        )));
    }

    let key = percent_decode_str(encoded_key)
        .decode_utf8()
        .map_err(|err| {
            error::invalid_input(format!(
                "copy source key `{encoded_key}` is not valid UTF-8 once decoded: {err}"
            ))
        })?
        .into_owned();

    Ok(ObjectLocator {
        bucket: bucket.to_owned(),
        key,
        version_id: version_id.map(str::to_owned),
        copy_source: copy_source.to_owned(),
    })
}

fn from_descriptor(descriptor: &ObjectDescriptor) -> Result<ObjectLocator, Error> {
    let bucket = required(descriptor.bucket(), "bucket")?;
    let key = required(descriptor.key(), "key")?;

    let mut copy_source = format!("{bucket}/{}", utf8_percent_encode(key, KEY_ENCODE_SET));
    if let Some(version_id) = descriptor.version_id() {
        copy_source.push_str(VERSION_ID_MARKER);
        copy_source.push_str(version_id);
    }

    Ok(ObjectLocator {
        bucket: bucket.to_owned(),
        key: key.to_owned(),
        version_id: descriptor.version_id.clone(),
        copy_source,
    })
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, Error> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(error::invalid_input(format!(
            "object descriptor is missing a {field}"
        ))),
    }
}

#[cfg(test)]
mod test {
    use super::{resolve, ObjectDescriptor, ObjectIdentity, ObjectRef};
    use crate::error::ErrorKind;

    struct Version {
        bucket: &'static str,
        key: &'static str,
        id: &'static str,
    }

    impl ObjectIdentity for Version {
        fn bucket(&self) -> &str {
            self.bucket
        }

        fn key(&self) -> &str {
            self.key
        }

        fn version_id(&self) -> Option<&str> {
            Some(self.id)
        }
    }

    #[test]
    fn test_descriptor_key_is_escaped() {
        let source = ObjectDescriptor::builder()
            .bucket("source-bucket")
            .key("unescaped/source/key path")
            .build();
        let locator = resolve(&source.into()).unwrap();
        assert_eq!(
            "source-bucket/unescaped/source/key%20path",
            locator.copy_source()
        );
        assert_eq!("unescaped/source/key path", locator.key());
        assert_eq!(None, locator.version_id());
    }

    #[test]
    fn test_descriptor_with_version_id() {
        let source = ObjectDescriptor::builder()
            .bucket("src-bucket")
            .key("src key")
            .version_id("src-version-id")
            .build();
        let locator = resolve(&source.into()).unwrap();
        assert_eq!(
            "src-bucket/src%20key?versionId=src-version-id",
            locator.copy_source()
        );
        assert_eq!(Some("src-version-id"), locator.version_id());
    }

    #[test]
    fn test_unreserved_bytes_are_kept() {
        let locator = resolve(&("bucket", "a-b_c.d~e/f+g&h").into()).unwrap();
        assert_eq!("bucket/a-b_c.d~e/f%2Bg%26h", locator.copy_source());
    }

    #[test]
    fn test_copy_source_used_verbatim() {
        let locator = resolve(&"source-bucket/source/key%20path".into()).unwrap();
        assert_eq!("source-bucket/source/key%20path", locator.copy_source());
        assert_eq!("source-bucket", locator.bucket());
        assert_eq!("source/key path", locator.key());
    }

    #[test]
    fn test_copy_source_with_version_id() {
        let locator =
            resolve(&"source-bucket/source%20key?versionId=source-version-id".into()).unwrap();
        assert_eq!(
            "source-bucket/source%20key?versionId=source-version-id",
            locator.copy_source()
        );
        assert_eq!("source key", locator.key());
        assert_eq!(Some("source-version-id"), locator.version_id());
    }

    #[test]
    fn test_identity_matches_descriptor() {
        let version = Version {
            bucket: "source-bucket",
            key: "unescaped/source/key path",
            id: "source-version-id",
        };
        let locator = resolve(&ObjectRef::from_identity(&version)).unwrap();
        assert_eq!(
            "source-bucket/unescaped/source/key%20path?versionId=source-version-id",
            locator.copy_source()
        );
    }

    #[test]
    fn test_malformed_references_rejected() {
        let invalid: Vec<ObjectRef> = vec![
            "target".into(),
            "/key".into(),
            "bucket/".into(),
            "bucket/key?versionId=".into(),
            "bucket/%FF".into(),
            ObjectDescriptor::builder().bucket("bucket").build().into(),
            ObjectDescriptor::builder().key("key").build().into(),
            ("", "key").into(),
        ];

        for value in invalid {
            let err = resolve(&value).expect_err("reference should be rejected");
            assert_eq!(&ErrorKind::InputInvalid, err.kind(), "{value:?}");
        }
    }
}
