/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use crate::client::Handle;
use crate::locator::{ObjectIdentity, ObjectRef};
use crate::operation::copy::builders::CopyFluentBuilder;
use crate::operation::copy::CopyInput;

/// An object bound to the [`Client`](crate::Client) it was created from.
///
/// Used as either side of a copy. When it is the source, the size of the object is queried
/// through its own client.
#[derive(Debug, Clone)]
pub struct Object {
    handle: Arc<Handle>,
    bucket: String,
    key: String,
    version_id: Option<String>,
}

impl Object {
    pub(crate) fn new(handle: Arc<Handle>, bucket: String, key: String) -> Self {
        Self {
            handle,
            bucket,
            key,
            version_id: None,
        }
    }

    /// Refer to a specific version of the object.
    ///
    /// Only meaningful when the object is a copy source.
    pub fn with_version_id(mut self, version_id: impl Into<String>) -> Self {
        self.version_id = Some(version_id.into());
        self
    }

    /// The bucket name containing the object.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Key of the object.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Version of the object, if any.
    pub fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }

    /// Copy this object to `target`.
    ///
    /// `target` may be a `"bucket/key"` string, an
    /// [`ObjectDescriptor`](crate::locator::ObjectDescriptor), or another [`Object`].
    pub fn copy_to(&self, target: impl Into<ObjectRef>) -> CopyFluentBuilder {
        let inner = CopyInput::builder().source(self).destination(target);
        CopyFluentBuilder::new(self.handle.clone(), inner)
    }

    /// Replace this object with a copy of `source`.
    ///
    /// A `"bucket/key[?versionId=id]"` string is used as given and must already be URL
    /// encoded.
    pub fn copy_from(&self, source: impl Into<ObjectRef>) -> CopyFluentBuilder {
        let inner = CopyInput::builder().source(source).destination(self);
        CopyFluentBuilder::new(self.handle.clone(), inner)
    }
}

impl ObjectIdentity for Object {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn key(&self) -> &str {
        &self.key
    }

    fn version_id(&self) -> Option<&str> {
        self.version_id.as_deref()
    }
}

impl From<&Object> for ObjectRef {
    fn from(value: &Object) -> Self {
        ObjectRef::from_identity(value).with_backend(value.handle.config.backend().clone())
    }
}

impl From<Object> for ObjectRef {
    fn from(value: Object) -> Self {
        ObjectRef::from(&value)
    }
}
