/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::cmp;
use std::sync::Arc;

use aws_smithy_types::error::operation::BuildError;

use crate::backend::sdk::SdkBackendFactory;
use crate::backend::{BackendFactory, CopyBackend, SharedBackend};
use crate::types::{ConcurrencySetting, PartSize};
use crate::MEBIBYTE;

pub(crate) mod loader;

/// Minimum size of a part (and of the object) for a multipart copy
pub(crate) const MIN_MULTIPART_PART_SIZE_BYTES: u64 = 5 * MEBIBYTE;

/// Part size used when none is configured
pub(crate) const DEFAULT_PART_SIZE_BYTES: u64 = 50 * MEBIBYTE;

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    target_part_size: PartSize,
    concurrency: ConcurrencySetting,
    backend: SharedBackend,
    backend_factory: Option<Arc<dyn BackendFactory>>,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns a reference to the target part size to use for multipart copies
    pub fn part_size(&self) -> &PartSize {
        &self.target_part_size
    }

    /// Returns the concurrency setting to use for multipart copies.
    pub fn concurrency(&self) -> &ConcurrencySetting {
        &self.concurrency
    }

    /// The backend that copy requests are sent to.
    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// The factory used to reach source objects in other regions, if any.
    pub fn backend_factory(&self) -> Option<&Arc<dyn BackendFactory>> {
        self.backend_factory.as_ref()
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    target_part_size: PartSize,
    concurrency: ConcurrencySetting,
    backend: Option<SharedBackend>,
    backend_factory: Option<Arc<dyn BackendFactory>>,
}

impl Builder {
    /// The target size of each part when a multipart copy is requested.
    ///
    /// The minimum part size is 5 MiB, any part size less than that will be rounded up.
    /// Default is [PartSize::Auto] (50 MiB).
    ///
    /// NOTE: The actual part size used may be larger than the configured part size if
    /// the current value would result in more than 10,000 parts for a copy.
    pub fn part_size(self, part_size: PartSize) -> Self {
        let part_size = match part_size {
            PartSize::Target(part_size) => {
                PartSize::Target(cmp::max(part_size, MIN_MULTIPART_PART_SIZE_BYTES))
            }
            tps => tps,
        };

        self.set_target_part_size(part_size)
    }

    /// Target part size for a multipart copy.
    ///
    /// NOTE: This does not validate the setting and is meant for internal use only.
    pub(crate) fn set_target_part_size(mut self, part_size: PartSize) -> Self {
        self.target_part_size = part_size;
        self
    }

    /// Set the number of part copies a single multipart copy may have in flight.
    ///
    /// An explicit concurrency of zero is rounded up to one.
    /// Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.concurrency = match concurrency {
            ConcurrencySetting::Explicit(concurrency) => {
                ConcurrencySetting::Explicit(cmp::max(concurrency, 1))
            }
            setting => setting,
        };
        self
    }

    /// Set an explicit S3 client to send requests with.
    ///
    /// Clients for other regions (see `copy_source_region`) are derived from this client's
    /// configuration.
    pub fn client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.backend_factory = Some(Arc::new(SdkBackendFactory::new(client.clone())));
        self.backend = Some(Arc::new(client));
        self
    }

    /// Set a custom backend to send requests to.
    pub fn backend(mut self, backend: impl CopyBackend + 'static) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Set the factory used to build backends bound to another region.
    pub fn backend_factory(mut self, factory: impl BackendFactory + 'static) -> Self {
        self.backend_factory = Some(Arc::new(factory));
        self
    }

    /// Consumes the builder and constructs a [`Config`]
    pub fn build(self) -> Result<Config, BuildError> {
        let backend = self.backend.clone().ok_or_else(|| {
            BuildError::missing_field("backend", "a client or backend must be configured")
        })?;
        Ok(self.finish(backend))
    }

    fn finish(self, backend: SharedBackend) -> Config {
        Config {
            target_part_size: self.target_part_size,
            concurrency: self.concurrency,
            backend,
            backend_factory: self.backend_factory,
        }
    }
}
