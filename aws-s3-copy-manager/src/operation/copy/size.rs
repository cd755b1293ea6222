/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::backend::{HeadObjectRequest, SharedBackend};
use crate::error::{self, Error};

use super::context::CopyContext;
use super::CopyOptions;

/// Determine the size of the copy source in bytes.
///
/// A caller supplied content length is trusted as is. Otherwise the source is queried with
/// `HeadObject` through the backend chosen by [`source_backend`].
pub(super) async fn resolve_size(
    ctx: &CopyContext,
    options: &CopyOptions,
    bound_backend: Option<&SharedBackend>,
) -> Result<u64, Error> {
    if let Some(content_length) = options.content_length() {
        tracing::trace!("using caller supplied content length of {content_length} bytes");
        return Ok(content_length);
    }

    let backend = source_backend(ctx, options, bound_backend)?;
    let source = &ctx.state().source;
    let resp = backend
        .head_object(HeadObjectRequest {
            bucket: source.bucket().to_owned(),
            key: source.key().to_owned(),
            version_id: source.version_id().map(str::to_owned),
        })
        .await?;
    Ok(resp.content_length)
}

/// The backend that can see the source object.
///
/// In order of preference: the caller's source client, the backend of a source [`Object`],
/// a backend for the source region, and finally the client's default backend.
///
/// [`Object`]: crate::object::Object
fn source_backend(
    ctx: &CopyContext,
    options: &CopyOptions,
    bound_backend: Option<&SharedBackend>,
) -> Result<SharedBackend, Error> {
    if let Some(backend) = options.copy_source_client() {
        return Ok(backend.clone());
    }
    if let Some(backend) = bound_backend {
        return Ok(backend.clone());
    }
    if let Some(region) = options.copy_source_region() {
        let factory = ctx.handle.config.backend_factory().ok_or_else(|| {
            error::invalid_input(format!(
                "copy_source_region `{region}` requires a client configured with a backend factory"
            ))
        })?;
        tracing::trace!("querying copy source size in region {region}");
        return Ok(factory.for_region(region));
    }
    Ok(ctx.backend().clone())
}
