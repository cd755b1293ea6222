/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;
mod input;
mod output;

mod context;
mod multipart;
mod plain;
mod plan;
mod service;
mod size;

use std::sync::Arc;

use crate::error;
use crate::locator;
use context::{CopyContext, CopyState};
/// Request type for copies between Amazon S3 objects
pub use input::{CopyInput, CopyInputBuilder, CopyOptions, PassthroughFields};
/// Response type for copies between Amazon S3 objects
pub use output::CopyOutput;

/// Operation struct for single object copy
#[derive(Clone, Default, Debug)]
pub(crate) struct Copy;

impl Copy {
    /// Execute a single `Copy` operation
    pub(crate) async fn orchestrate(
        handle: Arc<crate::client::Handle>,
        input: &CopyInput,
    ) -> Result<CopyOutput, error::Error> {
        let source = locator::resolve(input.source())?;
        let destination = locator::resolve(input.destination())?;
        if let Some(version_id) = destination.version_id() {
            tracing::debug!("ignoring version id {version_id} of the copy destination");
        }

        let options = input.options();
        let part_size = match options.part_size() {
            Some(part_size) => Some(plan::validate_part_size(part_size)?),
            None => None,
        };

        let ctx = CopyContext::new(
            handle,
            CopyState {
                source,
                destination,
                passthrough: options.passthrough().clone(),
            },
        );

        if !options.multipart_copy() {
            tracing::trace!("sending copy as a single CopyObject request");
            return plain::copy_object(&ctx).await;
        }

        let total_size = size::resolve_size(&ctx, options, input.source().backend()).await?;
        let part_size = part_size.unwrap_or_else(|| ctx.handle.part_size_bytes());
        let plan = plan::plan(total_size, part_size)?;
        multipart::copy(ctx, plan).await
    }
}
