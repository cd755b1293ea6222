/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::backend::CopyObjectRequest;
use crate::error::Error;

use super::context::CopyContext;
use super::CopyOutput;

/// Copy the whole object with a single `CopyObject` request
pub(super) async fn copy_object(ctx: &CopyContext) -> Result<CopyOutput, Error> {
    let state = ctx.state();
    let resp = ctx
        .backend()
        .copy_object(CopyObjectRequest {
            bucket: state.destination.bucket().to_owned(),
            key: state.destination.key().to_owned(),
            copy_source: state.source.copy_source().to_owned(),
            passthrough: state.passthrough.clone(),
        })
        .await?;
    Ok(resp.into())
}
