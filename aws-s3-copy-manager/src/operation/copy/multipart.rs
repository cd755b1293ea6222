/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::BTreeMap;

use aws_sdk_s3::error::DisplayErrorContext;

use crate::backend::{
    AbortMultipartUploadRequest, CompleteMultipartUploadRequest, CompleteMultipartUploadResponse,
    CompletedPart, CreateMultipartUploadRequest,
};
use crate::error::{self, Error};

use super::context::CopyContext;
use super::plan::CopyPlan;
use super::service::copy_parts;
use super::CopyOutput;

/// Lifecycle of a multipart upload used for a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Created,
    Copying,
    AllPartsDone,
    Completed,
    Aborting,
    Aborted,
}

/// A multipart upload started for a single copy.
///
/// `complete` and `abort` are each sent at most once. `abort` consumes the session.
#[derive(Debug)]
struct MultipartUploadSession {
    ctx: CopyContext,
    upload_id: String,
    completed_parts: BTreeMap<i32, String>,
    state: SessionState,
    complete_sent: bool,
}

impl MultipartUploadSession {
    /// start a new multipart upload by invoking `CreateMultipartUpload`
    async fn create(ctx: CopyContext) -> Result<Self, Error> {
        let destination = &ctx.state().destination;
        let resp = ctx
            .backend()
            .create_multipart_upload(CreateMultipartUploadRequest {
                bucket: destination.bucket().to_owned(),
                key: destination.key().to_owned(),
            })
            .await?;
        tracing::trace!(
            "multipart upload started with upload id: {:?}",
            resp.upload_id
        );

        Ok(Self {
            ctx,
            upload_id: resp.upload_id,
            completed_parts: BTreeMap::new(),
            state: SessionState::Created,
            complete_sent: false,
        })
    }

    fn transition(&mut self, next: SessionState) {
        tracing::trace!("multipart copy session {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn record(&mut self, parts: Vec<CompletedPart>) {
        for part in parts {
            self.completed_parts.insert(part.part_number, part.e_tag);
        }
    }

    /// Completed parts ordered by part number
    fn ordered_parts(&self) -> Vec<CompletedPart> {
        self.completed_parts
            .iter()
            .map(|(part_number, e_tag)| CompletedPart {
                e_tag: e_tag.clone(),
                part_number: *part_number,
            })
            .collect()
    }

    async fn complete(&mut self) -> Result<CompleteMultipartUploadResponse, Error> {
        if self.state != SessionState::AllPartsDone || self.complete_sent {
            return Err(Error::new(
                error::ErrorKind::RuntimeError,
                format!(
                    "multipart upload {} cannot be completed from state {:?}",
                    self.upload_id, self.state
                ),
            ));
        }
        self.complete_sent = true;

        let state = self.ctx.state();
        let resp = self
            .ctx
            .backend()
            .complete_multipart_upload(CompleteMultipartUploadRequest {
                bucket: state.destination.bucket().to_owned(),
                key: state.destination.key().to_owned(),
                upload_id: self.upload_id.clone(),
                parts: self.ordered_parts(),
                passthrough: state.passthrough.for_completion(),
            })
            .await?;
        self.transition(SessionState::Completed);
        Ok(resp)
    }

    async fn abort(mut self) -> Result<(), Error> {
        self.transition(SessionState::Aborting);
        let destination = &self.ctx.state().destination;
        let result = self
            .ctx
            .backend()
            .abort_multipart_upload(AbortMultipartUploadRequest {
                bucket: destination.bucket().to_owned(),
                key: destination.key().to_owned(),
                upload_id: self.upload_id.clone(),
            })
            .await;
        self.transition(SessionState::Aborted);
        result
    }
}

/// Copy the source into the destination as a multipart upload laid out by `plan`
pub(super) async fn copy(ctx: CopyContext, plan: CopyPlan) -> Result<CopyOutput, Error> {
    tracing::trace!(
        "copy request using multipart upload of {} bytes with part size: {} bytes",
        plan.total_size(),
        plan.part_size()
    );
    let mut session = MultipartUploadSession::create(ctx.clone()).await?;

    session.transition(SessionState::Copying);
    match copy_parts(&ctx, &session.upload_id, &plan).await {
        Ok(parts) => session.record(parts),
        Err(err) => {
            tracing::error!("multipart copy failed, aborting");
            return Err(abort(session, err).await);
        }
    }
    session.transition(SessionState::AllPartsDone);

    tracing::trace!("completing multipart upload");
    match session.complete().await {
        Ok(resp) => {
            tracing::trace!("copy completed successfully");
            Ok(CopyOutput::from_multipart(
                session.upload_id.clone(),
                session.completed_parts.len(),
                resp,
            ))
        }
        Err(err) => {
            tracing::error!("failed to complete multipart upload, aborting");
            Err(abort(session, err).await)
        }
    }
}

/// Abort the session, returning `err` with any abort failure attached
async fn abort(session: MultipartUploadSession, err: Error) -> Error {
    match session.abort().await {
        Ok(()) => err,
        Err(abort_err) => {
            tracing::error!(
                "failed to abort upload: {}",
                DisplayErrorContext(&abort_err)
            );
            err.with_abort_error(abort_err)
        }
    }
}
