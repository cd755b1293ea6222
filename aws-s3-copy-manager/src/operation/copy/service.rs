/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::cmp;
use std::sync::Arc;

use async_channel::Receiver;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tower::{service_fn, Service, ServiceBuilder, ServiceExt};
use tracing::Instrument;

use crate::backend::{CompletedPart, UploadPartCopyRequest};
use crate::error::{self, Error};

use super::context::CopyContext;
use super::plan::{CopyPlan, PlannedPart};

/// Request/input type for our "upload_part_copy" service.
#[derive(Debug, Clone)]
pub(super) struct CopyPartRequest {
    pub(super) ctx: CopyContext,
    pub(super) upload_id: Arc<str>,
    pub(super) part: PlannedPart,
}

/// handler (service fn) for a single part
async fn copy_part_handler(request: CopyPartRequest) -> Result<CompletedPart, Error> {
    let ctx = request.ctx;
    let state = ctx.state();
    let part_number = request.part.part_number();

    let resp = ctx
        .backend()
        .upload_part_copy(UploadPartCopyRequest {
            bucket: state.destination.bucket().to_owned(),
            key: state.destination.key().to_owned(),
            part_number,
            copy_source: state.source.copy_source().to_owned(),
            copy_source_range: request.part.copy_source_range(),
            upload_id: request.upload_id.to_string(),
        })
        .await?;

    tracing::debug!("completed copy of part number {}", part_number);
    Ok(CompletedPart {
        e_tag: resp.e_tag,
        part_number,
    })
}

/// Create a new tower::Service for copying individual parts of an object
pub(super) fn copy_part_service(
    ctx: &CopyContext,
) -> impl Service<CopyPartRequest, Response = CompletedPart, Error = Error, Future: Send>
       + Clone
       + Send {
    let svc = service_fn(copy_part_handler);
    ServiceBuilder::new()
        .concurrency_limit(ctx.handle.num_workers())
        .service(svc)
}

/// Copy every part of `plan` into the multipart upload `upload_id`.
///
/// Parts are handed out to a pool of workers through a queue. The first failure stops further
/// dispatch, parts already in flight settle, and then that failure is returned. On success the
/// completed parts are returned in no particular order.
pub(super) async fn copy_parts(
    ctx: &CopyContext,
    upload_id: &str,
    plan: &CopyPlan,
) -> Result<Vec<CompletedPart>, Error> {
    let (work_tx, work_rx) = async_channel::bounded(plan.len().max(1));
    for part in plan.parts() {
        work_tx
            .try_send(*part)
            .map_err(|e| Error::new(error::ErrorKind::RuntimeError, e.to_string()))?;
    }
    work_tx.close();

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let cancel_tx = Arc::new(cancel_tx);
    let upload_id: Arc<str> = Arc::from(upload_id);
    let svc = copy_part_service(ctx);

    let n_workers = cmp::max(1, cmp::min(ctx.handle.num_workers(), plan.len()));
    let mut tasks = JoinSet::new();
    for worker_id in 0..n_workers {
        let worker = copy_parts_worker(
            ctx.clone(),
            upload_id.clone(),
            work_rx.clone(),
            svc.clone(),
            cancel_tx.clone(),
            cancel_rx.clone(),
        )
        .instrument(tracing::debug_span!("copy-parts-worker", worker = worker_id));
        tasks.spawn(worker);
    }
    drop(work_rx);
    tracing::trace!("work distributed to {n_workers} workers for copying parts");

    let mut completed = Vec::with_capacity(plan.len());
    let mut first_error: Option<Error> = None;
    while let Some(join_result) = tasks.join_next().await {
        match join_result.map_err(Error::from).and_then(|result| result) {
            Ok(parts) => completed.extend(parts),
            Err(err) => {
                cancel_tx.send_replace(true);
                if first_error.is_none() {
                    first_error = Some(err);
                } else {
                    tracing::debug!("additional part copy failure after cancellation: {err}");
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(completed),
    }
}

/// Worker function that pulls parts off the queue and copies them until the queue is drained or
/// cancellation is requested
async fn copy_parts_worker(
    ctx: CopyContext,
    upload_id: Arc<str>,
    work_rx: Receiver<PlannedPart>,
    svc: impl Service<CopyPartRequest, Response = CompletedPart, Error = Error, Future: Send>
        + Clone
        + Send
        + 'static,
    cancel_tx: Arc<watch::Sender<bool>>,
    cancel_rx: watch::Receiver<bool>,
) -> Result<Vec<CompletedPart>, Error> {
    let mut completed = Vec::new();
    while let Ok(part) = work_rx.recv().await {
        if *cancel_rx.borrow() {
            tracing::debug!("cancellation requested, not dispatching remaining parts");
            break;
        }

        let part_number = part.part_number();
        let req = CopyPartRequest {
            ctx: ctx.clone(),
            upload_id: upload_id.clone(),
            part,
        };
        match svc.clone().oneshot(req).await {
            Ok(completed_part) => completed.push(completed_part),
            Err(err) => {
                tracing::error!("failed to copy part number {part_number}: {err}");
                cancel_tx.send_replace(true);
                return Err(err);
            }
        }
    }
    Ok(completed)
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use aws_sdk_s3::operation::upload_part_copy::UploadPartCopyOutput;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use tokio_test::{assert_ready_ok, task};
    use tower::ServiceExt;

    use super::{copy_part_service, CopyPartRequest};
    use crate::client::Handle;
    use crate::locator::{self, ObjectRef};
    use crate::operation::copy::context::{CopyContext, CopyState};
    use crate::types::ConcurrencySetting;
    use crate::Config;

    fn test_context(concurrency: ConcurrencySetting) -> CopyContext {
        let rule = mock!(aws_sdk_s3::Client::upload_part_copy)
            .then_output(|| UploadPartCopyOutput::builder().build());
        let client = mock_client!(aws_sdk_s3, RuleMode::MatchAny, &[&rule]);
        let config = Config::builder()
            .client(client)
            .concurrency(concurrency)
            .build()
            .unwrap();
        let resolve = |value: &str| locator::resolve(&ObjectRef::from(value)).unwrap();
        CopyContext::new(
            Arc::new(Handle { config }),
            CopyState {
                source: resolve("source-bucket/source-key"),
                destination: resolve("target-bucket/target-key"),
                passthrough: Default::default(),
            },
        )
    }

    #[tokio::test]
    async fn test_zero_concurrency_admits_a_part() {
        let ctx = test_context(ConcurrencySetting::Explicit(0));
        let mut svc = copy_part_service(&ctx);

        let mut ready = task::spawn(ServiceExt::<CopyPartRequest>::ready(&mut svc));
        assert_ready_ok!(ready.poll());
    }

    #[tokio::test]
    async fn test_concurrency_limit_holds_back_second_part() {
        let ctx = test_context(ConcurrencySetting::Explicit(1));
        let mut first = copy_part_service(&ctx);
        let mut second = first.clone();

        let mut first_ready = task::spawn(ServiceExt::<CopyPartRequest>::ready(&mut first));
        assert_ready_ok!(first_ready.poll());
        drop(first_ready);

        let mut second_ready = task::spawn(ServiceExt::<CopyPartRequest>::ready(&mut second));
        assert!(second_ready.poll().is_pending());
    }
}
