/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use async_trait::async_trait;
use aws_s3_copy_manager::backend::{
    AbortMultipartUploadRequest, BackendFactory, CompleteMultipartUploadRequest,
    CompleteMultipartUploadResponse, CopyBackend, CopyObjectRequest, CopyObjectResponse,
    CreateMultipartUploadRequest, CreateMultipartUploadResponse, HeadObjectRequest,
    HeadObjectResponse, SharedBackend, UploadPartCopyRequest, UploadPartCopyResponse,
};
use aws_s3_copy_manager::error::Error;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MEBIBYTE: u64 = 1024 * 1024;

/// A request received by a [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    HeadObject(HeadObjectRequest),
    CopyObject(CopyObjectRequest),
    CreateMultipartUpload(CreateMultipartUploadRequest),
    UploadPartCopy(UploadPartCopyRequest),
    /// A part copy returned, successfully or not
    UploadPartCopySettled(i32),
    CompleteMultipartUpload(CompleteMultipartUploadRequest),
    AbortMultipartUpload(AbortMultipartUploadRequest),
}

#[derive(Debug, Default)]
struct Script {
    content_length: u64,
    upload_id: String,
    head_error: Option<String>,
    copy_error: Option<String>,
    create_error: Option<String>,
    part_errors: HashMap<i32, String>,
    part_delays: HashMap<i32, Duration>,
    complete_error: Option<String>,
    abort_error: Option<String>,
    reverse_part_completion: bool,
}

/// In-memory backend that records every request it receives and answers from a script.
///
/// Clones share the same recording.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    name: String,
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new("default")
    }
}

impl RecordingBackend {
    pub fn new(name: impl Into<String>) -> Self {
        let script = Script {
            upload_id: "test-upload-id".to_owned(),
            ..Default::default()
        };
        Self {
            name: name.into(),
            script: Arc::new(Mutex::new(script)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size reported by `HeadObject`
    pub fn with_content_length(self, content_length: u64) -> Self {
        self.script.lock().unwrap().content_length = content_length;
        self
    }

    pub fn with_upload_id(self, upload_id: impl Into<String>) -> Self {
        self.script.lock().unwrap().upload_id = upload_id.into();
        self
    }

    pub fn fail_head(self, code: &str) -> Self {
        self.script.lock().unwrap().head_error = Some(code.to_owned());
        self
    }

    pub fn fail_copy(self, code: &str) -> Self {
        self.script.lock().unwrap().copy_error = Some(code.to_owned());
        self
    }

    pub fn fail_create(self, code: &str) -> Self {
        self.script.lock().unwrap().create_error = Some(code.to_owned());
        self
    }

    pub fn fail_part(self, part_number: i32, code: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .part_errors
            .insert(part_number, code.to_owned());
        self
    }

    pub fn fail_complete(self, code: &str) -> Self {
        self.script.lock().unwrap().complete_error = Some(code.to_owned());
        self
    }

    pub fn fail_abort(self, code: &str) -> Self {
        self.script.lock().unwrap().abort_error = Some(code.to_owned());
        self
    }

    /// Delay the response to the copy of `part_number`
    pub fn delay_part(self, part_number: i32, delay: Duration) -> Self {
        self.script
            .lock()
            .unwrap()
            .part_delays
            .insert(part_number, delay);
        self
    }

    /// Delay each part copy so that higher part numbers finish first
    pub fn reverse_part_completion(self) -> Self {
        self.script.lock().unwrap().reverse_part_completion = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn head_requests(&self) -> Vec<HeadObjectRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::HeadObject(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn copy_requests(&self) -> Vec<CopyObjectRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CopyObject(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn create_requests(&self) -> Vec<CreateMultipartUploadRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateMultipartUpload(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    /// Part copies in the order they were received
    pub fn part_requests(&self) -> Vec<UploadPartCopyRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::UploadPartCopy(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn complete_requests(&self) -> Vec<CompleteMultipartUploadRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CompleteMultipartUpload(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    pub fn abort_requests(&self) -> Vec<AbortMultipartUploadRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::AbortMultipartUpload(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn scripted_error(code: &Option<String>) -> Result<(), Error> {
        match code {
            Some(code) => Err(Error::backend(code.clone(), format!("scripted {code}"))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CopyBackend for RecordingBackend {
    async fn head_object(&self, request: HeadObjectRequest) -> Result<HeadObjectResponse, Error> {
        self.record(Call::HeadObject(request));
        let script = self.script.lock().unwrap();
        Self::scripted_error(&script.head_error)?;
        Ok(HeadObjectResponse {
            content_length: script.content_length,
        })
    }

    async fn copy_object(&self, request: CopyObjectRequest) -> Result<CopyObjectResponse, Error> {
        self.record(Call::CopyObject(request));
        Self::scripted_error(&self.script.lock().unwrap().copy_error)?;
        Ok(CopyObjectResponse {
            e_tag: Some("copy-etag".to_owned()),
            ..Default::default()
        })
    }

    async fn create_multipart_upload(
        &self,
        request: CreateMultipartUploadRequest,
    ) -> Result<CreateMultipartUploadResponse, Error> {
        self.record(Call::CreateMultipartUpload(request));
        let script = self.script.lock().unwrap();
        Self::scripted_error(&script.create_error)?;
        Ok(CreateMultipartUploadResponse {
            upload_id: script.upload_id.clone(),
        })
    }

    async fn upload_part_copy(
        &self,
        request: UploadPartCopyRequest,
    ) -> Result<UploadPartCopyResponse, Error> {
        let part_number = request.part_number;
        self.record(Call::UploadPartCopy(request));
        let (delay, error) = {
            let script = self.script.lock().unwrap();
            let delay = if let Some(delay) = script.part_delays.get(&part_number) {
                *delay
            } else if script.reverse_part_completion {
                Duration::from_millis(5 * (100 - part_number.min(100)) as u64)
            } else {
                Duration::ZERO
            };
            (delay, script.part_errors.get(&part_number).cloned())
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.record(Call::UploadPartCopySettled(part_number));
        Self::scripted_error(&error)?;
        Ok(UploadPartCopyResponse {
            e_tag: format!("etag-{part_number}"),
        })
    }

    async fn complete_multipart_upload(
        &self,
        request: CompleteMultipartUploadRequest,
    ) -> Result<CompleteMultipartUploadResponse, Error> {
        self.record(Call::CompleteMultipartUpload(request));
        Self::scripted_error(&self.script.lock().unwrap().complete_error)?;
        Ok(CompleteMultipartUploadResponse {
            e_tag: Some("complete-etag".to_owned()),
            ..Default::default()
        })
    }

    async fn abort_multipart_upload(
        &self,
        request: AbortMultipartUploadRequest,
    ) -> Result<(), Error> {
        self.record(Call::AbortMultipartUpload(request));
        Self::scripted_error(&self.script.lock().unwrap().abort_error)
    }
}

/// Factory handing out a single [`RecordingBackend`] for every region, recording the regions
/// asked for.
#[derive(Debug, Clone)]
pub struct RecordingFactory {
    backend: RecordingBackend,
    regions: Arc<Mutex<Vec<String>>>,
}

impl RecordingFactory {
    pub fn new(backend: RecordingBackend) -> Self {
        Self {
            backend,
            regions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn regions(&self) -> Vec<String> {
        self.regions.lock().unwrap().clone()
    }
}

impl BackendFactory for RecordingFactory {
    fn for_region(&self, region: &str) -> SharedBackend {
        self.regions.lock().unwrap().push(region.to_owned());
        Arc::new(self.backend.clone())
    }
}
