//! Cancellable multipart uploads.
//!
//! Uploads are not idempotent, so there is no retry loop and no automatic
//! deadline; the returned handle's `cancel` is the only way to stop a stuck
//! transfer. Progress is observable through a watch channel, updated once
//! per chunk handed to the transport.

use std::collections::HashMap;
use std::time::Instant;

use futures_util::future::Aborted;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::{resolve_url, ApiClient};
use crate::error::{ApiError, ApiResult};
use crate::http::request::{new_request_id, HEADER_REQUEST_ID};
use crate::http::response::{decode_response, ResponseData};
use crate::observability::metrics;
use crate::resilience::timeouts::{cancellable, CancelHandle};

/// Progress of an in-flight upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    /// Bytes handed to the transport so far.
    pub sent: u64,
    /// Total upload size in bytes.
    pub total: u64,
}

impl UploadProgress {
    /// Progress as a whole percentage. Empty uploads report 100.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.sent * 100) / self.total).min(100) as u8
    }
}

/// Handle to an in-flight upload.
pub struct UploadHandle {
    cancel: CancelHandle,
    progress: watch::Receiver<UploadProgress>,
    task: JoinHandle<ApiResult<ResponseData>>,
}

impl UploadHandle {
    /// Abort the upload. [`UploadHandle::wait`] then returns
    /// [`ApiError::Cancelled`]. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Watch the upload progress.
    pub fn progress(&self) -> watch::Receiver<UploadProgress> {
        self.progress.clone()
    }

    /// Await the upload result.
    pub async fn wait(self) -> ApiResult<ResponseData> {
        match self.task.await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Cancelled),
        }
    }
}

impl ApiClient {
    /// Upload a file as `multipart/form-data`.
    ///
    /// `fields` become additional text parts of the form. The bearer token
    /// is attached the same way as for ordinary requests.
    pub fn upload(
        &self,
        endpoint: &str,
        file_name: &str,
        data: Vec<u8>,
        fields: HashMap<String, String>,
    ) -> ApiResult<UploadHandle> {
        let url = resolve_url(&self.config().base_url, endpoint)?;
        let total = data.len() as u64;
        let chunk_bytes = self.config().upload.chunk_bytes.max(1);

        let (progress_tx, progress_rx) = watch::channel(UploadProgress { sent: 0, total });

        let chunks: Vec<Vec<u8>> = data.chunks(chunk_bytes).map(|c| c.to_vec()).collect();
        let mut sent = 0u64;
        let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            let _ = progress_tx.send(UploadProgress { sent, total });
            Ok::<_, std::io::Error>(chunk)
        }));

        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(file_name.to_string());
        let mut form = Form::new().part("file", part);
        for (name, value) in fields {
            form = form.text(name, value);
        }

        let request_id = new_request_id();
        let mut request = self
            .http()
            .post(&url)
            .header(HEADER_REQUEST_ID, request_id.as_str())
            .multipart(form);
        if let Some(token) = self.token_store().get() {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let client = self.clone();
        let (fut, cancel) = cancellable(async move {
            tracing::debug!(
                request_id = %request_id,
                url = %url,
                total_bytes = total,
                "Starting upload"
            );
            let start = Instant::now();

            let response = request.send().await?;
            let status = response.status();
            metrics::record_request("POST", status.as_u16(), start);

            if status.is_success() {
                return decode_response(response).await;
            }

            let payload = response.json().await.ok();
            let err = ApiError::from_status(status.as_u16(), payload);
            client.publish_auth_failure(&err);
            Err(err)
        });

        let task = tokio::spawn(async move {
            match fut.await {
                Ok(result) => result,
                Err(Aborted) => Err(ApiError::Cancelled),
            }
        });

        Ok(UploadHandle {
            cancel,
            progress: progress_rx,
            task,
        })
    }
}
