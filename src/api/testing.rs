//! Scripted transport that replays queued responses and records requests.
//!
//! A response can be held back behind a gate so tests control the order in
//! which concurrent requests resolve.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::api::errors::{ApiError, ApiResult};
use crate::api::{ApiRequest, ApiResponse, ApiTransport};

struct Scripted {
    result: ApiResult<ApiResponse>,
    gate: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a JSON response with the given status.
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.push(Ok(ApiResponse::new(status, body)), None);
        self
    }

    /// Queues a transport failure.
    pub fn fail(&self, error: ApiError) -> &Self {
        self.push(Err(error), None);
        self
    }

    /// Queues a response that is only released once the returned sender
    /// fires (or is dropped).
    pub fn respond_gated(&self, status: u16, body: Value) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Ok(ApiResponse::new(status, body)), Some(rx));
        tx
    }

    fn push(&self, result: ApiResult<ApiResponse>, gate: Option<oneshot::Receiver<()>>) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted { result, gate });
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        let Some(Scripted { result, gate }) = next else {
            panic!("unexpected request: {} {}", request.method, request.path);
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }
}
