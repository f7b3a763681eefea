#![allow(dead_code)]

use controller::domain::lifecycle::models::error::{GraphQlErrorEntry, TransportError};
use controller::domain::lifecycle::models::request::GraphQlRequest;
use controller::domain::lifecycle::ports::GraphQlTransport;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type Reply = Result<Value, TransportError>;

/// In-memory transport answering each request with the next scripted reply
/// and recording what was sent.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<GraphQlRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, data: Value) -> Self {
        self.replies.lock().unwrap().push_back(Ok(data));
        self
    }

    pub fn fail(self, error: TransportError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn push_reply(&self, data: Value) {
        self.replies.lock().unwrap().push_back(Ok(data));
    }

    pub fn requests(&self) -> Vec<GraphQlRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.requests()
            .iter()
            .map(|request| request.operation_name)
            .collect()
    }
}

impl GraphQlTransport for ScriptedTransport {
    async fn execute(&self, request: &GraphQlRequest) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no reply scripted for {}", request.operation_name))
    }
}

pub fn graphql_error(message: &str) -> TransportError {
    TransportError::GraphQl(vec![GraphQlErrorEntry::new(message)])
}

pub fn unavailable() -> TransportError {
    TransportError::Status {
        status: 503,
        body: "service unavailable".to_string(),
    }
}
