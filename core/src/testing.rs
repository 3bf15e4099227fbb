//! Scripted transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::error::TransportError;
use crate::http::{HttpRequest, Response, Transport};

/// Replays queued outcomes in order and records every request.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<Response, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_json(&self, status: u16, body: &str) {
        self.outcomes.lock().unwrap().push_back(Ok(Response::new(status, body)));
    }

    pub fn push_error(&self, err: TransportError) {
        self.outcomes.lock().unwrap().push_back(Err(err));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Decoded form fields of the `index`th request.
    pub fn form(&self, index: usize) -> HashMap<String, String> {
        let requests = self.requests.lock().unwrap();
        serde_urlencoded::from_str(&requests[index].body).unwrap()
    }

    pub fn actions(&self) -> Vec<String> {
        (0..self.request_count())
            .map(|i| self.form(i).remove("action").unwrap_or_default())
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<Response, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Io("no scripted response left".to_string())))
    }
}
