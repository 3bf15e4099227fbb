//! HTTP transport types.
//!
//! # Design
//! Requests and responses are plain data. The dispatcher builds an
//! `HttpRequest`, hands it to a `Transport`, and gets a `Response` back.
//! `Transport` is the only place network I/O happens, so tests swap in a
//! fake and the rest of the crate stays deterministic.
//!
//! Non-2xx statuses are returned as `Ok(Response)`; only failures of the
//! exchange itself are `Err`.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::error::TransportError;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Largest response body read into memory. ureq's own default is 10 MB,
/// which full client or invoice listings can exceed.
pub const MAX_BODY_BYTES: u64 = 1 << 30;

/// A form-encoded POST described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    /// Per-request timeout. Overrides the transport's global timeout.
    pub timeout: Option<Duration>,
}

/// Outcome of one completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_code: u16,
    /// Status line text, e.g. `200 OK`.
    pub status: String,
    pub body: String,
}

impl Response {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            status: status_text(status_code),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Decode the raw body by hand, for callers that need a shape the
    /// service method did not ask for.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Compose `"{code} {reason}"`, or just the code when the reason is unknown.
pub fn status_text(status_code: u16) -> String {
    let reason = ureq::http::StatusCode::from_u16(status_code)
        .ok()
        .and_then(|s| s.canonical_reason());
    match reason {
        Some(reason) => format!("{status_code} {reason}"),
        None => status_code.to_string(),
    }
}

/// Executes one HTTP exchange.
///
/// Implementations must be safe to share across threads: a `Client` hands
/// the same transport to every call.
pub trait Transport: Send + Sync + fmt::Debug {
    fn execute(&self, request: &HttpRequest) -> Result<Response, TransportError>;
}

/// Blocking transport backed by a shared `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<Response, TransportError> {
        let mut builder = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(timeout) = request.timeout {
            builder = builder.config().timeout_global(Some(timeout)).build();
        }

        let mut response = builder.send(request.body.as_bytes()).map_err(map_ureq_error)?;

        let status_code = response.status().as_u16();
        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(map_ureq_error)?;

        // Once the exchange completed the response is data: bad bytes surface
        // later as a decode error that still carries it.
        Ok(Response::new(status_code, String::from_utf8_lossy(&bytes).into_owned()))
    }
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        other => TransportError::Io(other.to_string()),
    }
}
