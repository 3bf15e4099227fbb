//! The single chokepoint every API call goes through.
//!
//! # Design
//! `build_request` is pure: it merges the credentials and the JSON format
//! flag into the parameters and produces an `HttpRequest`. `send` executes
//! it through the `Transport` and always returns the `Response` once the
//! exchange completed, whatever the status. `request` additionally decodes
//! the body; a decode failure keeps the `Response` inside the error.
//!
//! Status codes and the remote `result` field are left to the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::Auth;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, Response, Transport, FORM_CONTENT_TYPE};
use crate::params::Params;

/// Per-call overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// Give up if the call cannot finish by this instant.
    pub deadline: Option<Instant>,
    /// Timeout for this call only.
    pub timeout: Option<Duration>,
}

impl CallOptions {
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Effective timeout at `now`: the tightest of `configured`, the time
    /// left before the deadline and the per-call timeout. Options can only
    /// shorten a call. `DeadlineExceeded` if no time is left.
    fn effective_timeout(&self, now: Instant, configured: Option<Duration>) -> Result<Option<Duration>, TransportError> {
        let remaining = match self.deadline {
            Some(deadline) if deadline <= now => return Err(TransportError::DeadlineExceeded),
            Some(deadline) => Some(deadline - now),
            None => None,
        };
        Ok([configured, remaining, self.timeout].into_iter().flatten().min())
    }
}

/// Builds, sends and decodes API calls.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    auth: Auth,
    endpoint_url: String,
    /// Upper bound for every call, normally the configured client timeout.
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, auth: Auth, endpoint_url: impl Into<String>) -> Self {
        Self {
            transport,
            auth,
            endpoint_url: endpoint_url.into(),
            timeout: None,
        }
    }

    /// Cap every call at `timeout`. `CallOptions` may shorten it further
    /// but never extend it.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Produce the HTTP request for `params` without sending it.
    pub fn build_request(&self, params: &Params, options: &CallOptions) -> Result<HttpRequest, ApiError> {
        let timeout = options.effective_timeout(Instant::now(), self.timeout)?;
        Ok(HttpRequest {
            url: self.endpoint_url.clone(),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: params.encode(&self.auth)?,
            timeout,
        })
    }

    /// Execute the call and return the raw response.
    pub fn send(&self, params: Params) -> Result<Response, ApiError> {
        self.send_with(params, &CallOptions::default())
    }

    pub fn send_with(&self, params: Params, options: &CallOptions) -> Result<Response, ApiError> {
        let request = self.build_request(&params, options)?;
        let response = self.transport.execute(&request).map_err(|e| {
            debug!(action = params.action(), error = %e, "transport failure");
            ApiError::Transport(e)
        })?;
        debug!(
            action = params.action(),
            url = %request.url,
            status = response.status_code,
            bytes = response.body.len(),
            "api call completed"
        );
        Ok(response)
    }

    /// Execute the call and decode the body into `T`.
    pub fn request<T: DeserializeOwned>(&self, params: Params) -> Result<(T, Response), ApiError> {
        self.request_with(params, &CallOptions::default())
    }

    pub fn request_with<T: DeserializeOwned>(
        &self,
        params: Params,
        options: &CallOptions,
    ) -> Result<(T, Response), ApiError> {
        let action = params.action().to_string();
        let response = self.send_with(params, options)?;
        let decoded = decode(&action, response)?;
        Ok(decoded)
    }
}

/// Decode a response body, keeping the response on failure.
pub(crate) fn decode<T: DeserializeOwned>(action: &str, response: Response) -> Result<(T, Response), ApiError> {
    match serde_json::from_str(&response.body) {
        Ok(value) => Ok((value, response)),
        Err(e) => {
            warn!(action, status = response.status_code, error = %e, "could not decode response body");
            Err(ApiError::Decode {
                action: action.to_string(),
                message: e.to_string(),
                response: Box::new(response),
            })
        }
    }
}
