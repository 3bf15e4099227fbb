//! Error types for the billing API client.
//!
//! # Design
//! The variants follow what is left to inspect after a failure. A
//! `Transport` error means no HTTP exchange completed, so there is no
//! `Response`. `Decode` and `Remote` both happened after a complete
//! exchange and keep the `Response` so the caller can still branch on the
//! status code or parse the raw body by hand. Non-2xx statuses are not
//! errors at this layer.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::http::Response;

/// Failures of the underlying HTTP exchange. No response is available.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The caller's deadline had already passed when the call was issued.
    #[error("deadline exceeded before the request was sent")]
    DeadlineExceeded,

    /// Connection, DNS, TLS or I/O failure.
    #[error("transport failure: {0}")]
    Io(String),
}

/// The `result` / `message` pair every remote action answers with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiStatus {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }

    fn describe(&self) -> String {
        match &self.message {
            Some(message) => format!("result `{}`: {message}", self.result),
            None => format!("result `{}`", self.result),
        }
    }
}

/// Errors returned by the dispatcher and the resource services.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP exchange itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body could not be decoded into the expected shape.
    #[error("failed to decode {action} response: {message}")]
    Decode {
        action: String,
        message: String,
        response: Box<Response>,
    },

    /// The exchange succeeded but the remote reported a logical failure.
    #[error("{action} did not succeed ({})", .status.describe())]
    Remote {
        action: String,
        status: ApiStatus,
        response: Box<Response>,
    },

    /// A typed request was rejected locally. Nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request parameters could not be form-encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// The response that came back before the failure, if one did.
    pub fn response(&self) -> Option<&Response> {
        match self {
            ApiError::Decode { response, .. } | ApiError::Remote { response, .. } => Some(response),
            _ => None,
        }
    }

    /// The decoded remote status for `Remote` failures.
    pub fn remote_status(&self) -> Option<&ApiStatus> {
        match self {
            ApiError::Remote { status, .. } => Some(status),
            _ => None,
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest(message.into())
    }
}
