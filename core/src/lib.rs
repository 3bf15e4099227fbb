//! Synchronous client for a WHMCS-style billing API.
//!
//! # Overview
//! Every call is a form-encoded POST to `{base_url}/includes/api.php` with
//! the action name, `responsetype=json` and the three credentials. The
//! JSON answer is decoded into a typed record and returned together with
//! the raw `Response`.
//!
//! # Design
//! - `Dispatcher` is the single path to the network. It never treats a
//!   status code or a remote `result` as an error by itself.
//! - `Transport` is the I/O seam. `UreqTransport` is the default; tests use
//!   in-memory fakes.
//! - Resource services (`accounts`, `products`, `orders`, `billing`) take
//!   typed requests that validate before anything is sent.
//! - `Client` is immutable after construction and safe to share.

pub mod auth;
pub mod client;
pub mod config;
mod de;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod idiom;
pub mod matching;
pub mod params;
pub mod services;
pub mod types;

#[cfg(test)]
mod testing;

pub use auth::Auth;
pub use client::Client;
pub use config::{ClientConfig, ConfigError};
pub use dispatch::{CallOptions, Dispatcher};
pub use error::{ApiError, ApiStatus, TransportError};
pub use http::{HttpRequest, Response, Transport, UreqTransport};
pub use params::{Action, ApiRequest, Params};
pub use types::*;
