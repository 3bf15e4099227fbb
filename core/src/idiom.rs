//! Caller-side conveniences built on the services.
//!
//! These are not part of the dispatch contract; they encode a choice the
//! caller would otherwise make by hand.

use tracing::info;

use crate::client::Client;
use crate::error::{ApiError, ApiStatus};
use crate::params::Action;
use crate::types::{Account, AddClientRequest, ClientLookup};

const ALREADY_EXISTS: &str = "already exists with that email";

/// Whether a failed `AddClient` means the email is already registered.
///
/// Only the decoded `result` and `message` are consulted, never the HTTP
/// status: installations disagree on the status code and on whether the
/// message says "client" or "user".
pub fn is_already_exists(status: &ApiStatus) -> bool {
    status.result == "error"
        && status
            .message
            .as_deref()
            .is_some_and(|m| m.to_ascii_lowercase().contains(ALREADY_EXISTS))
}

/// Create a client, or return the existing one with the same email.
///
/// Calls `AddClient`; when that succeeds or fails with the "already exists"
/// message, looks the client up by email. Any other remote error is
/// returned as `ApiError::Remote`.
///
/// ```no_run
/// # use whmcs_core::{idiom, AddClientRequest, Client};
/// # fn demo(client: &Client, request: &AddClientRequest) -> Result<(), whmcs_core::ApiError> {
/// let account = idiom::ensure_client(client, request)?;
/// println!("client #{} ready", account.id);
/// # Ok(())
/// # }
/// ```
pub fn ensure_client(client: &Client, request: &AddClientRequest) -> Result<Account, ApiError> {
    let accounts = client.accounts();
    let (created, response) = accounts.add_client(request)?;

    let status = ApiStatus {
        result: created.result,
        message: created.message,
    };
    if !status.is_success() {
        if !is_already_exists(&status) {
            return Err(ApiError::Remote {
                action: Action::AddClient.as_str().to_string(),
                status,
                response: Box::new(response),
            });
        }
        info!(email = %request.email, "client already exists, looking it up");
    }

    let (account, _) = accounts.get_clients_details(&ClientLookup::Email(request.email.clone()))?;
    Ok(account)
}
