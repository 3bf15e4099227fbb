//! Resource services: one borrowed handle per action family.

mod accounts;
mod billing;
mod orders;
mod products;

pub use accounts::Accounts;
pub use billing::Billing;
pub use orders::Orders;
pub use products::Products;

use crate::error::{ApiError, ApiStatus};
use crate::http::Response;
use crate::params::Action;

/// Turn a decoded non-success `result` into `ApiError::Remote`.
fn require_success(action: Action, status: ApiStatus, response: Response) -> Result<(ApiStatus, Response), ApiError> {
    if status.is_success() {
        return Ok((status, response));
    }
    Err(ApiError::Remote {
        action: action.as_str().to_string(),
        status,
        response: Box::new(response),
    })
}
