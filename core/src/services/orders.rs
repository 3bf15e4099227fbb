//! Orders: placing, accepting, cancelling and listing them by status.

use std::borrow::Cow;

use super::require_success;
use crate::client::Client;
use crate::error::{ApiError, ApiStatus};
use crate::http::Response;
use crate::params::{Action, Params};
use crate::types::{
    AcceptOrderRequest, AddOrderRequest, CancelOrderRequest, GetOrdersRequest, Order, OrderList, OrderStatuses,
};

/// Order actions.
#[derive(Debug, Clone, Copy)]
pub struct Orders<'a> {
    client: &'a Client,
}

impl<'a> Orders<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `AddOrder`. Uses the client's default payment method when the
    /// request has none.
    pub fn add_order(&self, request: &AddOrderRequest) -> Result<(Order, Response), ApiError> {
        let request = self.with_default_payment_method(request);
        self.client.call(&*request)
    }

    /// `AcceptOrder`.
    ///
    /// HTTP success is not enough: unless the decoded `result` is
    /// `success` this returns `ApiError::Remote`, which still carries the
    /// decoded record and the response.
    pub fn accept_order(&self, request: &AcceptOrderRequest) -> Result<(ApiStatus, Response), ApiError> {
        let (status, response) = self.client.call(request)?;
        require_success(Action::AcceptOrder, status, response)
    }

    pub fn get_orders(&self, request: &GetOrdersRequest) -> Result<(OrderList, Response), ApiError> {
        self.client.call(request)
    }

    pub fn get_order_statuses(&self) -> Result<(OrderStatuses, Response), ApiError> {
        self.client.call_params(Params::new(Action::GetOrderStatuses))
    }

    /// `CancelOrder`. The decoded `result` is returned as-is.
    pub fn cancel_order(&self, request: &CancelOrderRequest) -> Result<(ApiStatus, Response), ApiError> {
        self.client.call(request)
    }

    fn with_default_payment_method<'r>(&self, request: &'r AddOrderRequest) -> Cow<'r, AddOrderRequest> {
        match (&request.paymentmethod, self.client.default_payment_method()) {
            (None, Some(default)) => Cow::Owned(AddOrderRequest {
                paymentmethod: Some(default.to_string()),
                ..request.clone()
            }),
            _ => Cow::Borrowed(request),
        }
    }
}
