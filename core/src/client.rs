//! The client handle and its resource services.
//!
//! # Design
//! `Client` owns the configuration and a `Dispatcher`, which in turn owns a
//! shared `Transport`. Nothing in it is mutated after construction, so one
//! `Client` can be cloned or shared across threads and calls stay
//! independent. Resource services are borrowed views (`client.orders()`)
//! that only assemble typed requests and pick the result shape.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::dispatch::{CallOptions, Dispatcher};
use crate::error::ApiError;
use crate::http::{Response, Transport, UreqTransport};
use crate::params::{ApiRequest, Params};
use crate::services::{Accounts, Billing, Orders, Products};

/// Synchronous client for the billing API.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    dispatcher: Dispatcher,
    options: CallOptions,
}

impl Client {
    /// Build a client backed by the default blocking HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the configuration does not validate.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = Arc::new(UreqTransport::new(config.timeout()));
        Self::with_transport(config, transport)
    }

    /// Build a client on top of any transport.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the configuration does not validate.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self, ApiError> {
        config.validate()?;
        let dispatcher =
            Dispatcher::new(transport, config.auth.clone(), config.endpoint_url()).with_timeout(config.timeout());
        Ok(Self {
            config,
            dispatcher,
            options: CallOptions::default(),
        })
    }

    /// A copy of this client whose calls all use `options`.
    ///
    /// ```no_run
    /// # use std::time::{Duration, Instant};
    /// # use whmcs_core::{Client, CallOptions, GetClientsRequest};
    /// # fn demo(client: &Client) -> Result<(), whmcs_core::ApiError> {
    /// let deadline = Instant::now() + Duration::from_secs(5);
    /// let scoped = client.with_options(CallOptions::default().with_deadline(deadline));
    /// let (clients, _) = scoped.accounts().get_clients(&GetClientsRequest::default())?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn with_options(&self, options: CallOptions) -> Self {
        Self {
            options,
            ..self.clone()
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn default_payment_method(&self) -> Option<&str> {
        self.config.payment_method.as_deref()
    }

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    pub fn products(&self) -> Products<'_> {
        Products::new(self)
    }

    pub fn orders(&self) -> Orders<'_> {
        Orders::new(self)
    }

    pub fn billing(&self) -> Billing<'_> {
        Billing::new(self)
    }

    /// Validate, flatten, send and decode a typed request.
    pub(crate) fn call<T: DeserializeOwned>(&self, request: &impl ApiRequest) -> Result<(T, Response), ApiError> {
        let params = request.to_params()?;
        self.call_params(params)
    }

    pub(crate) fn call_params<T: DeserializeOwned>(&self, params: Params) -> Result<(T, Response), ApiError> {
        self.dispatcher.request_with(params, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::auth::Auth;
    use crate::error::TransportError;
    use crate::testing::ScriptedTransport;
    use crate::types::GetClientsRequest;

    fn config() -> ClientConfig {
        ClientConfig::new("http://localhost:3000/", Auth::new("ident", "secret", "access"))
    }

    #[test]
    fn rejects_invalid_config() {
        let err = Client::with_transport(ClientConfig::new("nope", Auth::new("", "", "")), ScriptedTransport::new())
            .unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn dispatcher_points_at_api_entry() {
        let client = Client::with_transport(config(), ScriptedTransport::new()).unwrap();
        assert_eq!(client.dispatcher().endpoint_url(), "http://localhost:3000/includes/api.php");
    }

    #[test]
    fn invalid_request_is_rejected_before_io() {
        let transport = ScriptedTransport::new();
        let client = Client::with_transport(config(), transport.clone()).unwrap();
        let req = GetClientsRequest {
            limitnum: 0,
            ..Default::default()
        };
        let err = client.accounts().get_clients(&req).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn with_options_applies_to_service_calls() {
        let transport = ScriptedTransport::new();
        let client = Client::with_transport(config(), transport.clone()).unwrap();
        let expired = client.with_options(CallOptions::default().with_deadline(Instant::now() - Duration::from_millis(1)));
        let err = expired.accounts().get_clients(&GetClientsRequest::default()).unwrap_err();
        assert!(matches!(err, ApiError::Transport(TransportError::DeadlineExceeded)));
        assert_eq!(transport.request_count(), 0);

        transport.push_json(200, r#"{"result":"success","totalresults":0}"#);
        let (list, _) = client.accounts().get_clients(&GetClientsRequest::default()).unwrap();
        assert_eq!(list.totalresults, 0);
    }

    #[test]
    fn client_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}
