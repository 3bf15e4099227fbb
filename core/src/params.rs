//! Request parameters and the remote action names.
//!
//! # Design
//! The wire format is a flat string map, so that is what `Params` holds.
//! Callers normally never touch it: every service method takes a typed
//! request implementing `ApiRequest`, which validates itself and then
//! flattens into `Params`. The reserved keys (action, response type and the
//! credentials) are merged in by `encode` and always win over caller keys.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::warn;

use crate::auth::{Auth, ACCESS_KEY_KEY, IDENTIFIER_KEY, SECRET_KEY};
use crate::error::ApiError;

pub const ACTION_KEY: &str = "action";
pub const RESPONSE_TYPE_KEY: &str = "responsetype";
pub const RESPONSE_TYPE_JSON: &str = "json";

/// Keys the dispatcher always sets itself.
pub const RESERVED_KEYS: [&str; 5] = [
    ACTION_KEY,
    RESPONSE_TYPE_KEY,
    IDENTIFIER_KEY,
    SECRET_KEY,
    ACCESS_KEY_KEY,
];

/// Remote actions this crate has typed support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    AddClient,
    GetClients,
    GetClientsDetails,
    GetClientsProducts,
    DeleteClient,
    AddProduct,
    GetProducts,
    AddOrder,
    AcceptOrder,
    GetOrders,
    GetOrderStatuses,
    CancelOrder,
    CreateInvoice,
    GetInvoices,
    GetInvoice,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::AddClient => "AddClient",
            Action::GetClients => "GetClients",
            Action::GetClientsDetails => "GetClientsDetails",
            Action::GetClientsProducts => "GetClientsProducts",
            Action::DeleteClient => "DeleteClient",
            Action::AddProduct => "AddProduct",
            Action::GetProducts => "GetProducts",
            Action::AddOrder => "AddOrder",
            Action::AcceptOrder => "AcceptOrder",
            Action::GetOrders => "GetOrders",
            Action::GetOrderStatuses => "GetOrderStatuses",
            Action::CancelOrder => "CancelOrder",
            Action::CreateInvoice => "CreateInvoice",
            Action::GetInvoices => "GetInvoices",
            Action::GetInvoice => "GetInvoice",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for one call: the action name plus caller fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    action: String,
    fields: BTreeMap<String, String>,
}

impl Params {
    pub fn new(action: Action) -> Self {
        Self::custom(action.as_str())
    }

    /// Parameters for an action without typed support.
    pub fn custom(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn from_map(action: Action, map: HashMap<String, String>) -> Self {
        Self {
            action: action.as_str().to_string(),
            fields: map.into_iter().collect(),
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.fields.insert(key.into(), value.to_string());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert only when `value` is present.
    pub fn insert_opt<V: ToString>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Boolean flags travel as `true` / `false`.
    pub fn insert_flag(&mut self, key: &str, value: Option<bool>) {
        self.insert_opt(key, value);
    }

    /// The full field set sent on the wire, reserved keys included.
    pub fn merged(&self, auth: &Auth) -> BTreeMap<String, String> {
        let mut merged = self.fields.clone();
        for key in RESERVED_KEYS {
            if merged.contains_key(key) {
                warn!(action = %self.action, key, "caller supplied a reserved parameter, overriding");
            }
        }
        merged.insert(ACTION_KEY.to_string(), self.action.clone());
        merged.insert(RESPONSE_TYPE_KEY.to_string(), RESPONSE_TYPE_JSON.to_string());
        for (key, value) in auth.fields() {
            merged.insert(key.to_string(), value.to_string());
        }
        merged
    }

    /// Form-urlencode the merged field set.
    pub fn encode(&self, auth: &Auth) -> Result<String, ApiError> {
        serde_urlencoded::to_string(self.merged(auth)).map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// A typed request for one remote action.
///
/// `to_params` validates before flattening, so a request that fails
/// `validate` never reaches the network.
pub trait ApiRequest {
    fn action(&self) -> Action;

    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    fn write_params(&self, params: &mut Params);

    fn to_params(&self) -> Result<Params, ApiError> {
        self.validate()?;
        let mut params = Params::new(self.action());
        self.write_params(&mut params);
        Ok(params)
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}

pub(crate) fn require_positive(field: &str, value: i64) -> Result<(), ApiError> {
    if value <= 0 {
        return Err(ApiError::invalid(format!("{field} must be a positive id, got {value}")));
    }
    Ok(())
}
