//! Order records and requests.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::error::ApiError;
use crate::params::{require_non_empty, require_positive, Action, ApiRequest, Params};

/// Result of `AddOrder`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub result: String,
    #[serde(default, deserialize_with = "de::int")]
    pub orderid: i64,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub invoiceid: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub productids: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub serviceids: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub clientid: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub pid: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub billingcycle: Option<String>,
    #[serde(default)]
    pub paymentmethod: Option<String>,
}

impl Order {
    /// Service ids created by the order, parsed from the comma list.
    pub fn service_ids(&self) -> Vec<i64> {
        self.serviceids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect()
    }
}

/// One row of `GetOrders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    #[serde(default, deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub ordernum: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub userid: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub amount: Option<String>,
    #[serde(default)]
    pub paymentmethod: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub invoiceid: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItems {
    #[serde(default, deserialize_with = "de::list_or_empty")]
    pub order: Vec<OrderSummary>,
}

/// Result of `GetOrders`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderList {
    #[serde(default)]
    pub result: String,
    #[serde(default, deserialize_with = "de::int")]
    pub totalresults: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub startnumber: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub numreturned: i64,
    #[serde(default)]
    pub orders: OrderItems,
}

impl OrderList {
    pub fn orders(&self) -> &[OrderSummary] {
        &self.orders.order
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatus {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "de::int")]
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusItems {
    #[serde(default, deserialize_with = "de::list_or_empty")]
    pub status: Vec<OrderStatus>,
}

/// Result of `GetOrderStatuses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatuses {
    #[serde(default)]
    pub result: String,
    #[serde(default, deserialize_with = "de::int")]
    pub totalresults: i64,
    #[serde(default)]
    pub statuses: OrderStatusItems,
}

impl OrderStatuses {
    pub fn statuses(&self) -> &[OrderStatus] {
        &self.statuses.status
    }

    pub fn count_of(&self, title: &str) -> Option<i64> {
        self.statuses().iter().find(|s| s.title == title).map(|s| s.count)
    }
}

/// Parameters for `AddOrder`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOrderRequest {
    pub clientid: i64,
    /// Falls back to the client's configured default when `None`.
    pub paymentmethod: Option<String>,
    pub pids: Vec<i64>,
    pub billingcycle: Option<String>,
    pub domain: Option<String>,
    pub promocode: Option<String>,
    pub noinvoice: Option<bool>,
    pub noemail: Option<bool>,
}

impl AddOrderRequest {
    pub fn new(clientid: i64, pids: Vec<i64>) -> Self {
        Self {
            clientid,
            pids,
            ..Default::default()
        }
    }
}

impl ApiRequest for AddOrderRequest {
    fn action(&self) -> Action {
        Action::AddOrder
    }

    fn validate(&self) -> Result<(), ApiError> {
        require_positive("clientid", self.clientid)?;
        if self.pids.is_empty() {
            return Err(ApiError::invalid("an order needs at least one product id"));
        }
        for pid in &self.pids {
            require_positive("pid", *pid)?;
        }
        match &self.paymentmethod {
            Some(method) => require_non_empty("paymentmethod", method),
            None => Err(ApiError::invalid("paymentmethod is required")),
        }
    }

    fn write_params(&self, params: &mut Params) {
        params.insert("clientid", self.clientid);
        params.insert_opt("paymentmethod", self.paymentmethod.as_ref());
        let pids: Vec<String> = self.pids.iter().map(i64::to_string).collect();
        params.insert("pid", pids.join(","));
        params.insert_opt("billingcycle", self.billingcycle.as_ref());
        params.insert_opt("domain", self.domain.as_ref());
        params.insert_opt("promocode", self.promocode.as_ref());
        params.insert_flag("noinvoice", self.noinvoice);
        params.insert_flag("noemail", self.noemail);
    }
}

/// Parameters for `AcceptOrder`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptOrderRequest {
    pub orderid: i64,
    pub autosetup: Option<bool>,
    pub sendemail: Option<bool>,
}

impl AcceptOrderRequest {
    pub fn new(orderid: i64) -> Self {
        Self {
            orderid,
            ..Default::default()
        }
    }
}

impl ApiRequest for AcceptOrderRequest {
    fn action(&self) -> Action {
        Action::AcceptOrder
    }

    fn validate(&self) -> Result<(), ApiError> {
        require_positive("orderid", self.orderid)
    }

    fn write_params(&self, params: &mut Params) {
        params.insert("orderid", self.orderid);
        params.insert_flag("autosetup", self.autosetup);
        params.insert_flag("sendemail", self.sendemail);
    }
}

/// Parameters for `GetOrders`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetOrdersRequest {
    pub id: Option<i64>,
    pub userid: Option<i64>,
    pub status: Option<String>,
    pub limitstart: u32,
    pub limitnum: u32,
}

impl Default for GetOrdersRequest {
    fn default() -> Self {
        Self {
            id: None,
            userid: None,
            status: None,
            limitstart: 0,
            limitnum: 25,
        }
    }
}

impl ApiRequest for GetOrdersRequest {
    fn action(&self) -> Action {
        Action::GetOrders
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.limitnum == 0 {
            return Err(ApiError::invalid("limitnum must be at least 1"));
        }
        Ok(())
    }

    fn write_params(&self, params: &mut Params) {
        params.insert_opt("id", self.id);
        params.insert_opt("userid", self.userid);
        params.insert_opt("status", self.status.as_ref());
        params.insert("limitstart", self.limitstart);
        params.insert("limitnum", self.limitnum);
    }
}

/// Parameters for `CancelOrder`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelOrderRequest {
    pub orderid: i64,
    /// Also cancel the associated subscription at the gateway.
    pub cancelsub: Option<bool>,
    pub noemail: Option<bool>,
}

impl ApiRequest for CancelOrderRequest {
    fn action(&self) -> Action {
        Action::CancelOrder
    }

    fn validate(&self) -> Result<(), ApiError> {
        require_positive("orderid", self.orderid)
    }

    fn write_params(&self, params: &mut Params) {
        params.insert("orderid", self.orderid);
        params.insert_flag("cancelsub", self.cancelsub);
        params.insert_flag("noemail", self.noemail);
    }
}
