//! Invoice records and requests.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::de;
use crate::error::ApiError;
use crate::params::{require_non_empty, require_positive, Action, ApiRequest, Params};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Invoice status as the remote names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Draft,
    Unpaid,
    Paid,
    Cancelled,
    Refunded,
    Collections,
    PaymentPending,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Unpaid => "Unpaid",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Cancelled => "Cancelled",
            InvoiceStatus::Refunded => "Refunded",
            InvoiceStatus::Collections => "Collections",
            InvoiceStatus::PaymentPending => "Payment Pending",
        }
    }
}

/// One line on a new invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceLineItem {
    /// Line number. Defaults to the item's position, starting at 1.
    pub order: Option<u32>,
    pub description: String,
    pub amount: Decimal,
    pub taxed: bool,
}

/// Parameters for `CreateInvoice`, minus the client id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateInvoiceRequest {
    pub status: InvoiceStatus,
    pub send_invoice: bool,
    pub date: Option<NaiveDate>,
    pub due_date: NaiveDate,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub line_items: Vec<InvoiceLineItem>,
}

impl CreateInvoiceRequest {
    pub fn new(status: InvoiceStatus, due_date: NaiveDate) -> Self {
        Self {
            status,
            send_invoice: false,
            date: None,
            due_date,
            payment_method: None,
            notes: None,
            line_items: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_item(mut self, description: impl Into<String>, amount: Decimal, taxed: bool) -> Self {
        self.line_items.push(InvoiceLineItem {
            order: None,
            description: description.into(),
            amount,
            taxed,
        });
        self
    }

    fn numbered_items(&self) -> impl Iterator<Item = (u32, &InvoiceLineItem)> {
        self.line_items
            .iter()
            .zip(1u32..)
            .map(|(item, position)| (item.order.unwrap_or(position), item))
    }
}

/// `CreateInvoice` call: the request bound to a client.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CreateInvoiceCall<'a> {
    pub userid: i64,
    pub request: &'a CreateInvoiceRequest,
}

impl ApiRequest for CreateInvoiceCall<'_> {
    fn action(&self) -> Action {
        Action::CreateInvoice
    }

    fn validate(&self) -> Result<(), ApiError> {
        require_positive("userid", self.userid)?;
        let mut seen = HashSet::new();
        for (n, item) in self.request.numbered_items() {
            if n == 0 {
                return Err(ApiError::invalid("line item numbers start at 1"));
            }
            if !seen.insert(n) {
                return Err(ApiError::invalid(format!("duplicate line item number {n}")));
            }
            require_non_empty(&format!("itemdescription{n}"), &item.description)?;
        }
        Ok(())
    }

    fn write_params(&self, params: &mut Params) {
        let request = self.request;
        params.insert("userid", self.userid);
        params.insert("status", request.status.as_str());
        params.insert("sendinvoice", request.send_invoice);
        params.insert_opt("date", request.date.map(|d| d.format(DATE_FORMAT)));
        params.insert("duedate", request.due_date.format(DATE_FORMAT));
        params.insert_opt("paymentmethod", request.payment_method.as_ref());
        params.insert_opt("notes", request.notes.as_ref());
        for (n, item) in request.numbered_items() {
            params.insert(format!("itemdescription{n}"), &item.description);
            params.insert(format!("itemamount{n}"), item.amount);
            params.insert(format!("itemtaxed{n}"), item.taxed);
        }
    }
}

/// Result of `CreateInvoice`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceResponse {
    #[serde(default)]
    pub result: String,
    #[serde(default, deserialize_with = "de::int")]
    pub invoiceid: i64,
    #[serde(default)]
    pub status: String,
}

/// One row of `GetInvoices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    #[serde(default, deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub userid: Option<i64>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub companyname: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub invoicenum: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub duedate: Option<String>,
    #[serde(default)]
    pub datepaid: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub subtotal: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub credit: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub tax: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub total: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub paymentmethod: Option<String>,
}

impl InvoiceSummary {
    pub fn subtotal_amount(&self) -> Option<Decimal> {
        parse_amount(self.subtotal.as_deref())
    }

    pub fn total_amount(&self) -> Option<Decimal> {
        parse_amount(self.total.as_deref())
    }
}

fn parse_amount(raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(|s| s.trim().parse().ok())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItems {
    #[serde(default, deserialize_with = "de::list_or_empty")]
    pub invoice: Vec<InvoiceSummary>,
}

/// Result of `GetInvoices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceList {
    #[serde(default)]
    pub result: String,
    #[serde(default, deserialize_with = "de::int")]
    pub totalresults: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub startnumber: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub numreturned: i64,
    #[serde(default)]
    pub invoices: InvoiceItems,
}

impl InvoiceList {
    pub fn invoices(&self) -> &[InvoiceSummary] {
        &self.invoices.invoice
    }
}

/// One line of an existing invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(default, deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub relid: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub taxed: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLines {
    #[serde(default, deserialize_with = "de::list_or_empty")]
    pub item: Vec<InvoiceItem>,
}

/// Result of `GetInvoice`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default)]
    pub result: String,
    #[serde(default, deserialize_with = "de::int")]
    pub invoiceid: i64,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub invoicenum: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub userid: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub duedate: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub subtotal: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub total: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub paymentmethod: Option<String>,
    #[serde(default)]
    pub items: InvoiceLines,
}

impl Invoice {
    pub fn items(&self) -> &[InvoiceItem] {
        &self.items.item
    }
}

/// Parameters for `GetInvoices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetInvoicesRequest {
    pub userid: Option<i64>,
    pub status: Option<InvoiceStatus>,
    pub limitstart: u32,
    pub limitnum: u32,
    /// Column to sort by, e.g. `id`, `duedate`, `total`.
    pub orderby: Option<String>,
    /// `asc` or `desc`.
    pub order: Option<String>,
}

impl Default for GetInvoicesRequest {
    fn default() -> Self {
        Self {
            userid: None,
            status: None,
            limitstart: 0,
            limitnum: 25,
            orderby: None,
            order: None,
        }
    }
}

impl ApiRequest for GetInvoicesRequest {
    fn action(&self) -> Action {
        Action::GetInvoices
    }

    fn validate(&self) -> Result<(), ApiError> {
        if let Some(userid) = self.userid {
            require_positive("userid", userid)?;
        }
        if self.limitnum == 0 {
            return Err(ApiError::invalid("limitnum must be at least 1"));
        }
        match self.order.as_deref() {
            None | Some("asc") | Some("desc") => Ok(()),
            Some(other) => Err(ApiError::invalid(format!("order must be asc or desc, got `{other}`"))),
        }
    }

    fn write_params(&self, params: &mut Params) {
        params.insert_opt("userid", self.userid);
        params.insert_opt("status", self.status.map(InvoiceStatus::as_str));
        params.insert("limitstart", self.limitstart);
        params.insert("limitnum", self.limitnum);
        params.insert_opt("orderby", self.orderby.as_ref());
        params.insert_opt("order", self.order.as_ref());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GetInvoiceRequest {
    pub invoiceid: i64,
}

impl ApiRequest for GetInvoiceRequest {
    fn action(&self) -> Action {
        Action::GetInvoice
    }

    fn validate(&self) -> Result<(), ApiError> {
        require_positive("invoiceid", self.invoiceid)
    }

    fn write_params(&self, params: &mut Params) {
        params.insert("invoiceid", self.invoiceid);
    }
}
