//! In-memory state behind the mock API.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct ClientRecord {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub companyname: String,
    pub email: String,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub phonenumber: String,
    pub status: String,
}

impl ClientRecord {
    pub fn fullname(&self) -> String {
        format!("{} {}", self.firstname, self.lastname).trim().to_string()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ProductRecord {
    pub pid: i64,
    pub gid: i64,
    #[serde(rename = "type")]
    pub product_type: String,
    pub name: String,
    pub description: String,
    pub paytype: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OrderState {
    Pending,
    Active,
    Cancelled,
}

impl OrderState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Pending => "Pending",
            OrderState::Active => "Active",
            OrderState::Cancelled => "Cancelled",
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrderRecord {
    pub id: i64,
    pub userid: i64,
    pub paymentmethod: String,
    pub invoiceid: i64,
    pub status: OrderState,
    pub service_ids: Vec<i64>,
}

/// A product held by a client, created by `AddOrder`.
#[derive(Clone, Debug)]
pub struct ServiceRecord {
    pub id: i64,
    pub userid: i64,
    pub orderid: i64,
    pub pid: i64,
    pub status: String,
}

#[derive(Clone, Debug)]
pub struct LineItem {
    pub id: i64,
    pub description: String,
    pub amount_cents: i64,
    pub taxed: bool,
}

#[derive(Clone, Debug)]
pub struct InvoiceRecord {
    pub id: i64,
    pub userid: i64,
    pub status: String,
    pub duedate: String,
    pub paymentmethod: String,
    pub items: Vec<LineItem>,
}

impl InvoiceRecord {
    pub fn subtotal_cents(&self) -> i64 {
        self.items.iter().map(|i| i.amount_cents).sum()
    }
}

#[derive(Debug, Default)]
pub struct Store {
    last_id: i64,
    pub clients: BTreeMap<i64, ClientRecord>,
    pub products: BTreeMap<i64, ProductRecord>,
    pub orders: BTreeMap<i64, OrderRecord>,
    pub services: BTreeMap<i64, ServiceRecord>,
    pub invoices: BTreeMap<i64, InvoiceRecord>,
}

impl Store {
    /// Ids are unique across every table, which makes mix-ups visible.
    pub fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn client_by_email(&self, email: &str) -> Option<&ClientRecord> {
        self.clients.values().find(|c| c.email.eq_ignore_ascii_case(email))
    }

    pub fn remove_client(&mut self, id: i64) -> Option<ClientRecord> {
        let client = self.clients.remove(&id)?;
        self.orders.retain(|_, o| o.userid != id);
        self.services.retain(|_, s| s.userid != id);
        self.invoices.retain(|_, i| i.userid != id);
        Some(client)
    }
}

/// Parse `"10"`, `"10.5"` or `"10.50"` into cents.
pub fn parse_cents(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, raw) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let (whole, frac) = raw.split_once('.').unwrap_or((raw, ""));
    if whole.is_empty() || frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let frac: i64 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().ok()? * 10,
        _ => frac.parse().ok()?,
    };
    let cents = whole.checked_mul(100)?.checked_add(frac)?;
    Some(if negative { -cents } else { cents })
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
