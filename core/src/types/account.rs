//! Client (account) records and requests.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::error::{ApiError, ApiStatus};
use crate::params::{require_non_empty, require_positive, Action, ApiRequest, Params};

/// Status filter accepted by `GetClients`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientStatus {
    Active,
    Inactive,
    Closed,
}

impl ClientStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ClientStatus::Active => "Active",
            ClientStatus::Inactive => "Inactive",
            ClientStatus::Closed => "Closed",
        }
    }
}

/// Full client record from `GetClientsDetails`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(default)]
    pub companyname: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub phonenumber: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub currency: Option<i64>,
    #[serde(default)]
    pub currency_code: Option<String>,
}

impl Account {
    /// `fullname` when the remote sent one, otherwise first and last name.
    pub fn display_name(&self) -> String {
        if let Some(full) = self.fullname.as_deref().filter(|s| !s.is_empty()) {
            return full.to_string();
        }
        [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `GetClientsDetails` wraps the record in a `client` object, which is
/// absent when the lookup matched nothing.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ClientDetailsEnvelope {
    #[serde(flatten)]
    pub status: ApiStatus,
    #[serde(default)]
    pub client: Option<Account>,
}

/// Result of `AddClient`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddClientResult {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int", alias = "client_id")]
    pub clientid: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub owner_id: Option<i64>,
}

/// One row of `GetClients`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    #[serde(default, deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub companyname: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub datecreated: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub groupid: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clients {
    #[serde(default, deserialize_with = "de::list_or_empty")]
    pub client: Vec<ClientSummary>,
}

/// Result of `GetClients`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientList {
    #[serde(default)]
    pub result: String,
    #[serde(default, deserialize_with = "de::int")]
    pub totalresults: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub startnumber: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub numreturned: i64,
    #[serde(default)]
    pub clients: Clients,
}

impl ClientList {
    pub fn clients(&self) -> &[ClientSummary] {
        &self.clients.client
    }
}

/// One product or service held by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProduct {
    #[serde(default, deserialize_with = "de::int")]
    pub id: i64,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub clientid: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub orderid: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub pid: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub groupname: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub billingcycle: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    pub recurringamount: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProductItems {
    #[serde(default, deserialize_with = "de::list_or_empty")]
    pub product: Vec<ClientProduct>,
}

/// Result of `GetClientsProducts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProducts {
    #[serde(default)]
    pub result: String,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub clientid: Option<i64>,
    #[serde(default, deserialize_with = "de::int")]
    pub totalresults: i64,
    #[serde(default, deserialize_with = "de::int")]
    pub numreturned: i64,
    #[serde(default)]
    pub products: ClientProductItems,
}

impl ClientProducts {
    pub fn products(&self) -> &[ClientProduct] {
        &self.products.product
    }
}

/// Contact summary assembled from `GetClients` + `GetClientsDetails`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactList {
    pub company_name: String,
    pub full_name: String,
    pub phone: String,
    pub status: String,
    pub email: String,
    pub state: String,
}

impl From<&Account> for ContactList {
    fn from(account: &Account) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            company_name: text(&account.companyname),
            full_name: account.display_name(),
            phone: text(&account.phonenumber),
            status: text(&account.status),
            email: account.email.clone(),
            state: text(&account.state),
        }
    }
}

/// Parameters for `AddClient`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddClientRequest {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub companyname: Option<String>,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    /// ISO 3166-1 alpha-2 code.
    pub country: String,
    pub phonenumber: String,
    pub password2: Option<String>,
    pub currency: Option<i64>,
    pub noemail: Option<bool>,
}

impl ApiRequest for AddClientRequest {
    fn action(&self) -> Action {
        Action::AddClient
    }

    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("firstname", &self.firstname)?;
        require_non_empty("lastname", &self.lastname)?;
        require_non_empty("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ApiError::invalid(format!("email `{}` is not an address", self.email)));
        }
        require_non_empty("address1", &self.address1)?;
        require_non_empty("city", &self.city)?;
        require_non_empty("state", &self.state)?;
        require_non_empty("postcode", &self.postcode)?;
        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ApiError::invalid(format!(
                "country must be a two-letter code, got `{}`",
                self.country
            )));
        }
        require_non_empty("phonenumber", &self.phonenumber)
    }

    fn write_params(&self, params: &mut Params) {
        params.insert("firstname", &self.firstname);
        params.insert("lastname", &self.lastname);
        params.insert("email", &self.email);
        params.insert_opt("companyname", self.companyname.as_ref());
        params.insert("address1", &self.address1);
        params.insert("city", &self.city);
        params.insert("state", &self.state);
        params.insert("postcode", &self.postcode);
        params.insert("country", self.country.to_ascii_uppercase());
        params.insert("phonenumber", &self.phonenumber);
        params.insert_opt("password2", self.password2.as_ref());
        params.insert_opt("currency", self.currency);
        params.insert_flag("noemail", self.noemail);
    }
}

/// Parameters for `GetClients`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetClientsRequest {
    pub search: Option<String>,
    pub status: Option<ClientStatus>,
    /// `ASC` or `DESC`.
    pub sorting: Option<String>,
    pub limitstart: u32,
    pub limitnum: u32,
}

impl Default for GetClientsRequest {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            sorting: Some("ASC".to_string()),
            limitstart: 0,
            limitnum: 2500,
        }
    }
}

impl GetClientsRequest {
    pub fn with_status(status: ClientStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl ApiRequest for GetClientsRequest {
    fn action(&self) -> Action {
        Action::GetClients
    }

    fn validate(&self) -> Result<(), ApiError> {
        if self.limitnum == 0 {
            return Err(ApiError::invalid("limitnum must be at least 1"));
        }
        match self.sorting.as_deref() {
            None | Some("ASC") | Some("DESC") => Ok(()),
            Some(other) => Err(ApiError::invalid(format!("sorting must be ASC or DESC, got `{other}`"))),
        }
    }

    fn write_params(&self, params: &mut Params) {
        params.insert_opt("search", self.search.as_ref());
        params.insert_opt("status", self.status.map(ClientStatus::as_str));
        params.insert_opt("sorting", self.sorting.as_ref());
        params.insert("limitstart", self.limitstart);
        params.insert("limitnum", self.limitnum);
    }
}

/// How to find a single client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientLookup {
    Id(i64),
    Email(String),
}

impl ApiRequest for ClientLookup {
    fn action(&self) -> Action {
        Action::GetClientsDetails
    }

    fn validate(&self) -> Result<(), ApiError> {
        match self {
            ClientLookup::Id(id) => require_positive("clientid", *id),
            ClientLookup::Email(email) => require_non_empty("email", email),
        }
    }

    fn write_params(&self, params: &mut Params) {
        match self {
            ClientLookup::Id(id) => params.insert("clientid", id),
            ClientLookup::Email(email) => params.insert("email", email),
        }
        params.insert("stats", false);
    }
}

/// Parameters for `GetClientsProducts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetClientsProductsRequest {
    pub clientid: Option<i64>,
    pub serviceid: Option<i64>,
    pub pid: Option<i64>,
    pub limitstart: u32,
    pub limitnum: u32,
}

impl GetClientsProductsRequest {
    pub fn for_client(clientid: i64) -> Self {
        Self {
            clientid: Some(clientid),
            serviceid: None,
            pid: None,
            limitstart: 0,
            limitnum: 500,
        }
    }
}

impl ApiRequest for GetClientsProductsRequest {
    fn action(&self) -> Action {
        Action::GetClientsProducts
    }

    fn validate(&self) -> Result<(), ApiError> {
        if let Some(id) = self.clientid {
            require_positive("clientid", id)?;
        }
        if self.limitnum == 0 {
            return Err(ApiError::invalid("limitnum must be at least 1"));
        }
        Ok(())
    }

    fn write_params(&self, params: &mut Params) {
        params.insert_opt("clientid", self.clientid);
        params.insert_opt("serviceid", self.serviceid);
        params.insert_opt("pid", self.pid);
        params.insert("limitstart", self.limitstart);
        params.insert("limitnum", self.limitnum);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DeleteClientRequest {
    pub clientid: i64,
}

impl ApiRequest for DeleteClientRequest {
    fn action(&self) -> Action {
        Action::DeleteClient
    }

    fn validate(&self) -> Result<(), ApiError> {
        require_positive("clientid", self.clientid)
    }

    fn write_params(&self, params: &mut Params) {
        params.insert("clientid", self.clientid);
    }
}
