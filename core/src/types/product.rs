//! Product records and requests.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::error::ApiError;
use crate::params::{require_non_empty, require_positive, Action, ApiRequest, Params};

/// Result of `AddProduct`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub result: String,
    #[serde(default, deserialize_with = "de::int")]
    pub pid: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub gid: Option<i64>,
}

/// One row of `GetProducts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    #[serde(default, deserialize_with = "de::int")]
    pub pid: i64,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub gid: Option<i64>,
    #[serde(default, rename = "type")]
    pub product_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub paytype: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductItems {
    #[serde(default, deserialize_with = "de::list_or_empty")]
    pub product: Vec<ProductDetail>,
}

/// Result of `GetProducts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductList {
    #[serde(default)]
    pub result: String,
    #[serde(default, deserialize_with = "de::int")]
    pub totalresults: i64,
    #[serde(default)]
    pub products: ProductItems,
}

impl ProductList {
    pub fn products(&self) -> &[ProductDetail] {
        &self.products.product
    }
}

/// Product type accepted by `AddProduct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductType {
    HostingAccount,
    ResellerAccount,
    Server,
    Other,
}

impl ProductType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::HostingAccount => "hostingaccount",
            ProductType::ResellerAccount => "reselleraccount",
            ProductType::Server => "server",
            ProductType::Other => "other",
        }
    }
}

/// Payment type accepted by `AddProduct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayType {
    Free,
    OneTime,
    Recurring,
}

impl PayType {
    pub fn as_str(self) -> &'static str {
        match self {
            PayType::Free => "free",
            PayType::OneTime => "onetime",
            PayType::Recurring => "recurring",
        }
    }
}

/// Parameters for `AddProduct`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddProductRequest {
    pub name: String,
    /// Product group the product is added to.
    pub gid: i64,
    pub product_type: Option<ProductType>,
    pub pay_type: Option<PayType>,
    pub description: Option<String>,
    pub hidden: Option<bool>,
}

impl AddProductRequest {
    pub fn new(name: impl Into<String>, gid: i64) -> Self {
        Self {
            name: name.into(),
            gid,
            product_type: None,
            pay_type: None,
            description: None,
            hidden: None,
        }
    }
}

impl ApiRequest for AddProductRequest {
    fn action(&self) -> Action {
        Action::AddProduct
    }

    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty("name", &self.name)?;
        require_positive("gid", self.gid)
    }

    fn write_params(&self, params: &mut Params) {
        params.insert("name", &self.name);
        params.insert("gid", self.gid);
        params.insert_opt("type", self.product_type.map(ProductType::as_str));
        params.insert_opt("paytype", self.pay_type.map(PayType::as_str));
        params.insert_opt("description", self.description.as_ref());
        params.insert_flag("hidden", self.hidden);
    }
}

/// Parameters for `GetProducts`. All filters are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetProductsRequest {
    pub pid: Option<i64>,
    pub gid: Option<i64>,
    pub module: Option<String>,
}

impl ApiRequest for GetProductsRequest {
    fn action(&self) -> Action {
        Action::GetProducts
    }

    fn write_params(&self, params: &mut Params) {
        params.insert_opt("pid", self.pid);
        params.insert_opt("gid", self.gid);
        params.insert_opt("module", self.module.as_ref());
    }
}
