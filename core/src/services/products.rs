//! Product catalogue: listing and adding products.

use crate::client::Client;
use crate::error::ApiError;
use crate::http::Response;
use crate::types::{AddProductRequest, GetProductsRequest, Product, ProductList};

/// Product catalogue actions.
#[derive(Debug, Clone, Copy)]
pub struct Products<'a> {
    client: &'a Client,
}

impl<'a> Products<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn add_product(&self, request: &AddProductRequest) -> Result<(Product, Response), ApiError> {
        self.client.call(request)
    }

    pub fn get_products(&self, request: &GetProductsRequest) -> Result<(ProductList, Response), ApiError> {
        self.client.call(request)
    }
}
