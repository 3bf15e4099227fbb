//! Decoded response records and typed requests, one module per resource.
//!
//! # Design
//! Response fields the remote may omit are `Option` or `#[serde(default)]`;
//! ids go through the lenient helpers in `crate::de` because the same field
//! arrives as a number on one action and a string on another. Field names
//! match the wire names exactly.

pub mod account;
pub mod invoice;
pub mod order;
pub mod product;

pub use account::{
    Account, AddClientRequest, AddClientResult, ClientList, ClientLookup, ClientProduct, ClientProducts,
    ClientStatus, ClientSummary, ContactList, GetClientsProductsRequest, GetClientsRequest,
};
pub use invoice::{
    CreateInvoiceRequest, GetInvoicesRequest, Invoice, InvoiceItem, InvoiceLineItem, InvoiceList,
    InvoiceResponse, InvoiceStatus, InvoiceSummary,
};
pub use order::{
    AcceptOrderRequest, AddOrderRequest, CancelOrderRequest, GetOrdersRequest, Order, OrderList, OrderStatus,
    OrderStatuses, OrderSummary,
};
pub use product::{AddProductRequest, GetProductsRequest, PayType, Product, ProductDetail, ProductList, ProductType};
