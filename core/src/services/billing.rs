//! Invoices: creation, listing and lookup, including the most recent one.

use crate::client::Client;
use crate::error::ApiError;
use crate::http::Response;
use crate::types::invoice::{CreateInvoiceCall, GetInvoiceRequest};
use crate::types::{
    CreateInvoiceRequest, GetInvoicesRequest, Invoice, InvoiceList, InvoiceResponse, InvoiceStatus, InvoiceSummary,
};

/// Invoice actions.
#[derive(Debug, Clone, Copy)]
pub struct Billing<'a> {
    client: &'a Client,
}

impl<'a> Billing<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `CreateInvoice` for `client_id`.
    pub fn create_invoice(
        &self,
        client_id: i64,
        request: &CreateInvoiceRequest,
    ) -> Result<(InvoiceResponse, Response), ApiError> {
        self.client.call(&CreateInvoiceCall {
            userid: client_id,
            request,
        })
    }

    pub fn get_invoices(&self, request: &GetInvoicesRequest) -> Result<(InvoiceList, Response), ApiError> {
        self.client.call(request)
    }

    pub fn get_invoice(&self, invoice_id: i64) -> Result<(Invoice, Response), ApiError> {
        self.client.call(&GetInvoiceRequest { invoiceid: invoice_id })
    }

    /// Most recent invoice for `client_id`, optionally filtered by status.
    pub fn get_last_invoice(
        &self,
        client_id: i64,
        status: Option<InvoiceStatus>,
    ) -> Result<Option<InvoiceSummary>, ApiError> {
        let request = GetInvoicesRequest {
            userid: Some(client_id),
            status,
            limitnum: 1,
            orderby: Some("id".to_string()),
            order: Some("desc".to_string()),
            ..Default::default()
        };
        let (list, _) = self.get_invoices(&request)?;
        Ok(list.invoices.invoice.into_iter().next())
    }
}
