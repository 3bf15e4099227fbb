//! Client accounts: creation, lookup, contacts and deletion.

use tracing::debug;

use super::require_success;
use crate::client::Client;
use crate::error::{ApiError, ApiStatus};
use crate::http::Response;
use crate::params::Action;
use crate::types::account::{ClientDetailsEnvelope, DeleteClientRequest};
use crate::types::{
    Account, AddClientRequest, AddClientResult, ClientList, ClientLookup, ClientProducts, ClientStatus, ContactList,
    GetClientsProductsRequest, GetClientsRequest,
};

/// Client account actions.
#[derive(Debug, Clone, Copy)]
pub struct Accounts<'a> {
    client: &'a Client,
}

impl<'a> Accounts<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// `AddClient`. A remote `result: error` is returned as data; see
    /// `crate::idiom::ensure_client` for the duplicate-email case.
    pub fn add_client(&self, request: &AddClientRequest) -> Result<(AddClientResult, Response), ApiError> {
        self.client.call(request)
    }

    pub fn get_clients(&self, request: &GetClientsRequest) -> Result<(ClientList, Response), ApiError> {
        self.client.call(request)
    }

    /// `GetClientsDetails`. A lookup that matches nothing is `ApiError::Remote`.
    pub fn get_clients_details(&self, lookup: &ClientLookup) -> Result<(Account, Response), ApiError> {
        let (envelope, response): (ClientDetailsEnvelope, _) = self.client.call(lookup)?;
        match envelope.client {
            Some(account) if envelope.status.is_success() => Ok((account, response)),
            _ => Err(ApiError::Remote {
                action: Action::GetClientsDetails.as_str().to_string(),
                status: envelope.status,
                response: Box::new(response),
            }),
        }
    }

    pub fn get_clients_products(
        &self,
        request: &GetClientsProductsRequest,
    ) -> Result<(ClientProducts, Response), ApiError> {
        self.client.call(request)
    }

    /// `DeleteClient`. Fails with `ApiError::Remote` unless the remote
    /// reports success.
    pub fn delete_client(&self, client_id: i64) -> Result<Response, ApiError> {
        let (status, response): (ApiStatus, _) = self.client.call(&DeleteClientRequest { clientid: client_id })?;
        let (_, response) = require_success(Action::DeleteClient, status, response)?;
        Ok(response)
    }

    /// Contacts for every client with `status`, one `GetClientsDetails`
    /// call per client.
    pub fn client_contact_list(&self, status: ClientStatus) -> Result<Vec<ContactList>, ApiError> {
        let (list, _) = self.get_clients(&GetClientsRequest::with_status(status))?;
        debug!(status = status.as_str(), clients = list.clients().len(), "building contact list");

        list.clients()
            .iter()
            .map(|summary| {
                let (account, _) = self.get_clients_details(&ClientLookup::Id(summary.id))?;
                Ok(ContactList::from(&account))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::auth::Auth;
    use crate::client::Client;
    use crate::config::ClientConfig;
    use crate::error::ApiError;
    use crate::testing::ScriptedTransport;
    use crate::types::{ClientLookup, ClientStatus, GetClientsProductsRequest};

    fn client(transport: &Arc<ScriptedTransport>) -> Client {
        let config = ClientConfig::new("http://localhost:3000", Auth::new("i", "s", "a"));
        Client::with_transport(config, transport.clone()).unwrap()
    }

    #[test]
    fn get_clients_details_unwraps_client_object() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            200,
            r#"{"result":"success","userid":3,"client":{"id":3,"email":"t@d","firstname":"Test"}}"#,
        );
        let (account, response) = client(&transport)
            .accounts()
            .get_clients_details(&ClientLookup::Email("t@d".into()))
            .unwrap();
        assert_eq!(account.id, 3);
        assert_eq!(account.firstname.as_deref(), Some("Test"));
        assert_eq!(response.status_code, 200);
        assert_eq!(transport.form(0)["email"], "t@d");
    }

    #[test]
    fn get_clients_details_not_found_is_remote_error() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, r#"{"result":"error","message":"Client Not Found"}"#);
        let err = client(&transport)
            .accounts()
            .get_clients_details(&ClientLookup::Id(99))
            .unwrap_err();
        let status = err.remote_status().unwrap();
        assert_eq!(status.message.as_deref(), Some("Client Not Found"));
        assert!(err.response().is_some());
    }

    #[test]
    fn delete_client_checks_result() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, r#"{"result":"success","clientid":3}"#);
        transport.push_json(200, r#"{"result":"error","message":"Client ID Not Found"}"#);
        let c = client(&transport);
        assert!(c.accounts().delete_client(3).is_ok());
        assert!(matches!(c.accounts().delete_client(3), Err(ApiError::Remote { .. })));
        assert_eq!(transport.form(0)["action"], "DeleteClient");
    }

    #[test]
    fn client_contact_list_fetches_details_per_client() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            200,
            r#"{"result":"success","totalresults":2,"numreturned":2,
                "clients":{"client":[{"id":1,"email":"a@x"},{"id":2,"email":"b@x"}]}}"#,
        );
        transport.push_json(
            200,
            r#"{"result":"success","client":{"id":1,"email":"a@x","firstname":"Ann","lastname":"Lee",
                "companyname":"A Co","phonenumber":"01234123123","status":"Active","state":"Queensland"}}"#,
        );
        transport.push_json(
            200,
            r#"{"result":"success","client":{"id":2,"email":"b@x","fullname":"Bo Li","status":"Active"}}"#,
        );

        let contacts = client(&transport).accounts().client_contact_list(ClientStatus::Active).unwrap();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].full_name, "Ann Lee");
        assert_eq!(contacts[0].phone, "01234123123");
        assert_eq!(contacts[1].full_name, "Bo Li");
        assert_eq!(transport.form(0)["status"], "Active");
        assert_eq!(transport.actions(), vec!["GetClients", "GetClientsDetails", "GetClientsDetails"]);
    }

    #[test]
    fn get_clients_products_sends_paging() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            200,
            r#"{"result":"success","clientid":"3","totalresults":1,"numreturned":1,
                "products":{"product":[{"id":11,"pid":"5","name":"Test Product","status":"Active"}]}}"#,
        );
        let (products, _) = client(&transport)
            .accounts()
            .get_clients_products(&GetClientsProductsRequest::for_client(3))
            .unwrap();
        assert_eq!(products.products()[0].pid, Some(5));
        let form = transport.form(0);
        assert_eq!(form["clientid"], "3");
        assert_eq!(form["limitnum"], "500");
    }
}
