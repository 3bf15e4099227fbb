//! In-memory stand-in for the billing API, used by the client's tests.
//!
//! # Design
//! - One route, `POST /includes/api.php`, dispatching on the `action` form
//!   field like the real endpoint.
//! - Credentials are checked on every call; a mismatch is a 403.
//! - All state lives in one `Store` behind a `RwLock`, so handlers are plain
//!   functions over `&Store` / `&mut Store`.

mod actions;
mod store;

use std::{collections::HashMap, sync::Arc};

use axum::{extract::State, http::StatusCode, routing::post, Form, Json, Router};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, warn};

pub use actions::DUPLICATE_EMAIL;
pub use store::Store;

pub const API_PATH: &str = "/includes/api.php";

pub type Db = Arc<RwLock<Store>>;

/// Credentials the server accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
    /// Checked only when non-empty.
    pub accesskey: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>, accesskey: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
            accesskey: accesskey.into(),
        }
    }

    fn accepts(&self, form: &actions::Form) -> bool {
        form.get("identifier") == Some(self.identifier.as_str())
            && form.get("secret") == Some(self.secret.as_str())
            && (self.accesskey.is_empty() || form.get("accesskey") == Some(self.accesskey.as_str()))
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("test-identifier", "test-secret", "test-access-key")
    }
}

#[derive(Clone)]
struct AppState {
    db: Db,
    credentials: Arc<Credentials>,
}

pub fn app() -> Router {
    app_with(Credentials::default())
}

pub fn app_with(credentials: Credentials) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        credentials: Arc::new(credentials),
    };
    Router::new().route(API_PATH, post(dispatch)).with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn dispatch(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let form = actions::Form(fields);
    let action = form.get("action").unwrap_or_default().to_string();

    let (status, body) = if !state.credentials.accepts(&form) {
        warn!(%action, "rejected credentials");
        actions::error(StatusCode::FORBIDDEN, "Authentication Failed")
    } else if form.get("responsetype") != Some("json") {
        actions::error(StatusCode::BAD_REQUEST, "responsetype must be json")
    } else {
        handle(&state.db, &action, &form).await
    };

    debug!(%action, status = status.as_u16(), result = %body["result"], "handled");
    (status, Json(body))
}

async fn handle(db: &Db, action: &str, form: &actions::Form) -> actions::Reply {
    match action {
        "AddClient" => actions::add_client(&mut *db.write().await, form),
        "GetClients" => actions::get_clients(&*db.read().await, form),
        "GetClientsDetails" => actions::get_clients_details(&*db.read().await, form),
        "GetClientsProducts" => actions::get_clients_products(&*db.read().await, form),
        "DeleteClient" => actions::delete_client(&mut *db.write().await, form),
        "AddProduct" => actions::add_product(&mut *db.write().await, form),
        "GetProducts" => actions::get_products(&*db.read().await, form),
        "AddOrder" => actions::add_order(&mut *db.write().await, form),
        "AcceptOrder" => actions::accept_order(&mut *db.write().await, form),
        "GetOrders" => actions::get_orders(&*db.read().await, form),
        "GetOrderStatuses" => actions::get_order_statuses(&*db.read().await),
        "CancelOrder" => actions::cancel_order(&mut *db.write().await, form),
        "CreateInvoice" => actions::create_invoice(&mut *db.write().await, form),
        "GetInvoices" => actions::get_invoices(&*db.read().await, form),
        "GetInvoice" => actions::get_invoice(&*db.read().await, form),
        _ => actions::error(StatusCode::OK, "Command Not Found"),
    }
}
