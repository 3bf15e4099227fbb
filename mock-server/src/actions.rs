//! One handler per API action, each working on the locked store.

use std::collections::HashMap;

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::store::{
    format_cents, parse_cents, ClientRecord, InvoiceRecord, LineItem, OrderRecord, OrderState, ProductRecord,
    ServiceRecord, Store,
};

pub type Reply = (StatusCode, Value);

pub const DUPLICATE_EMAIL: &str = "A user already exists with that email address";

/// Decoded form body.
pub struct Form(pub HashMap<String, String>);

impl Form {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.trim().parse().ok())
    }

    fn paging(&self, default_limit: usize) -> (usize, usize) {
        let start = self.get("limitstart").and_then(|v| v.parse().ok()).unwrap_or(0);
        let limit = self
            .get("limitnum")
            .and_then(|v| v.parse().ok())
            .unwrap_or(default_limit);
        (start, limit)
    }
}

pub fn success(mut body: Value) -> Reply {
    if let Some(map) = body.as_object_mut() {
        map.insert("result".to_string(), json!("success"));
    }
    (StatusCode::OK, body)
}

pub fn error(status: StatusCode, message: &str) -> Reply {
    (status, json!({ "result": "error", "message": message }))
}

/// Paged list in the remote's `{"<plural>": {"<singular>": [...]}}` shape.
fn page(rows: Vec<Value>, start: usize, limit: usize, plural: &str, singular: &str) -> Reply {
    let total = rows.len();
    let rows: Vec<Value> = rows.into_iter().skip(start).take(limit).collect();
    let mut body = json!({
        "totalresults": total,
        "startnumber": start,
        "numreturned": rows.len(),
    });
    body[plural][singular] = Value::Array(rows);
    success(body)
}

pub fn add_client(store: &mut Store, form: &Form) -> Reply {
    let Some(email) = form.get("email") else {
        return error(StatusCode::BAD_REQUEST, "You did not enter an email address");
    };
    if store.client_by_email(email).is_some() {
        return error(StatusCode::BAD_REQUEST, DUPLICATE_EMAIL);
    }
    let id = store.next_id();
    store.clients.insert(
        id,
        ClientRecord {
            id,
            firstname: form.text("firstname"),
            lastname: form.text("lastname"),
            companyname: form.text("companyname"),
            email: email.to_string(),
            address1: form.text("address1"),
            city: form.text("city"),
            state: form.text("state"),
            postcode: form.text("postcode"),
            country: form.text("country"),
            phonenumber: form.text("phonenumber"),
            status: "Active".to_string(),
        },
    );
    success(json!({ "clientid": id, "owner_id": id }))
}

pub fn get_clients(store: &Store, form: &Form) -> Reply {
    let search = form.get("search").map(str::to_ascii_lowercase);
    let mut rows: Vec<&ClientRecord> = store
        .clients
        .values()
        .filter(|c| form.get("status").is_none_or(|s| c.status.eq_ignore_ascii_case(s)))
        .filter(|c| {
            search.as_deref().is_none_or(|needle| {
                c.email.to_ascii_lowercase().contains(needle) || c.fullname().to_ascii_lowercase().contains(needle)
            })
        })
        .collect();
    if form.get("sorting").is_some_and(|s| s.eq_ignore_ascii_case("DESC")) {
        rows.reverse();
    }
    let rows = rows
        .into_iter()
        .map(|c| {
            json!({
                "id": c.id,
                "firstname": c.firstname,
                "lastname": c.lastname,
                "companyname": c.companyname,
                "email": c.email,
                "groupid": 0,
                "status": c.status,
            })
        })
        .collect();
    let (start, limit) = form.paging(25);
    page(rows, start, limit, "clients", "client")
}

pub fn get_clients_details(store: &Store, form: &Form) -> Reply {
    let found = match (form.int("clientid"), form.get("email")) {
        (Some(id), _) => store.clients.get(&id),
        (None, Some(email)) => store.client_by_email(email),
        (None, None) => return error(StatusCode::OK, "Client ID or Email Address Required"),
    };
    let Some(client) = found else {
        return error(StatusCode::OK, "Client Not Found");
    };
    let mut detail = json!(client);
    if let Some(map) = detail.as_object_mut() {
        map.insert("fullname".to_string(), json!(client.fullname()));
        map.insert("currency".to_string(), json!(1));
        map.insert("currency_code".to_string(), json!("USD"));
    }
    success(json!({ "userid": client.id, "client": detail }))
}

pub fn get_clients_products(store: &Store, form: &Form) -> Reply {
    let rows = store
        .services
        .values()
        .filter(|s| form.int("clientid").is_none_or(|id| s.userid == id))
        .filter(|s| form.int("serviceid").is_none_or(|id| s.id == id))
        .filter(|s| form.int("pid").is_none_or(|pid| s.pid == pid))
        .map(|s| {
            let name = store.products.get(&s.pid).map(|p| p.name.clone()).unwrap_or_default();
            json!({
                "id": s.id,
                "clientid": s.userid,
                "orderid": s.orderid,
                "pid": s.pid,
                "name": name,
                "status": s.status,
                "billingcycle": "Free Account",
                "recurringamount": "0.00",
            })
        })
        .collect();
    let (start, limit) = form.paging(25);
    let (status, mut body) = page(rows, start, limit, "products", "product");
    if let (Some(map), Some(id)) = (body.as_object_mut(), form.int("clientid")) {
        map.insert("clientid".to_string(), json!(id));
    }
    (status, body)
}

pub fn delete_client(store: &mut Store, form: &Form) -> Reply {
    match form.int("clientid").and_then(|id| store.remove_client(id)) {
        Some(client) => success(json!({ "clientid": client.id })),
        None => error(StatusCode::OK, "Client ID Not Found"),
    }
}

pub fn add_product(store: &mut Store, form: &Form) -> Reply {
    let Some(name) = form.get("name") else {
        return error(StatusCode::OK, "Product Name is required");
    };
    let Some(gid) = form.int("gid") else {
        return error(StatusCode::OK, "You must supply a valid Product Group ID");
    };
    let pid = store.next_id();
    store.products.insert(
        pid,
        ProductRecord {
            pid,
            gid,
            product_type: form.get("type").unwrap_or("other").to_string(),
            name: name.to_string(),
            description: form.text("description"),
            paytype: form.get("paytype").unwrap_or("free").to_string(),
        },
    );
    success(json!({ "pid": pid }))
}

pub fn get_products(store: &Store, form: &Form) -> Reply {
    let rows: Vec<Value> = store
        .products
        .values()
        .filter(|p| form.int("pid").is_none_or(|pid| p.pid == pid))
        .filter(|p| form.int("gid").is_none_or(|gid| p.gid == gid))
        .map(|p| json!(p))
        .collect();
    success(json!({ "totalresults": rows.len(), "products": { "product": rows } }))
}

fn parse_pids(raw: &str) -> Option<Vec<i64>> {
    raw.split(',').map(|p| p.trim().parse().ok()).collect()
}

pub fn add_order(store: &mut Store, form: &Form) -> Reply {
    let Some(userid) = form.int("clientid").filter(|id| store.clients.contains_key(id)) else {
        return error(StatusCode::OK, "Client ID Not Found");
    };
    let Some(paymentmethod) = form.get("paymentmethod") else {
        return error(StatusCode::OK, "Invalid Payment Method. Valid options include banktransfer");
    };
    let paymentmethod = paymentmethod.to_string();
    let Some(pids) = form.get("pid").and_then(parse_pids) else {
        return error(StatusCode::OK, "Invalid Product ID");
    };
    if let Some(missing) = pids.iter().find(|pid| !store.products.contains_key(*pid)) {
        return error(StatusCode::OK, &format!("Product ID Not Found: {missing}"));
    }

    let orderid = store.next_id();
    let mut service_ids = Vec::with_capacity(pids.len());
    let mut items = Vec::with_capacity(pids.len());
    for pid in &pids {
        let id = store.next_id();
        store.services.insert(
            id,
            ServiceRecord {
                id,
                userid,
                orderid,
                pid: *pid,
                status: "Pending".to_string(),
            },
        );
        service_ids.push(id);
        let name = store.products.get(pid).map(|p| p.name.clone()).unwrap_or_default();
        items.push(LineItem {
            id: store.next_id(),
            description: name,
            amount_cents: 0,
            taxed: false,
        });
    }

    let invoiceid = store.next_id();
    store.invoices.insert(
        invoiceid,
        InvoiceRecord {
            id: invoiceid,
            userid,
            status: "Unpaid".to_string(),
            duedate: String::new(),
            paymentmethod: paymentmethod.clone(),
            items,
        },
    );
    store.orders.insert(
        orderid,
        OrderRecord {
            id: orderid,
            userid,
            paymentmethod,
            invoiceid,
            status: OrderState::Pending,
            service_ids: service_ids.clone(),
        },
    );

    let join = |ids: &[i64]| ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",");
    success(json!({
        "orderid": orderid,
        "invoiceid": invoiceid,
        "productids": join(&service_ids),
        "serviceids": join(&service_ids),
        "addonids": "",
        "domainids": "",
    }))
}

fn set_order_state(store: &mut Store, form: &Form, to: OrderState) -> Reply {
    let order = form.int("orderid").and_then(|id| store.orders.get_mut(&id));
    let Some(order) = order.filter(|o| o.status == OrderState::Pending) else {
        return error(StatusCode::OK, "Order ID not found or Status not Pending");
    };
    order.status = to;
    let services = order.service_ids.clone();
    let status = order.status.as_str();
    for id in services {
        if let Some(service) = store.services.get_mut(&id) {
            service.status = status.to_string();
        }
    }
    success(json!({}))
}

pub fn accept_order(store: &mut Store, form: &Form) -> Reply {
    set_order_state(store, form, OrderState::Active)
}

pub fn cancel_order(store: &mut Store, form: &Form) -> Reply {
    set_order_state(store, form, OrderState::Cancelled)
}

pub fn get_orders(store: &Store, form: &Form) -> Reply {
    let rows = store
        .orders
        .values()
        .filter(|o| form.int("id").is_none_or(|id| o.id == id))
        .filter(|o| form.int("userid").is_none_or(|id| o.userid == id))
        .filter(|o| form.get("status").is_none_or(|s| o.status.as_str().eq_ignore_ascii_case(s)))
        .map(|o| {
            let name = store.clients.get(&o.userid).map(ClientRecord::fullname).unwrap_or_default();
            json!({
                "id": o.id,
                "ordernum": format!("{:010}", o.id),
                "userid": o.userid,
                "amount": "0.00",
                "paymentmethod": o.paymentmethod,
                "invoiceid": o.invoiceid,
                "status": o.status.as_str(),
                "name": name,
            })
        })
        .collect();
    let (start, limit) = form.paging(25);
    page(rows, start, limit, "orders", "order")
}

pub fn get_order_statuses(store: &Store) -> Reply {
    let count = |state: &OrderState| store.orders.values().filter(|o| &o.status == state).count();
    let statuses = vec![
        json!({ "title": "Pending", "color": "#cc0000", "count": count(&OrderState::Pending) }),
        json!({ "title": "Active", "color": "#779500", "count": count(&OrderState::Active) }),
        json!({ "title": "Fraud", "color": "#000000", "count": 0 }),
        json!({ "title": "Cancelled", "color": "#888888", "count": count(&OrderState::Cancelled) }),
    ];
    success(json!({ "totalresults": statuses.len(), "statuses": { "status": statuses } }))
}

pub fn create_invoice(store: &mut Store, form: &Form) -> Reply {
    let Some(userid) = form.int("userid").filter(|id| store.clients.contains_key(id)) else {
        return error(StatusCode::OK, "Invalid Client ID");
    };
    let mut items = Vec::new();
    let mut subtotal: i64 = 0;
    for n in 1.. {
        let Some(description) = form.get(&format!("itemdescription{n}")) else {
            break;
        };
        let description = description.to_string();
        let raw = form.get(&format!("itemamount{n}")).unwrap_or("0");
        // The subtotal must stay representable too.
        let Some((amount_cents, sum)) = parse_cents(raw).and_then(|c| Some((c, subtotal.checked_add(c)?))) else {
            return error(StatusCode::OK, &format!("Invalid amount for item {n}"));
        };
        subtotal = sum;
        let taxed = matches!(form.get(&format!("itemtaxed{n}")), Some("1" | "true"));
        items.push(LineItem {
            id: store.next_id(),
            description,
            amount_cents,
            taxed,
        });
    }
    let id = store.next_id();
    let status = form.get("status").unwrap_or("Unpaid").to_string();
    store.invoices.insert(
        id,
        InvoiceRecord {
            id,
            userid,
            status: status.clone(),
            duedate: form.text("duedate"),
            paymentmethod: form.text("paymentmethod"),
            items,
        },
    );
    success(json!({ "invoiceid": id, "status": status }))
}

fn invoice_row(invoice: &InvoiceRecord) -> Value {
    let subtotal = format_cents(invoice.subtotal_cents());
    json!({
        "id": invoice.id,
        "userid": invoice.userid,
        "invoicenum": "",
        "duedate": invoice.duedate,
        "subtotal": subtotal,
        "credit": "0.00",
        "tax": "0.00",
        "total": subtotal,
        "status": invoice.status,
        "paymentmethod": invoice.paymentmethod,
    })
}

pub fn get_invoices(store: &Store, form: &Form) -> Reply {
    let mut rows: Vec<&InvoiceRecord> = store
        .invoices
        .values()
        .filter(|i| form.int("userid").is_none_or(|id| i.userid == id))
        .filter(|i| form.get("status").is_none_or(|s| i.status.eq_ignore_ascii_case(s)))
        .collect();
    match form.get("orderby") {
        Some("duedate") => rows.sort_by(|a, b| a.duedate.cmp(&b.duedate)),
        Some("total") => rows.sort_by_key(|i| i.subtotal_cents()),
        _ => rows.sort_by_key(|i| i.id),
    }
    if form.get("order").is_some_and(|o| o.eq_ignore_ascii_case("desc")) {
        rows.reverse();
    }
    let rows = rows.into_iter().map(invoice_row).collect();
    let (start, limit) = form.paging(25);
    page(rows, start, limit, "invoices", "invoice")
}

pub fn get_invoice(store: &Store, form: &Form) -> Reply {
    let Some(invoice) = form.int("invoiceid").and_then(|id| store.invoices.get(&id)) else {
        return error(StatusCode::OK, "Invoice ID Not Found");
    };
    let mut body = invoice_row(invoice);
    let items: Vec<Value> = invoice
        .items
        .iter()
        .map(|item| {
            json!({
                "id": item.id,
                "type": "",
                "relid": 0,
                "description": item.description,
                "amount": format_cents(item.amount_cents),
                "taxed": i64::from(item.taxed),
            })
        })
        .collect();
    if let Some(map) = body.as_object_mut() {
        map.remove("id");
        map.insert("invoiceid".to_string(), json!(invoice.id));
        map.insert("items".to_string(), json!({ "item": items }));
    }
    success(body)
}
