use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with, Credentials, API_PATH, DUPLICATE_EMAIL};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn form_request(fields: &[(&str, &str)]) -> Request<String> {
    let creds = Credentials::default();
    let mut all = vec![
        ("identifier", creds.identifier.as_str()),
        ("secret", creds.secret.as_str()),
        ("accesskey", creds.accesskey.as_str()),
        ("responsetype", "json"),
    ];
    all.extend_from_slice(fields);
    raw_form_request(&serde_urlencoded::to_string(&all).unwrap())
}

fn raw_form_request(body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(API_PATH)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

async fn call(app: &Router, fields: &[(&str, &str)]) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(form_request(fields)).await.unwrap();
    let status = resp.status();
    (status, body_json(resp).await)
}

fn test_client<'a>(email: &'a str) -> Vec<(&'static str, &'a str)> {
    vec![
        ("action", "AddClient"),
        ("firstname", "Test"),
        ("lastname", "Dude"),
        ("email", email),
        ("state", "Queensland"),
        ("country", "AU"),
    ]
}

// --- auth ---

#[tokio::test]
async fn wrong_secret_is_forbidden() {
    let resp = app()
        .oneshot(raw_form_request(
            "action=GetClients&identifier=test-identifier&secret=wrong&accesskey=test-access-key&responsetype=json",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["result"], "error");
    assert_eq!(body["message"], "Authentication Failed");
}

#[tokio::test]
async fn custom_credentials_are_honoured() {
    let app = app_with(Credentials::new("me", "pw", ""));
    let resp = app
        .oneshot(raw_form_request("action=GetProducts&identifier=me&secret=pw&responsetype=json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["result"], "success");
}

#[tokio::test]
async fn missing_response_type_is_rejected() {
    let resp = app()
        .oneshot(raw_form_request(
            "action=GetClients&identifier=test-identifier&secret=test-secret&accesskey=test-access-key",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn json_body_is_unsupported() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(API_PATH)
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(r#"{"action":"GetClients"}"#.to_string())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(!body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn get_is_not_routed() {
    let resp = app()
        .oneshot(Request::builder().uri(API_PATH).body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- clients ---

#[tokio::test]
async fn add_client_then_duplicate() {
    let app = app();
    let (status, body) = call(&app, &test_client("testdude@example.com")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "success");
    assert!(body["clientid"].as_i64().unwrap() > 0);

    let (status, body) = call(&app, &test_client("testdude@example.com")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["result"], "error");
    assert_eq!(body["message"], DUPLICATE_EMAIL);
}

#[tokio::test]
async fn get_clients_filters_by_status() {
    let app = app();
    call(&app, &test_client("a@example.com")).await;
    call(&app, &test_client("b@example.com")).await;

    let (_, body) = call(&app, &[("action", "GetClients"), ("status", "Active")]).await;
    assert_eq!(body["totalresults"], 2);
    assert_eq!(body["clients"]["client"][1]["email"], "b@example.com");

    let (_, body) = call(&app, &[("action", "GetClients"), ("status", "Closed")]).await;
    assert_eq!(body["totalresults"], 0);
}

#[tokio::test]
async fn delete_client_then_lookup_fails() {
    let app = app();
    let (_, body) = call(&app, &test_client("gone@example.com")).await;
    let id = body["clientid"].to_string();

    let (_, body) = call(&app, &[("action", "DeleteClient"), ("clientid", id.as_str())]).await;
    assert_eq!(body["result"], "success");

    let (_, body) = call(&app, &[("action", "GetClientsDetails"), ("clientid", id.as_str())]).await;
    assert_eq!(body["result"], "error");
    assert_eq!(body["message"], "Client Not Found");
}

// --- orders ---

#[tokio::test]
async fn order_flow_activates_services() {
    let app = app();
    let (_, body) = call(&app, &test_client("order@example.com")).await;
    let client = body["clientid"].to_string();
    let (_, body) = call(&app, &[("action", "AddProduct"), ("name", "Widget"), ("gid", "1")]).await;
    let pid = body["pid"].to_string();

    let (_, body) = call(
        &app,
        &[
            ("action", "AddOrder"),
            ("clientid", client.as_str()),
            ("pid", pid.as_str()),
            ("paymentmethod", "banktransfer"),
        ],
    )
    .await;
    assert_eq!(body["result"], "success");
    let order = body["orderid"].to_string();

    let (_, body) = call(&app, &[("action", "GetOrderStatuses")]).await;
    assert_eq!(body["statuses"]["status"][0]["title"], "Pending");
    assert_eq!(body["statuses"]["status"][0]["count"], 1);

    let (_, body) = call(&app, &[("action", "AcceptOrder"), ("orderid", order.as_str())]).await;
    assert_eq!(body["result"], "success");

    let (_, body) = call(&app, &[("action", "GetOrders"), ("userid", client.as_str())]).await;
    assert_eq!(body["orders"]["order"][0]["status"], "Active");

    let (_, body) = call(&app, &[("action", "CancelOrder"), ("orderid", order.as_str())]).await;
    assert_eq!(body["result"], "error");
}

#[tokio::test]
async fn unknown_action() {
    let (status, body) = call(&app(), &[("action", "DoTheThing")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Command Not Found");
}

// --- invoices ---

#[tokio::test]
async fn create_and_fetch_invoice() {
    let app = app();
    let (_, body) = call(&app, &test_client("bill@example.com")).await;
    let client = body["clientid"].to_string();

    let (_, body) = call(
        &app,
        &[
            ("action", "CreateInvoice"),
            ("userid", client.as_str()),
            ("status", "Draft"),
            ("duedate", "2026-10-31"),
            ("itemdescription1", "This is a test invoice"),
            ("itemamount1", "12.5"),
            ("itemtaxed1", "true"),
        ],
    )
    .await;
    assert_eq!(body["status"], "Draft");
    let invoice = body["invoiceid"].to_string();

    let (_, body) = call(&app, &[("action", "GetInvoice"), ("invoiceid", invoice.as_str())]).await;
    assert_eq!(body["total"], "12.50");
    assert_eq!(body["items"]["item"][0]["taxed"], 1);
    assert_eq!(body["duedate"], "2026-10-31");
}

#[tokio::test]
async fn oversized_invoice_amounts_are_rejected() {
    let app = app();
    let (_, body) = call(&app, &test_client("huge@example.com")).await;
    let client = body["clientid"].to_string();

    let (status, body) = call(
        &app,
        &[
            ("action", "CreateInvoice"),
            ("userid", client.as_str()),
            ("itemdescription1", "Too much"),
            ("itemamount1", "92233720368547759"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "error");
    assert_eq!(body["message"], "Invalid amount for item 1");

    let (_, body) = call(
        &app,
        &[
            ("action", "CreateInvoice"),
            ("userid", client.as_str()),
            ("itemdescription1", "Half"),
            ("itemamount1", "90000000000000000"),
            ("itemdescription2", "Other half"),
            ("itemamount2", "90000000000000000"),
        ],
    )
    .await;
    assert_eq!(body["message"], "Invalid amount for item 2");
}
