//! Dispatcher contract checked through a recording transport.
//!
//! Every call is captured before anything touches the network, so these
//! tests can assert on the exact form body the remote would see.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use whmcs_core::{
    idiom, Action, AddClientRequest, ApiError, Auth, CallOptions, Client, ClientConfig, Dispatcher, HttpRequest,
    Params, Response, Transport, TransportError,
};

const ENDPOINT: &str = "http://billing.example.com/includes/api.php";

/// Answers every call with the next canned outcome and records the request.
#[derive(Debug, Default)]
struct Recorder {
    replies: Mutex<Vec<Result<Response, TransportError>>>,
    seen: Mutex<Vec<HttpRequest>>,
}

impl Recorder {
    fn replying(replies: Vec<Result<Response, TransportError>>) -> Arc<Self> {
        let mut replies = replies;
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn form(&self, i: usize) -> HashMap<String, String> {
        let seen = self.seen.lock().unwrap();
        serde_urlencoded::from_str(&seen[i].body).unwrap()
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl Transport for Recorder {
    fn execute(&self, request: &HttpRequest) -> Result<Response, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(TransportError::Io("no reply scripted".into())))
    }
}

fn auth() -> Auth {
    Auth::new("ID", "SECRET", "KEY")
}

fn dispatcher(recorder: &Arc<Recorder>) -> Dispatcher {
    Dispatcher::new(recorder.clone(), auth(), ENDPOINT)
}

#[test]
fn credentials_and_format_override_caller_values() {
    let recorder = Recorder::replying(vec![Ok(Response::new(200, r#"{"result":"success"}"#))]);
    let params = Params::new(Action::GetClients)
        .with("identifier", "spoofed")
        .with("responsetype", "xml")
        .with("search", "dude");

    dispatcher(&recorder).send(params).unwrap();

    let form = recorder.form(0);
    assert_eq!(form["action"], "GetClients");
    assert_eq!(form["identifier"], "ID");
    assert_eq!(form["secret"], "SECRET");
    assert_eq!(form["accesskey"], "KEY");
    assert_eq!(form["responsetype"], "json");
    assert_eq!(form["search"], "dude");
}

#[test]
fn request_is_a_form_post_to_the_endpoint() {
    let recorder = Recorder::replying(vec![]);
    let request = dispatcher(&recorder)
        .build_request(&Params::new(Action::GetProducts).with("pid", 42), &CallOptions::default())
        .unwrap();

    assert_eq!(request.url, ENDPOINT);
    assert!(request
        .headers
        .iter()
        .any(|(k, v)| k == "content-type" && v == "application/x-www-form-urlencoded"));
    let form: HashMap<String, String> = serde_urlencoded::from_str(&request.body).unwrap();
    assert_eq!(form["pid"], "42");
    assert_eq!(recorder.calls(), 0);
}

#[test]
fn values_survive_percent_encoding() {
    let recorder = Recorder::replying(vec![Ok(Response::new(200, "{}"))]);
    let tricky = "a&b=c d+é/100%";
    dispatcher(&recorder)
        .send(Params::custom("AddNote").with("notes", tricky))
        .unwrap();
    assert_eq!(recorder.form(0)["notes"], tricky);
}

#[test]
fn non_2xx_is_returned_as_a_response() {
    let body = r#"{"result":"error","message":"A user already exists with that email address"}"#;
    let recorder = Recorder::replying(vec![Ok(Response::new(400, body))]);

    let (decoded, response): (serde_json::Value, _) =
        dispatcher(&recorder).request(Params::new(Action::AddClient)).unwrap();
    assert_eq!(response.status_code, 400);
    assert_eq!(response.status, "400 Bad Request");
    assert_eq!(decoded["result"], "error");
}

#[test]
fn undecodable_body_keeps_the_response() {
    let recorder = Recorder::replying(vec![Ok(Response::new(502, "<html>bad gateway</html>"))]);
    let err = dispatcher(&recorder)
        .request::<serde_json::Value>(Params::new(Action::GetClients))
        .unwrap_err();
    match &err {
        ApiError::Decode { action, response, .. } => {
            assert_eq!(action, "GetClients");
            assert_eq!(response.status_code, 502);
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn transport_failure_has_no_response() {
    let recorder = Recorder::replying(vec![Err(TransportError::Timeout)]);
    let err = dispatcher(&recorder).send(Params::new(Action::GetClients)).unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::Timeout)));
    assert!(err.response().is_none());
}

#[test]
fn expired_deadline_never_reaches_the_transport() {
    let recorder = Recorder::replying(vec![Ok(Response::new(200, "{}"))]);
    let past = Instant::now() - Duration::from_secs(1);
    let err = dispatcher(&recorder)
        .send_with(Params::new(Action::GetClients), &CallOptions::default().with_deadline(past))
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::DeadlineExceeded)));
    assert_eq!(recorder.calls(), 0);
}

#[test]
fn per_call_timeout_is_carried_on_the_request() {
    let recorder = Recorder::replying(vec![]);
    let options = CallOptions::default().with_timeout(Duration::from_millis(250));
    let request = dispatcher(&recorder)
        .build_request(&Params::new(Action::GetClients), &options)
        .unwrap();
    assert_eq!(request.timeout, Some(Duration::from_millis(250)));
}

#[test]
fn ensure_client_falls_back_to_lookup_on_duplicate() {
    let recorder = Recorder::replying(vec![
        Ok(Response::new(
            400,
            r#"{"result":"error","message":"A client already exists with that email address"}"#,
        )),
        Ok(Response::new(
            200,
            r#"{"result":"success","userid":7,"client":{"id":7,"email":"testdude@example.com"}}"#,
        )),
    ]);
    let client = Client::with_transport(ClientConfig::new("http://billing.example.com", auth()), recorder.clone())
        .unwrap();
    let request = AddClientRequest {
        firstname: "Test".into(),
        lastname: "Dude".into(),
        email: "testdude@example.com".into(),
        address1: "123 Fake Street".into(),
        city: "Brisbane".into(),
        state: "Queensland".into(),
        postcode: "4000".into(),
        country: "AU".into(),
        phonenumber: "1234123123".into(),
        ..Default::default()
    };

    let account = idiom::ensure_client(&client, &request).unwrap();
    assert_eq!(account.id, 7);
    assert_eq!(recorder.form(0)["action"], "AddClient");
    assert_eq!(recorder.form(1)["action"], "GetClientsDetails");
    assert_eq!(recorder.form(1)["email"], "testdude@example.com");
}

#[test]
fn ensure_client_surfaces_other_failures() {
    let recorder = Recorder::replying(vec![Ok(Response::new(
        200,
        r#"{"result":"error","message":"Invalid country"}"#,
    ))]);
    let client = Client::with_transport(ClientConfig::new("http://billing.example.com", auth()), recorder.clone())
        .unwrap();
    let request = AddClientRequest {
        firstname: "Test".into(),
        lastname: "Dude".into(),
        email: "testdude@example.com".into(),
        address1: "1 Road".into(),
        city: "Brisbane".into(),
        state: "Queensland".into(),
        postcode: "4000".into(),
        country: "AU".into(),
        phonenumber: "1".into(),
        ..Default::default()
    };

    let err = idiom::ensure_client(&client, &request).unwrap_err();
    assert_eq!(err.remote_status().unwrap().message.as_deref(), Some("Invalid country"));
    assert_eq!(recorder.calls(), 1);
}
