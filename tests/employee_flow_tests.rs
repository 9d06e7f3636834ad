//! End-to-end tests of the employee pages through the axum router
//!
//! Requests go through `axum_test::TestServer`; the session cookie issued on
//! login is sent back by hand on the following requests.

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use billed::prelude::*;
use billed::server::{SessionRegistry, build_routes};
use billed::storage::fixtures;
use serde_json::Value;
use std::future::IntoFuture;

const EMPLOYEE: [(&str, &str); 2] = [("email", "employee@test.tld"), ("password", "employee")];

fn server_with(builder: ServerBuilder) -> TestServer {
    TestServer::new(builder.build().unwrap()).unwrap()
}

fn mock_server(store: MockStore) -> TestServer {
    server_with(ServerBuilder::new().with_store(store))
}

fn in_memory_server() -> TestServer {
    let store = InMemoryStore::new("http://localhost:5678");
    store.seed(fixtures::bills()).unwrap();
    server_with(ServerBuilder::new().with_in_memory_store(store))
}

/// Server plus a view on its session registry
fn server_and_sessions(builder: ServerBuilder) -> (TestServer, SessionRegistry) {
    let state = builder.build_state().unwrap();
    let sessions = state.sessions.clone();
    (TestServer::new(build_routes(state)).unwrap(), sessions)
}

/// `name=value` part of the issued session cookie
fn session_cookie(response: &TestResponse) -> HeaderValue {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie issued")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("billed_session="));
    HeaderValue::from_str(set_cookie.split(';').next().unwrap()).unwrap()
}

fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect location")
        .to_str()
        .unwrap()
        .to_string()
}

async fn login_employee(server: &TestServer) -> HeaderValue {
    let response = server.post("/login/employee").form(&EMPLOYEE).await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employee/bills");
    session_cookie(&response)
}

fn test_jpg() -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(b"fake jpeg bytes".to_vec())
            .file_name("test.jpg")
            .mime_type("image/jpeg"),
    )
}

fn bill_form() -> [(&'static str, &'static str); 7] {
    [
        ("expense_type", "Transports"),
        ("expense_name", "Vol Paris Londres"),
        ("date", "2022-02-22"),
        ("amount", "348"),
        ("vat", "70"),
        ("pct", "20"),
        ("commentary", "séminaire"),
    ]
}

#[tokio::test]
async fn test_health_check() {
    let server = mock_server(MockStore::new());

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_login_page_opens_no_session() {
    let (server, sessions) = server_and_sessions(ServerBuilder::new().with_store(MockStore::new()));

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(sessions.is_empty());
    let html = response.text();
    assert!(html.contains(r#"data-testid="form-employee""#));
    assert!(html.contains(r#"data-testid="form-admin""#));
}

#[tokio::test]
async fn test_employee_pages_require_login() {
    let server = mock_server(MockStore::new());

    for path in ["/employee/bills", "/employee/bill/new"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::SEE_OTHER, "{}", path);
        assert_eq!(location(&response), "/");
    }

    let response = server.get("/api/bills").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_bills_page_after_login() {
    let server = mock_server(MockStore::new());
    let cookie = login_employee(&server).await;

    let response = server
        .get("/employee/bills")
        .add_header(header::COOKIE, cookie)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("Mes notes de frais"));
    assert!(html.contains(r#"data-testid='btn-new-bill'"#));
    assert_eq!(html.matches(r#"data-testid="icon-eye""#).count(), 4);

    let dates: Vec<usize> = ["04 Apr. 04", "03 Mar. 03", "02 Feb. 02", "01 Jan. 01"]
        .iter()
        .map(|date| html.find(date).expect("formatted date"))
        .collect();
    assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn test_bills_page_shows_store_rejection() {
    for err in [StoreError::not_found(), StoreError::server_error()] {
        let message = err.to_string();
        let server = mock_server(MockStore::new().failing_list(err));
        let cookie = login_employee(&server).await;

        let response = server
            .get("/employee/bills")
            .add_header(header::COOKIE, cookie)
            .await;

        let html = response.text();
        assert!(html.contains(&message), "{}", message);
        assert!(!html.contains(r#"data-testid="tbody""#));
    }
}

#[tokio::test]
async fn test_api_bills_returns_formatted_list() {
    let server = mock_server(MockStore::new());
    let cookie = login_employee(&server).await;

    let response = server
        .get("/api/bills")
        .add_header(header::COOKIE, cookie)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let bills: Vec<Value> = response.json();
    assert_eq!(bills.len(), 4);
    assert_eq!(bills[0]["formattedDate"], "04 Apr. 04");
    assert_eq!(bills[0]["formattedStatus"], "En attente");
    assert_eq!(bills[0]["date"], "2004-04-04");
}

#[tokio::test]
async fn test_api_bills_reports_rejection() {
    let server = mock_server(MockStore::new().failing_list(StoreError::server_error()));
    let cookie = login_employee(&server).await;

    let response = server
        .get("/api/bills")
        .add_header(header::COOKIE, cookie)
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORE_SERVER_ERROR");
    assert_eq!(body["message"], "Erreur 500");
}

#[tokio::test]
async fn test_new_bill_button_navigates() {
    let server = mock_server(MockStore::new());
    let cookie = login_employee(&server).await;

    let response = server
        .post("/employee/bills/new")
        .add_header(header::COOKIE, cookie.clone())
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employee/bill/new");

    let response = server
        .get("/employee/bill/new")
        .add_header(header::COOKIE, cookie)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains(r#"data-testid="form-new-bill""#));
}

#[tokio::test]
async fn test_eye_icon_opens_receipt_modal() {
    let server = mock_server(MockStore::new());
    let cookie = login_employee(&server).await;
    let url = fixtures::bills()[0].file_url.clone().unwrap();

    let response = server
        .get("/employee/bills/receipt")
        .add_query_param("bill_url", &url)
        .add_header(header::COOKIE, cookie)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains("<img"));
    assert!(html.contains(&tera::escape_html(&url)));
}

#[tokio::test]
async fn test_new_bill_flow_with_in_memory_store() {
    let server = in_memory_server();
    let cookie = login_employee(&server).await;

    let response = server
        .post("/employee/bill/new/file")
        .add_header(header::COOKIE, cookie.clone())
        .multipart(test_jpg())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains(r#"data-testid="attached-file">test.jpg<"#));

    let response = server
        .post("/employee/bill/new")
        .add_header(header::COOKIE, cookie.clone())
        .form(&bill_form())
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employee/bills");

    let bills: Vec<Value> = server
        .get("/api/bills")
        .add_header(header::COOKIE, cookie.clone())
        .await
        .json();
    assert_eq!(bills.len(), 5);
    let saved = bills
        .iter()
        .find(|bill| bill["name"] == "Vol Paris Londres")
        .expect("saved bill");
    assert_eq!(saved["status"], "pending");
    assert_eq!(saved["email"], "employee@test.tld");
    assert_eq!(saved["fileName"], "test.jpg");

    let file_url = saved["fileUrl"].as_str().unwrap();
    let path = file_url.strip_prefix("http://localhost:5678").unwrap();
    let receipt = server.get(path).await;
    assert_eq!(receipt.status_code(), StatusCode::OK);
    assert_eq!(receipt.as_bytes().as_ref(), b"fake jpeg bytes");

    let html = server
        .get("/employee/bills")
        .add_header(header::COOKIE, cookie)
        .await
        .text();
    assert!(html.contains("22 Feb. 22"));
}

#[tokio::test]
async fn test_rejected_file_clears_input() {
    let server = in_memory_server();
    let cookie = login_employee(&server).await;
    let pdf = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"%PDF".to_vec())
            .file_name("facture.pdf")
            .mime_type("application/pdf"),
    );

    let response = server
        .post("/employee/bill/new/file")
        .add_header(header::COOKIE, cookie)
        .multipart(pdf)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains(r#"data-testid="file-error""#));
    assert!(html.contains(r#"data-testid="file" value="""#));
    assert!(!html.contains(r#"data-testid="attached-file""#));
}

#[tokio::test]
async fn test_rejected_submission_keeps_form() {
    let store = MockStore::new().failing_update(StoreError::NotFound {
        message: "404".to_string(),
    });
    let server = mock_server(store);
    let cookie = login_employee(&server).await;

    server
        .post("/employee/bill/new/file")
        .add_header(header::COOKIE, cookie.clone())
        .multipart(test_jpg())
        .await;
    let response = server
        .post("/employee/bill/new")
        .add_header(header::COOKIE, cookie)
        .form(&bill_form())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let html = response.text();
    assert!(html.contains(r#"data-testid="submit-error">404<"#));
    assert!(html.contains(r#"value="Vol Paris Londres""#));
    assert!(html.contains(r#"data-testid="attached-file">test.jpg<"#));
}

#[tokio::test]
async fn test_concurrent_submissions_consume_draft_once() {
    let server = in_memory_server();
    let cookie = login_employee(&server).await;
    server
        .post("/employee/bill/new/file")
        .add_header(header::COOKIE, cookie.clone())
        .multipart(test_jpg())
        .await;

    let submissions = (0..3).map(|_| {
        server
            .post("/employee/bill/new")
            .add_header(header::COOKIE, cookie.clone())
            .form(&bill_form())
            .into_future()
    });
    let responses = futures::future::join_all(submissions).await;
    assert!(
        responses
            .iter()
            .all(|r| r.status_code() == StatusCode::SEE_OTHER)
    );

    let bills: Vec<Value> = server
        .get("/api/bills")
        .add_header(header::COOKIE, cookie)
        .await
        .json();
    let submitted: Vec<&Value> = bills
        .iter()
        .filter(|bill| bill["name"] == "Vol Paris Londres")
        .collect();
    assert_eq!(submitted.len(), 3);
    assert_eq!(
        submitted
            .iter()
            .filter(|bill| bill["fileName"] == "test.jpg")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_logout_clears_session() {
    let server = mock_server(MockStore::new());
    let cookie = login_employee(&server).await;

    let response = server
        .post("/logout")
        .add_header(header::COOKIE, cookie.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = server
        .get("/employee/bills")
        .add_header(header::COOKIE, cookie)
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_admin_cannot_reach_employee_pages() {
    let server = mock_server(MockStore::new());

    let response = server
        .post("/login/admin")
        .form(&[("email", "admin@test.tld"), ("password", "admin")])
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/dashboard");
    let cookie = session_cookie(&response);

    let response = server
        .get("/employee/bills")
        .add_header(header::COOKIE, cookie)
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_refused_login_shows_message() {
    let (server, sessions) = server_and_sessions(
        ServerBuilder::new().with_store(MockStore::new().failing_login(StoreError::server_error())),
    );

    let response = server.post("/login/employee").form(&EMPLOYEE).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(sessions.is_empty());
    let html = response.text();
    assert!(html.contains(r#"data-testid="login-error">Erreur 500<"#));
}

#[tokio::test]
async fn test_sessions_kept_only_while_logged_in() {
    let (server, sessions) = server_and_sessions(ServerBuilder::new().with_store(MockStore::new()));

    for _ in 0..50 {
        server.get("/").await;
        server.get("/employee/bills").await;
        server.get("/api/bills").await;
    }
    assert!(sessions.is_empty());

    let cookie = login_employee(&server).await;
    assert_eq!(sessions.len(), 1);

    let response = server
        .post("/logout")
        .add_header(header::COOKIE, cookie.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let expired = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(expired.contains("Max-Age=0"));
    assert!(sessions.is_empty());

    server
        .get("/employee/bills")
        .add_header(header::COOKIE, cookie)
        .await;
    assert!(sessions.is_empty());
}

/// Upload `part`, submit a bill with it and return the receipt path
async fn submit_with_receipt(server: &TestServer, cookie: &HeaderValue, part: Part) -> String {
    server
        .post("/employee/bill/new/file")
        .add_header(header::COOKIE, cookie.clone())
        .multipart(MultipartForm::new().add_part("file", part))
        .await;
    let response = server
        .post("/employee/bill/new")
        .add_header(header::COOKIE, cookie.clone())
        .form(&bill_form())
        .await;
    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

    let bills: Vec<Value> = server
        .get("/api/bills")
        .add_header(header::COOKIE, cookie.clone())
        .await
        .json();
    let saved = bills
        .iter()
        .find(|bill| bill["name"] == "Vol Paris Londres")
        .expect("saved bill");
    saved["fileUrl"]
        .as_str()
        .unwrap()
        .strip_prefix("http://localhost:5678")
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_receipt_served_as_image_whatever_the_declared_type() {
    let server = in_memory_server();
    let cookie = login_employee(&server).await;
    let part = Part::bytes(b"<script>alert(1)</script>".to_vec())
        .file_name("evil.jpg")
        .mime_type("text/html");

    let path = submit_with_receipt(&server, &cookie, part).await;
    let receipt = server.get(&path).await;

    assert_eq!(receipt.status_code(), StatusCode::OK);
    assert_eq!(receipt.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(receipt.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

#[tokio::test]
async fn test_receipt_with_reserved_characters_is_reachable() {
    let server = in_memory_server();
    let cookie = login_employee(&server).await;
    let part = Part::bytes(b"fake jpeg bytes".to_vec())
        .file_name("note #1.jpg")
        .mime_type("image/jpeg");

    let path = submit_with_receipt(&server, &cookie, part).await;
    assert!(path.ends_with("/note%20%231.jpg"), "{}", path);

    let receipt = server.get(&path).await;
    assert_eq!(receipt.status_code(), StatusCode::OK);
    assert_eq!(receipt.as_bytes().as_ref(), b"fake jpeg bytes");
}
