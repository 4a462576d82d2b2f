use mobile_probe::api::ApiClient;
use mobile_probe::session::{authenticate, registration_failure, AuthSource, Credentials, Session};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn creds() -> Credentials {
    Credentials {
        email: "testmobile@temple.com".into(),
        password: "password123".into(),
        full_name: "Test Mobile".into(),
    }
}

fn token_body(token: &str) -> serde_json::Value {
    json!({ "success": true, "data": { "token": token } })
}

/// Run the blocking flow off the async runtime and capture what it printed.
async fn run_authenticate(base_url: String) -> (anyhow::Result<Session>, String) {
    tokio::task::spawn_blocking(move || {
        let api = ApiClient::new(&base_url, None).unwrap();
        let mut out = Vec::new();
        let result = authenticate(&api, &creds(), &mut out);
        (result, String::from_utf8(out).unwrap())
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn existing_account_logs_in_without_registering() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({
            "email": "testmobile@temple.com",
            "password": "password123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("login-token")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(token_body("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let (result, printed) = run_authenticate(format!("{}/api", server.uri())).await;
    let session = result.unwrap();
    assert_eq!(session.token, "login-token");
    assert_eq!(session.source, AuthSource::Login);
    assert_eq!(session.email, "testmobile@temple.com");
    assert!(printed.contains("Logging in as testmobile@temple.com..."));
    assert!(printed.contains("Login successful. Token obtained."));
    assert!(!printed.contains("Trying registration"));
}

#[tokio::test]
async fn unknown_account_falls_back_to_registration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .and(body_json(json!({
            "email": "testmobile@temple.com",
            "password": "password123",
            "full_name": "Test Mobile"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(token_body("fresh-token")))
        .expect(1)
        .mount(&server)
        .await;

    let (result, printed) = run_authenticate(format!("{}/api", server.uri())).await;
    let session = result.unwrap();
    assert_eq!(session.token, "fresh-token");
    assert_eq!(session.source, AuthSource::Registration);
    assert!(printed.contains("Login failed: 401 Unauthorized"));
    assert!(printed.contains("Trying registration..."));
    assert!(printed.contains("Registration successful. Token obtained."));
}

#[tokio::test]
async fn login_without_token_field_counts_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "user": {} } })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(token_body("fresh-token")))
        .expect(1)
        .mount(&server)
        .await;

    let (result, printed) = run_authenticate(format!("{}/api", server.uri())).await;
    assert_eq!(result.unwrap().token, "fresh-token");
    assert!(printed.contains("Login failed: response missing data.token"));
}

#[tokio::test]
async fn malformed_login_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fresh-token")))
        .expect(1)
        .mount(&server)
        .await;

    let (result, printed) = run_authenticate(format!("{}/api", server.uri())).await;
    assert_eq!(result.unwrap().source, AuthSource::Registration);
    assert!(printed.contains("Login failed: invalid json body"));
}

#[tokio::test]
async fn both_attempts_failing_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("wrong password"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .respond_with(ResponseTemplate::new(409).set_body_string("email already taken"))
        .expect(1)
        .mount(&server)
        .await;

    let (result, printed) = run_authenticate(format!("{}/api", server.uri())).await;
    let err = result.unwrap_err();
    assert_eq!(registration_failure(&err), "409 Conflict - email already taken");
    let chain = format!("{:#}", err);
    assert!(chain.contains("401 Unauthorized - wrong password"), "{chain}");
    assert!(printed.contains("Trying registration..."));
    assert!(!printed.contains("Token obtained"));
}

#[test]
fn unreachable_server_fails_both_attempts() {
    let api = ApiClient::new("http://127.0.0.1:1/api", None).unwrap();
    let mut out = Vec::new();
    let err = authenticate(&api, &creds(), &mut out).unwrap_err();
    assert!(format!("{:#}", err).contains("registration failed"));
    let reason = registration_failure(&err);
    assert!(reason.starts_with("error sending request for url"), "{reason}");
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Login failed: error sending request for url"));
}
