//! End-to-end tests against an in-process SMC stand-in.
//!
//! These tests run the real reqwest transport over loopback HTTP to verify
//! discovery, cookie handling, per-domain sessions and logout.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use smc_application::{LogoutOutcome, Session, SessionError};
use smc_domain::LoginParams;
use smc_infrastructure::ReqwestTransportFactory;
use tokio::net::TcpListener;

const API_KEY: &str = "secret";

#[derive(Default)]
struct Sessions {
    next: usize,
    active: HashMap<String, String>,
    logins: Vec<String>,
    logouts: Vec<String>,
}

#[derive(Clone)]
struct FakeSmc {
    base: String,
    sessions: Arc<Mutex<Sessions>>,
}

impl FakeSmc {
    fn open(&self, domain: &str) -> Response {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.next += 1;
        let id = format!("sid-{}", sessions.next);
        sessions.active.insert(id.clone(), domain.to_string());
        sessions.logins.push(domain.to_string());
        (
            StatusCode::OK,
            [(header::SET_COOKIE, format!("JSESSIONID={id}; Path=/; HttpOnly"))],
        )
            .into_response()
    }

    fn session_of(&self, headers: &HeaderMap) -> Option<(String, String)> {
        let cookie = headers.get(header::COOKIE)?.to_str().ok()?;
        let id = cookie
            .split(';')
            .filter_map(|pair| pair.trim().strip_prefix("JSESSIONID="))
            .next()?;
        let sessions = self.sessions.lock().unwrap();
        let domain = sessions.active.get(id)?;
        Some((id.to_string(), domain.clone()))
    }
}

async fn versions() -> Json<Value> {
    Json(json!({"version": [{"rel": "6.4"}, {"rel": "6.6"}, {"rel": "6.5"}]}))
}

async fn entry_points(State(smc): State<FakeSmc>) -> Json<Value> {
    let base = &smc.base;
    Json(json!({"entry_point": [
        {"rel": "logout", "href": format!("{base}/6.6/logout"), "type": "logout"},
        {"rel": "current_user", "href": format!("{base}/6.6/current_user"), "type": "api_client"},
    ]}))
}

async fn login(State(smc): State<FakeSmc>, Json(body): Json<Value>) -> Response {
    if body["authenticationkey"] != API_KEY {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let domain = body["domain"].as_str().unwrap_or_default().to_string();
    smc.open(&domain)
}

async fn lms_login(
    State(smc): State<FakeSmc>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if query.get("login").map(String::as_str) != Some("admin")
        || query.get("pwd").map(String::as_str) != Some("p&ss")
    {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let domain = body["domain"].as_str().unwrap_or_default().to_string();
    smc.open(&domain)
}

async fn current_user(State(smc): State<FakeSmc>, headers: HeaderMap) -> Response {
    match smc.session_of(&headers) {
        Some((_, domain)) => Json(json!({
            "value": format!("{}/6.6/elements/api_client/{domain}", smc.base)
        }))
        .into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn log_schema(State(smc): State<FakeSmc>, headers: HeaderMap) -> Response {
    match smc.session_of(&headers) {
        Some(_) => Json(json!({"fields": ["Timestamp", "Src"]})).into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn logout(State(smc): State<FakeSmc>, headers: HeaderMap) -> StatusCode {
    let Some((id, domain)) = smc.session_of(&headers) else {
        return StatusCode::UNAUTHORIZED;
    };
    let mut sessions = smc.sessions.lock().unwrap();
    sessions.active.remove(&id);
    sessions.logouts.push(domain);
    StatusCode::NO_CONTENT
}

async fn start() -> FakeSmc {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let smc = FakeSmc {
        base,
        sessions: Arc::new(Mutex::new(Sessions::default())),
    };

    let app = Router::new()
        .route("/api", get(versions))
        .route("/6.6/api", get(entry_points))
        .route("/6.6/login", post(login))
        .route("/6.6/lms_login", post(lms_login))
        .route("/6.6/current_user", get(current_user))
        .route("/6.6/monitoring/log/schemas", get(log_schema))
        .route("/6.6/logout", put(logout))
        .with_state(smc.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    smc
}

fn session() -> Session<ReqwestTransportFactory> {
    Session::new(ReqwestTransportFactory::new())
}

#[tokio::test]
async fn test_login_uses_session_cookie() {
    let smc = start().await;
    let mut session = session();

    session
        .login(LoginParams::new(format!("{}/", smc.base)).with_api_key(API_KEY))
        .await
        .expect("login failed");

    assert_eq!(session.api_version().unwrap().as_str(), "6.6");
    assert_eq!(session.session_id().as_deref(), Some("JSESSIONID=sid-1"));
    assert!(!session.is_secure());
    assert!(session.web_socket_url().unwrap().starts_with("ws://127.0.0.1:"));
    assert_eq!(
        session.current_user().await.unwrap(),
        Some(format!("{}/6.6/elements/api_client/Shared Domain", smc.base))
    );
    assert_eq!(
        session.log_schema().await.unwrap(),
        Some(json!({"fields": ["Timestamp", "Src"]}))
    );

    let report = session.logout().await;
    assert!(report.all_succeeded());
    assert_eq!(smc.sessions.lock().unwrap().logouts, vec!["Shared Domain"]);
}

#[tokio::test]
async fn test_lms_login_sends_encoded_query() {
    let smc = start().await;
    let mut session = session();

    session
        .login(LoginParams::new(smc.base.clone()).with_login("admin", "p&ss"))
        .await
        .expect("login failed");

    assert!(session.session_id().is_some());
    assert_eq!(smc.sessions.lock().unwrap().logins, vec!["Shared Domain"]);
}

#[tokio::test]
async fn test_rejected_key_reports_status() {
    let smc = start().await;
    let mut session = session();

    let error = session
        .login(LoginParams::new(smc.base.clone()).with_api_key("wrong"))
        .await
        .unwrap_err();

    assert_eq!(error.status(), Some(401));
    assert!(error.to_string().contains("Unauthorized"));
    assert!(!session.is_logged_in());
}

#[tokio::test]
async fn test_domains_keep_their_own_cookies() {
    let smc = start().await;
    let mut session = session();
    session
        .login(LoginParams::new(smc.base.clone()).with_api_key(API_KEY))
        .await
        .unwrap();

    session.switch_domain("Eng").await.unwrap();
    let eng_user = session.current_user().await.unwrap();
    session.switch_domain("Shared Domain").await.unwrap();
    let shared_user = session.current_user().await.unwrap();

    assert_eq!(
        eng_user,
        Some(format!("{}/6.6/elements/api_client/Eng", smc.base))
    );
    assert_eq!(
        shared_user,
        Some(format!("{}/6.6/elements/api_client/Shared Domain", smc.base))
    );
    assert_eq!(
        smc.sessions.lock().unwrap().logins,
        vec!["Shared Domain", "Eng"]
    );

    let report = session.logout().await;
    assert_eq!(report.outcome("Eng"), Some(&LogoutOutcome::LoggedOut));
    assert_eq!(report.outcome("Shared Domain"), Some(&LogoutOutcome::LoggedOut));
    assert!(smc.sessions.lock().unwrap().active.is_empty());
}

#[tokio::test]
async fn test_refresh_opens_new_server_session() {
    let smc = start().await;
    let mut session = session();
    session
        .login(LoginParams::new(smc.base.clone()).with_api_key(API_KEY))
        .await
        .unwrap();

    session.refresh().await.unwrap();

    assert_eq!(session.session_id().as_deref(), Some("JSESSIONID=sid-2"));
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let mut session = session();

    let error = session
        .login(LoginParams::new(base).with_api_key(API_KEY))
        .await
        .unwrap_err();

    assert!(matches!(error, SessionError::Connection { status: None, .. }));
}
