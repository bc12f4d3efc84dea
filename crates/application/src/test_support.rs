//! In-memory management server used by the unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use smc_domain::{EntryPointRegistry, HttpMethod, TransportRequest, TransportResponse};

use crate::ports::{ConnectOptions, ResourceRegistrar, Transport, TransportError, TransportFactory};

pub const BASE: &str = "https://smc.example.com:8082";

/// One request as seen by the fake server.
#[derive(Debug, Clone)]
pub struct Call {
    /// Which transport sent it; ids start at 1 in connect order.
    pub transport: usize,
    /// Domain the transport logged in to, if it did.
    pub domain: Option<String>,
    pub request: TransportRequest,
}

type Override = dyn Fn(&Call) -> Option<Result<TransportResponse, TransportError>> + Send + Sync;

/// Scripted server shared by every transport a [`FakeFactory`] opens.
pub struct FakeServer {
    calls: Mutex<Vec<Call>>,
    connects: AtomicUsize,
    override_fn: Mutex<Option<Arc<Override>>>,
}

impl FakeServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            connects: AtomicUsize::new(0),
            override_fn: Mutex::new(None),
        })
    }

    /// Replaces the default answer for calls where `f` returns `Some`.
    pub fn set_override(
        &self,
        f: impl Fn(&Call) -> Option<Result<TransportResponse, TransportError>>
            + Send
            + Sync
            + 'static,
    ) {
        *self.override_fn.lock().expect("Lock poisoned") = Some(Arc::new(f));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("Lock poisoned").clone()
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Number of requests with `method` whose URL ends with `suffix`.
    pub fn count(&self, method: HttpMethod, suffix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.request.method == method && c.request.url.ends_with(suffix))
            .count()
    }

    pub fn login_calls(&self) -> usize {
        self.count(HttpMethod::Post, "/login") + self.count(HttpMethod::Post, "/lms_login")
    }

    fn answer(&self, call: &Call) -> Result<TransportResponse, TransportError> {
        let custom = self.override_fn.lock().expect("Lock poisoned").clone();
        if let Some(f) = custom
            && let Some(answer) = f(call)
        {
            return answer;
        }
        Ok(default_answer(&call.request))
    }
}

fn default_answer(request: &TransportRequest) -> TransportResponse {
    let url = request.url.as_str();
    match request.method {
        HttpMethod::Get if url == format!("{BASE}/api") => TransportResponse::json_body(
            200,
            &json!({"version": [{"rel": "6.1"}, {"rel": "6.2"}, {"rel": "6.5"}]}),
        ),
        HttpMethod::Get if url.ends_with("/api") => {
            let version = url
                .trim_start_matches(BASE)
                .trim_start_matches('/')
                .trim_end_matches("/api");
            TransportResponse::json_body(
                200,
                &json!({"entry_point": [
                    {"rel": "logout", "href": format!("{BASE}/{version}/logout"), "type": "logout"},
                    {
                        "rel": "current_user",
                        "href": format!("{BASE}/{version}/current_user"),
                        "type": "api_client"
                    },
                    {
                        "rel": "elements",
                        "href": format!("{BASE}/{version}/elements"),
                        "type": "elements"
                    }
                ]}),
            )
        }
        HttpMethod::Post if url.ends_with("/login") || url.ends_with("/lms_login") => {
            TransportResponse::empty(200)
        }
        HttpMethod::Put if url.ends_with("/logout") => TransportResponse::empty(204),
        HttpMethod::Get if url.ends_with("/current_user") => TransportResponse::json_body(
            200,
            &json!({"value": format!("{BASE}/6.5/elements/api_client/7")}),
        ),
        HttpMethod::Get if url.ends_with("/monitoring/log/schemas") => {
            if request.header("cookie").is_some() {
                TransportResponse::json_body(200, &json!({"fields": ["Timestamp"]}))
            } else {
                TransportResponse::empty(401)
            }
        }
        _ => TransportResponse::empty(404),
    }
}

/// Factory whose transports talk to a [`FakeServer`].
#[derive(Clone)]
pub struct FakeFactory {
    pub server: Arc<FakeServer>,
}

impl FakeFactory {
    pub fn new() -> (Self, Arc<FakeServer>) {
        let server = FakeServer::new();
        (
            Self {
                server: server.clone(),
            },
            server,
        )
    }
}

impl TransportFactory for FakeFactory {
    fn connect(&self, _options: &ConnectOptions) -> Result<Arc<dyn Transport>, TransportError> {
        let id = self.server.connects.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Arc::new(FakeTransport {
            id,
            server: self.server.clone(),
            domain: Mutex::new(None),
            session: Mutex::new(None),
        }))
    }
}

struct FakeTransport {
    id: usize,
    server: Arc<FakeServer>,
    domain: Mutex<Option<String>>,
    session: Mutex<Option<String>>,
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let is_login = request.method == HttpMethod::Post
            && (request.url.ends_with("/login") || request.url.ends_with("/lms_login"));
        if is_login {
            let domain = request
                .json
                .as_ref()
                .and_then(|body| body.get("domain"))
                .and_then(|d| d.as_str())
                .map(str::to_string);
            *self.domain.lock().expect("Lock poisoned") = domain;
        }

        let call = Call {
            transport: self.id,
            domain: self.domain.lock().expect("Lock poisoned").clone(),
            request: request.clone(),
        };
        self.server
            .calls
            .lock()
            .expect("Lock poisoned")
            .push(call.clone());

        let answer = self.server.answer(&call);
        if is_login && matches!(&answer, Ok(r) if r.status.as_u16() == 200) {
            *self.session.lock().expect("Lock poisoned") = Some(format!("sid-{}", self.id));
        }
        answer
    }

    fn cookie(&self, name: &str) -> Option<String> {
        if name == "JSESSIONID" {
            self.session.lock().expect("Lock poisoned").clone()
        } else {
            None
        }
    }
}

/// Registrar that counts invocations.
#[derive(Clone, Default)]
pub struct CountingRegistrar {
    pub calls: Arc<AtomicUsize>,
}

impl ResourceRegistrar for CountingRegistrar {
    fn register(&self, entry_points: &EntryPointRegistry) {
        assert!(!entry_points.is_empty());
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
