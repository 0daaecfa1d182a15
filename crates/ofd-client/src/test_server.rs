//! In-process stand-in for the OFD cabinet API, for tests.
//!
//! Routes are matched on method + path only; query strings are recorded but
//! ignored for matching. When a login token is configured, GET requests
//! without a matching `X-XSRF-TOKEN` header get 401.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};

use crate::config::{Credentials, OfdConfig};
use crate::transport::TOKEN_HEADER;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: String,
    pub token: Option<String>,
    pub body: String,
}

impl Recorded {
    /// Value of one query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then_some(value)
        })
    }
}

struct Shared {
    routes: HashMap<(Method, String), (u16, String)>,
    token: Option<String>,
    requests: Mutex<Vec<Recorded>>,
}

#[derive(Default)]
pub struct MockOfdBuilder {
    routes: HashMap<(Method, String), (u16, String)>,
    token: Option<String>,
}

impl MockOfdBuilder {
    /// Login succeeds with `token`, and GETs must present it.
    pub fn login(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self.post_raw(
            crate::session::LOGIN_PATH,
            200,
            &json!({ "authToken": token }).to_string(),
        )
    }

    pub fn json(self, path: &str, body: Value) -> Self {
        self.raw(path, 200, &body.to_string())
    }

    pub fn raw(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert((Method::GET, path.to_string()), (status, body.to_string()));
        self
    }

    pub fn post_raw(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert((Method::POST, path.to_string()), (status, body.to_string()));
        self
    }

    pub async fn start(self) -> MockOfd {
        let shared = Arc::new(Shared {
            routes: self.routes,
            token: self.token,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new().fallback(handle).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockOfd { addr, shared }
    }
}

pub struct MockOfd {
    addr: SocketAddr,
    shared: Arc<Shared>,
}

impl MockOfd {
    pub fn builder() -> MockOfdBuilder {
        MockOfdBuilder::default()
    }

    /// Client config pointed at this server.
    pub fn config(&self) -> OfdConfig {
        let mut config =
            OfdConfig::with_credentials(Credentials::new("user@example.com", "secret"));
        config.service.base_url = format!("http://{}", self.addr);
        config.service.timeout_secs = 5;
        config
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let path = uri.path().to_string();

    shared.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().unwrap_or_default().to_string(),
        token: token.clone(),
        body,
    });

    if method == Method::GET {
        if let Some(expected) = &shared.token {
            if token.as_deref() != Some(expected.as_str()) {
                return StatusCode::UNAUTHORIZED.into_response();
            }
        }
    }

    match shared.routes.get(&(method, path)) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
