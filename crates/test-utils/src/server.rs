//! In-process mock WCPS endpoint.
//!
//! The server runs on its own tokio runtime so tests can drive it with a
//! blocking HTTP client from the test thread.

use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Router};
use tokio::runtime::Runtime;

/// Path the mock endpoint is mounted on.
pub const OWS_PATH: &str = "/rasdaman/ows";

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: Arc<Vec<u8>>,
    received: Arc<Mutex<Vec<String>>>,
}

/// Mock WCPS server answering every query with a canned response.
///
/// Received `query` form fields are recorded in arrival order. The server
/// shuts down when the value is dropped.
pub struct MockWcpsServer {
    url: String,
    received: Arc<Mutex<Vec<String>>>,
    _runtime: Runtime,
}

impl MockWcpsServer {
    /// Start a server replying with `status` and `body`.
    pub fn start(status: u16, body: impl Into<Vec<u8>>) -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("build mock server runtime");

        let received = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: Arc::new(body.into()),
            received: received.clone(),
        };

        let app = Router::new()
            .route(OWS_PATH, post(handle_query))
            .with_state(state);

        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");

        runtime.spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            url: format!("http://{}{}", addr, OWS_PATH),
            received,
            _runtime: runtime,
        }
    }

    /// Start a server replying `200 OK` with `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::start(200, body)
    }

    /// Full endpoint URL, including the OWS path.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Query texts received so far.
    pub fn received_queries(&self) -> Vec<String> {
        self.received.lock().expect("received queries lock").clone()
    }
}

async fn handle_query(
    State(state): State<MockState>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Vec<u8>) {
    if let Some(query) = form.get("query") {
        state
            .received
            .lock()
            .expect("received queries lock")
            .push(query.clone());
    }
    (state.status, state.body.as_ref().clone())
}

/// URL of a local port with nothing listening on it.
pub fn unused_local_url() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind ephemeral listener");
    let port = listener.local_addr().expect("ephemeral listener address").port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, OWS_PATH)
}
