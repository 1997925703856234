//! In-process HTTP stub standing in for the Paymint backend
//!
//! An axum router whose fallback handler answers every request. Routes are
//! keyed by `"METHOD /path?query"`; each holds a queue of canned responses
//! and the last one repeats. Every request is recorded.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use paymint::{api::ApiClient, config::Config};
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub target: String,
    pub body: String,
}

#[derive(Clone, Default)]
struct StubState {
    routes: Arc<Mutex<HashMap<String, VecDeque<(u16, String)>>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct StubBackend {
    pub base: String,
    state: StubState,
}

impl StubBackend {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = StubState::default();

        let app = Router::new().fallback(replay).with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            state,
        }
    }

    /// Queue a response for `"METHOD /target"`
    pub fn route(&self, key: &str, status: u16, body: impl Into<String>) {
        self.state
            .routes
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back((status, body.into()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, target: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.target == target)
            .count()
    }

    pub fn client(&self) -> ApiClient {
        let config = Config {
            api_base: self.base.clone(),
            http_timeout: Duration::from_secs(5),
            retry_max: 2,
            retry_initial: Duration::from_millis(1),
            retry_max_delay: Duration::from_millis(5),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }
}

async fn replay(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> impl IntoResponse {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        target: target.clone(),
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let (status, payload) = {
        let mut routes = state.routes.lock().unwrap();
        match routes.get_mut(&format!("{} {}", method, target)) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or((500, String::new())),
            Some(queue) => queue.front().cloned().unwrap_or((500, String::new())),
            None => (404, "Not found".to_string()),
        }
    };

    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
}

pub fn invoice_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "payeeId": "0xpayee",
        "clientId": 4821,
        "payer": "client@example.com",
        "amount": 2_500_000_000u64,
        "surchargeBps": 250,
        "status": status,
        "service": "Brand refresh",
        "dueDate": 1_706_659_200,
        "objectId": "0xinvoiceobj"
    })
}

pub fn payroll_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "issuer": "0xissuer",
        "clientEmail": "ops@client.io",
        "recipients": [
            {"wallet": "0xa", "amount": 1_500_000_000u64},
            {"wallet": "0xb", "amount": 500_000_000u64}
        ],
        "totalAmount": 2_000_000_000u64,
        "surchargeBps": 250,
        "metadataHash": "0x",
        "dueDate": 1_709_294_400,
        "createdAt": 1_700_000_000,
        "status": status,
        "projectName": "Launch",
        "objectId": "0xpayrollobj"
    })
}

pub const CONTRACT_INFO: &str = r#"{"packageId":"0xpkg","platformRecipient":"0xplatform"}"#;
