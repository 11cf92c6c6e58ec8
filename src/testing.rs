//! A local stand-in for the Cloudflare API and a public IP resolver

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub(crate) const TOKEN: &str = "test-token";
pub(crate) const ZONE_ID: &str = "023e105f4ecef8ad9ca31a8372d0c353";
pub(crate) const RECORD_ID: &str = "372e67954025e0ba6aaa6d586b9e0b59";

#[derive(Clone)]
pub(crate) struct Mock {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    record_type: &'static str,
    record_content: String,
    record_has_zone: bool,
    public_ip: String,
    resolver_stalls: bool,
    updates: Vec<Value>,
}

impl Mock {
    pub(crate) fn new(record_content: &str, public_ip: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                record_type: "A",
                record_content: record_content.to_string(),
                record_has_zone: true,
                public_ip: public_ip.to_string(),
                resolver_stalls: false,
                updates: Vec::new(),
            })),
        }
    }

    /// Serves an `AAAA` record instead of an `A` one
    pub(crate) fn aaaa(self) -> Self {
        self.inner.lock().unwrap().record_type = "AAAA";
        self
    }

    /// Leaves `zone_id` and `zone_name` out of the record
    pub(crate) fn without_record_zone(self) -> Self {
        self.inner.lock().unwrap().record_has_zone = false;
        self
    }

    /// Makes the resolver endpoint hang instead of answering
    pub(crate) fn stalling_resolver(self) -> Self {
        self.inner.lock().unwrap().resolver_stalls = true;
        self
    }

    pub(crate) fn set_public_ip(&self, ip: &str) {
        self.inner.lock().unwrap().public_ip = ip.to_string();
    }

    pub(crate) fn record_content(&self) -> String {
        self.inner.lock().unwrap().record_content.clone()
    }

    pub(crate) fn updates(&self) -> Vec<Value> {
        self.inner.lock().unwrap().updates.clone()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/ip", get(public_ip))
            .route("/client/v4/zones", get(zones))
            .route("/client/v4/zones/{zone}/dns_records", get(records))
            .route("/client/v4/zones/{zone}/dns_records/{id}", put(update))
            .with_state(self.clone())
    }

    /// Serves the mock on an ephemeral port, returning its base URL
    pub(crate) async fn serve(&self) -> String {
        serve(self.router()).await
    }

    /// Serves the mock on an already bound listener
    pub(crate) fn serve_on(&self, listener: TcpListener) -> String {
        serve_on(listener, self.router())
    }
}

/// Serves `app` on an ephemeral port, returning its base URL
pub(crate) async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    serve_on(listener, app)
}

fn serve_on(listener: TcpListener, app: Router) -> String {
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });
    format!("http://{addr}")
}

fn record(inner: &Inner) -> Value {
    let mut record = json!({
        "id": RECORD_ID,
        "name": "home.example.com",
        "type": inner.record_type,
        "content": inner.record_content,
        "proxiable": true,
        "proxied": false,
        "ttl": 1,
        "locked": false,
        "comment": null,
        "tags": [],
    });
    if inner.record_has_zone {
        record["zone_id"] = json!(ZONE_ID);
        record["zone_name"] = json!("example.com");
    }
    record
}

fn api_error(status: StatusCode, code: u32, message: &str) -> Response {
    (
        status,
        Json(json!({
            "result": null,
            "success": false,
            "errors": [{"code": code, "message": message}],
            "messages": [],
        })),
    )
        .into_response()
}

fn envelope(result: Value) -> Response {
    Json(json!({"result": result, "success": true, "errors": [], "messages": []})).into_response()
}

fn authorized(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {TOKEN}");
    if headers.get(AUTHORIZATION).and_then(|hv| hv.to_str().ok()) == Some(expected.as_str()) {
        return Ok(());
    }
    Err(api_error(StatusCode::FORBIDDEN, 9109, "Invalid access token"))
}

async fn public_ip(State(mock): State<Mock>) -> String {
    let (stalls, ip) = {
        let inner = mock.inner.lock().unwrap();
        (inner.resolver_stalls, inner.public_ip.clone())
    };
    if stalls {
        tokio::time::sleep(Duration::from_secs(30)).await;
    }
    format!("{ip}\n")
}

async fn zones(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let found = query.get("name").map(String::as_str) == Some("example.com")
        && query.get("status").map(String::as_str) == Some("active");
    let zones = if found {
        json!([{"id": ZONE_ID, "name": "example.com", "status": "active", "type": "full"}])
    } else {
        json!([])
    };
    envelope(zones)
}

async fn records(
    State(mock): State<Mock>,
    headers: HeaderMap,
    Path(zone): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    let inner = mock.inner.lock().unwrap();
    let found = zone == ZONE_ID
        && query.get("name").map(String::as_str) == Some("home.example.com")
        && query.get("type").map(String::as_str) == Some(inner.record_type);
    let records = if found {
        json!([record(&inner)])
    } else {
        json!([])
    };
    envelope(records)
}

async fn update(
    State(mock): State<Mock>,
    headers: HeaderMap,
    Path((zone, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorized(&headers) {
        return rejection;
    }
    if (zone.as_str(), id.as_str()) != (ZONE_ID, RECORD_ID) {
        return api_error(StatusCode::NOT_FOUND, 81044, "Record does not exist.");
    }
    let mut inner = mock.inner.lock().unwrap();
    inner.record_content = body["content"].as_str().unwrap_or_default().to_string();
    inner.updates.push(body);
    envelope(record(&inner))
}
