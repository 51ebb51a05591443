//! Stub rover endpoint for probe and forwarding tests

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Nothing listens here
pub const UNREACHABLE: &str = "127.0.0.1:1";

/// A running stub rover; `address` has no scheme, like a registered address
pub struct StubRover {
    pub address: String,
    pub forwarded: Arc<Mutex<Vec<Value>>>,
}

/// Serve `GET /status` with `report` and record every `POST /command`
pub async fn stub_rover(report: Value) -> StubRover {
    let forwarded: Arc<Mutex<Vec<Value>>> = Arc::default();
    let sink = forwarded.clone();

    let router = Router::new()
        .route(
            "/status",
            get(move || {
                let report = report.clone();
                async move { Json(report) }
            }),
        )
        .route(
            "/command",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    sink.lock().await.push(body);
                    Json(json!({"ok": true}))
                }
            }),
        );

    StubRover {
        address: serve(router).await,
        forwarded,
    }
}

/// Serve an arbitrary router on an ephemeral port
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr.to_string()
}
