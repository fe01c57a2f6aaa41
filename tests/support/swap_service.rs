use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context as _, Result};
use axum::extract::{Json, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

pub const KNOWN_SWAP_ID: &str = "abc123";

pub struct SwapServiceFixture {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl SwapServiceFixture {
    pub async fn start() -> Result<Self> {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
            .await
            .context("bind swap service fixture")?;
        let addr = listener.local_addr().context("fixture local addr")?;

        let app = Router::new()
            .route("/ping", get(|| async { "pong" }))
            .route("/slow", get(slow))
            .route("/rate/{from}/{to}/{amount}", get(rate))
            .route("/swap", post(create_swap))
            .route("/swap/status/{swap_id}", get(status));

        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::warn!(error = %err, "swap service fixture stopped");
            }
        });

        Ok(Self { addr, handle })
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

impl Drop for SwapServiceFixture {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "pong"
}

async fn rate(Path((from, to, amount)): Path<(String, String, String)>) -> Response {
    if from == to {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "source and destination must differ" })),
        )
            .into_response();
    }
    Json(json!({
        "rate_with_commission": 150.2,
        "min_amount": 0.001,
        "echo": format!("{from}/{to}/{amount}"),
    }))
    .into_response()
}

async fn create_swap(Json(body): Json<Value>) -> Response {
    let amount = body.get("amount").cloned().unwrap_or(Value::Null);
    Json(json!({
        "transaction_id": KNOWN_SWAP_ID,
        "send_to": "addr1",
        "expected_amount": amount,
        "from_coin": body.get("from_coin").cloned().unwrap_or(Value::Null),
        "to_coin": body.get("to_coin").cloned().unwrap_or(Value::Null),
    }))
    .into_response()
}

async fn status(Path(swap_id): Path<String>) -> Response {
    if swap_id != KNOWN_SWAP_ID {
        return (StatusCode::NOT_FOUND, "swap not found").into_response();
    }
    Json(json!({
        "status": "waiting",
        "created_at": "2025-01-01T00:00:00Z",
        "deposit": {
            "amount": 0.5,
            "symbol": "btc",
            "address": "addr1",
            "address_explorer_url": "https://explorer.invalid/addr1",
        },
    }))
    .into_response()
}
