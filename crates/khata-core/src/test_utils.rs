//! Test utilities for khata-core
//!
//! Mock HTTP servers for integration tests: an OpenRouter-compatible
//! chat-completions server and an exchange-rate API server, both bound to an
//! ephemeral local port with graceful shutdown on drop.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Canned extraction response mirroring a typical food-delivery receipt
pub const SWIGGY_RESPONSE: &str = r#"Here is the extracted expense information:
{"amount": 457.9, "currency": "INR", "description": "Swiggy food order", "category": "food_dining", "merchant": "Swiggy", "payment_method": "upi", "transaction_date": "2024-12-15", "confidence_score": 0.92, "is_transaction": true}"#;

/// Mock OpenRouter server for testing
pub struct MockOpenRouterServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOpenRouterServer {
    /// Start a mock server that answers every completion with the Swiggy fixture
    pub async fn start() -> Self {
        Self::start_with_response(SWIGGY_RESPONSE).await
    }

    /// Start a mock server with a fixed completion response
    pub async fn start_with_response(response: &str) -> Self {
        let response = Arc::new(response.to_string());
        let app = Router::new()
            .route("/models", get(handle_models))
            .route("/chat/completions", post(handle_chat_completions))
            .with_state(response);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOpenRouterServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Models endpoint (health check)
async fn handle_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        data: vec![ModelEntry {
            id: "openai/gpt-4".to_string(),
        }],
    })
}

/// Chat-completions endpoint, echoing the configured canned response
async fn handle_chat_completions(
    State(response): State<Arc<String>>,
    Json(request): Json<ChatCompletionRequest>,
) -> Json<ChatCompletionResponse> {
    Json(ChatCompletionResponse {
        model: request.model,
        choices: vec![Choice {
            message: ResponseMessage {
                role: "assistant".to_string(),
                content: response.as_str().to_string(),
            },
        }],
    })
}

/// Mock exchange-rate API server
///
/// Serves `GET /{code}` with a fixed INR rate, matching the
/// `{"rates": {"INR": ...}}` shape the currency converter expects.
pub struct MockExchangeServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockExchangeServer {
    /// Start a mock server returning the given INR rate for every currency
    pub async fn start(inr_rate: f64) -> Self {
        let app = Router::new()
            .route("/:code", get(handle_rates))
            .with_state(inr_rate);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockExchangeServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_rates(State(rate): State<f64>, Path(_code): Path<String>) -> Json<RatesResponse> {
    Json(RatesResponse {
        rates: Rates { inr: rate },
    })
}

// Request/Response types for the mock servers

#[derive(Debug, Serialize)]
struct ModelsResponse {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Serialize)]
struct ModelEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionRequest {
    model: String,
    #[allow(dead_code)]
    messages: Vec<RequestMessage>,
}

#[derive(Debug, Deserialize)]
struct RequestMessage {
    #[allow(dead_code)]
    role: String,
    #[allow(dead_code)]
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<Choice>,
}

#[derive(Debug, Serialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Serialize)]
struct ResponseMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct RatesResponse {
    rates: Rates,
}

#[derive(Debug, Serialize)]
struct Rates {
    #[serde(rename = "INR")]
    inr: f64,
}
