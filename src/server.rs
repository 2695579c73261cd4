//! Content API server.
//!
//! Serves the site's collections as JSON and relays contact form posts to
//! the contact webhook, so a static front end can run without direct
//! store credentials.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/collections/{name}` | All records: `{ "items": [...] }` |
//! | `GET`  | `/collections/{name}/{id}` | One record |
//! | `POST` | `/contact` | Relay a contact form to the webhook |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "record not found: faqs/x" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `store_error` (502),
//! `webhook_error` (502).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the site can call the
//! API from the browser.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::error::StoreError;
use crate::store::{create_store, DataService, DocumentStore, ItemsPage};
use crate::webhook::{ContactForm, ContactTransport, ContactWebhook};

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    service: Arc<DataService<Box<dyn DocumentStore>>>,
    contact: Arc<dyn ContactTransport>,
}

/// Starts the server with the store and webhook named in `config`.
///
/// Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = create_store(&config.store)?;
    run_server_with_store(config, store).await
}

/// Starts the server over an already-built store backend.
pub async fn run_server_with_store(
    config: &Config,
    store: Box<dyn DocumentStore>,
) -> anyhow::Result<()> {
    let contact = ContactWebhook::new(&config.contact.webhook_url, config.contact.timeout_secs)?;
    let app = router(store, Arc::new(contact));

    let bind_addr = config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "content API listening");
    println!("Content API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router. Exposed for embedding in another axum app.
pub fn router(store: Box<dyn DocumentStore>, contact: Arc<dyn ContactTransport>) -> Router {
    let state = AppState {
        service: Arc::new(DataService::new(store)),
        contact,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/collections/{name}", get(handle_list))
        .route("/collections/{name}/{id}", get(handle_get))
        .route("/contact", post(handle_contact))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::NotFound { .. } | StoreError::UnknownCollection(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::BAD_GATEWAY,
        };
        let code = if status == StatusCode::NOT_FOUND {
            "not_found"
        } else {
            "store_error"
        };
        AppError {
            status,
            code,
            message: err.to_string(),
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /collections ============

async fn handle_list(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ItemsPage<Value>>, AppError> {
    Ok(Json(state.service.get_all::<Value>(&name).await?))
}

async fn handle_get(
    State(state): State<AppState>,
    Path((name, id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.service.get_by_id::<Value>(&name, &id).await?))
}

// ============ POST /contact ============

async fn handle_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<Value>, AppError> {
    form.validate().map_err(|e| AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: e.to_string(),
    })?;

    state
        .contact
        .submit(&form)
        .await
        .map_err(|e| AppError {
            status: StatusCode::BAD_GATEWAY,
            code: "webhook_error",
            message: e.to_string(),
        })?;

    Ok(Json(serde_json::json!({ "ok": true })))
}
