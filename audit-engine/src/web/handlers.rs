//! Webhook endpoint handlers.
//!
//! The sale webhook runs the whole pipeline inline:
//! 1. Decode the form body and extract the sale
//! 2. Generate the audit (falls back on completion failure)
//! 3. Email the audit
//! 4. Acknowledge with a JSON summary
//!
//! Delivery failures still return 200; the outcome is reported in the body.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::notify::{deliver_audit, AuditTemplates, EmailClient};
use crate::report::{generate_audit, CompletionClient};
use crate::sale::{decode_form, extract_sale};
use crate::web::error::WebhookError;
use crate::web::response::{build_response, ENGINE_HEADER, ENGINE_HEADER_VALUE};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub completion: CompletionClient,
    pub email: EmailClient,
    pub templates: Arc<AuditTemplates>,
}

impl AppState {
    /// Build state from configuration, sharing one HTTP pool between both APIs.
    ///
    /// Fails only if the built-in email templates do not compile.
    pub fn new(config: Config, http: Client) -> Result<Self, tera::Error> {
        Ok(Self {
            completion: CompletionClient::from_config(http.clone(), &config),
            email: EmailClient::from_config(http, &config),
            templates: Arc::new(AuditTemplates::load()?),
            config: Arc::new(config),
        })
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Sale Webhook
// =============================================================================

/// Sale webhook endpoint.
pub async fn sale_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, WebhookError> {
    let started = Instant::now();

    info!(
        body_length = body.len(),
        started_at = %Utc::now().to_rfc3339(),
        "sale_webhook_received"
    );

    let fields = decode_form(&body)?;
    let sale = extract_sale(&fields)?;

    let report = generate_audit(&state.completion, &sale.business_url).await;
    info!(
        order_id = %sale.order_id,
        was_fallback = report.was_fallback(),
        "audit_ready"
    );

    let outcome = deliver_audit(
        &state.email,
        &state.templates,
        &sale,
        &report,
        &state.config.scheduling_url,
    )
    .await;

    if let Some(e) = outcome.error() {
        error!(
            order_id = %sale.order_id,
            customer_email = %sale.email,
            error = %e,
            "sale_webhook_delivery_failed"
        );
    }

    let payload = build_response(
        &sale,
        &report,
        &outcome,
        &state.config.audit_domain,
        started.elapsed(),
        Utc::now(),
    );

    info!(
        order_id = %sale.order_id,
        success = payload.success,
        processing_time_ms = payload.metadata.processing_time_ms,
        "sale_webhook_complete"
    );

    Ok(([(ENGINE_HEADER, ENGINE_HEADER_VALUE)], Json(payload)).into_response())
}

/// Reject any method other than POST on the webhook path.
pub async fn method_not_allowed(method: Method) -> WebhookError {
    warn!(method = %method, "sale_webhook_method_not_allowed");
    WebhookError::MethodNotAllowed(method.to_string())
}

/// Convert a handler panic into a JSON 500.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(error = %detail, "handler_panicked");

    WebhookError::Internal(detail).into_response()
}
