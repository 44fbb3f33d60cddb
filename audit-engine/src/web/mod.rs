//! Web server module for the sale webhook.
//!
//! Routes:
//! - `GET /health`
//! - `POST /webhooks/sale` (any other method gets a JSON 405)

pub mod error;
pub mod handlers;
pub mod response;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

pub use error::{ErrorResponse, WebhookError};
pub use handlers::{
    handle_panic, health, method_not_allowed, sale_webhook, AppState, HealthResponse,
};
pub use response::{build_response, ResponsePayload, ENGINE_HEADER, ENGINE_HEADER_VALUE};

/// Path the payment platform posts sales to.
pub const SALE_WEBHOOK_PATH: &str = "/webhooks/sale";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route(
            SALE_WEBHOOK_PATH,
            post(sale_webhook).fallback(method_not_allowed),
        );

    with_layers(routes).with_state(state)
}

/// Wrap routes in the middleware stack the server runs with.
///
/// Panics anywhere below become JSON 500s; every request is traced.
pub fn with_layers(routes: Router<AppState>) -> Router<AppState> {
    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}
