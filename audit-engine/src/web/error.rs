//! Client-facing webhook errors and their JSON bodies.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::sale::SaleError;

/// Errors that end a webhook request before the audit pipeline runs.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("method {0} not allowed")]
    MethodNotAllowed(String),

    #[error(transparent)]
    Sale(#[from] SaleError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Error body returned for every non-200 webhook response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            WebhookError::Sale(_) => StatusCode::BAD_REQUEST,
            WebhookError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            WebhookError::MethodNotAllowed(_) => ErrorResponse {
                error: "Method not allowed",
                message: "This endpoint only accepts POST requests from payment webhooks."
                    .to_string(),
            },
            WebhookError::Sale(SaleError::MalformedBody(_)) => ErrorResponse {
                error: "Invalid data format",
                message: "Could not parse webhook data. Ensure the payment platform ping is configured correctly."
                    .to_string(),
            },
            WebhookError::Sale(SaleError::MissingEmail) => ErrorResponse {
                error: "Missing required data",
                message: "No customer email found in webhook data.".to_string(),
            },
            WebhookError::Internal(_) => ErrorResponse {
                error: "Internal server error",
                message: "The audit engine hit an unexpected error while processing this webhook."
                    .to_string(),
            },
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
