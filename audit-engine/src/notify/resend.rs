//! Transactional email client for the Resend API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::Config;

/// Ways an email send can fail.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("email request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email API rejected message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("email API accepted message without returning an id")]
    MissingId,

    #[error("email body could not be rendered: {0}")]
    Template(#[from] tera::Error),
}

/// Outbound message, serialized as the Resend `POST /emails` body.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub tags: Vec<EmailTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailTag {
    pub name: String,
    pub value: String,
}

impl EmailTag {
    /// Build a tag, replacing characters the provider rejects with `_`.
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: sanitize_tag(name),
            value: sanitize_tag(value),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}

/// Email API handle carrying the fixed sender identity.
#[derive(Debug, Clone)]
pub struct EmailClient {
    http: Client,
    url: String,
    api_key: String,
    timeout: Duration,
    pub from: String,
    pub reply_to: String,
}

impl EmailClient {
    pub fn new(
        http: Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        from: impl Into<String>,
        reply_to: impl Into<String>,
    ) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
            timeout,
            from: from.into(),
            reply_to: reply_to.into(),
        }
    }

    pub fn from_config(http: Client, config: &Config) -> Self {
        Self::new(
            http,
            &config.resend_api_url,
            &config.resend_api_key,
            config.email_timeout(),
            &config.audit_from,
            &config.audit_reply_to,
        )
    }

    /// Send a message and return the provider's email id.
    pub async fn send(&self, message: &EmailMessage) -> Result<String, DeliveryError> {
        info!(
            to = ?message.to,
            subject = %message.subject,
            html_length = message.html.len(),
            "email_send_starting"
        );

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| body.chars().take(200).collect());

            error!(
                status_code = status.as_u16(),
                error = %message,
                "email_api_error"
            );
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let id = serde_json::from_str::<SendResponse>(&body)
            .ok()
            .and_then(|r| r.id)
            .filter(|id| !id.is_empty())
            .ok_or(DeliveryError::MissingId)?;

        info!(status_code = status.as_u16(), email_id = %id, "email_send_complete");

        Ok(id)
    }
}

fn sanitize_tag(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
