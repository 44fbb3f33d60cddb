//! Audit report generation.
//!
//! Generation never fails from the caller's point of view: any completion
//! error is logged and replaced by a deterministic fallback audit.

pub mod groq;
pub mod prompt;

use tracing::{info, warn};

pub use groq::{CompletionClient, CompletionError};
pub use prompt::{audit_prompt, fallback_audit};

/// Generated audit text, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditReport {
    /// Text produced by the completion API
    Live(String),
    /// Canned text substituted after a completion failure
    Fallback(String),
}

impl AuditReport {
    pub fn content(&self) -> &str {
        match self {
            AuditReport::Live(text) | AuditReport::Fallback(text) => text,
        }
    }

    pub fn was_fallback(&self) -> bool {
        matches!(self, AuditReport::Fallback(_))
    }
}

/// Generate an automation audit for `business_url`.
pub async fn generate_audit(client: &CompletionClient, business_url: &str) -> AuditReport {
    info!(business_url = %business_url, "audit_generation_start");

    match client.complete(&audit_prompt(business_url)).await {
        Ok(content) => {
            info!(
                business_url = %business_url,
                content_length = content.len(),
                "audit_generation_complete"
            );
            AuditReport::Live(content)
        }
        Err(e) => {
            warn!(
                business_url = %business_url,
                error = %e,
                "audit_generation_fallback"
            );
            AuditReport::Fallback(fallback_audit(business_url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use reqwest::Client;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> CompletionClient {
        CompletionClient::new(
            Client::new(),
            format!("{}/openai/v1/chat/completions", server.uri()),
            "gsk_test",
            "mixtral-8x7b-32768",
            timeout,
        )
    }

    #[tokio::test]
    async fn test_live_report() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("authorization", "Bearer gsk_test"))
            .and(body_partial_json(json!({
                "model": "mixtral-8x7b-32768",
                "max_tokens": 2500,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "EXECUTIVE SUMMARY\n..."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let report = generate_audit(&client_for(&server, Duration::from_secs(5)), "acme.com").await;

        assert_eq!(report, AuditReport::Live("EXECUTIVE SUMMARY\n...".to_string()));
        assert!(!report.was_fallback());
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        let err = client.complete("prompt").await.unwrap_err();
        assert!(matches!(err, CompletionError::Status { status: 503, .. }));

        let report = generate_audit(&client, "acme.com").await;
        assert!(report.was_fallback());
        assert_eq!(report.content(), fallback_audit("acme.com"));
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        assert!(matches!(
            client.complete("prompt").await,
            Err(CompletionError::MalformedBody(_))
        ));
        assert!(generate_audit(&client, "acme.com").await.was_fallback());
    }

    #[tokio::test]
    async fn test_missing_content_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(5));
        assert!(matches!(
            client.complete("prompt").await,
            Err(CompletionError::MissingContent)
        ));
        assert!(generate_audit(&client, "acme.com").await.was_fallback());
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(50));
        assert!(matches!(
            client.complete("prompt").await,
            Err(CompletionError::Transport(_))
        ));
        assert!(generate_audit(&client, "acme.com").await.was_fallback());
    }
}
