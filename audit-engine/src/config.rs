//! Configuration module for environment variable parsing.
//!
//! API keys for the completion and email providers are required; everything
//! else falls back to production defaults.

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_GROQ_MODEL: &str = "mixtral-8x7b-32768";
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    // =========================================================================
    // Completion API (report generation)
    // =========================================================================

    /// Bearer token for the completion API
    pub groq_api_key: String,

    /// Chat completions endpoint
    pub groq_api_url: String,

    /// Model name sent with every completion request
    pub groq_model: String,

    /// Completion request timeout in milliseconds
    pub completion_timeout_ms: u64,

    // =========================================================================
    // Email API (audit delivery)
    // =========================================================================

    /// Bearer token for the email API
    pub resend_api_key: String,

    /// Email send endpoint
    pub resend_api_url: String,

    /// Email request timeout in milliseconds
    pub email_timeout_ms: u64,

    /// Sender identity, e.g. `Name <audits@domain>`
    pub audit_from: String,

    /// Reply-to address shown to customers
    pub audit_reply_to: String,

    /// Domain reported in response metadata
    pub audit_domain: String,

    /// Call-to-action link embedded in audit emails
    pub scheduling_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let string_or = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080),

            groq_api_key: required(&lookup, "GROQ_API_KEY")?,
            groq_api_url: string_or("GROQ_API_URL", DEFAULT_GROQ_API_URL),
            groq_model: string_or("GROQ_MODEL", DEFAULT_GROQ_MODEL),
            completion_timeout_ms: parse_or(&lookup, "COMPLETION_TIMEOUT_MS", 30_000),

            resend_api_key: required(&lookup, "RESEND_API_KEY")?,
            resend_api_url: string_or("RESEND_API_URL", DEFAULT_RESEND_API_URL),
            email_timeout_ms: parse_or(&lookup, "EMAIL_TIMEOUT_MS", 30_000),

            audit_from: string_or("AUDIT_FROM", "Cyrnel Origin <audits@cyrnelorigin.online>"),
            audit_reply_to: string_or("AUDIT_REPLY_TO", "support@cyrnelorigin.online"),
            audit_domain: string_or("AUDIT_DOMAIN", "cyrnelorigin.online"),
            scheduling_url: string_or("SCHEDULING_URL", "https://calendly.com/cyrnelorigin"),
        })
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_millis(self.completion_timeout_ms)
    }

    pub fn email_timeout(&self) -> Duration {
        Duration::from_millis(self.email_timeout_ms)
    }
}

/// Read a variable that must be present and non-blank.
fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

/// Parse a numeric variable, warning and falling back to the default when invalid.
fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    let raw = match lookup(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid numeric value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_with_required_keys() {
        let config = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("RESEND_API_KEY", "re_test"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.groq_api_url, DEFAULT_GROQ_API_URL);
        assert_eq!(config.groq_model, DEFAULT_GROQ_MODEL);
        assert_eq!(config.completion_timeout(), Duration::from_secs(30));
        assert_eq!(config.resend_api_url, DEFAULT_RESEND_API_URL);
        assert_eq!(config.audit_reply_to, "support@cyrnelorigin.online");
        assert_eq!(config.audit_domain, "cyrnelorigin.online");
    }

    #[test]
    fn test_missing_completion_key_fails() {
        let result = Config::from_lookup(lookup_from(&[("RESEND_API_KEY", "re_test")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingVar("GROQ_API_KEY"));
    }

    #[test]
    fn test_blank_email_key_fails() {
        let result = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("RESEND_API_KEY", "   "),
        ]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingVar("RESEND_API_KEY"));
    }

    #[test]
    fn test_invalid_numbers_use_default() {
        let config = Config::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("RESEND_API_KEY", "re_test"),
            ("PORT", "not-a-port"),
            ("EMAIL_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.email_timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        env::set_var("GROQ_API_KEY", "gsk_env");
        env::set_var("RESEND_API_KEY", "re_env");
        let config = Config::from_env().unwrap();
        assert_eq!(config.groq_api_key, "gsk_env");
        assert_eq!(config.resend_api_key, "re_env");
        env::remove_var("GROQ_API_KEY");
        env::remove_var("RESEND_API_KEY");
    }
}
