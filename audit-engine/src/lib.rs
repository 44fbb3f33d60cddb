//! Cyrnel Origin audit engine.
//!
//! Handles sale webhooks from a payment platform: generates an AI business
//! automation audit for the purchaser's website and emails it to them.
//!
//! ## Pipeline
//!
//! ```text
//! POST /webhooks/sale → sale (decode + extract) → report (completion API)
//!     → notify (email API) → web::response (JSON acknowledgment)
//! ```
//!
//! Each invocation is independent; no state is shared between requests
//! beyond the HTTP connection pool.

pub mod config;
pub mod notify;
pub mod report;
pub mod sale;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use notify::{deliver_audit, AuditTemplates, DeliveryOutcome, EmailClient};
pub use report::{generate_audit, AuditReport, CompletionClient};
pub use sale::{decode_form, extract_sale, SaleError, SaleEvent, SaleFields};
pub use web::{router, AppState};
