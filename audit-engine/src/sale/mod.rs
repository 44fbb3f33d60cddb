//! Sale webhook intake and field extraction.
//!
//! ```text
//! form body → decode_form() → SaleFields → extract_sale() → SaleEvent
//! ```

pub mod extract;
pub mod form;

pub use extract::{extract_sale, SaleEvent, FALLBACK_CUSTOMER_NAME, WEBSITE_NOT_PROVIDED};
pub use form::{decode_form, SaleFields};

use thiserror::Error;

/// Reasons a webhook payload is rejected before any upstream call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaleError {
    #[error("webhook body is not valid form data: {0}")]
    MalformedBody(String),

    #[error("no customer email found in webhook data")]
    MissingEmail,
}
