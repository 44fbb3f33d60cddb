//! Sale field extraction and normalization.
//!
//! Webhook payloads are loosely structured: most fields are optional and
//! several have aliases. Everything except the customer email has a default.

use chrono::Utc;
use tracing::{info, warn};

use super::{SaleError, SaleFields};

/// Sentinel used when the purchaser gave no website.
pub const WEBSITE_NOT_PROVIDED: &str = "Not provided";

/// Name used when nothing better can be derived.
pub const FALLBACK_CUSTOMER_NAME: &str = "Valued Client";

const DEFAULT_PRODUCT_NAME: &str = "AI-Powered Business Automation Audit";
const DEFAULT_CURRENCY: &str = "USD";
const ORDER_ID_PREFIX: &str = "ORD-";

const EMAIL_KEYS: &[&str] = &["email", "purchaser_email"];
const NAME_KEYS: &[&str] = &["full_name", "purchaser[full_name]"];
const ORDER_ID_KEYS: &[&str] = &["sale_id", "resource[id]"];
const WEBSITE_KEYS: &[&str] = &["custom_fields[website]", "website"];

/// A normalized sale notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleEvent {
    pub email: String,
    pub customer_name: String,
    pub order_id: String,
    pub product_name: String,
    /// Major units with exactly two decimals, e.g. `"25.00"`
    pub price: String,
    pub currency: String,
    /// Website with scheme and `www.` removed, or [`WEBSITE_NOT_PROVIDED`]
    pub business_url: String,
}

/// Build a [`SaleEvent`] from decoded webhook fields.
///
/// Fails only when no email is present under any accepted alias.
///
/// When the payload has neither `sale_id` nor `resource[id]`, the order id is
/// synthesized from the current time. Redelivered webhooks without an explicit
/// id therefore get distinct order ids.
pub fn extract_sale(fields: &SaleFields) -> Result<SaleEvent, SaleError> {
    let email = match fields.first_of(EMAIL_KEYS) {
        Some(email) => email.to_string(),
        None => {
            warn!(field_count = fields.len(), "sale_missing_email");
            return Err(SaleError::MissingEmail);
        }
    };

    let order_id = match fields.first_of(ORDER_ID_KEYS) {
        Some(id) => id.to_string(),
        None => {
            let id = format!("{}{}", ORDER_ID_PREFIX, Utc::now().timestamp_millis());
            info!(order_id = %id, "sale_order_id_synthesized");
            id
        }
    };

    let customer_name = fields
        .first_of(NAME_KEYS)
        .map(str::to_string)
        .unwrap_or_else(|| name_from_email(&email));

    let event = SaleEvent {
        customer_name,
        order_id,
        product_name: fields
            .get("product_name")
            .unwrap_or(DEFAULT_PRODUCT_NAME)
            .to_string(),
        price: format_price(fields.get("price")),
        currency: fields.get("currency").unwrap_or(DEFAULT_CURRENCY).to_string(),
        business_url: normalize_website(fields.first_of(WEBSITE_KEYS).unwrap_or(WEBSITE_NOT_PROVIDED)),
        email,
    };

    info!(
        product_name = %event.product_name,
        customer_name = %event.customer_name,
        customer_email = %event.email,
        price = %event.price,
        currency = %event.currency,
        order_id = %event.order_id,
        business_url = %event.business_url,
        "sale_extracted"
    );

    Ok(event)
}

/// Convert an integer amount of minor units into a two-decimal string.
///
/// Missing or non-numeric input yields `"0.00"`.
pub fn format_price(raw: Option<&str>) -> String {
    let cents = match raw.map(|r| r.trim().parse::<i64>()) {
        Some(Ok(cents)) => cents,
        Some(Err(_)) => {
            warn!(price = raw.unwrap_or_default(), "sale_price_not_numeric");
            0
        }
        None => 0,
    };

    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Strip a leading `http://` or `https://`, then a leading `www.`.
pub fn normalize_website(raw: &str) -> String {
    let without_scheme = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or(raw);

    without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme)
        .to_string()
}

/// Derive a display name from the local part of an email address.
fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    let name: String = local
        .chars()
        .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
        .collect();

    if name.is_empty() {
        FALLBACK_CUSTOMER_NAME.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> SaleFields {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_missing_email_is_error() {
        let result = extract_sale(&fields(&[("full_name", "Alice"), ("price", "100")]));
        assert_eq!(result.unwrap_err(), SaleError::MissingEmail);
    }

    #[test]
    fn test_email_alias_priority() {
        let event = extract_sale(&fields(&[
            ("purchaser_email", "second@acme.com"),
            ("email", "first@acme.com"),
        ]))
        .unwrap();
        assert_eq!(event.email, "first@acme.com");

        let event = extract_sale(&fields(&[("purchaser_email", "alias@acme.com")])).unwrap();
        assert_eq!(event.email, "alias@acme.com");
    }

    #[test]
    fn test_email_passed_through_unchanged() {
        let fields = crate::sale::decode_form(b"email=+alice%40acme.com+&sale_id=S1").unwrap();
        let event = extract_sale(&fields).unwrap();
        assert_eq!(event.email, " alice@acme.com ");
        assert_eq!(event.order_id, "S1");
    }

    #[test]
    fn test_defaults_applied() {
        let event = extract_sale(&fields(&[("email", "bob@acme.com")])).unwrap();

        assert_eq!(event.product_name, DEFAULT_PRODUCT_NAME);
        assert_eq!(event.price, "0.00");
        assert_eq!(event.currency, "USD");
        assert_eq!(event.business_url, WEBSITE_NOT_PROVIDED);
        assert_eq!(event.customer_name, "bob");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some("2500")), "25.00");
        assert_eq!(format_price(Some("10000")), "100.00");
        assert_eq!(format_price(Some("5")), "0.05");
        assert_eq!(format_price(Some("1999")), "19.99");
        assert_eq!(format_price(Some("-250")), "-2.50");
        assert_eq!(format_price(Some("abc")), "0.00");
        assert_eq!(format_price(None), "0.00");
    }

    #[test]
    fn test_normalize_website() {
        assert_eq!(normalize_website("https://www.example.com"), "example.com");
        assert_eq!(normalize_website("http://example.com/about"), "example.com/about");
        assert_eq!(normalize_website("www.example.com"), "example.com");
        assert_eq!(normalize_website("example.com"), "example.com");
        assert_eq!(normalize_website(WEBSITE_NOT_PROVIDED), WEBSITE_NOT_PROVIDED);
        assert_eq!(normalize_website("ftp://example.com"), "ftp://example.com");
    }

    #[test]
    fn test_website_key_priority() {
        let event = extract_sale(&fields(&[
            ("email", "a@b.com"),
            ("website", "https://plain.com"),
            ("custom_fields[website]", "https://www.custom.com"),
        ]))
        .unwrap();
        assert_eq!(event.business_url, "custom.com");

        let event =
            extract_sale(&fields(&[("email", "a@b.com"), ("website", "http://plain.com")])).unwrap();
        assert_eq!(event.business_url, "plain.com");
    }

    #[test]
    fn test_order_id_priority() {
        let event = extract_sale(&fields(&[
            ("email", "a@b.com"),
            ("resource[id]", "R9"),
            ("sale_id", "S1"),
        ]))
        .unwrap();
        assert_eq!(event.order_id, "S1");

        let event = extract_sale(&fields(&[("email", "a@b.com"), ("resource[id]", "R9")])).unwrap();
        assert_eq!(event.order_id, "R9");
    }

    #[test]
    fn test_order_id_synthesized() {
        let event = extract_sale(&fields(&[("email", "a@b.com")])).unwrap();
        let suffix = event.order_id.strip_prefix(ORDER_ID_PREFIX).unwrap();
        assert!(!suffix.is_empty());
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_customer_name_sources() {
        let event = extract_sale(&fields(&[
            ("email", "a@b.com"),
            ("purchaser[full_name]", "Nested Name"),
            ("full_name", "Alice Smith"),
        ]))
        .unwrap();
        assert_eq!(event.customer_name, "Alice Smith");

        let event = extract_sale(&fields(&[
            ("email", "a@b.com"),
            ("purchaser[full_name]", "Nested Name"),
        ]))
        .unwrap();
        assert_eq!(event.customer_name, "Nested Name");
    }

    #[test]
    fn test_name_from_email() {
        assert_eq!(name_from_email("john.doe42@acme.com"), "john doe  ");
        assert_eq!(name_from_email("@acme.com"), FALLBACK_CUSTOMER_NAME);
    }
}
