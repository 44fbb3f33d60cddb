//! Form-encoded webhook body decoding.
//!
//! Payment platforms post sales as `application/x-www-form-urlencoded`.
//! Nested fields arrive with bracketed names (`custom_fields[website]`) and
//! are kept as flat literal keys.

use std::collections::HashMap;

use percent_encoding::percent_decode;
use tracing::{info, warn};

use super::SaleError;

/// Decoded webhook fields keyed by their literal form names.
#[derive(Debug, Clone, Default)]
pub struct SaleFields {
    values: HashMap<String, String>,
}

impl SaleFields {
    /// Look up a field, treating missing and blank values alike.
    ///
    /// Present values are returned exactly as sent, surrounding whitespace included.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// First present field among `keys`, in priority order.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SaleFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Decode a form-encoded body into [`SaleFields`].
///
/// Duplicate keys keep the last value. A body that is not UTF-8, or whose
/// percent-escapes decode to invalid UTF-8, is rejected.
pub fn decode_form(body: &[u8]) -> Result<SaleFields, SaleError> {
    let text = std::str::from_utf8(body).map_err(|e| {
        warn!(error = %e, body_length = body.len(), "sale_form_invalid_utf8");
        SaleError::MalformedBody(e.to_string())
    })?;

    let mut values = HashMap::new();
    for pair in text.split('&').filter(|pair| !pair.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(raw_key)?;
        let value = decode_component(raw_value).map_err(|e| {
            warn!(key = %key, "sale_form_invalid_escape");
            e
        })?;
        values.insert(key, value);
    }

    info!(field_count = values.len(), "sale_form_decoded");

    Ok(SaleFields { values })
}

/// Decode one form component: `+` is a space, then percent-escapes are
/// resolved and the bytes must be valid UTF-8.
fn decode_component(raw: &str) -> Result<String, SaleError> {
    let spaced = raw.replace('+', " ");
    let bytes: Vec<u8> = percent_decode(spaced.as_bytes()).collect();

    String::from_utf8(bytes).map_err(|_| {
        SaleError::MalformedBody(format!(
            "'{}' contains an invalid percent-encoded sequence",
            raw
        ))
    })
}
