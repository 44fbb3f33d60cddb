//! JSON acknowledgment returned to the payment platform.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::debug;

use crate::notify::DeliveryOutcome;
use crate::report::AuditReport;
use crate::sale::SaleEvent;

pub const ENGINE_VERSION: &str = "1.0";

/// Marker header attached to successful webhook responses.
pub const ENGINE_HEADER: &str = "x-cyrnel-origin";
pub const ENGINE_HEADER_VALUE: &str = "Automation-Engine";

const DELIVERED_MESSAGE: &str = "Cyrnel Origin audit completed and delivered successfully.";
const UNDELIVERED_MESSAGE: &str =
    "Audit generated but delivery failed. Customer will be contacted separately.";

#[derive(Debug, Clone, Serialize)]
pub struct ResponsePayload {
    pub success: bool,
    pub message: &'static str,
    pub audit: AuditSummary,
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub generated: bool,
    pub delivered: bool,
    pub order_id: String,
    pub customer_email: String,
    pub business_website: String,
    pub email_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMetadata {
    pub version: &'static str,
    pub domain: String,
    pub timestamp: String,
    pub processing_time_ms: u64,
}

/// Summarize one webhook invocation.
///
/// `success` mirrors delivery only. Report generation falls back instead of
/// failing, so `generated` is always true; the report is only consulted for
/// logging.
pub fn build_response(
    sale: &SaleEvent,
    report: &AuditReport,
    outcome: &DeliveryOutcome,
    domain: &str,
    elapsed: Duration,
    now: DateTime<Utc>,
) -> ResponsePayload {
    let delivered = outcome.success();
    debug!(
        order_id = %sale.order_id,
        was_fallback = report.was_fallback(),
        delivered,
        "response_built"
    );

    ResponsePayload {
        success: delivered,
        message: if delivered {
            DELIVERED_MESSAGE
        } else {
            UNDELIVERED_MESSAGE
        },
        audit: AuditSummary {
            generated: true,
            delivered,
            order_id: sale.order_id.clone(),
            customer_email: sale.email.clone(),
            business_website: sale.business_url.clone(),
            email_id: outcome.email_id().map(str::to_string),
        },
        metadata: ResponseMetadata {
            version: ENGINE_VERSION,
            domain: domain.to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            processing_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        },
    }
}
