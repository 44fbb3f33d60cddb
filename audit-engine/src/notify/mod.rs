//! Audit delivery by email.
//!
//! Delivery failures are reported as data in [`DeliveryOutcome`]; nothing here
//! retries or escalates.

pub mod resend;
pub mod template;

use chrono::Utc;
use tracing::{error, info};

use crate::report::AuditReport;
use crate::sale::SaleEvent;

pub use resend::{DeliveryError, EmailClient, EmailMessage, EmailTag};
pub use template::{subject, AuditEmailContext, AuditTemplates};

/// Result of attempting to email an audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { email_id: String },
    Failed { error: String },
}

impl DeliveryOutcome {
    pub fn success(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    pub fn email_id(&self) -> Option<&str> {
        match self {
            DeliveryOutcome::Delivered { email_id } => Some(email_id.as_str()),
            DeliveryOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DeliveryOutcome::Delivered { .. } => None,
            DeliveryOutcome::Failed { error } => Some(error.as_str()),
        }
    }
}

/// Build the audit email for a sale.
pub fn build_audit_email(
    client: &EmailClient,
    templates: &AuditTemplates,
    sale: &SaleEvent,
    report: &AuditReport,
    scheduling_url: &str,
) -> Result<EmailMessage, DeliveryError> {
    let ctx = AuditEmailContext {
        customer_name: &sale.customer_name,
        business_url: &sale.business_url,
        order_id: &sale.order_id,
        report: report.content(),
        scheduling_url,
        support_address: &client.reply_to,
        generated_at: Utc::now(),
    };

    Ok(EmailMessage {
        from: client.from.clone(),
        to: vec![sale.email.clone()],
        reply_to: client.reply_to.clone(),
        subject: subject(&sale.business_url),
        html: templates.render_html(&ctx)?,
        text: templates.render_text(&ctx)?,
        tags: vec![EmailTag::new("audit", &sale.order_id)],
    })
}

/// Email the audit to the purchaser.
pub async fn deliver_audit(
    client: &EmailClient,
    templates: &AuditTemplates,
    sale: &SaleEvent,
    report: &AuditReport,
    scheduling_url: &str,
) -> DeliveryOutcome {
    info!(
        order_id = %sale.order_id,
        customer_email = %sale.email,
        "audit_delivery_start"
    );

    let sent = match build_audit_email(client, templates, sale, report, scheduling_url) {
        Ok(message) => client.send(&message).await,
        Err(e) => Err(e),
    };

    match sent {
        Ok(email_id) => {
            info!(order_id = %sale.order_id, email_id = %email_id, "audit_delivered");
            DeliveryOutcome::Delivered { email_id }
        }
        Err(e) => {
            error!(
                order_id = %sale.order_id,
                customer_email = %sale.email,
                error = %e,
                "audit_delivery_failed"
            );
            DeliveryOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}
