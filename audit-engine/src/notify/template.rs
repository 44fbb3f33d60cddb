//! Audit email rendering (HTML and plain text).
//!
//! Both bodies are tera templates compiled once at startup. The HTML template
//! is autoescaped, so purchaser-supplied values cannot inject markup.

use chrono::{DateTime, Datelike, Utc};
use tera::{Context, Tera};

const HTML_TEMPLATE_NAME: &str = "audit_email.html";
const TEXT_TEMPLATE_NAME: &str = "audit_email.txt";

/// Everything the audit email shows besides the recipient.
#[derive(Debug, Clone)]
pub struct AuditEmailContext<'a> {
    pub customer_name: &'a str,
    pub business_url: &'a str,
    pub order_id: &'a str,
    pub report: &'a str,
    pub scheduling_url: &'a str,
    pub support_address: &'a str,
    pub generated_at: DateTime<Utc>,
}

impl AuditEmailContext<'_> {
    fn to_tera(&self) -> Context {
        let mut context = Context::new();
        context.insert("customer_name", self.customer_name);
        context.insert("business_url", self.business_url);
        context.insert("order_id", self.order_id);
        context.insert("report", self.report);
        context.insert("scheduling_url", self.scheduling_url);
        context.insert("support_address", self.support_address);
        context.insert(
            "generated_on",
            &self.generated_at.format("%A, %B %-d, %Y").to_string(),
        );
        context.insert("year", &self.generated_at.year());
        context
    }
}

/// The report is trusted and embedded unescaped, with newlines turned into `<br>`.
const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Your AI-Powered Business Automation Audit</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 600px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f7fa;
        }
        .header {
            background: linear-gradient(135deg, #4f46e5 0%, #7c3aed 100%);
            padding: 40px 30px;
            text-align: center;
            border-radius: 12px 12px 0 0;
            color: white;
        }
        .header h1 { margin: 0; font-size: 28px; font-weight: 700; letter-spacing: -0.5px; }
        .header p { margin: 10px 0 0; opacity: 0.9; font-size: 16px; }
        .content {
            background: white;
            padding: 40px 30px;
            border-radius: 0 0 12px 12px;
            box-shadow: 0 4px 6px rgba(0, 0, 0, 0.05);
        }
        .audit-box {
            background: #f8fafc;
            border-left: 4px solid #4f46e5;
            padding: 25px;
            margin: 30px 0;
            white-space: pre-wrap;
            font-family: 'SF Mono', Monaco, 'Cascadia Code', monospace;
            font-size: 14px;
            line-height: 1.7;
            border-radius: 0 8px 8px 0;
        }
        .footer {
            margin-top: 40px;
            padding-top: 25px;
            border-top: 1px solid #e5e7eb;
            font-size: 13px;
            color: #6b7280;
            text-align: center;
        }
        .cta-button {
            display: inline-block;
            background: #4f46e5;
            color: white;
            padding: 14px 32px;
            text-decoration: none;
            border-radius: 8px;
            margin: 20px 0;
            font-weight: 600;
            font-size: 16px;
        }
        .highlight { background-color: #fef3c7; padding: 2px 6px; border-radius: 4px; font-weight: 600; }
        .logo { font-weight: 800; color: #4f46e5; font-size: 24px; letter-spacing: -1px; }
    </style>
</head>
<body>
    <div class="header">
        <div style="font-size: 42px; margin-bottom: 15px;">&#128640;</div>
        <h1>Your AI-Powered Business Audit</h1>
        <p>Cyrnel Origin Automation Analysis</p>
    </div>

    <div class="content">
        <p>Hi <strong>{{ customer_name }}</strong>,</p>

        <p>Thank you for trusting <span class="logo">Cyrnel Origin</span> with your automation strategy. Our AI has completed a comprehensive analysis of:</p>

        <p style="text-align: center; font-size: 18px; margin: 25px 0;">
            <span class="highlight">{{ business_url }}</span>
        </p>

        <p>Your customized automation audit is ready below. This analysis identifies specific opportunities to save time, reduce costs, and scale your operations.</p>

        <h3 style="color: #4f46e5; margin-top: 35px;">Your Automation Audit</h3>
        <div class="audit-box">{{ report | linebreaksbr | safe }}</div>

        <h3 style="color: #4f46e5; margin-top: 35px;">Next Steps</h3>
        <ol style="line-height: 1.8;">
            <li><strong>Review</strong> your audit findings above</li>
            <li><strong>Prioritize</strong> the quick-win automations</li>
            <li><strong>Schedule</strong> your implementation strategy session</li>
        </ol>

        <div style="text-align: center; margin: 35px 0;">
            <a href="{{ scheduling_url | safe }}" class="cta-button">Schedule Your Strategy Call</a>
            <p style="font-size: 14px; color: #6b7280; margin-top: 10px;">
                30-minute consultation &bull; No obligation
            </p>
        </div>

        <p>We're excited to help you transform these insights into tangible results.</p>

        <p>Best regards,<br>
        <strong>The Cyrnel Origin Team</strong><br>
        <span style="font-size: 13px; color: #6b7280;">Automating Business Growth</span></p>

        <div class="footer">
            <p>Reference: Order {{ order_id }} | Generated: {{ generated_on }}<br>
            &copy; {{ year }} Cyrnel Origin. All rights reserved.<br>
            Need help? Reply to this email or contact {{ support_address }}</p>
            <p style="margin-top: 15px; font-size: 12px; opacity: 0.7;">
                This email was automatically generated by the Cyrnel Origin Automation Engine.
            </p>
        </div>
    </div>
</body>
</html>"#;

const TEXT_TEMPLATE: &str = "CYRNEL ORIGIN - AI-POWERED BUSINESS AUTOMATION AUDIT

For: {{ business_url }}

{{ report }}

---
Review your full audit above and schedule implementation: {{ scheduling_url }}

Cyrnel Origin Team
Reference: {{ order_id }}";

/// Compiled audit email templates.
#[derive(Debug, Clone)]
pub struct AuditTemplates {
    tera: Tera,
}

impl AuditTemplates {
    /// Compile the built-in templates.
    pub fn load() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_template(HTML_TEMPLATE_NAME, HTML_TEMPLATE)?;
        tera.add_raw_template(TEXT_TEMPLATE_NAME, TEXT_TEMPLATE)?;
        Ok(Self { tera })
    }

    /// Render the styled HTML email.
    pub fn render_html(&self, ctx: &AuditEmailContext<'_>) -> Result<String, tera::Error> {
        self.tera.render(HTML_TEMPLATE_NAME, &ctx.to_tera())
    }

    /// Render the plain-text alternative.
    pub fn render_text(&self, ctx: &AuditEmailContext<'_>) -> Result<String, tera::Error> {
        self.tera.render(TEXT_TEMPLATE_NAME, &ctx.to_tera())
    }
}

/// Subject line for an audit email.
pub fn subject(business_url: &str) -> String {
    format!(
        "Your AI-Powered Business Automation Audit for {} | Cyrnel Origin",
        business_url
    )
}
