//! Audit prompt and fallback text.

/// Build the completion prompt for a business website.
pub fn audit_prompt(business_url: &str) -> String {
    format!(
        r#"As a senior automation consultant at Cyrnel Origin, analyze {business_url} and create a detailed "AI-Powered Business Automation Audit" with:

1. EXECUTIVE SUMMARY: 3-4 key findings on automation potential
2. IDENTIFIED PROCESSES: 3-5 repetitive tasks suitable for automation
3. QUICK-WIN AUTOMATIONS: Specific implementable solutions with time estimates
4. TECHNOLOGY RECOMMENDATIONS: Appropriate tools for implementation
5. 90-DAY ROADMAP: Phased implementation plan
6. ROI ANALYSIS: Time and cost savings projections

Tone: Professional, actionable, value-focused."#
    )
}

/// Canned audit sent when live generation is unavailable.
pub fn fallback_audit(business_url: &str) -> String {
    format!(
        "**AI-Powered Business Automation Audit for {business_url}**

Thank you for choosing Cyrnel Origin. Our system has received your request for {business_url}.

Due to high demand on our AI systems, your full customized audit is being finalized by our specialists and will be delivered within 24 hours.

In the meantime, our preliminary analysis suggests significant automation potential in lead management and customer onboarding processes.

-- Cyrnel Origin Automation Team"
    )
}
