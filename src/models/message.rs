//! Outreach message rendering.

use serde::Serialize;

use crate::models::OutreachConfig;

/// Values substituted into the body template.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateContext<'a> {
    pub name: &'a str,
    pub scheduling_link: &'a str,
}

/// A rendered message ready for the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutreachMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Substitute `{name}` and `{scheduling_link}` in a template.
///
/// `{calendly_link}` is accepted as an alias of `{scheduling_link}`.
pub fn render_body(template: &str, ctx: &TemplateContext<'_>) -> String {
    template
        .replace("{name}", ctx.name)
        .replace("{scheduling_link}", ctx.scheduling_link)
        .replace("{calendly_link}", ctx.scheduling_link)
}

/// Build the message for one recipient.
pub fn render_message(
    outreach: &OutreachConfig,
    ctx: &TemplateContext<'_>,
    recipient: &str,
) -> OutreachMessage {
    OutreachMessage {
        recipient: recipient.to_string(),
        subject: outreach.subject.clone(),
        body: render_body(&outreach.body_template, ctx),
    }
}
