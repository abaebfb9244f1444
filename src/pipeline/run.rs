// src/pipeline/run.rs

//! Outreach run orchestration.

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, Lead, LeadOutcome, RunReport};
use crate::services::{
    EmailEnricher, ExpandiEnricher, LeadSource, OutreachSender, PhantomBusterFetcher, SmtpSender,
};
use crate::utils::{http, log};

/// Run one outreach pass with the production services.
pub async fn run_from_config(config: &Config) -> Result<RunReport> {
    let client = http::create_async_client(&config.http)?;
    let source = PhantomBusterFetcher::new(&config.phantombuster, client.clone());
    let enricher = ExpandiEnricher::new(&config.enrichment, client);
    let sender = SmtpSender::new(config);

    run_outreach(config, &source, &enricher, &sender).await
}

/// Fetch leads once, then enrich and contact each of them in order.
///
/// Fetch errors abort the run. Enrichment misses and send failures are
/// recorded per lead and never stop the remaining leads.
pub async fn run_outreach(
    config: &Config,
    source: &dyn LeadSource,
    enricher: &dyn EmailEnricher,
    sender: &dyn OutreachSender,
) -> Result<RunReport> {
    let start_time = Utc::now();
    log::header("Outreach run starting");

    log::step(1, 2, "Fetch - Running scrape job");
    let fetched = source
        .fetch_leads(
            &config.phantombuster.search_query,
            config.phantombuster.batch_size,
        )
        .await?;
    log::info(&format!("Fetched {} leads", fetched.leads.len()));

    log::step(2, 2, "Contact - Enriching and sending");
    let mut report = RunReport {
        outcomes: Vec::with_capacity(fetched.leads.len()),
        malformed_rows: fetched.malformed_rows,
    };

    for mut lead in fetched.leads {
        log::debug(&format!("Enriching {} ({})", lead.name, lead.profile_url));
        lead.email = enricher.resolve_email(&lead.profile_url).await;

        let outcome = if lead.is_contactable() {
            contact(sender, lead).await
        } else {
            LeadOutcome::Skipped { name: lead.name }
        };

        report_outcome(config, &outcome);
        report.outcomes.push(outcome);
    }

    let elapsed = Utc::now() - start_time;
    log::summary(
        "Outreach run",
        &[
            ("Sent", report.sent().to_string()),
            ("Skipped", report.skipped().to_string()),
            ("Failed", report.failed().to_string()),
            ("Malformed rows", report.malformed_rows.to_string()),
            ("Elapsed", format!("{}s", elapsed.num_seconds())),
        ],
    );
    log::success("Outreach run complete");

    Ok(report)
}

async fn contact(sender: &dyn OutreachSender, lead: Lead) -> LeadOutcome {
    let email = lead.email.unwrap_or_default();
    match sender.send_email(&email, &lead.name).await {
        Ok(()) => LeadOutcome::Sent {
            name: lead.name,
            email,
        },
        Err(e) => LeadOutcome::SendFailed {
            name: lead.name,
            email,
            error: e.to_string(),
        },
    }
}

fn report_outcome(config: &Config, outcome: &LeadOutcome) {
    if !config.logging.show_progress {
        return;
    }
    let line = outcome.describe();
    match outcome {
        LeadOutcome::Sent { .. } => log::success(&line),
        LeadOutcome::Skipped { .. } => log::warn(&line),
        LeadOutcome::SendFailed { .. } => log::error(&line),
    }
}
