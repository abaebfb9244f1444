//! Lead records and per-run outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A prospective contact surfaced by the scraping job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lead {
    /// Display name
    pub name: String,

    /// LinkedIn profile URL
    pub profile_url: String,

    /// Address found by enrichment, `None` until resolved
    #[serde(default)]
    pub email: Option<String>,
}

impl Lead {
    pub fn new(name: impl Into<String>, profile_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile_url: profile_url.into(),
            email: None,
        }
    }

    /// A lead may only be contacted once an address is known.
    pub fn is_contactable(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}

/// Opaque identifier of an in-flight scraping job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Running(String),
    Finished,
    Failed,
}

impl JobStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "finished" => JobStatus::Finished,
            "failed" => JobStatus::Failed,
            other => JobStatus::Running(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running(_))
    }
}

/// Leads parsed from one result export.
#[derive(Debug, Clone, Default)]
pub struct FetchedLeads {
    pub leads: Vec<Lead>,

    /// Data rows that could not be turned into a lead
    pub malformed_rows: usize,
}

/// Final state of a single lead within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeadOutcome {
    Sent {
        name: String,
        email: String,
    },
    Skipped {
        name: String,
    },
    SendFailed {
        name: String,
        email: String,
        error: String,
    },
}

impl LeadOutcome {
    /// Console line describing the outcome.
    pub fn describe(&self) -> String {
        match self {
            LeadOutcome::Sent { name, email } => format!("Email sent to {name} <{email}>"),
            LeadOutcome::Skipped { name } => format!("Skipping {name}: no email found."),
            LeadOutcome::SendFailed { email, error, .. } => {
                format!("Error sending to {email}: {error}")
            }
        }
    }
}

/// Summary of an outreach run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub outcomes: Vec<LeadOutcome>,
    pub malformed_rows: usize,
}

impl RunReport {
    pub fn sent(&self) -> usize {
        self.count(|o| matches!(o, LeadOutcome::Sent { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, LeadOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, LeadOutcome::SendFailed { .. }))
    }

    fn count(&self, pred: impl Fn(&LeadOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}
