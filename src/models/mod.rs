// src/models/mod.rs

//! Domain models for the outreach application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod lead;
mod message;

// Re-export all public types
pub use config::{
    Config, EnrichmentConfig, HttpConfig, LoggingConfig, OutreachConfig, ScraperConfig,
    SmtpConfig,
};
pub use lead::{FetchedLeads, JobHandle, JobStatus, Lead, LeadOutcome, RunReport};
pub use message::{OutreachMessage, TemplateContext, render_body, render_message};
