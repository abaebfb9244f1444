//! Service layer for the outreach application.
//!
//! This module contains the clients for:
//! - Lead scraping (`PhantomBusterFetcher`)
//! - Email enrichment (`ExpandiEnricher`)
//! - Mail delivery (`SmtpSender`)

mod enricher;
mod fetcher;
mod sender;

pub use enricher::{EmailEnricher, ExpandiEnricher};
pub use fetcher::{LeadSource, PhantomBusterFetcher, parse_export};
pub use sender::{OutreachSender, SmtpSender};
