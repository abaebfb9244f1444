//! Pipeline entry points for outreach runs.
//!
//! - `run_outreach`: Fetch leads, then enrich and contact each one
//! - `run_from_config`: Same, wired to the production services

pub mod run;

pub use run::{run_from_config, run_outreach};
