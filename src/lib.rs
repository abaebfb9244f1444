// src/lib.rs

//! leadreach: LinkedIn lead outreach library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;
