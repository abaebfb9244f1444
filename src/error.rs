// src/error.rs

//! Unified error handling for the outreach application.

use std::fmt;

use thiserror::Error;

/// Result type alias for outreach operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The scraping platform refused to start the job
    #[error("Scrape launch rejected (status {status}): {body}")]
    RemoteLaunch { status: u16, body: String },

    /// The scraping job did not reach a terminal state in time
    #[error("Scrape job {job_id} still running after {attempts} status checks")]
    PollTimeout { job_id: String, attempts: u32 },

    /// A remote API answered with a body we cannot interpret
    #[error("Unexpected response from {service}: {message}")]
    UnexpectedResponse { service: String, message: String },

    /// Mail could not be built, authenticated or transmitted
    #[error("Delivery error: {0}")]
    Delivery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a launch error from a rejected response.
    pub fn remote_launch(status: u16, body: impl Into<String>) -> Self {
        Self::RemoteLaunch {
            status,
            body: body.into(),
        }
    }

    /// Create a poll timeout error.
    pub fn poll_timeout(job_id: impl Into<String>, attempts: u32) -> Self {
        Self::PollTimeout {
            job_id: job_id.into(),
            attempts,
        }
    }

    /// Create an unexpected response error.
    pub fn unexpected(service: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::UnexpectedResponse {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Create a delivery error.
    pub fn delivery(message: impl fmt::Display) -> Self {
        Self::Delivery(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
