// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::Response;

use crate::error::Result;
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Read a response body for error reporting, truncated to `max` characters.
pub async fn body_snippet(response: Response, max: usize) -> String {
    match response.text().await {
        Ok(text) => text.chars().take(max).collect(),
        Err(e) => format!("<unreadable body: {e}>"),
    }
}
