// src/services/enricher.rs

//! Email enrichment service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::models::EnrichmentConfig;

/// Resolves an email address for a profile.
///
/// Failures mean "no email found" and never abort a run.
#[async_trait]
pub trait EmailEnricher: Send + Sync {
    async fn resolve_email(&self, profile_url: &str) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct EnrichResponse {
    #[serde(default)]
    email: Option<String>,
}

/// Enricher backed by the Expandi profile API.
pub struct ExpandiEnricher {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl ExpandiEnricher {
    pub fn new(config: &EnrichmentConfig, client: Client) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            client,
        }
    }
}

#[async_trait]
impl EmailEnricher for ExpandiEnricher {
    async fn resolve_email(&self, profile_url: &str) -> Option<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "linkedin_url": profile_url }))
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Enrichment request for {} failed: {}", profile_url, e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            log::debug!(
                "Enrichment for {} returned status {}",
                profile_url,
                response.status()
            );
            return None;
        }

        match response.json::<EnrichResponse>().await {
            Ok(body) => body.email.filter(|e| !e.is_empty()),
            Err(e) => {
                log::warn!("Enrichment response for {} unreadable: {}", profile_url, e);
                None
            }
        }
    }
}
