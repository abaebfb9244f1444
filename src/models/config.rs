//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scraping platform settings
    #[serde(default)]
    pub phantombuster: ScraperConfig,

    /// Enrichment service settings
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Mail relay settings
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Message content
    #[serde(default)]
    pub outreach: OutreachConfig,

    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Console output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Build a configuration from defaults and the process environment only.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| env::var(key).ok())
    }

    /// Overlay values from an arbitrary lookup. Empty values are ignored.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("PHANTOMBUSTER_API_KEY") {
            self.phantombuster.api_key = v;
        }
        if let Some(v) = get("PHANTOMBUSTER_AGENT_ID") {
            self.phantombuster.agent_id = v;
        }
        if let Some(v) = get("SEARCH_QUERY") {
            self.phantombuster.search_query = v;
        }
        if let Some(v) = get("DAILY_BATCH_SIZE") {
            self.phantombuster.batch_size = parse_var("DAILY_BATCH_SIZE", &v)?;
        }
        if let Some(v) = get("EXPANDI_API_KEY") {
            self.enrichment.api_key = v;
        }
        if let Some(v) = get("SMTP_SERVER") {
            self.smtp.host = v;
        }
        if let Some(v) = get("SMTP_PORT") {
            self.smtp.port = parse_var("SMTP_PORT", &v)?;
        }
        if let Some(v) = get("EMAIL_USERNAME") {
            self.smtp.username = v;
        }
        if let Some(v) = get("EMAIL_PASSWORD") {
            self.smtp.password = v;
        }
        if let Some(v) = get("FROM_ADDRESS") {
            self.smtp.from_address = Some(v);
        }
        if let Some(v) = get("CALENDLY_LINK") {
            self.outreach.scheduling_link = v;
        }
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let pb = &self.phantombuster;
        if pb.api_key.trim().is_empty() {
            return Err(AppError::validation("phantombuster.api_key is empty"));
        }
        if pb.agent_id.trim().is_empty() {
            return Err(AppError::validation("phantombuster.agent_id is empty"));
        }
        if pb.batch_size == 0 {
            return Err(AppError::validation("phantombuster.batch_size must be > 0"));
        }
        if pb.poll_interval_ms == 0 {
            return Err(AppError::validation(
                "phantombuster.poll_interval_ms must be > 0",
            ));
        }
        if pb.max_poll_attempts == 0 {
            return Err(AppError::validation(
                "phantombuster.max_poll_attempts must be > 0",
            ));
        }
        if !pb.delimiter.is_ascii() {
            return Err(AppError::validation(
                "phantombuster.delimiter must be an ASCII character",
            ));
        }
        if self.enrichment.api_key.trim().is_empty() {
            return Err(AppError::validation("enrichment.api_key is empty"));
        }
        if self.smtp.host.trim().is_empty() {
            return Err(AppError::validation("smtp.host is empty"));
        }
        if self.smtp.port == 0 {
            return Err(AppError::validation("smtp.port must be > 0"));
        }
        if self.smtp.username.trim().is_empty() {
            return Err(AppError::validation("smtp.username is empty"));
        }
        if self.outreach.subject.trim().is_empty() {
            return Err(AppError::validation("outreach.subject is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::config(format!("{key} has an invalid value: {value:?}")))
}

/// Scraping platform (PhantomBuster) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Base URL of the agent API
    #[serde(default = "defaults::pb_api_base")]
    pub api_base: String,

    /// Base URL the result exports are published under
    #[serde(default = "defaults::pb_export_base")]
    pub export_base: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub agent_id: String,

    /// Search passed as the first launch argument
    #[serde(default = "defaults::search_query")]
    pub search_query: String,

    /// Number of leads requested per run
    #[serde(default = "defaults::batch_size")]
    pub batch_size: u32,

    /// Delay between status checks in milliseconds
    #[serde(default = "defaults::poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Status checks before giving up on the job
    #[serde(default = "defaults::max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Field delimiter of the result export
    #[serde(default = "defaults::delimiter")]
    pub delimiter: char,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::pb_api_base(),
            export_base: defaults::pb_export_base(),
            api_key: String::new(),
            agent_id: String::new(),
            search_query: defaults::search_query(),
            batch_size: defaults::batch_size(),
            poll_interval_ms: defaults::poll_interval_ms(),
            max_poll_attempts: defaults::max_poll_attempts(),
            delimiter: defaults::delimiter(),
        }
    }
}

/// Enrichment service (Expandi) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "defaults::enrich_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::enrich_endpoint(),
            api_key: String::new(),
        }
    }
}

/// Mail relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "defaults::smtp_host")]
    pub host: String,

    #[serde(default = "defaults::smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub username: String,

    #[serde(default, skip_serializing)]
    pub password: String,

    /// Sender address, the username is used when unset
    #[serde(default)]
    pub from_address: Option<String>,
}

impl SmtpConfig {
    pub fn sender(&self) -> &str {
        self.from_address.as_deref().unwrap_or(&self.username)
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: defaults::smtp_host(),
            port: defaults::smtp_port(),
            username: String::new(),
            password: String::new(),
            from_address: None,
        }
    }
}

/// Outreach message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutreachConfig {
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// Body template, supports `{name}` and `{scheduling_link}`
    #[serde(default = "defaults::body_template")]
    pub body_template: String,

    #[serde(default)]
    pub scheduling_link: String,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            subject: defaults::subject(),
            body_template: defaults::body_template(),
            scheduling_link: String::new(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Console output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Print one line per processed lead
    #[serde(default = "defaults::show_progress")]
    pub show_progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            show_progress: defaults::show_progress(),
        }
    }
}

mod defaults {
    // Scraper defaults
    pub fn pb_api_base() -> String {
        "https://api.phantombuster.com/api/v2".into()
    }
    pub fn pb_export_base() -> String {
        "https://phantombuster.s3.amazonaws.com".into()
    }
    pub fn search_query() -> String {
        "site:linkedin.com/in AND \"CEO\" AND \"tech startups\"".into()
    }
    pub fn batch_size() -> u32 {
        20
    }
    pub fn poll_interval_ms() -> u64 {
        5_000
    }
    pub fn max_poll_attempts() -> u32 {
        360
    }
    pub fn delimiter() -> char {
        ','
    }

    // Enrichment defaults
    pub fn enrich_endpoint() -> String {
        "https://api.expandi.io/profiles/enrich".into()
    }

    // SMTP defaults
    pub fn smtp_host() -> String {
        "smtp.gmail.com".into()
    }
    pub fn smtp_port() -> u16 {
        587
    }

    // Message defaults
    pub fn subject() -> String {
        "Free 30-Min AI Consultation & Workflow Audit".into()
    }
    pub fn body_template() -> String {
        concat!(
            "Hi {name},\n\n",
            "I'm reaching out from Plato-Group.ai. We specialize in AI agents that automate ",
            "workflows, boost efficiency, and reduce costs.\n\n",
            "I'd like to offer you a complimentary 30-minute consultation and business audit ",
            "to explore how AI-driven solutions can save your operations time and money. ",
            "No obligations, just actionable insights.\n\n",
            "Book here: {scheduling_link}\n\n",
            "Best regards,\n",
            "[Your Name]",
        )
        .into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; leadreach/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn show_progress() -> bool {
        true
    }
}
