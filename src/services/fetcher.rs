// src/services/fetcher.rs

//! Lead fetcher service.
//!
//! Launches the PhantomBuster search agent, waits for the job to finish and
//! turns the CSV result export into [`Lead`] records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::models::{FetchedLeads, JobHandle, JobStatus, Lead, ScraperConfig};
use crate::utils::http::body_snippet;
use crate::utils::join_url;

const SERVICE: &str = "phantombuster";
const KEY_HEADER: &str = "X-Phantombuster-Key";

/// Source of leads for a run.
#[async_trait]
pub trait LeadSource: Send + Sync {
    /// Produce the leads matching `search_query`, at most `batch_size` of them.
    async fn fetch_leads(&self, search_query: &str, batch_size: u32) -> Result<FetchedLeads>;
}

/// Fetches leads through a PhantomBuster agent.
pub struct PhantomBusterFetcher {
    config: ScraperConfig,
    client: Client,
}

impl PhantomBusterFetcher {
    pub fn new(config: &ScraperConfig, client: Client) -> Self {
        Self {
            config: config.clone(),
            client,
        }
    }

    /// Start the agent and return the handle of the new job.
    pub async fn launch(&self, search_query: &str, batch_size: u32) -> Result<JobHandle> {
        let url = join_url(
            &self.config.api_base,
            &format!("agents/{}/launch", self.config.agent_id),
        );
        let payload = json!({ "args": [search_query, batch_size] });

        let response = self
            .client
            .post(&url)
            .header(KEY_HEADER, &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::remote_launch(
                status.as_u16(),
                body_snippet(response, 500).await,
            ));
        }

        let body: Value = response.json().await?;
        Self::extract_job_id(&body).map(JobHandle::new).ok_or_else(|| {
            AppError::remote_launch(status.as_u16(), format!("no job id in response: {body}"))
        })
    }

    /// Ask the platform for the current state of a job.
    pub async fn poll_status(&self, job: &JobHandle) -> Result<JobStatus> {
        let url = join_url(
            &self.config.api_base,
            &format!("agents/{}/status/{}", self.config.agent_id, job),
        );

        let body: Value = self
            .client
            .get(&url)
            .header(KEY_HEADER, &self.config.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        body.pointer("/data/status")
            .and_then(Value::as_str)
            .map(JobStatus::parse)
            .ok_or_else(|| AppError::unexpected(SERVICE, format!("no data.status in {body}")))
    }

    /// Poll until the job is `finished` or `failed`.
    ///
    /// Gives up with [`AppError::PollTimeout`] after `max_poll_attempts` checks.
    pub async fn wait_for_completion(&self, job: &JobHandle) -> Result<JobStatus> {
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let max_attempts = self.config.max_poll_attempts.max(1);

        for attempt in 1..=max_attempts {
            let status = self.poll_status(job).await?;
            log::debug!("Job {} status check {}/{}: {:?}", job, attempt, max_attempts, status);

            if status.is_terminal() {
                return Ok(status);
            }
            if attempt < max_attempts {
                tokio::time::sleep(interval).await;
            }
        }

        Err(AppError::poll_timeout(job.as_str(), max_attempts))
    }

    /// Download the raw result export of a finished job.
    pub async fn download_export(&self, job: &JobHandle) -> Result<String> {
        let url = join_url(&self.config.export_base, &format!("{}/result.csv", job));
        let text = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }

    fn extract_job_id(body: &Value) -> Option<String> {
        ["/data/batchId", "/data/containerId", "/containerId"]
            .iter()
            .filter_map(|p| body.pointer(p))
            .find_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }
}

#[async_trait]
impl LeadSource for PhantomBusterFetcher {
    async fn fetch_leads(&self, search_query: &str, batch_size: u32) -> Result<FetchedLeads> {
        let job = self.launch(search_query, batch_size).await?;
        log::info!("Launched scrape job {}", job);

        let status = self.wait_for_completion(&job).await?;
        if status != JobStatus::Finished {
            log::warn!("Scrape job {} failed, no leads for this run", job);
            return Ok(FetchedLeads::default());
        }

        let export = self.download_export(&job).await?;
        parse_export(&export, self.config.delimiter)
    }
}

/// Parse a result export into leads.
///
/// The first line is a header. Columns are positional: profile URL, then name.
/// Each line is parsed on its own, so a damaged row never swallows the rows
/// after it. Rows that cannot be read are skipped and counted as malformed.
pub fn parse_export(text: &str, delimiter: char) -> Result<FetchedLeads> {
    if !delimiter.is_ascii() {
        return Err(AppError::config(format!(
            "export delimiter {delimiter:?} is not ASCII"
        )));
    }

    let mut fetched = FetchedLeads::default();

    for (idx, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }

        match parse_row(line, delimiter as u8) {
            Some(lead) => fetched.leads.push(lead),
            None => {
                log::warn!("Skipping malformed export row at line {}: {:?}", idx + 1, line);
                fetched.malformed_rows += 1;
            }
        }
    }

    Ok(fetched)
}

fn parse_row(line: &str, delimiter: u8) -> Option<Lead> {
    // An odd quote count means a quoted field is never closed.
    if line.matches('"').count() % 2 != 0 {
        return None;
    }

    let record = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes())
        .records()
        .next()?
        .ok()?;

    match (record.get(0), record.get(1)) {
        (Some(url), Some(name)) if !url.is_empty() && !name.is_empty() => {
            Some(Lead::new(name, url))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_config(server: &MockServer) -> ScraperConfig {
        ScraperConfig {
            api_base: server.uri(),
            export_base: server.uri(),
            api_key: "pb-key".to_string(),
            agent_id: "7".to_string(),
            poll_interval_ms: 1,
            max_poll_attempts: 3,
            ..ScraperConfig::default()
        }
    }

    fn fetcher(server: &MockServer) -> PhantomBusterFetcher {
        PhantomBusterFetcher::new(&test_config(server), Client::new())
    }

    async fn mount_launch(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/agents/7/launch"))
            .and(header(KEY_HEADER, "pb-key"))
            .and(body_json(json!({ "args": ["CEO", 2] })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "batchId": "job-1" } })),
            )
            .mount(server)
            .await;
    }

    fn status_body(status: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({ "data": { "status": status } }))
    }

    #[test]
    fn test_parse_export_trims_fields() {
        let text = "profileUrl,name\nhttps://li/a, Alice\n  https://li/b ,Bob  \n";
        let fetched = parse_export(text, ',').unwrap();

        assert_eq!(fetched.malformed_rows, 0);
        assert_eq!(
            fetched.leads,
            vec![Lead::new("Alice", "https://li/a"), Lead::new("Bob", "https://li/b")]
        );
    }

    #[test]
    fn test_parse_export_header_only() {
        let fetched = parse_export("profileUrl,name\n", ',').unwrap();
        assert!(fetched.leads.is_empty());
        assert_eq!(fetched.malformed_rows, 0);

        let fetched = parse_export("", ',').unwrap();
        assert!(fetched.leads.is_empty());
    }

    #[test]
    fn test_parse_export_skips_malformed_rows() {
        let text = "profileUrl,name\nhttps://li/a\n,NoUrl\nhttps://li/c,Carol,extra\n";
        let fetched = parse_export(text, ',').unwrap();

        assert_eq!(fetched.leads, vec![Lead::new("Carol", "https://li/c")]);
        assert_eq!(fetched.malformed_rows, 2);
    }

    #[test]
    fn test_parse_export_unclosed_quote_only_loses_its_row() {
        let text = "profileUrl,name\nhttps://li/a,\"Alice\nhttps://li/b,Bob\nhttps://li/c,Carol\n";
        let fetched = parse_export(text, ',').unwrap();

        assert_eq!(fetched.malformed_rows, 1);
        assert_eq!(
            fetched.leads,
            vec![Lead::new("Bob", "https://li/b"), Lead::new("Carol", "https://li/c")]
        );
    }

    #[test]
    fn test_parse_export_crlf_and_blank_lines() {
        let text = "profileUrl,name\r\nhttps://li/a,Alice\r\n\r\nhttps://li/b,Bob\r\n";
        let fetched = parse_export(text, ',').unwrap();

        assert_eq!(fetched.malformed_rows, 0);
        assert_eq!(fetched.leads.len(), 2);
        assert_eq!(fetched.leads[1], Lead::new("Bob", "https://li/b"));
    }

    #[test]
    fn test_parse_export_quoted_and_custom_delimiter() {
        let fetched = parse_export("url,name\n\"https://li/d\",\"Doe, Jane\"\n", ',').unwrap();
        assert_eq!(fetched.leads[0].name, "Doe, Jane");

        let fetched = parse_export("url;name\nhttps://li/e;Eve\n", ';').unwrap();
        assert_eq!(fetched.leads, vec![Lead::new("Eve", "https://li/e")]);
    }

    #[test]
    fn test_parse_export_rejects_non_ascii_delimiter() {
        assert!(parse_export("a→b\n", '→').is_err());
    }

    #[test]
    fn test_extract_job_id_variants() {
        let id = PhantomBusterFetcher::extract_job_id(&json!({ "data": { "batchId": "b1" } }));
        assert_eq!(id.as_deref(), Some("b1"));

        let id = PhantomBusterFetcher::extract_job_id(&json!({ "containerId": 4711 }));
        assert_eq!(id.as_deref(), Some("4711"));

        assert!(PhantomBusterFetcher::extract_job_id(&json!({ "data": {} })).is_none());
    }

    #[tokio::test]
    async fn test_fetch_leads_finished() {
        let server = MockServer::start().await;
        mount_launch(&server).await;

        Mock::given(method("GET"))
            .and(path("/agents/7/status/job-1"))
            .respond_with(status_body("running"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/agents/7/status/job-1"))
            .respond_with(status_body("finished"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/job-1/result.csv"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("profileUrl,name\nhttps://li/a, Alice\nhttps://li/b, Bob\n"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetched = fetcher(&server).fetch_leads("CEO", 2).await.unwrap();
        assert_eq!(fetched.leads.len(), 2);
        assert_eq!(fetched.leads[0], Lead::new("Alice", "https://li/a"));
        assert_eq!(fetched.leads[1], Lead::new("Bob", "https://li/b"));
    }

    #[tokio::test]
    async fn test_fetch_leads_failed_job_is_empty() {
        let server = MockServer::start().await;
        mount_launch(&server).await;

        Mock::given(method("GET"))
            .and(path("/agents/7/status/job-1"))
            .respond_with(status_body("failed"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/job-1/result.csv"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let fetched = fetcher(&server).fetch_leads("CEO", 2).await.unwrap();
        assert!(fetched.leads.is_empty());
    }

    #[tokio::test]
    async fn test_launch_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/agents/7/launch"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = fetcher(&server).fetch_leads("CEO", 2).await.unwrap_err();
        match err {
            AppError::RemoteLaunch { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_poll_gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        mount_launch(&server).await;

        Mock::given(method("GET"))
            .and(path("/agents/7/status/job-1"))
            .respond_with(status_body("running"))
            .expect(3)
            .mount(&server)
            .await;

        let err = fetcher(&server).fetch_leads("CEO", 2).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::PollTimeout { ref job_id, attempts: 3 } if job_id == "job-1"
        ));
    }

    #[tokio::test]
    async fn test_status_without_state_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/agents/7/status/job-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .mount(&server)
            .await;

        let err = fetcher(&server)
            .poll_status(&JobHandle::new("job-9"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnexpectedResponse { .. }));
    }
}
