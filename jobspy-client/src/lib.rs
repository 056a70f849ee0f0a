//! JobSpy client: ranked job postings for a list of search terms.
//!
//! Wraps the scraping-backed JobSpy HTTP service behind the [`JobProvider`]
//! trait. The service can be slow or flaky; every request is bounded by the
//! settings timeout and callers treat any `Err` as an empty result set.

use async_trait::async_trait;
use capy_core::{CapyError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// One job posting as returned by the search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Job search provider contract.
#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Searches postings for the given terms, capped at `limit`.
    async fn search(&self, terms: &[String], limit: usize) -> Result<Vec<JobPosting>>;
}

/// JobSpy service settings.
#[derive(Debug, Clone)]
pub struct JobSpySettings {
    pub base_url: String,
    /// Location every search is scoped to.
    pub location: String,
    pub timeout_seconds: u64,
}

impl Default for JobSpySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8600".to_string(),
            location: "Curitiba, PR".to_string(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    search_terms: &'a [String],
    location: &'a str,
    limit: usize,
}

/// Reqwest-based [`JobProvider`] for the JobSpy service.
pub struct JobSpyClient {
    settings: JobSpySettings,
    http: reqwest::Client,
}

impl JobSpyClient {
    pub fn new(settings: JobSpySettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| CapyError::Provider(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { settings, http })
    }
}

#[async_trait]
impl JobProvider for JobSpyClient {
    async fn search(&self, terms: &[String], limit: usize) -> Result<Vec<JobPosting>> {
        let url = format!("{}/search", self.settings.base_url);
        info!(?terms, limit, location = %self.settings.location, "Searching jobs");

        let response = self
            .http
            .post(&url)
            .json(&SearchRequest {
                search_terms: terms,
                location: &self.settings.location,
                limit,
            })
            .send()
            .await
            .map_err(|e| CapyError::Provider(format!("Job search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CapyError::Provider(format!(
                "Job search returned {}",
                response.status()
            )));
        }

        let mut postings: Vec<JobPosting> = response
            .json()
            .await
            .map_err(|e| CapyError::Provider(format!("Unreadable job search response: {}", e)))?;
        postings.truncate(limit);

        debug!(count = postings.len(), "Job search finished");
        Ok(postings)
    }
}
