//! Web-search tool: open web search through the Tavily API.
//!
//! Network failures, quota errors, and malformed responses are all rendered
//! as error text; the reasoning loop reacts to them as observations.

use crate::Tool;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument, warn};

const NAME: &str = "web_search";
const DESCRIPTION: &str = "Search the web for general dental information (causes of dental \
    diseases, cures, tips, prevention). Input: a search query. Output: a summary of the top \
    results.";
const INPUT_CONTRACT: &str = "a free-text search query";

const DEFAULT_ENDPOINT: &str = "https://api.tavily.com/search";
const MAX_RESULTS: usize = 5;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
}

#[derive(Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) answer: Option<String>,
    #[serde(default)]
    pub(crate) results: Vec<SearchResult>,
}

#[derive(Deserialize)]
pub(crate) struct SearchResult {
    pub(crate) title: String,
    pub(crate) url: String,
    pub(crate) content: String,
}

/// Tool calling the Tavily search API with a fixed key. Stateless; safe to
/// share across sessions.
#[derive(Clone)]
pub struct WebSearchTool {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl WebSearchTool {
    /// Creates a tool using the default Tavily endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Creates a tool against a custom endpoint (tests, proxies).
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    async fn run(&self, query: &str) -> anyhow::Result<String> {
        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results: MAX_RESULTS,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        let body: SearchResponse = response.json().await?;
        info!(results = body.results.len(), "web search done");
        Ok(format_results(&body))
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        DESCRIPTION
    }

    fn input_contract(&self) -> &str {
        INPUT_CONTRACT
    }

    #[instrument(skip(self, input))]
    async fn invoke(&self, input: &str) -> String {
        match self.run(input).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "web search failed");
                format!("{NAME} error: {e}")
            }
        }
    }
}

/// Formats the provider response as readable text: optional answer first,
/// then one `title — content (url)` line per result.
pub(crate) fn format_results(response: &SearchResponse) -> String {
    let mut lines = Vec::new();
    if let Some(answer) = response.answer.as_deref().filter(|a| !a.trim().is_empty()) {
        lines.push(format!("Answer: {answer}"));
    }
    for result in &response.results {
        lines.push(format!(
            "- {}: {} ({})",
            result.title, result.content, result.url
        ));
    }
    if lines.is_empty() {
        "No results found.".to_string()
    } else {
        format!("Search results:\n{}", lines.join("\n"))
    }
}
