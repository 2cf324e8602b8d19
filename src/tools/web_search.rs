//! Web search tool backed by the Tavily search API.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::Tool;

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// Search the web via Tavily.
pub struct WebSearch {
    client: reqwest::Client,
    api_key: String,
    max_results: usize,
    search_url: String,
}

impl WebSearch {
    pub fn new(api_key: String, max_results: usize) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; ResearchAgent/1.0)")
            .timeout(Duration::from_secs(30))
            .build()
            .expect("valid reqwest client config");

        Self {
            client,
            api_key,
            max_results,
            search_url: TAVILY_SEARCH_URL.to_string(),
        }
    }

    /// Override the search endpoint (for tests or proxies).
    pub fn with_search_url(mut self, search_url: String) -> Self {
        self.search_url = search_url;
        self
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'static str,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    title: String,
    url: String,
    content: String,
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information. Returns search results with titles, URLs, and content snippets. Use for finding current information and sources to cite."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<String> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;

        let request = SearchRequest {
            query,
            max_results: self.max_results,
            search_depth: "advanced",
        };

        let response = self
            .client
            .post(&self.search_url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow::anyhow!("Search API error: {}", status));
        }

        let search_response: SearchResponse = response.json().await?;

        if search_response.results.is_empty() {
            Ok(format!("No results found for: {}", query))
        } else {
            Ok(format_results(&search_response.results))
        }
    }
}

/// Format search hits as blocks the model can quote and cite.
fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("Title: {}\nURL: {}\nContent: {}\n", r.title, r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n---\n")
}
