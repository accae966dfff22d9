use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::Config;

/// Failure kinds of a single provider call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("OMDB API key is missing")]
    MissingApiKey,
}

#[async_trait]
pub trait OmdbApi: Send + Sync {
    async fn lookup(&self, imdb_id: &str) -> Result<RawTitle, UpstreamError>;
    async fn search(&self, query: &str) -> Result<Vec<SearchStub>, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

/// Full title record as returned by `?i=<id>&plot=full`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTitle {
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Released")]
    pub released: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "Actors")]
    pub actors: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
}

/// Search hit; only the id is needed for the follow-up lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchStub {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(rename = "Search", default)]
    results: Vec<SearchStub>,
}

impl OmdbClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let user_agent = format!("moviedb/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build OMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    /// Issues one GET against the provider. `timeout` bounds the whole call;
    /// every transport, status and decoding failure maps to `Unavailable`.
    pub async fn request(
        &self,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingApiKey)?;

        let mut url = format!("{}?apikey={}", self.base_url, urlencoding::encode(api_key));
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }

        // reqwest errors embed the URL, which carries the API key.
        let res = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::Unavailable(e.without_url().to_string()))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| UpstreamError::Unavailable(e.without_url().to_string()))?;
        if !status.is_success() {
            return Err(UpstreamError::Unavailable(format!("HTTP status {}", status)));
        }
        serde_json::from_str(&text)
            .map_err(|e| UpstreamError::Unavailable(format!("JSON parse failed: {}", e)))
    }
}

#[async_trait]
impl OmdbApi for OmdbClient {
    async fn lookup(&self, imdb_id: &str) -> Result<RawTitle, UpstreamError> {
        let value = self
            .request(&[("i", imdb_id), ("plot", "full")], self.timeout)
            .await?;
        let value = check_response(value)?;
        serde_json::from_value(value)
            .map_err(|e| UpstreamError::Unavailable(format!("unexpected title shape: {}", e)))
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchStub>, UpstreamError> {
        let value = self
            .request(&[("s", query), ("type", "movie")], self.timeout)
            .await?;
        let value = check_response(value)?;
        let page: SearchPage = serde_json::from_value(value)
            .map_err(|e| UpstreamError::Unavailable(format!("unexpected search shape: {}", e)))?;
        Ok(page.results)
    }
}

/// The provider answers 200 for misses and flags them with `"Response": "False"`.
fn check_response(value: Value) -> Result<Value, UpstreamError> {
    if value.get("Response").and_then(Value::as_str) == Some("True") {
        return Ok(value);
    }
    let reason = value
        .get("Error")
        .and_then(Value::as_str)
        .unwrap_or("no match")
        .to_string();
    Err(UpstreamError::NotFound(reason))
}
