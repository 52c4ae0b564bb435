use std::sync::Arc;
use std::time::Duration;

use finder_logging::{finder_debug, finder_info};
use futures_util::StreamExt;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde::Serialize;

use crate::credentials::CredentialProvider;
use crate::response::parse_hits;
use crate::{FailureKind, JobPosting, SearchError};

pub const DEFAULT_ENDPOINT: &str = "https://apijob-job-searching-api.p.rapidapi.com/v1/job/search";
pub const API_KEY_HEADER: &str = "X-RapidAPI-Key";
pub const API_HOST_HEADER: &str = "X-RapidAPI-Host";

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid search endpoint {endpoint:?}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    #[error("{name} is not a valid header value")]
    InvalidHeader { name: &'static str },
    #[error("failed to build http client: {0}")]
    Build(#[from] reqwest::Error),
}

#[async_trait::async_trait]
pub trait JobSearchClient: Send + Sync {
    /// Runs one search. Every failure is returned, never panicked.
    async fn search(&self, query: &str) -> Result<Vec<JobPosting>, SearchError>;
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
}

pub struct ReqwestSearchClient {
    settings: SearchSettings,
    endpoint: Url,
    credentials: Arc<dyn CredentialProvider>,
    client: reqwest::Client,
}

impl ReqwestSearchClient {
    pub fn new(
        settings: SearchSettings,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ClientError> {
        let endpoint =
            Url::parse(&settings.endpoint).map_err(|err| ClientError::InvalidEndpoint {
                endpoint: settings.endpoint.clone(),
                message: err.to_string(),
            })?;
        if let Some(api_key) = credentials.api_key() {
            header_value(API_KEY_HEADER, api_key)?;
        }
        header_value(API_HOST_HEADER, credentials.api_host())?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self {
            settings,
            endpoint,
            credentials,
            client,
        })
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, SearchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, Some(content_len)));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, Some(next_len)));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl JobSearchClient for ReqwestSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<JobPosting>, SearchError> {
        let api_key = self.credentials.api_key().ok_or_else(|| {
            SearchError::new(
                FailureKind::MissingCredentials,
                "no API key configured for the search gateway",
            )
        })?;
        let mut api_key = header_value(API_KEY_HEADER, api_key)
            .map_err(|err| SearchError::new(FailureKind::MissingCredentials, err.to_string()))?;
        api_key.set_sensitive(true);
        let api_host = header_value(API_HOST_HEADER, self.credentials.api_host())
            .map_err(|err| SearchError::new(FailureKind::MissingCredentials, err.to_string()))?;
        let body = serde_json::to_vec(&SearchRequest { q: query })
            .map_err(|err| SearchError::new(FailureKind::MalformedBody, err.to_string()))?;

        finder_debug!("POST {} ({} byte body)", self.endpoint, body.len());
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key)
            .header(API_HOST_HEADER, api_host)
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = self.read_body(response).await?;
        let jobs = parse_hits(&bytes)?;
        finder_info!("Search returned {} hits ({} bytes)", jobs.len(), bytes.len());
        Ok(jobs)
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|_| ClientError::InvalidHeader { name })
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> SearchError {
    SearchError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        return SearchError::new(FailureKind::Timeout, err.to_string());
    }
    SearchError::new(FailureKind::Network, err.to_string())
}
