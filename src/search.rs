use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::SearchSettings;
use crate::error::AnnotationError;

/// A single search hit. Characteristic fields are only known at runtime, so
/// the document stays an untyped JSON object.
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub response: SearchBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchBody {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub docs: Vec<Document>,
}

impl SearchResponse {
    pub fn total(&self) -> u64 {
        self.response.num_found
    }

    pub fn docs(&self) -> &[Document] {
        &self.response.docs
    }
}

pub trait SearchClient {
    fn fetch_page(&self, start: u64, rows: u64) -> Result<SearchResponse, AnnotationError>;
}

#[derive(Clone)]
pub struct SolrHttpClient {
    client: Client,
    settings: SearchSettings,
}

impl SolrHttpClient {
    pub fn new(settings: SearchSettings) -> Result<Self, AnnotationError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!(
                "biosamples-annotations/{}",
                env!("CARGO_PKG_VERSION")
            ))
            .map_err(|err| AnnotationError::SearchHttp(err.to_string()))?,
        );
        // None disables the blocking client's default 30s timeout.
        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|err| AnnotationError::SearchHttp(err.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn page_url(&self, start: u64, rows: u64) -> Result<Url, AnnotationError> {
        let start = start.to_string();
        let rows = rows.to_string();
        Url::parse_with_params(
            &self.settings.endpoint,
            &[
                ("q", self.settings.query.as_str()),
                ("fl", self.settings.fields.as_str()),
                ("wt", "json"),
                ("start", start.as_str()),
                ("rows", rows.as_str()),
            ],
        )
        .map_err(|err| {
            AnnotationError::InvalidEndpoint(format!("{}: {err}", self.settings.endpoint))
        })
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, AnnotationError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "search request failed".to_string());
        Err(AnnotationError::SearchStatus { status, message })
    }
}

impl SearchClient for SolrHttpClient {
    fn fetch_page(&self, start: u64, rows: u64) -> Result<SearchResponse, AnnotationError> {
        let url = self.page_url(start, rows)?;
        debug!(%url, "requesting search page");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| AnnotationError::SearchHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        response
            .json()
            .map_err(|err| AnnotationError::SearchDecode(err.to_string()))
    }
}
