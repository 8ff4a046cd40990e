use newsdesk_core::{SearchFailure, SearchResponse};
use reqwest::StatusCode;
use url::Url;

use crate::http::{BodyError, ClientSettings, HttpCore, SetupError};
use crate::wire::{error_detail, SearchRequestBody, WireSearchResponse};
use crate::SearchError;

/// The endpoint refuses queries shorter than this many trimmed characters.
pub const MIN_QUERY_CHARS: usize = 2;

const SEARCH_PATH: &str = "api/search";

#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<SearchResponse, SearchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSearchClient {
    http: HttpCore,
    endpoint: Url,
}

impl ReqwestSearchClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, SetupError> {
        let http = HttpCore::new(settings)?;
        let endpoint = http.endpoint(SEARCH_PATH)?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait::async_trait]
impl SearchClient for ReqwestSearchClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<SearchResponse, SearchError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Err(SearchError::new(
                SearchFailure::TooShort,
                format!("query must be at least {MIN_QUERY_CHARS} characters"),
            ));
        }

        let response = self
            .http
            .client
            .post(self.endpoint.clone())
            .json(&SearchRequestBody { query, max_results })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            let detail = match self.http.read_body(response).await {
                Ok(body) => error_detail(&body),
                Err(_) => None,
            };
            return Err(SearchError::new(
                SearchFailure::BadRequest,
                detail.unwrap_or_else(|| status.to_string()),
            ));
        }
        if !status.is_success() {
            return Err(SearchError::new(
                SearchFailure::ServerError(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = self.http.read_body(response).await.map_err(map_body_error)?;
        let wire: WireSearchResponse = serde_json::from_slice(&body).map_err(|err| {
            SearchError::new(
                SearchFailure::Unknown,
                format!("malformed search response: {err}"),
            )
        })?;

        if wire.success == Some(false) {
            let message = wire
                .error
                .clone()
                .unwrap_or_else(|| "search reported failure".to_string());
            return Err(SearchError::new(SearchFailure::Unknown, message));
        }

        Ok(wire.into_domain())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        return SearchError::new(SearchFailure::Timeout, err.to_string());
    }
    SearchError::new(SearchFailure::Unknown, err.to_string())
}

fn map_body_error(err: BodyError) -> SearchError {
    match err {
        BodyError::TooLarge { max_bytes, actual } => SearchError::new(
            SearchFailure::Unknown,
            format!("response too large (max {max_bytes}, actual {actual})"),
        ),
        BodyError::Transport(err) => map_reqwest_error(err),
    }
}
