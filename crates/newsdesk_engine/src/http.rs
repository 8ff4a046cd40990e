use std::time::Duration;

use futures_util::StreamExt;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Origin of the news backend; endpoint paths are joined onto it.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            max_bytes: 2 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid base url {url:?}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("could not build http client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug)]
pub(crate) enum BodyError {
    TooLarge { max_bytes: u64, actual: u64 },
    Transport(reqwest::Error),
}

/// Client plus resolved base URL shared by the search and auth bindings.
#[derive(Debug, Clone)]
pub(crate) struct HttpCore {
    pub(crate) client: reqwest::Client,
    base: Url,
    max_bytes: u64,
}

impl HttpCore {
    pub(crate) fn new(settings: &ClientSettings) -> Result<Self, SetupError> {
        let mut raw = settings.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw).map_err(|source| SetupError::BaseUrl {
            url: settings.base_url.clone(),
            source,
        })?;

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base,
            max_bytes: settings.max_bytes,
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, SetupError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|source| SetupError::BaseUrl {
                url: format!("{}{}", self.base, path),
                source,
            })
    }

    /// Streams the body, refusing to buffer more than `max_bytes`.
    pub(crate) async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, BodyError> {
        if let Some(declared) = response.content_length() {
            if declared > self.max_bytes {
                return Err(BodyError::TooLarge {
                    max_bytes: self.max_bytes,
                    actual: declared,
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(BodyError::Transport)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_bytes {
                return Err(BodyError::TooLarge {
                    max_bytes: self.max_bytes,
                    actual: next_len,
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}
