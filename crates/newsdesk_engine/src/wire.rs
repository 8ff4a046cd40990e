//! JSON shapes of the news backend and their mapping onto core types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use desk_logging::desk_warn;
use newsdesk_core::{
    Article, Provenance, SearchResponse, Suggestion, SuggestionLink, UserProfile,
};
use serde::{de, Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchRequestBody<'a> {
    pub(crate) query: &'a str,
    pub(crate) max_results: u32,
}

/// Ids arrive as numbers from some backends and strings from others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireId {
    Number(u64),
    Text(String),
}

impl WireId {
    fn into_string(self) -> String {
        match self {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WireSource {
    Cached,
    #[default]
    #[serde(other)]
    Web,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireArticle {
    id: WireId,
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    category: String,
    #[serde(alias = "date", deserialize_with = "lenient_timestamp")]
    published_at: DateTime<Utc>,
    #[serde(default)]
    read_time: String,
    #[serde(default)]
    breaking: bool,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    source_url: Option<String>,
}

/// RFC 3339, a zone-less `YYYY-MM-DDTHH:MM:SS` (read as UTC) or a bare date.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("unrecognised timestamp {raw:?}")))
}

impl From<WireArticle> for Article {
    fn from(wire: WireArticle) -> Self {
        Article {
            id: wire.id.into_string(),
            title: wire.title,
            summary: wire.summary,
            category: wire.category,
            published_at: wire.published_at,
            read_time: wire.read_time,
            breaking: wire.breaking,
            source_name: wire.source.filter(|s| !s.trim().is_empty()),
            source_url: wire.source_url.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLink {
    #[serde(alias = "name")]
    title: String,
    url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSuggestion {
    #[serde(default)]
    message: String,
    #[serde(default)]
    links: Vec<WireLink>,
    #[serde(default)]
    tip: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireSearchResponse {
    #[serde(default)]
    pub(crate) success: Option<bool>,
    #[serde(default)]
    query: String,
    #[serde(default)]
    results_found: Option<usize>,
    #[serde(default)]
    source: WireSource,
    /// Decoded one by one so a single bad record does not sink the page.
    #[serde(default)]
    articles: Vec<serde_json::Value>,
    #[serde(default)]
    suggestion: Option<WireSuggestion>,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

impl WireSearchResponse {
    pub(crate) fn into_domain(self) -> SearchResponse {
        let articles: Vec<Article> = self
            .articles
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value::<WireArticle>(raw) {
                Ok(wire) => Some(Article::from(wire)),
                Err(err) => {
                    desk_warn!("search: skipping undecodable article #{}: {}", index, err);
                    None
                }
            })
            .collect();
        SearchResponse {
            query: self.query,
            results_found: self.results_found.unwrap_or(articles.len()),
            provenance: match self.source {
                WireSource::Cached => Provenance::Cached,
                WireSource::Web => Provenance::Live,
            },
            articles,
            suggestion: self.suggestion.map(|s| Suggestion {
                message: s.message,
                links: s
                    .links
                    .into_iter()
                    .map(|link| SuggestionLink {
                        title: link.title,
                        url: link.url,
                    })
                    .collect(),
                tip: s.tip,
            }),
            timestamp: self.timestamp,
        }
    }
}

/// Body of a rejected request: `{"error": "..."}` or `{"message": "..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct WireErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub(crate) fn error_detail(body: &[u8]) -> Option<String> {
    let parsed: WireErrorBody = serde_json::from_slice(body).ok()?;
    parsed.error.or(parsed.message).filter(|s| !s.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireUser {
    id: WireId,
    username: String,
    #[serde(default, alias = "name")]
    display_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl From<WireUser> for UserProfile {
    fn from(wire: WireUser) -> Self {
        let display_name = wire
            .display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| wire.username.clone());
        UserProfile {
            id: wire.id.into_string(),
            username: wire.username,
            display_name,
            email: wire.email,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVerify {
    pub(crate) valid: bool,
    #[serde(default)]
    pub(crate) user: Option<WireUser>,
}
