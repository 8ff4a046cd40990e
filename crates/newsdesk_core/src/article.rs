use chrono::{DateTime, Utc};

pub type ArticleId = String;

/// A search hit as received from the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub summary: String,
    pub category: String,
    pub published_at: DateTime<Utc>,
    /// Display string such as "4 min read".
    pub read_time: String,
    pub breaking: bool,
    pub source_name: Option<String>,
    pub source_url: Option<String>,
}

impl Article {
    pub fn category_color(&self) -> &'static str {
        category_color(&self.category)
    }
}

/// Where the search endpoint found its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provenance {
    Cached,
    #[default]
    Live,
}

impl Provenance {
    pub fn label(self) -> &'static str {
        match self {
            Provenance::Cached => "cached",
            Provenance::Live => "live",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionLink {
    pub title: String,
    pub url: String,
}

/// Offered instead of results when nothing cached matched the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub message: String,
    pub links: Vec<SuggestionLink>,
    pub tip: Option<String>,
}

/// Decoded answer of the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResponse {
    pub query: String,
    pub results_found: usize,
    pub provenance: Provenance,
    pub articles: Vec<Article>,
    pub suggestion: Option<Suggestion>,
    pub timestamp: Option<DateTime<Utc>>,
}

const NEUTRAL_COLOR: &str = "#6b7280";

const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("world", "#2563eb"),
    ("politics", "#dc2626"),
    ("business", "#059669"),
    ("technology", "#7c3aed"),
    ("science", "#0891b2"),
    ("health", "#db2777"),
    ("sports", "#ea580c"),
    ("entertainment", "#ca8a04"),
    ("culture", "#9333ea"),
    ("africa", "#16a34a"),
];

/// Accent color handed to the detail view for a category; case-insensitive.
pub fn category_color(category: &str) -> &'static str {
    let category = category.trim();
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(category))
        .map(|(_, color)| *color)
        .unwrap_or(NEUTRAL_COLOR)
}
