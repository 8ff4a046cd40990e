use crate::{
    AuthState, AuthStatus, Provenance, SearchOutcome, SearchPhase, SearchState, Suggestion,
    UserProfile,
};

const PUBLISHED_FORMAT: &str = "%b %e, %Y %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchViewModel {
    pub query: String,
    pub phase: SearchPhase,
    pub dropdown_open: bool,
    /// One-line status under the search box (spinner text, error, counts).
    pub status_line: Option<String>,
    pub rows: Vec<ResultRowView>,
    pub provenance: Option<Provenance>,
    pub suggestion: Option<Suggestion>,
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub index: usize,
    pub title: String,
    pub summary: String,
    pub category: String,
    pub category_color: &'static str,
    pub published: String,
    pub read_time: String,
    pub breaking: bool,
    pub source: Option<String>,
    pub hovered: bool,
}

impl SearchState {
    pub fn view(&self) -> SearchViewModel {
        let mut view = SearchViewModel {
            query: self.query().to_string(),
            phase: self.phase(),
            dropdown_open: self.is_dropdown_open(),
            ..SearchViewModel::default()
        };

        match self.outcome() {
            SearchOutcome::Empty => {
                if self.phase() == SearchPhase::Settled {
                    view.status_line =
                        Some(format!("No articles found for \"{}\".", self.query().trim()));
                }
            }
            SearchOutcome::Loading => {
                view.status_line = Some("Searching…".to_string());
            }
            SearchOutcome::Results {
                articles,
                provenance,
            } => {
                let noun = if articles.len() == 1 { "result" } else { "results" };
                view.status_line = Some(format!(
                    "{} {} ({})",
                    articles.len(),
                    noun,
                    provenance.label()
                ));
                view.provenance = Some(*provenance);
                view.rows = articles
                    .iter()
                    .enumerate()
                    .map(|(index, article)| ResultRowView {
                        index,
                        title: article.title.clone(),
                        summary: article.summary.clone(),
                        category: article.category.clone(),
                        category_color: article.category_color(),
                        published: article.published_at.format(PUBLISHED_FORMAT).to_string(),
                        read_time: article.read_time.clone(),
                        breaking: article.breaking,
                        source: article.source_name.clone(),
                        hovered: self.hovered() == Some(index),
                    })
                    .collect();
            }
            SearchOutcome::Suggestion(suggestion) => {
                view.status_line = Some(suggestion.message.clone());
                view.suggestion = Some(suggestion.clone());
            }
            SearchOutcome::Failure(failure) => {
                view.status_line = Some(failure.user_message());
                view.is_error = true;
            }
        }

        view
    }
}

/// What a protected route renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateView {
    /// Status still unknown: neutral placeholder, never content or redirect.
    Loading,
    Protected(UserProfile),
    Redirect,
}

impl AuthState {
    pub fn gate_view(&self) -> GateView {
        match self.status() {
            AuthStatus::Unknown => GateView::Loading,
            AuthStatus::Authenticated(user) => GateView::Protected(user.clone()),
            AuthStatus::Unauthenticated => GateView::Redirect,
        }
    }
}
