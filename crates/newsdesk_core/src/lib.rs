//! Newsdesk core: pure search and auth-gate state machines plus view-model helpers.
mod article;
mod effect;
mod failure;
mod msg;
mod state;
mod update;
mod view_model;

pub use article::{
    category_color, Article, ArticleId, Provenance, SearchResponse, Suggestion, SuggestionLink,
};
pub use effect::{AuthEffect, SearchEffect};
pub use failure::{AuthFailure, SearchFailure};
pub use msg::{AuthMsg, SearchMsg, Verdict};
pub use state::{
    AuthState, AuthStatus, RequestSeq, SearchOutcome, SearchPhase, SearchSettings, SearchState,
    UserProfile,
};
pub use update::{update_auth, update_search};
pub use view_model::{GateView, ResultRowView, SearchViewModel};
