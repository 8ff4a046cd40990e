use std::time::Duration;

use crate::{Article, AuthFailure, Provenance, SearchFailure, Suggestion};

/// Sequence number of an issued search; strictly increasing per controller.
pub type RequestSeq = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Quiet window after the last keystroke before a request is issued.
    pub debounce: Duration,
    pub request_timeout: Duration,
    pub max_results: u32,
    /// Minimum trimmed length, in characters, of a searchable query.
    pub min_query_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(400),
            request_timeout: Duration::from_secs(10),
            max_results: 10,
            min_query_chars: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Query too short; nothing scheduled, no dropdown.
    #[default]
    Idle,
    /// Debounce timer armed, no request yet.
    Pending,
    /// Request issued, waiting for the answer.
    Loading,
    Settled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchOutcome {
    #[default]
    Empty,
    Loading,
    Results {
        articles: Vec<Article>,
        provenance: Provenance,
    },
    Suggestion(Suggestion),
    Failure(SearchFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InFlight {
    pub(crate) seq: RequestSeq,
    pub(crate) query: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    settings: SearchSettings,
    query: String,
    phase: SearchPhase,
    outcome: SearchOutcome,
    generation: u64,
    last_seq: RequestSeq,
    in_flight: Option<InFlight>,
    dropdown_open: bool,
    hovered: Option<usize>,
    torn_down: bool,
    dirty: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SearchSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    /// Sequence number of the request whose answer would still be applied.
    pub fn in_flight_seq(&self) -> Option<RequestSeq> {
        self.in_flight.as_ref().map(|f| f.seq)
    }

    pub fn in_flight_query(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|f| f.query.as_str())
    }

    /// Highest sequence number handed out so far.
    pub fn last_seq(&self) -> RequestSeq {
        self.last_seq
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// True while a timer or request is outstanding.
    pub fn is_busy(&self) -> bool {
        !self.torn_down && matches!(self.phase, SearchPhase::Pending | SearchPhase::Loading)
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Trimmed query if it is long enough to send.
    pub(crate) fn searchable_query(&self) -> Option<&str> {
        let trimmed = self.query.trim();
        (trimmed.chars().count() >= self.settings.min_query_chars).then_some(trimmed)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_query(&mut self, text: String) {
        self.query = text;
        self.mark_dirty();
    }

    pub(crate) fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn set_phase(&mut self, phase: SearchPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.mark_dirty();
        }
    }

    /// Returns whether a hovered row was dropped with the old outcome.
    pub(crate) fn set_outcome(&mut self, outcome: SearchOutcome) -> bool {
        if self.outcome == outcome {
            return false;
        }
        self.outcome = outcome;
        self.mark_dirty();
        self.hovered.take().is_some()
    }

    pub(crate) fn set_dropdown_open(&mut self, open: bool) {
        if self.dropdown_open != open {
            self.dropdown_open = open;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_hovered(&mut self, hovered: Option<usize>) -> bool {
        if self.hovered == hovered {
            return false;
        }
        self.hovered = hovered;
        self.mark_dirty();
        true
    }

    /// Allocates the next sequence number and makes it the current request.
    pub(crate) fn begin_request(&mut self, query: String) -> RequestSeq {
        self.last_seq += 1;
        self.in_flight = Some(InFlight {
            seq: self.last_seq,
            query,
        });
        self.last_seq
    }

    /// Forgets the current request, returning its seq if there was one.
    pub(crate) fn take_in_flight(&mut self) -> Option<RequestSeq> {
        self.in_flight.take().map(|f| f.seq)
    }

    /// Returns whether a hovered row was dropped.
    pub(crate) fn tear_down(&mut self) -> bool {
        self.torn_down = true;
        self.in_flight = None;
        self.dropdown_open = false;
        self.mark_dirty();
        self.hovered.take().is_some()
    }
}

/// Profile returned by a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Unknown,
    Authenticated(UserProfile),
    Unauthenticated,
}

impl AuthStatus {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, AuthStatus::Unknown)
    }
}

/// One gate lifecycle. A fresh lifecycle is a fresh `AuthState`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    status: AuthStatus,
    verifying: bool,
    failure: Option<AuthFailure>,
    dirty: bool,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &AuthStatus {
        &self.status
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.status {
            AuthStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_verifying(&self) -> bool {
        self.verifying
    }

    /// Reason for the last transition to `Unauthenticated`.
    pub fn failure(&self) -> Option<&AuthFailure> {
        self.failure.as_ref()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_verifying(&mut self, verifying: bool) {
        self.verifying = verifying;
    }

    pub(crate) fn authenticate(&mut self, user: UserProfile) {
        self.status = AuthStatus::Authenticated(user);
        self.failure = None;
        self.dirty = true;
    }

    pub(crate) fn deny(&mut self, failure: AuthFailure) {
        self.status = AuthStatus::Unauthenticated;
        self.failure = Some(failure);
        self.dirty = true;
    }
}
