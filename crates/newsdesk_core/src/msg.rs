use crate::{RequestSeq, SearchFailure, SearchResponse, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMsg {
    /// User edited the search box; carries the full current text.
    QueryChanged(String),
    /// Debounce timer armed for `generation` fired.
    DebounceElapsed { generation: u64 },
    /// Search collaborator answered (or failed) for request `seq`.
    SearchCompleted {
        seq: RequestSeq,
        result: Result<SearchResponse, SearchFailure>,
    },
    /// User cleared the input.
    ClearRequested,
    /// User picked a row from the results list.
    ResultSelected { index: usize },
    /// Pointer moved over a row, or off the list.
    ResultHovered(Option<usize>),
    /// Results surface closed without clearing (escape, click outside).
    Dismissed,
    /// Owning view is going away.
    TornDown,
}

/// Answer of the remote verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid(UserProfile),
    Rejected,
    /// Transport or decode fault; the credential's validity is unknown.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMsg {
    /// A protected route was entered.
    GateActivated { has_credential: bool },
    VerificationFinished(Verdict),
    LogoutRequested,
}
