use std::fmt;

/// Why a search did not produce results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFailure {
    /// Query under the minimum length; never shown to the user.
    TooShort,
    Timeout,
    /// The endpoint rejected the query (HTTP 400).
    BadRequest,
    /// Any other non-2xx status.
    ServerError(u16),
    Unknown,
}

impl SearchFailure {
    /// Silent failures settle back to idle instead of rendering a message.
    pub fn is_silent(self) -> bool {
        matches!(self, SearchFailure::TooShort)
    }

    pub fn user_message(self) -> String {
        match self {
            SearchFailure::TooShort => "Type at least 2 characters to search.".to_string(),
            SearchFailure::Timeout => {
                "The search took too long. Check your connection and try again.".to_string()
            }
            SearchFailure::BadRequest => {
                "That search could not be processed. Try different words.".to_string()
            }
            SearchFailure::ServerError(status) => {
                format!("The news service is having trouble (error {status}). Try again shortly.")
            }
            SearchFailure::Unknown => "Something went wrong while searching.".to_string(),
        }
    }
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFailure::TooShort => write!(f, "query too short"),
            SearchFailure::Timeout => write!(f, "timeout"),
            SearchFailure::BadRequest => write!(f, "bad request"),
            SearchFailure::ServerError(status) => write!(f, "server error {status}"),
            SearchFailure::Unknown => write!(f, "unknown error"),
        }
    }
}

/// Why a gate ended up unauthenticated. All of these fail safe to a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    CredentialAbsent,
    /// The endpoint answered and said the credential is not valid.
    VerificationFailed,
    /// Transport fault during verification.
    VerificationError(String),
    LoggedOut,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::CredentialAbsent => write!(f, "no stored credential"),
            AuthFailure::VerificationFailed => write!(f, "credential rejected"),
            AuthFailure::VerificationError(reason) => write!(f, "verification error: {reason}"),
            AuthFailure::LoggedOut => write!(f, "logged out"),
        }
    }
}
