use std::time::Duration;

use crate::{Article, ArticleId, RequestSeq};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEffect {
    /// (Re)arm the debounce timer; any previously armed timer is obsolete.
    ArmDebounce { generation: u64, delay: Duration },
    CancelDebounce,
    IssueSearch {
        seq: RequestSeq,
        query: String,
        max_results: u32,
        timeout: Duration,
    },
    /// Best-effort abort of a superseded request.
    CancelSearch { seq: RequestSeq },
    Navigate {
        article: Article,
        category_color: &'static str,
    },
    PublishHover { article_id: Option<ArticleId> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEffect {
    VerifyCredential,
    /// Clear the stored credential and notify the remote side.
    InvalidateCredential,
}
