use desk_logging::{desk_debug, desk_info, desk_trace, desk_warn};

use crate::{
    AuthEffect, AuthFailure, AuthMsg, AuthState, RequestSeq, SearchEffect, SearchFailure,
    SearchMsg, SearchOutcome, SearchPhase, SearchResponse, SearchState, Verdict,
};

/// Pure search update: applies a message to state and returns the effects to run.
pub fn update_search(mut state: SearchState, msg: SearchMsg) -> (SearchState, Vec<SearchEffect>) {
    if state.is_torn_down() {
        desk_trace!("search: ignoring {:?} after teardown", msg);
        return (state, Vec::new());
    }

    let effects = match msg {
        SearchMsg::QueryChanged(text) => query_changed(&mut state, text),
        SearchMsg::DebounceElapsed { generation } => debounce_elapsed(&mut state, generation),
        SearchMsg::SearchCompleted { seq, result } => search_completed(&mut state, seq, result),
        SearchMsg::ClearRequested => {
            let mut effects = cancel_pending(&mut state);
            state.set_query(String::new());
            effects.extend(hover_cleared(go_idle(&mut state)));
            effects
        }
        SearchMsg::ResultSelected { index } => result_selected(&mut state, index),
        SearchMsg::ResultHovered(index) => result_hovered(&mut state, index),
        SearchMsg::Dismissed => {
            state.set_dropdown_open(false);
            if state.set_hovered(None) {
                vec![SearchEffect::PublishHover { article_id: None }]
            } else {
                Vec::new()
            }
        }
        SearchMsg::TornDown => {
            let cancels = cancel_pending(&mut state);
            // Subscribers hear about the lost hover before anything is cancelled.
            let mut effects: Vec<_> = hover_cleared(state.tear_down()).into_iter().collect();
            effects.extend(cancels);
            effects
        }
    };

    (state, effects)
}

fn query_changed(state: &mut SearchState, text: String) -> Vec<SearchEffect> {
    state.set_query(text);
    let mut effects = cancel_pending(state);

    if state.searchable_query().is_none() {
        effects.extend(hover_cleared(go_idle(state)));
        return effects;
    }

    state.set_phase(SearchPhase::Pending);
    state.set_dropdown_open(true);
    effects.push(SearchEffect::ArmDebounce {
        generation: state.generation(),
        delay: state.settings().debounce,
    });
    effects
}

fn debounce_elapsed(state: &mut SearchState, generation: u64) -> Vec<SearchEffect> {
    if generation != state.generation() || state.phase() != SearchPhase::Pending {
        desk_trace!(
            "search: stale debounce generation={} current={}",
            generation,
            state.generation()
        );
        return Vec::new();
    }

    let Some(query) = state.searchable_query().map(str::to_owned) else {
        return hover_cleared(go_idle(state)).into_iter().collect();
    };

    let seq = state.begin_request(query.clone());
    state.set_phase(SearchPhase::Loading);
    let mut effects: Vec<_> = hover_cleared(state.set_outcome(SearchOutcome::Loading))
        .into_iter()
        .collect();
    desk_debug!(
        "search: issuing seq={} query_chars={}",
        seq,
        query.chars().count()
    );

    let settings = state.settings();
    effects.push(SearchEffect::IssueSearch {
        seq,
        query,
        max_results: settings.max_results,
        timeout: settings.request_timeout,
    });
    effects
}

fn search_completed(
    state: &mut SearchState,
    seq: RequestSeq,
    result: Result<SearchResponse, SearchFailure>,
) -> Vec<SearchEffect> {
    if state.in_flight_seq() != Some(seq) {
        desk_debug!(
            "search: discarding stale completion seq={} current={:?}",
            seq,
            state.in_flight_seq()
        );
        return Vec::new();
    }
    state.take_in_flight();

    let cleared = match result {
        Ok(response) => settle_response(state, response),
        Err(failure) if failure.is_silent() => go_idle(state),
        Err(failure) => {
            desk_info!("search: seq={} failed: {}", seq, failure);
            state.set_phase(SearchPhase::Settled);
            state.set_outcome(SearchOutcome::Failure(failure))
        }
    };
    hover_cleared(cleared).into_iter().collect()
}

/// Returns whether a hovered row was dropped.
fn settle_response(state: &mut SearchState, response: SearchResponse) -> bool {
    let SearchResponse {
        results_found,
        provenance,
        articles,
        suggestion,
        ..
    } = response;

    let outcome = if results_found > 0 && !articles.is_empty() {
        SearchOutcome::Results {
            articles,
            provenance,
        }
    } else if let Some(suggestion) = suggestion {
        SearchOutcome::Suggestion(suggestion)
    } else {
        SearchOutcome::Empty
    };

    state.set_phase(SearchPhase::Settled);
    state.set_outcome(outcome)
}

fn result_selected(state: &mut SearchState, index: usize) -> Vec<SearchEffect> {
    let article = match state.outcome() {
        SearchOutcome::Results { articles, .. } => articles.get(index).cloned(),
        _ => None,
    };
    let Some(article) = article else {
        desk_trace!("search: selection {} has no matching result", index);
        return Vec::new();
    };

    let mut effects = cancel_pending(state);
    state.set_query(String::new());
    effects.extend(hover_cleared(go_idle(state)));

    let category_color = article.category_color();
    effects.push(SearchEffect::Navigate {
        article,
        category_color,
    });
    effects
}

fn result_hovered(state: &mut SearchState, index: Option<usize>) -> Vec<SearchEffect> {
    let hovered = match (state.outcome(), index) {
        (SearchOutcome::Results { articles, .. }, Some(i)) => {
            articles.get(i).map(|article| (i, article.id.clone()))
        }
        _ => None,
    };

    if !state.set_hovered(hovered.as_ref().map(|(i, _)| *i)) {
        return Vec::new();
    }
    vec![SearchEffect::PublishHover {
        article_id: hovered.map(|(_, id)| id),
    }]
}

/// Invalidates any armed timer and forgets the in-flight request.
fn cancel_pending(state: &mut SearchState) -> Vec<SearchEffect> {
    let mut effects = Vec::new();
    state.bump_generation();
    if state.phase() == SearchPhase::Pending {
        effects.push(SearchEffect::CancelDebounce);
    }
    if let Some(seq) = state.take_in_flight() {
        desk_debug!("search: superseding seq={}", seq);
        effects.push(SearchEffect::CancelSearch { seq });
    }
    effects
}

/// Returns whether a hovered row was dropped.
fn go_idle(state: &mut SearchState) -> bool {
    state.set_phase(SearchPhase::Idle);
    state.set_dropdown_open(false);
    state.set_outcome(SearchOutcome::Empty)
}

fn hover_cleared(cleared: bool) -> Option<SearchEffect> {
    cleared.then_some(SearchEffect::PublishHover { article_id: None })
}

/// Pure auth-gate update.
pub fn update_auth(mut state: AuthState, msg: AuthMsg) -> (AuthState, Vec<AuthEffect>) {
    let effects = match msg {
        AuthMsg::GateActivated { has_credential } => {
            if state.status().is_resolved() {
                desk_trace!("auth: gate already resolved");
                Vec::new()
            } else if state.is_verifying() {
                desk_debug!("auth: verification already outstanding");
                Vec::new()
            } else if !has_credential {
                desk_info!("auth: no stored credential");
                state.deny(AuthFailure::CredentialAbsent);
                Vec::new()
            } else {
                state.set_verifying(true);
                vec![AuthEffect::VerifyCredential]
            }
        }
        AuthMsg::VerificationFinished(verdict) => {
            if !state.is_verifying() {
                desk_debug!("auth: ignoring verification result with none outstanding");
                return (state, Vec::new());
            }
            state.set_verifying(false);
            match verdict {
                Verdict::Valid(user) => {
                    desk_info!("auth: verified user={}", user.username);
                    state.authenticate(user);
                    Vec::new()
                }
                Verdict::Rejected => {
                    desk_warn!("auth: stored credential rejected");
                    state.deny(AuthFailure::VerificationFailed);
                    vec![AuthEffect::InvalidateCredential]
                }
                Verdict::Failed(reason) => {
                    desk_warn!("auth: verification error: {}", reason);
                    state.deny(AuthFailure::VerificationError(reason));
                    Vec::new()
                }
            }
        }
        AuthMsg::LogoutRequested => {
            state.set_verifying(false);
            state.deny(AuthFailure::LoggedOut);
            vec![AuthEffect::InvalidateCredential]
        }
    };

    (state, effects)
}
