use std::time::Duration;

use chrono::{TimeZone, Utc};
use newsdesk_core::{
    update_search, Article, Provenance, SearchEffect, SearchFailure, SearchMsg, SearchOutcome,
    SearchPhase, SearchResponse, SearchSettings, SearchState, Suggestion, SuggestionLink,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    desk_logging::initialize_for_tests();
}

fn article(id: &str, title: &str, category: &str) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        summary: format!("Summary of {title}"),
        category: category.to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
        read_time: "3 min read".to_string(),
        breaking: false,
        source_name: None,
        source_url: None,
    }
}

fn response(query: &str, articles: Vec<Article>) -> SearchResponse {
    SearchResponse {
        query: query.to_string(),
        results_found: articles.len(),
        provenance: Provenance::Cached,
        articles,
        suggestion: None,
        timestamp: None,
    }
}

fn type_text(state: SearchState, text: &str) -> (SearchState, Vec<SearchEffect>) {
    update_search(state, SearchMsg::QueryChanged(text.to_string()))
}

fn armed_generation(effects: &[SearchEffect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            SearchEffect::ArmDebounce { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("debounce armed")
}

fn issued_seq(effects: &[SearchEffect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            SearchEffect::IssueSearch { seq, .. } => Some(*seq),
            _ => None,
        })
        .expect("search issued")
}

/// Types `text` and lets the debounce fire; returns the issued seq.
fn type_and_fire(state: SearchState, text: &str) -> (SearchState, u64) {
    let (state, effects) = type_text(state, text);
    let generation = armed_generation(&effects);
    let (state, effects) = update_search(state, SearchMsg::DebounceElapsed { generation });
    let seq = issued_seq(&effects);
    (state, seq)
}

#[test]
fn short_queries_never_arm_or_issue() {
    init_logging();
    for text in ["", " ", "z", "  z  ", "é"] {
        let (state, effects) = type_text(SearchState::new(), text);
        assert_eq!(state.phase(), SearchPhase::Idle, "text {text:?}");
        assert_eq!(state.outcome(), &SearchOutcome::Empty);
        assert!(!state.is_dropdown_open());
        assert!(effects.is_empty(), "text {text:?} produced {effects:?}");
    }
}

#[test]
fn keystroke_arms_debounce_with_configured_delay() {
    init_logging();
    let settings = SearchSettings {
        debounce: Duration::from_millis(350),
        ..SearchSettings::default()
    };
    let (state, effects) = type_text(SearchState::with_settings(settings), "zi");

    assert_eq!(state.phase(), SearchPhase::Pending);
    assert!(state.is_dropdown_open());
    assert_eq!(
        effects,
        vec![SearchEffect::ArmDebounce {
            generation: state.generation(),
            delay: Duration::from_millis(350),
        }]
    );
}

#[test]
fn only_latest_debounce_generation_issues_a_request() {
    init_logging();
    let state = SearchState::new();
    let (state, first) = type_text(state, "zi");
    let (state, second) = type_text(state, "zim");
    let (state, third) = type_text(state, "zimbabwe");

    // The two earlier timers fire late and are ignored.
    let (state, effects) = update_search(
        state,
        SearchMsg::DebounceElapsed {
            generation: armed_generation(&first),
        },
    );
    assert!(effects.is_empty());
    let (state, effects) = update_search(
        state,
        SearchMsg::DebounceElapsed {
            generation: armed_generation(&second),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), SearchPhase::Pending);

    let (state, effects) = update_search(
        state,
        SearchMsg::DebounceElapsed {
            generation: armed_generation(&third),
        },
    );
    let settings = SearchSettings::default();
    assert_eq!(
        effects,
        vec![SearchEffect::IssueSearch {
            seq: 1,
            query: "zimbabwe".to_string(),
            max_results: settings.max_results,
            timeout: settings.request_timeout,
        }]
    );
    assert_eq!(state.phase(), SearchPhase::Loading);
    assert_eq!(state.outcome(), &SearchOutcome::Loading);
    assert_eq!(state.in_flight_seq(), Some(1));
}

#[test]
fn issued_query_is_trimmed() {
    init_logging();
    let (state, _seq) = type_and_fire(SearchState::new(), "   harare  ");
    assert_eq!(state.in_flight_query(), Some("harare"));
}

#[test]
fn zimbabwe_round_trip_yields_results() {
    init_logging();
    let articles = vec![
        article("a1", "Harare markets rally", "business"),
        article("a2", "Victoria Falls tourism rebounds", "world"),
        article("a3", "Zimbabwe cricket squad named", "sports"),
    ];
    let (state, seq) = type_and_fire(SearchState::new(), "zimbabwe");

    let (mut state, effects) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq,
            result: Ok(response("zimbabwe", articles.clone())),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), SearchPhase::Settled);
    assert_eq!(
        state.outcome(),
        &SearchOutcome::Results {
            articles,
            provenance: Provenance::Cached,
        }
    );
    assert_eq!(state.in_flight_seq(), None);
    assert!(state.consume_dirty());
}

#[test]
fn late_answer_of_superseded_request_is_discarded() {
    init_logging();
    let (state, seq_a) = type_and_fire(SearchState::new(), "harare");
    let (state, effects) = type_text(state, "bulawayo");
    assert!(effects.contains(&SearchEffect::CancelSearch { seq: seq_a }));
    let generation = armed_generation(&effects);
    let (state, effects) = update_search(state, SearchMsg::DebounceElapsed { generation });
    let seq_b = issued_seq(&effects);
    assert_eq!(seq_b, seq_a + 1);

    // B answers first, then A's answer straggles in.
    let b_articles = vec![article("b1", "Bulawayo water works", "world")];
    let (state, _) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq: seq_b,
            result: Ok(response("bulawayo", b_articles.clone())),
        },
    );
    let (state, effects) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq: seq_a,
            result: Ok(response(
                "harare",
                vec![article("a1", "Harare markets rally", "business")],
            )),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(
        state.outcome(),
        &SearchOutcome::Results {
            articles: b_articles,
            provenance: Provenance::Cached,
        }
    );
}

#[test]
fn stale_answer_arriving_before_current_one_does_not_flash() {
    init_logging();
    let (state, seq_a) = type_and_fire(SearchState::new(), "harare");
    let (state, seq_b) = type_and_fire(state, "bulawayo");

    let (state, _) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq: seq_a,
            result: Err(SearchFailure::ServerError(500)),
        },
    );
    assert_eq!(state.outcome(), &SearchOutcome::Loading);
    assert_eq!(state.in_flight_seq(), Some(seq_b));
}

#[test]
fn zero_matches_with_suggestion_exposes_links_verbatim() {
    init_logging();
    let suggestion = Suggestion {
        message: "No cached articles matched \"okavango\".".to_string(),
        links: vec![
            SuggestionLink {
                title: "Search the web".to_string(),
                url: "https://duckduckgo.com/?q=okavango+news".to_string(),
            },
            SuggestionLink {
                title: "Google News".to_string(),
                url: "https://news.google.com/search?q=okavango".to_string(),
            },
        ],
        tip: Some("Try a broader term.".to_string()),
    };
    let (state, seq) = type_and_fire(SearchState::new(), "okavango");
    let mut answer = response("okavango", Vec::new());
    answer.provenance = Provenance::Live;
    answer.suggestion = Some(suggestion.clone());

    let (state, _) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq,
            result: Ok(answer),
        },
    );

    assert_eq!(state.phase(), SearchPhase::Settled);
    assert_eq!(state.outcome(), &SearchOutcome::Suggestion(suggestion));
}

#[test]
fn zero_matches_without_suggestion_settles_empty() {
    init_logging();
    let (state, seq) = type_and_fire(SearchState::new(), "xyzzy");
    let (state, _) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq,
            result: Ok(response("xyzzy", Vec::new())),
        },
    );

    assert_eq!(state.phase(), SearchPhase::Settled);
    assert_eq!(state.outcome(), &SearchOutcome::Empty);
    assert_eq!(
        state.view().status_line.as_deref(),
        Some("No articles found for \"xyzzy\".")
    );
}

#[test]
fn failures_settle_into_failed_outcome() {
    init_logging();
    for failure in [
        SearchFailure::BadRequest,
        SearchFailure::Timeout,
        SearchFailure::ServerError(503),
        SearchFailure::Unknown,
    ] {
        let (state, seq) = type_and_fire(SearchState::new(), "harare");
        let (state, effects) = update_search(
            state,
            SearchMsg::SearchCompleted {
                seq,
                result: Err(failure),
            },
        );
        assert!(effects.is_empty(), "no automatic retry");
        assert_eq!(state.outcome(), &SearchOutcome::Failure(failure));
        let view = state.view();
        assert!(view.is_error);
        assert_eq!(view.status_line, Some(failure.user_message()));
    }
}

#[test]
fn too_short_failure_is_silent() {
    init_logging();
    let (state, seq) = type_and_fire(SearchState::new(), "ab");
    let (state, _) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq,
            result: Err(SearchFailure::TooShort),
        },
    );
    assert_eq!(state.phase(), SearchPhase::Idle);
    assert_eq!(state.outcome(), &SearchOutcome::Empty);
    assert_eq!(state.view().status_line, None);
}

#[test]
fn shrinking_below_minimum_goes_idle_and_drops_request() {
    init_logging();
    let (state, seq) = type_and_fire(SearchState::new(), "harare");
    let (state, effects) = type_text(state, "h");

    assert_eq!(effects, vec![SearchEffect::CancelSearch { seq }]);
    assert_eq!(state.phase(), SearchPhase::Idle);
    assert_eq!(state.outcome(), &SearchOutcome::Empty);

    // The answer still arrives and is ignored.
    let (state, _) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq,
            result: Ok(response("harare", vec![article("a1", "x", "world")])),
        },
    );
    assert_eq!(state.outcome(), &SearchOutcome::Empty);
}

#[test]
fn clear_while_pending_cancels_timer() {
    init_logging();
    let (state, effects) = type_text(SearchState::new(), "harare");
    let generation = armed_generation(&effects);
    let (state, effects) = update_search(state, SearchMsg::ClearRequested);

    assert_eq!(effects, vec![SearchEffect::CancelDebounce]);
    assert_eq!(state.query(), "");
    assert_eq!(state.phase(), SearchPhase::Idle);

    let (state, effects) = update_search(state, SearchMsg::DebounceElapsed { generation });
    assert!(effects.is_empty());
    assert_eq!(state.phase(), SearchPhase::Idle);
}

#[test]
fn selecting_a_result_navigates_and_resets() {
    init_logging();
    let chosen = article("a2", "Victoria Falls tourism rebounds", "world");
    let (state, seq) = type_and_fire(SearchState::new(), "falls");
    let (state, _) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq,
            result: Ok(response(
                "falls",
                vec![article("a1", "Falls festival", "culture"), chosen.clone()],
            )),
        },
    );

    let (state, effects) = update_search(state, SearchMsg::ResultSelected { index: 1 });

    assert_eq!(
        effects,
        vec![SearchEffect::Navigate {
            article: chosen,
            category_color: "#2563eb",
        }]
    );
    assert_eq!(state.query(), "");
    assert_eq!(state.phase(), SearchPhase::Idle);
    assert_eq!(state.outcome(), &SearchOutcome::Empty);
    assert!(!state.is_dropdown_open());
}

#[test]
fn selecting_without_results_is_ignored() {
    init_logging();
    let (state, _seq) = type_and_fire(SearchState::new(), "falls");
    let before = state.clone();
    let (state, effects) = update_search(state, SearchMsg::ResultSelected { index: 0 });
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn hover_publishes_only_on_change() {
    init_logging();
    let (state, seq) = type_and_fire(SearchState::new(), "falls");
    let (state, _) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq,
            result: Ok(response("falls", vec![article("a1", "Falls festival", "culture")])),
        },
    );

    let (state, effects) = update_search(state, SearchMsg::ResultHovered(Some(0)));
    assert_eq!(
        effects,
        vec![SearchEffect::PublishHover {
            article_id: Some("a1".to_string()),
        }]
    );
    assert!(state.view().rows[0].hovered);

    let (state, effects) = update_search(state, SearchMsg::ResultHovered(Some(0)));
    assert!(effects.is_empty());

    // Out-of-range rows count as leaving the list.
    let (state, effects) = update_search(state, SearchMsg::ResultHovered(Some(9)));
    assert_eq!(effects, vec![SearchEffect::PublishHover { article_id: None }]);
    assert_eq!(state.hovered(), None);
}

fn hovered_results(query: &str) -> SearchState {
    let (state, seq) = type_and_fire(SearchState::new(), query);
    let (state, _) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq,
            result: Ok(response(query, vec![article("a1", "Harare story", "world")])),
        },
    );
    let (state, effects) = update_search(state, SearchMsg::ResultHovered(Some(0)));
    assert_eq!(effects.len(), 1);
    state
}

#[test]
fn selecting_hovered_row_publishes_cleared_hover() {
    init_logging();
    let state = hovered_results("harare");

    let (state, effects) = update_search(state, SearchMsg::ResultSelected { index: 0 });

    assert_eq!(effects[0], SearchEffect::PublishHover { article_id: None });
    assert!(matches!(effects[1], SearchEffect::Navigate { .. }));
    assert_eq!(state.hovered(), None);
}

#[test]
fn new_search_and_clear_publish_cleared_hover() {
    init_logging();
    let (state, effects) = type_text(hovered_results("harare"), "bulawayo");
    assert!(!effects.contains(&SearchEffect::PublishHover { article_id: None }));
    let generation = armed_generation(&effects);
    let (_, effects) = update_search(state, SearchMsg::DebounceElapsed { generation });
    assert_eq!(effects[0], SearchEffect::PublishHover { article_id: None });
    assert!(matches!(effects[1], SearchEffect::IssueSearch { .. }));

    let (state, effects) = update_search(hovered_results("harare"), SearchMsg::ClearRequested);
    assert_eq!(effects, vec![SearchEffect::PublishHover { article_id: None }]);
    assert_eq!(state.hovered(), None);
}

#[test]
fn teardown_publishes_cleared_hover_before_cancelling() {
    init_logging();
    let (state, effects) = type_text(hovered_results("harare"), "bulawayo");
    let generation = armed_generation(&effects);

    let (state, effects) = update_search(state, SearchMsg::TornDown);

    assert_eq!(
        effects,
        vec![
            SearchEffect::PublishHover { article_id: None },
            SearchEffect::CancelDebounce,
        ]
    );
    assert!(generation < state.generation());
}

#[test]
fn dismiss_closes_surface_but_keeps_query() {
    init_logging();
    let (state, seq) = type_and_fire(SearchState::new(), "falls");
    let (state, _) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq,
            result: Ok(response("falls", vec![article("a1", "Falls festival", "culture")])),
        },
    );
    let (state, _) = update_search(state, SearchMsg::Dismissed);
    assert!(!state.is_dropdown_open());
    assert_eq!(state.query(), "falls");

    let (state, _) = type_text(state, "falls 2024");
    assert!(state.is_dropdown_open());
}

#[test]
fn teardown_cancels_everything_and_ignores_later_messages() {
    init_logging();
    let (state, seq) = type_and_fire(SearchState::new(), "harare");
    let (state, effects) = update_search(state, SearchMsg::TornDown);
    assert_eq!(effects, vec![SearchEffect::CancelSearch { seq }]);
    assert!(state.is_torn_down());
    assert!(!state.is_busy());

    let before = state.clone();
    let (state, effects) = update_search(
        state,
        SearchMsg::SearchCompleted {
            seq,
            result: Ok(response("harare", vec![article("a1", "x", "world")])),
        },
    );
    assert!(effects.is_empty());
    let (state, effects) = type_text(state, "bulawayo");
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn sequence_numbers_increase_monotonically() {
    init_logging();
    let mut state = SearchState::new();
    let mut seen = Vec::new();
    for text in ["harare", "bulawayo", "mutare", "gweru"] {
        let (next, seq) = type_and_fire(state, text);
        seen.push(seq);
        state = next;
    }
    assert_eq!(seen, vec![1, 2, 3, 4]);
    assert_eq!(state.last_seq(), 4);
}
