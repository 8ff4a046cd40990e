use std::fmt::Write;

use newsdesk_core::{Article, GateView, SearchViewModel};

const PUBLISHED_FORMAT: &str = "%A, %B %e, %Y at %H:%M UTC";

pub fn search(view: &SearchViewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "search: [{}]", view.query);
    if let Some(status) = &view.status_line {
        let marker = if view.is_error { "!" } else { "·" };
        let _ = writeln!(out, "  {marker} {status}");
    }
    if !view.dropdown_open {
        return out;
    }

    for row in &view.rows {
        let pointer = if row.hovered { ">" } else { " " };
        let breaking = if row.breaking { " BREAKING" } else { "" };
        let _ = writeln!(
            out,
            " {pointer}{:>2}. {}{breaking}",
            row.index + 1,
            row.title
        );
        let _ = writeln!(
            out,
            "      [{} {}] {} · {}{}",
            row.category,
            row.category_color,
            row.published,
            row.read_time,
            row.source
                .as_deref()
                .map(|source| format!(" · {source}"))
                .unwrap_or_default()
        );
        if row.hovered {
            let _ = writeln!(out, "      {}", row.summary);
        }
    }

    if let Some(suggestion) = &view.suggestion {
        for link in &suggestion.links {
            let _ = writeln!(out, "    → {} <{}>", link.title, link.url);
        }
        if let Some(tip) = &suggestion.tip {
            let _ = writeln!(out, "    tip: {tip}");
        }
    }
    out
}

pub fn article(article: &Article, category_color: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "════ {} ════", article.title);
    let _ = writeln!(out, "{} ({})", article.category.to_uppercase(), category_color);
    if article.breaking {
        let _ = writeln!(out, "BREAKING NEWS");
    }
    let _ = writeln!(
        out,
        "{} · {}",
        article.published_at.format(PUBLISHED_FORMAT),
        article.read_time
    );
    match (&article.source_name, &article.source_url) {
        (Some(name), Some(url)) => {
            let _ = writeln!(out, "Source: {name} <{url}>");
        }
        (Some(name), None) => {
            let _ = writeln!(out, "Source: {name}");
        }
        (None, Some(url)) => {
            let _ = writeln!(out, "Source: <{url}>");
        }
        (None, None) => {}
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", article.summary);
    out
}

pub fn gate(view: &GateView) -> String {
    match view {
        GateView::Loading => "account: checking your session…".to_string(),
        GateView::Protected(user) => {
            let mut out = format!("account: {} (@{})", user.display_name, user.username);
            if let Some(email) = &user.email {
                let _ = write!(out, " <{email}>");
            }
            out
        }
        GateView::Redirect => "account: please log in with /login TOKEN".to_string(),
    }
}
