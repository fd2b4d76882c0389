//! Pure-heuristic ambiguity detection. No network call.
//!
//! Flags short, pronoun-laden, context-dependent follow-ups so the
//! expander can switch to multi-variant mode. Each signal is its own
//! function; the combination rule lives in one place at the bottom.

use serde::Serialize;

use crate::domain;

/// Continuation openers marking a follow-up that leans on prior turns.
const CONTINUATION_OPENERS: &[&str] = &[
    "e ", "e'", "ma ", "anche ", "quindi ", "oppure ", "invece ", "and ", "what about", "also ",
];

/// Anaphoric fragments that only resolve against conversation context.
const ANAPHORA_MARKERS: &[&str] = &[
    "questo",
    "questa",
    "quello",
    "quella",
    "lo stesso",
    "la stessa",
    "in quel caso",
    "in questo caso",
    "anche per",
    "the same",
    "in that case",
];

/// Per-signal breakdown plus the combined verdict.
#[derive(Debug, Clone, Serialize)]
pub struct AmbiguityReport {
    pub short_query: bool,
    pub continuation_phrasing: bool,
    pub unresolved_anaphora: bool,
    pub lacks_domain_keywords: bool,
    pub ambiguous: bool,
}

fn is_short(query: &str, max_tokens: usize) -> bool {
    query.split_whitespace().count() < max_tokens
}

fn has_continuation_opener(query: &str) -> bool {
    let lower = query.trim().to_lowercase();
    CONTINUATION_OPENERS.iter().any(|p| lower.starts_with(p))
}

fn has_anaphora(query: &str) -> bool {
    let lower = query.to_lowercase();
    ANAPHORA_MARKERS.iter().any(|m| lower.contains(m))
}

/// Run all signals over a query.
///
/// A query is ambiguous when it is a short or continuation-phrased
/// follow-up to an existing conversation, or when it contains anaphora
/// with no domain keyword to anchor it.
pub fn detect_ambiguity(query: &str, has_history: bool, short_query_tokens: usize) -> AmbiguityReport {
    let short_query = is_short(query, short_query_tokens);
    let continuation_phrasing = has_continuation_opener(query);
    let unresolved_anaphora = has_anaphora(query);
    let lacks_domain_keywords = domain::detect(query).is_empty();

    let ambiguous = (has_history && (short_query || continuation_phrasing))
        || (unresolved_anaphora && lacks_domain_keywords);

    AmbiguityReport {
        short_query,
        continuation_phrasing,
        unresolved_anaphora,
        lacks_domain_keywords,
        ambiguous,
    }
}
