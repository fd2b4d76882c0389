//! Deterministic safe-fallback actions.
//!
//! Built without a model call, from the reasoning output alone, so they
//! are always available when the golden loop exhausts its attempts. Every
//! label and prompt here satisfies the validator's rules.

use regex::Regex;
use std::sync::LazyLock;

use consilium_core::models::{ActionType, FusedDocument, ReasoningResult, SuggestedAction};

/// Amounts, rates, or bare figures in the answer suggest a calculation
/// follow-up.
static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(€\s*\d|\d+\s*%|\b\d{2,})").unwrap());

fn deepening(reasoning: &ReasoningResult, documents: &[FusedDocument]) -> SuggestedAction {
    let prompt = match documents.first() {
        Some(doc) => format!(
            "Approfondisci come '{}' si applica al mio caso, citando i passaggi rilevanti.",
            doc.candidate.title
        ),
        None => format!(
            "Approfondisci lo scenario '{}' e spiega in dettaglio come si applica al mio caso.",
            reasoning.selected_hypothesis().scenario
        ),
    };
    let mut action = SuggestedAction::new(
        "Approfondisci le fonti citate",
        "book-open",
        prompt,
        ActionType::Deepening,
    )
    .as_fallback();
    if let Some(doc) = documents.first() {
        action.grounded_source = Some(doc.id().to_string());
    }
    action.source_basis = "fallback: topic deepening".to_string();
    action
}

fn calculation() -> SuggestedAction {
    let mut action = SuggestedAction::new(
        "Calcola l'importo dovuto",
        "calculator",
        "Calcola l'importo dovuto nel mio caso usando i valori e le aliquote indicati nella risposta.",
        ActionType::Primary,
    )
    .as_fallback();
    action.source_basis = "fallback: numeric values in the answer".to_string();
    action
}

fn deadline_check() -> SuggestedAction {
    let mut action = SuggestedAction::new(
        "Verifica scadenze e adempimenti",
        "calendar",
        "Elenca le scadenze e gli adempimenti applicabili a questo caso, con le relative date.",
        ActionType::Risk,
    )
    .as_fallback();
    action.source_basis = "fallback: deadline check".to_string();
    action
}

/// The safe set: topic deepening, a calculation when the answer carries
/// figures, and a deadline check. Never empty.
pub fn safe_fallback(
    reasoning: &ReasoningResult,
    documents: &[FusedDocument],
) -> Vec<SuggestedAction> {
    let mut actions = vec![deepening(reasoning, documents)];
    if NUMERIC_RE.is_match(&reasoning.answer) {
        actions.push(calculation());
    }
    actions.push(deadline_check());
    actions
}
