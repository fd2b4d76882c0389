//! Content rules for action labels and prompts.

use regex::Regex;
use std::sync::LazyLock;

/// Labels that tell the user nothing about what the action does.
const GENERIC_LABELS: &[&str] = &[
    "learn more",
    "more info",
    "more information",
    "find out more",
    "read more",
    "click here",
    "see details",
    "scopri di più",
    "per saperne di più",
    "maggiori informazioni",
    "clicca qui",
    "leggi di più",
];

/// Prompts that refer the user to an external professional or portal
/// instead of doing something inside the conversation.
static REFERRAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let patterns = [
        r"consult (a|your) (accountant|lawyer|professional|advisor)",
        r"contact (a|your) (accountant|lawyer|professional|advisor)",
        r"rivolgiti a",
        r"consulta (il tuo|un) (commercialista|consulente|professionista|avvocato)",
        r"contatta (il tuo|un) (commercialista|consulente|professionista|avvocato)",
        r"chiedi al tuo (commercialista|consulente)",
        r"visita il (sito|portale)",
    ];
    Regex::new(&format!(r"(?i)\b({})\b", patterns.join("|"))).unwrap()
});

/// True when the label matches the generic deny-list.
pub fn is_generic_label(label: &str) -> bool {
    let normalized = label.trim().to_lowercase();
    GENERIC_LABELS.iter().any(|g| normalized == *g)
}

/// True when the prompt directs the user elsewhere instead of acting.
pub fn is_forbidden_referral(prompt: &str) -> bool {
    REFERRAL_RE.is_match(prompt)
}
