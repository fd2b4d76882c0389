//! Topic-window overlap between two excerpts.
//!
//! Significant-term overlap stands in for topical similarity: lowercase,
//! strip punctuation, drop short words and stopwords, then compare the
//! overlap against the smaller term set.

use std::collections::HashSet;

/// Function words that carry no topical signal.
const STOPWORDS: &[&str] = &[
    "alla", "allo", "agli", "alle", "come", "con", "della", "delle", "degli", "dello", "essere",
    "gli", "nel", "nella", "non", "per", "quale", "questo", "questa", "sono", "una", "uno",
    "viene", "that", "this", "with", "from", "have", "been", "shall", "must", "the", "and",
];

fn significant_terms(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_string()
        })
        .filter(|w| w.len() > 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Overlap of significant terms relative to the smaller set, in [0, 1].
pub fn overlap(a: &str, b: &str) -> f64 {
    let a_terms = significant_terms(a);
    let b_terms = significant_terms(b);
    if a_terms.is_empty() || b_terms.is_empty() {
        return 0.0;
    }
    let shared = a_terms.intersection(&b_terms).count();
    let min_len = a_terms.len().min(b_terms.len());
    shared as f64 / min_len as f64
}

/// Whether two excerpts cover the same topic window.
pub fn same_topic(a: &str, b: &str, threshold: f64) -> bool {
    overlap(a, b) >= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_subject_excerpts_overlap() {
        let a = "L'aliquota IVA ordinaria si applica alle prestazioni di servizi";
        let b = "Le prestazioni di servizi scontano l'aliquota IVA ordinaria";
        assert!(same_topic(a, b, 0.3));
    }

    #[test]
    fn unrelated_excerpts_do_not_overlap() {
        let a = "L'aliquota IVA ordinaria si applica alle cessioni di beni";
        let b = "Il trattamento di fine rapporto matura annualmente per i dipendenti";
        assert!(!same_topic(a, b, 0.3));
    }

    #[test]
    fn empty_text_never_matches() {
        assert_eq!(overlap("", "qualcosa di significativo"), 0.0);
    }
}
