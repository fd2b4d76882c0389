//! Bounded plain-text digest of the conversation, injected into prompts.

use consilium_core::models::{ConversationTurn, TurnRole};

/// Render the most recent turns into a compact digest, newest last,
/// truncated from the front to stay under `max_chars`.
pub fn digest(turns: &[ConversationTurn], max_chars: usize) -> String {
    let mut lines: Vec<String> = turns
        .iter()
        .map(|t| {
            let prefix = match t.role {
                TurnRole::User => "U",
                TurnRole::Assistant => "A",
            };
            format!("{prefix}: {}", t.content.trim())
        })
        .collect();

    // Drop oldest lines until the digest fits.
    while lines.len() > 1 && lines.iter().map(|l| l.len() + 1).sum::<usize>() > max_chars {
        lines.remove(0);
    }

    let mut out = lines.join("\n");
    if out.len() > max_chars {
        out.truncate(max_chars);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_keeps_newest_turns() {
        let turns = vec![
            ConversationTurn::user("prima domanda molto lunga che occupa spazio"),
            ConversationTurn::assistant("prima risposta"),
            ConversationTurn::user("seconda domanda"),
        ];
        let d = digest(&turns, 40);
        assert!(d.contains("seconda domanda"));
        assert!(!d.contains("prima domanda"));
    }

    #[test]
    fn empty_history_yields_empty_digest() {
        assert_eq!(digest(&[], 100), "");
    }
}
