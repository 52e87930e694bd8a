//! Punctuation-based sentence splitting.

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Split `text` on runs of `.`, `!` or `?`.
///
/// Each fragment is trimmed, empty fragments are dropped, and every surviving
/// sentence is terminated with `.`. The original terminator is not kept, so
/// `"Halt! Who goes there?"` yields `["Halt.", "Who goes there."]`.
/// Abbreviations, decimals and quotations get no special treatment.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(is_terminator)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{fragment}."))
        .collect()
}
