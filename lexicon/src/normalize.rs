//! Text normalization used for trigger matching.
//!
//! Policy:
//! - Turkish-aware lowercasing (`İ` → `i`, `I` → `ı`, everything else via
//!   `char::to_lowercase()`).
//! - Fold the six Turkish letters to their base Latin forms
//!   (ı→i, ğ→g, ü→u, ş→s, ö→o, ç→c). The lexicon is written in folded form,
//!   so this is an exact fold table, not generic diacritic stripping.
//! - Replace every non-word, non-whitespace character with a space.
//! - Collapse whitespace runs to a single ASCII space and trim.
//!
//! Keep this logic single-sourced: the evaluator normalizes both the message
//! and the trigger phrases with the same function, so any drift here breaks
//! matching on both sides at once.

/// Normalize text for whole-word trigger matching.
///
/// Total and idempotent: `for_matching(for_matching(s)) == for_matching(s)`
/// for every `s`, and blank input maps to the empty string.
pub fn for_matching(s: &str) -> String {
    if s.trim().is_empty() {
        return String::new();
    }

    let mut lowered = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            // Turkish casing pairs the dotted/dotless forms the other way
            // around from the Unicode default mapping.
            'İ' => lowered.push('i'),
            'I' => lowered.push('ı'),
            _ => {
                for lc in ch.to_lowercase() {
                    lowered.push(lc);
                }
            }
        }
    }

    let mut spaced = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        let ch = fold_turkish(ch);
        if is_word_char(ch) || ch.is_whitespace() {
            spaced.push(ch);
        } else {
            spaced.push(' ');
        }
    }

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The six-pair fold used by the lexicon. Uppercase forms arrive here
/// already lowercased.
fn fold_turkish(ch: char) -> char {
    match ch {
        'ı' => 'i',
        'ğ' => 'g',
        'ü' => 'u',
        'ş' => 's',
        'ö' => 'o',
        'ç' => 'c',
        _ => ch,
    }
}

/// Word characters survive normalization; everything else becomes a space.
/// Matches the `\w` class the trigger patterns are built around.
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
