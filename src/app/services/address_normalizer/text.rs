//! Pure string transforms used by the matcher, the splitter and cache keys
//!
//! Every function here is total and idempotent.

use crate::constants::{ACCENT_FOLDS, STREET_PREFIXES};
use regex::Regex;
use std::sync::LazyLock;

static SHORT_WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[a-zA-Z]{1,2}\b,?\s*").expect("Failed to compile short word regex")
});

static KEY_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,\s]+").expect("Failed to compile key separator regex"));

static PUNCTUATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\s]").expect("Failed to compile punctuation regex"));

/// Lower-case and fold the accented Latin characters used in Portuguese
///
/// Parentheses become spaces. Characters outside the fold table are kept.
pub fn strip_accents(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            ACCENT_FOLDS
                .iter()
                .find(|(accented, _)| *accented == c)
                .map_or(c, |(_, plain)| *plain)
        })
        .collect()
}

/// Drop street-type words ("Rua", "Av", "Travessa", ...) anywhere in the text
pub fn strip_prefixes(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !is_street_prefix(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_street_prefix(word: &str) -> bool {
    let lowered = word.to_lowercase();
    STREET_PREFIXES.contains(&lowered.as_str())
}

/// Remove standalone alphabetic tokens of one or two letters ("de", "da", "R")
///
/// A trailing comma on the removed token goes with it.
pub fn drop_short_words(text: &str) -> String {
    let stripped = SHORT_WORD_REGEX.replace_all(text, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cache-key form: accent-stripped, commas and whitespace runs become `_`
pub fn normalize_key(text: &str) -> String {
    KEY_SEPARATOR_REGEX
        .replace_all(&strip_accents(text), "_")
        .into_owned()
}

/// Keep ASCII letters, digits and whitespace only
pub(crate) fn remove_punctuation(text: &str) -> String {
    PUNCTUATION_REGEX.replace_all(text, "").into_owned()
}

/// Lower-case and drop apostrophes ("D'Ávila" → "dávila")
pub(crate) fn fold_case_and_apostrophes(text: &str) -> String {
    text.to_lowercase().replace('\'', "")
}
