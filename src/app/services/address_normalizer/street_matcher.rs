//! Street name matching against the postal directory
//!
//! Two names match when they share at least one significant word. The user
//! side loses street-type prefixes and one/two-letter filler words first; the
//! authority side is taken as canonical and only case/accent folded.

use super::text::{
    drop_short_words, fold_case_and_apostrophes, remove_punctuation, strip_accents, strip_prefixes,
};
use std::collections::HashSet;

/// Does the user-typed street refer to the same street as the directory name?
pub fn street_name_matches(user_street: &str, authority_street: &str) -> bool {
    let user_words = user_tokens(user_street);
    let authority_words = authority_tokens(authority_street);

    user_words
        .iter()
        .any(|word| authority_words.contains(word.as_str()))
}

/// Street name with street-type prefixes removed, for reverse lookups
pub fn clean_street_name(street: &str) -> String {
    strip_prefixes(street)
}

fn user_tokens(street: &str) -> Vec<String> {
    let cleaned = fold_case_and_apostrophes(&drop_short_words(&strip_prefixes(street)));
    remove_punctuation(&strip_accents(&cleaned))
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn authority_tokens(street: &str) -> HashSet<String> {
    fold_case_and_apostrophes(&strip_accents(street))
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
