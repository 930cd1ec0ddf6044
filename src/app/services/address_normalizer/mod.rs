//! Address normalization for delivery manifests
//!
//! This module holds the text-processing side of reconciliation:
//! - [`text`] - accent folding, prefix and filler-word removal, cache keys
//! - [`splitter`] - "street, number[, complement]" parsing
//! - [`street_matcher`] - user street vs. postal directory street matching

pub mod splitter;
pub mod street_matcher;
pub mod text;

#[cfg(test)]
pub mod tests;

pub use splitter::{separate_complement, split_address};
pub use street_matcher::{clean_street_name, street_name_matches};
pub use text::{drop_short_words, normalize_key, strip_accents, strip_prefixes};
