//! Address splitting into "street, number" and a free-text complement

use crate::app::models::{AddressParts, SplitOutcome};
use regex::Regex;
use std::sync::LazyLock;

static ADDRESS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A(?P<street>.*?),\s*(?P<number>[0-9]+)(?:,\s*(?P<complement>.*))?\z")
        .expect("Failed to compile address regex")
});

static LEADING_COMMA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A,\s*").expect("Failed to compile leading comma regex"));

/// Split a destination address of the form `street, number[, complement]`
///
/// Returns [`SplitOutcome::Unmatched`] with the input unchanged when the text
/// has no `, <digits>` component.
pub fn split_address(address: &str) -> SplitOutcome {
    let Some(captures) = ADDRESS_REGEX.captures(address) else {
        return SplitOutcome::Unmatched(address.to_string());
    };

    let complement = captures.name("complement").map(|m| {
        LEADING_COMMA_REGEX
            .replace(m.as_str().trim(), "")
            .trim()
            .to_string()
    });

    SplitOutcome::Matched(AddressParts {
        street: captures["street"].to_string(),
        number: captures["number"].to_string(),
        complement,
    })
}

/// Convenience form returning `(main_address, complement)`
pub fn separate_complement(address: &str) -> (String, Option<String>) {
    let outcome = split_address(address);
    let complement = outcome.complement().map(str::to_string);
    (outcome.main_address(), complement)
}
