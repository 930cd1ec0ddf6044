//! Per-key occurrence counting with encounter-ordered sequence numbers

use super::report::{FrequencyReport, ReportSection, render_line};
use crate::constants::report::{
    ADDRESSES_HEADING, ALLEY_PREFIXES, ALLEYS_HEADING, STREETS_HEADING,
};
use std::collections::HashMap;

/// Occurrences of one key; the count is the number of recorded sequences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyBucket {
    sequence_numbers: Vec<i64>,
}

impl FrequencyBucket {
    pub fn count(&self) -> usize {
        self.sequence_numbers.len()
    }

    /// Sequence numbers in the order they were recorded
    pub fn sequence_numbers(&self) -> &[i64] {
        &self.sequence_numbers
    }

    fn push(&mut self, sequence_number: i64) {
        self.sequence_numbers.push(sequence_number);
    }
}

/// Buckets keyed by exact text, remembering first-seen order
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    keys: Vec<String>,
    buckets: HashMap<String, FrequencyBucket>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert-or-update: a new key starts a bucket, a known key appends
    pub fn record(&mut self, key: &str, sequence_number: i64) {
        match self.buckets.get_mut(key) {
            Some(bucket) => bucket.push(sequence_number),
            None => {
                let mut bucket = FrequencyBucket::default();
                bucket.push(sequence_number);
                self.keys.push(key.to_string());
                self.buckets.insert(key.to_string(), bucket);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FrequencyBucket> {
        self.buckets.get(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrequencyBucket)> {
        self.keys
            .iter()
            .filter_map(|key| self.buckets.get(key).map(|bucket| (key.as_str(), bucket)))
    }
}

/// Rank entries by count (descending, ties keep input order) and render the first `n`
pub fn top_n<'a, I>(entries: I, n: usize) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a FrequencyBucket)>,
{
    let mut ranked: Vec<_> = entries.into_iter().collect();
    ranked.sort_by(|a, b| b.1.count().cmp(&a.1.count()));
    ranked
        .into_iter()
        .take(n)
        .map(|(key, bucket)| render_line(key, bucket))
        .collect()
}

/// Address and street tables for one manifest run
#[derive(Debug, Clone, Default)]
pub struct FrequencyAggregator {
    addresses: FrequencyTable,
    streets: FrequencyTable,
}

impl FrequencyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a delivery under its full address and under its street
    /// (the text before the first comma)
    pub fn record_delivery(&mut self, address: &str, sequence_number: i64) {
        let street = address.split(',').next().unwrap_or_default();
        self.addresses.record(address, sequence_number);
        self.streets.record(street, sequence_number);
    }

    pub fn addresses(&self) -> &FrequencyTable {
        &self.addresses
    }

    pub fn streets(&self) -> &FrequencyTable {
        &self.streets
    }

    pub fn top_addresses(&self, n: usize) -> Vec<String> {
        top_n(self.addresses.iter(), n)
    }

    pub fn top_streets(&self, n: usize) -> Vec<String> {
        top_n(self.streets.iter(), n)
    }

    /// Streets whose name starts with an alley/passage word
    pub fn top_alleys(&self, n: usize) -> Vec<String> {
        top_n(
            self.streets.iter().filter(|(street, _)| is_alley(street)),
            n,
        )
    }

    /// The three report sections in their fixed order
    pub fn report(&self, n: usize) -> FrequencyReport {
        FrequencyReport::new(vec![
            ReportSection::new(ADDRESSES_HEADING, self.top_addresses(n)),
            ReportSection::new(STREETS_HEADING, self.top_streets(n)),
            ReportSection::new(ALLEYS_HEADING, self.top_alleys(n)),
        ])
    }
}

fn is_alley(street: &str) -> bool {
    ALLEY_PREFIXES.iter().any(|prefix| street.starts_with(prefix))
}
