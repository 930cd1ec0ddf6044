//! Frequency aggregation of delivered addresses and streets
//!
//! - [`aggregator`] - per-key counts and sequence numbers, top-N ranking
//! - [`report`] - pt-BR text report with addresses, streets and alleys

pub mod aggregator;
pub mod report;

#[cfg(test)]
pub mod tests;

pub use aggregator::{FrequencyAggregator, FrequencyBucket, FrequencyTable, top_n};
pub use report::{FrequencyReport, ReportSection, render_line};
