//! Text report of the most requested addresses and streets

use super::aggregator::FrequencyBucket;
use crate::constants::report::{
    ORDER_PLURAL, ORDER_SINGULAR, PACKAGE_PLURAL, PACKAGE_SINGULAR, SEPARATOR,
};
use crate::{Error, Result};
use std::path::Path;
use tracing::info;

/// "5 pacotes na Rua A, 123, com as ordens 1, 2, 3, 4, 5"
pub fn render_line(key: &str, bucket: &FrequencyBucket) -> String {
    let count = bucket.count();
    let sequences = bucket
        .sequence_numbers()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} {} na {}, com {} {}",
        count,
        pluralize(count, PACKAGE_SINGULAR, PACKAGE_PLURAL),
        key,
        pluralize(bucket.sequence_numbers().len(), ORDER_SINGULAR, ORDER_PLURAL),
        sequences
    )
}

pub fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub heading: String,
    pub lines: Vec<String>,
}

impl ReportSection {
    pub fn new(heading: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            heading: heading.into(),
            lines,
        }
    }
}

/// Ordered report sections; sections without lines are not rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyReport {
    pub sections: Vec<ReportSection>,
}

impl FrequencyReport {
    pub fn new(sections: Vec<ReportSection>) -> Self {
        Self { sections }
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        for section in self.sections.iter().filter(|s| !s.lines.is_empty()) {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&section.heading);
            output.push_str("\n\n");
            for line in &section.lines {
                output.push_str(line);
                output.push('\n');
                output.push_str(SEPARATOR);
                output.push('\n');
            }
        }

        output
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()).map_err(|e| {
            Error::io(format!("Failed to write report '{}'", path.display()), e)
        })?;
        info!("Logs saved to file: {}", path.display());
        Ok(())
    }
}
