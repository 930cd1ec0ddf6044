//! Domain models for manifest reconciliation
//!
//! Manifest rows are kept as name → value maps so unknown columns pass
//! through untouched; the header order of the file decides output order.

use crate::constants::columns;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One delivery stop from the manifest
///
/// Empty cells are stored as empty strings, so "missing" and "empty" are
/// the same thing for every accessor that returns `Option`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestRow {
    fields: HashMap<String, String>,
}

impl ManifestRow {
    /// Build a row by zipping header names with record values
    ///
    /// Short records leave trailing columns unset; extra values are ignored.
    pub fn from_fields<H, V>(headers: H, values: V) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let fields = headers
            .into_iter()
            .map(Into::into)
            .zip(values.into_iter().map(Into::into))
            .collect();
        Self { fields }
    }

    /// Raw field value, including empty strings
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Field value if present and non-blank
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.trim().is_empty())
    }

    /// Set or replace a field value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.non_empty(columns::POSTAL_CODE)
    }

    /// Destination address text, empty if the cell is missing
    pub fn destination_address(&self) -> &str {
        self.get(columns::DESTINATION_ADDRESS).unwrap_or_default()
    }

    pub fn neighborhood(&self) -> &str {
        self.get(columns::NEIGHBORHOOD).unwrap_or_default()
    }

    pub fn city(&self) -> &str {
        self.get(columns::CITY).unwrap_or_default()
    }

    /// Sequence number coerced the same way it is written to the output
    pub fn sequence_number(&self) -> i64 {
        coerce_integer(self.get(columns::SEQUENCE).unwrap_or_default())
    }

    /// Values in the order of `headers`; unset fields become empty cells
    pub fn values_for<'a>(&'a self, headers: &'a [String]) -> impl Iterator<Item = String> + 'a {
        headers.iter().map(|header| {
            let value = self.get(header).unwrap_or_default();
            if columns::INTEGER_COLUMNS.contains(&header.as_str()) {
                coerce_integer(value).to_string()
            } else {
                value.to_string()
            }
        })
    }
}

/// Coerce spreadsheet-exported numbers ("12", "12.0", " 7 ") to integers
///
/// Only the text before the first `.` counts; a leading sign and digit run is
/// parsed and anything unparsable yields 0.
pub fn coerce_integer(text: &str) -> i64 {
    let integral = text.split('.').next().unwrap_or_default().trim();
    let (sign, digits) = match integral.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, integral.strip_prefix('+').unwrap_or(integral)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

/// Authoritative street and city for a postal code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalRecord {
    pub street_name: String,
    pub city: String,
}

impl PostalRecord {
    pub fn new(street_name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            street_name: street_name.into(),
            city: city.into(),
        }
    }
}

/// Geocoded coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Address split into canonical street+number and a free-text complement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParts {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
}

impl AddressParts {
    /// "street, number" as written back to the manifest
    pub fn main_address(&self) -> String {
        format!("{}, {}", self.street, self.number).trim().to_string()
    }
}

/// Result of splitting an address field
///
/// Addresses outside the "street, number[, complement]" grammar are kept
/// verbatim rather than treated as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    Matched(AddressParts),
    Unmatched(String),
}

impl SplitOutcome {
    pub fn main_address(&self) -> String {
        match self {
            SplitOutcome::Matched(parts) => parts.main_address(),
            SplitOutcome::Unmatched(original) => original.clone(),
        }
    }

    pub fn complement(&self) -> Option<&str> {
        match self {
            SplitOutcome::Matched(parts) => parts.complement.as_deref(),
            SplitOutcome::Unmatched(_) => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, SplitOutcome::Matched(_))
    }
}

/// Everything the geocoder and the location cache key need for one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub street: String,
    pub number: String,
    pub postal_code: String,
    pub neighborhood: String,
    pub city: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce_integer("12"), 12);
        assert_eq!(coerce_integer("12.0"), 12);
        assert_eq!(coerce_integer(" 7 "), 7);
        assert_eq!(coerce_integer("-3.9"), -3);
        assert_eq!(coerce_integer("15abc"), 15);
        assert_eq!(coerce_integer("abc"), 0);
        assert_eq!(coerce_integer(""), 0);
    }

    #[test]
    fn test_row_values_follow_header_order() {
        let headers: Vec<String> = ["Stop", "City", "Sequence", "Complement"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row = ManifestRow::from_fields(["Sequence", "Stop", "City"], ["4.0", "2", "Santos"]);

        let values: Vec<String> = row.values_for(&headers).collect();
        assert_eq!(values, vec!["2", "Santos", "4", ""]);
    }

    #[test]
    fn test_blank_postal_code_is_missing() {
        let row = ManifestRow::from_fields([columns::POSTAL_CODE], ["  "]);
        assert_eq!(row.postal_code(), None);
        assert_eq!(row.get(columns::POSTAL_CODE), Some("  "));
    }
}
