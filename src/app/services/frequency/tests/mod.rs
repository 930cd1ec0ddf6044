//! Tests for frequency aggregation and report rendering


use crate::app::services::frequency::FrequencyTable;

/// Build a table from `(key, sequences)` pairs, in order
pub fn table_from(entries: &[(&str, &[i64])]) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for (key, sequences) in entries {
        for sequence in *sequences {
            table.record(key, *sequence);
        }
    }
    table
}
