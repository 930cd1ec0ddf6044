//! Tests for address normalization components
