//! Tests for manifest reading and writing

pub mod reader_tests;

/// Header used by the routing software export
pub const SAMPLE_HEADER: &str =
    "Sequence,Stop,Destination Address,Zipcode/Postal code,Bairro,City,Latitude,Longitude";
