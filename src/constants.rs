//! Application constants for the manifest reconciler
//!
//! This module contains manifest column names, the closed vocabulary used by
//! the address normalizer, report wording and default configuration values.

// =============================================================================
// Manifest Columns
// =============================================================================

/// Manifest column names as exported by the routing software
pub mod columns {
    /// Order in which the package was loaded; used as the report reference
    pub const SEQUENCE: &str = "Sequence";

    /// Stop number on the route
    pub const STOP: &str = "Stop";

    /// Free-text destination address ("street, number[, complement]")
    pub const DESTINATION_ADDRESS: &str = "Destination Address";

    /// Postal code (CEP), with or without separators
    pub const POSTAL_CODE: &str = "Zipcode/Postal code";

    /// Neighborhood
    pub const NEIGHBORHOOD: &str = "Bairro";

    pub const CITY: &str = "City";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";

    /// Column inserted right after the destination address in the output
    pub const COMPLEMENT: &str = "Complement";

    /// Columns written as integers, truncating any fractional suffix
    pub const INTEGER_COLUMNS: &[&str] = &[SEQUENCE, STOP];
}

// =============================================================================
// Address Normalization
// =============================================================================

/// Street-type words dropped before matching, full and abbreviated forms
/// (rua, avenida, travessa, passagem, praça)
pub const STREET_PREFIXES: &[&str] = &[
    "r", "rua", "av", "avenida", "tv", "travessa", "psg", "passagem", "pç", "praça",
];

/// Accented characters folded by the normalizer and their replacements.
/// Parentheses fold to spaces.
pub const ACCENT_FOLDS: &[(char, char)] = &[
    ('á', 'a'),
    ('à', 'a'),
    ('â', 'a'),
    ('ã', 'a'),
    ('ä', 'a'),
    ('é', 'e'),
    ('è', 'e'),
    ('ê', 'e'),
    ('ë', 'e'),
    ('í', 'i'),
    ('ì', 'i'),
    ('î', 'i'),
    ('ï', 'i'),
    ('ó', 'o'),
    ('ò', 'o'),
    ('ô', 'o'),
    ('õ', 'o'),
    ('ö', 'o'),
    ('ú', 'u'),
    ('ù', 'u'),
    ('û', 'u'),
    ('ü', 'u'),
    ('ç', 'c'),
    ('(', ' '),
    (')', ' '),
];

// =============================================================================
// Report Wording (pt-BR)
// =============================================================================

pub mod report {
    pub const ADDRESSES_HEADING: &str = "Endereços com mais pedidos:";
    pub const STREETS_HEADING: &str = "Ruas com mais pedidos:";
    pub const ALLEYS_HEADING: &str = "Travessas e/ou Passagens com mais pedidos:";

    /// Line written after every report entry
    pub const SEPARATOR: &str = "---------------------------------";

    pub const PACKAGE_SINGULAR: &str = "pacote";
    pub const PACKAGE_PLURAL: &str = "pacotes";
    pub const ORDER_SINGULAR: &str = "a ordem";
    pub const ORDER_PLURAL: &str = "as ordens";

    /// Street keys starting with one of these words feed the alley section
    pub const ALLEY_PREFIXES: &[&str] = &["Travessa", "Passagem"];
}

// =============================================================================
// Defaults
// =============================================================================

/// Default number of entries per report section
pub const DEFAULT_TOP_N: usize = 10;

/// Default per-call timeout for postal and geocoding providers
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_POSTAL_BASE_URL: &str = "https://viacep.com.br/ws";

/// State used for reverse (street → CEP) searches
pub const DEFAULT_POSTAL_STATE: &str = "SP";

pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Country appended to every geocoding query
pub const DEFAULT_COUNTRY: &str = "Brazil";

pub const DEFAULT_OUTPUT_DIR: &str = "files";
pub const DEFAULT_MANIFEST_SUFFIX: &str = "manifesto.csv";
pub const DEFAULT_REPORT_SUFFIX: &str = "log_enderecos.txt";
pub const DEFAULT_LAST_CHECKED_FILE: &str = "last_checked.txt";

/// Date prefix for generated file names
pub const OUTPUT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Application name used for the default config location
pub const APP_NAME: &str = "manifest-reconciler";

/// Environment variables read by the layered configuration
pub mod env_vars {
    pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
    pub const OUTPUT_DIR: &str = "MANIFEST_OUTPUT_DIR";
    pub const LAST_CHECKED_FILE: &str = "LAST_CHECKED_FILE";
}
