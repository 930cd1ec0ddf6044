//! Tests for provider clients (URL building and response decoding, no network)
