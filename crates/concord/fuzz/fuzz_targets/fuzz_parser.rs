//! Fuzz target for the delimited-file parser.
//!
//! Verifies the parser never panics on malformed input, with and without
//! delimiter auto-detection.

#![no_main]

use libfuzzer_sys::fuzz_target;

use concord::{Parser, ParserConfig};

fuzz_target!(|data: &[u8]| {
    // Keep inputs bounded to avoid OOM, not because the parser cares.
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    let _ = parser.parse_bytes(data);

    let headerless = Parser::with_config(ParserConfig::default().without_header());
    let _ = headerless.parse_bytes(data);
});
