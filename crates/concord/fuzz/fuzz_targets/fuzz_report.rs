//! Fuzz target for the report re-parser.
//!
//! A report file is machine-written, but `from_delimited` must still reject
//! arbitrary text without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;

use concord::ReportTable;

fuzz_target!(|text: &str| {
    if text.len() > 100_000 {
        return;
    }

    for delimiter in [b'\t', b','] {
        let _ = ReportTable::from_delimited(text, delimiter);
    }
});
