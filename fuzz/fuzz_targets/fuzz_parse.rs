#![no_main]

use libfuzzer_sys::fuzz_target;
use pd_parser::parse_path;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    // Arbitrary input may be rejected, but never as a parser defect.
    if let Err(err) = parse_path(input) {
        assert!(!err.is_internal(), "internal error for {input:?}: {err}");
    }
});
