#![no_main]

use libfuzzer_sys::fuzz_target;
use pd_parser::tokenize_path;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    for token in tokenize_path(input) {
        assert!(!token.text.is_empty());
        assert_eq!(&input[token.offset..token.end()], token.text);
    }
});
