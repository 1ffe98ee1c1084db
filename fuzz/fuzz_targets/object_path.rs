#![no_main]

use cimscope::codec::path;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(parsed) = path::parse(text) {
        let reparsed = path::parse(&path::serialize(&parsed)).unwrap();
        assert!(reparsed.is_equivalent(&parsed));
    }
});
