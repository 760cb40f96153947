#![no_main]
use libfuzzer_sys::fuzz_target;

use hashcash_types::{Stamp, StampTime};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Accepted text must re-encode byte for byte.
    if let Ok(stamp) = Stamp::parse(text) {
        assert_eq!(stamp.to_string(), text);
        let _ = StampTime::parse(&stamp.timestamp);
    }
});
