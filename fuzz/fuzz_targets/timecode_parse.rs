//! Fuzz target for ADM timecode parsing.
//!
//! Feeds arbitrary UTF-8 to `Time::from_str`. Anything that parses must print
//! back to a string that parses to the same time.

#![no_main]

use admgraph::model::Time;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(time) = text.parse::<Time>() {
        let printed = time.to_string();
        assert_eq!(printed.parse::<Time>().ok(), Some(time));
    }
});
