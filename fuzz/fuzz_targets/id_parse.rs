//! Fuzz target for ADM id parsing.
//!
//! Every id type gets the same input; a successful parse must survive a
//! display/parse round trip.

#![no_main]

use std::fmt::Display;
use std::str::FromStr;

use admgraph::model::{
    AudioBlockFormatId, AudioChannelFormatId, AudioContentId, AudioObjectId, AudioPackFormatId,
    AudioProgrammeId, AudioStreamFormatId, AudioTrackFormatId, AudioTrackUidId,
};
use libfuzzer_sys::fuzz_target;

fn check<T>(text: &str)
where
    T: FromStr + Display + PartialEq + std::fmt::Debug,
{
    if let Ok(id) = text.parse::<T>() {
        assert_eq!(id.to_string().parse::<T>().ok(), Some(id));
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 256 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    check::<AudioProgrammeId>(text);
    check::<AudioContentId>(text);
    check::<AudioObjectId>(text);
    check::<AudioTrackUidId>(text);
    check::<AudioPackFormatId>(text);
    check::<AudioChannelFormatId>(text);
    check::<AudioStreamFormatId>(text);
    check::<AudioTrackFormatId>(text);
    check::<AudioBlockFormatId>(text);
});
