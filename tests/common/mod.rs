#![allow(dead_code)]

use admgraph::model::{
    AudioBlockFormat, AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat,
    AudioProgramme, AudioStreamFormat, AudioTrackFormat, AudioTrackUid, Duration, ObjectsBlock,
    Parameters, SphericalPosition, Time, TypeDescriptor,
};
use admgraph::{Document, Handle};

/// An objects-type channel format with one block per entry of `block_secs`.
/// `None` leaves that block's duration unset.
pub fn objects_channel(name: &str, block_secs: &[Option<u64>]) -> AudioChannelFormat {
    let mut channel = AudioChannelFormat::new(name, TypeDescriptor::Objects);
    for secs in block_secs {
        let position = SphericalPosition::new(0.0, 0.0, 1.0).expect("valid position");
        let mut block = AudioBlockFormat::new(ObjectsBlock::new(position));
        if let Some(secs) = secs {
            block.set(Duration(Time::from_secs(*secs)));
        }
        channel.add_block_format(block).expect("objects block fits");
    }
    channel
}

/// programme -> content -> object -> pack -> channel, all attached.
pub struct ObjectChain {
    pub programme: Handle<AudioProgramme>,
    pub content: Handle<AudioContent>,
    pub object: Handle<AudioObject>,
    pub pack: Handle<AudioPackFormat>,
    pub channel: Handle<AudioChannelFormat>,
}

pub fn object_chain(doc: &mut Document, name: &str, block_secs: &[Option<u64>]) -> ObjectChain {
    let programme = doc.add(AudioProgramme::new(name)).expect("add programme");
    let content = doc.create(AudioContent::new(name));
    let object = doc.create(AudioObject::new(name));
    let pack = doc.create(AudioPackFormat::new(name, TypeDescriptor::Objects));
    let channel = doc.create(objects_channel(name, block_secs));

    doc.add_reference(programme, content).expect("programme -> content");
    doc.add_reference(content, object).expect("content -> object");
    doc.add_reference(object, pack).expect("object -> pack");
    doc.add_reference(pack, channel).expect("pack -> channel");

    ObjectChain {
        programme,
        content,
        object,
        pack,
        channel,
    }
}

/// track UID -> track format <-> stream format -> channel, all attached.
pub struct TrackChain {
    pub uid: Handle<AudioTrackUid>,
    pub track: Handle<AudioTrackFormat>,
    pub stream: Handle<AudioStreamFormat>,
}

pub fn track_chain(doc: &mut Document, channel: Handle<AudioChannelFormat>) -> TrackChain {
    let uid = doc.add(AudioTrackUid::new()).expect("add track uid");
    let track = doc.create(AudioTrackFormat::new("PCM", TypeDescriptor::Objects));
    let stream = doc.create(AudioStreamFormat::new("PCM", TypeDescriptor::Objects));

    doc.add_reference(uid, track).expect("uid -> track");
    doc.add_reference(track, stream).expect("track -> stream");
    doc.add_reference(stream, channel).expect("stream -> channel");

    TrackChain { uid, track, stream }
}

/// `(rtime, duration)` of every block of a channel format, in nanoseconds.
pub fn block_timings(doc: &Document, channel: Handle<AudioChannelFormat>) -> Vec<(u64, u64)> {
    doc.get(channel)
        .expect("channel resolves")
        .block_formats()
        .iter()
        .map(|block| {
            let rtime = block
                .get::<admgraph::model::Rtime>()
                .map(|r| r.0.as_nanos())
                .expect("rtime set");
            let duration = block.get::<Duration>().map(|d| d.0.as_nanos()).expect("duration set");
            (rtime, duration)
        })
        .collect()
}

pub fn secs(value: u64) -> u64 {
    Time::from_secs(value).as_nanos()
}
