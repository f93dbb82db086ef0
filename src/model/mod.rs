//! Element types of the audio definition model.
//!
//! This module holds the value side of the model: the eight document-level
//! element types, block formats, ids, timestamps and the parameter kinds
//! stored in their slots. Elements are plain values here; linking them
//! together is the job of [`Document`](crate::document::Document).
//!
//! # Example
//!
//! ```
//! use admgraph::model::{AudioObject, Gain, Parameters, Start, Time};
//!
//! let mut object = AudioObject::new("Dialogue");
//! assert_eq!(object.get::<Gain>().unwrap(), Gain::unity());
//!
//! object.set(Start(Time::from_secs(2)));
//! assert!(!object.is_default::<Start>());
//! ```

mod block_format;
mod channel_format;
mod content;
mod gain;
mod ids;
mod object;
mod pack_format;
pub mod params;
mod programme;
mod stream_format;
mod time;
mod track_format;
mod track_uid;
mod types;
mod values;

use std::fmt;

pub use block_format::{
    AudioBlockFormat, BinauralBlock, BlockPayload, BlockPayloadMut, DirectSpeakersBlock, HoaBlock,
    MatrixBlock, ObjectsBlock,
};
pub use channel_format::AudioChannelFormat;
pub use content::{AudioContent, ContentKind};
pub use gain::{Gain, GainUnit};
pub use ids::{
    AudioBlockFormatId, AudioChannelFormatId, AudioContentId, AudioObjectId, AudioPackFormatId,
    AudioProgrammeId, AudioStreamFormatId, AudioTrackFormatId, AudioTrackUidId,
};
pub use object::AudioObject;
pub use pack_format::AudioPackFormat;
pub use params::{
    DefaultParameter, Defaulted, HasParameter, Optional, Parameter, Parameters, Required,
    SetParameter, UnsetParameter, Vector, VectorParameter,
};
pub use programme::AudioProgramme;
pub use stream_format::AudioStreamFormat;
pub use time::Time;
pub use track_format::AudioTrackFormat;
pub use track_uid::AudioTrackUid;
pub use types::{FormatDescriptor, TypeDescriptor};
pub use values::{
    AbsoluteDistance, AudioObjectInteraction, BitDepth, CartesianPosition, Depth, Diffuse,
    DialogueContentKind, DialogueId, DisableDucking, Duration, End, HeadLocked, Height, HoaDegree,
    HoaOrder, Importance, Interact, Language, LoudnessMetadata, MatrixCoefficient, MaxDuckingDepth,
    MixedContentKind, Name, NonDialogueContentKind, Normalization, Position, ReferenceScreen,
    Rtime, SampleRate, SpeakerLabel, SphericalPosition, Start, Width,
};

/// The kind of a document-level element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum ElementKind {
    Programme,
    Content,
    Object,
    PackFormat,
    ChannelFormat,
    StreamFormat,
    TrackFormat,
    TrackUid,
}

impl ElementKind {
    pub const ALL: [ElementKind; 8] = [
        ElementKind::Programme,
        ElementKind::Content,
        ElementKind::Object,
        ElementKind::PackFormat,
        ElementKind::ChannelFormat,
        ElementKind::StreamFormat,
        ElementKind::TrackFormat,
        ElementKind::TrackUid,
    ];

    /// The ADM element name, e.g. `audioPackFormat`.
    pub fn element_name(self) -> &'static str {
        match self {
            ElementKind::Programme => "audioProgramme",
            ElementKind::Content => "audioContent",
            ElementKind::Object => "audioObject",
            ElementKind::PackFormat => "audioPackFormat",
            ElementKind::ChannelFormat => "audioChannelFormat",
            ElementKind::StreamFormat => "audioStreamFormat",
            ElementKind::TrackFormat => "audioTrackFormat",
            ElementKind::TrackUid => "audioTrackUID",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}
