use super::ids::AudioTrackUidId;
use super::params::{impl_parameters, Optional};
use super::values::{BitDepth, SampleRate};
use crate::document::ElementKey;

/// A physical track of the file, tied to the format it carries.
#[derive(Clone, Debug, Default)]
pub struct AudioTrackUid {
    id: AudioTrackUidId,
    sample_rate: Optional<SampleRate>,
    bit_depth: Optional<BitDepth>,
    pub(crate) track_format: Option<ElementKey>,
    pub(crate) channel_format: Option<ElementKey>,
    pub(crate) pack_format: Option<ElementKey>,
}

impl AudioTrackUid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: AudioTrackUidId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn id(&self) -> AudioTrackUidId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: AudioTrackUidId) {
        self.id = id;
    }
}

impl_parameters!(AudioTrackUid {
    sample_rate: Optional(SampleRate),
    bit_depth: Optional(BitDepth),
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Parameters;

    #[test]
    fn test_optional_slots() {
        let mut uid = AudioTrackUid::new();
        assert!(!uid.has::<SampleRate>());
        uid.set(SampleRate::new(48_000).unwrap());
        assert_eq!(uid.get::<SampleRate>().unwrap().value(), 48_000);
        uid.unset::<SampleRate>();
        assert!(!uid.has::<SampleRate>());
        assert!(BitDepth::new(0).is_err());
    }
}
