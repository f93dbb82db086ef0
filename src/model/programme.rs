use super::ids::AudioProgrammeId;
use super::params::{impl_parameters, Defaulted, Optional, Required, Vector};
use super::values::{End, Language, LoudnessMetadata, MaxDuckingDepth, Name, ReferenceScreen, Start};
use crate::document::ElementKey;

/// A complete programme: the top of the content tree.
#[derive(Clone, Debug)]
pub struct AudioProgramme {
    id: AudioProgrammeId,
    name: Required<Name>,
    language: Optional<Language>,
    start: Defaulted<Start>,
    end: Optional<End>,
    max_ducking_depth: Optional<MaxDuckingDepth>,
    reference_screen: Defaulted<ReferenceScreen>,
    loudness: Vector<LoudnessMetadata>,
    pub(crate) contents: Vec<ElementKey>,
}

impl AudioProgramme {
    /// Creates a detached programme with an undefined id.
    pub fn new(name: impl Into<Name>) -> Self {
        Self::with_id(AudioProgrammeId::UNDEFINED, name)
    }

    pub fn with_id(id: AudioProgrammeId, name: impl Into<Name>) -> Self {
        Self {
            id,
            name: Required::new(name.into()),
            language: Optional::default(),
            start: Defaulted::default(),
            end: Optional::default(),
            max_ducking_depth: Optional::default(),
            reference_screen: Defaulted::default(),
            loudness: Vector::default(),
            contents: Vec::new(),
        }
    }

    pub fn id(&self) -> AudioProgrammeId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: AudioProgrammeId) {
        self.id = id;
    }
}

impl_parameters!(AudioProgramme {
    name: Required(Name),
    language: Optional(Language),
    start: Defaulted(Start),
    end: Optional(End),
    max_ducking_depth: Optional(MaxDuckingDepth),
    reference_screen: Defaulted(ReferenceScreen),
    loudness: Vector(LoudnessMetadata),
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Parameters, Time};

    #[test]
    fn test_fresh_programme_parameters() {
        let programme = AudioProgramme::new("Main");
        assert!(programme.id().is_undefined());
        assert_eq!(programme.get::<Name>().unwrap().as_str(), "Main");
        assert!(programme.is_default::<Start>());
        assert!(programme.is_default::<ReferenceScreen>());
        assert!(!programme.has::<End>());
        assert!(!programme.has::<Vec<LoudnessMetadata>>());
    }

    #[test]
    fn test_end_round_trip() {
        let mut programme = AudioProgramme::new("Main");
        programme.set(End(Time::from_secs(30)));
        assert_eq!(programme.get::<End>().unwrap(), End(Time::from_secs(30)));
        programme.unset::<End>();
        assert!(!programme.has::<End>());
    }

    #[test]
    fn test_loudness_entries_are_deduplicated() {
        let mut programme = AudioProgramme::new("Main");
        let entry = LoudnessMetadata {
            integrated_loudness: Some(-23.0),
            ..Default::default()
        };
        assert!(programme.add(entry.clone()));
        assert!(!programme.add(entry));
        assert_eq!(programme.get::<Vec<LoudnessMetadata>>().unwrap().len(), 1);
    }
}
