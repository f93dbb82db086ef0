use super::gain::Gain;
use super::ids::AudioObjectId;
use super::params::{impl_parameters, Defaulted, Optional, Required};
use super::values::{
    AudioObjectInteraction, DialogueId, DisableDucking, Duration, HeadLocked, Importance, Interact,
    Name, Start,
};
use crate::document::ElementKey;

/// An audio object: a timed group of tracks rendered together.
#[derive(Clone, Debug)]
pub struct AudioObject {
    id: AudioObjectId,
    name: Required<Name>,
    start: Defaulted<Start>,
    duration: Optional<Duration>,
    dialogue: Optional<DialogueId>,
    importance: Optional<Importance>,
    interact: Optional<Interact>,
    disable_ducking: Optional<DisableDucking>,
    gain: Defaulted<Gain>,
    head_locked: Defaulted<HeadLocked>,
    interaction: Optional<AudioObjectInteraction>,
    pub(crate) objects: Vec<ElementKey>,
    pub(crate) pack_formats: Vec<ElementKey>,
    pub(crate) track_uids: Vec<ElementKey>,
}

impl AudioObject {
    pub fn new(name: impl Into<Name>) -> Self {
        Self::with_id(AudioObjectId::UNDEFINED, name)
    }

    pub fn with_id(id: AudioObjectId, name: impl Into<Name>) -> Self {
        Self {
            id,
            name: Required::new(name.into()),
            start: Defaulted::default(),
            duration: Optional::default(),
            dialogue: Optional::default(),
            importance: Optional::default(),
            interact: Optional::default(),
            disable_ducking: Optional::default(),
            gain: Defaulted::default(),
            head_locked: Defaulted::default(),
            interaction: Optional::default(),
            objects: Vec::new(),
            pack_formats: Vec::new(),
            track_uids: Vec::new(),
        }
    }

    pub fn id(&self) -> AudioObjectId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: AudioObjectId) {
        self.id = id;
    }
}

impl_parameters!(AudioObject {
    name: Required(Name),
    start: Defaulted(Start),
    duration: Optional(Duration),
    dialogue: Optional(DialogueId),
    importance: Optional(Importance),
    interact: Optional(Interact),
    disable_ducking: Optional(DisableDucking),
    gain: Defaulted(Gain),
    head_locked: Defaulted(HeadLocked),
    interaction: Optional(AudioObjectInteraction),
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Parameters, Time};

    #[test]
    fn test_defaults() {
        let object = AudioObject::new("Voice");
        assert_eq!(object.get::<Start>().unwrap(), Start(Time::ZERO));
        assert_eq!(object.get::<Gain>().unwrap(), Gain::unity());
        assert_eq!(object.get::<HeadLocked>().unwrap(), HeadLocked(false));
        assert!(object.is_default::<Gain>());
        assert!(!object.has::<Duration>());
    }

    #[test]
    fn test_gain_round_trip() {
        let mut object = AudioObject::new("Voice");
        object.set(Gain::from_db(-6.0));
        assert!(!object.is_default::<Gain>());
        object.unset::<Gain>();
        assert!(object.is_default::<Gain>());
        assert_eq!(object.get::<Gain>().unwrap(), Gain::unity());
    }

    #[test]
    fn test_interaction_rules() {
        let mut object = AudioObject::new("Voice");
        let mut rules = AudioObjectInteraction::new(true);
        rules.gain_range = Some((Gain::from_db(-12.0), Gain::from_db(6.0)));
        object.set(rules.clone());
        assert_eq!(object.get::<AudioObjectInteraction>().unwrap(), rules);
    }
}
