use super::ids::AudioTrackFormatId;
use super::params::{impl_parameters, Required};
use super::types::{FormatDescriptor, TypeDescriptor};
use super::values::Name;
use crate::document::ElementKey;

/// One track of a stream format.
#[derive(Clone, Debug)]
pub struct AudioTrackFormat {
    id: AudioTrackFormatId,
    name: Required<Name>,
    format: Required<FormatDescriptor>,
    pub(crate) stream_format: Option<ElementKey>,
}

impl AudioTrackFormat {
    pub fn new(name: impl Into<Name>, type_descriptor: TypeDescriptor) -> Self {
        Self::with_id(AudioTrackFormatId::undefined(type_descriptor), name)
    }

    pub fn with_id(id: AudioTrackFormatId, name: impl Into<Name>) -> Self {
        Self {
            id,
            name: Required::new(name.into()),
            format: Required::new(FormatDescriptor::Pcm),
            stream_format: None,
        }
    }

    pub fn id(&self) -> AudioTrackFormatId {
        self.id
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.id.type_descriptor()
    }

    pub(crate) fn set_id(&mut self, id: AudioTrackFormatId) {
        self.id = id;
    }
}

impl_parameters!(AudioTrackFormat {
    name: Required(Name),
    format: Required(FormatDescriptor),
});
