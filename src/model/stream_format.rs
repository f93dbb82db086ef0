use super::ids::AudioStreamFormatId;
use super::params::{impl_parameters, Required};
use super::types::{FormatDescriptor, TypeDescriptor};
use super::values::Name;
use crate::document::ElementKey;

/// Describes a decodable stream made of one or more track formats.
#[derive(Clone, Debug)]
pub struct AudioStreamFormat {
    id: AudioStreamFormatId,
    name: Required<Name>,
    format: Required<FormatDescriptor>,
    pub(crate) channel_format: Option<ElementKey>,
    pub(crate) pack_format: Option<ElementKey>,
    pub(crate) track_formats: Vec<ElementKey>,
}

impl AudioStreamFormat {
    pub fn new(name: impl Into<Name>, type_descriptor: TypeDescriptor) -> Self {
        Self::with_id(AudioStreamFormatId::undefined(type_descriptor), name)
    }

    pub fn with_id(id: AudioStreamFormatId, name: impl Into<Name>) -> Self {
        Self {
            id,
            name: Required::new(name.into()),
            format: Required::new(FormatDescriptor::Pcm),
            channel_format: None,
            pack_format: None,
            track_formats: Vec::new(),
        }
    }

    pub fn id(&self) -> AudioStreamFormatId {
        self.id
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.id.type_descriptor()
    }

    pub(crate) fn set_id(&mut self, id: AudioStreamFormatId) {
        self.id = id;
    }
}

impl_parameters!(AudioStreamFormat {
    name: Required(Name),
    format: Required(FormatDescriptor),
});
