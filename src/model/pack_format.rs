use super::ids::AudioPackFormatId;
use super::params::{impl_parameters, Optional, Required};
use super::types::TypeDescriptor;
use super::values::{AbsoluteDistance, Importance, Name};
use crate::document::ElementKey;
use crate::error::AdmError;

/// A group of channel formats (and nested pack formats) of one type.
#[derive(Clone, Debug)]
pub struct AudioPackFormat {
    id: AudioPackFormatId,
    name: Required<Name>,
    importance: Optional<Importance>,
    absolute_distance: Optional<AbsoluteDistance>,
    pub(crate) channel_formats: Vec<ElementKey>,
    pub(crate) pack_formats: Vec<ElementKey>,
}

impl AudioPackFormat {
    pub fn new(name: impl Into<Name>, type_descriptor: TypeDescriptor) -> Self {
        Self::with_id(AudioPackFormatId::undefined(type_descriptor), name)
    }

    /// The type descriptor is taken from the id.
    pub fn with_id(id: AudioPackFormatId, name: impl Into<Name>) -> Self {
        Self {
            id,
            name: Required::new(name.into()),
            importance: Optional::default(),
            absolute_distance: Optional::default(),
            channel_formats: Vec::new(),
            pack_formats: Vec::new(),
        }
    }

    pub fn id(&self) -> AudioPackFormatId {
        self.id
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.id.type_descriptor()
    }

    pub(crate) fn check_id(&self, id: &AudioPackFormatId) -> Result<(), AdmError> {
        if id.type_descriptor() == self.type_descriptor() {
            return Ok(());
        }
        Err(AdmError::TypeMismatch {
            context: format!("audioPackFormatID {id}"),
            expected: self.type_descriptor().to_string(),
            found: id.type_descriptor().to_string(),
        })
    }

    pub(crate) fn set_id(&mut self, id: AudioPackFormatId) {
        self.id = id;
    }
}

impl_parameters!(AudioPackFormat {
    name: Required(Name),
    importance: Optional(Importance),
    absolute_distance: Optional(AbsoluteDistance),
});
