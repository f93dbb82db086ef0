//! Type and format descriptors embedded in ADM ids.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AdmError;

/// The rendering type of a pack, channel, stream or track format.
///
/// Its numeric value is the `yyyy` part of `AP_yyyyxxxx`-style ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeDescriptor {
    DirectSpeakers,
    Matrix,
    Objects,
    Hoa,
    Binaural,
}

impl TypeDescriptor {
    /// All known type descriptors, in type-label order.
    pub const ALL: [TypeDescriptor; 5] = [
        TypeDescriptor::DirectSpeakers,
        TypeDescriptor::Matrix,
        TypeDescriptor::Objects,
        TypeDescriptor::Hoa,
        TypeDescriptor::Binaural,
    ];

    /// Returns the four-digit type label value.
    pub fn value(self) -> u16 {
        match self {
            TypeDescriptor::DirectSpeakers => 0x0001,
            TypeDescriptor::Matrix => 0x0002,
            TypeDescriptor::Objects => 0x0003,
            TypeDescriptor::Hoa => 0x0004,
            TypeDescriptor::Binaural => 0x0005,
        }
    }

    pub fn from_value(value: u16) -> Result<Self, AdmError> {
        Self::ALL
            .into_iter()
            .find(|t| t.value() == value)
            .ok_or_else(|| AdmError::invalid("typeLabel", format!("unknown type label {value:04X}")))
    }

    /// Returns the `typeDefinition` name used in ADM XML.
    pub fn definition(self) -> &'static str {
        match self {
            TypeDescriptor::DirectSpeakers => "DirectSpeakers",
            TypeDescriptor::Matrix => "Matrix",
            TypeDescriptor::Objects => "Objects",
            TypeDescriptor::Hoa => "HOA",
            TypeDescriptor::Binaural => "Binaural",
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition())
    }
}

/// The sample format of a stream or track format. Only PCM is defined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatDescriptor {
    #[default]
    Pcm,
}

impl FormatDescriptor {
    pub fn value(self) -> u16 {
        match self {
            FormatDescriptor::Pcm => 0x0001,
        }
    }

    pub fn from_value(value: u16) -> Result<Self, AdmError> {
        match value {
            0x0001 => Ok(FormatDescriptor::Pcm),
            other => Err(AdmError::invalid(
                "formatLabel",
                format!("unknown format label {other:04X}"),
            )),
        }
    }
}

impl fmt::Display for FormatDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatDescriptor::Pcm => f.write_str("PCM"),
        }
    }
}
