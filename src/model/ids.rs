//! Newtype ids for ADM elements.
//!
//! Each element kind has its own id type, so an `AudioObjectId` can never be
//! handed to something expecting an `AudioPackFormatId`. All ids print and
//! parse as their ADM string form (`APR_1001`, `AP_00031001`, ...). A numeric
//! part of zero marks the id as *undefined*: undefined ids are never indexed
//! and are replaced by a fresh id when the element joins a document.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::types::TypeDescriptor;
use crate::error::AdmError;

fn parse_hex(text: &str, digits: usize, parameter: &'static str) -> Result<u32, AdmError> {
    if text.len() != digits || !text.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AdmError::invalid(
            parameter,
            format!("expected {digits} hex digits, got '{text}'"),
        ));
    }
    u32::from_str_radix(text, 16).map_err(|e| AdmError::invalid(parameter, e.to_string()))
}

fn strip_prefix<'a>(
    text: &'a str,
    prefix: &str,
    parameter: &'static str,
) -> Result<&'a str, AdmError> {
    text.strip_prefix(prefix)
        .ok_or_else(|| AdmError::invalid(parameter, format!("'{text}' does not start with {prefix}")))
}

fn parse_type(text: &str, parameter: &'static str) -> Result<TypeDescriptor, AdmError> {
    let value = parse_hex(text, 4, parameter)?;
    TypeDescriptor::from_value(value as u16)
}

macro_rules! string_serde {
    ($id:ty) => {
        impl Serialize for $id {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $id {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }

        impl fmt::Debug for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($id), self)
            }
        }
    };
}

/// Ids of the form `PREFIX_xxxx` with a plain numeric value.
macro_rules! numeric_id {
    ($(#[$doc:meta])* $id:ident, $int:ty, $prefix:literal, $digits:literal, $param:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $id($int);

        impl $id {
            /// The undefined id (numeric value zero).
            pub const UNDEFINED: $id = $id(0);

            #[inline]
            pub fn new(value: $int) -> Self {
                Self(value)
            }

            #[inline]
            pub fn value(&self) -> $int {
                self.0
            }

            #[inline]
            pub fn is_undefined(&self) -> bool {
                self.0 == 0
            }
        }

        impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{:0", $digits, "X}"), self.0)
            }
        }

        impl FromStr for $id {
            type Err = AdmError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let rest = strip_prefix(s, $prefix, $param)?;
                Ok(Self(parse_hex(rest, $digits, $param)? as $int))
            }
        }

        string_serde!($id);
    };
}

numeric_id!(
    /// Id of an `audioProgramme` (`APR_xxxx`).
    AudioProgrammeId, u16, "APR_", 4, "audioProgrammeID"
);
numeric_id!(
    /// Id of an `audioContent` (`ACO_xxxx`).
    AudioContentId, u16, "ACO_", 4, "audioContentID"
);
numeric_id!(
    /// Id of an `audioObject` (`AO_xxxx`).
    AudioObjectId, u16, "AO_", 4, "audioObjectID"
);
numeric_id!(
    /// Id of an `audioTrackUID` (`ATU_xxxxxxxx`).
    AudioTrackUidId, u32, "ATU_", 8, "audioTrackUID"
);

/// Ids of the form `PREFIX_yyyyxxxx` carrying a type label.
macro_rules! typed_id {
    ($(#[$doc:meta])* $id:ident, $prefix:literal, $param:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $id {
            type_descriptor: TypeDescriptor,
            value: u16,
        }

        impl $id {
            #[inline]
            pub fn new(type_descriptor: TypeDescriptor, value: u16) -> Self {
                Self {
                    type_descriptor,
                    value,
                }
            }

            /// An undefined id that still records its type.
            #[inline]
            pub fn undefined(type_descriptor: TypeDescriptor) -> Self {
                Self::new(type_descriptor, 0)
            }

            #[inline]
            pub fn type_descriptor(&self) -> TypeDescriptor {
                self.type_descriptor
            }

            #[inline]
            pub fn value(&self) -> u16 {
                self.value
            }

            #[inline]
            pub fn is_undefined(&self) -> bool {
                self.value == 0
            }
        }

        impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    concat!($prefix, "{:04X}{:04X}"),
                    self.type_descriptor.value(),
                    self.value
                )
            }
        }

        impl FromStr for $id {
            type Err = AdmError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let rest = strip_prefix(s, $prefix, $param)?;
                if rest.len() != 8 || !rest.is_char_boundary(4) {
                    return Err(AdmError::invalid($param, format!("malformed id '{s}'")));
                }
                let type_descriptor = parse_type(&rest[..4], $param)?;
                let value = parse_hex(&rest[4..], 4, $param)? as u16;
                Ok(Self::new(type_descriptor, value))
            }
        }

        string_serde!($id);
    };
}

typed_id!(
    /// Id of an `audioPackFormat` (`AP_yyyyxxxx`).
    AudioPackFormatId, "AP_", "audioPackFormatID"
);
typed_id!(
    /// Id of an `audioChannelFormat` (`AC_yyyyxxxx`).
    AudioChannelFormatId, "AC_", "audioChannelFormatID"
);
typed_id!(
    /// Id of an `audioStreamFormat` (`AS_yyyyxxxx`).
    AudioStreamFormatId, "AS_", "audioStreamFormatID"
);

/// Id of an `audioTrackFormat` (`AT_yyyyxxxx_zz`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AudioTrackFormatId {
    type_descriptor: TypeDescriptor,
    value: u16,
    counter: u8,
}

impl AudioTrackFormatId {
    pub fn new(type_descriptor: TypeDescriptor, value: u16, counter: u8) -> Self {
        Self {
            type_descriptor,
            value,
            counter,
        }
    }

    pub fn undefined(type_descriptor: TypeDescriptor) -> Self {
        Self::new(type_descriptor, 0, 0)
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.type_descriptor
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    pub fn is_undefined(&self) -> bool {
        self.value == 0
    }
}

impl fmt::Display for AudioTrackFormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AT_{:04X}{:04X}_{:02X}",
            self.type_descriptor.value(),
            self.value,
            self.counter
        )
    }
}

impl FromStr for AudioTrackFormatId {
    type Err = AdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const PARAM: &str = "audioTrackFormatID";
        let rest = strip_prefix(s, "AT_", PARAM)?;
        let (head, counter) = rest
            .split_once('_')
            .ok_or_else(|| AdmError::invalid(PARAM, format!("malformed id '{s}'")))?;
        if head.len() != 8 || !head.is_char_boundary(4) {
            return Err(AdmError::invalid(PARAM, format!("malformed id '{s}'")));
        }
        Ok(Self::new(
            parse_type(&head[..4], PARAM)?,
            parse_hex(&head[4..], 4, PARAM)? as u16,
            parse_hex(counter, 2, PARAM)? as u8,
        ))
    }
}

string_serde!(AudioTrackFormatId);

/// Id of an `audioBlockFormat` (`AB_yyyyxxxx_zzzzzzzz`).
///
/// The `yyyyxxxx` part always mirrors the owning channel format's id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AudioBlockFormatId {
    type_descriptor: TypeDescriptor,
    value: u16,
    counter: u32,
}

impl AudioBlockFormatId {
    pub fn new(type_descriptor: TypeDescriptor, value: u16, counter: u32) -> Self {
        Self {
            type_descriptor,
            value,
            counter,
        }
    }

    pub fn undefined(type_descriptor: TypeDescriptor) -> Self {
        Self::new(type_descriptor, 0, 0)
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.type_descriptor
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn is_undefined(&self) -> bool {
        self.counter == 0
    }

    /// Re-parents the id onto a channel format, keeping its counter.
    pub(crate) fn with_channel(self, channel: AudioChannelFormatId) -> Self {
        Self::new(channel.type_descriptor(), channel.value(), self.counter)
    }
}

impl fmt::Display for AudioBlockFormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AB_{:04X}{:04X}_{:08X}",
            self.type_descriptor.value(),
            self.value,
            self.counter
        )
    }
}

impl FromStr for AudioBlockFormatId {
    type Err = AdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const PARAM: &str = "audioBlockFormatID";
        let rest = strip_prefix(s, "AB_", PARAM)?;
        let (head, counter) = rest
            .split_once('_')
            .ok_or_else(|| AdmError::invalid(PARAM, format!("malformed id '{s}'")))?;
        if head.len() != 8 || !head.is_char_boundary(4) {
            return Err(AdmError::invalid(PARAM, format!("malformed id '{s}'")));
        }
        Ok(Self::new(
            parse_type(&head[..4], PARAM)?,
            parse_hex(&head[4..], 4, PARAM)? as u16,
            parse_hex(counter, 8, PARAM)?,
        ))
    }
}

string_serde!(AudioBlockFormatId);
