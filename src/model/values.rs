//! Parameter kinds shared by the element types.
//!
//! Each kind is its own value type. Kinds with a constraint can only be built
//! through a fallible constructor, so an out-of-range value never reaches a
//! slot.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::gain::Gain;
use super::ids::AudioChannelFormatId;
use super::params::{defaults, Parameter};
use super::time::Time;
use super::types::FormatDescriptor;
use crate::error::AdmError;

/// Value types whose constructor enforces a predicate.
macro_rules! ranged_parameter {
    (
        $(#[$doc:meta])*
        $name:ident($inner:ty, $inner_lit:literal), $param:literal, |$v:ident| $check:expr, $expect:literal
    ) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
        #[serde(try_from = $inner_lit, into = $inner_lit)]
        pub struct $name($inner);

        impl $name {
            pub fn new(value: $inner) -> Result<Self, AdmError> {
                let $v = value;
                if $check {
                    Ok(Self(value))
                } else {
                    Err(AdmError::invalid($param, format!("{} is not {}", value, $expect)))
                }
            }

            #[inline]
            pub fn value(&self) -> $inner {
                self.0
            }
        }

        impl TryFrom<$inner> for $name {
            type Error = AdmError;

            fn try_from(value: $inner) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> $inner {
                value.0
            }
        }

        impl Parameter for $name {
            const NAME: &'static str = $param;
        }
    };
}

/// Value types that wrap a [`Time`].
macro_rules! time_parameter {
    ($(#[$doc:meta])* $name:ident, $param:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Time);

        impl Parameter for $name {
            const NAME: &'static str = $param;
        }
    };
}

/// Value types that wrap a flag.
macro_rules! flag_parameter {
    ($(#[$doc:meta])* $name:ident, $param:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub bool);

        impl Parameter for $name {
            const NAME: &'static str = $param;
        }
    };
}

/// Human-readable element name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Name::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Name(name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Parameter for Name {
    const NAME: &'static str = "name";
}

/// An ISO 639 language code (two or three ASCII letters).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn new(code: impl Into<String>) -> Result<Self, AdmError> {
        let code = code.into();
        let valid = (2..=3).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_alphabetic());
        if valid {
            Ok(Self(code))
        } else {
            Err(AdmError::invalid(
                "language",
                format!("'{code}' is not a two or three letter language code"),
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Language {
    type Error = AdmError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Language::new(code)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> String {
        language.0
    }
}

impl Parameter for Language {
    const NAME: &'static str = "language";
}

time_parameter!(
    /// Start of a programme or object on the file timeline.
    Start, "start"
);
time_parameter!(
    /// End of a programme.
    End, "end"
);
time_parameter!(
    /// Length of an object or block format.
    Duration, "duration"
);
time_parameter!(
    /// Start of a block format.
    Rtime, "rtime"
);

flag_parameter!(Interact, "interact");
flag_parameter!(DisableDucking, "disableDucking");
flag_parameter!(HeadLocked, "headLocked");

ranged_parameter!(
    /// Relative importance, 0 (least) to 10 (most).
    Importance(u8, "u8"), "importance", |v| v <= 10, "an integer in 0..=10"
);
ranged_parameter!(
    /// Maximum ducking depth in dB.
    MaxDuckingDepth(f64, "f64"), "maxDuckingDepth", |v| (-62.0..=0.0).contains(&v), "in -62..=0 dB"
);
ranged_parameter!(
    /// Absolute distance in metres for normalized positions.
    AbsoluteDistance(f64, "f64"), "absoluteDistance", |v| v.is_finite() && v >= 0.0, "a finite distance >= 0"
);
ranged_parameter!(
    SampleRate(u32, "u32"), "sampleRate", |v| v > 0, "a positive rate"
);
ranged_parameter!(
    BitDepth(u8, "u8"), "bitDepth", |v| (1..=64).contains(&v), "in 1..=64"
);
ranged_parameter!(
    Width(f64, "f64"), "width", |v| v.is_finite() && v >= 0.0, "a finite extent >= 0"
);
ranged_parameter!(
    Height(f64, "f64"), "height", |v| v.is_finite() && v >= 0.0, "a finite extent >= 0"
);
ranged_parameter!(
    Depth(f64, "f64"), "depth", |v| v.is_finite() && v >= 0.0, "a finite extent >= 0"
);
ranged_parameter!(
    /// Diffuseness, 0.0 (direct) to 1.0 (fully diffuse).
    Diffuse(f64, "f64"), "diffuse", |v| (0.0..=1.0).contains(&v), "in 0..=1"
);
ranged_parameter!(
    HoaOrder(u32, "u32"), "order", |v| v <= 64, "an order in 0..=64"
);
ranged_parameter!(
    HoaDegree(i32, "i32"), "degree", |v| (-64..=64).contains(&v), "a degree in -64..=64"
);

impl Parameter for FormatDescriptor {
    const NAME: &'static str = "format";
}

/// Reference screen the programme was authored for.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceScreen {
    aspect_ratio: f64,
    width_azimuth: f64,
}

impl ReferenceScreen {
    pub fn new(aspect_ratio: f64, width_azimuth: f64) -> Result<Self, AdmError> {
        if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
            return Err(AdmError::invalid(
                "referenceScreen",
                format!("aspect ratio {aspect_ratio} must be positive"),
            ));
        }
        if !(width_azimuth > 0.0 && width_azimuth <= 360.0) {
            return Err(AdmError::invalid(
                "referenceScreen",
                format!("width azimuth {width_azimuth} must be in (0, 360]"),
            ));
        }
        Ok(Self {
            aspect_ratio,
            width_azimuth,
        })
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    pub fn width_azimuth(&self) -> f64 {
        self.width_azimuth
    }
}

impl Parameter for ReferenceScreen {
    const NAME: &'static str = "audioProgrammeReferenceScreen";
}

/// One `loudnessMetadata` entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoudnessMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrated_loudness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loudness_range: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_true_peak: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue_loudness: Option<f64>,
}

impl Parameter for LoudnessMetadata {
    const NAME: &'static str = "loudnessMetadata";
}

/// Top-level dialogue category of a content or object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogueId {
    NonDialogue,
    Dialogue,
    Mixed,
}

impl DialogueId {
    pub fn value(self) -> u8 {
        match self {
            DialogueId::NonDialogue => 0,
            DialogueId::Dialogue => 1,
            DialogueId::Mixed => 2,
        }
    }

    pub fn from_value(value: u8) -> Result<Self, AdmError> {
        match value {
            0 => Ok(DialogueId::NonDialogue),
            1 => Ok(DialogueId::Dialogue),
            2 => Ok(DialogueId::Mixed),
            other => Err(AdmError::invalid("dialogue", format!("{other} is not 0, 1 or 2"))),
        }
    }
}

impl Parameter for DialogueId {
    const NAME: &'static str = "dialogue";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NonDialogueContentKind {
    Undefined,
    Music,
    Effect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogueContentKind {
    Undefined,
    StorylineDialogue,
    Voiceover,
    SpokenSubtitle,
    AudioDescription,
    Commentary,
    Emergency,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MixedContentKind {
    Undefined,
    CompleteMain,
    Mixed,
    HearingImpaired,
}

impl Parameter for NonDialogueContentKind {
    const NAME: &'static str = "nonDialogueContentKind";
}

impl Parameter for DialogueContentKind {
    const NAME: &'static str = "dialogueContentKind";
}

impl Parameter for MixedContentKind {
    const NAME: &'static str = "mixedContentKind";
}

/// User interaction rules of an audio object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AudioObjectInteraction {
    pub on_off_interact: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain_interact: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_interact: Option<bool>,
    /// Allowed `(min, max)` gain when gain interaction is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain_range: Option<(Gain, Gain)>,
}

impl AudioObjectInteraction {
    pub fn new(on_off_interact: bool) -> Self {
        Self {
            on_off_interact,
            gain_interact: None,
            position_interact: None,
            gain_range: None,
        }
    }
}

impl Parameter for AudioObjectInteraction {
    const NAME: &'static str = "audioObjectInteraction";
}

/// A spherical position: azimuth and elevation in degrees, distance normalized.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphericalPosition {
    azimuth: f64,
    elevation: f64,
    distance: f64,
}

impl SphericalPosition {
    pub fn new(azimuth: f64, elevation: f64, distance: f64) -> Result<Self, AdmError> {
        if !(-180.0..=180.0).contains(&azimuth) {
            return Err(AdmError::invalid("azimuth", format!("{azimuth} is not in -180..=180")));
        }
        if !(-90.0..=90.0).contains(&elevation) {
            return Err(AdmError::invalid("elevation", format!("{elevation} is not in -90..=90")));
        }
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(AdmError::invalid("distance", format!("{distance} is not >= 0")));
        }
        Ok(Self {
            azimuth,
            elevation,
            distance,
        })
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn elevation(&self) -> f64 {
        self.elevation
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// A cartesian position with each coordinate in -1..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CartesianPosition {
    x: f64,
    y: f64,
    z: f64,
}

impl CartesianPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, AdmError> {
        for (axis, v) in [("X", x), ("Y", y), ("Z", z)] {
            if !(-1.0..=1.0).contains(&v) {
                return Err(AdmError::invalid("position", format!("{axis}={v} is not in -1..=1")));
            }
        }
        Ok(Self { x, y, z })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    Spherical(SphericalPosition),
    Cartesian(CartesianPosition),
}

impl Position {
    pub fn is_cartesian(&self) -> bool {
        matches!(self, Position::Cartesian(_))
    }
}

impl From<SphericalPosition> for Position {
    fn from(p: SphericalPosition) -> Self {
        Position::Spherical(p)
    }
}

impl From<CartesianPosition> for Position {
    fn from(p: CartesianPosition) -> Self {
        Position::Cartesian(p)
    }
}

impl Parameter for Position {
    const NAME: &'static str = "position";
}

/// A loudspeaker label such as `M+030`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerLabel(pub String);

impl Parameter for SpeakerLabel {
    const NAME: &'static str = "speakerLabel";
}

/// One matrix coefficient: an input channel and its gain.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixCoefficient {
    pub input: AudioChannelFormatId,
    pub gain: Option<Gain>,
}

impl Parameter for MatrixCoefficient {
    const NAME: &'static str = "coefficient";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Normalization {
    Sn3d,
    N3d,
    FuMa,
}

impl Parameter for Normalization {
    const NAME: &'static str = "normalization";
}

defaults! {
    Start => Start(Time::ZERO),
    Gain => Gain::unity(),
    HeadLocked => HeadLocked(false),
    ReferenceScreen => ReferenceScreen {
        aspect_ratio: 1.78,
        width_azimuth: 58.0,
    },
    Width => Width(0.0),
    Height => Height(0.0),
    Depth => Depth(0.0),
    Diffuse => Diffuse(0.0),
    Normalization => Normalization::Sn3d,
}
