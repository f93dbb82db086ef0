//! Block formats: the timed parameter sets owned by a channel format.

use super::gain::Gain;
use super::ids::AudioBlockFormatId;
use super::params::{impl_parameters, Defaulted, HasParameter, Optional, Required, Vector};
use super::types::TypeDescriptor;
use super::values::{
    Depth, Diffuse, Duration, Height, HoaDegree, HoaOrder, Importance, MatrixCoefficient,
    Normalization, Position, Rtime, SpeakerLabel, Width,
};
use crate::error::AdmError;

#[derive(Clone, Debug, PartialEq)]
pub struct DirectSpeakersBlock {
    position: Required<Position>,
    speaker_labels: Vector<SpeakerLabel>,
}

impl DirectSpeakersBlock {
    pub fn new(position: impl Into<Position>) -> Self {
        Self {
            position: Required::new(position.into()),
            speaker_labels: Vector::default(),
        }
    }
}

impl_parameters!(DirectSpeakersBlock {
    position: Required(Position),
    speaker_labels: Vector(SpeakerLabel),
});

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatrixBlock {
    coefficients: Vector<MatrixCoefficient>,
}

impl MatrixBlock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl_parameters!(MatrixBlock {
    coefficients: Vector(MatrixCoefficient),
});

#[derive(Clone, Debug, PartialEq)]
pub struct ObjectsBlock {
    position: Required<Position>,
    width: Defaulted<Width>,
    height: Defaulted<Height>,
    depth: Defaulted<Depth>,
    diffuse: Defaulted<Diffuse>,
}

impl ObjectsBlock {
    pub fn new(position: impl Into<Position>) -> Self {
        Self {
            position: Required::new(position.into()),
            width: Defaulted::default(),
            height: Defaulted::default(),
            depth: Defaulted::default(),
            diffuse: Defaulted::default(),
        }
    }
}

impl_parameters!(ObjectsBlock {
    position: Required(Position),
    width: Defaulted(Width),
    height: Defaulted(Height),
    depth: Defaulted(Depth),
    diffuse: Defaulted(Diffuse),
});

/// One HOA component. Order and degree are only settable together, since
/// `|degree| <= order` constrains the pair.
#[derive(Clone, Debug, PartialEq)]
pub struct HoaBlock {
    order: HoaOrder,
    degree: HoaDegree,
    normalization: Defaulted<Normalization>,
}

impl HoaBlock {
    pub fn new(order: HoaOrder, degree: HoaDegree) -> Result<Self, AdmError> {
        check_degree(order, degree)?;
        Ok(Self {
            order,
            degree,
            normalization: Defaulted::default(),
        })
    }

    pub fn set_order_and_degree(&mut self, order: HoaOrder, degree: HoaDegree) -> Result<(), AdmError> {
        check_degree(order, degree)?;
        self.order = order;
        self.degree = degree;
        Ok(())
    }
}

fn check_degree(order: HoaOrder, degree: HoaDegree) -> Result<(), AdmError> {
    if degree.value().unsigned_abs() <= order.value() {
        return Ok(());
    }
    Err(AdmError::invalid(
        "degree",
        format!("|{}| exceeds order {}", degree.value(), order.value()),
    ))
}

impl_parameters!(HoaBlock {
    normalization: Defaulted(Normalization),
});

impl HasParameter<HoaOrder> for HoaBlock {
    fn get_parameter(&self) -> Result<HoaOrder, AdmError> {
        Ok(self.order)
    }

    fn has_parameter(&self) -> bool {
        true
    }
}

impl HasParameter<HoaDegree> for HoaBlock {
    fn get_parameter(&self) -> Result<HoaDegree, AdmError> {
        Ok(self.degree)
    }

    fn has_parameter(&self) -> bool {
        true
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BinauralBlock;

/// Type-specific part of a block format.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockPayload {
    DirectSpeakers(DirectSpeakersBlock),
    Matrix(MatrixBlock),
    Objects(ObjectsBlock),
    Hoa(HoaBlock),
    Binaural(BinauralBlock),
}

impl BlockPayload {
    pub fn type_descriptor(&self) -> TypeDescriptor {
        match self {
            BlockPayload::DirectSpeakers(_) => TypeDescriptor::DirectSpeakers,
            BlockPayload::Matrix(_) => TypeDescriptor::Matrix,
            BlockPayload::Objects(_) => TypeDescriptor::Objects,
            BlockPayload::Hoa(_) => TypeDescriptor::Hoa,
            BlockPayload::Binaural(_) => TypeDescriptor::Binaural,
        }
    }
}

macro_rules! payload_from {
    ($($block:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$block> for BlockPayload {
                fn from(block: $block) -> Self {
                    BlockPayload::$variant(block)
                }
            }
        )*
    };
}

payload_from! {
    DirectSpeakersBlock => DirectSpeakers,
    MatrixBlock => Matrix,
    ObjectsBlock => Objects,
    HoaBlock => Hoa,
    BinauralBlock => Binaural,
}

/// Mutable view of a payload. The variant itself cannot be changed through it.
#[derive(Debug)]
pub enum BlockPayloadMut<'a> {
    DirectSpeakers(&'a mut DirectSpeakersBlock),
    Matrix(&'a mut MatrixBlock),
    Objects(&'a mut ObjectsBlock),
    Hoa(&'a mut HoaBlock),
    Binaural,
}

/// A timed parameter set of a channel format.
///
/// Block formats are owned by value by their
/// [`AudioChannelFormat`](super::AudioChannelFormat); their id mirrors the
/// channel's id and is assigned when the block is added.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioBlockFormat {
    id: AudioBlockFormatId,
    rtime: Optional<Rtime>,
    duration: Optional<Duration>,
    gain: Defaulted<Gain>,
    importance: Optional<Importance>,
    payload: BlockPayload,
}

impl AudioBlockFormat {
    pub fn new(payload: impl Into<BlockPayload>) -> Self {
        let payload = payload.into();
        Self {
            id: AudioBlockFormatId::undefined(payload.type_descriptor()),
            rtime: Optional::default(),
            duration: Optional::default(),
            gain: Defaulted::default(),
            importance: Optional::default(),
            payload,
        }
    }

    /// A block that keeps a known id, e.g. one read from a file.
    ///
    /// The channel part of the id is replaced by the owning channel's when the
    /// block is added; its counter is kept.
    pub fn with_id(id: AudioBlockFormatId, payload: impl Into<BlockPayload>) -> Result<Self, AdmError> {
        let mut block = Self::new(payload);
        if id.type_descriptor() != block.type_descriptor() {
            return Err(AdmError::TypeMismatch {
                context: format!("audioBlockFormatID {id}"),
                expected: block.type_descriptor().to_string(),
                found: id.type_descriptor().to_string(),
            });
        }
        block.id = id;
        Ok(block)
    }

    pub fn id(&self) -> AudioBlockFormatId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: AudioBlockFormatId) {
        self.id = id;
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.payload.type_descriptor()
    }

    pub fn payload(&self) -> &BlockPayload {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> BlockPayloadMut<'_> {
        match &mut self.payload {
            BlockPayload::DirectSpeakers(block) => BlockPayloadMut::DirectSpeakers(block),
            BlockPayload::Matrix(block) => BlockPayloadMut::Matrix(block),
            BlockPayload::Objects(block) => BlockPayloadMut::Objects(block),
            BlockPayload::Hoa(block) => BlockPayloadMut::Hoa(block),
            BlockPayload::Binaural(_) => BlockPayloadMut::Binaural,
        }
    }
}

impl_parameters!(AudioBlockFormat {
    rtime: Optional(Rtime),
    duration: Optional(Duration),
    gain: Defaulted(Gain),
    importance: Optional(Importance),
});
