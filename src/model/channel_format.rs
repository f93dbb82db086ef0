use super::block_format::AudioBlockFormat;
use super::ids::{AudioBlockFormatId, AudioChannelFormatId};
use super::params::{impl_parameters, Required};
use super::types::TypeDescriptor;
use super::values::Name;
use crate::error::AdmError;

/// A single channel of a given type and its ordered block formats.
#[derive(Clone, Debug)]
pub struct AudioChannelFormat {
    id: AudioChannelFormatId,
    name: Required<Name>,
    blocks: Vec<AudioBlockFormat>,
}

impl AudioChannelFormat {
    pub fn new(name: impl Into<Name>, type_descriptor: TypeDescriptor) -> Self {
        Self::with_id(AudioChannelFormatId::undefined(type_descriptor), name)
    }

    pub fn with_id(id: AudioChannelFormatId, name: impl Into<Name>) -> Self {
        Self {
            id,
            name: Required::new(name.into()),
            blocks: Vec::new(),
        }
    }

    pub fn id(&self) -> AudioChannelFormatId {
        self.id
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        self.id.type_descriptor()
    }

    pub(crate) fn check_id(&self, id: &AudioChannelFormatId) -> Result<(), AdmError> {
        if id.type_descriptor() == self.type_descriptor() {
            return Ok(());
        }
        Err(AdmError::TypeMismatch {
            context: format!("audioChannelFormatID {id}"),
            expected: self.type_descriptor().to_string(),
            found: id.type_descriptor().to_string(),
        })
    }

    /// Sets the id and renumbers the channel part of every block id.
    pub(crate) fn set_id(&mut self, id: AudioChannelFormatId) {
        self.id = id;
        for block in &mut self.blocks {
            let renumbered = block.id().with_channel(id);
            block.set_id(renumbered);
        }
    }

    pub fn block_formats(&self) -> &[AudioBlockFormat] {
        &self.blocks
    }

    /// Appends a block, returning its assigned id.
    ///
    /// A block whose counter is undefined gets the next counter after the
    /// highest one in the list. A defined counter is kept and must not be in
    /// use in this channel yet ([`AdmError::IdInUse`]). Fails with
    /// [`AdmError::TypeMismatch`] if the block's payload is of another type
    /// than this channel.
    pub fn add_block_format(&mut self, mut block: AudioBlockFormat) -> Result<AudioBlockFormatId, AdmError> {
        if block.type_descriptor() != self.type_descriptor() {
            return Err(AdmError::TypeMismatch {
                context: format!("audioBlockFormat in {}", self.id),
                expected: self.type_descriptor().to_string(),
                found: block.type_descriptor().to_string(),
            });
        }
        let counter = if block.id().is_undefined() {
            let last = self.blocks.iter().map(|b| b.id().counter()).max().unwrap_or(0);
            last.checked_add(1)
                .ok_or_else(|| AdmError::invalid("audioBlockFormatID", "block counter exhausted"))?
        } else {
            block.id().counter()
        };
        let id = AudioBlockFormatId::new(self.type_descriptor(), self.id.value(), counter);
        if self.blocks.iter().any(|b| b.id().counter() == counter) {
            return Err(AdmError::IdInUse { id: id.to_string() });
        }
        block.set_id(id);
        self.blocks.push(block);
        Ok(id)
    }

    /// Edits one block in place.
    ///
    /// The block keeps its id, and the edit is rolled back with
    /// [`AdmError::TypeMismatch`] if it swapped in a payload of another type.
    /// Returns `Ok(None)` if `index` is out of range.
    pub fn modify_block_format<R>(
        &mut self,
        index: usize,
        edit: impl FnOnce(&mut AudioBlockFormat) -> R,
    ) -> Result<Option<R>, AdmError> {
        let type_descriptor = self.type_descriptor();
        let Some(block) = self.blocks.get_mut(index) else {
            return Ok(None);
        };
        let saved = block.clone();
        let result = edit(block);
        if block.type_descriptor() != type_descriptor {
            let found = block.type_descriptor();
            *block = saved;
            return Err(AdmError::TypeMismatch {
                context: format!("audioBlockFormat {}", block.id()),
                expected: type_descriptor.to_string(),
                found: found.to_string(),
            });
        }
        block.set_id(saved.id());
        Ok(Some(result))
    }

    pub fn remove_block_format(&mut self, index: usize) -> Option<AudioBlockFormat> {
        (index < self.blocks.len()).then(|| self.blocks.remove(index))
    }

    pub fn clear_block_formats(&mut self) {
        self.blocks.clear();
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [AudioBlockFormat] {
        &mut self.blocks
    }
}

impl_parameters!(AudioChannelFormat {
    name: Required(Name),
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BinauralBlock, ObjectsBlock, Parameters, Rtime, SphericalPosition, Time};

    fn objects_block() -> AudioBlockFormat {
        AudioBlockFormat::new(ObjectsBlock::new(SphericalPosition::new(0.0, 0.0, 1.0).unwrap()))
    }

    #[test]
    fn test_block_counters_are_assigned_in_order() {
        let mut channel = AudioChannelFormat::with_id(
            AudioChannelFormatId::new(TypeDescriptor::Objects, 0x1001),
            "Obj",
        );
        let first = channel.add_block_format(objects_block()).unwrap();
        let second = channel.add_block_format(objects_block()).unwrap();
        assert_eq!(first.to_string(), "AB_00031001_00000001");
        assert_eq!(second.to_string(), "AB_00031001_00000002");
    }

    #[test]
    fn test_taken_block_counter_is_rejected() {
        let mut channel = AudioChannelFormat::with_id(
            AudioChannelFormatId::new(TypeDescriptor::Objects, 0x1001),
            "Obj",
        );
        channel.add_block_format(objects_block()).unwrap();
        let twin = channel.block_formats()[0].clone();

        let err = channel.add_block_format(twin).unwrap_err();
        assert_eq!(
            err,
            AdmError::IdInUse {
                id: "AB_00031001_00000001".to_string()
            }
        );
        assert_eq!(channel.block_formats().len(), 1);

        let gap = AudioBlockFormat::with_id(
            AudioBlockFormatId::new(TypeDescriptor::Objects, 0, 7),
            ObjectsBlock::new(SphericalPosition::new(0.0, 0.0, 1.0).unwrap()),
        )
        .unwrap();
        assert_eq!(
            channel.add_block_format(gap).unwrap().to_string(),
            "AB_00031001_00000007"
        );
        assert_eq!(
            channel.add_block_format(objects_block()).unwrap().to_string(),
            "AB_00031001_00000008"
        );
    }

    #[test]
    fn test_block_of_other_type_is_rejected() {
        let mut channel = AudioChannelFormat::new("Obj", TypeDescriptor::Objects);
        let err = channel
            .add_block_format(AudioBlockFormat::new(BinauralBlock))
            .unwrap_err();
        assert!(matches!(err, AdmError::TypeMismatch { .. }));
        assert!(channel.block_formats().is_empty());
    }

    #[test]
    fn test_renumbering_follows_channel_id() {
        let mut channel = AudioChannelFormat::new("Obj", TypeDescriptor::Objects);
        channel.add_block_format(objects_block()).unwrap();
        channel.set_id(AudioChannelFormatId::new(TypeDescriptor::Objects, 0x1002));
        assert_eq!(
            channel.block_formats()[0].id().to_string(),
            "AB_00031002_00000001"
        );
    }

    #[test]
    fn test_modify_rolls_back_type_change() {
        let mut channel = AudioChannelFormat::new("Obj", TypeDescriptor::Objects);
        channel.add_block_format(objects_block()).unwrap();

        let edited = channel
            .modify_block_format(0, |block| block.set(Rtime(Time::from_secs(1))))
            .unwrap();
        assert!(edited.is_some());
        assert!(channel.block_formats()[0].has::<Rtime>());

        let err = channel
            .modify_block_format(0, |block| *block = AudioBlockFormat::new(BinauralBlock))
            .unwrap_err();
        assert!(matches!(err, AdmError::TypeMismatch { .. }));
        assert_eq!(
            channel.block_formats()[0].type_descriptor(),
            TypeDescriptor::Objects
        );
        assert_eq!(channel.modify_block_format(3, |_| ()).unwrap(), None);
    }
}
