use super::ids::AudioContentId;
use super::params::{impl_parameters, HasParameter, Optional, Required, SetParameter, UnsetParameter, Vector};
use super::values::{
    DialogueContentKind, DialogueId, Language, LoudnessMetadata, MixedContentKind, Name,
    NonDialogueContentKind,
};
use crate::document::ElementKey;
use crate::error::AdmError;

/// The content kind of an [`AudioContent`]. Exactly one category is held at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentKind {
    NonDialogue(NonDialogueContentKind),
    Dialogue(DialogueContentKind),
    Mixed(MixedContentKind),
}

impl ContentKind {
    pub fn dialogue_id(self) -> DialogueId {
        match self {
            ContentKind::NonDialogue(_) => DialogueId::NonDialogue,
            ContentKind::Dialogue(_) => DialogueId::Dialogue,
            ContentKind::Mixed(_) => DialogueId::Mixed,
        }
    }

    fn undefined(dialogue: DialogueId) -> Self {
        match dialogue {
            DialogueId::NonDialogue => ContentKind::NonDialogue(NonDialogueContentKind::Undefined),
            DialogueId::Dialogue => ContentKind::Dialogue(DialogueContentKind::Undefined),
            DialogueId::Mixed => ContentKind::Mixed(MixedContentKind::Undefined),
        }
    }
}

/// A piece of content, e.g. the dialogue or music of a programme.
#[derive(Clone, Debug)]
pub struct AudioContent {
    id: AudioContentId,
    name: Required<Name>,
    language: Optional<Language>,
    kind: Option<ContentKind>,
    loudness: Vector<LoudnessMetadata>,
    pub(crate) objects: Vec<ElementKey>,
}

impl AudioContent {
    pub fn new(name: impl Into<Name>) -> Self {
        Self::with_id(AudioContentId::UNDEFINED, name)
    }

    pub fn with_id(id: AudioContentId, name: impl Into<Name>) -> Self {
        Self {
            id,
            name: Required::new(name.into()),
            language: Optional::default(),
            kind: None,
            loudness: Vector::default(),
            objects: Vec::new(),
        }
    }

    pub fn id(&self) -> AudioContentId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: AudioContentId) {
        self.id = id;
    }

    pub fn kind(&self) -> Option<ContentKind> {
        self.kind
    }
}

impl_parameters!(AudioContent {
    name: Required(Name),
    language: Optional(Language),
    loudness: Vector(LoudnessMetadata),
});

impl HasParameter<DialogueId> for AudioContent {
    fn get_parameter(&self) -> Result<DialogueId, AdmError> {
        self.kind
            .map(ContentKind::dialogue_id)
            .ok_or(AdmError::NotSet {
                parameter: "dialogue",
            })
    }

    fn has_parameter(&self) -> bool {
        self.kind.is_some()
    }
}

impl SetParameter<DialogueId> for AudioContent {
    /// Keeps the current kind if it already belongs to `value`'s category.
    fn set_parameter(&mut self, value: DialogueId) {
        if self.kind.map(ContentKind::dialogue_id) != Some(value) {
            self.kind = Some(ContentKind::undefined(value));
        }
    }
}

impl UnsetParameter<DialogueId> for AudioContent {
    fn unset_parameter(&mut self) {
        self.kind = None;
    }
}

macro_rules! content_kind {
    ($kind:ty, $variant:ident) => {
        impl HasParameter<$kind> for AudioContent {
            fn get_parameter(&self) -> Result<$kind, AdmError> {
                match self.kind {
                    Some(ContentKind::$variant(kind)) => Ok(kind),
                    _ => Err(AdmError::NotSet {
                        parameter: <$kind as $crate::model::params::Parameter>::NAME,
                    }),
                }
            }

            fn has_parameter(&self) -> bool {
                matches!(self.kind, Some(ContentKind::$variant(_)))
            }
        }

        impl SetParameter<$kind> for AudioContent {
            fn set_parameter(&mut self, value: $kind) {
                self.kind = Some(ContentKind::$variant(value));
            }
        }

        impl UnsetParameter<$kind> for AudioContent {
            fn unset_parameter(&mut self) {
                if matches!(self.kind, Some(ContentKind::$variant(_))) {
                    self.kind = None;
                }
            }
        }
    };
}

content_kind!(NonDialogueContentKind, NonDialogue);
content_kind!(DialogueContentKind, Dialogue);
content_kind!(MixedContentKind, Mixed);
