//! The [`Element`] and [`ElementId`] traits tying element types to their arena.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use super::store::Store;
use super::Document;
use crate::error::AdmError;
use crate::model::{
    AudioChannelFormat, AudioChannelFormatId, AudioContent, AudioContentId, AudioObject,
    AudioObjectId, AudioPackFormat, AudioPackFormatId, AudioProgramme, AudioProgrammeId,
    AudioStreamFormat, AudioStreamFormatId, AudioTrackFormat, AudioTrackFormatId, AudioTrackUid,
    AudioTrackUidId, ElementKind,
};

slotmap::new_key_type! {
    /// Generational key of an element inside a document's arena.
    pub struct ElementKey;
}

mod private {
    pub trait Sealed {}
}

/// A kind-tagged arena key, used where references are walked without
/// knowing the target type statically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub(crate) kind: ElementKind,
    pub(crate) key: ElementKey,
}

impl ElementRef {
    pub(crate) fn new(kind: ElementKind, key: ElementKey) -> Self {
        Self { kind, key }
    }
}

/// Old key to new key, per kind, built by a deep copy.
#[derive(Debug, Default)]
pub struct KeyMap {
    keys: HashMap<ElementRef, ElementKey>,
}

impl KeyMap {
    pub(crate) fn insert(&mut self, kind: ElementKind, old: ElementKey, new: ElementKey) {
        self.keys.insert(ElementRef::new(kind, old), new);
    }

    pub(crate) fn get(&self, kind: ElementKind, old: ElementKey) -> Option<ElementKey> {
        self.keys.get(&ElementRef::new(kind, old)).copied()
    }
}

/// An id type of a document-level element.
pub trait ElementId: Copy + Eq + Hash + fmt::Display + fmt::Debug + 'static {
    type Element: Element<Id = Self>;

    #[doc(hidden)]
    const FIRST_VALUE: u32;
    #[doc(hidden)]
    const LAST_VALUE: u32;

    fn is_undefined(&self) -> bool;

    /// Same type tag, numeric part replaced.
    #[doc(hidden)]
    fn with_value(&self, value: u32) -> Self;

    #[doc(hidden)]
    fn raw_value(&self) -> u32;
}

/// A document-level element type.
///
/// Sealed: implemented by the eight element types of [`crate::model`].
pub trait Element: Clone + fmt::Debug + private::Sealed + 'static {
    type Id: ElementId<Element = Self>;

    const KIND: ElementKind;

    fn id(&self) -> Self::Id;

    /// A detached clone: same parameters, no references.
    fn copy(&self) -> Self {
        let mut copy = self.clone();
        copy.clear_references();
        copy
    }

    #[doc(hidden)]
    fn check_id(&self, _id: &Self::Id) -> Result<(), AdmError> {
        Ok(())
    }

    #[doc(hidden)]
    fn set_id_unchecked(&mut self, id: Self::Id);

    #[doc(hidden)]
    fn store(doc: &Document) -> &Store<Self>;

    #[doc(hidden)]
    fn store_mut(doc: &mut Document) -> &mut Store<Self>;

    #[doc(hidden)]
    fn outgoing(&self) -> Vec<ElementRef>;

    #[doc(hidden)]
    fn remap(&mut self, map: &KeyMap);

    #[doc(hidden)]
    fn clear_references(&mut self);

    /// Drops every reference to `target`.
    #[doc(hidden)]
    fn strip(&mut self, target: ElementRef);
}

macro_rules! numeric_element_id {
    ($id:ident => $element:ident, $int:ty, $first:expr) => {
        impl ElementId for $id {
            type Element = $element;
            const FIRST_VALUE: u32 = $first;
            const LAST_VALUE: u32 = <$int>::MAX as u32;

            fn is_undefined(&self) -> bool {
                <$id>::is_undefined(self)
            }

            fn with_value(&self, value: u32) -> Self {
                <$id>::new(value as $int)
            }

            fn raw_value(&self) -> u32 {
                self.value() as u32
            }
        }
    };
}

numeric_element_id!(AudioProgrammeId => AudioProgramme, u16, 0x1001);
numeric_element_id!(AudioContentId => AudioContent, u16, 0x1001);
numeric_element_id!(AudioObjectId => AudioObject, u16, 0x1001);
numeric_element_id!(AudioTrackUidId => AudioTrackUid, u32, 1);

macro_rules! typed_element_id {
    ($id:ident => $element:ident) => {
        impl ElementId for $id {
            type Element = $element;
            const FIRST_VALUE: u32 = 0x1001;
            const LAST_VALUE: u32 = u16::MAX as u32;

            fn is_undefined(&self) -> bool {
                <$id>::is_undefined(self)
            }

            fn with_value(&self, value: u32) -> Self {
                <$id>::new(self.type_descriptor(), value as u16)
            }

            fn raw_value(&self) -> u32 {
                self.value() as u32
            }
        }
    };
}

typed_element_id!(AudioPackFormatId => AudioPackFormat);
typed_element_id!(AudioChannelFormatId => AudioChannelFormat);
typed_element_id!(AudioStreamFormatId => AudioStreamFormat);

impl ElementId for AudioTrackFormatId {
    type Element = AudioTrackFormat;
    const FIRST_VALUE: u32 = 0x1001;
    const LAST_VALUE: u32 = u16::MAX as u32;

    fn is_undefined(&self) -> bool {
        AudioTrackFormatId::is_undefined(self)
    }

    fn with_value(&self, value: u32) -> Self {
        AudioTrackFormatId::new(self.type_descriptor(), value as u16, 1)
    }

    fn raw_value(&self) -> u32 {
        self.value() as u32
    }
}

macro_rules! element {
    (
        $element:ident, $id:ident, $kind:ident, $store:ident
        $(, check_id = $check:path)?,
        lists { $($list:ident => $list_kind:ident),* $(,)? },
        slots { $($slot:ident => $slot_kind:ident),* $(,)? } $(,)?
    ) => {
        impl private::Sealed for $element {}

        impl Element for $element {
            type Id = $id;
            const KIND: ElementKind = ElementKind::$kind;

            fn id(&self) -> $id {
                <$element>::id(self)
            }

            $(
                fn check_id(&self, id: &$id) -> Result<(), AdmError> {
                    $check(self, id)
                }
            )?

            fn set_id_unchecked(&mut self, id: $id) {
                <$element>::set_id(self, id)
            }

            fn store(doc: &Document) -> &Store<Self> {
                &doc.$store
            }

            fn store_mut(doc: &mut Document) -> &mut Store<Self> {
                &mut doc.$store
            }

            #[allow(unused_mut)]
            fn outgoing(&self) -> Vec<ElementRef> {
                let mut refs: Vec<ElementRef> = Vec::new();
                $(
                    refs.extend(
                        self.$list
                            .iter()
                            .map(|&key| ElementRef::new(ElementKind::$list_kind, key)),
                    );
                )*
                $(
                    refs.extend(self.$slot.map(|key| ElementRef::new(ElementKind::$slot_kind, key)));
                )*
                refs
            }

            #[allow(unused_variables)]
            fn remap(&mut self, map: &KeyMap) {
                $(
                    self.$list = self
                        .$list
                        .iter()
                        .filter_map(|&key| map.get(ElementKind::$list_kind, key))
                        .collect();
                )*
                $(
                    self.$slot = self.$slot.and_then(|key| map.get(ElementKind::$slot_kind, key));
                )*
            }

            fn clear_references(&mut self) {
                $( self.$list.clear(); )*
                $( self.$slot = None; )*
            }

            #[allow(unused_variables)]
            fn strip(&mut self, target: ElementRef) {
                $(
                    if target.kind == ElementKind::$list_kind {
                        self.$list.retain(|&key| key != target.key);
                    }
                )*
                $(
                    if target.kind == ElementKind::$slot_kind && self.$slot == Some(target.key) {
                        self.$slot = None;
                    }
                )*
            }
        }
    };
}

element!(
    AudioProgramme, AudioProgrammeId, Programme, programmes,
    lists { contents => Content },
    slots {},
);
element!(
    AudioContent, AudioContentId, Content, contents,
    lists { objects => Object },
    slots {},
);
element!(
    AudioObject, AudioObjectId, Object, objects,
    lists { objects => Object, pack_formats => PackFormat, track_uids => TrackUid },
    slots {},
);
element!(
    AudioPackFormat, AudioPackFormatId, PackFormat, pack_formats,
    check_id = AudioPackFormat::check_id,
    lists { channel_formats => ChannelFormat, pack_formats => PackFormat },
    slots {},
);
element!(
    AudioChannelFormat, AudioChannelFormatId, ChannelFormat, channel_formats,
    check_id = AudioChannelFormat::check_id,
    lists {},
    slots {},
);
element!(
    AudioStreamFormat, AudioStreamFormatId, StreamFormat, stream_formats,
    lists { track_formats => TrackFormat },
    slots { channel_format => ChannelFormat, pack_format => PackFormat },
);
element!(
    AudioTrackFormat, AudioTrackFormatId, TrackFormat, track_formats,
    lists {},
    slots { stream_format => StreamFormat },
);
element!(
    AudioTrackUid, AudioTrackUidId, TrackUid, track_uids,
    lists {},
    slots { track_format => TrackFormat, channel_format => ChannelFormat, pack_format => PackFormat },
);

/// Runs `$body` with `$T` aliased to the element type of `$kind`.
macro_rules! for_kind {
    ($kind:expr, $T:ident => $body:expr) => {
        match $kind {
            $crate::model::ElementKind::Programme => {
                type $T = $crate::model::AudioProgramme;
                $body
            }
            $crate::model::ElementKind::Content => {
                type $T = $crate::model::AudioContent;
                $body
            }
            $crate::model::ElementKind::Object => {
                type $T = $crate::model::AudioObject;
                $body
            }
            $crate::model::ElementKind::PackFormat => {
                type $T = $crate::model::AudioPackFormat;
                $body
            }
            $crate::model::ElementKind::ChannelFormat => {
                type $T = $crate::model::AudioChannelFormat;
                $body
            }
            $crate::model::ElementKind::StreamFormat => {
                type $T = $crate::model::AudioStreamFormat;
                $body
            }
            $crate::model::ElementKind::TrackFormat => {
                type $T = $crate::model::AudioTrackFormat;
                $body
            }
            $crate::model::ElementKind::TrackUid => {
                type $T = $crate::model::AudioTrackUid;
                $body
            }
        }
    };
}

pub(crate) use for_kind;
