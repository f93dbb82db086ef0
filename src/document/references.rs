//! References between elements.
//!
//! [`HasReference<T>`] is implemented once per (source, target) pair the
//! model allows. It knows where the source keeps its keys and whether the pair
//! needs extra checks or a mirrored update:
//!
//! - `audioPackFormat -> audioPackFormat` runs the cycle guard and requires
//!   both pack formats to be of the same type.
//! - `audioStreamFormat <-> audioTrackFormat` is kept in sync on both sides.
//!   The stream-to-channel and stream-to-pack links are mirrored by the
//!   derived query [`Document::referencing`].

use std::collections::HashSet;
use std::fmt;

use super::element::{Element, ElementKey, ElementRef};
use super::{Document, Handle};
use crate::error::AdmError;
use crate::model::{
    AudioChannelFormat, AudioContent, AudioObject, AudioPackFormat, AudioProgramme,
    AudioStreamFormat, AudioTrackFormat, AudioTrackUid, ElementKind,
};

/// How a reference change is propagated to the opposite side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReferenceSync {
    /// Mutual pairs are updated on both sides.
    #[default]
    Mutual,
    /// Only the source side is updated. Not supported for mutual pairs.
    SourceOnly,
}

impl fmt::Display for ReferenceSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceSync::Mutual => f.write_str("mutual"),
            ReferenceSync::SourceOnly => f.write_str("source-only"),
        }
    }
}

/// An element type that can reference elements of type `T`.
pub trait HasReference<T: Element>: Element {
    /// True if the source holds a list; false for a single slot, where adding
    /// a reference replaces the current one.
    const MULTIPLE: bool;

    #[doc(hidden)]
    const MUTUAL: bool = false;

    #[doc(hidden)]
    fn reference_keys(&self) -> &[ElementKey];

    #[doc(hidden)]
    fn insert_reference(&mut self, key: ElementKey);

    #[doc(hidden)]
    fn remove_reference_key(&mut self, key: ElementKey) -> bool;

    #[doc(hidden)]
    fn check_reference(
        _doc: &Document,
        _source: ElementKey,
        _target: ElementKey,
    ) -> Result<(), AdmError> {
        Ok(())
    }

    #[doc(hidden)]
    fn connect(doc: &mut Document, source: ElementKey, target: ElementKey) {
        if let Some(element) = Self::store_mut(doc).element_mut(source) {
            <Self as HasReference<T>>::insert_reference(element, target);
        }
    }

    #[doc(hidden)]
    fn disconnect(doc: &mut Document, source: ElementKey, target: ElementKey) -> bool {
        Self::store_mut(doc)
            .element_mut(source)
            .is_some_and(|element| <Self as HasReference<T>>::remove_reference_key(element, target))
    }
}

macro_rules! reference_list {
    ($source:ty => $target:ty, $field:ident $(, { $($extra:tt)* })?) => {
        impl HasReference<$target> for $source {
            const MULTIPLE: bool = true;

            fn reference_keys(&self) -> &[ElementKey] {
                &self.$field
            }

            fn insert_reference(&mut self, key: ElementKey) {
                if !self.$field.contains(&key) {
                    self.$field.push(key);
                }
            }

            fn remove_reference_key(&mut self, key: ElementKey) -> bool {
                let before = self.$field.len();
                self.$field.retain(|&k| k != key);
                self.$field.len() != before
            }

            $($($extra)*)?
        }
    };
}

macro_rules! reference_slot {
    ($source:ty => $target:ty, $field:ident $(, { $($extra:tt)* })?) => {
        impl HasReference<$target> for $source {
            const MULTIPLE: bool = false;

            fn reference_keys(&self) -> &[ElementKey] {
                self.$field.as_slice()
            }

            fn insert_reference(&mut self, key: ElementKey) {
                self.$field = Some(key);
            }

            fn remove_reference_key(&mut self, key: ElementKey) -> bool {
                if self.$field == Some(key) {
                    self.$field = None;
                    return true;
                }
                false
            }

            $($($extra)*)?
        }
    };
}

reference_list!(AudioProgramme => AudioContent, contents);
reference_list!(AudioContent => AudioObject, objects);
reference_list!(AudioObject => AudioObject, objects);
reference_list!(AudioObject => AudioPackFormat, pack_formats);
reference_list!(AudioObject => AudioTrackUid, track_uids);
reference_list!(AudioPackFormat => AudioChannelFormat, channel_formats);
reference_list!(AudioPackFormat => AudioPackFormat, pack_formats, {
    fn check_reference(doc: &Document, source: ElementKey, target: ElementKey) -> Result<(), AdmError> {
        check_pack_reference(doc, source, target)
    }
});
reference_slot!(AudioStreamFormat => AudioChannelFormat, channel_format);
reference_slot!(AudioStreamFormat => AudioPackFormat, pack_format);
reference_list!(AudioStreamFormat => AudioTrackFormat, track_formats, {
    const MUTUAL: bool = true;

    fn connect(doc: &mut Document, source: ElementKey, target: ElementKey) {
        link_stream_track(doc, source, target);
    }

    fn disconnect(doc: &mut Document, source: ElementKey, target: ElementKey) -> bool {
        unlink_stream_track(doc, source, target)
    }
});
reference_slot!(AudioTrackFormat => AudioStreamFormat, stream_format, {
    const MUTUAL: bool = true;

    fn connect(doc: &mut Document, source: ElementKey, target: ElementKey) {
        link_stream_track(doc, target, source);
    }

    fn disconnect(doc: &mut Document, source: ElementKey, target: ElementKey) -> bool {
        unlink_stream_track(doc, target, source)
    }
});
reference_slot!(AudioTrackUid => AudioTrackFormat, track_format);
reference_slot!(AudioTrackUid => AudioChannelFormat, channel_format);
reference_slot!(AudioTrackUid => AudioPackFormat, pack_format);

/// Rejects pack references across types and any reference that would close
/// a cycle, walking the target's nested pack formats.
fn check_pack_reference(doc: &Document, source: ElementKey, target: ElementKey) -> Result<(), AdmError> {
    let packs = &doc.pack_formats;
    let stale = || AdmError::StaleHandle {
        kind: ElementKind::PackFormat,
    };
    let source_pack = packs.element(source).ok_or_else(stale)?;
    let target_pack = packs.element(target).ok_or_else(stale)?;

    if source_pack.type_descriptor() != target_pack.type_descriptor() {
        return Err(AdmError::TypeMismatch {
            context: format!("reference from {} to {}", source_pack.id(), target_pack.id()),
            expected: source_pack.type_descriptor().to_string(),
            found: target_pack.type_descriptor().to_string(),
        });
    }

    let cycle = || AdmError::ReferenceCycle {
        from: source_pack.id().to_string(),
        to: target_pack.id().to_string(),
    };
    if source == target {
        return Err(cycle());
    }

    let mut visited = HashSet::from([target]);
    let mut worklist = vec![target];
    while let Some(key) = worklist.pop() {
        let Some(pack) = packs.element(key) else {
            continue;
        };
        for &nested in &pack.pack_formats {
            if nested == source {
                return Err(cycle());
            }
            if visited.insert(nested) {
                worklist.push(nested);
            }
        }
    }
    Ok(())
}

/// Points `track` at `stream` on both sides, leaving its previous stream.
fn link_stream_track(doc: &mut Document, stream: ElementKey, track: ElementKey) {
    let previous = doc
        .track_formats
        .element(track)
        .and_then(|track_format| track_format.stream_format);
    if let Some(old) = previous.filter(|&old| old != stream) {
        if let Some(old_stream) = doc.stream_formats.element_mut(old) {
            old_stream.track_formats.retain(|&k| k != track);
        }
    }
    if let Some(track_format) = doc.track_formats.element_mut(track) {
        track_format.stream_format = Some(stream);
    }
    if let Some(stream_format) = doc.stream_formats.element_mut(stream) {
        if !stream_format.track_formats.contains(&track) {
            stream_format.track_formats.push(track);
        }
    }
}

/// Breaks the stream/track link, track side first.
fn unlink_stream_track(doc: &mut Document, stream: ElementKey, track: ElementKey) -> bool {
    let mut changed = false;
    if let Some(track_format) = doc.track_formats.element_mut(track) {
        if track_format.stream_format == Some(stream) {
            track_format.stream_format = None;
            changed = true;
        }
    }
    if let Some(stream_format) = doc.stream_formats.element_mut(stream) {
        let before = stream_format.track_formats.len();
        stream_format.track_formats.retain(|&k| k != track);
        changed |= stream_format.track_formats.len() != before;
    }
    changed
}

impl Document {
    /// Adds a reference from `source` to `target` with mutual sync.
    ///
    /// Returns `Ok(false)` if the reference already exists. If exactly one of
    /// the two elements is attached, the other one (and the detached elements
    /// it references) is attached as well.
    ///
    /// # Errors
    ///
    /// - [`AdmError::CrossDocumentReference`] if a handle belongs to another document.
    /// - [`AdmError::StaleHandle`] if an element was removed.
    /// - [`AdmError::ReferenceCycle`] / [`AdmError::TypeMismatch`] for pack formats.
    /// - [`AdmError::IdInUse`] if adoption would duplicate an id.
    pub fn add_reference<S, T>(&mut self, source: Handle<S>, target: Handle<T>) -> Result<bool, AdmError>
    where
        S: HasReference<T>,
        T: Element,
    {
        self.add_reference_with(source, target, ReferenceSync::Mutual)
    }

    /// Like [`add_reference`](Self::add_reference) with an explicit sync mode.
    pub fn add_reference_with<S, T>(
        &mut self,
        source: Handle<S>,
        target: Handle<T>,
        sync: ReferenceSync,
    ) -> Result<bool, AdmError>
    where
        S: HasReference<T>,
        T: Element,
    {
        let source_node = self.node(source)?;
        self.node(target)?;
        if sync == ReferenceSync::SourceOnly && <S as HasReference<T>>::MUTUAL {
            return Err(AdmError::UnsupportedSyncMode {
                mode: format!("{sync} for {} -> {}", S::KIND, T::KIND),
            });
        }
        if <S as HasReference<T>>::reference_keys(&source_node.element).contains(&target.key) {
            return Ok(false);
        }
        self.prepare_link(source, target)?;
        <S as HasReference<T>>::connect(self, source.key, target.key);
        tracing::debug!(source = %S::KIND, target = %T::KIND, "Added reference");
        Ok(true)
    }

    /// Makes `target` the only reference of type `T` held by `source`.
    pub fn set_reference<S, T>(&mut self, source: Handle<S>, target: Handle<T>) -> Result<(), AdmError>
    where
        S: HasReference<T>,
        T: Element,
    {
        let existing = <S as HasReference<T>>::reference_keys(&self.node(source)?.element).to_vec();
        self.node(target)?;
        let present = existing.contains(&target.key);
        if !present {
            self.prepare_link(source, target)?;
        }
        for key in existing.into_iter().filter(|&key| key != target.key) {
            <S as HasReference<T>>::disconnect(self, source.key, key);
        }
        if !present {
            <S as HasReference<T>>::connect(self, source.key, target.key);
        }
        tracing::debug!(source = %S::KIND, target = %T::KIND, "Set reference");
        Ok(())
    }

    /// Checks and adoption shared by every linking call. Mutates nothing
    /// unless it succeeds.
    fn prepare_link<S, T>(&mut self, source: Handle<S>, target: Handle<T>) -> Result<(), AdmError>
    where
        S: HasReference<T>,
        T: Element,
    {
        <S as HasReference<T>>::check_reference(self, source.key, target.key)?;
        match (self.is_attached(source), self.is_attached(target)) {
            (true, false) => {
                self.adopt(target.element_ref())?;
            }
            (false, true) => {
                self.adopt(source.element_ref())?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Removes the reference from `source` to `target`, on both sides for
    /// mutual pairs. Returns `Ok(false)` if there was none.
    pub fn remove_reference<S, T>(&mut self, source: Handle<S>, target: Handle<T>) -> Result<bool, AdmError>
    where
        S: HasReference<T>,
        T: Element,
    {
        self.node(source)?;
        self.check_owner(target.document)?;
        let removed = <S as HasReference<T>>::disconnect(self, source.key, target.key);
        if removed {
            tracing::debug!(source = %S::KIND, target = %T::KIND, "Removed reference");
        }
        Ok(removed)
    }

    /// Removes every reference of type `T` held by `source`.
    pub fn remove_references<T, S>(&mut self, source: Handle<S>) -> Result<usize, AdmError>
    where
        S: HasReference<T>,
        T: Element,
    {
        let keys = <S as HasReference<T>>::reference_keys(&self.node(source)?.element).to_vec();
        let removed = keys
            .into_iter()
            .filter(|&key| <S as HasReference<T>>::disconnect(self, source.key, key))
            .count();
        Ok(removed)
    }

    /// Removes every outgoing reference of an element.
    pub fn disconnect_references<S: Element>(&mut self, source: Handle<S>) -> Result<(), AdmError> {
        let outgoing = self.node(source)?.element.outgoing();
        let from = source.element_ref();
        for target in outgoing {
            self.unlink(from, target);
        }
        tracing::debug!(kind = %S::KIND, "Disconnected references");
        Ok(())
    }

    /// Dynamic counterpart of [`HasReference::disconnect`].
    fn unlink(&mut self, source: ElementRef, target: ElementRef) -> bool {
        use ElementKind::*;

        let (s, t) = (source.key, target.key);
        match (source.kind, target.kind) {
            (Programme, Content) => <AudioProgramme as HasReference<AudioContent>>::disconnect(self, s, t),
            (Content, Object) => <AudioContent as HasReference<AudioObject>>::disconnect(self, s, t),
            (Object, Object) => <AudioObject as HasReference<AudioObject>>::disconnect(self, s, t),
            (Object, PackFormat) => <AudioObject as HasReference<AudioPackFormat>>::disconnect(self, s, t),
            (Object, TrackUid) => <AudioObject as HasReference<AudioTrackUid>>::disconnect(self, s, t),
            (PackFormat, ChannelFormat) => {
                <AudioPackFormat as HasReference<AudioChannelFormat>>::disconnect(self, s, t)
            }
            (PackFormat, PackFormat) => <AudioPackFormat as HasReference<AudioPackFormat>>::disconnect(self, s, t),
            (StreamFormat, ChannelFormat) => {
                <AudioStreamFormat as HasReference<AudioChannelFormat>>::disconnect(self, s, t)
            }
            (StreamFormat, PackFormat) => {
                <AudioStreamFormat as HasReference<AudioPackFormat>>::disconnect(self, s, t)
            }
            (StreamFormat, TrackFormat) => {
                <AudioStreamFormat as HasReference<AudioTrackFormat>>::disconnect(self, s, t)
            }
            (TrackFormat, StreamFormat) => {
                <AudioTrackFormat as HasReference<AudioStreamFormat>>::disconnect(self, s, t)
            }
            (TrackUid, TrackFormat) => <AudioTrackUid as HasReference<AudioTrackFormat>>::disconnect(self, s, t),
            (TrackUid, ChannelFormat) => {
                <AudioTrackUid as HasReference<AudioChannelFormat>>::disconnect(self, s, t)
            }
            (TrackUid, PackFormat) => <AudioTrackUid as HasReference<AudioPackFormat>>::disconnect(self, s, t),
            _ => false,
        }
    }

    /// The references of type `T` held by `source`, in insertion order.
    ///
    /// Empty if the handle does not resolve.
    pub fn references<T, S>(&self, source: Handle<S>) -> Vec<Handle<T>>
    where
        S: HasReference<T>,
        T: Element,
    {
        self.node(source)
            .map(|node| {
                <S as HasReference<T>>::reference_keys(&node.element)
                    .iter()
                    .map(|&key| self.handle(key))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The single (or first) reference of type `T` held by `source`.
    pub fn reference<T, S>(&self, source: Handle<S>) -> Option<Handle<T>>
    where
        S: HasReference<T>,
        T: Element,
    {
        let node = self.node(source).ok()?;
        let key = <S as HasReference<T>>::reference_keys(&node.element).first()?;
        Some(self.handle(*key))
    }

    /// Elements of type `S` that reference `target`: attached ones in document
    /// order, then detached ones.
    ///
    /// For stream formats this is the reverse side of the stream-to-channel
    /// and stream-to-pack links.
    pub fn referencing<S, T>(&self, target: Handle<T>) -> Vec<Handle<S>>
    where
        S: HasReference<T>,
        T: Element,
    {
        if self.node(target).is_err() {
            return Vec::new();
        }
        let store = S::store(self);
        store
            .order()
            .iter()
            .copied()
            .chain(store.detached_keys())
            .filter(|&key| {
                store.element(key).is_some_and(|element| {
                    <S as HasReference<T>>::reference_keys(element).contains(&target.key)
                })
            })
            .map(|key| self.handle(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeDescriptor;

    #[test]
    fn test_single_slot_replaces() {
        let mut doc = Document::new();
        let uid = doc.add(AudioTrackUid::new()).unwrap();
        let first = doc
            .add(AudioChannelFormat::new("a", TypeDescriptor::Objects))
            .unwrap();
        let second = doc
            .add(AudioChannelFormat::new("b", TypeDescriptor::Objects))
            .unwrap();
        assert!(doc.add_reference(uid, first).unwrap());
        assert!(doc.add_reference(uid, second).unwrap());
        assert_eq!(doc.reference::<AudioChannelFormat, _>(uid), Some(second));
        assert!(!<AudioTrackUid as HasReference<AudioChannelFormat>>::MULTIPLE);
    }

    #[test]
    fn test_source_only_on_mutual_pair_is_rejected() {
        let mut doc = Document::new();
        let stream = doc
            .add(AudioStreamFormat::new("s", TypeDescriptor::Objects))
            .unwrap();
        let track = doc
            .add(AudioTrackFormat::new("t", TypeDescriptor::Objects))
            .unwrap();
        let err = doc
            .add_reference_with(stream, track, ReferenceSync::SourceOnly)
            .unwrap_err();
        assert!(matches!(err, AdmError::UnsupportedSyncMode { .. }));
        assert!(doc.references::<AudioTrackFormat, _>(stream).is_empty());

        let pack = doc
            .add(AudioPackFormat::new("p", TypeDescriptor::Objects))
            .unwrap();
        assert!(doc
            .add_reference_with(stream, pack, ReferenceSync::SourceOnly)
            .unwrap());
    }

    #[test]
    fn test_unlink_dispatches_every_pair() {
        let mut doc = Document::new();
        let object = doc.add(AudioObject::new("o")).unwrap();
        let pack = doc
            .add(AudioPackFormat::new("p", TypeDescriptor::Objects))
            .unwrap();
        let uid = doc.add(AudioTrackUid::new()).unwrap();
        doc.add_reference(object, pack).unwrap();
        doc.add_reference(object, uid).unwrap();
        doc.add_reference(uid, pack).unwrap();

        doc.disconnect_references(object).unwrap();
        assert!(doc.references::<AudioPackFormat, _>(object).is_empty());
        assert!(doc.references::<AudioTrackUid, _>(object).is_empty());
        assert_eq!(doc.reference::<AudioPackFormat, _>(uid), Some(pack));
    }
}
