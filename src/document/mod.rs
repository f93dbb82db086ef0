//! The document graph.
//!
//! A [`Document`] owns every element of one ADM file. Each element type lives
//! in its own generational arena, and elements are addressed through typed
//! [`Handle`]s. References between elements are stored as arena keys, so they
//! never keep an element alive and resolve to nothing once it is removed.
//!
//! Elements enter a document in one of two ways:
//!
//! - [`Document::add`] attaches an element directly. Its id is checked for
//!   uniqueness, or a fresh one is assigned if it is undefined.
//! - [`Document::create`] places it in the arena *detached*. It is not
//!   indexed or enumerated, and is adopted automatically as soon as an
//!   attached element references it (or it references one).
//!
//! # Example
//!
//! ```
//! use admgraph::document::Document;
//! use admgraph::model::{AudioContent, AudioProgramme};
//!
//! let mut doc = Document::new();
//! let programme = doc.add(AudioProgramme::new("Main")).unwrap();
//! let content = doc.create(AudioContent::new("Dialogue"));
//! assert!(!doc.is_attached(content));
//!
//! assert!(doc.add_reference(programme, content).unwrap());
//! assert!(doc.is_attached(content));
//!
//! let id = doc.get(content).unwrap().id();
//! assert_eq!(id.to_string(), "ACO_1001");
//! assert_eq!(doc.lookup(&id), Some(content));
//! ```

mod copy;
mod element;
mod references;
mod store;

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

pub use element::{Element, ElementId, ElementKey};
pub use references::{HasReference, ReferenceSync};

pub(crate) use element::{for_kind, ElementRef};
use store::{Node, Store};

use crate::error::AdmError;
use crate::model::{
    AudioBlockFormat, AudioBlockFormatId, AudioChannelFormat, AudioContent, AudioObject,
    AudioPackFormat, AudioProgramme, AudioStreamFormat, AudioTrackFormat, AudioTrackUid,
    ElementKind, Parameter, SetParameter, UnsetParameter, VectorParameter,
};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    fn next() -> Self {
        DocumentId(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A typed reference to an element inside a specific [`Document`].
///
/// Handles are plain copies of a key; they stay valid until the element is
/// removed, after which every operation on them reports
/// [`AdmError::StaleHandle`] (or absence, for queries).
pub struct Handle<T> {
    document: DocumentId,
    key: ElementKey,
    _element: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(document: DocumentId, key: ElementKey) -> Self {
        Self {
            document,
            key,
            _element: PhantomData,
        }
    }

    /// The document that minted this handle.
    pub fn document(&self) -> DocumentId {
        self.document
    }
}

impl<T: Element> Handle<T> {
    pub(crate) fn element_ref(&self) -> ElementRef {
        ElementRef::new(T::KIND, self.key)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document && self.key == other.key
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document.hash(state);
        self.key.hash(state);
    }
}

impl<T: Element> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("kind", &T::KIND)
            .field("document", &self.document.0)
            .field("key", &self.key)
            .finish()
    }
}

/// An in-memory ADM document.
pub struct Document {
    id: DocumentId,
    programmes: Store<AudioProgramme>,
    contents: Store<AudioContent>,
    objects: Store<AudioObject>,
    pack_formats: Store<AudioPackFormat>,
    channel_formats: Store<AudioChannelFormat>,
    stream_formats: Store<AudioStreamFormat>,
    track_formats: Store<AudioTrackFormat>,
    track_uids: Store<AudioTrackUid>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id.0)
            .field("programmes", &self.programmes.order().len())
            .field("contents", &self.contents.order().len())
            .field("objects", &self.objects.order().len())
            .field("pack_formats", &self.pack_formats.order().len())
            .field("channel_formats", &self.channel_formats.order().len())
            .field("stream_formats", &self.stream_formats.order().len())
            .field("track_formats", &self.track_formats.order().len())
            .field("track_uids", &self.track_uids.order().len())
            .finish()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            id: DocumentId::next(),
            programmes: Store::default(),
            contents: Store::default(),
            objects: Store::default(),
            pack_formats: Store::default(),
            channel_formats: Store::default(),
            stream_formats: Store::default(),
            track_formats: Store::default(),
            track_uids: Store::default(),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    fn handle<T: Element>(&self, key: ElementKey) -> Handle<T> {
        Handle::new(self.id, key)
    }

    fn check_owner(&self, document: DocumentId) -> Result<(), AdmError> {
        if document == self.id {
            Ok(())
        } else {
            Err(AdmError::CrossDocumentReference)
        }
    }

    pub(crate) fn node<T: Element>(&self, handle: Handle<T>) -> Result<&Node<T>, AdmError> {
        self.check_owner(handle.document)?;
        T::store(self)
            .node(handle.key)
            .ok_or(AdmError::StaleHandle { kind: T::KIND })
    }

    fn element_mut<T: Element>(&mut self, handle: Handle<T>) -> Result<&mut T, AdmError> {
        self.check_owner(handle.document)?;
        T::store_mut(self)
            .element_mut(handle.key)
            .ok_or(AdmError::StaleHandle { kind: T::KIND })
    }

    /// Places `element` in this document's arena without attaching it.
    ///
    /// The element keeps its id as given, even if that id is taken; ids are
    /// checked when it is adopted.
    pub fn create<T: Element>(&mut self, mut element: T) -> Handle<T> {
        element.clear_references();
        let key = T::store_mut(self).insert_detached(element);
        self.handle(key)
    }

    /// Attaches `element` to the document.
    ///
    /// Fails with [`AdmError::IdInUse`] if its defined id is already taken.
    /// An undefined id is replaced by the next free id of its kind.
    pub fn add<T: Element>(&mut self, element: T) -> Result<Handle<T>, AdmError> {
        let handle = self.create(element);
        if let Err(err) = self.adopt(handle.element_ref()) {
            T::store_mut(self).remove(handle.key);
            return Err(err);
        }
        Ok(handle)
    }

    /// Attaches a detached element and, transitively, the detached elements it
    /// references. Does nothing for an element that is already attached.
    pub fn attach<T: Element>(&mut self, handle: Handle<T>) -> Result<(), AdmError> {
        self.node(handle)?;
        self.adopt(handle.element_ref()).map(drop)
    }

    /// Attaches the detached closure of `root`.
    ///
    /// All ids are validated (and fresh ones reserved) before the first
    /// element is attached, so a failure leaves the document untouched.
    pub(crate) fn adopt(&mut self, root: ElementRef) -> Result<usize, AdmError> {
        let closure = self.detached_closure(root);
        if closure.is_empty() {
            return Ok(0);
        }

        let mut assignments = HashMap::new();
        for kind in ElementKind::ALL {
            for_kind!(kind, T => self.plan_ids::<T>(&closure, &mut assignments))?;
        }

        for &r in &closure {
            let value = assignments.get(&r).copied();
            for_kind!(r.kind, T => self.attach_node::<T>(r.key, value));
        }
        if closure.len() > 1 {
            tracing::debug!(
                root = %root.kind,
                adopted = closure.len(),
                "Adopted detached elements"
            );
        }
        Ok(closure.len())
    }

    fn detached_closure(&self, root: ElementRef) -> Vec<ElementRef> {
        let mut seen = HashSet::new();
        let mut closure = Vec::new();
        let mut queue = VecDeque::from([root]);
        while let Some(r) = queue.pop_front() {
            if !seen.insert(r) {
                continue;
            }
            let node = for_kind!(r.kind, T => T::store(self)
                .node(r.key)
                .map(|node| (node.attached, node.element.outgoing())));
            match node {
                Some((false, outgoing)) => {
                    closure.push(r);
                    queue.extend(outgoing);
                }
                _ => continue,
            }
        }
        closure
    }

    /// Checks the defined ids of the `T` elements in `closure` and plans a
    /// fresh value for each undefined one.
    fn plan_ids<T: Element>(
        &self,
        closure: &[ElementRef],
        assignments: &mut HashMap<ElementRef, u32>,
    ) -> Result<(), AdmError> {
        let store = T::store(self);
        let members: Vec<(ElementRef, T::Id)> = closure
            .iter()
            .filter(|r| r.kind == T::KIND)
            .filter_map(|&r| store.element(r.key).map(|element| (r, element.id())))
            .collect();

        let mut reserved: HashSet<T::Id> = HashSet::new();
        for (_, id) in members.iter().filter(|(_, id)| !id.is_undefined()) {
            if store.is_taken(id) || !reserved.insert(*id) {
                return Err(AdmError::IdInUse { id: id.to_string() });
            }
        }
        for &(r, template) in members.iter().filter(|(_, id)| id.is_undefined()) {
            let id = store
                .next_free_id(template, &reserved)
                .ok_or_else(|| AdmError::invalid("id", format!("no free {} id left", T::KIND)))?;
            reserved.insert(id);
            assignments.insert(r, id.raw_value());
        }
        Ok(())
    }

    fn attach_node<T: Element>(&mut self, key: ElementKey, fresh_value: Option<u32>) {
        let store = T::store_mut(self);
        if let (Some(value), Some(element)) = (fresh_value, store.element_mut(key)) {
            let id = element.id().with_value(value);
            element.set_id_unchecked(id);
        }
        store.attach(key);
        if let Some(element) = store.element(key) {
            tracing::debug!(kind = %T::KIND, id = %element.id(), "Attached element");
        }
    }

    pub fn is_attached<T: Element>(&self, handle: Handle<T>) -> bool {
        handle.document == self.id && T::store(self).is_attached(handle.key)
    }

    /// Returns true if `handle` resolves to a live element, attached or not.
    pub fn contains<T: Element>(&self, handle: Handle<T>) -> bool {
        self.node(handle).is_ok()
    }

    pub fn get<T: Element>(&self, handle: Handle<T>) -> Option<&T> {
        self.node(handle).ok().map(|node| &node.element)
    }

    /// Finds the attached element with `id`. Undefined ids never match.
    pub fn lookup<I: ElementId>(&self, id: &I) -> Option<Handle<I::Element>> {
        if id.is_undefined() {
            return None;
        }
        let key = <I::Element as Element>::store(self).lookup(id)?;
        Some(self.handle(key))
    }

    /// Attached elements of type `T`, in the order they were attached.
    pub fn elements<T: Element>(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        let document = self.id;
        T::store(self)
            .order()
            .iter()
            .map(move |&key| Handle::new(document, key))
    }

    /// Number of attached elements of type `T`.
    pub fn count<T: Element>(&self) -> usize {
        T::store(self).order().len()
    }

    /// Removes an element from the arena and strips every reference to it.
    ///
    /// The element is returned detached, with its own references cleared.
    pub fn remove<T: Element>(&mut self, handle: Handle<T>) -> Result<T, AdmError> {
        self.node(handle)?;
        let target = handle.element_ref();
        for kind in ElementKind::ALL {
            for_kind!(kind, S => S::store_mut(self)
                .elements_mut()
                .for_each(|element| element.strip(target)));
        }
        let mut element = T::store_mut(self)
            .remove(handle.key)
            .ok_or(AdmError::StaleHandle { kind: T::KIND })?;
        element.clear_references();
        tracing::debug!(kind = %T::KIND, id = %element.id(), "Removed element");
        Ok(element)
    }

    /// Changes the id of an element.
    ///
    /// Fails with [`AdmError::IdInUse`] if an attached element already has
    /// `id`, and with [`AdmError::TypeMismatch`] if a pack or channel format id
    /// carries another type tag than the element's type.
    pub fn set_id<T: Element>(&mut self, handle: Handle<T>, id: T::Id) -> Result<(), AdmError> {
        let node = self.node(handle)?;
        node.element.check_id(&id)?;
        let old = node.element.id();
        if old == id {
            return Ok(());
        }
        if node.attached {
            let store = T::store_mut(self);
            if store.is_taken(&id) {
                return Err(AdmError::IdInUse { id: id.to_string() });
            }
            store.reindex(handle.key, old, id);
        }
        self.element_mut(handle)?.set_id_unchecked(id);
        tracing::debug!(kind = %T::KIND, from = %old, to = %id, "Changed element id");
        Ok(())
    }

    /// Sets parameter `P` on an element.
    pub fn set<T, P>(&mut self, handle: Handle<T>, value: P) -> Result<(), AdmError>
    where
        T: Element + SetParameter<P>,
        P: Parameter,
    {
        self.element_mut(handle)?.set_parameter(value);
        Ok(())
    }

    /// Clears an optional parameter or resets a defaulted one.
    pub fn unset<P, T>(&mut self, handle: Handle<T>) -> Result<(), AdmError>
    where
        T: Element + UnsetParameter<P>,
        P: Parameter,
    {
        self.element_mut(handle)?.unset_parameter();
        Ok(())
    }

    /// Adds a value to a vector parameter; `Ok(false)` if it was already present.
    pub fn add_value<T, P>(&mut self, handle: Handle<T>, value: P) -> Result<bool, AdmError>
    where
        T: Element + VectorParameter<P>,
        P: Parameter,
    {
        Ok(self.element_mut(handle)?.add_parameter(value))
    }

    pub fn remove_value<T, P>(&mut self, handle: Handle<T>, value: &P) -> Result<bool, AdmError>
    where
        T: Element + VectorParameter<P>,
        P: Parameter,
    {
        Ok(self.element_mut(handle)?.remove_parameter(value))
    }

    /// See [`AudioChannelFormat::add_block_format`].
    pub fn add_block_format(
        &mut self,
        handle: Handle<AudioChannelFormat>,
        block: AudioBlockFormat,
    ) -> Result<AudioBlockFormatId, AdmError> {
        self.element_mut(handle)?.add_block_format(block)
    }

    /// See [`AudioChannelFormat::modify_block_format`].
    pub fn modify_block_format<R>(
        &mut self,
        handle: Handle<AudioChannelFormat>,
        index: usize,
        edit: impl FnOnce(&mut AudioBlockFormat) -> R,
    ) -> Result<Option<R>, AdmError> {
        self.element_mut(handle)?.modify_block_format(index, edit)
    }

    pub fn remove_block_format(
        &mut self,
        handle: Handle<AudioChannelFormat>,
        index: usize,
    ) -> Result<Option<AudioBlockFormat>, AdmError> {
        Ok(self.element_mut(handle)?.remove_block_format(index))
    }

    pub fn clear_block_formats(&mut self, handle: Handle<AudioChannelFormat>) -> Result<(), AdmError> {
        self.element_mut(handle)?.clear_block_formats();
        Ok(())
    }

    pub(crate) fn channel_format_mut(&mut self, key: ElementKey) -> Option<&mut AudioChannelFormat> {
        self.channel_formats.element_mut(key)
    }
}
