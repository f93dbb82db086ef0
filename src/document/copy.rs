//! Deep copy of a whole document.

use super::element::{for_kind, Element, KeyMap};
use super::Document;
use crate::model::ElementKind;

impl Document {
    /// Clones every attached element into a new document and re-points all
    /// references at the clones.
    ///
    /// The copy has its own [`DocumentId`](super::DocumentId), so handles of
    /// this document do not resolve in it; use [`lookup`](Self::lookup) by id
    /// to find the corresponding elements. Detached elements are not copied,
    /// and references to them are dropped.
    pub fn deep_copy(&self) -> Document {
        let mut copy = Document::new();
        let mut map = KeyMap::default();
        for kind in ElementKind::ALL {
            for_kind!(kind, T => clone_store::<T>(self, &mut copy, &mut map));
        }
        for kind in ElementKind::ALL {
            for_kind!(kind, T => T::store_mut(&mut copy)
                .elements_mut()
                .for_each(|element| element.remap(&map)));
        }
        tracing::debug!(
            source = self.id.0,
            copy = copy.id.0,
            "Deep-copied document"
        );
        copy
    }
}

fn clone_store<T: Element>(source: &Document, copy: &mut Document, map: &mut KeyMap) {
    let from = T::store(source);
    for &key in from.order() {
        if let Some(element) = from.element(key) {
            let new_key = T::store_mut(copy).insert_attached(element.clone());
            map.insert(T::KIND, key, new_key);
        }
    }
}
