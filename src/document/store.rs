//! Per-type arena backing a [`Document`](super::Document).

use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};

use super::element::{Element, ElementId, ElementKey};

pub(crate) struct Node<T> {
    pub(crate) element: T,
    pub(crate) attached: bool,
}

/// The arena of one element type: all nodes (attached or not), the id index
/// of attached elements and their document order.
///
/// `cursors` maps an id template (its value set to `FIRST_VALUE`) to a value
/// below which every id of that template is indexed.
pub struct Store<T: Element> {
    nodes: SlotMap<ElementKey, Node<T>>,
    index: HashMap<T::Id, ElementKey>,
    order: Vec<ElementKey>,
    cursors: HashMap<T::Id, u64>,
}

impl<T: Element> Default for Store<T> {
    fn default() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            index: HashMap::new(),
            order: Vec::new(),
            cursors: HashMap::new(),
        }
    }
}

impl<T: Element> Store<T> {
    pub(crate) fn node(&self, key: ElementKey) -> Option<&Node<T>> {
        self.nodes.get(key)
    }

    pub(crate) fn node_mut(&mut self, key: ElementKey) -> Option<&mut Node<T>> {
        self.nodes.get_mut(key)
    }

    pub(crate) fn element(&self, key: ElementKey) -> Option<&T> {
        self.nodes.get(key).map(|node| &node.element)
    }

    pub(crate) fn element_mut(&mut self, key: ElementKey) -> Option<&mut T> {
        self.nodes.get_mut(key).map(|node| &mut node.element)
    }

    pub(crate) fn is_attached(&self, key: ElementKey) -> bool {
        self.nodes.get(key).is_some_and(|node| node.attached)
    }

    pub(crate) fn insert_detached(&mut self, element: T) -> ElementKey {
        self.nodes.insert(Node {
            element,
            attached: false,
        })
    }

    /// Marks a node attached and indexes its id. The caller has checked that
    /// the id is free.
    pub(crate) fn attach(&mut self, key: ElementKey) {
        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        if node.attached {
            return;
        }
        node.attached = true;
        let id = node.element.id();
        self.index_id(id, key);
        self.order.push(key);
    }

    fn index_id(&mut self, id: T::Id, key: ElementKey) {
        if id.is_undefined() {
            return;
        }
        self.index.insert(id, key);
        let template = template_of(&id);
        let cursor = self.cursor(&template);
        if u64::from(id.raw_value()) == cursor {
            let next = (id.raw_value()..=<T::Id as ElementId>::LAST_VALUE)
                .find(|&value| !self.index.contains_key(&template.with_value(value)));
            // An exhausted template parks its cursor past the last value.
            let next = next.map_or(u64::from(<T::Id as ElementId>::LAST_VALUE) + 1, u64::from);
            self.cursors.insert(template, next);
        }
    }

    fn unindex_id(&mut self, id: &T::Id, key: ElementKey) {
        if self.index.get(id) != Some(&key) {
            return;
        }
        self.index.remove(id);
        let template = template_of(id);
        let value = u64::from(id.raw_value());
        if value >= u64::from(<T::Id as ElementId>::FIRST_VALUE) && value < self.cursor(&template) {
            self.cursors.insert(template, value);
        }
    }

    fn cursor(&self, template: &T::Id) -> u64 {
        self.cursors
            .get(template)
            .copied()
            .unwrap_or(u64::from(<T::Id as ElementId>::FIRST_VALUE))
    }

    pub(crate) fn remove(&mut self, key: ElementKey) -> Option<T> {
        let node = self.nodes.remove(key)?;
        if node.attached {
            self.unindex_id(&node.element.id(), key);
            self.order.retain(|&k| k != key);
        }
        Some(node.element)
    }

    pub(crate) fn lookup(&self, id: &T::Id) -> Option<ElementKey> {
        self.index.get(id).copied()
    }

    pub(crate) fn is_taken(&self, id: &T::Id) -> bool {
        !id.is_undefined() && self.index.contains_key(id)
    }

    pub(crate) fn reindex(&mut self, key: ElementKey, old: T::Id, new: T::Id) {
        self.unindex_id(&old, key);
        self.index_id(new, key);
    }

    /// The first id built from `template` that is neither indexed nor in
    /// `reserved`.
    pub(crate) fn next_free_id(&self, template: T::Id, reserved: &HashSet<T::Id>) -> Option<T::Id> {
        let template = template_of(&template);
        let first = u32::try_from(self.cursor(&template)).ok()?;
        (first..=<T::Id as ElementId>::LAST_VALUE)
            .map(|value| template.with_value(value))
            .find(|id| !self.index.contains_key(id) && !reserved.contains(id))
    }

    /// Attached keys in document order.
    pub(crate) fn order(&self) -> &[ElementKey] {
        &self.order
    }

    pub(crate) fn detached_keys(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.nodes
            .iter()
            .filter(|(_, node)| !node.attached)
            .map(|(key, _)| key)
    }

    pub(crate) fn elements_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.nodes.values_mut().map(|node| &mut node.element)
    }

    /// Inserts an already attached element without id checks. Used when
    /// cloning a document whose ids are known to be unique.
    pub(crate) fn insert_attached(&mut self, element: T) -> ElementKey {
        let key = self.insert_detached(element);
        self.attach(key);
        key
    }
}

fn template_of<I: ElementId>(id: &I) -> I {
    id.with_value(I::FIRST_VALUE)
}
