//! Reference management between elements.

use std::collections::HashSet;

use admgraph::model::{
    AudioChannelFormat, AudioContent, AudioContentId, AudioObject, AudioPackFormat,
    AudioProgramme, AudioStreamFormat, AudioTrackFormat, TypeDescriptor,
};
use admgraph::{AdmError, Document, Handle};
use proptest::prelude::*;

mod common;
mod proptest_helpers;

fn pack(doc: &mut Document, name: &str) -> Handle<AudioPackFormat> {
    doc.add(AudioPackFormat::new(name, TypeDescriptor::Objects))
        .expect("add pack format")
}

#[test]
fn re_adding_a_reference_is_a_no_op() {
    let mut doc = Document::new();
    let programme = doc.add(AudioProgramme::new("Main")).unwrap();
    let content = doc.add(AudioContent::new("Music")).unwrap();

    assert!(doc.add_reference(programme, content).unwrap());
    assert!(!doc.add_reference(programme, content).unwrap());
    assert_eq!(doc.references::<AudioContent, _>(programme), vec![content]);

    let other = doc.add(AudioContent::new("Speech")).unwrap();
    assert!(doc.add_reference(programme, other).unwrap());
    assert_eq!(doc.references::<AudioContent, _>(programme).len(), 2);
}

#[test]
fn self_reference_is_a_cycle() {
    let mut doc = Document::new();
    let a = pack(&mut doc, "a");
    let err = doc.add_reference(a, a).unwrap_err();
    assert!(matches!(err, AdmError::ReferenceCycle { .. }));
    assert!(doc.references::<AudioPackFormat, _>(a).is_empty());
}

#[test]
fn transitive_cycle_is_rejected_without_changes() {
    let mut doc = Document::new();
    let a = pack(&mut doc, "a");
    let b = pack(&mut doc, "b");
    let c = pack(&mut doc, "c");
    let d = pack(&mut doc, "d");
    doc.add_reference(a, b).unwrap();
    doc.add_reference(b, c).unwrap();
    doc.add_reference(c, d).unwrap();

    let err = doc.add_reference(d, a).unwrap_err();
    match err {
        AdmError::ReferenceCycle { from, to } => {
            assert_eq!(from, doc.get(d).unwrap().id().to_string());
            assert_eq!(to, doc.get(a).unwrap().id().to_string());
        }
        other => panic!("expected a cycle error, got {other:?}"),
    }
    assert!(doc.references::<AudioPackFormat, _>(d).is_empty());
    assert_eq!(doc.references::<AudioPackFormat, _>(a), vec![b]);

    // Diamonds are not cycles.
    assert!(doc.add_reference(a, d).unwrap());
}

#[test]
fn pack_formats_of_different_types_cannot_nest() {
    let mut doc = Document::new();
    let objects = pack(&mut doc, "objects");
    let hoa = doc
        .add(AudioPackFormat::new("hoa", TypeDescriptor::Hoa))
        .unwrap();
    let err = doc.add_reference(objects, hoa).unwrap_err();
    assert!(matches!(err, AdmError::TypeMismatch { .. }));
}

#[test]
fn stream_and_track_stay_in_sync() {
    let mut doc = Document::new();
    let first = doc
        .add(AudioStreamFormat::new("first", TypeDescriptor::Objects))
        .unwrap();
    let second = doc
        .add(AudioStreamFormat::new("second", TypeDescriptor::Objects))
        .unwrap();
    let track = doc
        .add(AudioTrackFormat::new("track", TypeDescriptor::Objects))
        .unwrap();

    doc.add_reference(first, track).unwrap();
    assert_eq!(doc.reference::<AudioStreamFormat, _>(track), Some(first));

    // Re-pointing the track leaves the old stream.
    doc.add_reference(track, second).unwrap();
    assert!(doc.references::<AudioTrackFormat, _>(first).is_empty());
    assert_eq!(doc.references::<AudioTrackFormat, _>(second), vec![track]);

    assert!(doc.remove_reference(second, track).unwrap());
    assert_eq!(doc.reference::<AudioStreamFormat, _>(track), None);
    assert!(doc.references::<AudioTrackFormat, _>(second).is_empty());
}

#[test]
fn stream_channel_link_is_visible_from_the_channel() {
    let mut doc = Document::new();
    let chain = common::object_chain(&mut doc, "Main", &[None]);
    let tracks = common::track_chain(&mut doc, chain.channel);

    assert_eq!(
        doc.referencing::<AudioStreamFormat, _>(chain.channel),
        vec![tracks.stream]
    );
    assert_eq!(
        doc.referencing::<AudioPackFormat, _>(chain.channel),
        vec![chain.pack]
    );
}

#[test]
fn referencing_a_detached_element_adopts_it() {
    let mut doc = Document::new();
    let programme = doc.add(AudioProgramme::new("Main")).unwrap();
    let content = doc.create(AudioContent::new("Music"));
    let object = doc.create(AudioObject::new("Strings"));
    doc.add_reference(content, object).unwrap();
    assert!(!doc.is_attached(content));
    assert!(!doc.is_attached(object));
    assert_eq!(doc.count::<AudioObject>(), 0);

    doc.add_reference(programme, content).unwrap();
    assert!(doc.is_attached(content));
    assert!(doc.is_attached(object));
    assert_eq!(doc.get(object).unwrap().id().to_string(), "AO_1001");
    assert_eq!(doc.count::<AudioObject>(), 1);
}

#[test]
fn adoption_with_a_taken_id_changes_nothing() {
    let mut doc = Document::new();
    let programme = doc.add(AudioProgramme::new("Main")).unwrap();
    let existing = doc
        .add(AudioContent::with_id(AudioContentId::new(0x1001), "Music"))
        .unwrap();
    let duplicate = doc.create(AudioContent::with_id(AudioContentId::new(0x1001), "Copy"));

    let err = doc.add_reference(programme, duplicate).unwrap_err();
    assert_eq!(
        err,
        AdmError::IdInUse {
            id: "ACO_1001".to_string()
        }
    );
    assert!(!doc.is_attached(duplicate));
    assert!(doc.references::<AudioContent, _>(programme).is_empty());
    assert_eq!(doc.lookup(&AudioContentId::new(0x1001)), Some(existing));
}

#[test]
fn handles_from_another_document_are_rejected() {
    let mut doc = Document::new();
    let mut other = Document::new();
    let programme = doc.add(AudioProgramme::new("Main")).unwrap();
    let foreign = other.add(AudioContent::new("Music")).unwrap();

    assert_eq!(
        doc.add_reference(programme, foreign),
        Err(AdmError::CrossDocumentReference)
    );
    assert!(doc.references::<AudioContent, _>(programme).is_empty());
}

#[test]
fn set_reference_replaces_a_whole_list() {
    let mut doc = Document::new();
    let parent = pack(&mut doc, "parent");
    let left = doc
        .add(AudioChannelFormat::new("L", TypeDescriptor::Objects))
        .unwrap();
    let right = doc
        .add(AudioChannelFormat::new("R", TypeDescriptor::Objects))
        .unwrap();
    doc.add_reference(parent, left).unwrap();

    doc.set_reference(parent, right).unwrap();
    assert_eq!(doc.references::<AudioChannelFormat, _>(parent), vec![right]);
    assert_eq!(doc.remove_references::<AudioChannelFormat, _>(parent).unwrap(), 1);
}

fn reaches(edges: &HashSet<(usize, usize)>, from: usize, to: usize) -> bool {
    let mut seen = HashSet::new();
    let mut stack = vec![from];
    while let Some(node) = stack.pop() {
        if node == to {
            return true;
        }
        if seen.insert(node) {
            stack.extend(edges.iter().filter(|(s, _)| *s == node).map(|(_, t)| *t));
        }
    }
    false
}

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn pack_graph_stays_acyclic(edges in proptest_helpers::arb_edges(6, 24)) {
        let mut doc = Document::new();
        let packs: Vec<_> = (0..6).map(|i| pack(&mut doc, &format!("p{i}"))).collect();
        let mut accepted: HashSet<(usize, usize)> = HashSet::new();

        for (source, target) in edges {
            let closes_cycle = reaches(&accepted, target, source);
            let result = doc.add_reference(packs[source], packs[target]);
            if closes_cycle {
                let is_cycle = matches!(result, Err(AdmError::ReferenceCycle { .. }));
                prop_assert!(is_cycle);
            } else {
                let added = result.unwrap();
                prop_assert_eq!(added, accepted.insert((source, target)));
            }
        }

        for (i, &handle) in packs.iter().enumerate() {
            let expected = accepted.iter().filter(|(s, _)| *s == i).count();
            prop_assert_eq!(doc.references::<AudioPackFormat, _>(handle).len(), expected);
        }
    }
}
