//! Deep copies of whole documents.

use admgraph::model::{
    AudioChannelFormat, AudioContent, AudioPackFormat, AudioProgramme, AudioStreamFormat,
    AudioTrackFormat, AudioTrackUid, Name, Parameters, TypeDescriptor,
};
use admgraph::Document;

mod common;

#[test]
fn copy_references_its_own_clones() {
    let mut doc = Document::new();
    let chain = common::object_chain(&mut doc, "Main", &[Some(3)]);
    let programme_id = doc.get(chain.programme).unwrap().id();
    let content_id = doc.get(chain.content).unwrap().id();

    let mut copy = doc.deep_copy();
    let programme = copy.lookup(&programme_id).unwrap();
    let content = copy.lookup(&content_id).unwrap();
    assert_eq!(copy.references::<AudioContent, _>(programme), vec![content]);
    assert_ne!(content, chain.content);

    copy.set(content, Name::new("Changed")).unwrap();
    assert_eq!(
        doc.get(chain.content).unwrap().get::<Name>().unwrap().as_str(),
        "Main"
    );
    assert_eq!(
        copy.get(content).unwrap().get::<Name>().unwrap().as_str(),
        "Changed"
    );
}

#[test]
fn copy_keeps_counts_and_blocks() {
    let mut doc = Document::new();
    let chain = common::object_chain(&mut doc, "Main", &[Some(1), Some(2)]);
    common::track_chain(&mut doc, chain.channel);

    let copy = doc.deep_copy();
    assert_ne!(copy.id(), doc.id());
    assert_eq!(copy.count::<AudioProgramme>(), 1);
    assert_eq!(copy.count::<AudioTrackUid>(), 1);
    assert_eq!(copy.count::<AudioStreamFormat>(), 1);

    let channel_id = doc.get(chain.channel).unwrap().id();
    let channel = copy.lookup(&channel_id).unwrap();
    assert_eq!(
        copy.get(channel).unwrap().block_formats(),
        doc.get(chain.channel).unwrap().block_formats()
    );
}

#[test]
fn stream_track_pairs_stay_mutual_in_the_copy() {
    let mut doc = Document::new();
    let chain = common::object_chain(&mut doc, "Main", &[None]);
    let tracks = common::track_chain(&mut doc, chain.channel);
    let stream_id = doc.get(tracks.stream).unwrap().id();
    let track_id = doc.get(tracks.track).unwrap().id();

    let mut copy = doc.deep_copy();
    let stream = copy.lookup(&stream_id).unwrap();
    let track = copy.lookup(&track_id).unwrap();
    assert_eq!(copy.references::<AudioTrackFormat, _>(stream), vec![track]);
    assert_eq!(copy.reference::<AudioStreamFormat, _>(track), Some(stream));
    assert_eq!(copy.referencing::<AudioStreamFormat, _>(
        copy.reference::<AudioChannelFormat, _>(stream).unwrap()
    ), vec![stream]);

    assert!(copy.remove_reference(stream, track).unwrap());
    assert_eq!(copy.reference::<AudioStreamFormat, _>(track), None);
    assert_eq!(
        doc.references::<AudioTrackFormat, _>(tracks.stream),
        vec![tracks.track]
    );
    assert_eq!(
        doc.reference::<AudioStreamFormat, _>(tracks.track),
        Some(tracks.stream)
    );
}

#[test]
fn nested_pack_trees_are_rebuilt() {
    let mut doc = Document::new();
    let root = doc
        .add(AudioPackFormat::new("root", TypeDescriptor::DirectSpeakers))
        .unwrap();
    let mut ids = Vec::new();
    let mut parent = root;
    for depth in 0..4 {
        let child = doc.create(AudioPackFormat::new(
            format!("level {depth}"),
            TypeDescriptor::DirectSpeakers,
        ));
        doc.add_reference(parent, child).unwrap();
        ids.push(doc.get(child).unwrap().id());
        parent = child;
    }

    let copy = doc.deep_copy();
    let mut current = copy.lookup(&doc.get(root).unwrap().id()).unwrap();
    for id in ids {
        let next = copy.reference::<AudioPackFormat, _>(current).unwrap();
        assert_eq!(copy.get(next).unwrap().id(), id);
        current = next;
    }
    assert!(copy.references::<AudioPackFormat, _>(current).is_empty());
}
