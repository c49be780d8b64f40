use super::*;
use crate::compile::spec::{ImageSpec, RenderSpec};
use crate::scene::model::ImagePlacement;

fn image(id: &str) -> NodeKind {
    NodeKind::Render(RenderSpec::Image(ImageSpec {
        image_id: id.to_owned(),
        placement: ImagePlacement::default(),
    }))
}

fn sample() -> Pipeline {
    let mut a = Arena::default();
    let x = a.push(NodeId::new("render", "x"), image("x"), []);
    let _orphan = a.push(NodeId::new("render", "orphan"), image("o"), []);
    let y = a.push(NodeId::new("render", "y"), image("y"), []);
    let z = a.push(NodeId::new("render", "z"), image("z"), []);
    let over = a.push(
        NodeId::named("scene"),
        NodeKind::Overlay {
            slots: SmallVec::from_slice(&[0]),
        },
        [x, y, z],
    );
    let out = a.push(NodeId::named("output"), NodeKind::Output, [over]);
    a.finish(out, Viewport::default())
}

#[test]
fn dump_is_stable_and_readable() {
    let p = sample();
    let dump = p.dump();
    let lines = dump.lines().collect::<Vec<_>>();
    assert_eq!(
        lines[0],
        "pipeline viewport=1280x720 nodes=6 output=#5 pool_slots=1"
    );
    assert_eq!(lines[5], "#4 scene overlay(slots=[0]) [#0,#2,#3]");
    assert_eq!(lines[6], "#5 output output [#4]");
    assert_eq!(p.fingerprint(), sample().fingerprint());
}

#[test]
fn reachability_excludes_orphans() {
    let p = sample();
    assert_eq!(p.reachable(), [true, false, true, true, true, true]);
}

#[test]
fn lookup_helpers() {
    let p = sample();
    assert_eq!(p.len(), 6);
    assert!(!p.is_empty());
    assert_eq!(p.count(NodeTag::Render), 4);
    assert_eq!(p.count(NodeTag::Output), 1);
    let (idx, node) = p.find("scene").unwrap();
    assert_eq!(node.kind.tag(), NodeTag::Overlay);
    assert_eq!(p.input_ids(idx), ["render:x", "render:y", "render:z"]);
    assert!(p.find("missing").is_none());
}
