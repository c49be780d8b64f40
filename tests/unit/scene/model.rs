use super::*;
use crate::scene::modifier::{EffectConfig, MaskModifier};
use crate::scene::mask::MaskShapeConfig;
use serde_json::json;

#[test]
fn layer_nodes_read_tagged_layout_with_defaults() {
    let v = json!({
        "viewport": { "width": 640, "height": 360 },
        "layers": [
            { "type": "base", "id": "bg", "surface": { "type": "stripe", "angle": 30 } },
            { "type": "text", "id": "t", "text": "Hello", "visible": false },
            { "type": "group", "id": "g", "children": [
                { "type": "surface", "id": "s", "surface": { "id": "grid", "params": {} },
                  "colors": { "primary": "B", "secondary": "auto" } }
            ] }
        ]
    });
    let cfg: SceneConfig = serde_json::from_value(v).unwrap();
    assert_eq!(cfg.viewport, Viewport { width: 640, height: 360 });
    assert_eq!(cfg.colors.semantic_context, SemanticContext::Canvas);
    assert_eq!(cfg.layers.len(), 3);

    let LayerNode::Base(bg) = &cfg.layers[0] else {
        panic!("expected base");
    };
    assert_eq!(bg.surface.id, "stripe");
    assert!(bg.meta.visible);

    let LayerNode::Text(t) = &cfg.layers[1] else {
        panic!("expected text");
    };
    assert!(!t.meta.visible);
    assert_eq!(t.font_size, 48.0);
    assert_eq!(t.position.anchor, Anchor::Center);
    assert_eq!(t.color, ColorRef::Auto);

    let LayerNode::Group(g) = &cfg.layers[2] else {
        panic!("expected group");
    };
    let LayerNode::Surface(s) = &g.children[0] else {
        panic!("expected surface");
    };
    let colors = s.colors.as_ref().unwrap();
    assert_eq!(colors.primary, ColorRef::Key("B".to_owned()));
    assert_eq!(colors.secondary, ColorRef::Auto);
}

#[test]
fn processor_reads_legacy_effect_bundle() {
    let v = json!({
        "type": "processor",
        "id": "p",
        "modifiers": [
            { "type": "mask", "shape": { "type": "circle", "radius": 0.2 } },
            { "type": "effect", "enabled": true, "config": {
                "mosaic": { "enabled": true, "cellSize": 4 },
                "blur": { "enabled": true, "radius": 2 },
                "vignette": { "enabled": false }
            } }
        ]
    });
    let node: LayerNode = serde_json::from_value(v).unwrap();
    let LayerNode::Processor(p) = node else {
        panic!("expected processor");
    };
    assert_eq!(p.modifiers.len(), 3);
    assert!(matches!(
        &p.modifiers[0],
        Modifier::Mask(m) if m.shape.as_ref().unwrap().id == "circle"
    ));
    let ids = p.modifiers[1..]
        .iter()
        .map(|m| match m {
            Modifier::Effect(e) => e.id.as_str(),
            Modifier::Mask(_) => "mask",
        })
        .collect::<Vec<_>>();
    assert_eq!(ids, ["blur", "mosaic"]);
}

#[test]
fn background_helper_builds_canonical_group() {
    let node = LayerNode::background(SurfaceConfig::solid());
    let LayerNode::Group(g) = &node else {
        panic!("expected group");
    };
    assert_eq!(g.meta.id, BACKGROUND_GROUP_ID);
    assert_eq!(g.children[0].meta().id, BACKGROUND_SURFACE_ID);
}

#[test]
fn validate_rejects_negative_feather_and_bad_font_size() {
    let mut mask = MaskModifier::new(MaskShapeConfig::circle(0.5, 0.5, 0.2));
    mask.feather = -1.0;
    let cfg = SceneConfig::new(Viewport::default())
        .with_layer(LayerNode::group(
            "g",
            vec![
                LayerNode::surface("a", SurfaceConfig::solid()),
                LayerNode::processor("p", vec![Modifier::Mask(mask)]),
            ],
        ));
    assert!(matches!(cfg.validate(), Err(HeroError::Validation(_))));

    let mut text = LayerNode::text("t", "x");
    if let LayerNode::Text(t) = &mut text {
        t.font_size = 0.0;
    }
    let cfg = SceneConfig::new(Viewport::default()).with_layer(text);
    assert!(cfg.validate().is_err());

    let ok = SceneConfig::new(Viewport::default())
        .with_layer(LayerNode::processor("p", vec![Modifier::Effect(EffectConfig::new("blur"))]));
    ok.validate().unwrap();
}

#[test]
fn foreground_is_carried_but_separate() {
    let v = json!({
        "layers": [],
        "foreground": { "elements": [
            { "id": "title", "type": "title", "content": "Hi", "position": "topLeft" }
        ] }
    });
    let cfg: SceneConfig = serde_json::from_value(v).unwrap();
    assert_eq!(cfg.foreground.elements.len(), 1);
    assert_eq!(cfg.foreground.elements[0].kind, ForegroundKind::Title);
    assert_eq!(cfg.foreground.elements[0].position, Anchor::TopLeft);
    assert!(cfg.foreground.elements[0].visible);
}

#[test]
fn anchor_offsets_cover_corners() {
    assert_eq!(Anchor::TopLeft.offset(), (0.0, 0.0));
    assert_eq!(Anchor::BottomRight.offset(), (1.0, 1.0));
    assert_eq!(Anchor::Center.offset(), (0.5, 0.5));
}
