use super::*;
use serde_json::json;

fn params(v: serde_json::Value) -> ParamMap {
    v.as_object().cloned().unwrap()
}

#[test]
fn lookup_accepts_ids_and_aliases() {
    assert_eq!(lookup("blur").unwrap().kind, EffectType::Blur);
    assert_eq!(lookup("pixelate").unwrap().kind, EffectType::Mosaic);
    assert_eq!(lookup("mosaic").unwrap().id, "mosaic");
    assert!(lookup("glitch").is_none());
}

#[test]
fn ids_are_unique() {
    let mut ids = definitions().iter().map(|d| d.id).collect::<Vec<_>>();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), definitions().len());
}

#[test]
fn canonical_rank_follows_definition_order() {
    assert_eq!(canonical_rank("blur"), Some(0));
    assert_eq!(canonical_rank("pixelate"), canonical_rank("mosaic"));
    assert_eq!(canonical_rank("glitch"), None);
}

#[test]
fn create_spec_applies_defaults_and_scale() {
    let viewport = Viewport {
        width: 64,
        height: 32,
    };
    let spec = lookup("dotHalftone")
        .unwrap()
        .create_spec(&params(json!({ "dotSize": 10 })), viewport, 0.5);
    assert_eq!(spec.shader, "fx_dot_halftone");
    assert_eq!(spec.uniform("dotSize"), Some(5.0));
    assert_eq!(spec.uniform("spacing"), Some(4.0));
    assert_eq!(spec.uniform("angle"), Some(45.0));
    assert_eq!(spec.viewport, viewport);
}

#[test]
fn non_length_params_ignore_scale() {
    let spec = lookup("vignette").unwrap().create_spec(
        &params(json!({ "intensity": 0.8 })),
        Viewport::default(),
        0.25,
    );
    assert_eq!(spec.uniform("intensity"), Some(0.8));
    assert_eq!(spec.uniform("radius"), Some(0.75));
}
