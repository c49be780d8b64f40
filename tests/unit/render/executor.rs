use super::*;
use crate::compile::builder::build_pipeline;
use crate::palette::primitive::{PrimitivePalette, Theme};
use crate::render::recording::{CallKind, RecordingRenderer, RendererCall};
use crate::scene::mask::MaskShapeConfig;
use crate::scene::model::{ColorConfig, LayerNode, SceneConfig};
use crate::scene::modifier::{EffectConfig, MaskModifier, Modifier};
use crate::scene::surface::{SurfaceConfig, SurfaceKind};

fn palette() -> PrimitivePalette {
    PrimitivePalette::fallback(&ColorConfig::default(), Theme::Light)
}

fn build(layers: Vec<LayerNode>) -> Pipeline {
    let cfg = layers
        .into_iter()
        .fold(SceneConfig::new(Viewport::default()), SceneConfig::with_layer);
    build_pipeline(&cfg, &palette()).unwrap()
}

fn effect(id: &str) -> Modifier {
    Modifier::Effect(EffectConfig::new(id))
}

fn three_layer_scene() -> Vec<LayerNode> {
    vec![
        LayerNode::background(SurfaceConfig::solid()),
        LayerNode::group(
            "a",
            vec![LayerNode::surface("sa", SurfaceConfig::new(SurfaceKind::Grid))],
        ),
        LayerNode::group(
            "b",
            vec![LayerNode::surface("sb", SurfaceConfig::new(SurfaceKind::Wave))],
        ),
        LayerNode::group("c", vec![LayerNode::text("t", "hero")]),
    ]
}

#[test]
fn second_identical_frame_hits_render_cache() {
    let p = build(three_layer_scene());
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut ex = Executor::new();

    let first = ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();
    assert_eq!(first.renders, 4);
    assert_eq!(first.cache_hits, 0);

    r.clear_calls();
    let second = ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();
    assert_eq!(second.renders, 0);
    assert_eq!(second.cache_hits, 4);
    assert_eq!(r.count(CallKind::RenderToTexture), 0);
    assert_eq!(r.count(CallKind::CreateTexture), 0);
    assert_eq!(r.count(CallKind::CompositeToCanvas), 1);
}

#[test]
fn overlay_folds_bottom_to_top_through_pool() {
    let p = build(three_layer_scene());
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut ex = Executor::new();
    let stats = ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();
    assert_eq!(stats.dual_passes, 3);

    let renders = r
        .calls()
        .iter()
        .filter_map(|c| match c {
            RendererCall::RenderToTexture { output, .. } => Some(*output),
            _ => None,
        })
        .collect::<Vec<_>>();
    let duals = r
        .calls()
        .iter()
        .filter_map(|c| match c {
            RendererCall::DualTexture {
                spec,
                primary,
                secondary,
                output,
            } => Some((*spec, *primary, *secondary, *output)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert!(duals.iter().all(|d| d.0 == DualTextureSpec::AlphaOver));
    assert_eq!((duals[0].1, duals[0].2), (renders[0], renders[1]));
    assert_eq!((duals[1].1, duals[1].2), (duals[0].3, renders[2]));
    assert_eq!((duals[2].1, duals[2].2), (duals[1].3, renders[3]));
    assert_ne!(duals[0].3, duals[1].3);
}

#[test]
fn viewport_change_reallocates_and_redraws() {
    let p = build(three_layer_scene());
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut ex = Executor::new();
    ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();

    r.set_viewport(Viewport::new(640, 360).unwrap());
    r.clear_calls();
    let stats = ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();
    assert_eq!(stats.renders, 4);
    assert!(r.count(CallKind::DestroyTexture) >= 4);
    assert!(r.calls().iter().all(|c| match c {
        RendererCall::CreateTexture { size, .. } => size.width == 640,
        _ => true,
    }));
}

#[test]
fn scale_change_invalidates_cache_and_scales_effects() {
    let p = build(vec![
        LayerNode::surface("s", SurfaceConfig::new(SurfaceKind::Stripe)),
        LayerNode::processor("fx", vec![effect("blur")]),
    ]);
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut ex = Executor::new();
    ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();
    let stats = ex.execute(&mut r, &p, &RenderOptions::with_scale(0.5)).unwrap();
    assert_eq!(stats.renders, 1);
    assert_eq!(stats.effect_passes, 1);
}

#[test]
fn stale_nodes_are_disposed() {
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut ex = Executor::new();
    ex.execute(&mut r, &build(three_layer_scene()), &RenderOptions::default())
        .unwrap();
    let before = r.live_textures();

    let smaller = build(vec![LayerNode::background(SurfaceConfig::solid())]);
    let stats = ex.execute(&mut r, &smaller, &RenderOptions::default()).unwrap();
    assert!(stats.evicted >= 4);
    assert!(r.live_textures() < before);
    assert_eq!(ex.cached_nodes(), 1);

    ex.dispose(&mut r);
    assert_eq!(r.live_textures(), 0);
}

#[test]
fn unknown_effects_are_skipped_and_empty_chain_passes_through() {
    let p = build(vec![
        LayerNode::surface("s", SurfaceConfig::solid()),
        LayerNode::processor("fx", vec![effect("sparkle")]),
    ]);
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut ex = Executor::new();
    let stats = ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();
    assert_eq!(stats.effects_skipped, 1);
    assert_eq!(stats.effect_passes, 0);

    let rendered = r
        .calls()
        .iter()
        .find_map(|c| match c {
            RendererCall::RenderToTexture { output, .. } => Some(*output),
            _ => None,
        })
        .unwrap();
    assert!(r.calls().contains(&RendererCall::CompositeToCanvas {
        input: rendered,
        clear: true,
    }));
}

#[test]
fn effect_chain_ping_pongs_and_ends_in_owned_texture() {
    let p = build(vec![
        LayerNode::surface("s", SurfaceConfig::solid()),
        LayerNode::processor(
            "fx",
            vec![effect("blur"), effect("vignette"), effect("mosaic")],
        ),
    ]);
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut ex = Executor::new();
    ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();
    let passes = r
        .calls()
        .iter()
        .filter_map(|c| match c {
            RendererCall::PostEffect {
                shader,
                input,
                output,
            } => Some((*shader, *input, *output)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(
        passes.iter().map(|p| p.0).collect::<Vec<_>>(),
        ["fx_blur", "fx_vignette", "fx_mosaic"]
    );
    assert_eq!(passes[1].1, passes[0].2);
    assert_eq!(passes[2].1, passes[1].2);
    let composited = r.calls().iter().find_map(|c| match c {
        RendererCall::CompositeToCanvas { input, .. } => Some(*input),
        _ => None,
    });
    assert_eq!(composited, Some(passes[2].2));
}

#[test]
fn renderer_errors_propagate() {
    let p = build(vec![
        LayerNode::surface("s", SurfaceConfig::solid()),
        LayerNode::processor(
            "m",
            vec![Modifier::Mask(MaskModifier::new(MaskShapeConfig::circle(0.5, 0.5, 0.2)))],
        ),
    ]);
    let mut r = RecordingRenderer::new(Viewport::default());
    r.fail_on(CallKind::DualTexture);
    let mut ex = Executor::new();
    let err = ex.execute(&mut r, &p, &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, HeroError::Render(_)));
    assert_eq!(r.count(CallKind::CompositeToCanvas), 0);

    r.clear_failure();
    ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();
    assert_eq!(r.count(CallKind::CompositeToCanvas), 1);
}

#[test]
fn invalid_scale_is_rejected_before_any_call() {
    let p = build(three_layer_scene());
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut ex = Executor::new();
    for scale in [0.0, -1.0, 1.5, f32::NAN] {
        let err = ex
            .execute(&mut r, &p, &RenderOptions::with_scale(scale))
            .unwrap_err();
        assert!(matches!(err, HeroError::Validation(_)));
    }
    assert!(r.calls().is_empty());
}

#[test]
fn clear_flag_reaches_canvas_composite() {
    let p = build(vec![LayerNode::background(SurfaceConfig::solid())]);
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut ex = Executor::new();
    let opts = RenderOptions {
        clear: false,
        ..RenderOptions::default()
    };
    ex.execute(&mut r, &p, &opts).unwrap();
    assert!(matches!(
        r.calls().last(),
        Some(RendererCall::CompositeToCanvas { clear: false, .. })
    ));
}

#[test]
fn invalidate_forces_redraw() {
    let p = build(three_layer_scene());
    let mut r = RecordingRenderer::new(Viewport::default());
    let mut ex = Executor::new();
    ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();
    ex.invalidate();
    let stats = ex.execute(&mut r, &p, &RenderOptions::default()).unwrap();
    assert_eq!(stats.renders, 4);
}
