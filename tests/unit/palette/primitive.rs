use super::*;

#[test]
fn oklch_reads_object_and_array_forms() {
    let p = PrimitivePalette::from_json_str(
        r#"{ "theme": "dark", "colors": { "B": { "l": 0.6, "c": 0.1, "h": 200 }, "F0": [0.2, 0.0, 0.0] } }"#,
    )
    .unwrap();
    assert_eq!(p.theme, Theme::Dark);
    assert_eq!(p.get("B"), Some(Oklch::new(0.6, 0.1, 200.0)));
    assert_eq!(p.get("F0"), Some(Oklch::new(0.2, 0.0, 0.0)));
}

#[test]
fn darkness_follows_f0_then_theme() {
    let light_f0 = PrimitivePalette {
        theme: Theme::Dark,
        ..Default::default()
    }
    .with_color("F0", Oklch::new(0.95, 0.0, 0.0));
    assert!(!light_f0.is_dark());

    let tagged_dark = PrimitivePalette {
        theme: Theme::Dark,
        ..Default::default()
    };
    assert!(tagged_dark.is_dark());
    assert!(!PrimitivePalette::default().is_dark());
}

#[test]
fn fallback_palette_is_complete_and_themed() {
    let seeds = ColorConfig::default();
    let light = PrimitivePalette::fallback(&seeds, Theme::Light);
    assert!(light.missing_keys().is_empty());
    assert!(!light.is_dark());

    let dark = PrimitivePalette::fallback(&seeds, Theme::Dark);
    assert!(dark.missing_keys().is_empty());
    assert!(dark.is_dark());
}

#[test]
fn color_ref_serializes_as_plain_string() {
    assert_eq!(serde_json::to_string(&ColorRef::Auto).unwrap(), "\"auto\"");
    assert_eq!(serde_json::to_string(&ColorRef::key("F3")).unwrap(), "\"F3\"");
    let r: ColorRef = serde_json::from_str("\"BN2\"").unwrap();
    assert_eq!(r, ColorRef::key("BN2"));
}

#[test]
fn malformed_palette_is_a_serde_error() {
    let err = PrimitivePalette::from_json_str("{ \"colors\": 3 }").unwrap_err();
    assert!(matches!(err, HeroError::Serde(_)));
}
