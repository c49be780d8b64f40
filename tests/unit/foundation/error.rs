use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        HeroError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(HeroError::render("x").to_string().contains("render error:"));
    assert!(
        HeroError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert!(
        HeroError::from(BuildError::EmptyLayers)
            .to_string()
            .contains("build error:")
    );
}

#[test]
fn build_errors_are_recoverable_from_the_top_level_error() {
    let err = HeroError::from(BuildError::NothingToRender { layer_count: 3 });
    assert_eq!(
        err.as_build(),
        Some(&BuildError::NothingToRender { layer_count: 3 })
    );
    assert!(err.to_string().contains("3 layer(s)"));
    assert!(HeroError::render("lost").as_build().is_none());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = HeroError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
