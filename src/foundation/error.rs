/// Convenience result type used across hero-render.
pub type HeroResult<T> = Result<T, HeroError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum HeroError {
    /// Invalid user-provided scene, palette or option data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The scene could not be compiled into a pipeline.
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// Errors raised by the renderer port while executing a pipeline.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Fatal pipeline-build conditions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The scene has no layers at all.
    #[error("scene has no layers; nothing to render")]
    EmptyLayers,

    /// The scene has layers, but none of them produced a texture.
    #[error("scene has {layer_count} layer(s) but none of them is renderable")]
    NothingToRender {
        /// Number of root-level layers in the scene.
        layer_count: usize,
    },
}

impl HeroError {
    /// Build a [`HeroError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HeroError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`HeroError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return the build failure, if this error is one.
    pub fn as_build(&self) -> Option<&BuildError> {
        match self {
            Self::Build(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
