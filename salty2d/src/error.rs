use thiserror::Error;

/// Errors raised by the engine core.
///
/// Everything except `Configuration` belongs to the scene-construction family
/// and is surfaced by [`SceneManager`](crate::scene::SceneManager) operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A component needs a resource that its scene does not provide.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No factory is registered under the name and there is nothing to fall back to.
    #[error("no scene registered under \"{0}\"")]
    UnknownScene(String),

    /// The factory exists but takes a different argument type.
    #[error("scene \"{scene}\" expects arguments of type `{expected}`, got `{given}`")]
    ArgumentMismatch {
        scene: String,
        expected: &'static str,
        given: &'static str,
    },

    /// The factory itself failed.
    #[error("failed to construct scene \"{scene}\"")]
    Construction {
        scene: String,
        #[source]
        source: anyhow::Error,
    },
}

impl EngineError {
    pub fn is_construction(&self) -> bool {
        !matches!(self, EngineError::Configuration(_))
    }
}
