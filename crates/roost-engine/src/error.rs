use thiserror::Error;

/// Failures while loading or looking up images.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load image `{src}`: {reason}")]
    LoadFailed { src: String, reason: String },
    #[error("image `{0}` has not been loaded")]
    NotLoaded(String),
    #[error("invalid manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Failures while resolving or drawing a drawable source.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The source names a resource the cache cannot resolve.
    #[error("cannot resolve draw source `{0}`")]
    Unresolved(String),
    #[error("{backend} backend error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

/// Errors surfaced by game hooks. Any of these aborts the frame loop.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("hook failed: {0}")]
    Hook(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_converts_into_engine_error() {
        let err: EngineError = RenderError::Unresolved("owl.png".into()).into();
        assert_eq!(err.to_string(), "cannot resolve draw source `owl.png`");
    }

    #[test]
    fn manifest_error_wraps_json() {
        let json_err = serde_json::from_str::<Vec<u32>>("nope").unwrap_err();
        let err = AssetError::from(json_err);
        assert!(err.to_string().starts_with("invalid manifest"));
    }
}
