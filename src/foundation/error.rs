/// Result alias for fallible `picas_video` operations.
pub type VideoResult<T> = Result<T, VideoError>;

/// What went wrong, by the stage that failed.
///
/// Every message starts with a fixed stage prefix (`validation error:`, `encode error:`, ...) so
/// logs and the CLI's stderr can be grepped by stage.
#[derive(thiserror::Error, Debug)]
pub enum VideoError {
    /// Timeline, asset path or render option rejected before any frame work starts.
    #[error("validation error: {0}")]
    Validation(String),

    /// Interpolation ranges or spring constants that cannot be sampled.
    #[error("animation error: {0}")]
    Animation(String),

    /// A frame that could not be evaluated or rasterized.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// A sink that could not accept frames: misuse of the frame protocol or a failed `ffmpeg`.
    #[error("encode error: {0}")]
    Encode(String),

    /// Composition JSON that does not parse or serialize.
    #[error("serialization error: {context}: {source}")]
    Serde {
        /// What was being read or written.
        context: &'static str,
        /// Underlying `serde_json` failure, with line and column for parse errors.
        #[source]
        source: serde_json::Error,
    },

    /// IO and decoder failures, carried with their `anyhow` context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VideoError {
    /// [`VideoError::Validation`] with `msg`.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// [`VideoError::Animation`] with `msg`.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// [`VideoError::Evaluation`] with `msg`.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// [`VideoError::Encode`] with `msg`.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Adapter for `map_err` on `serde_json` results.
    pub fn serde(context: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| Self::Serde { context, source }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
