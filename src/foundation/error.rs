/// Convenience result type used across plotshot.
pub type PlotshotResult<T> = Result<T, PlotshotError>;

/// Top-level error taxonomy for the compile, render and cache pipeline.
///
/// None of these are retried inside the crate: every failure is terminal for the request that
/// produced it.
#[derive(thiserror::Error, Debug)]
pub enum PlotshotError {
    /// Missing or malformed required field in an inbound request.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Request body exceeded the configured byte ceiling; rejected before parsing.
    #[error("payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge {
        /// Size of the rejected body in bytes.
        size: usize,
        /// Configured ceiling in bytes.
        limit: usize,
    },

    /// Structurally broken dataset handed to the options compiler.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    /// The rendering engine rejected a compiled configuration.
    #[error("render error: {0}")]
    Render(String),

    /// Cache miss on retrieval. A normal outcome, not an alarm.
    #[error("not found: {0}")]
    NotFound(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlotshotError {
    /// Build a [`PlotshotError::InvalidInput`] value.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Build a [`PlotshotError::PayloadTooLarge`] value.
    pub fn payload_too_large(size: usize, limit: usize) -> Self {
        Self::PayloadTooLarge { size, limit }
    }

    /// Build a [`PlotshotError::InvalidDataset`] value.
    pub fn invalid_dataset(msg: impl Into<String>) -> Self {
        Self::InvalidDataset(msg.into())
    }

    /// Build a [`PlotshotError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PlotshotError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`PlotshotError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for failures caused by the caller's request (4xx-equivalent).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::PayloadTooLarge { .. }
                | Self::InvalidDataset(_)
                | Self::NotFound(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
