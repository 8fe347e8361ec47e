use thiserror::Error;

/// A landmark set that does not form a valid 21-point hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservationError {
    #[error("landmark id {0} is outside 0..=20")]
    IdOutOfRange(u8),

    #[error("landmark id {0} occurs more than once")]
    DuplicateId(u8),

    #[error("landmark id {0} is missing")]
    MissingId(u8),

    #[error("expected 21 landmarks, got {0}")]
    WrongCount(usize),
}

/// Rejected configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("config could not be written as JSON: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field, reason: reason.into() }
    }
}
