use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuiverError {
    #[error("at least one set must be scored")]
    EarlyFinishRejected,

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QuiverError>;

/// A value outside one of the closed selection lists
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct InvalidSelection {
    pub kind: &'static str,
    pub value: String,
}

impl InvalidSelection {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
