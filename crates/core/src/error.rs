/// Result alias that carries the custom [`CursorError`] type.
pub type Result<T> = std::result::Result<T, CursorError>;

/// Common error type for the cursor crates.
///
/// The engine itself never fails while running: dispatching events and
/// stepping frames are infallible. Errors only surface while building an
/// engine from configuration or while loading replay scripts from disk.
#[derive(Debug, thiserror::Error)]
pub enum CursorError {
    /// Free-form message, mostly used by host adapters.
    #[error("{0}")]
    Message(String),
    /// A configuration value is outside of its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON in a config file or replay script.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl CursorError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for CursorError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for CursorError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
