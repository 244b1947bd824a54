//! Unified error type for server startup.
//!
//! Once the server is running, failures are handled where they occur
//! (connections close, deliveries are logged and dropped); this type
//! only covers what can go wrong while bootstrapping.

use wordspy_words::WordsError;

/// Errors that can occur while building or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Static content (word deck, name lists) failed to load.
    #[error(transparent)]
    Words(#[from] WordsError),

    /// Binding or serving the listener failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The configured CORS origin is not a valid header value.
    #[error("invalid allowed origin: {0:?}")]
    InvalidOrigin(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_words_error() {
        let err: ServerError = WordsError::EmptyDeck.into();
        assert!(matches!(err, ServerError::Words(_)));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "busy");
        let err: ServerError = io.into();
        assert!(matches!(err, ServerError::Io(_)));
    }
}
