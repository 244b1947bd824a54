//! Error types for static content loading.

use std::path::PathBuf;

/// Errors that can occur while loading the word deck or name lists.
#[derive(Debug, thiserror::Error)]
pub enum WordsError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The word list JSON did not match `{"words": [{word, clue}]}`.
    #[error("failed to parse word list: {0}")]
    Parse(serde_json::Error),

    /// The deck parsed but contains no word/clue pairs. A game cannot
    /// start without at least one.
    #[error("word list is empty")]
    EmptyDeck,

    /// A name list contains no entries.
    #[error("name list {0:?} is empty")]
    EmptyNameList(String),
}
