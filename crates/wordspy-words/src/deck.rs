//! The word/clue deck.
//!
//! Each round needs a secret word plus a decoy clue for the impostor.
//! The deck is loaded from `static/word_list.json`:
//!
//! ```json
//! { "words": [ { "word": "pizza", "clue": "italian dish" }, ... ] }
//! ```

use std::path::Path;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::WordsError;

/// A secret word paired with the decoy clue shown to the impostor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordClue {
    pub word: String,
    pub clue: String,
}

/// Top-level shape of the word list file.
#[derive(Debug, Deserialize)]
struct WordFile {
    words: Vec<WordClue>,
}

/// An immutable, non-empty collection of word/clue pairs.
#[derive(Debug, Clone)]
pub struct WordDeck {
    words: Vec<WordClue>,
}

impl WordDeck {
    /// Parses a deck from word-list JSON.
    ///
    /// # Errors
    /// [`WordsError::Parse`] on malformed JSON, [`WordsError::EmptyDeck`]
    /// if there are no pairs.
    pub fn from_json(json: &str) -> Result<Self, WordsError> {
        let file: WordFile =
            serde_json::from_str(json).map_err(WordsError::Parse)?;
        if file.words.is_empty() {
            return Err(WordsError::EmptyDeck);
        }
        Ok(Self { words: file.words })
    }

    /// Loads a deck from a word-list file on disk.
    pub fn load(path: &Path) -> Result<Self, WordsError> {
        let json = std::fs::read_to_string(path).map_err(|source| {
            WordsError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_json(&json)
    }

    /// Draws a uniformly random word/clue pair.
    pub fn draw(&self) -> &WordClue {
        // Construction rejects empty decks, so a choice always exists.
        self.words
            .choose(&mut rand::rng())
            .expect("deck is never empty")
    }

    /// Number of pairs in the deck.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false for a constructed deck; present for completeness.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
