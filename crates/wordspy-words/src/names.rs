//! Random display-name generation.
//!
//! Players who identify without a name get an "Adjective Noun" name
//! drawn from two one-word-per-line files.

use std::path::Path;

use rand::seq::IndexedRandom;

use crate::WordsError;

/// Generates random "Adjective Noun" display names from two word lists.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    adjectives: Vec<String>,
    nouns: Vec<String>,
}

impl NameGenerator {
    /// Builds a generator from in-memory lists. Blank lines are dropped.
    ///
    /// # Errors
    /// [`WordsError::EmptyNameList`] if either list ends up empty.
    pub fn from_lists(
        adjectives: Vec<String>,
        nouns: Vec<String>,
    ) -> Result<Self, WordsError> {
        let adjectives: Vec<String> = adjectives
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        let nouns: Vec<String> = nouns
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        if adjectives.is_empty() {
            return Err(WordsError::EmptyNameList("adjectives".into()));
        }
        if nouns.is_empty() {
            return Err(WordsError::EmptyNameList("nouns".into()));
        }
        Ok(Self { adjectives, nouns })
    }

    /// Loads a generator from two one-word-per-line files.
    pub fn load(adjectives: &Path, nouns: &Path) -> Result<Self, WordsError> {
        Self::from_lists(read_lines(adjectives)?, read_lines(nouns)?)
    }

    /// Generates a random "Adjective Noun" name.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        // Both lists are non-empty by construction.
        let adjective = self
            .adjectives
            .choose(&mut rng)
            .expect("adjective list is never empty");
        let noun = self
            .nouns
            .choose(&mut rng)
            .expect("noun list is never empty");
        format!("{adjective} {noun}")
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, WordsError> {
    let text = std::fs::read_to_string(path).map_err(|source| WordsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator() -> NameGenerator {
        NameGenerator::from_lists(
            vec!["Sneaky".into(), "Brave".into()],
            vec!["Walrus".into(), "Pigeon".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_generate_combines_adjective_and_noun() {
        let names = generator();
        for _ in 0..20 {
            let name = names.generate();
            let mut parts = name.split(' ');
            let adjective = parts.next().unwrap();
            let noun = parts.next().unwrap();
            assert!(adjective == "Sneaky" || adjective == "Brave");
            assert!(noun == "Walrus" || noun == "Pigeon");
            assert!(parts.next().is_none());
        }
    }

    #[test]
    fn test_from_lists_drops_blank_lines() {
        let names = NameGenerator::from_lists(
            vec!["  Sneaky  ".into(), "".into()],
            vec!["Walrus".into()],
        )
        .unwrap();
        assert_eq!(names.generate(), "Sneaky Walrus");
    }

    #[test]
    fn test_from_lists_rejects_empty_adjectives() {
        let result = NameGenerator::from_lists(vec![], vec!["Walrus".into()]);
        assert!(matches!(result, Err(WordsError::EmptyNameList(_))));
    }

    #[test]
    fn test_from_lists_rejects_empty_nouns() {
        let result =
            NameGenerator::from_lists(vec!["Sneaky".into()], vec!["  ".into()]);
        assert!(matches!(result, Err(WordsError::EmptyNameList(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = NameGenerator::load(
            Path::new("/nonexistent/adjectives.txt"),
            Path::new("/nonexistent/nouns.txt"),
        );
        assert!(matches!(result, Err(WordsError::Io { .. })));
    }
}
