use std::path::Path;
use thiserror::Error;

use super::rule::{FreqTable, RuleTable};

#[derive(Debug, Error)]
pub enum CharacterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed training line {line} in '{name}': expected 'neutral,character'")]
    MalformedLine { name: String, line: usize },
}

/// One fictional character: its training pairs and, after training, its
/// learned rule and frequency tables. Tables are populated once by the
/// rule learner and read-only during transfer.
#[derive(Debug, Clone)]
pub struct Character {
    pub name: String,
    /// Ordered (neutral sentence, character sentence) pairs.
    pub training_pairs: Vec<(String, String)>,
    pub rules: RuleTable,
    pub freqs: FreqTable,
}

impl Character {
    pub fn new(name: &str, training_pairs: Vec<(String, String)>) -> Self {
        Self {
            name: name.to_string(),
            training_pairs,
            rules: RuleTable::default(),
            freqs: FreqTable::new(),
        }
    }

    /// Parse a character from CSV contents: one `neutral,character` pair
    /// per line, no embedded commas. Blank lines are ignored; a line
    /// without a comma is fatal.
    pub fn parse_csv(name: &str, contents: &str) -> Result<Self, CharacterError> {
        let mut pairs = Vec::new();
        for (i, line) in contents.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let (neutral, styled) =
                line.split_once(',')
                    .ok_or_else(|| CharacterError::MalformedLine {
                        name: name.to_string(),
                        line: i + 1,
                    })?;
            pairs.push((neutral.to_string(), styled.to_string()));
        }
        Ok(Self::new(name, pairs))
    }

    pub fn training_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.training_pairs
            .iter()
            .map(|(n, s)| (n.as_str(), s.as_str()))
    }
}

/// All characters loaded for a run. Characters are mutually independent;
/// each owns its tables, so there is no shared mutable state between them.
#[derive(Debug, Clone, Default)]
pub struct CharacterRepository {
    characters: Vec<Character>,
}

impl CharacterRepository {
    pub fn new(characters: Vec<Character>) -> Self {
        Self { characters }
    }

    /// Load every `*.csv` file in `dir` as one character; the file stem is
    /// the character's name. Files load in lexicographic name order so runs
    /// are reproducible regardless of directory iteration order.
    pub fn load_from_dir(dir: &Path) -> Result<Self, CharacterError> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("csv"))
            .collect();
        paths.sort();

        let mut characters = Vec::new();
        for path in paths {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();
            let contents = std::fs::read_to_string(&path)?;
            characters.push(Character::parse_csv(&name, &contents)?);
        }
        Ok(Self { characters })
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn characters_mut(&mut self) -> &mut [Character] {
        &mut self.characters
    }

    pub fn get(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
