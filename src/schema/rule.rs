use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::chunk::PartOfSpeech;

/// What a chunk attaches to: the (normalized) head category of its
/// governing chunk, or one of the two virtual sentence-end markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyLabel {
    Category(PartOfSpeech),
    SentenceEnd,
    SentenceEndQuestion,
}

/// A validated (head category, dependency label) pair. Only ever
/// constructed by the role resolver from whitelisted categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleSignature {
    pub head: PartOfSpeech,
    pub label: DependencyLabel,
}

/// Lookup key for a learned rule: the neutral-side function suffix plus
/// the grammatical role both sides of the training alignment shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleKey {
    pub neutral_suffix: String,
    pub role: RoleSignature,
}

/// Learned rules for one character: RuleKey → candidate character
/// function-suffixes. Duplicates collapse; candidates keep first-insertion
/// order so sampling is reproducible under a fixed seed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleTable {
    entries: HashMap<RuleKey, Vec<String>>,
}

impl RuleTable {
    pub fn insert(&mut self, key: RuleKey, suffix: &str) {
        let candidates = self.entries.entry(key).or_default();
        if !candidates.iter().any(|c| c == suffix) {
            candidates.push(suffix.to_string());
        }
    }

    pub fn candidates(&self, key: &RuleKey) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RuleKey, &[String])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Occurrence counts for character function-suffixes, used as
/// unnormalized sampling weights.
pub type FreqTable = HashMap<String, u32>;

/// Increment a suffix count, inserting it at 1 when unseen.
pub fn increment(freqs: &mut FreqTable, suffix: &str) {
    if let Some(count) = freqs.get_mut(suffix) {
        *count += 1;
    } else {
        freqs.insert(suffix.to_string(), 1);
    }
}
