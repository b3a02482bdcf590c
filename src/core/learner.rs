//! Rule learning — mines each character's suffix-rewrite rules and
//! frequency table from aligned neutral/character sentence pairs.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::chunker::{ChunkError, Chunker};
use crate::core::role::RoleResolver;
use crate::core::splitter::ChunkSplitter;
use crate::schema::character::Character;
use crate::schema::chunk::{ChunkedSentence, DependencyEdge};
use crate::schema::rule::{increment, FreqTable, RuleKey, RuleTable};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Walks a character's training pairs and builds its rule and frequency
/// tables. Pure with respect to the character: the tables are returned,
/// not written in place.
pub struct RuleLearner<'a> {
    chunker: &'a dyn Chunker,
    resolver: &'a RoleResolver,
    splitter: &'a ChunkSplitter,
}

impl<'a> RuleLearner<'a> {
    pub fn new(
        chunker: &'a dyn Chunker,
        resolver: &'a RoleResolver,
        splitter: &'a ChunkSplitter,
    ) -> Self {
        Self {
            chunker,
            resolver,
            splitter,
        }
    }

    pub fn learn(&self, character: &Character) -> Result<(RuleTable, FreqTable), ChunkError> {
        let mut rules = RuleTable::default();
        let mut freqs = FreqTable::new();

        for (neutral, styled) in character.training_pairs() {
            let neutral_sentence = self.chunker.chunk(neutral)?;
            let styled_sentence = self.chunker.chunk(styled)?;

            // Misaligned pair: no partial credit.
            if neutral_sentence.chunks.len() != styled_sentence.chunks.len() {
                log::debug!(
                    "skipping misaligned pair for '{}': {} vs {} chunks",
                    character.name,
                    neutral_sentence.chunks.len(),
                    styled_sentence.chunks.len()
                );
                continue;
            }

            for i in 0..neutral_sentence.chunks.len() {
                let neutral_edges = neutral_sentence.chunk_edges(i);
                let styled_edges = styled_sentence.chunk_edges(i);
                // Positional zip: extra dependents on the longer side are
                // silently ignored.
                for (neutral_edge, styled_edge) in neutral_edges.iter().zip(styled_edges.iter()) {
                    self.observe(
                        &mut rules,
                        &mut freqs,
                        &neutral_sentence,
                        &styled_sentence,
                        neutral_edge,
                        styled_edge,
                    );
                }
            }
        }

        Ok((rules, freqs))
    }

    /// Record one aligned edge observation, or skip it when either side's
    /// role is invalid or the two roles differ.
    fn observe(
        &self,
        rules: &mut RuleTable,
        freqs: &mut FreqTable,
        neutral_sentence: &ChunkedSentence,
        styled_sentence: &ChunkedSentence,
        neutral_edge: &DependencyEdge,
        styled_edge: &DependencyEdge,
    ) {
        let neutral_chunk = &neutral_sentence.chunks[neutral_edge.dependent];
        let neutral_governor = neutral_edge
            .governor
            .map(|g| &neutral_sentence.chunks[g]);
        let styled_chunk = &styled_sentence.chunks[styled_edge.dependent];
        let styled_governor = styled_edge.governor.map(|g| &styled_sentence.chunks[g]);

        let (Some(neutral_role), Some(styled_role)) = (
            self.resolver.resolve(neutral_chunk, neutral_governor),
            self.resolver.resolve(styled_chunk, styled_governor),
        ) else {
            return;
        };
        if neutral_role != styled_role {
            return;
        }

        let neutral_parts = self.splitter.split(neutral_chunk);
        let styled_parts = self.splitter.split(styled_chunk);

        increment(freqs, &styled_parts.function_suffix);
        rules.insert(
            RuleKey {
                neutral_suffix: neutral_parts.function_suffix,
                role: neutral_role,
            },
            &styled_parts.function_suffix,
        );
    }
}

/// A trained character model, serializable for offline training runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleModel {
    pub name: String,
    pub rules: RuleTable,
    pub freqs: FreqTable,
}

/// Save a trained model to a RON file.
pub fn save_model(model: &StyleModel, path: &Path) -> Result<(), ModelError> {
    let serialized = ron::ser::to_string_pretty(model, ron::ser::PrettyConfig::default())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    std::fs::write(path, serialized)?;
    Ok(())
}

/// Load a trained model from a RON file.
pub fn load_model(path: &Path) -> Result<StyleModel, ModelError> {
    let contents = std::fs::read_to_string(path)?;
    let model: StyleModel = ron::from_str(&contents)?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chunker::StaticChunker;
    use crate::schema::chunk::{Chunk, PartOfSpeech, Token};
    use crate::schema::rule::{DependencyLabel, RoleSignature};

    fn token(text: &str, pos: PartOfSpeech, index: usize) -> Token {
        Token {
            text: text.to_string(),
            pos,
            index,
        }
    }

    /// 今日は行きます。 style analysis: topic chunk + final verb chunk.
    fn two_chunk(
        topic: &str,
        particle: &str,
        verb_tokens: &[(&str, PartOfSpeech)],
    ) -> ChunkedSentence {
        let topic_chunk = Chunk {
            tokens: vec![
                token(topic, PartOfSpeech::Noun, 0),
                token(particle, PartOfSpeech::Adp, 1),
            ],
            head: 0,
            left_deps: vec![],
        };
        let verb_chunk = Chunk {
            tokens: verb_tokens
                .iter()
                .enumerate()
                .map(|(i, (text, pos))| token(text, *pos, i + 2))
                .collect(),
            head: 0,
            left_deps: vec![0],
        };
        ChunkedSentence {
            chunks: vec![topic_chunk, verb_chunk],
        }
    }

    fn polite_motion(topic: &str, particle: &str) -> ChunkedSentence {
        two_chunk(
            topic,
            particle,
            &[
                ("行", PartOfSpeech::Verb),
                ("き", PartOfSpeech::Aux),
                ("ます", PartOfSpeech::Aux),
                ("。", PartOfSpeech::Punct),
            ],
        )
    }

    fn hakase_motion(topic: &str, particle: &str) -> ChunkedSentence {
        two_chunk(
            topic,
            particle,
            &[
                ("行", PartOfSpeech::Verb),
                ("く", PartOfSpeech::Aux),
                ("の", PartOfSpeech::Sconj),
                ("だ", PartOfSpeech::Aux),
                ("。", PartOfSpeech::Punct),
            ],
        )
    }

    fn test_symbols() -> Vec<String> {
        vec!["。".to_string(), "、".to_string(), "？".to_string()]
    }

    fn test_chunker() -> StaticChunker {
        let mut chunker = StaticChunker::default();
        chunker.insert("今日は行きます。", polite_motion("今日", "は"));
        chunker.insert("今日は行くのだ。", hakase_motion("今日", "は"));
        chunker.insert("明日も行きます。", polite_motion("明日", "も"));
        chunker.insert("明日も行くのだ。", hakase_motion("明日", "も"));
        // A one-chunk styled sentence, for misalignment tests.
        chunker.insert(
            "行くのだ。",
            ChunkedSentence {
                chunks: vec![Chunk {
                    tokens: vec![
                        token("行", PartOfSpeech::Verb, 0),
                        token("く", PartOfSpeech::Aux, 1),
                        token("の", PartOfSpeech::Sconj, 2),
                        token("だ", PartOfSpeech::Aux, 3),
                        token("。", PartOfSpeech::Punct, 4),
                    ],
                    head: 0,
                    left_deps: vec![],
                }],
            },
        );
        chunker
    }

    fn learn(pairs: &[(&str, &str)]) -> (RuleTable, FreqTable) {
        let chunker = test_chunker();
        let resolver = RoleResolver::new(vec!["？".to_string()]);
        let splitter = ChunkSplitter::new(test_symbols());
        let learner = RuleLearner::new(&chunker, &resolver, &splitter);
        let character = Character::new(
            "hakase",
            pairs
                .iter()
                .map(|(n, s)| (n.to_string(), s.to_string()))
                .collect(),
        );
        learner.learn(&character).unwrap()
    }

    fn end_key(suffix: &str) -> RuleKey {
        RuleKey {
            neutral_suffix: suffix.to_string(),
            role: RoleSignature {
                head: PartOfSpeech::Verb,
                label: DependencyLabel::SentenceEnd,
            },
        }
    }

    #[test]
    fn learns_final_chunk_rule() {
        let (rules, freqs) = learn(&[("今日は行きます。", "今日は行くのだ。")]);

        let candidates = rules.candidates(&end_key("きます")).unwrap();
        assert_eq!(candidates, &["くのだ".to_string()]);
        assert_eq!(freqs.get("くのだ"), Some(&1));
    }

    #[test]
    fn learns_interior_dependent_rule() {
        let (rules, freqs) = learn(&[("今日は行きます。", "今日は行くのだ。")]);

        let topic_key = RuleKey {
            neutral_suffix: "は".to_string(),
            role: RoleSignature {
                head: PartOfSpeech::Noun,
                label: DependencyLabel::Category(PartOfSpeech::Verb),
            },
        };
        assert_eq!(rules.candidates(&topic_key).unwrap(), &["は".to_string()]);
        assert_eq!(freqs.get("は"), Some(&1));
    }

    #[test]
    fn repeated_observations_accumulate_frequency() {
        let (rules, freqs) = learn(&[
            ("今日は行きます。", "今日は行くのだ。"),
            ("明日も行きます。", "明日も行くのだ。"),
        ]);

        // Same rule key both times: one candidate, count 2.
        assert_eq!(
            rules.candidates(&end_key("きます")).unwrap(),
            &["くのだ".to_string()]
        );
        assert_eq!(freqs.get("くのだ"), Some(&2));
    }

    #[test]
    fn misaligned_pair_contributes_nothing() {
        let (rules, freqs) = learn(&[("今日は行きます。", "行くのだ。")]);
        assert!(rules.is_empty());
        assert!(freqs.is_empty());
    }

    #[test]
    fn every_candidate_is_weighted() {
        let (rules, freqs) = learn(&[
            ("今日は行きます。", "今日は行くのだ。"),
            ("明日も行きます。", "明日も行くのだ。"),
        ]);

        for (_, candidates) in rules.iter() {
            let total: u32 = candidates
                .iter()
                .map(|c| freqs.get(c).copied().unwrap_or(0))
                .sum();
            assert!(total >= candidates.len() as u32);
        }
    }

    #[test]
    fn unknown_training_sentence_is_an_error() {
        let chunker = test_chunker();
        let resolver = RoleResolver::new(vec!["？".to_string()]);
        let splitter = ChunkSplitter::new(test_symbols());
        let learner = RuleLearner::new(&chunker, &resolver, &splitter);
        let character = Character::new(
            "hakase",
            vec![("知らない文。".to_string(), "知らない文なのだ。".to_string())],
        );
        assert!(learner.learn(&character).is_err());
    }

    #[test]
    fn model_save_and_load() {
        let (rules, freqs) = learn(&[("今日は行きます。", "今日は行くのだ。")]);
        let model = StyleModel {
            name: "hakase".to_string(),
            rules,
            freqs,
        };

        let path = std::path::PathBuf::from("target/test_style_model.ron");
        save_model(&model, &path).unwrap();
        let loaded = load_model(&path).unwrap();

        assert_eq!(loaded.name, "hakase");
        assert_eq!(
            loaded.rules.candidates(&end_key("きます")).unwrap(),
            &["くのだ".to_string()]
        );
        assert_eq!(loaded.freqs.get("くのだ"), Some(&1));

        // Cleanup
        let _ = std::fs::remove_file(&path);
    }
}
