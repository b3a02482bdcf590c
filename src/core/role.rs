//! Grammatical-role resolution — computes the validated (head category,
//! dependency label) signature for a chunk.

use rustc_hash::FxHashSet;

use crate::schema::chunk::{Chunk, PartOfSpeech};
use crate::schema::rule::{DependencyLabel, RoleSignature};

/// Category sets driving resolution. The defaults mirror the training
/// corpus conventions: noun-like categories collapse to NOUN, and only
/// roles over the whitelisted categories ever become rule keys.
#[derive(Debug, Clone)]
pub struct RoleConfig {
    /// Categories normalized to `Noun` before validation.
    pub noun_like: FxHashSet<PartOfSpeech>,
    /// Categories allowed as a chunk head.
    pub head_whitelist: FxHashSet<PartOfSpeech>,
    /// Labels allowed as a dependency target.
    pub label_whitelist: FxHashSet<DependencyLabel>,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            noun_like: [PartOfSpeech::Noun, PartOfSpeech::Pron, PartOfSpeech::Propn]
                .into_iter()
                .collect(),
            head_whitelist: [PartOfSpeech::Noun, PartOfSpeech::Verb, PartOfSpeech::Adj]
                .into_iter()
                .collect(),
            label_whitelist: [
                DependencyLabel::Category(PartOfSpeech::Noun),
                DependencyLabel::Category(PartOfSpeech::Verb),
                DependencyLabel::SentenceEnd,
                DependencyLabel::SentenceEndQuestion,
            ]
            .into_iter()
            .collect(),
        }
    }
}

/// Resolves a dependent chunk's role signature against its governing
/// chunk, or against the sentence end when there is no governor.
#[derive(Debug, Clone)]
pub struct RoleResolver {
    config: RoleConfig,
    question_symbols: Vec<String>,
}

impl RoleResolver {
    pub fn new(question_symbols: Vec<String>) -> Self {
        Self {
            config: RoleConfig::default(),
            question_symbols,
        }
    }

    pub fn with_config(config: RoleConfig, question_symbols: Vec<String>) -> Self {
        Self {
            config,
            question_symbols,
        }
    }

    /// Returns the validated signature, or `None` when either component
    /// falls outside its whitelist. Callers skip the observation; no
    /// default is ever substituted.
    pub fn resolve(&self, dependent: &Chunk, governor: Option<&Chunk>) -> Option<RoleSignature> {
        let head = self.normalize(dependent.head_token().pos);

        let label = match governor {
            Some(gov) => DependencyLabel::Category(self.normalize(gov.head_token().pos)),
            None => {
                let text = dependent.text();
                if self.question_symbols.iter().any(|q| text.contains(q)) {
                    DependencyLabel::SentenceEndQuestion
                } else {
                    DependencyLabel::SentenceEnd
                }
            }
        };

        if self.config.head_whitelist.contains(&head)
            && self.config.label_whitelist.contains(&label)
        {
            Some(RoleSignature { head, label })
        } else {
            None
        }
    }

    fn normalize(&self, pos: PartOfSpeech) -> PartOfSpeech {
        if self.config.noun_like.contains(&pos) {
            PartOfSpeech::Noun
        } else {
            pos
        }
    }
}
