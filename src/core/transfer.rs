//! Style transfer — rewrites a neutral sentence in a character's voice by
//! chunk-wise rule lookup and frequency-weighted suffix sampling.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;

use crate::core::chunker::{ChunkError, Chunker};
use crate::core::role::RoleResolver;
use crate::core::splitter::ChunkSplitter;
use crate::schema::character::Character;
use crate::schema::chunk::Chunk;
use crate::schema::rule::{FreqTable, RuleKey};

/// Applies a trained character's tables to new neutral sentences.
pub struct StyleTransformer<'a> {
    chunker: &'a dyn Chunker,
    resolver: &'a RoleResolver,
    splitter: &'a ChunkSplitter,
}

impl<'a> StyleTransformer<'a> {
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

    /// Rewrite one sentence. Walks the same dependency edges the learner
    /// walked, rewrites each dependent chunk (or passes it through on a
    /// rule miss), and reassembles the pieces in original token order.
    ///
    /// Sampling draws from the caller's `rng`; a fixed seed makes the
    /// output reproducible.
    pub fn transform(
        &self,
        character: &Character,
        sentence: &str,
        rng: &mut StdRng,
    ) -> Result<String, ChunkError> {
        let analysis = self.chunker.chunk(sentence)?;

        // Edges are visited per governing chunk, not left to right, so
        // each piece carries the token index it reassembles at.
        let mut pieces: Vec<(usize, String)> = Vec::new();
        for edge in analysis.edges() {
            let dependent = &analysis.chunks[edge.dependent];
            let governor = edge.governor.map(|g| &analysis.chunks[g]);
            pieces.push((edge.sort_index, self.rewrite(character, dependent, governor, rng)));
        }

        pieces.sort_by_key(|(index, _)| *index);
        Ok(pieces.into_iter().map(|(_, text)| text).collect())
    }

    /// Rewrite a single chunk, falling back to its unmodified surface
    /// text when the role is invalid or no rule matches.
    fn rewrite(
        &self,
        character: &Character,
        dependent: &Chunk,
        governor: Option<&Chunk>,
        rng: &mut StdRng,
    ) -> String {
        let Some(role) = self.resolver.resolve(dependent, governor) else {
            return dependent.text();
        };

        let parts = self.splitter.split(dependent);
        let key = RuleKey {
            neutral_suffix: parts.function_suffix,
            role,
        };
        let Some(candidates) = character.rules.candidates(&key) else {
            return dependent.text();
        };

        match pick_suffix(candidates, &character.freqs, rng) {
            Some(suffix) => format!("{}{}{}", parts.content, suffix, parts.symbols),
            None => dependent.text(),
        }
    }
}

/// Draw one candidate suffix, weighted by its observed frequency.
fn pick_suffix(candidates: &[String], freqs: &FreqTable, rng: &mut StdRng) -> Option<String> {
    let weights: Vec<u32> = candidates
        .iter()
        .map(|c| freqs.get(c).copied().unwrap_or(0))
        .collect();
    let dist = WeightedIndex::new(&weights).ok()?;
    Some(candidates[dist.sample(rng)].clone())
}
