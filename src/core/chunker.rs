//! Phrase-chunk adapter — the seam to the external dependency parser.
//!
//! The engine never parses text itself; it consumes `ChunkedSentence`
//! analyses through the `Chunker` trait. `StaticChunker` serves a RON dump
//! of pre-analyzed sentences, which doubles as the deterministic test
//! collaborator.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use crate::schema::chunk::ChunkedSentence;

#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("no chunk analysis for sentence: {0}")]
    UnknownSentence(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Produces the ordered chunk sequence for a sentence.
pub trait Chunker {
    fn chunk(&self, sentence: &str) -> Result<ChunkedSentence, ChunkError>;
}

/// A chunker backed by a fixed sentence → analysis table, loaded from a
/// RON file produced by dumping the external parser's output.
#[derive(Debug, Clone, Default)]
pub struct StaticChunker {
    analyses: HashMap<String, ChunkedSentence>,
}

impl StaticChunker {
    pub fn new(analyses: HashMap<String, ChunkedSentence>) -> Self {
        Self { analyses }
    }

    pub fn load_from_ron(path: &Path) -> Result<Self, ChunkError> {
        let contents = std::fs::read_to_string(path)?;
        let analyses: HashMap<String, ChunkedSentence> = ron::from_str(&contents)?;
        Ok(Self { analyses })
    }

    pub fn insert(&mut self, sentence: &str, analysis: ChunkedSentence) {
        self.analyses.insert(sentence.to_string(), analysis);
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }
}

impl Chunker for StaticChunker {
    fn chunk(&self, sentence: &str) -> Result<ChunkedSentence, ChunkError> {
        self.analyses
            .get(sentence)
            .cloned()
            .ok_or_else(|| ChunkError::UnknownSentence(sentence.to_string()))
    }
}

/// Memoizing wrapper around another chunker. Base sentences repeat across
/// characters, so analyses are worth caching.
pub struct CachingChunker<C> {
    inner: C,
    cache: Mutex<HashMap<String, ChunkedSentence>>,
}

impl<C: Chunker> CachingChunker<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl<C: Chunker> Chunker for CachingChunker<C> {
    fn chunk(&self, sentence: &str) -> Result<ChunkedSentence, ChunkError> {
        // A poisoned cache still holds valid entries; keep serving it.
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(sentence)
        {
            return Ok(hit.clone());
        }
        let analysis = self.inner.chunk(sentence)?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(sentence.to_string(), analysis.clone());
        Ok(analysis)
    }
}
