//! The full style-transfer pipeline: load characters, symbols, and base
//! sentences; train every character; rewrite every base sentence per
//! character; write one output CSV per character.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::core::chunker::{ChunkError, Chunker};
use crate::core::learner::RuleLearner;
use crate::core::role::RoleResolver;
use crate::core::splitter::{ChunkSplitter, SymbolTable};
use crate::core::transfer::StyleTransformer;
use crate::schema::character::{CharacterError, CharacterRepository};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("chunker error: {0}")]
    Chunk(#[from] ChunkError),
    #[error("character error: {0}")]
    Character(#[from] CharacterError),
    #[error("no chunker configured")]
    MissingChunker,
    #[error("missing required input: {0}")]
    MissingInput(&'static str),
}

/// Rewritten output for one character: one (base, characterized) line per
/// base sentence.
#[derive(Debug, Clone)]
pub struct CharacterOutput {
    pub name: String,
    pub lines: Vec<(String, String)>,
}

/// The top-level pipeline. Built via `StylePipeline::builder()`.
pub struct StylePipeline {
    repository: CharacterRepository,
    base_sentences: Vec<String>,
    resolver: RoleResolver,
    splitter: ChunkSplitter,
    chunker: Box<dyn Chunker>,
    seed: u64,
    trained: bool,
}

/// Builder for constructing a `StylePipeline`. Inputs load from the
/// configured paths; each can also be provided directly for testing
/// without files.
pub struct StylePipelineBuilder {
    serifs_dir: Option<String>,
    symbols_dir: Option<String>,
    base_sentences_path: Option<String>,
    seed: u64,
    chunker: Option<Box<dyn Chunker>>,
    /// Directly provided characters (for testing without files).
    repository: Option<CharacterRepository>,
    /// Directly provided symbol lists (for testing without files).
    symbols: Option<SymbolTable>,
    /// Directly provided base sentences (for testing without files).
    base_sentences: Option<Vec<String>>,
}

impl StylePipeline {
    pub fn builder() -> StylePipelineBuilder {
        StylePipelineBuilder {
            serifs_dir: None,
            symbols_dir: None,
            base_sentences_path: None,
            seed: 0,
            chunker: None,
            repository: None,
            symbols: None,
            base_sentences: None,
        }
    }

    /// Train every character's rule and frequency tables. Training fully
    /// completes before any transformation reads the tables; transfer
    /// never sees partial rules.
    pub fn train_all(&mut self) -> Result<(), PipelineError> {
        let learner = RuleLearner::new(self.chunker.as_ref(), &self.resolver, &self.splitter);

        let mut results = Vec::with_capacity(self.repository.len());
        for character in self.repository.characters() {
            let (rules, freqs) = learner.learn(character)?;
            log::info!(
                "trained '{}': {} rules, {} distinct suffixes",
                character.name,
                rules.len(),
                freqs.len()
            );
            results.push((rules, freqs));
        }

        for (character, (rules, freqs)) in
            self.repository.characters_mut().iter_mut().zip(results)
        {
            character.rules = rules;
            character.freqs = freqs;
        }
        self.trained = true;
        Ok(())
    }

    /// Rewrite every base sentence for every character. Each character
    /// draws from its own deterministically derived sub-seed, so results
    /// do not depend on character ordering or interleaving.
    ///
    /// A sentence whose chunk analysis is unavailable degrades to its
    /// unmodified text: the pipeline always emits one line per input.
    pub fn transform_all(&mut self) -> Result<Vec<CharacterOutput>, PipelineError> {
        if !self.trained {
            self.train_all()?;
        }
        let transformer =
            StyleTransformer::new(self.chunker.as_ref(), &self.resolver, &self.splitter);

        let mut outputs = Vec::with_capacity(self.repository.len());
        for (index, character) in self.repository.characters().iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(
                self.seed.wrapping_add(index as u64 * 7919), // prime offset per character
            );

            let mut lines = Vec::with_capacity(self.base_sentences.len());
            for base in &self.base_sentences {
                let styled = match transformer.transform(character, base, &mut rng) {
                    Ok(styled) => styled,
                    Err(e) => {
                        log::warn!("passing '{}' through unchanged: {}", base, e);
                        base.clone()
                    }
                };
                lines.push((base.clone(), styled));
            }
            outputs.push(CharacterOutput {
                name: character.name.clone(),
                lines,
            });
        }
        Ok(outputs)
    }

    /// Run the whole pipeline and write `<name>.csv` per character into
    /// `output_dir`, one `base,characterized` line per base sentence.
    pub fn run(&mut self, output_dir: &Path) -> Result<(), PipelineError> {
        let outputs = self.transform_all()?;

        std::fs::create_dir_all(output_dir)?;
        for output in &outputs {
            let path = output_dir.join(format!("{}.csv", output.name));
            let mut file = std::fs::File::create(&path)?;
            for (base, styled) in &output.lines {
                writeln!(file, "{},{}", base, styled)?;
            }
            log::info!("wrote {} lines to {}", output.lines.len(), path.display());
        }
        Ok(())
    }

    pub fn repository(&self) -> &CharacterRepository {
        &self.repository
    }
}

impl StylePipelineBuilder {
    pub fn serifs_dir(mut self, path: &str) -> Self {
        self.serifs_dir = Some(path.to_string());
        self
    }

    pub fn symbols_dir(mut self, path: &str) -> Self {
        self.symbols_dir = Some(path.to_string());
        self
    }

    pub fn base_sentences_path(mut self, path: &str) -> Self {
        self.base_sentences_path = Some(path.to_string());
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn chunker(mut self, chunker: Box<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Provide characters directly (for testing without files).
    pub fn with_characters(mut self, repository: CharacterRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Provide symbol lists directly (for testing without files).
    pub fn with_symbols(mut self, symbols: SymbolTable) -> Self {
        self.symbols = Some(symbols);
        self
    }

    /// Provide base sentences directly (for testing without files).
    pub fn with_base_sentences(mut self, sentences: Vec<String>) -> Self {
        self.base_sentences = Some(sentences);
        self
    }

    pub fn build(self) -> Result<StylePipeline, PipelineError> {
        let chunker = self.chunker.ok_or(PipelineError::MissingChunker)?;

        let symbols = match self.symbols {
            Some(symbols) => symbols,
            None => {
                let dir = self
                    .symbols_dir
                    .ok_or(PipelineError::MissingInput("symbols directory"))?;
                SymbolTable::load_from_dir(Path::new(&dir))?
            }
        };

        let repository = match self.repository {
            Some(repository) => repository,
            None => {
                let dir = self
                    .serifs_dir
                    .ok_or(PipelineError::MissingInput("serifs directory"))?;
                CharacterRepository::load_from_dir(Path::new(&dir))?
            }
        };

        let base_sentences = match self.base_sentences {
            Some(sentences) => sentences,
            None => {
                let path = self
                    .base_sentences_path
                    .ok_or(PipelineError::MissingInput("base sentences file"))?;
                let contents = std::fs::read_to_string(&path)?;
                contents
                    .lines()
                    .map(|line| line.trim_end_matches('\r').to_string())
                    .filter(|line| !line.is_empty())
                    .collect()
            }
        };

        let resolver = RoleResolver::new(symbols.question_symbols.clone());
        let splitter = ChunkSplitter::new(symbols.symbols.clone());

        Ok(StylePipeline {
            repository,
            base_sentences,
            resolver,
            splitter,
            chunker,
            seed: self.seed,
            trained: false,
        })
    }
}
