use serde::{Deserialize, Serialize};

/// Universal part-of-speech tags, as emitted by the dependency parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    Propn,
    Pron,
    Verb,
    Adj,
    Adv,
    Aux,
    Cconj,
    Sconj,
    Adp,
    Part,
    Det,
    Intj,
    Num,
    Punct,
    Sym,
    X,
}

/// A single parsed token with its sentence-global position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub pos: PartOfSpeech,
    /// Index of this token within the whole sentence.
    pub index: usize,
}

/// A minimal phrase unit (bunsetu): one content head token plus any
/// surrounding function tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub tokens: Vec<Token>,
    /// Index of the head token within `tokens`.
    pub head: usize,
    /// Sentence-global indices of tokens that depend on this chunk's head
    /// from the left, in surface order.
    pub left_deps: Vec<usize>,
}

impl Chunk {
    pub fn head_token(&self) -> &Token {
        &self.tokens[self.head]
    }

    /// Surface text of the chunk. Japanese has no inter-token spacing, so
    /// this is a plain concatenation.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// One dependency edge to walk during training and transfer: a dependent
/// chunk, its governing chunk (or none for the sentence-final chunk), and
/// the token index used to restore surface order on reassembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyEdge {
    pub dependent: usize,
    pub governor: Option<usize>,
    pub sort_index: usize,
}

/// An ordered sequence of chunks for one sentence, as produced by the
/// external dependency parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkedSentence {
    pub chunks: Vec<Chunk>,
}

impl ChunkedSentence {
    /// Index of the chunk containing the token at `token_index`.
    pub fn chunk_of(&self, token_index: usize) -> Option<usize> {
        self.chunks
            .iter()
            .position(|c| c.tokens.iter().any(|t| t.index == token_index))
    }

    /// Edges contributed by the chunk at `index`: the virtual sentence-end
    /// edge first when the chunk is sentence-final, then one edge per
    /// left-dependent token in surface order. Left-dependent references
    /// that point outside the analysis are dropped.
    pub fn chunk_edges(&self, index: usize) -> Vec<DependencyEdge> {
        let chunk = &self.chunks[index];
        let mut edges = Vec::new();

        if index + 1 == self.chunks.len() {
            edges.push(DependencyEdge {
                dependent: index,
                governor: None,
                sort_index: chunk.head_token().index,
            });
        }

        for &token_index in &chunk.left_deps {
            if let Some(dependent) = self.chunk_of(token_index) {
                edges.push(DependencyEdge {
                    dependent,
                    governor: Some(index),
                    sort_index: token_index,
                });
            }
        }

        edges
    }

    /// All dependency edges of the sentence, in traversal order. Shared by
    /// rule learning and style transfer so both walk identical edges.
    pub fn edges(&self) -> Vec<DependencyEdge> {
        (0..self.chunks.len())
            .flat_map(|i| self.chunk_edges(i))
            .collect()
    }
}
