//! Chunk splitting — decomposes a chunk's surface text into its trailing
//! function suffix, its content string, and its decorative symbols.

use rustc_hash::FxHashSet;
use std::path::Path;

use crate::schema::chunk::{Chunk, PartOfSpeech};

/// The two configured symbol lists: general symbols stripped as
/// decoration, and question markers used only for sentence-end labeling.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    pub symbols: Vec<String>,
    pub question_symbols: Vec<String>,
}

impl SymbolTable {
    pub fn new(symbols: Vec<String>, question_symbols: Vec<String>) -> Self {
        Self {
            symbols,
            question_symbols,
        }
    }

    /// Load `symbols.txt` and `question_symbols.txt` from a directory.
    /// Both files are newline-delimited; blank lines are ignored. A
    /// missing file is fatal.
    pub fn load_from_dir(dir: &Path) -> std::io::Result<Self> {
        Ok(Self {
            symbols: read_lines(&dir.join("symbols.txt"))?,
            question_symbols: read_lines(&dir.join("question_symbols.txt"))?,
        })
    }
}

fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

/// The three parts of a split chunk. `function_suffix` is always present
/// as a string; empty means no function suffix was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitParts {
    pub function_suffix: String,
    pub content: String,
    pub symbols: String,
}

/// Splits chunks into (function suffix, content, symbols).
#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    symbols: Vec<String>,
    function_pos: FxHashSet<PartOfSpeech>,
}

impl ChunkSplitter {
    pub fn new(symbols: Vec<String>) -> Self {
        Self {
            symbols,
            function_pos: [
                PartOfSpeech::Aux,
                PartOfSpeech::Cconj,
                PartOfSpeech::Sconj,
                PartOfSpeech::Adp,
                PartOfSpeech::Part,
            ]
            .into_iter()
            .collect(),
        }
    }

    /// Decompose a chunk.
    ///
    /// The function suffix is the trailing contiguous run of function-POS
    /// tokens after the head: a content token after the head clears the
    /// accumulator, so function tokens later followed by content never
    /// become part of the suffix. This reset is intentional and must not
    /// be "optimized" into a plain tail scan.
    pub fn split(&self, chunk: &Chunk) -> SplitParts {
        let text = chunk.text();

        // Strip each configured symbol once, in first-found order.
        let mut working = text.clone();
        let mut symbols = String::new();
        for symbol in &self.symbols {
            if let Some(pos) = working.find(symbol.as_str()) {
                working.replace_range(pos..pos + symbol.len(), "");
                symbols.push_str(symbol);
            }
        }

        let mut accumulator: Vec<String> = Vec::new();
        let mut head_seen = false;
        for (i, token) in chunk.tokens.iter().enumerate() {
            if i == chunk.head {
                head_seen = true;
            } else if self.symbols.iter().any(|s| token.text.contains(s)) {
                // Symbol tokens count as neither content nor function.
                continue;
            } else if self.function_pos.contains(&token.pos) && head_seen {
                accumulator.push(self.strip_symbols(&token.text));
            } else if !self.function_pos.contains(&token.pos) {
                accumulator.clear();
            }
        }
        let function_suffix: String = accumulator.concat();

        // Content: the symbol-stripped text with the suffix removed once,
        // at its last occurrence.
        let content = if function_suffix.is_empty() {
            working
        } else if let Some(pos) = working.rfind(&function_suffix) {
            let mut content = working;
            content.replace_range(pos..pos + function_suffix.len(), "");
            content
        } else {
            working
        };

        SplitParts {
            function_suffix,
            content,
            symbols,
        }
    }

    fn strip_symbols(&self, text: &str) -> String {
        let mut stripped = text.to_string();
        for symbol in &self.symbols {
            stripped = stripped.replace(symbol.as_str(), "");
        }
        stripped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::chunk::Token;

    fn chunk(tokens: &[(&str, PartOfSpeech)], head: usize) -> Chunk {
        Chunk {
            tokens: tokens
                .iter()
                .enumerate()
                .map(|(i, (text, pos))| Token {
                    text: text.to_string(),
                    pos: *pos,
                    index: i,
                })
                .collect(),
            head,
            left_deps: vec![],
        }
    }

    fn splitter() -> ChunkSplitter {
        ChunkSplitter::new(vec!["。".to_string(), "、".to_string(), "？".to_string()])
    }

    #[test]
    fn splits_verb_chunk_with_suffix_and_symbol() {
        let parts = splitter().split(&chunk(
            &[
                ("行", PartOfSpeech::Verb),
                ("き", PartOfSpeech::Aux),
                ("ます", PartOfSpeech::Aux),
                ("。", PartOfSpeech::Punct),
            ],
            0,
        ));
        assert_eq!(parts.function_suffix, "きます");
        assert_eq!(parts.content, "行");
        assert_eq!(parts.symbols, "。");
    }

    #[test]
    fn splits_topic_chunk() {
        let parts = splitter().split(&chunk(
            &[("今日", PartOfSpeech::Noun), ("は", PartOfSpeech::Adp)],
            0,
        ));
        assert_eq!(parts.function_suffix, "は");
        assert_eq!(parts.content, "今日");
        assert_eq!(parts.symbols, "");
    }

    #[test]
    fn no_suffix_yields_empty_string_not_absent() {
        let parts = splitter().split(&chunk(&[("犬", PartOfSpeech::Noun)], 0));
        assert_eq!(parts.function_suffix, "");
        assert_eq!(parts.content, "犬");
    }

    #[test]
    fn function_tokens_before_head_are_ignored() {
        let parts = splitter().split(&chunk(
            &[
                ("が", PartOfSpeech::Adp),
                ("走る", PartOfSpeech::Verb),
                ("よ", PartOfSpeech::Part),
            ],
            1,
        ));
        assert_eq!(parts.function_suffix, "よ");
    }

    #[test]
    fn content_token_after_head_resets_accumulator() {
        // Only the trailing run survives; function tokens followed by a
        // content token are discarded.
        let parts = splitter().split(&chunk(
            &[
                ("歩い", PartOfSpeech::Verb),
                ("て", PartOfSpeech::Sconj),
                ("行っ", PartOfSpeech::Verb),
                ("た", PartOfSpeech::Aux),
            ],
            0,
        ));
        assert_eq!(parts.function_suffix, "た");
    }

    #[test]
    fn symbol_tokens_do_not_reset_accumulator() {
        let parts = splitter().split(&chunk(
            &[
                ("行く", PartOfSpeech::Verb),
                ("よ", PartOfSpeech::Part),
                ("。", PartOfSpeech::Punct),
            ],
            0,
        ));
        assert_eq!(parts.function_suffix, "よ");
        assert_eq!(parts.symbols, "。");
        assert_eq!(parts.content, "行く");
    }

    #[test]
    fn multiple_symbols_concatenate_in_found_order() {
        let parts = splitter().split(&chunk(
            &[
                ("行く", PartOfSpeech::Verb),
                ("、", PartOfSpeech::Punct),
                ("。", PartOfSpeech::Punct),
            ],
            0,
        ));
        // Symbols concatenate in configured scan order, not surface order.
        assert_eq!(parts.symbols, "。、");
        assert_eq!(parts.content, "行く");
    }

    #[test]
    fn question_symbol_stripped_when_configured_as_symbol() {
        let parts = splitter().split(&chunk(
            &[
                ("行", PartOfSpeech::Verb),
                ("き", PartOfSpeech::Aux),
                ("ます", PartOfSpeech::Aux),
                ("か", PartOfSpeech::Part),
                ("？", PartOfSpeech::Punct),
            ],
            0,
        ));
        assert_eq!(parts.function_suffix, "きますか");
        assert_eq!(parts.content, "行");
        assert_eq!(parts.symbols, "？");
    }

    #[test]
    fn resplit_of_reassembled_parts_is_stable() {
        // content + suffix + symbols re-chunked the same way splits back
        // into the same three parts.
        let original = chunk(
            &[
                ("行", PartOfSpeech::Verb),
                ("き", PartOfSpeech::Aux),
                ("ます", PartOfSpeech::Aux),
                ("。", PartOfSpeech::Punct),
            ],
            0,
        );
        let parts = splitter().split(&original);
        let reassembled = format!("{}{}{}", parts.content, parts.function_suffix, parts.symbols);
        assert_eq!(reassembled, original.text());
        assert_eq!(splitter().split(&original), parts);
    }

    #[test]
    fn load_fixture_symbol_table() {
        let table = SymbolTable::load_from_dir(Path::new("tests/fixtures/symbols")).unwrap();
        assert!(table.symbols.contains(&"。".to_string()));
        assert!(table.question_symbols.contains(&"？".to_string()));
    }

    #[test]
    fn missing_symbol_file_is_fatal() {
        assert!(SymbolTable::load_from_dir(Path::new("tests/fixtures/no_such_dir")).is_err());
    }
}
