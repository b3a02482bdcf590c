/// Style Trainer — trains one character's rewrite rules from a serif CSV.
///
/// Usage: style_trainer --serifs <file.csv> --symbols <dir> --lexicon <lexicon.ron> --output <model.ron>
use std::env;
use std::path::Path;
use std::process;

use serifu_engine::core::chunker::StaticChunker;
use serifu_engine::core::learner::{save_model, RuleLearner, StyleModel};
use serifu_engine::core::role::RoleResolver;
use serifu_engine::core::splitter::{ChunkSplitter, SymbolTable};
use serifu_engine::schema::character::Character;

const USAGE: &str =
    "Usage: style_trainer --serifs <file.csv> --symbols <dir> --lexicon <lexicon.ron> --output <model.ron>";

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut serifs = None;
    let mut symbols_dir = None;
    let mut lexicon = None;
    let mut output = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--serifs" => {
                i += 1;
                serifs = Some(args[i].clone());
            }
            "--symbols" => {
                i += 1;
                symbols_dir = Some(args[i].clone());
            }
            "--lexicon" => {
                i += 1;
                lexicon = Some(args[i].clone());
            }
            "--output" => {
                i += 1;
                output = Some(args[i].clone());
            }
            "--help" | "-h" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    let serifs_path = require(serifs, "--serifs");
    let symbols_path = require(symbols_dir, "--symbols");
    let lexicon_path = require(lexicon, "--lexicon");
    let output_path = require(output, "--output");

    let symbols = SymbolTable::load_from_dir(Path::new(&symbols_path)).unwrap_or_else(|e| {
        eprintln!("Error loading symbols from '{}': {}", symbols_path, e);
        process::exit(1);
    });

    let chunker = StaticChunker::load_from_ron(Path::new(&lexicon_path)).unwrap_or_else(|e| {
        eprintln!("Error loading lexicon '{}': {}", lexicon_path, e);
        process::exit(1);
    });

    let name = Path::new(&serifs_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string();
    let contents = std::fs::read_to_string(&serifs_path).unwrap_or_else(|e| {
        eprintln!("Error reading serif file '{}': {}", serifs_path, e);
        process::exit(1);
    });
    let character = Character::parse_csv(&name, &contents).unwrap_or_else(|e| {
        eprintln!("Error parsing serif file '{}': {}", serifs_path, e);
        process::exit(1);
    });

    println!(
        "Training '{}' from {} sentence pairs...",
        name,
        character.training_pairs.len()
    );

    let resolver = RoleResolver::new(symbols.question_symbols.clone());
    let splitter = ChunkSplitter::new(symbols.symbols.clone());
    let learner = RuleLearner::new(&chunker, &resolver, &splitter);
    let (rules, freqs) = learner.learn(&character).unwrap_or_else(|e| {
        eprintln!("Error during training: {}", e);
        process::exit(1);
    });

    let observation_count: u32 = freqs.values().sum();
    println!(
        "Model trained: {} rules, {} distinct suffixes, {} observations",
        rules.len(),
        freqs.len(),
        observation_count
    );

    let model = StyleModel { name, rules, freqs };
    save_model(&model, Path::new(&output_path)).unwrap_or_else(|e| {
        eprintln!("Error saving model to '{}': {}", output_path, e);
        process::exit(1);
    });

    println!("Model saved to '{}'", output_path);
}

fn require(value: Option<String>, flag: &str) -> String {
    value.unwrap_or_else(|| {
        eprintln!("Error: {} is required", flag);
        eprintln!("{}", USAGE);
        process::exit(1);
    })
}
