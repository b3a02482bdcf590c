/// Characterize — runs the full pipeline: train every character from its
/// serif CSV, then rewrite every base sentence in each character's voice.
///
/// Usage: characterize --serifs <dir> --symbols <dir> --base <file> --lexicon <lexicon.ron> --out <dir> [--seed <n>]
use std::env;
use std::path::Path;
use std::process;

use serifu_engine::core::chunker::{CachingChunker, StaticChunker};
use serifu_engine::core::pipeline::StylePipeline;

const USAGE: &str = "Usage: characterize --serifs <dir> --symbols <dir> --base <file> --lexicon <lexicon.ron> --out <dir> [--seed <n>]";

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut serifs = None;
    let mut symbols = None;
    let mut base = None;
    let mut lexicon = None;
    let mut out = None;
    let mut seed = 0u64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--serifs" => {
                i += 1;
                serifs = Some(args[i].clone());
            }
            "--symbols" => {
                i += 1;
                symbols = Some(args[i].clone());
            }
            "--base" => {
                i += 1;
                base = Some(args[i].clone());
            }
            "--lexicon" => {
                i += 1;
                lexicon = Some(args[i].clone());
            }
            "--out" => {
                i += 1;
                out = Some(args[i].clone());
            }
            "--seed" => {
                i += 1;
                seed = args[i].parse().unwrap_or_else(|_| {
                    eprintln!("Error: --seed must be an unsigned integer");
                    process::exit(1);
                });
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

    let serifs_dir = require(serifs, "--serifs");
    let symbols_dir = require(symbols, "--symbols");
    let base_path = require(base, "--base");
    let lexicon_path = require(lexicon, "--lexicon");
    let out_dir = require(out, "--out");

    let chunker = StaticChunker::load_from_ron(Path::new(&lexicon_path)).unwrap_or_else(|e| {
        eprintln!("Error loading lexicon '{}': {}", lexicon_path, e);
        process::exit(1);
    });
    println!("Lexicon loaded: {} analyzed sentences", chunker.len());

    let mut pipeline = StylePipeline::builder()
        .serifs_dir(&serifs_dir)
        .symbols_dir(&symbols_dir)
        .base_sentences_path(&base_path)
        .seed(seed)
        .chunker(Box::new(CachingChunker::new(chunker)))
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error building pipeline: {}", e);
            process::exit(1);
        });

    println!(
        "Characterizing for {} character(s)...",
        pipeline.repository().len()
    );

    pipeline.run(Path::new(&out_dir)).unwrap_or_else(|e| {
        eprintln!("Error running pipeline: {}", e);
        process::exit(1);
    });

    for character in pipeline.repository().characters() {
        println!(
            "  {} → {}",
            character.name,
            Path::new(&out_dir).join(format!("{}.csv", character.name)).display()
        );
    }
}

fn require(value: Option<String>, flag: &str) -> String {
    value.unwrap_or_else(|| {
        eprintln!("Error: {} is required", flag);
        eprintln!("{}", USAGE);
        process::exit(1);
    })
}
