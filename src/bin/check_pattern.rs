use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;

use trie_regex::{read_solution, Pattern};

/// Match a word list against a pattern, one JSON line per word
#[derive(Parser)]
struct Args {
    /// Pattern to check
    #[arg(long, short, conflicts_with = "solution")]
    pattern: Option<String>,

    /// Solution file whose second line holds the pattern
    #[arg(long, short)]
    solution: Option<PathBuf>,

    /// Word file, one word per line
    #[arg(long, short)]
    words: PathBuf,
}

#[derive(Serialize)]
struct MatchRecord<'a> {
    word: &'a str,
    matched: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let source = match (args.pattern, args.solution) {
        (Some(pattern), _) => pattern,
        (None, Some(path)) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            read_solution(BufReader::new(file))
                .with_context(|| format!("Failed to read solution from {}", path.display()))?
        }
        (None, None) => bail!("either --pattern or --solution is required"),
    };
    let pattern = Pattern::parse(&source)
        .with_context(|| format!("Failed to parse pattern {source:?}"))?;
    log::info!("Checking words against {}", pattern.as_str());

    let words = File::open(&args.words)
        .with_context(|| format!("Failed to open {}", args.words.display()))?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut matched = 0usize;
    let mut total = 0usize;
    for line in BufReader::new(words).lines() {
        let line = line?;
        let word = line.trim();
        let record = MatchRecord {
            word,
            matched: pattern.is_match(word),
        };
        if record.matched {
            matched += 1;
        }
        total += 1;
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;

    log::info!("{} of {} words matched", matched, total);
    Ok(())
}
