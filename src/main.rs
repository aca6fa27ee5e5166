use log::{debug, info, warn};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use trie_regex::{write_solution_file, Generation, Pattern, Problem};

/// Derive a pattern matching the accept words and avoiding the reject words
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Problem file: header "<accept> <reject> <max length>", then the words
    #[arg(default_value = "input.txt")]
    input: PathBuf,

    /// Solution file to write
    #[arg(long, short, default_value = "output.txt")]
    output: PathBuf,

    /// Override the maximum length from the problem header
    #[arg(long)]
    max_length: Option<usize>,

    /// Escape ( ) | . * \ when they occur inside words
    #[arg(long)]
    escape_literals: bool,

    /// Check the pattern against both word lists and warn about mismatches.
    /// Patterns with groups nested more than 512 deep are skipped with a warning
    #[arg(long)]
    verify: bool,

    /// Optional JSON file with word counts, trie statistics and the pattern
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Verbose/info output (default: quiet)
    #[arg(long, short = 'v', alias = "info")]
    verbose: bool,

    /// Debug output
    #[arg(long)]
    debug: bool,

    /// Trace output
    #[arg(long)]
    trace: bool,
}

fn main() {
    let args = Args::parse();
    let log_level = if args.trace {
        "trace"
    } else if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "error"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("input: {}", args.input.display());
    info!("output: {}", args.output.display());

    if let Err(error) = run_pipeline(
        &args.input,
        &args.output,
        args.max_length,
        args.escape_literals,
        args.verify,
        args.report_json.as_deref(),
    ) {
        eprintln!("Pattern generation failed: {error:?}");
        std::process::exit(1);
    }
}

fn run_pipeline(
    input: &Path,
    output: &Path,
    max_length: Option<usize>,
    escape_literals: bool,
    verify: bool,
    report_json: Option<&Path>,
) -> Result<String> {
    let mut problem = Problem::from_path(input)
        .with_context(|| format!("Failed to read problem from {}", input.display()))?;

    if let Some(max_length) = max_length {
        info!(
            "Overriding max length {} with {}",
            problem.max_length, max_length
        );
        problem.max_length = max_length;
    }

    let generation = problem.generate(escape_literals);
    debug!("Pattern: {}", generation.pattern);

    write_solution_file(output, &generation.pattern)
        .with_context(|| format!("Failed to write solution to {}", output.display()))?;

    if verify {
        verify_pattern(&problem, &generation.pattern);
    }

    if let Some(report_path) = report_json {
        write_report(report_path, &problem, &generation)
            .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
    }

    Ok(generation.pattern)
}

/// Diagnostic only: mismatches are logged, never fatal.
fn verify_pattern(problem: &Problem, pattern: &str) {
    let parsed = match Pattern::parse(pattern) {
        Ok(parsed) => parsed,
        Err(error) => {
            warn!("[VERIFY] Pattern does not parse ({error}); try --escape-literals");
            return;
        }
    };

    let unmatched: Vec<&str> = problem
        .accept
        .iter()
        .filter(|word| !parsed.is_match(word))
        .map(String::as_str)
        .collect();
    let matched_rejects: Vec<&str> = problem
        .reject
        .iter()
        .filter(|word| parsed.is_match(word))
        .map(String::as_str)
        .collect();

    for word in &unmatched {
        warn!("[VERIFY] Accept word {word:?} is not matched");
    }
    for word in &matched_rejects {
        warn!("[VERIFY] Reject word {word:?} is matched");
    }
    info!(
        "[VERIFY] {} of {} accept words matched, {} of {} reject words matched",
        problem.accept.len() - unmatched.len(),
        problem.accept.len(),
        matched_rejects.len(),
        problem.reject.len()
    );
}

fn write_report(path: &Path, problem: &Problem, generation: &Generation) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let report = json!({
        "accept_words": problem.accept.len(),
        "reject_words": problem.reject.len(),
        "max_length": problem.max_length,
        "blocked_prefixes": generation.blocked_prefixes,
        "trie": generation.trie_stats,
        "pattern": generation.pattern,
        "pattern_length": generation.pattern.chars().count(),
    });
    let mut file = File::create(path)?;
    writeln!(file, "{}", serde_json::to_string_pretty(&report)?)?;
    info!("Report written to {}", path.display());
    Ok(())
}
