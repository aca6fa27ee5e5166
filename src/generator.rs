//! End-to-end pattern generation: build, collect, mark, synthesise.

use log::{debug, info};

use crate::blocked::BlockedPrefixSet;
use crate::synth::{PatternSynthesizer, DEAD_END};
use crate::trie::{PrefixTrie, TrieStats};

/// Options that govern pattern generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratorConfig {
    /// Maximum number of characters the pattern spells out explicitly.
    pub max_length: usize,
    /// Escape pattern metacharacters found in the words (off by default).
    pub escape_literals: bool,
}

impl GeneratorConfig {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            ..Self::default()
        }
    }

    pub fn with_escape_literals(mut self, escape_literals: bool) -> Self {
        self.escape_literals = escape_literals;
        self
    }
}

/// Result of a generation run, with the trie summary for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub pattern: String,
    /// `None` when the accept list was empty and no trie was built.
    pub trie_stats: Option<TrieStats>,
    pub blocked_prefixes: usize,
}

/// Composes trie construction, block marking and synthesis.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternGenerator {
    config: GeneratorConfig,
}

impl PatternGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generate the pattern for the given word lists.
    pub fn generate<A, R>(&self, accept: &[A], reject: &[R]) -> String
    where
        A: AsRef<str>,
        R: AsRef<str>,
    {
        self.run(accept, reject).pattern
    }

    /// Like [`generate`](Self::generate), also returning trie statistics.
    pub fn run<A, R>(&self, accept: &[A], reject: &[R]) -> Generation
    where
        A: AsRef<str>,
        R: AsRef<str>,
    {
        info!(
            "Generating pattern for {} accept / {} reject words, max length {}",
            accept.len(),
            reject.len(),
            self.config.max_length
        );

        if accept.is_empty() {
            info!("Accept list is empty; emitting {}", DEAD_END);
            return Generation {
                pattern: DEAD_END.to_string(),
                trie_stats: None,
                blocked_prefixes: 0,
            };
        }

        let mut trie = match PrefixTrie::build(accept) {
            Some(trie) => trie,
            None => {
                return Generation {
                    pattern: DEAD_END.to_string(),
                    trie_stats: None,
                    blocked_prefixes: 0,
                }
            }
        };

        let blocked = BlockedPrefixSet::collect(reject);
        trie.mark_blocked(&blocked);

        let stats = trie.stats();
        debug!("Trie stats: {:?}", stats);

        let pattern = PatternSynthesizer::new(self.config.max_length)
            .with_escape_literals(self.config.escape_literals)
            .synthesize_root(&trie);

        Generation {
            pattern,
            trie_stats: Some(stats),
            blocked_prefixes: blocked.len(),
        }
    }
}

/// Generate a pattern with default options.
pub fn generate<A, R>(accept: &[A], reject: &[R], max_length: usize) -> String
where
    A: AsRef<str>,
    R: AsRef<str>,
{
    PatternGenerator::new(GeneratorConfig::new(max_length)).generate(accept, reject)
}
