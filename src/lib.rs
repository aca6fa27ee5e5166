//! trie_regex library
//!
//! Builds a single pattern that spells out the accept words up to a maximum
//! length while steering around prefixes of the reject words: a prefix trie
//! over the accept words, blocked-prefix marking from the reject words, and
//! a renderer that turns the marked trie into literals, groups, alternations
//! and `.*` wildcards.

pub mod blocked;
pub mod generator;
pub mod pattern;
pub mod problem;
pub mod synth;
pub mod trie;

pub use blocked::{BlockedPrefixSet, PrefixState};
pub use generator::{generate, Generation, GeneratorConfig, PatternGenerator};
pub use pattern::{Pattern, PatternError, MAX_NESTING};
pub use problem::{
    read_solution, write_solution, write_solution_file, Problem, ProblemError, SOLUTION_HEADER,
};
pub use synth::{synthesize, PatternSynthesizer, DEAD_END, WILDCARD};
pub use trie::{NodeId, PrefixTrie, PrefixTrieNode, TrieStats};
