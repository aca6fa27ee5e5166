//! Prefix trie over the accept words.

mod prefix_trie;

pub use self::prefix_trie::{NodeId, PrefixTrie, PrefixTrieNode, TrieStats};
