//! Arena-backed prefix trie with per-node terminal and blocked flags.
//!
//! Nodes live in a single `Vec` and refer to their children by [`NodeId`].
//! Every node has exactly one parent (the root has none), so the arena is a
//! plain tree: no sharing, no cycles. Children are kept in a `BTreeMap` so
//! iteration is always in ascending character order.

use std::collections::BTreeMap;

use log::{debug, trace};
use serde::Serialize;

use crate::blocked::BlockedPrefixSet;

/// Handle of a node inside a [`PrefixTrie`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// One position along some prefix of the accept words.
#[derive(Debug, Clone, Default)]
pub struct PrefixTrieNode {
    children: BTreeMap<char, NodeId>,
    is_terminal: bool,
    blocked: bool,
}

impl PrefixTrieNode {
    /// True when some accept word ends exactly here.
    pub fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// True when the path to this node is a blocked prefix.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Children in ascending character order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = (char, NodeId)> + '_ {
        self.children.iter().map(|(&ch, &id)| (ch, id))
    }

    pub fn child(&self, ch: char) -> Option<NodeId> {
        self.children.get(&ch).copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Summary counters for a built (and possibly marked) trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TrieStats {
    pub nodes: usize,
    pub terminals: usize,
    pub blocked: usize,
    /// Length in characters of the longest root-to-node path.
    pub max_depth: usize,
}

/// Prefix trie over the accept words.
#[derive(Debug, Clone)]
pub struct PrefixTrie {
    nodes: Vec<PrefixTrieNode>,
}

impl PrefixTrie {
    /// Build a trie from the accept words.
    ///
    /// Returns `None` for an empty word sequence: no words means no root,
    /// not an empty root. The empty word marks the root itself terminal and
    /// repeated words only re-set the terminal flag.
    pub fn build<I, S>(words: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = words.into_iter().peekable();
        words.peek()?;

        let mut trie = Self {
            nodes: vec![PrefixTrieNode::default()],
        };
        let mut inserted = 0usize;
        for word in words {
            trie.insert(word.as_ref());
            inserted += 1;
        }

        debug!(
            "Built prefix trie from {} words with {} nodes",
            inserted,
            trie.nodes.len()
        );
        Some(trie)
    }

    /// Insert one word, creating nodes for every character not yet present.
    pub fn insert(&mut self, word: &str) {
        let mut current = self.root();
        for ch in word.chars() {
            current = match self.nodes[current.0].children.get(&ch) {
                Some(&next) => next,
                None => {
                    let next = NodeId(self.nodes.len());
                    self.nodes.push(PrefixTrieNode::default());
                    self.nodes[current.0].children.insert(ch, next);
                    next
                }
            };
        }
        self.nodes[current.0].is_terminal = true;
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrow a node by handle.
    ///
    /// Handles are only ever produced by this trie, so indexing cannot miss.
    pub fn node(&self, id: NodeId) -> &PrefixTrieNode {
        &self.nodes[id.0]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A built trie always has its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node reached by walking `path` from the root.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        path.chars()
            .try_fold(self.root(), |id, ch| self.node(id).child(ch))
    }

    /// True when `word` was inserted as a whole word.
    pub fn contains(&self, word: &str) -> bool {
        self.find(word)
            .map_or(false, |id| self.node(id).is_terminal())
    }

    /// Tag every node whose path string is in `blocked`.
    ///
    /// Walks this trie and the blocked-prefix trie in lockstep over an
    /// explicit stack: each node carries the blocked state of its path, so
    /// membership costs one child lookup per node and very long words
    /// cannot exhaust the call stack. Each node is visited exactly once and
    /// its flag is overwritten, which makes repeated marking idempotent.
    pub fn mark_blocked(&mut self, blocked: &BlockedPrefixSet) {
        let mut stack = vec![(self.root(), blocked.root())];
        let mut marked = 0usize;

        while let Some((id, state)) = stack.pop() {
            let node = &mut self.nodes[id.0];
            node.blocked = state.is_some();
            if node.blocked {
                marked += 1;
                trace!("Blocked trie node {}", id.0);
            }

            // Reverse push keeps the visiting order ascending.
            stack.extend(node.children.iter().rev().map(|(&ch, &child)| {
                (child, state.and_then(|state| blocked.step(state, ch)))
            }));
        }

        debug!("Marked {} of {} trie nodes as blocked", marked, self.nodes.len());
    }

    /// Count nodes, terminals, blocked nodes and the deepest path.
    pub fn stats(&self) -> TrieStats {
        let mut stats = TrieStats {
            nodes: self.nodes.len(),
            ..TrieStats::default()
        };
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            if node.is_terminal {
                stats.terminals += 1;
            }
            if node.blocked {
                stats.blocked += 1;
            }
            stats.max_depth = stats.max_depth.max(depth);
            stack.extend(node.children().map(|(_, child)| (child, depth + 1)));
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn empty_word_list_has_no_root() {
        let empty: Vec<String> = vec![];
        assert!(PrefixTrie::build(&empty).is_none());
    }

    #[test]
    fn shares_common_prefixes() {
        let trie = PrefixTrie::build(words(&["ab", "ac"])).unwrap();
        // root, a, b, c
        assert_eq!(trie.len(), 4);

        let root = trie.node(trie.root());
        assert_eq!(root.child_count(), 1);
        assert!(!root.is_terminal());

        let a = trie.find("a").unwrap();
        let keys: Vec<char> = trie.node(a).children().map(|(ch, _)| ch).collect();
        assert_eq!(keys, vec!['b', 'c']);
        assert!(trie.contains("ab"));
        assert!(trie.contains("ac"));
        assert!(!trie.contains("a"));
    }

    #[test]
    fn repeated_words_are_idempotent() {
        let once = PrefixTrie::build(words(&["abc"])).unwrap();
        let twice = PrefixTrie::build(words(&["abc", "abc"])).unwrap();
        assert_eq!(once.len(), twice.len());
        assert_eq!(once.stats(), twice.stats());
    }

    #[test]
    fn empty_word_marks_root_terminal() {
        let trie = PrefixTrie::build(words(&[""])).unwrap();
        assert_eq!(trie.len(), 1);
        assert!(trie.node(trie.root()).is_terminal());
        assert!(trie.contains(""));
    }

    #[test]
    fn children_iterate_in_sorted_order() {
        let trie = PrefixTrie::build(words(&["z", "m", "a", "q"])).unwrap();
        let keys: Vec<char> = trie.node(trie.root()).children().map(|(ch, _)| ch).collect();
        assert_eq!(keys, vec!['a', 'm', 'q', 'z']);
    }

    #[test]
    fn marks_nodes_on_blocked_paths() {
        let mut trie = PrefixTrie::build(words(&["ab", "ac", "b"])).unwrap();
        let blocked = BlockedPrefixSet::collect(words(&["ab"]));
        trie.mark_blocked(&blocked);

        assert!(trie.node(trie.root()).is_blocked());
        assert!(trie.node(trie.find("a").unwrap()).is_blocked());
        assert!(trie.node(trie.find("ab").unwrap()).is_blocked());
        assert!(!trie.node(trie.find("ac").unwrap()).is_blocked());
        assert!(!trie.node(trie.find("b").unwrap()).is_blocked());
        assert_eq!(trie.stats().blocked, 3);
    }

    #[test]
    fn empty_reject_list_blocks_nothing() {
        let mut trie = PrefixTrie::build(words(&["ab", "ac"])).unwrap();
        let blocked = BlockedPrefixSet::collect(Vec::<String>::new());
        trie.mark_blocked(&blocked);
        assert_eq!(trie.stats().blocked, 0);
    }

    #[test]
    fn marks_multibyte_paths_by_character() {
        let mut trie = PrefixTrie::build(words(&["éa", "éb"])).unwrap();
        let blocked = BlockedPrefixSet::collect(words(&["é"]));
        trie.mark_blocked(&blocked);
        assert!(trie.node(trie.find("é").unwrap()).is_blocked());
        assert!(!trie.node(trie.find("éa").unwrap()).is_blocked());
    }

    #[test]
    fn marks_very_deep_tries_without_recursion() {
        let long = "a".repeat(200_000);
        let mut trie = PrefixTrie::build(vec![long.clone()]).unwrap();
        let blocked = BlockedPrefixSet::collect(vec![long[..10].to_string()]);
        trie.mark_blocked(&blocked);

        let stats = trie.stats();
        assert_eq!(stats.max_depth, 200_000);
        assert_eq!(stats.blocked, 11);
    }

    #[test]
    fn marks_along_a_long_reject_word() {
        let long = "a".repeat(150_000);
        let mut trie = PrefixTrie::build(vec![format!("{long}b"), format!("{long}c")]).unwrap();
        let blocked = BlockedPrefixSet::collect(vec![long.clone()]);
        trie.mark_blocked(&blocked);

        let stats = trie.stats();
        assert_eq!(stats.blocked, 150_001);
        assert!(trie.node(trie.find(&long).unwrap()).is_blocked());
        let branch = trie.find(&format!("{long}b")).unwrap();
        assert!(!trie.node(branch).is_blocked());
    }

    #[test]
    fn stats_count_terminals_and_depth() {
        let trie = PrefixTrie::build(words(&["a", "ab", "abc", "x"])).unwrap();
        let stats = trie.stats();
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.terminals, 4);
        assert_eq!(stats.blocked, 0);
        assert_eq!(stats.max_depth, 3);
    }
}
