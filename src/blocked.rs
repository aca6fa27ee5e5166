use std::collections::BTreeMap;

use log::debug;

/// Position inside a [`BlockedPrefixSet`]: one distinct blocked prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrefixState(usize);

/// Every prefix of every reject word, the empty prefix included.
///
/// Stored as a character trie over the reject words, so each distinct
/// prefix costs one node rather than its own string. The empty string is a
/// member exactly when at least one reject word was collected. Prefixes are
/// cut at character boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedPrefixSet {
    nodes: Vec<BTreeMap<char, PrefixState>>,
    words: usize,
}

impl Default for BlockedPrefixSet {
    fn default() -> Self {
        Self {
            nodes: vec![BTreeMap::new()],
            words: 0,
        }
    }
}

impl BlockedPrefixSet {
    /// Collect the prefixes of all `words`.
    pub fn collect<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();

        for word in words {
            set.words += 1;
            let mut current = PrefixState(0);
            for ch in word.as_ref().chars() {
                current = match set.nodes[current.0].get(&ch) {
                    Some(&next) => next,
                    None => {
                        let next = PrefixState(set.nodes.len());
                        set.nodes.push(BTreeMap::new());
                        set.nodes[current.0].insert(ch, next);
                        next
                    }
                };
            }
        }

        debug!(
            "Collected {} blocked prefixes from {} reject words",
            set.len(),
            set.words
        );
        set
    }

    /// State of the empty prefix, `None` when nothing was collected.
    pub fn root(&self) -> Option<PrefixState> {
        (self.words > 0).then_some(PrefixState(0))
    }

    /// Extend the prefix at `state` by one character.
    pub fn step(&self, state: PrefixState, ch: char) -> Option<PrefixState> {
        self.nodes[state.0].get(&ch).copied()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.root()
            .and_then(|root| prefix.chars().try_fold(root, |state, ch| self.step(state, ch)))
            .is_some()
    }

    /// Number of distinct prefixes.
    pub fn len(&self) -> usize {
        if self.words == 0 {
            0
        } else {
            self.nodes.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_reject_words_gives_empty_set() {
        let set = BlockedPrefixSet::collect(Vec::<String>::new());
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(!set.contains(""));
        assert!(set.root().is_none());
    }

    #[test]
    fn includes_empty_and_full_word() {
        let set = BlockedPrefixSet::collect(vec!["abc"]);
        assert_eq!(set.len(), 4);
        for prefix in ["", "a", "ab", "abc"] {
            assert!(set.contains(prefix), "{prefix:?} should be blocked");
        }
        assert!(!set.contains("abcd"));
        assert!(!set.contains("b"));
    }

    #[test]
    fn merges_shared_prefixes() {
        let set = BlockedPrefixSet::collect(vec!["ab", "ac", "ab"]);
        // "", "a", "ab", "ac"
        assert_eq!(set.len(), 4);
        assert!(set.contains("ac"));
        assert!(!set.contains("b"));
    }

    #[test]
    fn empty_reject_word_contributes_only_empty_prefix() {
        let set = BlockedPrefixSet::collect(vec![""]);
        assert_eq!(set.len(), 1);
        assert!(set.contains(""));
        assert!(!set.contains("a"));
    }

    #[test]
    fn cuts_at_character_boundaries() {
        let set = BlockedPrefixSet::collect(vec!["ñu"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains("ñ"));
        assert!(set.contains("ñu"));
    }

    #[test]
    fn steps_follow_prefixes() {
        let set = BlockedPrefixSet::collect(vec!["ab"]);
        let root = set.root().unwrap();
        let a = set.step(root, 'a').unwrap();
        assert!(set.step(a, 'b').is_some());
        assert!(set.step(a, 'c').is_none());
        assert!(set.step(root, 'b').is_none());
    }

    #[test]
    fn long_reject_word_costs_one_node_per_char() {
        let long = "r".repeat(200_000);
        let set = BlockedPrefixSet::collect(vec![long.as_str()]);
        assert_eq!(set.len(), 200_001);
        assert!(set.contains(&long));
        assert!(set.contains(&long[..123_456]));
        assert!(!set.contains(&format!("{long}r")));
    }
}
