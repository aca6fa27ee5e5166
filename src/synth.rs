//! Conversion of a marked prefix trie into a pattern string.
//!
//! Each node is rendered by the first rule that applies:
//!
//! 1. depth equals the maximum length: nothing;
//! 2. node not blocked: [`WILDCARD`], children are not visited;
//! 3. blocked leaf: [`DEAD_END`];
//! 4. exactly one child: the child's character followed by the child;
//! 5. several children: `(c1…|c2…|…)` in ascending character order.
//!
//! Blocked nodes with children fall through to rules 4 and 5.
//!
//! The renderer walks the trie with an explicit stack of pending output
//! pieces instead of recursing, so the output for a word of any length is
//! produced without growing the call stack.

use log::{debug, trace};

use crate::trie::{NodeId, PrefixTrie};

/// Any continuation, including none.
pub const WILDCARD: &str = ".*";

/// Sentinel for a blocked dead end; also the whole pattern for an empty
/// accept list.
pub const DEAD_END: &str = "()";

/// Characters that carry meaning in the emitted pattern syntax.
const METACHARACTERS: [char; 6] = ['(', ')', '|', '.', '*', '\\'];

/// Renders pattern fragments from a marked trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSynthesizer {
    max_length: usize,
    escape_literals: bool,
}

enum Piece {
    Node(NodeId, usize),
    Literal(char),
    Text(&'static str),
}

impl PatternSynthesizer {
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            escape_literals: false,
        }
    }

    /// Prefix metacharacters in literals with `\`.
    pub fn with_escape_literals(mut self, escape_literals: bool) -> Self {
        self.escape_literals = escape_literals;
        self
    }

    /// Render the whole trie starting at its root.
    pub fn synthesize_root(&self, trie: &PrefixTrie) -> String {
        self.synthesize(trie, trie.root(), 0)
    }

    /// Render the continuations allowed from `node`, which sits at `depth`.
    pub fn synthesize(&self, trie: &PrefixTrie, node: NodeId, depth: usize) -> String {
        let mut out = String::new();
        let mut pending = vec![Piece::Node(node, depth)];

        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Text(text) => out.push_str(text),
                Piece::Literal(ch) => self.push_literal(&mut out, ch),
                Piece::Node(id, depth) => self.expand(trie, id, depth, &mut out, &mut pending),
            }
        }

        debug!(
            "Synthesised pattern of {} chars (max length {})",
            out.len(),
            self.max_length
        );
        out
    }

    /// Apply the decision rules to one node. Output that must follow the
    /// node is pushed onto `pending` in reverse order.
    fn expand(
        &self,
        trie: &PrefixTrie,
        id: NodeId,
        depth: usize,
        out: &mut String,
        pending: &mut Vec<Piece>,
    ) {
        if depth == self.max_length {
            return;
        }

        let node = trie.node(id);
        if !node.is_blocked() {
            trace!("node {} at depth {}: open", id.index(), depth);
            out.push_str(WILDCARD);
            return;
        }

        match node.child_count() {
            0 => {
                trace!("node {} at depth {}: dead end", id.index(), depth);
                out.push_str(DEAD_END);
            }
            1 => {
                if let Some((ch, child)) = node.children().next() {
                    pending.push(Piece::Node(child, depth + 1));
                    pending.push(Piece::Literal(ch));
                }
            }
            _ => {
                out.push('(');
                pending.push(Piece::Text(")"));
                for (position, (ch, child)) in node.children().rev().enumerate() {
                    if position > 0 {
                        pending.push(Piece::Text("|"));
                    }
                    pending.push(Piece::Node(child, depth + 1));
                    pending.push(Piece::Literal(ch));
                }
            }
        }
    }

    fn push_literal(&self, out: &mut String, ch: char) {
        if self.escape_literals && METACHARACTERS.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
}

/// Render `node` at `depth` with default settings.
pub fn synthesize(trie: &PrefixTrie, node: NodeId, depth: usize, max_length: usize) -> String {
    PatternSynthesizer::new(max_length).synthesize(trie, node, depth)
}
