//! Anchored matcher for the pattern language emitted by the synthesiser.
//!
//! Supported syntax: literals, `\x` escapes, `.` (any one character),
//! `.*` (any run of characters), grouping with `(` `)` and alternation with
//! `|`. A `*` anywhere but directly after `.` is rejected. The empty group
//! `()` matches the empty string. Groups nest at most [`MAX_NESTING`] deep.
//!
//! Matching tracks the set of input positions reachable after each piece of
//! the expression, so alternations never backtrack exponentially.

use std::collections::BTreeSet;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

/// Deepest group nesting the parser accepts.
pub const MAX_NESTING: usize = 512;

/// Errors raised while parsing a pattern. Positions are character offsets.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("unexpected end of pattern at {position}")]
    UnexpectedEof { position: usize },
    #[error("unbalanced parenthesis at {position}")]
    UnbalancedParen { position: usize },
    #[error("unexpected {found:?} at {position}")]
    UnexpectedChar { position: usize, found: char },
    #[error("'*' at {position} does not follow '.'")]
    DanglingStar { position: usize },
    #[error("group at {position} nests deeper than {limit}")]
    TooDeep { position: usize, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Literal(char),
    Any,
    AnyRun,
    Concat(Vec<Expr>),
    Alternate(Vec<Expr>),
}

/// A parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    expr: Expr,
}

impl Pattern {
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        let mut input = ParseInput::new(source);
        let expr = parse_alternation(&mut input)?;
        match input.next() {
            None => Ok(Self {
                source: source.to_string(),
                expr,
            }),
            Some((position, ')')) => Err(PatternError::UnbalancedParen { position }),
            Some((position, found)) => Err(PatternError::UnexpectedChar { position, found }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the whole of `word` matches.
    pub fn is_match(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        let start = BTreeSet::from([0usize]);
        advance(&self.expr, &chars, start).contains(&chars.len())
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Positions reachable after matching `expr` from any of `starts`.
fn advance(expr: &Expr, input: &[char], starts: BTreeSet<usize>) -> BTreeSet<usize> {
    if starts.is_empty() {
        return starts;
    }
    match expr {
        Expr::Literal(ch) => starts
            .into_iter()
            .filter(|&pos| input.get(pos) == Some(ch))
            .map(|pos| pos + 1)
            .collect(),
        Expr::Any => starts
            .into_iter()
            .filter(|&pos| pos < input.len())
            .map(|pos| pos + 1)
            .collect(),
        Expr::AnyRun => {
            let first = starts.iter().next().copied().unwrap_or_default();
            (first..=input.len()).collect()
        }
        Expr::Concat(items) => items
            .iter()
            .fold(starts, |reached, item| advance(item, input, reached)),
        Expr::Alternate(branches) => branches
            .iter()
            .flat_map(|branch| advance(branch, input, starts.clone()))
            .collect(),
    }
}

struct ParseInput<'p> {
    input: Peekable<CharIndices<'p>>,
    position: usize,
    depth: usize,
}

impl<'p> ParseInput<'p> {
    fn new(source: &'p str) -> Self {
        Self {
            input: source.char_indices().peekable(),
            position: 0,
            depth: 0,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.input.peek().map(|&(_, ch)| ch)
    }

    /// Next character with its character offset.
    fn next(&mut self) -> Option<(usize, char)> {
        let (_, ch) = self.input.next()?;
        let position = self.position;
        self.position += 1;
        Some((position, ch))
    }
}

fn parse_alternation(input: &mut ParseInput<'_>) -> Result<Expr, PatternError> {
    let mut branches = vec![parse_concat(input)?];
    while input.peek() == Some('|') {
        input.next();
        branches.push(parse_concat(input)?);
    }

    if branches.len() == 1 {
        Ok(branches.remove(0))
    } else {
        Ok(Expr::Alternate(branches))
    }
}

fn parse_concat(input: &mut ParseInput<'_>) -> Result<Expr, PatternError> {
    let mut items = Vec::new();
    while let Some(ch) = input.peek() {
        if ch == '|' || ch == ')' {
            break;
        }
        items.push(parse_item(input)?);
    }
    Ok(Expr::Concat(items))
}

fn parse_item(input: &mut ParseInput<'_>) -> Result<Expr, PatternError> {
    let (position, ch) = input.next().ok_or(PatternError::UnexpectedEof {
        position: input.position,
    })?;

    match ch {
        '(' => {
            if input.depth == MAX_NESTING {
                return Err(PatternError::TooDeep {
                    position,
                    limit: MAX_NESTING,
                });
            }
            input.depth += 1;
            let inner = parse_alternation(input)?;
            input.depth -= 1;
            match input.next() {
                Some((_, ')')) => Ok(inner),
                _ => Err(PatternError::UnbalancedParen { position }),
            }
        }
        '.' => {
            if input.peek() == Some('*') {
                input.next();
                Ok(Expr::AnyRun)
            } else {
                Ok(Expr::Any)
            }
        }
        '*' => Err(PatternError::DanglingStar { position }),
        '\\' => match input.next() {
            Some((_, escaped)) => Ok(Expr::Literal(escaped)),
            None => Err(PatternError::UnexpectedEof {
                position: input.position,
            }),
        },
        _ => Ok(Expr::Literal(ch)),
    }
}
