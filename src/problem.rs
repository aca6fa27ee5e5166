//! Problem files in and solution files out.
//!
//! A problem file starts with a header line of three integers (accept count,
//! reject count, maximum length) followed by the accept words and then the
//! reject words, one per line. A solution file is the line `regex` followed
//! by the pattern.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::{debug, info};

use crate::generator::{GeneratorConfig, Generation, PatternGenerator};

/// Header line of every solution file.
pub const SOLUTION_HEADER: &str = "regex";

/// Errors returned while reading a problem file.
#[derive(thiserror::Error, Debug)]
pub enum ProblemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing header line")]
    MissingHeader,
    #[error("Malformed header line {line:?}: expected three counts")]
    MalformedHeader { line: String },
    #[error("Invalid {field} {value:?}: expected a non-negative integer")]
    InvalidCount { field: &'static str, value: String },
    #[error("Expected {expected} {kind} words, found {found}")]
    MissingWords {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Solution file must start with \"regex\", found {line:?}")]
    BadSolutionHeader { line: String },
    #[error("Solution file has no pattern line")]
    MissingPattern,
}

/// Accept words, reject words and the maximum pattern length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Problem {
    pub accept: Vec<String>,
    pub reject: Vec<String>,
    pub max_length: usize,
}

impl Problem {
    pub fn new(accept: Vec<String>, reject: Vec<String>, max_length: usize) -> Self {
        Self {
            accept,
            reject,
            max_length,
        }
    }

    /// Open and parse a problem file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ProblemError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let problem = Self::read_from(BufReader::new(file))?;
        info!(
            "Loaded {} accept and {} reject words from {}",
            problem.accept.len(),
            problem.reject.len(),
            path.display()
        );
        Ok(problem)
    }

    /// Parse a problem from any buffered reader.
    ///
    /// Words are trimmed of surrounding whitespace; a blank word line is the
    /// empty word. Lines after the last reject word are ignored.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, ProblemError> {
        let mut lines = reader.lines();

        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                }
                None => return Err(ProblemError::MissingHeader),
            }
        };

        let fields: Vec<&str> = header.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(ProblemError::MalformedHeader {
                line: header.clone(),
            });
        }
        let accept_count = parse_count("accept count", fields[0])?;
        let reject_count = parse_count("reject count", fields[1])?;
        let max_length = parse_count("max length", fields[2])?;
        debug!(
            "Header: {} accept, {} reject, max length {}",
            accept_count, reject_count, max_length
        );

        let accept = read_words(&mut lines, "accept", accept_count)?;
        let reject = read_words(&mut lines, "reject", reject_count)?;

        Ok(Self {
            accept,
            reject,
            max_length,
        })
    }

    /// Generate the pattern for this problem.
    pub fn generate(&self, escape_literals: bool) -> Generation {
        let config = GeneratorConfig::new(self.max_length).with_escape_literals(escape_literals);
        PatternGenerator::new(config).run(&self.accept, &self.reject)
    }
}

fn parse_count(field: &'static str, value: &str) -> Result<usize, ProblemError> {
    value.parse().map_err(|_| ProblemError::InvalidCount {
        field,
        value: value.to_string(),
    })
}

fn read_words<I>(lines: &mut I, kind: &'static str, expected: usize) -> Result<Vec<String>, ProblemError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut words = Vec::with_capacity(expected);
    while words.len() < expected {
        match lines.next() {
            Some(line) => words.push(line?.trim().to_string()),
            None => {
                return Err(ProblemError::MissingWords {
                    kind,
                    expected,
                    found: words.len(),
                })
            }
        }
    }
    Ok(words)
}

/// Write the solution header and pattern.
pub fn write_solution<W: Write>(mut writer: W, pattern: &str) -> std::io::Result<()> {
    writeln!(writer, "{SOLUTION_HEADER}")?;
    writeln!(writer, "{pattern}")?;
    writer.flush()
}

/// Write a solution file, creating parent directories as needed.
pub fn write_solution_file<P: AsRef<Path>>(path: P, pattern: &str) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write_solution(file, pattern)?;
    info!("Solution written to {}", path.display());
    Ok(())
}

/// Read the pattern line back out of a solution file.
pub fn read_solution<R: BufRead>(reader: R) -> Result<String, ProblemError> {
    let mut lines = reader.lines();
    match lines.next() {
        Some(header) => {
            let header = header?;
            if header.trim() != SOLUTION_HEADER {
                return Err(ProblemError::BadSolutionHeader { line: header });
            }
        }
        None => return Err(ProblemError::MissingHeader),
    }
    match lines.next() {
        Some(pattern) => Ok(pattern?.trim_end().to_string()),
        None => Err(ProblemError::MissingPattern),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_counts_and_words() {
        let input = "2 1 3\nab\n ac \na\n";
        let problem = Problem::read_from(Cursor::new(input)).unwrap();
        assert_eq!(problem.accept, vec!["ab", "ac"]);
        assert_eq!(problem.reject, vec!["a"]);
        assert_eq!(problem.max_length, 3);
    }

    #[test]
    fn skips_leading_blank_lines_and_ignores_trailing_lines() {
        let input = "\n\n1 0 2\nx\nextra\n";
        let problem = Problem::read_from(Cursor::new(input)).unwrap();
        assert_eq!(problem.accept, vec!["x"]);
        assert!(problem.reject.is_empty());
    }

    #[test]
    fn blank_word_line_is_empty_word() {
        let problem = Problem::read_from(Cursor::new("1 1 1\n\nb\n")).unwrap();
        assert_eq!(problem.accept, vec![""]);
        assert_eq!(problem.reject, vec!["b"]);
    }

    #[test]
    fn rejects_short_header() {
        let err = Problem::read_from(Cursor::new("1 2\n")).unwrap_err();
        assert!(matches!(err, ProblemError::MalformedHeader { .. }));
    }

    #[test]
    fn rejects_non_numeric_header() {
        let err = Problem::read_from(Cursor::new("1 x 2\na\n")).unwrap_err();
        assert!(matches!(err, ProblemError::InvalidCount { field: "reject count", .. }));
        let err = Problem::read_from(Cursor::new("1 0 -2\na\n")).unwrap_err();
        assert!(matches!(err, ProblemError::InvalidCount { field: "max length", .. }));
    }

    #[test]
    fn reports_missing_words() {
        let err = Problem::read_from(Cursor::new("2 1 3\nab\n")).unwrap_err();
        assert!(matches!(
            err,
            ProblemError::MissingWords { kind: "accept", expected: 2, found: 1 }
        ));
        let err = Problem::read_from(Cursor::new("1 2 3\nab\nc\n")).unwrap_err();
        assert!(matches!(
            err,
            ProblemError::MissingWords { kind: "reject", expected: 2, found: 1 }
        ));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = Problem::read_from(Cursor::new("")).unwrap_err();
        assert!(matches!(err, ProblemError::MissingHeader));
    }

    #[test]
    fn writes_and_reads_back_solution() {
        let mut buffer = Vec::new();
        write_solution(&mut buffer, "a(b.*|c.*)").unwrap();
        assert_eq!(String::from_utf8(buffer.clone()).unwrap(), "regex\na(b.*|c.*)\n");
        assert_eq!(read_solution(Cursor::new(buffer)).unwrap(), "a(b.*|c.*)");
    }

    #[test]
    fn solution_errors_name_the_solution_file() {
        let err = read_solution(Cursor::new("nope\nx\n")).unwrap_err();
        assert!(matches!(&err, ProblemError::BadSolutionHeader { line } if line == "nope"));
        assert_eq!(
            err.to_string(),
            "Solution file must start with \"regex\", found \"nope\""
        );

        let err = read_solution(Cursor::new("regex\n")).unwrap_err();
        assert!(matches!(err, ProblemError::MissingPattern));
        assert_eq!(err.to_string(), "Solution file has no pattern line");

        let err = read_solution(Cursor::new("")).unwrap_err();
        assert!(matches!(err, ProblemError::MissingHeader));
    }

    #[test]
    fn generates_from_problem() {
        let problem = Problem::new(vec!["x".into()], vec!["x".into()], 2);
        assert_eq!(problem.generate(false).pattern, "x()");
    }
}
