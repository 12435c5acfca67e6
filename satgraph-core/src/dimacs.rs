//! Line-oriented DIMACS CNF clause parsing.
//!
//! Comment lines (first character `c`) and the problem declaration (first
//! character `p`) are skipped. Every other non-empty line is one clause:
//! whitespace-separated signed literals with a trailing `0` terminator. The
//! declared variable and clause counts are informational only and never
//! consulted.

use crate::error::ParseError;

/// A signed DIMACS literal: the absolute value names the variable, the sign
/// the polarity.
pub type Lit = i32;

/// Lazy iterator over the clauses of a DIMACS CNF document.
///
/// # Examples
/// ```
/// use satgraph_core::Clauses;
///
/// let text = "c comment\np cnf 2 2\n1 2 0\n-1 -2 0\n";
/// let clauses: Vec<_> = Clauses::new(text)
///     .collect::<Result<_, _>>()
///     .expect("well-formed input");
/// assert_eq!(clauses, vec![vec![1, 2], vec![-1, -2]]);
/// ```
#[derive(Clone, Debug)]
pub struct Clauses<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Clauses<'a> {
    /// Creates a clause iterator over the full text of a CNF file.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
        }
    }
}

impl Iterator for Clauses<'_> {
    type Item = Result<Vec<Lit>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, raw) = self.lines.next()?;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('c') || line.starts_with('p') {
                continue;
            }
            return Some(parse_clause_line(line, index + 1));
        }
    }
}

/// Parses one clause line. The final token is the terminator and is dropped
/// without inspection; clauses do not span lines.
fn parse_clause_line(line: &str, line_number: usize) -> Result<Vec<Lit>, ParseError> {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    tokens.pop();

    let mut clause = Vec::with_capacity(tokens.len());
    for token in tokens {
        let lit: Lit = token.parse().map_err(|_| ParseError::BadLiteral {
            line: line_number,
            token: token.to_owned(),
        })?;
        if lit == 0 {
            return Err(ParseError::ZeroLiteral { line: line_number });
        }
        clause.push(lit);
    }
    Ok(clause)
}
