//! Backbone assignment parsing.
//!
//! A backbone file is line-oriented: the last whitespace-delimited token of
//! every non-empty line is a signed literal, and `0` means "no assignment on
//! this line". Solvers emit per-line prefixes (scores, indices) in front of
//! the literal, which is why only the final token is consulted.

use std::collections::HashMap;

use crate::dimacs::Lit;
use crate::error::ParseError;

/// The set of variables forced to a fixed truth value.
///
/// # Examples
/// ```
/// use satgraph_core::Backbone;
///
/// let backbone = Backbone::parse("1 0\n-3 0\n0\n").expect("input must parse");
/// assert_eq!(backbone.len(), 2);
/// assert_eq!(backbone.polarity(1), Some(true));
/// assert_eq!(backbone.polarity(3), Some(false));
/// assert_eq!(backbone.polarity(2), None);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Backbone {
    forced: HashMap<u32, bool>,
}

impl Backbone {
    /// Parses the full text of a backbone file.
    ///
    /// # Errors
    /// Returns [`ParseError::BadLiteral`] for a malformed final token and
    /// [`ParseError::ConflictingBackbone`] when both polarities of one
    /// variable are forced; the conflict is rejected here, before any graph
    /// is built.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut forced = HashMap::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let Some(token) = line.split_whitespace().next_back() else {
                continue;
            };
            let lit: Lit = token.parse().map_err(|_| ParseError::BadLiteral {
                line: index + 1,
                token: token.to_owned(),
            })?;
            if lit == 0 {
                continue;
            }
            let variable = lit.unsigned_abs();
            let positive = lit > 0;
            match forced.get(&variable) {
                Some(&existing) if existing != positive => {
                    return Err(ParseError::ConflictingBackbone { variable });
                }
                Some(_) => {}
                None => {
                    forced.insert(variable, positive);
                }
            }
        }
        Ok(Self { forced })
    }

    /// Returns whether the backbone forces no variable at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forced.is_empty()
    }

    /// Number of forced variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forced.len()
    }

    /// Forced polarity of `variable`: `Some(true)` forced true, `Some(false)`
    /// forced false, `None` when the backbone does not mention it.
    #[must_use]
    pub fn polarity(&self, variable: u32) -> Option<bool> {
        self.forced.get(&variable).copied()
    }
}
