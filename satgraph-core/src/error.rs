//! Error types for the satgraph core library.
//!
//! Defines the error enums exposed by the public API, a convenient result
//! alias, and stable machine-readable error codes for log consumers.

use std::time::Duration;

use thiserror::Error;

use crate::deadline::Phase;

/// An error raised while parsing CNF or backbone text.
///
/// Parse errors are fatal for the file that produced them; there is no
/// partial-clause tolerance because a truncated clause would corrupt the
/// graph silently.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseError {
    /// A token that should have been a signed literal did not parse.
    #[error("line {line}: malformed literal token `{token}`")]
    BadLiteral {
        /// 1-based line number of the offending token.
        line: usize,
        /// The raw token as it appeared in the input.
        token: String,
    },
    /// A zero literal appeared inside a clause payload (only the trailing
    /// terminator token may be zero).
    #[error("line {line}: zero literal inside clause payload")]
    ZeroLiteral {
        /// 1-based line number of the offending clause.
        line: usize,
    },
    /// The backbone forces both polarities of one variable.
    #[error("backbone forces both polarities of variable {variable}")]
    ConflictingBackbone {
        /// The doubly-forced variable.
        variable: u32,
    },
}

impl ParseError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadLiteral { .. } => "PARSE_BAD_LITERAL",
            Self::ZeroLiteral { .. } => "PARSE_ZERO_LITERAL",
            Self::ConflictingBackbone { .. } => "PARSE_CONFLICTING_BACKBONE",
        }
    }
}

/// An error raised while converting one formula/backbone pair.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConvertError {
    /// The CNF or backbone text failed to parse.
    #[error(transparent)]
    Parse {
        /// Underlying parse failure.
        #[from]
        source: ParseError,
    },
    /// The backbone file contained no non-zero literals.
    #[error("backbone contains no non-zero literals")]
    EmptyBackbone,
    /// The backbone labels no variable that occurs in the formula, so every
    /// label slot would stay at the unknown value.
    #[error("backbone labels no variable present in the formula")]
    IrrelevantBackbone,
    /// The wall-clock budget was exhausted mid-pipeline.
    #[error("deadline of {budget:?} exceeded during the {phase} phase")]
    Timeout {
        /// Pipeline phase in which the check fired.
        phase: Phase,
        /// The configured budget.
        budget: Duration,
    },
    /// A structural invariant of the builder or splitter was violated.
    /// This signals a bug rather than bad input and is surfaced loudly.
    #[error("internal consistency violation ({detail}): nodes {node_a}, {node_b}")]
    Inconsistency {
        /// Which invariant was violated.
        detail: &'static str,
        /// First involved node id.
        node_a: usize,
        /// Second involved node id.
        node_b: usize,
    },
    /// The sample's node count does not fit the serialized id width.
    #[error("sample has {nodes} nodes, which exceeds the serializable id range")]
    SampleTooLarge {
        /// Node count of the oversized sample.
        nodes: usize,
    },
}

impl ConvertError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Parse { source } => source.code(),
            Self::EmptyBackbone => "CONVERT_EMPTY_BACKBONE",
            Self::IrrelevantBackbone => "CONVERT_IRRELEVANT_BACKBONE",
            Self::Timeout { .. } => "CONVERT_TIMEOUT",
            Self::Inconsistency { .. } => "CONVERT_INCONSISTENCY",
            Self::SampleTooLarge { .. } => "CONVERT_SAMPLE_TOO_LARGE",
        }
    }

    /// Whether this error indicates a structural bug rather than bad input.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Inconsistency { .. })
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ConvertError>;
