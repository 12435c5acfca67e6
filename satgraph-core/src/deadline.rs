//! Wall-clock budget tracking for the conversion pipeline.
//!
//! Large formulas can dominate a batch, so every pipeline phase checks an
//! explicit [`Deadline`] value at clause, edge, and component boundaries and
//! returns a typed timeout instead of partial data.

use std::fmt;
use std::time::{Duration, Instant};

use crate::error::ConvertError;

/// Pipeline phase in which a deadline check fired.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Phase {
    /// First clause pass: variable discovery and label allocation.
    Variables,
    /// Second clause pass: clause nodes and edge emission.
    Edges,
    /// Weakly-connected-component extraction from the forest.
    Components,
    /// Per-component relabeling and root injection.
    Split,
}

impl Phase {
    /// Lower-case name used in log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Variables => "variables",
            Self::Edges => "edges",
            Self::Components => "components",
            Self::Split => "split",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wall-clock deadline threaded through every pipeline phase.
///
/// A zero budget is already expired, which makes timeout paths easy to
/// exercise in tests.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use satgraph_core::{Deadline, Phase};
///
/// let deadline = Deadline::after(Duration::from_secs(60));
/// assert!(deadline.check(Phase::Variables).is_ok());
///
/// let expired = Deadline::after(Duration::ZERO);
/// assert!(expired.check(Phase::Edges).is_err());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    /// Starts a deadline `budget` from now.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// Returns the configured budget.
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Returns whether the budget is spent.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.budget
    }

    /// Errors with [`ConvertError::Timeout`] once the budget is spent.
    ///
    /// # Errors
    /// Returns [`ConvertError::Timeout`] carrying `phase` and the budget.
    pub fn check(&self, phase: Phase) -> Result<(), ConvertError> {
        if self.expired() {
            return Err(ConvertError::Timeout {
                phase,
                budget: self.budget,
            });
        }
        Ok(())
    }
}
