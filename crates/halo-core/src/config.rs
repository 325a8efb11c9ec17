//! Run configuration and boundary conditions.
//!
//! [`RunConfig`] is validated once, before anything is distributed to
//! workers. [`validate()`](RunConfig::validate) reports the first violated
//! invariant.

use std::fmt;

use crate::error::RunError;
use crate::rule::RuleTable;

/// How the two ends of the domain see their missing outside neighbour.
///
/// # Examples
///
/// ```
/// use halo_core::Boundary;
///
/// assert_eq!(Boundary::from_periodic(true), Boundary::Periodic);
/// assert!(!Boundary::Fixed.is_periodic());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// Cells outside the domain are permanently 0.
    #[default]
    Fixed,
    /// The domain wraps: cell `N-1` is the left neighbour of cell 0 and
    /// cell 0 is the right neighbour of cell `N-1`.
    Periodic,
}

impl Boundary {
    /// Map a yes/no periodic flag onto a boundary mode.
    pub fn from_periodic(periodic: bool) -> Self {
        if periodic {
            Self::Periodic
        } else {
            Self::Fixed
        }
    }

    /// Whether the domain wraps.
    pub fn is_periodic(self) -> bool {
        matches!(self, Self::Periodic)
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Periodic => write!(f, "periodic"),
        }
    }
}

/// Immutable parameters of one simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Domain size N. Must be positive.
    pub cells: usize,
    /// Wolfram rule number. Must be in `[0, 255]`.
    pub rule: u32,
    /// Number of generations to advance. Must be positive.
    pub generations: u64,
    /// Edge behaviour.
    pub boundary: Boundary,
}

impl RunConfig {
    /// Validate all invariants.
    ///
    /// Checks, in order: rule range, positive cell count, positive
    /// generation count.
    pub fn validate(&self) -> Result<(), RunError> {
        if self.rule > 255 {
            return Err(RunError::InvalidRule { rule: self.rule });
        }
        if self.cells == 0 {
            return Err(RunError::invalid_config("cells must be positive"));
        }
        if self.generations == 0 {
            return Err(RunError::invalid_config("generations must be positive"));
        }
        Ok(())
    }

    /// Validate and build the rule table in one step.
    pub fn rule_table(&self) -> Result<RuleTable, RunError> {
        self.validate()?;
        RuleTable::new(self.rule)
    }
}
