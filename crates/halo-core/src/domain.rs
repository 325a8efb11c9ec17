//! The full cell array owned by the coordinator.

use std::fmt;

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::RunError;

/// Check that every value in `cells` is 0 or 1.
///
/// Returns the index and value of the first offending cell.
pub fn first_invalid_cell(cells: &[u8]) -> Option<(usize, u8)> {
    cells
        .iter()
        .enumerate()
        .find(|(_, &v)| v > 1)
        .map(|(i, &v)| (i, v))
}

/// An ordered, non-empty sequence of binary cells.
///
/// Only the coordinator holds a `Domain`. It is authoritative before the
/// run is distributed and after the final gather; in between only the
/// first and last cell of each chunk are kept current.
///
/// # Examples
///
/// ```
/// use halo_core::Domain;
///
/// let d = Domain::single_center(7).unwrap();
/// assert_eq!(d.as_slice(), &[0, 0, 0, 1, 0, 0, 0]);
/// assert_eq!(d.to_string(), "0 0 0 1 0 0 0");
///
/// let parsed: Domain = "0001000".parse().unwrap();
/// assert_eq!(parsed, d);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Domain {
    cells: Vec<u8>,
}

impl Domain {
    /// Wrap an existing cell vector.
    ///
    /// Returns `Err(RunError::InvalidConfig)` if `cells` is empty or holds
    /// a value other than 0 or 1.
    pub fn from_cells(cells: Vec<u8>) -> Result<Self, RunError> {
        if cells.is_empty() {
            return Err(RunError::invalid_config("domain must have at least one cell"));
        }
        if let Some((index, value)) = first_invalid_cell(&cells) {
            return Err(RunError::invalid_config(format!(
                "cell {index} has value {value}, expected 0 or 1"
            )));
        }
        Ok(Self { cells })
    }

    /// All-zero domain of `len` cells.
    pub fn zeros(len: usize) -> Result<Self, RunError> {
        Self::from_cells(vec![0; len])
    }

    /// All-zero domain with a single live cell at `len / 2`.
    pub fn single_center(len: usize) -> Result<Self, RunError> {
        let mut domain = Self::zeros(len)?;
        domain.cells[len / 2] = 1;
        Ok(domain)
    }

    /// Pseudo-random domain, deterministic in `seed`.
    pub fn random(len: usize, seed: u64) -> Result<Self, RunError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::from_cells((0..len).map(|_| (rng.next_u32() & 1) as u8).collect())
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: construction rejects empty domains.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Cell values in order.
    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }

    /// Consume the domain, returning its cells.
    pub fn into_vec(self) -> Vec<u8> {
        self.cells
    }

    /// Value of cell `index`, if in range.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.cells.get(index).copied()
    }

    /// First cell.
    pub fn first(&self) -> u8 {
        self.cells[0]
    }

    /// Last cell.
    pub fn last(&self) -> u8 {
        self.cells[self.cells.len() - 1]
    }

    /// Overwrite cell `index`.
    ///
    /// Returns `Err(RunError::InvalidConfig)` if `index` is out of range
    /// or `value` is not 0 or 1.
    pub fn set(&mut self, index: usize, value: u8) -> Result<(), RunError> {
        if value > 1 {
            return Err(RunError::invalid_config(format!(
                "cell value {value} is not 0 or 1"
            )));
        }
        let len = self.cells.len();
        let cell = self.cells.get_mut(index).ok_or_else(|| {
            RunError::invalid_config(format!("cell index {index} out of range [0, {len})"))
        })?;
        *cell = value;
        Ok(())
    }

    /// Overwrite `values.len()` cells starting at `start`.
    pub fn write_range(&mut self, start: usize, values: &[u8]) -> Result<(), RunError> {
        let end = start + values.len();
        if end > self.cells.len() {
            return Err(RunError::invalid_config(format!(
                "range [{start}, {end}) exceeds domain of {} cells",
                self.cells.len()
            )));
        }
        if let Some((index, value)) = first_invalid_cell(values) {
            return Err(RunError::invalid_config(format!(
                "cell {} has value {value}, expected 0 or 1",
                start + index
            )));
        }
        self.cells[start..end].copy_from_slice(values);
        Ok(())
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.cells.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
        }
        for cell in iter {
            write!(f, " {cell}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Domain {
    type Err = RunError;

    /// Parse a string of `0`/`1` characters. Whitespace and `,` are
    /// ignored so that `"0 1 0"` and `"0,1,0"` both work.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = Vec::with_capacity(s.len());
        for ch in s.chars() {
            match ch {
                '0' => cells.push(0),
                '1' => cells.push(1),
                c if c.is_whitespace() || c == ',' => {}
                other => {
                    return Err(RunError::invalid_config(format!(
                        "unexpected character {other:?} in domain string"
                    )))
                }
            }
        }
        Self::from_cells(cells)
    }
}
