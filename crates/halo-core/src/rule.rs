//! Wolfram-style elementary rule tables.

use crate::error::RunError;

/// Index of the `(left, mid, right)` neighbourhood in a [`RuleTable`].
///
/// `right + 2 * mid + 4 * left`. Inputs must be 0 or 1.
#[inline]
pub fn neighbourhood_index(left: u8, mid: u8, right: u8) -> usize {
    debug_assert!(left <= 1 && mid <= 1 && right <= 1);
    (right as usize) + 2 * (mid as usize) + 4 * (left as usize)
}

/// Eight-entry transition table built from a rule number in `[0, 255]`.
///
/// Entry `i` is bit `i` of the rule number, so the table for rule 90 is
/// `[0, 1, 0, 1, 1, 0, 1, 0]`.
///
/// # Examples
///
/// ```
/// use halo_core::RuleTable;
///
/// let table = RuleTable::new(90).unwrap();
/// assert_eq!(table.bits(), &[0, 1, 0, 1, 1, 0, 1, 0]);
/// // 1 0 0 -> idx 4 -> 1
/// assert_eq!(table.apply(1, 0, 0), 1);
/// assert!(RuleTable::new(256).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RuleTable {
    rule: u8,
    bits: [u8; 8],
}

impl RuleTable {
    /// Number of entries in every table.
    pub const LEN: usize = 8;

    /// Build the table for `rule`.
    ///
    /// Returns `Err(RunError::InvalidRule)` if `rule > 255`.
    pub fn new(rule: u32) -> Result<Self, RunError> {
        let rule = u8::try_from(rule).map_err(|_| RunError::InvalidRule { rule })?;
        let mut bits = [0u8; Self::LEN];
        let mut rest = rule;
        for bit in bits.iter_mut() {
            *bit = rest % 2;
            rest /= 2;
        }
        Ok(Self { rule, bits })
    }

    /// The rule number this table was built from.
    pub fn rule(&self) -> u8 {
        self.rule
    }

    /// The eight transition bits, indexed by [`neighbourhood_index`].
    pub fn bits(&self) -> &[u8; 8] {
        &self.bits
    }

    /// Next value of a cell whose neighbourhood is `(left, mid, right)`.
    #[inline]
    pub fn apply(&self, left: u8, mid: u8, right: u8) -> u8 {
        self.bits[neighbourhood_index(left, mid, right)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rule_90_matches_known_expansion() {
        let t = RuleTable::new(90).unwrap();
        assert_eq!(t.bits(), &[0, 1, 0, 1, 1, 0, 1, 0]);
        assert_eq!(t.rule(), 90);
    }

    #[test]
    fn rule_0_and_255_are_constant() {
        assert!(RuleTable::new(0).unwrap().bits().iter().all(|&b| b == 0));
        assert!(RuleTable::new(255).unwrap().bits().iter().all(|&b| b == 1));
    }

    #[test]
    fn small_rule_pads_high_bits_with_zero() {
        // 1 = 0b0000_0001: only the 000 neighbourhood survives.
        let t = RuleTable::new(1).unwrap();
        assert_eq!(t.bits(), &[1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn out_of_range_rule_rejected() {
        assert_eq!(RuleTable::new(256), Err(RunError::InvalidRule { rule: 256 }));
        assert_eq!(
            RuleTable::new(u32::MAX),
            Err(RunError::InvalidRule { rule: u32::MAX })
        );
    }

    #[test]
    fn index_layout() {
        assert_eq!(neighbourhood_index(0, 0, 0), 0);
        assert_eq!(neighbourhood_index(0, 0, 1), 1);
        assert_eq!(neighbourhood_index(0, 1, 0), 2);
        assert_eq!(neighbourhood_index(1, 0, 0), 4);
        assert_eq!(neighbourhood_index(1, 1, 1), 7);
    }

    proptest! {
        #[test]
        fn every_entry_is_the_matching_rule_bit(
            rule in 0u32..=255,
            left in 0u8..=1,
            mid in 0u8..=1,
            right in 0u8..=1,
        ) {
            let t = RuleTable::new(rule).unwrap();
            let idx = neighbourhood_index(left, mid, right);
            let expected = ((rule >> idx) & 1) as u8;
            prop_assert_eq!(t.apply(left, mid, right), expected);
            prop_assert_eq!(t.bits().len(), RuleTable::LEN);
        }
    }
}
