//! Priority key computation for inserting a job between two neighbours.
//!
//! Priorities are sparse integers. New keys are taken from the gap between the
//! neighbours; when the gap is exhausted the calculator asks for a rebalance
//! instead of producing a colliding value.
//!
//! `before` and `after` are named in key order: a placed job always satisfies
//! `before < priority < after`. Columns display highest priority first, so the
//! `after` neighbour renders above the placed job and `before` below it.

use crate::config::DEFAULT_PRIORITY_INCREMENT;

/// Outcome of a placement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A free key was found
    At(i64),
    /// The neighbours leave no room; rebalance the column and try again
    NeedsRebalance,
}

/// Pure priority calculator parameterized by the column spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityCalculator {
    increment: i64,
}

impl PriorityCalculator {
    /// Create a calculator with the given spacing (must be at least 2)
    pub fn new(increment: i64) -> Self {
        Self { increment }
    }

    /// Spacing between keys at column ends and after a rebalance
    pub fn increment(&self) -> i64 {
        self.increment
    }

    /// Compute a key for a job placed between `before` and `after`.
    ///
    /// `column_max` is the highest priority currently in the target column
    /// (excluding the job being placed); it is only consulted when neither
    /// neighbour is given.
    pub fn calculate(
        &self,
        before: Option<i64>,
        after: Option<i64>,
        column_max: Option<i64>,
    ) -> Placement {
        match (before, after) {
            (None, None) => match column_max {
                Some(max) => self.above(max),
                None => Placement::At(self.increment),
            },
            (None, Some(after)) => match after.checked_sub(self.increment) {
                Some(candidate) if candidate > 0 => Placement::At(candidate),
                _ => Placement::NeedsRebalance,
            },
            (Some(before), None) => self.above(before),
            (Some(before), Some(after)) => match after.checked_sub(before) {
                Some(gap) if gap > 1 => Placement::At(before + gap / 2),
                _ => Placement::NeedsRebalance,
            },
        }
    }

    /// Compute a key once the column has been rebalanced.
    ///
    /// After a rebalance every key is a positive multiple of the increment, so
    /// a gap always exists between two adjacent neighbours. The only boundary
    /// left is placing below the lowest key when it equals the increment
    /// itself; the key then goes halfway between zero and that neighbour.
    ///
    /// Returns `None` if there is still no room, which means the neighbours
    /// are not adjacent.
    pub fn calculate_rebalanced(
        &self,
        before: Option<i64>,
        after: Option<i64>,
        column_max: Option<i64>,
    ) -> Option<i64> {
        match self.calculate(before, after, column_max) {
            Placement::At(priority) => Some(priority),
            Placement::NeedsRebalance => match (before, after) {
                (None, Some(after)) if after > 1 => Some(after / 2),
                _ => None,
            },
        }
    }

    fn above(&self, key: i64) -> Placement {
        match key.checked_add(self.increment) {
            Some(priority) => Placement::At(priority),
            None => Placement::NeedsRebalance,
        }
    }
}

impl Default for PriorityCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY_INCREMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn calc() -> PriorityCalculator {
        PriorityCalculator::default()
    }

    #[test]
    fn test_empty_column() {
        assert_eq!(calc().calculate(None, None, None), Placement::At(1000));
    }

    #[test]
    fn test_no_neighbours_goes_above_column_max() {
        assert_eq!(calc().calculate(None, None, Some(4500)), Placement::At(5500));
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(calc().calculate(Some(100), Some(102), None), Placement::At(101));
        assert_eq!(calc().calculate(Some(1000), Some(2000), None), Placement::At(1500));
        assert_eq!(calc().calculate(Some(1000), Some(1500), None), Placement::At(1250));
    }

    #[test]
    fn test_midpoint_floors() {
        assert_eq!(calc().calculate(Some(100), Some(103), None), Placement::At(101));
    }

    #[test]
    fn test_no_gap_needs_rebalance() {
        assert_eq!(
            calc().calculate(Some(100), Some(101), None),
            Placement::NeedsRebalance
        );
        assert_eq!(
            calc().calculate(Some(100), Some(100), None),
            Placement::NeedsRebalance
        );
    }

    #[test]
    fn test_below_lowest() {
        let calc = PriorityCalculator::new(100);
        assert_eq!(calc.calculate(None, Some(500), None), Placement::At(400));
        assert_eq!(calc.calculate(None, Some(100), None), Placement::NeedsRebalance);
        assert_eq!(calc.calculate(None, Some(1), None), Placement::NeedsRebalance);
    }

    #[test]
    fn test_above_highest() {
        assert_eq!(calc().calculate(Some(1000), None, None), Placement::At(2000));
        assert_eq!(
            calc().calculate(Some(i64::MAX - 10), None, None),
            Placement::NeedsRebalance
        );
    }

    #[test]
    fn test_rebalanced_below_lowest_uses_half() {
        assert_eq!(calc().calculate_rebalanced(None, Some(1000), None), Some(500));
        assert_eq!(calc().calculate_rebalanced(None, Some(3000), None), Some(2000));
        assert_eq!(calc().calculate_rebalanced(None, Some(1), None), None);
    }

    #[test]
    fn test_rebalanced_still_without_room() {
        assert_eq!(calc().calculate_rebalanced(Some(1000), Some(1001), None), None);
    }

    proptest! {
        #[test]
        fn prop_placement_stays_strictly_between(
            before in -1_000_000i64..1_000_000,
            gap in 0i64..10_000,
        ) {
            let after = before + gap;
            match calc().calculate(Some(before), Some(after), None) {
                Placement::At(p) => prop_assert!(before < p && p < after),
                Placement::NeedsRebalance => prop_assert!(gap <= 1),
            }
        }

        #[test]
        fn prop_below_is_positive_and_lower(after in 1i64..1_000_000) {
            match calc().calculate(None, Some(after), None) {
                Placement::At(p) => prop_assert!(p > 0 && p < after),
                Placement::NeedsRebalance => prop_assert!(after <= 1000),
            }
        }
    }
}
