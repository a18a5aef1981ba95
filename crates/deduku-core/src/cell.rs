//! A single grid position and its candidate state.

use derive_more::{Display, Error};

use crate::{Coord, ValueSet};

/// The error raised when a deduction strips a cell of its last candidate.
///
/// This is not an I/O or input problem: it means the puzzle has no
/// solution under the deductions made so far. It propagates unchanged
/// through every technique up to the resolver, which ends the run in the
/// invalid terminal state. The engine never backtracks past one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("cell {coord} has no remaining candidates")]
pub struct Contradiction {
    /// The cell whose candidate mask was emptied.
    pub coord: Coord,
}

/// One cell of the grid: either a resolved value or a set of candidates.
///
/// Cells are created by [`Field::with_size`](crate::Field::with_size) and
/// live as long as the field. All state transitions go through the
/// field's mutation primitives so that placing a value always propagates
/// to the cell's peers; the raw mutators here are crate-private.
///
/// A cell is *valid* when it is unresolved with a non-empty candidate
/// mask, or resolved with exactly its own value as the only mask bit.
#[derive(Debug, Clone)]
pub struct Cell {
    coord: Coord,
    value: Option<u8>,
    candidates: ValueSet,
    initial: bool,
    houses: [usize; 3],
}

impl Cell {
    pub(crate) fn new(coord: Coord, houses: [usize; 3]) -> Self {
        Self {
            coord,
            value: None,
            candidates: ValueSet::full(coord.grid_size()),
            initial: false,
            houses,
        }
    }

    /// Returns the cell's coordinate.
    #[must_use]
    #[inline]
    pub const fn coord(&self) -> Coord {
        self.coord
    }

    /// Returns the resolved value, or `None` for an unresolved cell.
    #[must_use]
    #[inline]
    pub const fn value(&self) -> Option<u8> {
        self.value
    }

    /// Returns `true` if the cell has a resolved value.
    #[must_use]
    #[inline]
    pub const fn is_resolved(&self) -> bool {
        self.value.is_some()
    }

    /// Returns `true` if the value came from the puzzle input rather than
    /// a deduction.
    #[must_use]
    #[inline]
    pub const fn is_initial(&self) -> bool {
        self.initial
    }

    /// Returns the candidate mask.
    ///
    /// A resolved cell's mask holds exactly its value.
    #[must_use]
    #[inline]
    pub const fn candidates(&self) -> ValueSet {
        self.candidates
    }

    /// Returns the number of candidates.
    #[must_use]
    #[inline]
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` if `value` is still a candidate.
    ///
    /// For a resolved cell this holds exactly for its own value.
    ///
    /// # Panics
    ///
    /// Panics if `value` is outside `1..=N` — that is a programming bug,
    /// not a puzzle condition.
    #[must_use]
    #[inline]
    pub fn has_candidate(&self, value: u8) -> bool {
        self.candidates.contains(value)
    }

    /// Returns the candidates shared by this cell and `other`.
    #[must_use]
    pub fn common_candidates(&self, other: &Self) -> ValueSet {
        self.candidates.intersection(other.candidates)
    }

    /// Returns the indices of the row, column, and box houses containing
    /// this cell, in that order.
    #[must_use]
    #[inline]
    pub const fn house_ids(&self) -> [usize; 3] {
        self.houses
    }

    /// Returns `true` if the cell's value and mask are consistent.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self.value {
            Some(value) => self.candidates.len() == 1 && self.candidates.contains(value),
            None => !self.candidates.is_empty(),
        }
    }

    /// Stamps a value in, reducing the mask to that single value.
    ///
    /// Peer propagation is the field's responsibility.
    pub(crate) fn assign(&mut self, value: u8, initial: bool) {
        self.value = Some(value);
        self.candidates = ValueSet::from_values(self.candidates.capacity(), [value]);
        self.initial = initial;
    }

    /// Clears every candidate in `mask` from an unresolved cell.
    ///
    /// Returns `Ok(false)` if the cell is resolved or no bit changed.
    /// The emptied mask is left in place on contradiction so that the
    /// failed state stays observable through [`Cell::is_valid`].
    pub(crate) fn clear_candidates(&mut self, mask: ValueSet) -> Result<bool, Contradiction> {
        if self.is_resolved() {
            return Ok(false);
        }
        let next = self.candidates.difference(mask);
        if next == self.candidates {
            return Ok(false);
        }
        self.candidates = next;
        if next.is_empty() {
            return Err(Contradiction { coord: self.coord });
        }
        Ok(true)
    }

    /// Clears the value and refills the candidate mask, ready for a
    /// puzzle reload.
    pub(crate) fn reset(&mut self) {
        self.value = None;
        self.candidates = ValueSet::full(self.candidates.capacity());
        self.initial = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> Cell {
        Cell::new(Coord::new(1, 1, 9), [0, 9, 18])
    }

    #[test]
    fn test_new_cell_is_unresolved_with_full_mask() {
        let c = cell();
        assert!(!c.is_resolved());
        assert_eq!(c.value(), None);
        assert_eq!(c.candidate_count(), 9);
        assert!(c.is_valid());
    }

    #[test]
    fn test_assign_reduces_mask_to_value() {
        let mut c = cell();
        c.assign(5, true);
        assert_eq!(c.value(), Some(5));
        assert!(c.is_initial());
        assert_eq!(c.candidate_count(), 1);
        assert!(c.has_candidate(5));
        assert!(!c.has_candidate(4));
        assert!(c.is_valid());
    }

    #[test]
    fn test_clear_candidates_on_resolved_cell_is_noop() {
        let mut c = cell();
        c.assign(5, false);
        let changed = c
            .clear_candidates(ValueSet::from_values(9, [5]))
            .expect("resolved cell never contradicts");
        assert!(!changed);
        assert!(c.has_candidate(5));
    }

    #[test]
    fn test_clear_absent_candidate_is_noop() {
        let mut c = cell();
        c.clear_candidates(ValueSet::from_values(9, [3])).unwrap();
        let changed = c.clear_candidates(ValueSet::from_values(9, [3])).unwrap();
        assert!(!changed);
    }

    #[test]
    fn test_clearing_last_candidate_contradicts() {
        let mut c = cell();
        c.clear_candidates(ValueSet::from_values(9, (1..=8).collect::<Vec<_>>()))
            .unwrap();
        let err = c
            .clear_candidates(ValueSet::from_values(9, [9]))
            .unwrap_err();
        assert_eq!(err.coord, Coord::new(1, 1, 9));
        // The mask stays empty: the cell is now observably invalid.
        assert!(!c.is_valid());
    }

    #[test]
    fn test_common_candidates() {
        let mut a = cell();
        let mut b = Cell::new(Coord::new(1, 2, 9), [0, 10, 18]);
        a.clear_candidates(ValueSet::from_values(9, [1, 2, 3])).unwrap();
        b.clear_candidates(ValueSet::from_values(9, [3, 4, 5])).unwrap();
        assert_eq!(
            a.common_candidates(&b),
            ValueSet::from_values(9, [6, 7, 8, 9])
        );
    }

    #[test]
    fn test_reset_restores_full_mask() {
        let mut c = cell();
        c.assign(7, true);
        c.reset();
        assert!(!c.is_resolved());
        assert!(!c.is_initial());
        assert_eq!(c.candidate_count(), 9);
    }
}
