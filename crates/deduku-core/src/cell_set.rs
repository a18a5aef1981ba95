//! Ordered collections of cell coordinates.

use std::ops::{BitAnd, BitOr, Index, Sub};

use tinyvec::TinyVec;

use crate::{Coord, Field};

/// An ordered, duplicate-free collection of cell coordinates.
///
/// Houses, peer sets, and the intermediate selections built by techniques
/// are all `CellSet`s. The set supports the three set operations the
/// intersection techniques are written in terms of — union (`|`),
/// difference (`-`), and intersection (`&`) — plus bulk candidate
/// queries against the owning [`Field`].
///
/// Insertion order is preserved; a typical set (one house, or a box/line
/// fragment) fits the inline buffer without allocating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSet {
    cells: TinyVec<[Coord; 32]>,
}

impl CellSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a coordinate unless it is already present.
    ///
    /// Returns `true` if the coordinate was inserted.
    pub fn add(&mut self, coord: Coord) -> bool {
        if self.contains(coord) {
            return false;
        }
        self.cells.push(coord);
        true
    }

    /// Returns `true` if the set contains `coord`.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    /// Returns the number of cells in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns an iterator over the coordinates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().copied()
    }

    /// Returns the cells present in either set, keeping `self`'s order
    /// first.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for coord in other.iter() {
            result.add(coord);
        }
        result
    }

    /// Returns the cells of `self` that are not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.iter().filter(|&c| !other.contains(c)).collect()
    }

    /// Returns the cells present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter().filter(|&c| other.contains(c)).collect()
    }

    /// Counts the cells whose candidate mask contains `value`.
    ///
    /// Resolved cells count for their own value, so for a full house
    /// this is "the number of places `value` can still be".
    #[must_use]
    pub fn candidate_count(&self, field: &Field, value: u8) -> usize {
        self.iter()
            .filter(|&c| field.cell(c).has_candidate(value))
            .count()
    }

    /// Returns the subset of cells whose candidate mask contains `value`.
    #[must_use]
    pub fn cells_with_candidate(&self, field: &Field, value: u8) -> Self {
        self.iter()
            .filter(|&c| field.cell(c).has_candidate(value))
            .collect()
    }

    /// Counts the unresolved cells in the set.
    #[must_use]
    pub fn unresolved_count(&self, field: &Field) -> usize {
        self.iter().filter(|&c| !field.cell(c).is_resolved()).count()
    }

    /// Returns `true` if any cell in the set is unresolved.
    #[must_use]
    pub fn has_unresolved(&self, field: &Field) -> bool {
        self.iter().any(|c| !field.cell(c).is_resolved())
    }

    /// Returns `true` if some resolved cell in the set holds `value`.
    #[must_use]
    pub fn has_value(&self, field: &Field, value: u8) -> bool {
        self.iter().any(|c| field.cell(c).value() == Some(value))
    }
}

impl Index<usize> for CellSet {
    type Output = Coord;

    fn index(&self, index: usize) -> &Coord {
        &self.cells[index]
    }
}

impl FromIterator<Coord> for CellSet {
    fn from_iter<T: IntoIterator<Item = Coord>>(iter: T) -> Self {
        let mut set = Self::new();
        for coord in iter {
            set.add(coord);
        }
        set
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Coord>>;
    type Item = Coord;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter().copied()
    }
}

impl BitOr for &CellSet {
    type Output = CellSet;

    fn bitor(self, rhs: Self) -> CellSet {
        self.union(rhs)
    }
}

impl Sub for &CellSet {
    type Output = CellSet;

    fn sub(self, rhs: Self) -> CellSet {
        self.difference(rhs)
    }
}

impl BitAnd for &CellSet {
    type Output = CellSet;

    fn bitand(self, rhs: Self) -> CellSet {
        self.intersection(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pairs: &[(u8, u8)]) -> CellSet {
        pairs
            .iter()
            .map(|&(row, col)| Coord::new(row, col, 9))
            .collect()
    }

    #[test]
    fn test_add_deduplicates() {
        let mut set = CellSet::new();
        assert!(set.add(Coord::new(1, 1, 9)));
        assert!(!set.add(Coord::new(1, 1, 9)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let set = coords(&[(3, 3), (1, 1), (2, 2)]);
        let order: Vec<Coord> = set.iter().collect();
        assert_eq!(
            order,
            vec![
                Coord::new(3, 3, 9),
                Coord::new(1, 1, 9),
                Coord::new(2, 2, 9)
            ]
        );
        assert_eq!(set[1], Coord::new(1, 1, 9));
    }

    #[test]
    fn test_union_difference_intersection() {
        let a = coords(&[(1, 1), (1, 2), (1, 3)]);
        let b = coords(&[(1, 2), (1, 3), (1, 4)]);

        assert_eq!(&a | &b, coords(&[(1, 1), (1, 2), (1, 3), (1, 4)]));
        assert_eq!(&a - &b, coords(&[(1, 1)]));
        assert_eq!(&a & &b, coords(&[(1, 2), (1, 3)]));
    }

    #[test]
    fn test_difference_with_self_is_empty() {
        let a = coords(&[(1, 1), (2, 2)]);
        assert!((&a - &a).is_empty());
    }

    #[test]
    fn test_large_sets_spill_without_losing_cells() {
        // A peer set on a 16×16 grid exceeds the inline buffer.
        let set: CellSet = Coord::grid(16).collect();
        assert_eq!(set.len(), 256);
        assert!(set.contains(Coord::new(16, 16, 16)));
    }
}
