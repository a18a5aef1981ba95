//! The grid: all cells, all houses, and the mutation primitives.

use log::trace;

use crate::{
    Cell, CellSet, Contradiction, Coord, House, HouseKind, ValueSet, value_set::MAX_GRID_SIZE,
};

/// An N×N sudoku grid with its rows, columns, and boxes.
///
/// The field owns every [`Cell`] and every [`House`]; cells carry the
/// indices of their three houses, houses carry the coordinates of their
/// N cells. All mutation goes through three primitives —
/// [`set_value`](Field::set_value), [`remove_candidate`](Field::remove_candidate),
/// and [`remove_candidates`](Field::remove_candidates) — so that placing
/// a value always strips it from the candidates of every peer, and a
/// candidate removal that would empty a cell's mask always surfaces as a
/// [`Contradiction`].
///
/// # Examples
///
/// ```
/// use deduku_core::{Coord, Field};
///
/// let mut field = Field::with_size(9);
/// field.set_value(Coord::new(1, 1, 9), 5, true)?;
///
/// // 5 is gone from every peer of R1C1.
/// assert!(!field.cell(Coord::new(1, 9, 9)).has_candidate(5));
/// assert!(!field.cell(Coord::new(9, 1, 9)).has_candidate(5));
/// assert!(!field.cell(Coord::new(3, 3, 9)).has_candidate(5));
/// # Ok::<(), deduku_core::Contradiction>(())
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    size: u8,
    cells: Vec<Cell>,
    houses: Vec<House>,
}

impl Field {
    /// Creates an empty field of side length `size` with every candidate
    /// open.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not the square of an integer ≥ 2, or exceeds
    /// [`MAX_GRID_SIZE`](crate::value_set::MAX_GRID_SIZE).
    #[must_use]
    pub fn with_size(size: u8) -> Self {
        let b = size.isqrt();
        assert!(
            b >= 2 && b * b == size && size <= MAX_GRID_SIZE,
            "grid size must be a perfect square between 4 and {MAX_GRID_SIZE}"
        );

        let n = usize::from(size);
        let mut houses = Vec::with_capacity(3 * n);
        for kind in [HouseKind::Row, HouseKind::Column, HouseKind::Box] {
            for i in 0..size {
                houses.push(House::new(kind, i));
            }
        }

        let mut cells = Vec::with_capacity(n * n);
        for coord in Coord::grid(size) {
            let row_house = usize::from(coord.row()) - 1;
            let column_house = n + usize::from(coord.col()) - 1;
            let box_house = 2 * n + usize::from(coord.box_index());
            cells.push(Cell::new(coord, [row_house, column_house, box_house]));
            houses[row_house].register(coord);
            houses[column_house].register(coord);
            houses[box_house].register(coord);
        }

        Self {
            size,
            cells,
            houses,
        }
    }

    /// Returns the side length N.
    #[must_use]
    #[inline]
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// Returns the box side length √N.
    #[must_use]
    #[inline]
    pub const fn box_size(&self) -> u8 {
        self.size.isqrt()
    }

    /// Returns the cell at `coord`.
    #[must_use]
    #[inline]
    pub fn cell(&self, coord: Coord) -> &Cell {
        &self.cells[coord.index()]
    }

    /// Returns an iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Returns an iterator over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        Coord::grid(self.size)
    }

    /// Returns all 3N houses: rows, then columns, then boxes.
    #[must_use]
    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    /// Returns the house with the given index into [`houses`](Field::houses).
    #[must_use]
    pub fn house(&self, id: usize) -> &House {
        &self.houses[id]
    }

    /// Returns the N row houses, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[House] {
        &self.houses[..usize::from(self.size)]
    }

    /// Returns the N column houses, left to right.
    #[must_use]
    pub fn columns(&self) -> &[House] {
        &self.houses[usize::from(self.size)..2 * usize::from(self.size)]
    }

    /// Returns the N box houses, left to right, top to bottom.
    #[must_use]
    pub fn boxes(&self) -> &[House] {
        &self.houses[2 * usize::from(self.size)..]
    }

    /// Returns every cell sharing a house with `coord`, excluding the
    /// cell itself (20 cells on a 9×9 grid).
    #[must_use]
    pub fn peers(&self, coord: Coord) -> CellSet {
        let mut peers = CellSet::new();
        for c in coord.same_row_coordinates() {
            peers.add(c);
        }
        for c in coord.same_column_coordinates() {
            peers.add(c);
        }
        for c in coord.same_box_coordinates() {
            peers.add(c);
        }
        peers
    }

    /// Returns the cells that are peers of both `a` and `b`.
    #[must_use]
    pub fn common_peers(&self, a: Coord, b: Coord) -> CellSet {
        self.peers(a).intersection(&self.peers(b))
    }

    /// Returns the ids of the houses containing both `a` and `b` —
    /// empty, one, or two houses for distinct cells.
    #[must_use]
    pub fn common_houses(&self, a: Coord, b: Coord) -> Vec<usize> {
        self.cell(a)
            .house_ids()
            .into_iter()
            .filter(|&id| self.houses[id].cells().contains(b))
            .collect()
    }

    /// Places `value` into the cell at `coord` and removes it from the
    /// candidates of every cell in the same row, column, and box.
    ///
    /// The value is stamped in unconditionally — loading a puzzle with
    /// duplicate givens succeeds and is reported by
    /// [`is_valid`](Field::is_valid) instead.
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction`] if the propagation strips some peer of
    /// its last candidate.
    ///
    /// # Panics
    ///
    /// Panics if `value` is outside `1..=N`.
    pub fn set_value(
        &mut self,
        coord: Coord,
        value: u8,
        initial: bool,
    ) -> Result<(), Contradiction> {
        assert!(
            1 <= value && value <= self.size,
            "value out of range for this grid"
        );
        self.cells[coord.index()].assign(value, initial);
        trace!("value {value} set into {coord}");

        for house_id in self.cells[coord.index()].house_ids() {
            // Houses are index lists, so a cheap clone frees the borrow.
            let members = self.houses[house_id].cells().clone();
            for member in members.iter() {
                if member != coord {
                    self.remove_candidate(member, value)?;
                }
            }
        }
        Ok(())
    }

    /// Removes `value` from the candidates of the cell at `coord`.
    ///
    /// Removing from a resolved cell, or removing a value that is not a
    /// candidate, is an explicit no-op returning `false` — techniques
    /// call this speculatively.
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction`] if the removal empties the cell's mask.
    ///
    /// # Panics
    ///
    /// Panics if `value` is outside `1..=N`.
    pub fn remove_candidate(&mut self, coord: Coord, value: u8) -> Result<bool, Contradiction> {
        self.remove_candidates(coord, ValueSet::from_values(self.size, [value]))
    }

    /// Removes every value in `mask` from the candidates of the cell at
    /// `coord`. No-op rules match [`remove_candidate`](Field::remove_candidate).
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction`] if the removal empties the cell's mask.
    pub fn remove_candidates(
        &mut self,
        coord: Coord,
        mask: ValueSet,
    ) -> Result<bool, Contradiction> {
        let changed = self.cells[coord.index()].clear_candidates(mask)?;
        if changed {
            trace!("candidates {mask} removed from {coord}");
        }
        Ok(changed)
    }

    /// Removes `value` from the candidates of every cell in `set`.
    ///
    /// Returns `true` if any cell changed.
    ///
    /// # Errors
    ///
    /// Returns [`Contradiction`] if some removal empties a cell's mask.
    pub fn remove_candidate_in(
        &mut self,
        set: &CellSet,
        value: u8,
    ) -> Result<bool, Contradiction> {
        let mut changed = false;
        for coord in set.iter() {
            changed |= self.remove_candidate(coord, value)?;
        }
        Ok(changed)
    }

    /// Returns `true` if every cell and every house is consistent: no
    /// emptied candidate mask, no resolved cell disagreeing with its
    /// mask, no value twice in a house.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.cells.iter().all(Cell::is_valid)
            && self.houses.iter().all(|house| house.is_valid(self))
    }

    /// Returns `true` if any cell is still unresolved.
    #[must_use]
    pub fn has_unresolved(&self) -> bool {
        self.cells.iter().any(|cell| !cell.is_resolved())
    }

    /// Returns `true` if the grid is valid and every cell is resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.is_valid() && !self.has_unresolved()
    }

    /// Clears every cell back to "all candidates open", keeping the
    /// cell and house structure, ready for a puzzle reload.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: u8, col: u8) -> Coord {
        Coord::new(row, col, 9)
    }

    #[test]
    fn test_structure() {
        let field = Field::with_size(9);
        assert_eq!(field.size(), 9);
        assert_eq!(field.box_size(), 3);
        assert_eq!(field.cells().count(), 81);
        assert_eq!(field.houses().len(), 27);
        assert_eq!(field.rows().len(), 9);
        assert_eq!(field.columns().len(), 9);
        assert_eq!(field.boxes().len(), 9);
    }

    #[test]
    fn test_every_cell_sits_in_three_houses() {
        let field = Field::with_size(9);
        for coord in field.coords() {
            let ids = field.cell(coord).house_ids();
            assert_eq!(field.house(ids[0]).kind(), HouseKind::Row);
            assert_eq!(field.house(ids[1]).kind(), HouseKind::Column);
            assert_eq!(field.house(ids[2]).kind(), HouseKind::Box);
            for id in ids {
                assert!(field.house(id).cells().contains(coord));
            }
        }
    }

    #[test]
    #[should_panic(expected = "perfect square")]
    fn test_non_square_size_panics() {
        let _ = Field::with_size(8);
    }

    #[test]
    fn test_peers_count_and_self_exclusion() {
        let field = Field::with_size(9);
        for coord in [c(1, 1), c(5, 5), c(9, 9), c(2, 7)] {
            let peers = field.peers(coord);
            assert_eq!(peers.len(), 20);
            assert!(!peers.contains(coord));
        }
    }

    #[test]
    fn test_common_peers() {
        let field = Field::with_size(9);
        // Two cells in the same row share the rest of the row plus the
        // row-aligned cells of each other's boxes.
        let common = field.common_peers(c(1, 1), c(1, 9));
        assert!(common.contains(c(1, 5)));
        assert!(!common.contains(c(2, 2)));

        // Cells sharing nothing still see each other's row/column
        // crossings.
        let common = field.common_peers(c(1, 1), c(5, 5));
        assert_eq!(common.len(), 2);
        assert!(common.contains(c(1, 5)));
        assert!(common.contains(c(5, 1)));
    }

    #[test]
    fn test_common_houses() {
        let field = Field::with_size(9);
        // Same row and same box.
        assert_eq!(field.common_houses(c(1, 1), c(1, 2)).len(), 2);
        // Same row only.
        assert_eq!(field.common_houses(c(1, 1), c(1, 9)).len(), 1);
        // Nothing shared.
        assert_eq!(field.common_houses(c(1, 1), c(5, 5)).len(), 0);
    }

    #[test]
    fn test_set_value_propagates_to_peers() {
        let mut field = Field::with_size(9);
        field.set_value(c(1, 1), 5, true).unwrap();

        assert_eq!(field.cell(c(1, 1)).value(), Some(5));
        assert!(field.cell(c(1, 1)).is_initial());
        for peer in field.peers(c(1, 1)).iter() {
            assert!(!field.cell(peer).has_candidate(5));
        }
        // A non-peer keeps the candidate.
        assert!(field.cell(c(5, 5)).has_candidate(5));
    }

    #[test]
    fn test_remove_candidate_is_idempotent() {
        let mut field = Field::with_size(9);
        assert!(field.remove_candidate(c(1, 1), 3).unwrap());
        assert!(!field.remove_candidate(c(1, 1), 3).unwrap());
    }

    #[test]
    fn test_remove_candidate_from_resolved_cell_is_noop() {
        let mut field = Field::with_size(9);
        field.set_value(c(1, 1), 5, false).unwrap();
        assert!(!field.remove_candidate(c(1, 1), 5).unwrap());
        assert!(field.cell(c(1, 1)).has_candidate(5));
    }

    #[test]
    fn test_removing_last_candidate_contradicts_and_invalidates() {
        let mut field = Field::with_size(9);
        field
            .remove_candidates(c(1, 1), ValueSet::from_values(9, 1..=8))
            .unwrap();
        let err = field.remove_candidate(c(1, 1), 9).unwrap_err();
        assert_eq!(err.coord, c(1, 1));
        assert!(!field.is_valid());
    }

    #[test]
    fn test_set_value_contradicts_when_peer_runs_dry() {
        let mut field = Field::with_size(9);
        // R1C2 can only be 5; placing 5 in R1C1 empties it.
        field
            .remove_candidates(c(1, 2), ValueSet::from_values(9, 1..=4))
            .unwrap();
        field
            .remove_candidates(c(1, 2), ValueSet::from_values(9, 6..=9))
            .unwrap();
        let err = field.set_value(c(1, 1), 5, false).unwrap_err();
        assert_eq!(err.coord, c(1, 2));
        assert!(!field.is_valid());
    }

    #[test]
    fn test_validity_of_fresh_and_duplicated_fields() {
        let mut field = Field::with_size(9);
        assert!(field.is_valid());
        assert!(field.has_unresolved());
        assert!(!field.is_resolved());

        field.set_value(c(1, 1), 5, true).unwrap();
        field.set_value(c(1, 9), 5, true).unwrap();
        assert!(!field.is_valid());
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut field = Field::with_size(9);
        field.set_value(c(1, 1), 5, true).unwrap();
        field.remove_candidate(c(9, 9), 3).unwrap();
        field.reset();
        assert!(field.is_valid());
        assert!(!field.cell(c(1, 1)).is_resolved());
        assert_eq!(field.cell(c(9, 9)).candidate_count(), 9);
    }

    #[test]
    fn test_16x16_structure() {
        let field = Field::with_size(16);
        assert_eq!(field.cells().count(), 256);
        assert_eq!(field.houses().len(), 48);
        assert_eq!(field.peers(Coord::new(8, 8, 16)).len(), 2 * 15 + 9);
    }
}
