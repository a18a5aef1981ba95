//! Rows, columns, and boxes.

use std::fmt::{self, Display};

use crate::{CellSet, Coord, Field, ValueSet};

/// The three kinds of house on a sudoku grid.
///
/// The kinds share all behavior; they exist for naming and for the
/// box/line intersection arithmetic of the locked-candidates technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HouseKind {
    /// A horizontal line of N cells.
    Row,
    /// A vertical line of N cells.
    Column,
    /// A √N×√N sub-square.
    Box,
}

impl Display for HouseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            HouseKind::Row => 'R',
            HouseKind::Column => 'C',
            HouseKind::Box => 'B',
        };
        write!(f, "{letter}")
    }
}

/// A set of exactly N cells that must hold each value `1..=N` once.
///
/// The field owns all houses; each cell is registered in one row, one
/// column, and one box. Houses hold coordinates, not cells, so queries
/// take the owning [`Field`].
#[derive(Debug, Clone)]
pub struct House {
    kind: HouseKind,
    index: u8,
    cells: CellSet,
}

impl House {
    pub(crate) fn new(kind: HouseKind, index: u8) -> Self {
        Self {
            kind,
            index,
            cells: CellSet::new(),
        }
    }

    pub(crate) fn register(&mut self, coord: Coord) {
        self.cells.add(coord);
    }

    /// Returns the kind of this house.
    #[must_use]
    pub const fn kind(&self) -> HouseKind {
        self.kind
    }

    /// Returns the 0-based index of this house among houses of its kind.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Returns the diagnostic name of the house: `R1`, `C4`, `B7`, …
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}{}", self.kind, self.index + 1)
    }

    /// Returns the cells of the house in grid order.
    #[must_use]
    pub const fn cells(&self) -> &CellSet {
        &self.cells
    }

    /// Returns `true` if no value occurs twice among resolved cells.
    ///
    /// Unresolved cells are ignored: right after loading, a cell whose
    /// candidates happen to be down to one value is still fine.
    #[must_use]
    pub fn is_valid(&self, field: &Field) -> bool {
        let mut seen = ValueSet::empty(field.size());
        for coord in self.cells.iter() {
            if let Some(value) = field.cell(coord).value() {
                if !seen.insert(value) {
                    return false;
                }
            }
        }
        true
    }

    /// Returns `true` if the house is valid and every cell is resolved.
    #[must_use]
    pub fn is_resolved(&self, field: &Field) -> bool {
        self.is_valid(field) && !self.cells.has_unresolved(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coord, Field};

    #[test]
    fn test_house_names() {
        let field = Field::with_size(9);
        assert_eq!(field.rows()[0].name(), "R1");
        assert_eq!(field.columns()[3].name(), "C4");
        assert_eq!(field.boxes()[8].name(), "B9");
    }

    #[test]
    fn test_each_house_holds_n_cells() {
        let field = Field::with_size(9);
        for house in field.houses() {
            assert_eq!(house.cells().len(), 9);
        }
    }

    #[test]
    fn test_duplicate_value_invalidates_house() {
        let mut field = Field::with_size(9);
        field.set_value(Coord::new(1, 1, 9), 5, true).unwrap();
        assert!(field.rows()[0].is_valid(&field));

        // Stamp the same value into the same row, as a bad puzzle would.
        field.set_value(Coord::new(1, 9, 9), 5, true).unwrap();
        assert!(!field.rows()[0].is_valid(&field));
        assert!(field.rows()[1].is_valid(&field));
    }

    #[test]
    fn test_box_membership_matches_coord_box_index() {
        let field = Field::with_size(9);
        for (i, house) in field.boxes().iter().enumerate() {
            assert_eq!(house.kind(), HouseKind::Box);
            for coord in house.cells().iter() {
                assert_eq!(usize::from(coord.box_index()), i);
            }
        }
    }
}
