//! The naked group technique (naked pair / triple / quad).

use deduku_core::{Coord, Field};
use log::debug;

use super::{Technique, for_each_house, group_masks};
use crate::{SolverError, resolver::StopToken};

const NAME: &str = "Naked Group";

/// Finds k cells of a house whose candidates fit inside one k-value
/// mask, then removes those values from the rest of the house.
///
/// If k cells can only hold values from a k-sized set, those values are
/// spoken for: no other cell of the house may take them. Masks of size
/// 2 through ⌊N/2⌋ are scanned from the precomputed combination table.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedGroup;

impl Technique for NakedGroup {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError> {
        let masks = group_masks(field.size());
        for_each_house(field, stop, |field, house_id| {
            let cells = field.house(house_id).cells().clone();
            for mask in masks.iter() {
                let members: Vec<Coord> = cells
                    .iter()
                    .filter(|&c| {
                        let cell = field.cell(c);
                        !cell.is_resolved() && cell.candidates().is_subset(*mask)
                    })
                    .collect();
                // A "group" the size of the whole unresolved house is
                // degenerate and pins nothing down.
                if members.len() != mask.len()
                    || cells.unresolved_count(field) <= members.len()
                {
                    continue;
                }

                let mut changed = false;
                for coord in cells.iter() {
                    let cell = field.cell(coord);
                    if cell.is_resolved() || members.contains(&coord) {
                        continue;
                    }
                    changed |= field.remove_candidates(coord, *mask)?;
                }
                if changed {
                    debug!(
                        "naked group {mask} found in {}",
                        field.house(house_id).name()
                    );
                    return Ok(true);
                }
            }
            Ok(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use deduku_core::{Field, ValueSet};

    use super::*;
    use crate::testing::TechniqueTester;

    fn c(row: u8, col: u8) -> Coord {
        Coord::new(row, col, 9)
    }

    fn pair(values: [u8; 2]) -> ValueSet {
        ValueSet::from_values(9, values)
    }

    /// R1C1 and R1C2 reduced to the naked pair {1, 2}.
    fn field_with_naked_pair() -> Field {
        let mut field = Field::with_size(9);
        field.remove_candidates(c(1, 1), !pair([1, 2])).unwrap();
        field.remove_candidates(c(1, 2), !pair([1, 2])).unwrap();
        field
    }

    #[test]
    fn test_naked_pair_strips_rest_of_row() {
        TechniqueTester::new(field_with_naked_pair())
            .apply_once(&NakedGroup)
            .assert_changed()
            .assert_removed_includes(c(1, 3), [1, 2])
            .assert_removed_includes(c(1, 9), [1, 2])
            // The pair cells themselves keep their candidates.
            .assert_no_change(c(1, 1))
            .assert_no_change(c(1, 2));
    }

    #[test]
    fn test_naked_pair_in_box_strips_box() {
        let mut field = Field::with_size(9);
        // A pair confined to box 1 but split across rows.
        field.remove_candidates(c(1, 1), !pair([8, 9])).unwrap();
        field.remove_candidates(c(2, 2), !pair([8, 9])).unwrap();

        TechniqueTester::new(field)
            .apply_once(&NakedGroup)
            .assert_changed()
            .assert_removed_includes(c(3, 3), [8, 9])
            .assert_removed_includes(c(1, 2), [8, 9]);
    }

    #[test]
    fn test_naked_triple() {
        let mut field = Field::with_size(9);
        let triple = ValueSet::from_values(9, [4, 5, 6]);
        field.remove_candidates(c(5, 1), !triple).unwrap();
        field.remove_candidates(c(5, 4), !triple).unwrap();
        // The third member holds a strict subset of the triple.
        field
            .remove_candidates(c(5, 8), !ValueSet::from_values(9, [4, 5]))
            .unwrap();

        TechniqueTester::new(field)
            .apply_once(&NakedGroup)
            .assert_changed()
            .assert_removed_includes(c(5, 2), [4, 5, 6])
            .assert_removed_includes(c(5, 9), [4, 5, 6]);
    }

    #[test]
    fn test_degenerate_group_is_rejected() {
        let mut field = Field::with_size(9);
        // Row 1 with exactly two unresolved cells — at opposite ends so
        // they share no box — both reduced to {1, 2}. The "pair" covers
        // every unresolved cell of the row and must not fire.
        for (col, value) in (2..=8).zip(3..=9) {
            field.set_value(c(1, col), value, true).unwrap();
        }
        assert_eq!(field.cell(c(1, 1)).candidates(), pair([1, 2]));
        assert_eq!(field.cell(c(1, 9)).candidates(), pair([1, 2]));

        TechniqueTester::new(field)
            .apply_once(&NakedGroup)
            .assert_unchanged();
    }

    #[test]
    fn test_no_change_on_fresh_field() {
        TechniqueTester::new(Field::with_size(9))
            .apply_once(&NakedGroup)
            .assert_unchanged();
    }

    #[test]
    fn test_second_application_is_idempotent() {
        TechniqueTester::new(field_with_naked_pair())
            .apply_until_stuck(&NakedGroup)
            .apply_once(&NakedGroup)
            .assert_unchanged();
    }
}
