//! The X-Wing technique.

use deduku_core::{Coord, Field};
use log::debug;

use super::Technique;
use crate::{SolverError, resolver::StopToken};

const NAME: &str = "X-Wing";

/// The classic two-row / two-column fish pattern.
///
/// When a value has exactly two possible cells in each of two columns
/// and those cells line up on the same two rows, the value must occupy
/// diagonally opposite corners — so the two rows lose the value
/// everywhere else. The row/column-swapped form is handled
/// symmetrically.
#[derive(Debug, Default, Clone, Copy)]
pub struct XWing;

impl Technique for XWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError> {
        let size = field.size();
        let mut changed = false;

        for col_a in 1..size {
            for col_b in col_a + 1..=size {
                if stop.is_stop_requested() {
                    return Ok(changed);
                }
                for row_1 in 1..size {
                    for row_2 in row_1 + 1..=size {
                        let a1 = Coord::new(row_1, col_a, size);
                        let a2 = Coord::new(row_2, col_a, size);
                        let b1 = Coord::new(row_1, col_b, size);
                        let b2 = Coord::new(row_2, col_b, size);

                        if field.cell(a1).is_resolved()
                            || field.cell(a2).is_resolved()
                            || field.cell(b1).is_resolved()
                            || field.cell(b2).is_resolved()
                        {
                            continue;
                        }

                        let corner_mask = field
                            .cell(a1)
                            .common_candidates(field.cell(a2))
                            .intersection(field.cell(b1).common_candidates(field.cell(b2)));

                        // Scan the full value range, not the mask's
                        // population count.
                        for value in 1..=size {
                            if !corner_mask.contains(value) {
                                continue;
                            }
                            let col_a_count = field.columns()[usize::from(col_a) - 1]
                                .cells()
                                .candidate_count(field, value);
                            let col_b_count = field.columns()[usize::from(col_b) - 1]
                                .cells()
                                .candidate_count(field, value);
                            let row_1_count = field.rows()[usize::from(row_1) - 1]
                                .cells()
                                .candidate_count(field, value);
                            let row_2_count = field.rows()[usize::from(row_2) - 1]
                                .cells()
                                .candidate_count(field, value);

                            if col_a_count == 2
                                && col_b_count == 2
                                && (row_1_count > 2 || row_2_count > 2)
                            {
                                debug!(
                                    "columns x-wing found for {value} in {a1} {a2} {b1} {b2}"
                                );
                                for col in 1..=size {
                                    if col == col_a || col == col_b {
                                        continue;
                                    }
                                    changed |= field
                                        .remove_candidate(Coord::new(row_1, col, size), value)?;
                                    changed |= field
                                        .remove_candidate(Coord::new(row_2, col, size), value)?;
                                }
                            }
                            if row_1_count == 2
                                && row_2_count == 2
                                && (col_a_count > 2 || col_b_count > 2)
                            {
                                debug!(
                                    "rows x-wing found for {value} in {a1} {a2} {b1} {b2}"
                                );
                                for row in 1..=size {
                                    if row == row_1 || row == row_2 {
                                        continue;
                                    }
                                    changed |= field
                                        .remove_candidate(Coord::new(row, col_a, size), value)?;
                                    changed |= field
                                        .remove_candidate(Coord::new(row, col_b, size), value)?;
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use deduku_core::Field;

    use super::*;
    use crate::testing::TechniqueTester;

    fn c(row: u8, col: u8) -> Coord {
        Coord::new(row, col, 9)
    }

    /// Confines 1 in columns 2 and 7 to rows 1 and 5.
    fn field_with_column_x_wing() -> Field {
        let mut field = Field::with_size(9);
        for row in 1..=9 {
            if row == 1 || row == 5 {
                continue;
            }
            field.remove_candidate(c(row, 2), 1).unwrap();
            field.remove_candidate(c(row, 7), 1).unwrap();
        }
        field
    }

    #[test]
    fn test_column_x_wing_strips_rows() {
        TechniqueTester::new(field_with_column_x_wing())
            .apply_once(&XWing)
            .assert_changed()
            .assert_removed_includes(c(1, 1), [1])
            .assert_removed_includes(c(1, 9), [1])
            .assert_removed_includes(c(5, 4), [1])
            // The corners keep the value.
            .assert_no_change(c(1, 2))
            .assert_no_change(c(5, 7));
    }

    #[test]
    fn test_row_x_wing_strips_columns() {
        let mut field = Field::with_size(9);
        // 4 in rows 3 and 8 confined to columns 1 and 6.
        for col in 2..=9 {
            if col == 6 {
                continue;
            }
            field.remove_candidate(c(3, col), 4).unwrap();
            field.remove_candidate(c(8, col), 4).unwrap();
        }

        TechniqueTester::new(field)
            .apply_once(&XWing)
            .assert_changed()
            .assert_removed_includes(c(1, 1), [4])
            .assert_removed_includes(c(9, 6), [4])
            .assert_no_change(c(3, 1))
            .assert_no_change(c(8, 6));
    }

    #[test]
    fn test_no_change_without_pattern() {
        TechniqueTester::new(Field::with_size(9))
            .apply_once(&XWing)
            .assert_unchanged();
    }

    #[test]
    fn test_second_application_is_idempotent() {
        // After the eliminations the covered rows hold the value twice,
        // so the trigger condition (more than two positions) is gone.
        TechniqueTester::new(field_with_column_x_wing())
            .apply_until_stuck(&XWing)
            .apply_once(&XWing)
            .assert_unchanged();
    }
}
