//! The naked single technique.

use deduku_core::Field;
use log::debug;

use super::{Technique, for_each_cell};
use crate::{SolverError, resolver::StopToken};

const NAME: &str = "Naked Single";

/// Places the value of any cell left with exactly one candidate.
///
/// This is the one technique that can never be disabled: together with
/// the peer propagation performed by
/// [`Field::set_value`](deduku_core::Field::set_value) it forms the
/// constraint-propagation backbone everything else builds on.
#[derive(Debug, Default, Clone, Copy)]
pub struct NakedSingle;

impl Technique for NakedSingle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn can_be_disabled(&self) -> bool {
        false
    }

    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError> {
        for_each_cell(field, stop, |field, coord| {
            let cell = field.cell(coord);
            if cell.is_resolved() || cell.candidate_count() != 1 {
                return Ok(false);
            }
            let Some(value) = cell.candidates().first() else {
                return Ok(false);
            };
            debug!("naked single {value} found in {coord}");
            field.set_value(coord, value, false)?;
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use deduku_core::{Coord, Field, ValueSet};

    use super::*;
    use crate::testing::TechniqueTester;

    #[test]
    fn test_places_single_candidate_and_propagates() {
        let mut field = Field::with_size(9);
        // Leave only 5 at R1C1.
        field
            .remove_candidates(Coord::new(1, 1, 9), !ValueSet::from_values(9, [5]))
            .unwrap();

        TechniqueTester::new(field)
            .apply_once(&NakedSingle)
            .assert_changed()
            .assert_placed(Coord::new(1, 1, 9), 5)
            // Propagation removed 5 across row, column, and box.
            .assert_removed_includes(Coord::new(1, 9, 9), [5])
            .assert_removed_includes(Coord::new(9, 1, 9), [5])
            .assert_removed_includes(Coord::new(2, 2, 9), [5]);
    }

    #[test]
    fn test_no_change_on_fresh_field() {
        TechniqueTester::new(Field::with_size(9))
            .apply_once(&NakedSingle)
            .assert_unchanged();
    }

    #[test]
    fn test_second_application_is_idempotent() {
        let mut field = Field::with_size(9);
        field
            .remove_candidates(Coord::new(1, 1, 9), !ValueSet::from_values(9, [5]))
            .unwrap();

        TechniqueTester::new(field)
            .apply_until_stuck(&NakedSingle)
            .apply_once(&NakedSingle)
            .assert_unchanged();
    }

    #[test]
    fn test_contradiction_when_peer_runs_dry() {
        let mut field = Field::with_size(9);
        // R1C1 and R1C2 both reduced to {5}: placing one empties the
        // other.
        field
            .remove_candidates(Coord::new(1, 1, 9), !ValueSet::from_values(9, [5]))
            .unwrap();
        field
            .remove_candidates(Coord::new(1, 2, 9), !ValueSet::from_values(9, [5]))
            .unwrap();

        let stop = StopToken::new();
        let result = NakedSingle.apply(&mut field, &stop);
        assert!(result.is_err());
        assert!(!field.is_valid());
    }
}
