//! The hidden single technique.

use deduku_core::Field;
use log::debug;

use super::{Technique, for_each_house};
use crate::{SolverError, resolver::StopToken};

const NAME: &str = "Hidden Single";

/// Places a value that has exactly one possible position in a house.
///
/// The cell itself may still carry many candidates — the single is
/// "hidden" among them — but no other cell of the house can take the
/// value, so this one must.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenSingle;

impl Technique for HiddenSingle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError> {
        for_each_house(field, stop, |field, house_id| {
            let cells = field.house(house_id).cells().clone();
            for value in 1..=field.size() {
                let mut positions = cells
                    .iter()
                    .filter(|&c| !field.cell(c).is_resolved() && field.cell(c).has_candidate(value));
                let Some(only) = positions.next() else {
                    continue;
                };
                if positions.next().is_some() {
                    continue;
                }
                debug!(
                    "hidden single {value} found in {only} ({})",
                    field.house(house_id).name()
                );
                field.set_value(only, value, false)?;
                return Ok(true);
            }
            Ok(false)
        })
    }
}
