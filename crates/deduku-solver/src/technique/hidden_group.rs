//! The hidden group technique (hidden pair / triple / quad).

use deduku_core::{Coord, Field};
use log::debug;

use super::{Technique, for_each_house, group_masks};
use crate::{SolverError, resolver::StopToken};

const NAME: &str = "Hidden Group";

/// Finds k values confined to k cells of a house and strips everything
/// else from those cells.
///
/// The group is "hidden" because its cells still carry outside
/// candidates. A mask qualifies when exactly k cells share two or more
/// of its values and no cell holds exactly one of them — a
/// single-shared-candidate cell would make the k values spill past the
/// k cells.
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenGroup;

impl Technique for HiddenGroup {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError> {
        let masks = group_masks(field.size());
        for_each_house(field, stop, |field, house_id| {
            let cells = field.house(house_id).cells().clone();
            'masks: for mask in masks.iter() {
                // The whole unresolved remainder is not a group.
                if mask.len() == cells.unresolved_count(field) {
                    continue;
                }
                let mut members: Vec<Coord> = Vec::new();
                for coord in cells.iter() {
                    let cell = field.cell(coord);
                    let shared = cell.candidates().intersection(*mask).len();
                    if shared == 1 {
                        continue 'masks;
                    }
                    if shared > 1 && !cell.is_resolved() {
                        members.push(coord);
                    }
                }
                if members.len() != mask.len() {
                    continue;
                }

                let mut changed = false;
                for &coord in &members {
                    changed |= field.remove_candidates(coord, mask.complement())?;
                }
                if changed {
                    debug!(
                        "hidden group {mask} found in {}",
                        field.house(house_id).name()
                    );
                    return Ok(true);
                }
            }
            Ok(false)
        })
    }
}
