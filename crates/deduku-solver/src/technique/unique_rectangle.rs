//! The unique rectangle technique.

use deduku_core::{Coord, Field, ValueSet};
use log::debug;

use super::{Technique, for_each_cell};
use crate::{SolverError, resolver::StopToken};

const NAME: &str = "Unique Rectangle";

/// Avoids the deadly pattern: four cells on two rows, two columns, and
/// two boxes all reduced to the same two candidates.
///
/// Such a rectangle could swap its two values freely, so a puzzle with
/// a unique solution can never contain one — which lets the solver
/// eliminate whatever would complete it. This is the one technique
/// that *assumes* the solution is unique.
///
/// Three checks run per rectangle, first hit wins:
///
/// 1. **Type 1** — three corners hold the bare pair: the fourth corner
///    can hold neither of its values.
/// 2. **Type 2** — two corners hold the pair, the other two hold the
///    pair plus the same extra value: one of them must take the extra,
///    so every cell seeing both loses it.
/// 3. **Type 3** — the two extras differ: together the extra cells
///    consume the values of a virtual pair `{y,z}`, and if a real
///    `{y,z}` cell sits in a shared house, the rest of that house
///    loses both values.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueRectangle;

fn check_rectangle(
    field: &mut Field,
    floor_mask: ValueSet,
    pivot: Coord,
    row_mate: Coord,
    col_mate: Coord,
    diagonal: Coord,
) -> Result<bool, SolverError> {
    // Type 1.
    if field.cell(row_mate).candidates() == floor_mask
        && field.cell(col_mate).candidates() == floor_mask
        && !field.cell(diagonal).is_resolved()
        && field.remove_candidates(diagonal, floor_mask)?
    {
        debug!(
            "unique rectangle (type 1) at {pivot} {row_mate} {col_mate}: clearing {floor_mask} from {diagonal}"
        );
        return Ok(true);
    }

    // Type 2: the second floor cell may be any of the three corners.
    for (floor_mate, roof_a, roof_b) in [
        (row_mate, col_mate, diagonal),
        (col_mate, row_mate, diagonal),
        (diagonal, row_mate, col_mate),
    ] {
        if field.cell(floor_mate).candidates() != floor_mask {
            continue;
        }
        let roof_mask = field.cell(roof_a).candidates();
        if roof_mask != field.cell(roof_b).candidates()
            || roof_mask.len() != 3
            || !floor_mask.is_subset(roof_mask)
        {
            continue;
        }
        let Some(extra) = roof_mask.difference(floor_mask).first() else {
            continue;
        };
        let seen_by_both = field.common_peers(roof_a, roof_b);
        if field.remove_candidate_in(&seen_by_both, extra)? {
            debug!(
                "unique rectangle (type 2) at {pivot} {floor_mate}: {extra} leaves cells seeing {roof_a} and {roof_b}"
            );
            return Ok(true);
        }
    }

    // Type 3: extras differ; the roof cells share a line with the
    // pivot's floor partner on the opposite side.
    for (floor_mate, roof_a, roof_b) in [
        (row_mate, col_mate, diagonal),
        (col_mate, row_mate, diagonal),
    ] {
        if field.cell(floor_mate).candidates() != floor_mask {
            continue;
        }
        let mask_a = field.cell(roof_a).candidates();
        let mask_b = field.cell(roof_b).candidates();
        if mask_a.len() != 3
            || mask_b.len() != 3
            || !floor_mask.is_subset(mask_a)
            || !floor_mask.is_subset(mask_b)
        {
            continue;
        }
        let (Some(y), Some(z)) = (
            mask_a.difference(floor_mask).first(),
            mask_b.difference(floor_mask).first(),
        ) else {
            continue;
        };
        if y == z {
            continue;
        }
        let virtual_mask = ValueSet::from_values(field.size(), [y, z]);
        for house_id in field.common_houses(roof_a, roof_b) {
            let cells = field.house(house_id).cells().clone();
            let Some(host) = cells.iter().find(|&coord| {
                coord != roof_a && coord != roof_b && field.cell(coord).candidates() == virtual_mask
            }) else {
                continue;
            };
            let mut changed = false;
            for coord in cells.iter() {
                if coord == roof_a || coord == roof_b || coord == host {
                    continue;
                }
                changed |= field.remove_candidates(coord, virtual_mask)?;
            }
            if changed {
                debug!(
                    "unique rectangle (type 3) at {pivot} {floor_mate}: virtual pair {virtual_mask} hosted by {host}"
                );
                return Ok(true);
            }
        }
    }

    Ok(false)
}

impl Technique for UniqueRectangle {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError> {
        for_each_cell(field, stop, |field, pivot| {
            let pivot_cell = field.cell(pivot);
            if pivot_cell.is_resolved() || pivot_cell.candidate_count() != 2 {
                return Ok(false);
            }
            let floor_mask = pivot_cell.candidates();
            let size = field.size();
            let b = field.box_size();

            for row in 1..=size {
                if row == pivot.row() {
                    continue;
                }
                for col in 1..=size {
                    if col == pivot.col() {
                        continue;
                    }
                    // The deadly pattern spans exactly two boxes: the
                    // rows share a band or the columns share a stack,
                    // never both, never neither.
                    let same_band = (pivot.row() - 1) / b == (row - 1) / b;
                    let same_stack = (pivot.col() - 1) / b == (col - 1) / b;
                    if same_band == same_stack {
                        continue;
                    }

                    let row_mate = Coord::new(pivot.row(), col, size);
                    let col_mate = Coord::new(row, pivot.col(), size);
                    let diagonal = Coord::new(row, col, size);
                    if check_rectangle(field, floor_mask, pivot, row_mate, col_mate, diagonal)? {
                        return Ok(true);
                    }
                }
            }
            Ok(false)
        })
    }
}
