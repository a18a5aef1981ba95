//! The XYZ-Wing technique.

use deduku_core::{Coord, Field};
use log::debug;

use super::{Technique, for_each_cell};
use crate::{SolverError, resolver::StopToken};

const NAME: &str = "XYZ-Wing";

/// The three-candidate pivot variant of the Y-Wing.
///
/// A pivot `{x,y,z}` pairs with an `{x,z}` cell in its box and a
/// `{y,z}` cell on its row or column. One of the three must be `z`, so
/// the cells that see all of them — the pivot-box cells on the shared
/// line — lose `z`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XyzWing;

/// Finds `{y,z}` pincers along one line of peer coordinates and applies
/// the eliminations for each.
fn reduce_along_line(
    field: &mut Field,
    pivot: Coord,
    xz: Coord,
    y: u8,
    line: &[Coord],
    same_line_of: fn(Coord) -> Vec<Coord>,
) -> Result<bool, SolverError> {
    let mut changed = false;
    for &yz in line {
        let yz_cell = field.cell(yz);
        if yz_cell.candidate_count() != 2
            || field.cell(pivot).common_candidates(yz_cell).len() != 2
            || !yz_cell.has_candidate(y)
        {
            continue;
        }
        let Some(z) = field
            .cell(yz)
            .candidates()
            .iter()
            .find(|&candidate| candidate != y)
        else {
            continue;
        };
        debug!(
            "xyz-wing found with apex {pivot} and wings {xz} / {yz}, eliminating {z}"
        );
        for seen in same_line_of(yz) {
            if seen.box_index() == pivot.box_index()
                && seen != pivot
                && seen != xz
                && seen != yz
            {
                changed |= field.remove_candidate(seen, z)?;
            }
        }
    }
    Ok(changed)
}

impl Technique for XyzWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError> {
        for_each_cell(field, stop, |field, pivot| {
            if field.cell(pivot).candidate_count() != 3 {
                return Ok(false);
            }
            let pivot_values: Vec<u8> = field.cell(pivot).candidates().iter().collect();
            let &[v1, v2, v3] = pivot_values.as_slice() else {
                return Ok(false);
            };

            let mut changed = false;
            for xz in pivot.same_box_coordinates() {
                let xz_cell = field.cell(xz);
                if xz_cell.candidate_count() != 2
                    || field.cell(pivot).common_candidates(xz_cell).len() != 2
                {
                    continue;
                }
                // The pivot candidate the box wing is missing.
                let y = if !field.cell(xz).has_candidate(v1) {
                    v1
                } else if !field.cell(xz).has_candidate(v2) {
                    v2
                } else {
                    v3
                };

                changed |= reduce_along_line(
                    field,
                    pivot,
                    xz,
                    y,
                    &pivot.same_row_coordinates(),
                    Coord::same_row_coordinates,
                )?;
                changed |= reduce_along_line(
                    field,
                    pivot,
                    xz,
                    y,
                    &pivot.same_column_coordinates(),
                    Coord::same_column_coordinates,
                )?;
            }
            Ok(changed)
        })
    }
}
