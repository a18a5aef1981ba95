//! The locked-candidates (box/line intersection) technique.

use deduku_core::{CellSet, Field};
use log::debug;

use super::Technique;
use crate::{SolverError, resolver::StopToken};

const NAME: &str = "Intersections";

/// Box/line locked candidates: pointing and claiming in one scan.
///
/// For a box B and a line L crossing it, split the cells into the
/// intersection `I`, the box remainder `B − L`, and the line remainder
/// `L − B`. A value whose box candidates all sit in `I` is forced onto
/// the line there, so the line remainder loses it (pointing); a value
/// whose line candidates all sit in `I` is forced into the box there,
/// so the box remainder loses it (claiming).
#[derive(Debug, Default, Clone, Copy)]
pub struct Intersections;

fn reduce_intersection(
    field: &mut Field,
    square: &CellSet,
    line: &CellSet,
) -> Result<bool, SolverError> {
    let inter = square.intersection(line);
    if inter.is_empty() {
        return Ok(false);
    }
    let box_rest = square.difference(line);
    let line_rest = line.difference(square);

    let mut changed = false;
    for value in 1..=field.size() {
        if inter.candidate_count(field, value) == 0 {
            continue;
        }
        if box_rest.candidate_count(field, value) == 0
            && line_rest.candidate_count(field, value) != 0
        {
            debug!("{value} locked into a box/line intersection: pointing");
            changed |= field.remove_candidate_in(&line_rest, value)?;
        }
        if line_rest.candidate_count(field, value) == 0
            && box_rest.candidate_count(field, value) != 0
        {
            debug!("{value} locked into a box/line intersection: claiming");
            changed |= field.remove_candidate_in(&box_rest, value)?;
        }
    }
    Ok(changed)
}

impl Technique for Intersections {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError> {
        let size = usize::from(field.size());
        let mut changed = false;
        for box_index in 0..size {
            if stop.is_stop_requested() {
                return Ok(changed);
            }
            let square = field.boxes()[box_index].cells().clone();
            // Rows then columns; only the crossing lines have a
            // non-empty intersection.
            for line_id in 0..2 * size {
                let line = field.house(line_id).cells().clone();
                changed |= reduce_intersection(field, &square, &line)?;
            }
        }
        Ok(changed)
    }
}
