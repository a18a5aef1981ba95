//! The Y-Wing (XY-Wing) technique.

use deduku_core::{Coord, Field};
use log::debug;

use super::{Technique, for_each_cell};
use crate::{SolverError, resolver::StopToken};

const NAME: &str = "Y-Wing";

/// The bent pair: a pivot `{A,B}` with pincers `{A,C}` and `{B,C}`.
///
/// Whichever value the pivot takes, one of the pincers becomes `C`, so
/// any cell that sees both pincers can never be `C`.
#[derive(Debug, Default, Clone, Copy)]
pub struct YWing;

impl Technique for YWing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError> {
        for_each_cell(field, stop, |field, pivot| {
            if field.cell(pivot).candidate_count() != 2 {
                return Ok(false);
            }
            let candidates: Vec<u8> = field.cell(pivot).candidates().iter().collect();
            let &[a, b] = candidates.as_slice() else {
                return Ok(false);
            };

            let bivalue_peers: Vec<Coord> = field
                .peers(pivot)
                .iter()
                .filter(|&coord| field.cell(coord).candidate_count() == 2)
                .collect();

            let mut changed = false;
            for c in 1..=field.size() {
                if c == a || c == b {
                    continue;
                }
                let pincers_ac: Vec<Coord> = bivalue_peers
                    .iter()
                    .copied()
                    .filter(|&coord| {
                        field.cell(coord).has_candidate(c) && field.cell(coord).has_candidate(a)
                    })
                    .collect();
                let pincers_bc: Vec<Coord> = bivalue_peers
                    .iter()
                    .copied()
                    .filter(|&coord| {
                        field.cell(coord).has_candidate(c) && field.cell(coord).has_candidate(b)
                    })
                    .collect();

                for &ac in &pincers_ac {
                    for &bc in &pincers_bc {
                        debug!("y-wing found: pivot {pivot}, pincers {ac} / {bc}");
                        let seen_by_both = field.common_peers(ac, bc);
                        changed |= field.remove_candidate_in(&seen_by_both, c)?;
                    }
                }
            }
            Ok(changed)
        })
    }
}
