//! The catalog of solving techniques.
//!
//! Every technique implements the [`Technique`] trait and composes its
//! whole effect out of the three `Field` mutation primitives, so the
//! peer-propagation invariant holds no matter which techniques run.
//! [`all_techniques`] returns the catalog ordered from cheapest to most
//! complex; the resolver restarts from the top after every change, which
//! keeps it on the cheapest applicable deduction at each step.

use std::fmt::Debug;

use bitflags::bitflags;
use deduku_core::{Coord, Field};

pub use self::{
    coloring::BiLocationColoring, hidden_group::HiddenGroup, hidden_single::HiddenSingle,
    intersections::Intersections, naked_group::NakedGroup, naked_single::NakedSingle,
    unique_rectangle::UniqueRectangle, x_wing::XWing, xyz_wing::XyzWing, y_wing::YWing,
};
use crate::{SolverError, resolver::StopToken};

mod coloring;
mod combinations;
mod hidden_group;
mod hidden_single;
mod intersections;
mod naked_group;
mod naked_single;
mod unique_rectangle;
mod x_wing;
mod xyz_wing;
mod y_wing;

pub(crate) use self::combinations::group_masks;

/// One logical deduction strategy.
///
/// A technique reads the field, decides whether its pattern applies
/// anywhere, and performs its eliminations or placements through the
/// field's mutation primitives.
pub trait Technique: Debug {
    /// Returns the stable, human-readable technique name.
    fn name(&self) -> &'static str;

    /// Returns `false` for techniques that must always run.
    ///
    /// Naked single is the constraint-propagation backbone of the
    /// solver and cannot be turned off.
    fn can_be_disabled(&self) -> bool {
        true
    }

    /// Runs the technique over the whole field.
    ///
    /// Returns `Ok(true)` if any cell changed state. Long scans check
    /// `stop` between houses or candidate values and bail out early
    /// with whatever progress was already made.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] when a deduction proves the puzzle
    /// unsolvable.
    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError>;
}

/// A boxed technique, as stored by the resolver.
pub type BoxedTechnique = Box<dyn Technique>;

bitflags! {
    /// A selection of techniques, one bit per catalog entry.
    ///
    /// Used to build a resolver with part of the catalog enabled — the
    /// way the CLI's `--no-*` flags and difficulty experiments pick
    /// their technique sets.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TechniqueSet: u16 {
        /// [`NakedSingle`] — always effectively enabled.
        const NAKED_SINGLE = 1;
        /// [`HiddenSingle`].
        const HIDDEN_SINGLE = 1 << 1;
        /// [`NakedGroup`].
        const NAKED_GROUP = 1 << 2;
        /// [`HiddenGroup`].
        const HIDDEN_GROUP = 1 << 3;
        /// [`Intersections`].
        const INTERSECTIONS = 1 << 4;
        /// [`BiLocationColoring`].
        const BI_LOCATION_COLORING = 1 << 5;
        /// [`XWing`].
        const X_WING = 1 << 6;
        /// [`YWing`].
        const Y_WING = 1 << 7;
        /// [`XyzWing`].
        const XYZ_WING = 1 << 8;
        /// [`UniqueRectangle`].
        const UNIQUE_RECTANGLE = 1 << 9;
    }
}

impl TechniqueSet {
    /// The catalog flags in default registration order, matching
    /// [`all_techniques`].
    pub const ORDERED: [Self; 10] = [
        Self::NAKED_SINGLE,
        Self::HIDDEN_SINGLE,
        Self::NAKED_GROUP,
        Self::HIDDEN_GROUP,
        Self::INTERSECTIONS,
        Self::BI_LOCATION_COLORING,
        Self::X_WING,
        Self::Y_WING,
        Self::XYZ_WING,
        Self::UNIQUE_RECTANGLE,
    ];
}

/// Returns the full catalog, ordered from cheapest to most complex.
///
/// The order is significant: the resolver returns to the top of this
/// list after every change, so simple logic always runs before the
/// expensive pattern searches.
#[must_use]
pub fn all_techniques() -> Vec<BoxedTechnique> {
    vec![
        Box::new(NakedSingle),
        Box::new(HiddenSingle),
        Box::new(NakedGroup),
        Box::new(HiddenGroup),
        Box::new(Intersections),
        Box::new(BiLocationColoring::new()),
        Box::new(XWing),
        Box::new(YWing),
        Box::new(XyzWing),
        Box::new(UniqueRectangle),
    ]
}

/// Visits every cell in row-major order, short-circuiting after the
/// first cell whose visit changes the field.
///
/// Returning to the pipeline after any change keeps the solver on the
/// cheapest applicable technique.
pub(crate) fn for_each_cell<F>(
    field: &mut Field,
    stop: &StopToken,
    mut visit: F,
) -> Result<bool, SolverError>
where
    F: FnMut(&mut Field, Coord) -> Result<bool, SolverError>,
{
    for coord in Coord::grid(field.size()) {
        if stop.is_stop_requested() {
            return Ok(false);
        }
        if visit(field, coord)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Visits every house (rows, then columns, then boxes), short-circuiting
/// after the first house whose visit changes the field.
pub(crate) fn for_each_house<F>(
    field: &mut Field,
    stop: &StopToken,
    mut visit: F,
) -> Result<bool, SolverError>
where
    F: FnMut(&mut Field, usize) -> Result<bool, SolverError>,
{
    for house_id in 0..field.houses().len() {
        if stop.is_stop_requested() {
            return Ok(false);
        }
        if visit(field, house_id)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_matches_flags() {
        let techniques = all_techniques();
        assert_eq!(techniques.len(), TechniqueSet::ORDERED.len());
        assert_eq!(techniques[0].name(), "Naked Single");
        assert_eq!(techniques[9].name(), "Unique Rectangle");
    }

    #[test]
    fn test_only_naked_single_is_mandatory() {
        for technique in all_techniques() {
            let mandatory = technique.name() == "Naked Single";
            assert_eq!(!technique.can_be_disabled(), mandatory);
        }
    }

    #[test]
    fn test_names_are_unique() {
        let techniques = all_techniques();
        for (i, a) in techniques.iter().enumerate() {
            for b in &techniques[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}
