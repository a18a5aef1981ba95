//! The bi-location coloring technique.

use std::collections::BTreeMap;

use deduku_core::{Coord, Field};
use log::{debug, trace};

use super::Technique;
use crate::{SolverError, resolver::StopToken};

const NAME: &str = "Bi-Location Coloring";

/// A pair of cells that are the only two candidate positions for one
/// value inside one house: exactly one of them must take the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BiLocationLink {
    first: Coord,
    second: Coord,
}

impl BiLocationLink {
    fn new(a: Coord, b: Coord) -> Self {
        if b < a {
            Self {
                first: b,
                second: a,
            }
        } else {
            Self {
                first: a,
                second: b,
            }
        }
    }
}

/// A chain color. Colors are allocated in pairs `(2k, 2k+1)`; the two
/// halves of a pair are complementary, and a whole chain always uses
/// exactly one pair.
type CellColor = u32;

const fn anti_color(color: CellColor) -> CellColor {
    color ^ 1
}

const fn same_chain(a: CellColor, b: CellColor) -> bool {
    a / 2 == b / 2
}

/// The cells of each color, for one candidate value.
#[derive(Debug, Default)]
struct ColorVault {
    map: BTreeMap<CellColor, Vec<Coord>>,
    next_color: CellColor,
}

impl ColorVault {
    fn color_of(&self, coord: Coord) -> Option<CellColor> {
        self.map
            .iter()
            .find(|(_, cells)| cells.contains(&coord))
            .map(|(&color, _)| color)
    }

    fn new_pair(&mut self) -> (CellColor, CellColor) {
        let first = self.next_color;
        self.next_color += 2;
        (first, first + 1)
    }

    fn add_cell(&mut self, coord: Coord, color: CellColor) {
        self.map.entry(color).or_default().push(coord);
    }

    /// Moves every cell colored `from` to `to`, merging two chains.
    fn recolor(&mut self, from: CellColor, to: CellColor) {
        if let Some(mut cells) = self.map.remove(&from) {
            self.map.entry(to).or_default().append(&mut cells);
        }
    }

    fn cells_of(&self, color: CellColor) -> &[Coord] {
        self.map.get(&color).map_or(&[], Vec::as_slice)
    }

    /// Builds the 2-coloring for `value` over the given links.
    ///
    /// A link joining two same-colored cells of one chain is an
    /// odd-length loop — impossible on a consistent puzzle — while a
    /// link confirming opposite colors is an even loop and is absorbed
    /// silently.
    fn color_links(value: u8, links: &[BiLocationLink]) -> Result<Self, SolverError> {
        let mut vault = Self::default();
        for link in links {
            let first = vault.color_of(link.first);
            let second = vault.color_of(link.second);
            match (first, second) {
                (None, None) => {
                    let (c1, c2) = vault.new_pair();
                    vault.add_cell(link.first, c1);
                    vault.add_cell(link.second, c2);
                }
                (Some(c1), None) => vault.add_cell(link.second, anti_color(c1)),
                (None, Some(c2)) => vault.add_cell(link.first, anti_color(c2)),
                (Some(c1), Some(c2)) if same_chain(c1, c2) => {
                    if c1 == c2 {
                        return Err(SolverError::OddColoringLoop {
                            value,
                            coord: link.first,
                        });
                    }
                    // Even loop: the link already agrees with the
                    // coloring.
                }
                (Some(c1), Some(c2)) => {
                    vault.recolor(anti_color(c2), c1);
                    vault.recolor(c2, anti_color(c1));
                }
            }
        }
        Ok(vault)
    }
}

/// Chain coloring over bi-location links.
///
/// For each value, every house with exactly two candidate positions
/// contributes a link: one end is the value, the other is not. The
/// links form chains that take two alternating colors, and two
/// eliminations follow:
///
/// 1. a house containing two cells of the same color proves that whole
///    color wrong — every cell of the color loses the value;
/// 2. an uncolored cell seeing both colors of one chain loses the
///    value, since one of the two ends it sees must take it.
///
/// With [`with_placements`](BiLocationColoring::with_placements), rule
/// 1 additionally places the value on every cell of the opposite
/// color. The conservative default leaves those placements to the
/// singles that follow anyway.
#[derive(Debug, Default, Clone, Copy)]
pub struct BiLocationColoring {
    place_opposite: bool,
}

impl BiLocationColoring {
    /// Creates the technique with the remove-only semantics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            place_opposite: false,
        }
    }

    /// Creates the technique with rule 1 also placing the value on the
    /// opposite color.
    #[must_use]
    pub const fn with_placements(place_opposite: bool) -> Self {
        Self { place_opposite }
    }

    fn find_bilocation_links(field: &Field, value: u8) -> Vec<BiLocationLink> {
        let mut links = Vec::new();
        for house in field.houses() {
            let positions = house.cells().cells_with_candidate(field, value);
            if positions.len() == 2 {
                let link = BiLocationLink::new(positions[0], positions[1]);
                if !links.contains(&link) {
                    trace!(
                        "bi-location link for {value}: {} / {} in {}",
                        link.first,
                        link.second,
                        house.name()
                    );
                    links.push(link);
                }
            }
        }
        links
    }

    /// Rule 1 eliminations: `color` is proven wrong.
    fn remove_color(
        &self,
        field: &mut Field,
        vault: &ColorVault,
        color: CellColor,
        value: u8,
    ) -> Result<bool, SolverError> {
        let mut changed = false;
        for &coord in vault.cells_of(color) {
            changed |= field.remove_candidate(coord, value)?;
        }
        if self.place_opposite {
            for &coord in vault.cells_of(anti_color(color)) {
                if !field.cell(coord).is_resolved() {
                    field.set_value(coord, value, false)?;
                    changed = true;
                }
            }
        }
        Ok(changed)
    }
}

impl Technique for BiLocationColoring {
    fn name(&self) -> &'static str {
        NAME
    }

    fn apply(&self, field: &mut Field, stop: &StopToken) -> Result<bool, SolverError> {
        let size = field.size();
        let mut changed = false;

        for value in 1..=size {
            if stop.is_stop_requested() {
                return Ok(changed);
            }
            let links = Self::find_bilocation_links(field, value);
            let vault = ColorVault::color_links(value, &links)?;

            // Rule 1: two cells of one color in one house.
            for house_id in 0..field.houses().len() {
                let positions = field
                    .house(house_id)
                    .cells()
                    .cells_with_candidate(field, value);
                let mut seen_colors: BTreeMap<CellColor, usize> = BTreeMap::new();
                for coord in positions.iter() {
                    let Some(color) = vault.color_of(coord) else {
                        continue;
                    };
                    let count = seen_colors.entry(color).or_insert(0);
                    *count += 1;
                    if *count > 1 {
                        debug!(
                            "two cells of one color share {}: removing {value} from that color",
                            field.house(house_id).name()
                        );
                        changed |= self.remove_color(field, &vault, color, value)?;
                    }
                }
            }

            // Rule 2: an uncolored cell seeing both colors of a chain.
            for coord in Coord::grid(size) {
                if !field.cell(coord).has_candidate(value)
                    || field.cell(coord).is_resolved()
                    || vault.color_of(coord).is_some()
                {
                    continue;
                }
                let mut seen_colors: Vec<CellColor> = Vec::new();
                for peer in field.peers(coord).iter() {
                    let Some(color) = vault.color_of(peer) else {
                        continue;
                    };
                    if seen_colors.contains(&anti_color(color)) {
                        debug!(
                            "uncolored cell {coord} sees both colors of a chain: removing {value}"
                        );
                        changed |= field.remove_candidate(coord, value)?;
                        break;
                    }
                    seen_colors.push(color);
                }
            }
        }
        Ok(changed)
    }
}
