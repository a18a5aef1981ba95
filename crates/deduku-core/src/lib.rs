//! Core data model for the deduku sudoku engine.
//!
//! This crate holds the constraint model the solving techniques operate
//! on, built up in strict layers:
//!
//! 1. **Values and coordinates**
//!    - [`value_set`]: [`ValueSet`], a candidate bitmask over `1..=N`
//!    - [`coord`]: [`Coord`], a grid position with index and box
//!      arithmetic and peer coordinate lists
//! 2. **Cells and collections**
//!    - [`cell`]: [`Cell`], one grid position (resolved value or
//!      candidate mask) and [`Contradiction`], the unsolvable-state error
//!    - [`cell_set`]: [`CellSet`], ordered cell collections with set
//!      operations and bulk candidate queries
//! 3. **The grid**
//!    - [`house`]: [`House`], a row, column, or box of N cells
//!    - [`field`]: [`Field`], the owner of all cells and houses, with
//!      the three mutation primitives every technique is composed of
//!    - [`text`]: puzzle parsing and board rendering
//!
//! The invariants worth knowing: a resolved cell's value is absent from
//! every peer's candidates, an unresolved cell always keeps at least one
//! candidate (losing the last one raises [`Contradiction`]), and the
//! `Field` is the only mutator — cells and houses hand out no mutable
//! state of their own.
//!
//! # Examples
//!
//! ```
//! use deduku_core::{Coord, Field};
//!
//! let field = Field::from_plain_line(
//!     "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79",
//! )?;
//! assert!(field.is_valid());
//!
//! // The 5 in R1C1 is already gone from its peers' candidates.
//! assert!(!field.cell(Coord::new(1, 3, 9)).has_candidate(5));
//! # Ok::<(), deduku_core::ParseFieldError>(())
//! ```

pub mod cell;
pub mod cell_set;
pub mod coord;
pub mod field;
pub mod house;
pub mod text;
pub mod value_set;

pub use self::{
    cell::{Cell, Contradiction},
    cell_set::CellSet,
    coord::Coord,
    field::Field,
    house::{House, HouseKind},
    text::ParseFieldError,
    value_set::ValueSet,
};
