//! Human-style solving for the deduku engine.
//!
//! The solver never guesses: it owns a catalog of logical deduction
//! techniques — the same ones solving guides teach, from naked singles
//! through unique rectangles — and drives them to a fixed point over a
//! [`Field`](deduku_core::Field). Each technique can be enabled or
//! disabled independently, which is how puzzle difficulty is studied:
//! a puzzle "needs" X-Wing exactly when the catalog without X-Wing gets
//! stuck on it.
//!
//! - [`technique`]: the [`Technique`] trait and the catalog
//! - [`resolver`]: the [`Resolver`] fixed-point loop, cancellation, and
//!   outcome reporting
//! - [`testing`]: a fluent harness for technique tests
//!
//! # Examples
//!
//! ```
//! use deduku_core::Field;
//! use deduku_solver::{Resolution, Resolver};
//!
//! let field = Field::from_plain_line(
//!     "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79",
//! )
//! .expect("valid puzzle text");
//!
//! let mut resolver = Resolver::with_default_techniques(field);
//! let resolution = resolver.resolve();
//! assert_eq!(resolution, Resolution::Solved);
//! ```

use deduku_core::{Contradiction, Coord};
use derive_more::{Display, Error, From};

pub mod resolver;
pub mod technique;
pub mod testing;

pub use self::{
    resolver::{RegisteredTechnique, Resolution, Resolver, ResolverEvent, StopToken},
    technique::{BoxedTechnique, Technique, TechniqueSet},
};

/// Errors surfaced by techniques and the resolver.
///
/// Every variant means the same thing for the puzzle: it has no solution
/// under the deductions made so far. The resolver does not catch and
/// retry — there is no backtracking — it ends the run in the invalid
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum SolverError {
    /// A deduction stripped a cell of its last candidate.
    #[display("{_0}")]
    Contradiction(#[from] Contradiction),
    /// Bi-location coloring closed a loop of odd length, which no
    /// consistent puzzle can produce.
    #[display("coloring for value {value} closed an odd-length loop at {coord}")]
    OddColoringLoop {
        /// The candidate value being colored.
        value: u8,
        /// A cell on the offending loop.
        coord: Coord,
    },
}
