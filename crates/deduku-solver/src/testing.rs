//! Test utilities for technique implementations.
//!
//! [`TechniqueTester`] keeps the initial and current state of a field,
//! applies techniques to it, and offers chainable assertions about what
//! changed.
//!
//! # Examples
//!
//! ```
//! use deduku_core::{Coord, Field, ValueSet};
//! use deduku_solver::{technique::NakedSingle, testing::TechniqueTester};
//!
//! let mut field = Field::with_size(9);
//! field
//!     .remove_candidates(Coord::new(1, 1, 9), !ValueSet::from_values(9, [5]))
//!     .unwrap();
//!
//! TechniqueTester::new(field)
//!     .apply_once(&NakedSingle)
//!     .assert_placed(Coord::new(1, 1, 9), 5)
//!     .assert_removed_includes(Coord::new(1, 9, 9), [5]);
//! ```

use deduku_core::{Coord, Field, ValueSet};

use crate::{Technique, resolver::StopToken};

/// A fluent harness for exercising one technique against a prepared
/// field.
///
/// Every `apply_*` method records whether the technique reported a
/// change; every `assert_*` method panics with a detailed message on
/// failure, using `#[track_caller]` so the failing test line is
/// reported.
#[derive(Debug)]
pub struct TechniqueTester {
    initial: Field,
    current: Field,
    stop: StopToken,
    last_changed: Option<bool>,
}

impl TechniqueTester {
    /// Creates a tester, snapshotting `field` as the initial state.
    #[must_use]
    pub fn new(field: Field) -> Self {
        Self {
            initial: field.clone(),
            current: field,
            stop: StopToken::new(),
            last_changed: None,
        }
    }

    /// Creates a tester from a plain-format puzzle line.
    ///
    /// # Panics
    ///
    /// Panics if the line does not parse.
    #[track_caller]
    pub fn from_plain(line: &str) -> Self {
        let field = Field::from_plain_line(line).expect("puzzle line must parse");
        Self::new(field)
    }

    /// Returns the current field state.
    #[must_use]
    pub const fn field(&self) -> &Field {
        &self.current
    }

    /// Applies the technique once.
    ///
    /// # Panics
    ///
    /// Panics if the technique reports an error.
    #[track_caller]
    pub fn apply_once<T: Technique>(mut self, technique: &T) -> Self {
        let changed = technique
            .apply(&mut self.current, &self.stop)
            .unwrap_or_else(|error| panic!("{} failed: {error}", technique.name()));
        self.last_changed = Some(changed);
        self
    }

    /// Applies the technique until it reports no further change.
    ///
    /// The recorded change flag covers the whole run: `true` if any
    /// application changed the field.
    ///
    /// # Panics
    ///
    /// Panics if the technique reports an error.
    #[track_caller]
    pub fn apply_until_stuck<T: Technique>(mut self, technique: &T) -> Self {
        let mut any = false;
        loop {
            let changed = technique
                .apply(&mut self.current, &self.stop)
                .unwrap_or_else(|error| panic!("{} failed: {error}", technique.name()));
            if !changed {
                break;
            }
            any = true;
        }
        self.last_changed = Some(any);
        self
    }

    /// Asserts that the last application reported a change.
    #[track_caller]
    pub fn assert_changed(self) -> Self {
        assert_eq!(
            self.last_changed,
            Some(true),
            "expected the technique to report a change"
        );
        self
    }

    /// Asserts that the last application reported no change.
    #[track_caller]
    pub fn assert_unchanged(self) -> Self {
        assert_eq!(
            self.last_changed,
            Some(false),
            "expected the technique to report no change"
        );
        self
    }

    /// Asserts that the cell at `coord` went from undecided to resolved
    /// with `value`.
    #[track_caller]
    pub fn assert_placed(self, coord: Coord, value: u8) -> Self {
        let initial = self.initial.cell(coord);
        let current = self.current.cell(coord);
        assert!(
            !initial.is_resolved(),
            "expected {coord} to start undecided, but it held {:?}",
            initial.value()
        );
        assert_eq!(
            current.value(),
            Some(value),
            "expected {coord} to be resolved to {value}, but it is {} with candidates {}",
            current
                .value()
                .map_or_else(|| "unresolved".to_owned(), |v| v.to_string()),
            current.candidates()
        );
        self
    }

    /// Asserts that all of `values` were present initially at `coord`
    /// and are gone now. Other candidates may have been removed too.
    #[track_caller]
    pub fn assert_removed_includes<I>(self, coord: Coord, values: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let size = self.current.size();
        let values = ValueSet::from_values(size, values);
        let initial = self.initial.cell(coord).candidates();
        let current = self.current.cell(coord).candidates();
        assert!(
            values.is_subset(initial),
            "expected initial candidates {initial} at {coord} to include {values}"
        );
        assert!(
            values.is_disjoint(current),
            "expected {values} to be removed from {coord}, but candidates are {current}"
        );
        self
    }

    /// Asserts that the cell at `coord` kept its initial candidates and
    /// value.
    #[track_caller]
    pub fn assert_no_change(self, coord: Coord) -> Self {
        let initial = self.initial.cell(coord);
        let current = self.current.cell(coord);
        assert_eq!(
            initial.candidates(),
            current.candidates(),
            "expected no change at {coord}, but candidates went from {} to {}",
            initial.candidates(),
            current.candidates()
        );
        assert_eq!(
            initial.value(),
            current.value(),
            "expected no change at {coord}, but the value changed"
        );
        self
    }
}
