//! Text formats: the plain one-line puzzle format, the formatted N×N
//! format, and board rendering.

use std::fmt;

use derive_more::{Display, Error, From};

use crate::{Cell, Contradiction, Coord, Field, value_set::MAX_GRID_SIZE};

/// The error raised when puzzle text cannot be turned into a [`Field`].
///
/// Parse errors are recovered at the loader boundary; they never
/// propagate into the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum ParseFieldError {
    /// The puzzle length is not N² for a valid grid size N.
    #[display("puzzle length {_0} does not describe a square grid with square boxes")]
    BadLength(#[error(not(source))] usize),
    /// A character is neither an empty-cell marker nor a value symbol
    /// for this grid size.
    #[display("unrecognized symbol {_0:?} in puzzle")]
    BadSymbol(#[error(not(source))] char),
    /// A row of formatted input has the wrong length.
    #[display("row {row} has length {len}, expected {expected}")]
    BadRowLength {
        /// 1-based row number.
        row: usize,
        /// Actual character count of the row.
        len: usize,
        /// Expected character count (the grid size).
        expected: usize,
    },
    /// The givens strip some cell of its last candidate: the puzzle is
    /// unsolvable as written.
    #[display("puzzle contradicts itself while loading: {_0}")]
    Contradiction(#[from] Contradiction),
}

/// Returns the board symbol for a value: `1`–`9`, then `a` for 10, `b`
/// for 11, and so on.
///
/// # Panics
///
/// Panics if `value` is 0 or larger than [`MAX_GRID_SIZE`].
#[must_use]
pub fn value_symbol(value: u8) -> char {
    assert!(1 <= value && value <= MAX_GRID_SIZE);
    if value <= 9 {
        (b'0' + value) as char
    } else {
        (b'a' + value - 10) as char
    }
}

/// Returns the value for a board symbol: digits `1`–`9`, letters
/// (case-insensitive) for 10 and up. Empty-cell markers are not symbols.
#[must_use]
pub fn symbol_value(symbol: char) -> Option<u8> {
    match symbol {
        '1'..='9' => Some(symbol as u8 - b'0'),
        'a'..='z' => Some(symbol as u8 - b'a' + 10),
        'A'..='Z' => Some(symbol as u8 - b'A' + 10),
        _ => None,
    }
}

fn infer_size(cell_count: usize) -> Option<u8> {
    let size = cell_count.isqrt();
    if size * size != cell_count || size > usize::from(MAX_GRID_SIZE) {
        return None;
    }
    #[expect(clippy::cast_possible_truncation)]
    let size = size as u8;
    let b = size.isqrt();
    (b >= 2 && b * b == size).then_some(size)
}

impl Field {
    /// Parses one puzzle from the plain format: a single string of N²
    /// symbols, rows concatenated top to bottom. `.` and `0` mark empty
    /// cells; `1`–`9` and letters (`a` = 10, …) are values.
    ///
    /// The grid size is inferred from the string length, which must be
    /// N² for an N with integer √N.
    ///
    /// # Errors
    ///
    /// Returns [`ParseFieldError`] for a malformed line or for givens
    /// that contradict each other outright.
    ///
    /// # Examples
    ///
    /// ```
    /// use deduku_core::Field;
    ///
    /// let field = Field::from_plain_line(
    ///     "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79",
    /// )?;
    /// assert_eq!(field.size(), 9);
    /// assert!(field.is_valid());
    /// # Ok::<(), deduku_core::ParseFieldError>(())
    /// ```
    pub fn from_plain_line(line: &str) -> Result<Self, ParseFieldError> {
        let line = line.trim();
        let cell_count = line.chars().count();
        let size = infer_size(cell_count).ok_or(ParseFieldError::BadLength(cell_count))?;

        let mut field = Self::with_size(size);
        for (index, symbol) in line.chars().enumerate() {
            if symbol == '.' || symbol == '0' {
                continue;
            }
            let value =
                symbol_value(symbol).ok_or(ParseFieldError::BadSymbol(symbol))?;
            if value > size {
                return Err(ParseFieldError::BadSymbol(symbol));
            }
            field.set_value(Coord::from_index(index, size), value, true)?;
        }
        Ok(field)
    }

    /// Parses a puzzle from the formatted layout: N lines of N
    /// characters, `.` or `0` for empty cells and digits for values
    /// (grids up to 9×9).
    ///
    /// # Errors
    ///
    /// Returns [`ParseFieldError`] for a bad shape, a bad symbol, or
    /// givens that contradict each other outright.
    pub fn from_formatted_lines(text: &str) -> Result<Self, ParseFieldError> {
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        let row_count = lines.len();
        let size = infer_size(row_count * row_count)
            .filter(|&size| size <= 9)
            .ok_or(ParseFieldError::BadLength(row_count * row_count))?;

        let mut field = Self::with_size(size);
        for (row, line) in lines.iter().enumerate() {
            let len = line.chars().count();
            if len != row_count {
                return Err(ParseFieldError::BadRowLength {
                    row: row + 1,
                    len,
                    expected: row_count,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                if symbol == '.' || symbol == '0' {
                    continue;
                }
                let value = symbol
                    .to_digit(10)
                    .and_then(|digit| u8::try_from(digit).ok())
                    .filter(|&value| 1 <= value && value <= size)
                    .ok_or(ParseFieldError::BadSymbol(symbol))?;
                #[expect(clippy::cast_possible_truncation)]
                let coord = Coord::new(row as u8 + 1, col as u8 + 1, size);
                field.set_value(coord, value, true)?;
            }
        }
        Ok(field)
    }

    /// Renders the board back into the plain one-line format: resolved
    /// cells as symbols, unresolved cells as `.`.
    ///
    /// For a fully resolved board, parsing the rendered line yields an
    /// identical board.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.cells()
            .map(|cell| match cell.value() {
                Some(value) => value_symbol(value),
                None => '.',
            })
            .collect()
    }
}

fn fmt_cell(cell: &Cell, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match cell.value() {
        Some(value) => write!(f, "{}", value_symbol(value)),
        None => write!(f, "{}", cell.candidates()),
    }
}

impl fmt::Display for Field {
    /// Renders the board for terminal output: a column header, then one
    /// line per row with resolved values as symbols and unresolved cells
    /// as `{…}` candidate lists.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " C: ")?;
        for col in 1..=self.size() {
            write!(f, "{}", value_symbol(col))?;
        }
        writeln!(f)?;
        write!(f, "    ")?;
        for _ in 0..self.size() {
            write!(f, ".")?;
        }
        writeln!(f)?;
        for row in self.rows() {
            write!(f, "{:>3}: ", row.name())?;
            for coord in row.cells().iter() {
                fmt_cell(self.cell(coord), f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
