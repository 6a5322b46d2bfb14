//! Occupancy grids and the positions that index them.
//!
//! A [`Grid`] is a read-only rectangle of small integers where `0` is a free
//! cell and anything else blocks movement.

use std::path::Path;
use std::path::PathBuf;

use derive_more::Display;
use thiserror::Error;

const MAX_ELEMENTS_DISPLAYED: usize = 40;

// Simple colours
const BLACK: [u8; 3] = [u8::MIN, u8::MIN, u8::MIN];

pub type Coord = u32;
/// The raw value stored in a grid cell.
pub type CellValue = u8;

pub const FREE: CellValue = 0;
pub const BLOCKED: CellValue = 1;

/// A `(row, col)` coordinate.
///
/// Positions are compared, ordered and hashed by value. They are the identity
/// of a cell everywhere in the crate.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[display("({row},{col})")]
pub struct Position {
    pub row: Coord,
    pub col: Coord,
}

impl Position {
    #[inline(always)]
    pub const fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }

    /// Moves by a signed offset, failing on underflow or overflow.
    ///
    /// ```
    /// use gridsearch::grid::Position;
    /// assert_eq!(Position::new(1, 1).offset(-1, 1), Some(Position::new(0, 2)));
    /// assert_eq!(Position::new(0, 1).offset(-1, 0), None);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn offset(&self, d_row: i32, d_col: i32) -> Option<Self> {
        Some(Self {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }
}

impl From<(Coord, Coord)> for Position {
    fn from((row, col): (Coord, Coord)) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Error)]
pub enum PositionParseError {
    #[error("Expected 'row,col' but got '{0}'")]
    Malformed(String),
    #[error("Invalid coordinate in '{s}': {e}")]
    InvalidCoord {
        s: String,
        e: std::num::ParseIntError,
    },
}

impl std::str::FromStr for Position {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let (row, col) = trimmed
            .split_once(',')
            .ok_or_else(|| PositionParseError::Malformed(s.to_string()))?;
        let parse = |c: &str| {
            c.trim()
                .parse::<Coord>()
                .map_err(|e| PositionParseError::InvalidCoord {
                    s: s.to_string(),
                    e,
                })
        };
        Ok(Position::new(parse(row)?, parse(col)?))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Position {position} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        position: Position,
        rows: usize,
        cols: usize,
    },
}

#[derive(Debug, Error)]
pub enum GridParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Invalid cell '{token}' found at ({row},{col})")]
    InvalidCell {
        token: String,
        row: usize,
        col: usize,
    },
    #[error("Grid of {rows}x{cols} does not fit in coordinates")]
    TooLarge { rows: usize, cols: usize },
    #[error("I/O error when loading '{p}': {e}")]
    IOError { p: PathBuf, e: std::io::Error },
    #[error("Image error when loading '{p}': {e}")]
    ImageError { p: PathBuf, e: image::ImageError },
}

/// A read-only 2D occupancy grid.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    map: Vec<Vec<CellValue>>,
    cols: usize,
}

impl Grid {
    /// Builds a grid from rows of cell values.
    pub fn new(map: Vec<Vec<CellValue>>) -> Result<Self, GridParseError> {
        let Some(first) = map.first() else {
            return Err(GridParseError::EmptyInput);
        };
        let cols = first.len();
        if cols == 0 {
            return Err(GridParseError::EmptyInput);
        }
        for (row, line) in map.iter().enumerate() {
            if line.len() != cols {
                return Err(GridParseError::RaggedRow {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
        }
        if !Self::safe_dimensions(map.len(), cols) {
            return Err(GridParseError::TooLarge {
                rows: map.len(),
                cols,
            });
        }
        Ok(Self { map, cols })
    }

    pub fn new_free_with_dimensions(rows: usize, cols: usize) -> Self {
        debug_assert!(Self::safe_dimensions(rows, cols));
        Self {
            map: vec![vec![FREE; cols]; rows],
            cols,
        }
    }

    /// Generates a grid where each cell is blocked with probability `wall_ratio`.
    pub fn random<R: rand::Rng>(r: &mut R, rows: usize, cols: usize, wall_ratio: f64) -> Self {
        let mut grid = Self::new_free_with_dimensions(rows, cols);
        for line in grid.map.iter_mut() {
            for cell in line.iter_mut() {
                if r.random_bool(wall_ratio) {
                    *cell = BLOCKED;
                }
            }
        }
        grid
    }

    /// Picks a random free cell, if one turns up after a bounded number of tries.
    pub fn random_free_position<R: rand::Rng>(&self, r: &mut R) -> Option<Position> {
        const RANDOM_POSITION_MAX_TRIES: usize = 10_000;
        let (rows, cols) = self.dimensions();

        for _tries in 0..RANDOM_POSITION_MAX_TRIES {
            let p = Position::new(
                r.random_range(0..rows as Coord),
                r.random_range(0..cols as Coord),
            );
            if self.is_free(&p) {
                return Some(p);
            }
        }
        None
    }

    pub(crate) fn safe_dimensions(rows: usize, cols: usize) -> bool {
        rows < Coord::MAX as usize && cols < Coord::MAX as usize
    }

    /// `(rows, cols)`
    #[inline(always)]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.map.len(), self.cols)
    }

    #[inline(always)]
    pub fn contains(&self, p: &Position) -> bool {
        (p.row as usize) < self.map.len() && (p.col as usize) < self.cols
    }

    pub fn check_bounds(&self, p: &Position) -> Result<(), GridError> {
        if self.contains(p) {
            Ok(())
        } else {
            let (rows, cols) = self.dimensions();
            Err(GridError::OutOfBounds {
                position: *p,
                rows,
                cols,
            })
        }
    }

    #[inline(always)]
    pub fn value(&self, p: &Position) -> Option<CellValue> {
        self.map
            .get(p.row as usize)
            .and_then(|line| line.get(p.col as usize))
            .copied()
    }

    /// Whether the cell exists and holds [`FREE`].
    #[inline(always)]
    pub fn is_free(&self, p: &Position) -> bool {
        self.value(p) == Some(FREE)
    }

    /// Writes the grid marking `path` cells with `*` and endpoints with `S`/`G`.
    pub fn write_with_path<W: std::fmt::Write>(
        &self,
        f: &mut W,
        path: &[Position],
    ) -> std::fmt::Result {
        let start = path.last();
        let goal = path.first();
        for (row, line) in self.map.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
            for (col, v) in line.iter().enumerate().take(MAX_ELEMENTS_DISPLAYED) {
                let p = Position::new(row as Coord, col as Coord);
                if Some(&p) == start {
                    write!(f, "S")?;
                } else if Some(&p) == goal {
                    write!(f, "G")?;
                } else if path.contains(&p) {
                    write!(f, "*")?;
                } else if *v == FREE {
                    write!(f, "░")?;
                } else {
                    write!(f, "█")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (rows, cols) = self.dimensions();
        writeln!(f, "Grid({rows}x{cols}):")?;
        self.write_with_path(f, &[])
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Grid{:?}", self.dimensions())
    }
}

/// Parses comma separated rows of integers, like
///
/// ```text
/// 0,0,1
/// 1,0,0
/// ```
impl std::convert::TryFrom<&str> for Grid {
    type Error = GridParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut map = vec![];
        for (row, line) in s.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let mut cells = vec![];
            for (col, token) in line.split(',').enumerate() {
                let token = token.trim();
                let v = token
                    .parse::<CellValue>()
                    .map_err(|_| GridParseError::InvalidCell {
                        token: token.to_string(),
                        row,
                        col,
                    })?;
                cells.push(v);
            }
            map.push(cells);
        }
        Grid::new(map)
    }
}

/// Loads a grid from disk.
///
/// `.png` files are read as images (black is blocked), anything else as
/// comma separated text.
impl std::convert::TryFrom<&Path> for Grid {
    type Error = GridParseError;

    fn try_from(p: &Path) -> Result<Self, Self::Error> {
        let is_png = p
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png {
            return Self::from_image(p);
        }

        let text = std::fs::read_to_string(p).map_err(|e| GridParseError::IOError {
            p: p.to_path_buf(),
            e,
        })?;
        Grid::try_from(text.as_str())
    }
}

impl Grid {
    fn from_image(p: &Path) -> Result<Self, GridParseError> {
        use image::ImageReader;

        let img = ImageReader::open(p)
            .map_err(|e| GridParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?
            .decode()
            .map_err(|e| GridParseError::ImageError {
                p: p.to_path_buf(),
                e,
            })?
            .grayscale()
            .into_rgb8();

        let rows = img.height() as usize;
        let cols = img.width() as usize;
        if rows == 0 || cols == 0 {
            return Err(GridParseError::EmptyInput);
        }
        if !Self::safe_dimensions(rows, cols) {
            return Err(GridParseError::TooLarge { rows, cols });
        }
        let mut grid = Grid::new_free_with_dimensions(rows, cols);

        for y in 0..img.height() {
            for x in 0..img.width() {
                let px = img.get_pixel(x, y);
                // Anything short of black is walkable.
                if px.0 == BLACK {
                    grid.map[y as usize][x as usize] = BLOCKED;
                }
            }
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn parse_csv() {
        let grid = Grid::try_from(indoc! {"
            0,1,0
            0, 0 ,2
        "})
        .unwrap();
        assert_eq!(grid.dimensions(), (2, 3));
        assert!(grid.is_free(&Position::new(0, 0)));
        assert!(!grid.is_free(&Position::new(0, 1)));
        assert_eq!(grid.value(&Position::new(1, 2)), Some(2));
        assert!(!grid.is_free(&Position::new(1, 2)));
        assert_eq!(grid.value(&Position::new(2, 0)), None);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            Grid::try_from(""),
            Err(GridParseError::EmptyInput)
        ));
        assert!(matches!(
            Grid::try_from("0,0\n0"),
            Err(GridParseError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            Grid::try_from("0,x"),
            Err(GridParseError::InvalidCell { row: 0, col: 1, .. })
        ));
    }

    #[test]
    fn bounds() {
        let grid = Grid::new_free_with_dimensions(2, 3);
        assert!(grid.contains(&Position::new(1, 2)));
        assert!(!grid.contains(&Position::new(2, 0)));
        assert_eq!(
            grid.check_bounds(&Position::new(0, 3)),
            Err(GridError::OutOfBounds {
                position: Position::new(0, 3),
                rows: 2,
                cols: 3
            })
        );
    }

    #[test]
    fn parse_position() {
        assert_eq!("4,0".parse::<Position>().unwrap(), Position::new(4, 0));
        assert_eq!("(0, 4)".parse::<Position>().unwrap(), Position::new(0, 4));
        assert!("4".parse::<Position>().is_err());
        assert!("-1,0".parse::<Position>().is_err());
    }

    #[test]
    fn random_grid_is_deterministic() {
        let a = Grid::random(&mut ChaCha8Rng::seed_from_u64(7), 8, 6, 0.3);
        let b = Grid::random(&mut ChaCha8Rng::seed_from_u64(7), 8, 6, 0.3);
        assert_eq!(a, b);
        assert_eq!(a.dimensions(), (8, 6));

        let mut r = ChaCha8Rng::seed_from_u64(1);
        let p = a.random_free_position(&mut r).unwrap();
        assert!(a.is_free(&p));
    }

    #[test]
    fn display_marks_path() {
        let grid = Grid::try_from("0,0\n1,0").unwrap();
        let mut s = String::new();
        grid.write_with_path(
            &mut s,
            &[Position::new(1, 1), Position::new(0, 1), Position::new(0, 0)],
        )
        .unwrap();
        assert_eq!(s, "S*\n█G\n");
    }
}
