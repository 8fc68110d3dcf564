use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ops;

/// Accumulated game score.
pub type Score = u64;

/// Tile value that ends the game with a win.
pub const WIN_VALUE: u32 = 2048;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in a fixed order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl FromStr for Move {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Move::Up),
            "down" => Ok(Move::Down),
            "left" => Ok(Move::Left),
            "right" => Ok(Move::Right),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

/// Errors from board construction and direction parsing.
///
/// Invalid moves (a direction that shifts nothing) are not errors; they
/// come back as a `MoveOutcome` with `moved == false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("board size must be positive, got {0}")]
    InvalidSize(usize),
    #[error("board must be square: {rows} rows but row {row} has {cols} cells")]
    NotSquare { rows: usize, row: usize, cols: usize },
    #[error("unknown direction: {0:?}")]
    InvalidDirection(String),
    #[error("snapshot has {cells} cells but a size-{size} board needs {size}x{size}")]
    BadCellCount { size: usize, cells: usize },
}

/// Where the game stands after the last valid move. Derived from the
/// board on demand, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GameStatus {
    InProgress,
    /// Some cell reached [`WIN_VALUE`].
    Won,
    /// No empty cell and no adjacent equal pair remain.
    Over,
}

/// Coordinate of a tile placed by [`GameEngine::spawn_tile`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
}

/// Everything a renderer needs after one call to [`GameEngine::apply_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// True iff at least one cell changed; only then did a turn happen.
    pub moved: bool,
    /// Tile spawned after a valid move; `None` on no-ops or a full board.
    pub spawn: Option<Spawn>,
    /// Sum of all merge results produced by this move.
    pub score_delta: Score,
    pub status: GameStatus,
}

/// N×N grid of tile values, row-major. 0 means empty; every non-empty
/// cell holds a power of two ≥ 2.
///
/// Deserialization goes through the same validation as the
/// constructors, so a snapshot cannot smuggle in a zero size or a cell
/// count that doesn't match it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    size: usize,
    cells: Vec<u32>,
}

/// Raw snapshot shape for `Board` deserialization.
#[derive(Deserialize)]
struct BoardRepr {
    size: usize,
    cells: Vec<u32>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = EngineError;

    fn try_from(repr: BoardRepr) -> Result<Self, Self::Error> {
        if repr.size == 0 {
            return Err(EngineError::InvalidSize(repr.size));
        }
        if repr.cells.len() != repr.size * repr.size {
            return Err(EngineError::BadCellCount {
                size: repr.size,
                cells: repr.cells.len(),
            });
        }
        Ok(Board {
            size: repr.size,
            cells: repr.cells,
        })
    }
}

impl Board {
    /// An all-empty board of the given side length.
    ///
    /// ```
    /// use twenty48_engine::Board;
    /// let b = Board::empty(4).unwrap();
    /// assert_eq!(b.count_empty(), 16);
    /// assert!(Board::empty(0).is_err());
    /// ```
    pub fn empty(size: usize) -> Result<Self, EngineError> {
        if size == 0 {
            return Err(EngineError::InvalidSize(size));
        }
        Ok(Board {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Build a board from explicit rows. Handy for tests and for
    /// restoring a snapshot; rejects ragged or empty input.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, EngineError> {
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::InvalidSize(size));
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != size {
                return Err(EngineError::NotSquare {
                    rows: size,
                    row,
                    cols: r.len(),
                });
            }
            cells.extend_from_slice(r);
        }
        Ok(Board { size, cells })
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at (row, col); 0 if empty.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        self.cells[row * self.size + col] = value;
    }

    /// Reset every cell to empty, keeping the size.
    pub(crate) fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// All cell values in row-major order.
    #[inline]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.size)
    }

    /// Coordinates of every empty cell, row-major.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 0)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// The highest tile value present (0 on an empty board).
    #[inline]
    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Return the board resulting from sliding/merging tiles in `dir`,
    /// together with the score produced (no random insert).
    ///
    /// ```
    /// use twenty48_engine::{Board, Move};
    /// let b = Board::from_rows(&[[2, 2, 4, 0]; 4]).unwrap();
    /// let (shifted, gained) = b.shift(Move::Left);
    /// assert_eq!(shifted.rows().next().unwrap(), &[4, 4, 0, 0]);
    /// assert_eq!(gained, 16);
    /// ```
    #[inline]
    pub fn shift(&self, dir: Move) -> (Board, Score) {
        ops::shift(self, dir)
    }

    /// True iff some cell reached [`WIN_VALUE`].
    #[inline]
    pub fn is_won(&self) -> bool {
        ops::is_won(self)
    }

    /// True iff the board is full and no two adjacent cells match.
    #[inline]
    pub fn is_game_over(&self) -> bool {
        ops::is_game_over(self)
    }

    /// Derive the current [`GameStatus`].
    pub fn status(&self) -> GameStatus {
        if self.is_won() {
            GameStatus::Won
        } else if self.is_game_over() {
            GameStatus::Over
        } else {
            GameStatus::InProgress
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.size * 7 + self.size - 1);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f, "{rule}")?;
            }
            let line: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", line.join("|"))?;
        }
        Ok(())
    }
}

fn format_val(val: &u32) -> String {
    match val {
        0 => " ".repeat(7),
        v => format!("{v:^7}"),
    }
}

/// Owned game state: one board plus the score accumulator.
///
/// The engine never touches an ambient RNG; every operation that spawns
/// a tile takes `&mut R where R: Rng + ?Sized`, so tests and replays can
/// pass a seeded generator.
///
/// ```
/// use twenty48_engine::{GameEngine, Move};
/// use rand::{rngs::StdRng, SeedableRng};
/// let mut rng = StdRng::seed_from_u64(7);
/// let mut game = GameEngine::new(4).unwrap();
/// game.initialize(&mut rng);
/// assert_eq!(game.board().count_empty(), 14);
/// assert_eq!(game.score(), 0);
/// let _ = game.apply_move(Move::Left, &mut rng);
/// ```
#[derive(Clone, Debug)]
pub struct GameEngine {
    board: Board,
    score: Score,
}

impl GameEngine {
    /// A new engine with an empty board and zero score. The caller still
    /// has to `initialize` before play; size 0 is rejected up front.
    pub fn new(size: usize) -> Result<Self, EngineError> {
        Ok(GameEngine {
            board: Board::empty(size)?,
            score: 0,
        })
    }

    /// Start a fresh game: clear the board, zero the score, spawn the
    /// two opening tiles.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.board.clear();
        self.score = 0;
        self.spawn_tile(rng);
        self.spawn_tile(rng);
    }

    /// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    /// Returns `None` (and leaves the board alone) when the board is full.
    #[inline]
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Spawn> {
        ops::spawn_tile(&mut self.board, rng)
    }

    /// Slide/merge toward `dir`, then spawn and re-derive the status if
    /// anything changed. A no-op move returns `moved == false` and
    /// leaves board and score untouched.
    pub fn apply_move<R: Rng + ?Sized>(&mut self, dir: Move, rng: &mut R) -> MoveOutcome {
        let (next, score_delta) = ops::shift(&self.board, dir);
        if next == self.board {
            return MoveOutcome {
                moved: false,
                spawn: None,
                score_delta: 0,
                status: self.board.status(),
            };
        }
        self.board = next;
        self.score += score_delta;
        let spawn = self.spawn_tile(rng);
        MoveOutcome {
            moved: true,
            spawn,
            score_delta,
            status: self.board.status(),
        }
    }

    /// Current board snapshot.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current score.
    #[inline]
    pub fn score(&self) -> Score {
        self.score
    }

    /// Derive the current [`GameStatus`].
    #[inline]
    pub fn status(&self) -> GameStatus {
        self.board.status()
    }
}
