//! Engine module: N×N value-matrix board, direction-parameterized
//! slide/merge ops, and the stateful `GameEngine` wrapper.
//!
//! - `Board` holds the grid; `GameEngine` adds the score accumulator
//!   and the valid-move/spawn/status cycle.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - All four directions go through one line-extraction/merge/write-back
//!   routine in `ops`; there are no per-direction code paths.

mod ops;
pub mod state;

pub use state::{
    Board, EngineError, GameEngine, GameStatus, Move, MoveOutcome, Score, Spawn, WIN_VALUE,
};

pub use ops::{is_game_over, is_won, shift};
