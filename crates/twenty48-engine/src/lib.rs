//! Core 2048 game logic: board state, slide/merge moves, tile spawning,
//! and win/game-over detection. No I/O and no ambient randomness; the
//! caller supplies an RNG wherever a tile is spawned.

pub mod engine;

pub use engine::{
    Board, EngineError, GameEngine, GameStatus, Move, MoveOutcome, Score, Spawn, WIN_VALUE,
};
