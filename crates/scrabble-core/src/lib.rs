//! Accessible Scrabble - rule engine
//!
//! This crate provides the core game logic for Accessible Scrabble, including:
//! - Tiles, point values and the 100-tile bag
//! - The 15x15 board and per-side racks
//! - Word placement validation (center rule, connection rule, tile reuse)
//! - The turn engine: atomic commit, scoring, refill and game over
//! - A simple word-list AI opponent
//!
//! # Architecture
//!
//! The engine is single-threaded and side-effect free: every call returns
//! plain values (`Result`s, [`GameEvent`]s). Dictionary lookup and narration
//! are collaborators behind traits, so hosts decide how words are checked
//! and how events are spoken or drawn. It can be compiled to:
//! - Native Rust for server-side game hosting
//! - WebAssembly for in-browser play
//!
//! # Modules
//!
//! - [`tiles`]: Tiles, letter values and the tile bag
//! - [`board`]: Board grid, coordinates and sides
//! - [`player`]: Racks and per-side state
//! - [`placement`]: Placement validation
//! - [`game`]: Turn engine and game state
//! - [`flow`]: Input state machine for collecting a move
//! - [`narration`]: Event descriptions for speech

pub mod actions;
pub mod board;
pub mod bot;
pub mod dictionary;
pub mod flow;
pub mod game;
pub mod narration;
pub mod placement;
pub mod player;
pub mod tiles;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{FinishReason, GameAction, GameEvent, Outcome};
pub use board::{Board, Coord, Direction, PlacedTile, Side, BOARD_SIZE, CENTER};
pub use bot::{anchor_cells, play_turn, Bot, MoveProposer};
pub use dictionary::{DictionaryChecker, DictionaryError, WordList};
pub use flow::{CellHighlight, FlowError, FlowInput, FlowOutput, PlacementFlow};
pub use game::{GameError, GamePhase, GameState, MoveReport};
pub use narration::{Names, Narrator};
pub use placement::{
    validate, PlacementError, PlacementPlan, PlacementRequest, PlannedTile, Word,
};
pub use player::{Player, Rack, RACK_SIZE};
pub use tiles::{Tile, TileBag, TOTAL_TILES};
