//! Game actions that sides can take.
//!
//! This module defines all possible actions in the game and the events
//! that result from those actions. Events are plain data: hosts render and
//! narrate them after the engine call returns.

use crate::board::{Coord, Direction, Side};
use crate::placement::PlacementRequest;
use serde::{Deserialize, Serialize};

/// All possible actions a side can take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    /// Lay a word: dictionary check, validation, then commit
    PlayWord {
        word: String,
        row: usize,
        col: usize,
        direction: Direction,
    },
    /// Give up the turn without playing
    Pass,
    /// End the game immediately
    Quit,
}

impl GameAction {
    /// Build a `PlayWord` from an already-assembled request
    pub fn play(request: &PlacementRequest) -> Self {
        GameAction::PlayWord {
            word: request.word.to_string(),
            row: request.start.row,
            col: request.start.col,
            direction: request.direction,
        }
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    /// A side emptied its rack with the bag already empty
    TilesExhausted,
    /// Both sides passed in a row
    ConsecutivePasses,
    /// Someone asked to stop
    Quit,
}

/// Final standing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Side),
    Tie,
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A word was committed to the board
    WordPlayed {
        side: Side,
        word: String,
        start: Coord,
        direction: Direction,
        points: u32,
        total: u32,
    },

    /// Replacement tiles were drawn after a play
    TilesDrawn { side: Side, count: usize },

    /// A side's score reached 50 for the first time
    MilestoneReached { side: Side, score: u32 },

    /// A side passed
    Passed { side: Side },

    /// Turn ownership moved
    TurnChanged { side: Side },

    /// The game reached its terminal state
    GameOver {
        reason: FinishReason,
        outcome: Outcome,
        player_score: u32,
        ai_score: u32,
    },
}
