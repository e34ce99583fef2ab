//! WebSocket protocol messages for Accessible Scrabble.

use scrabble_core::{
    CellHighlight, Coord, Direction, FinishReason, FlowOutput, MoveReport, Outcome, Side, Tile,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Start a new game against the AI, replacing any current one
    NewGame { player_name: String },

    /// First step of the placement flow: the word to play
    SubmitWord { word: String },

    /// A board cell was clicked (0-indexed)
    SelectCell { row: usize, col: usize },

    /// Last step of the placement flow; commits the move
    ChooseDirection { direction: Direction },

    /// Abandon the word being placed
    CancelPlacement,

    /// Play a fully described word in one message
    PlayWord {
        word: String,
        row: usize,
        col: usize,
        direction: Direction,
    },

    /// Give up the turn
    Pass,

    /// Ask for a tip
    Hint,

    /// End the game
    Quit,

    /// Request the current state
    GetState,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned player ID
    Welcome { player_id: Uuid },

    /// A new game was created
    GameStarted { game_id: Uuid, state: GameSnapshot },

    /// Game state updated
    GameState { state: GameSnapshot },

    /// The placement flow moved on
    FlowUpdated {
        output: FlowOutput,
        highlights: Vec<Vec<CellHighlight>>,
    },

    /// Contents of a clicked cell
    CellInfo { coord: Coord, tile: Option<Tile> },

    /// Result of a word or pass. `report` is set only for a committed word.
    MoveResult {
        success: bool,
        report: Option<MoveReport>,
        error: Option<String>,
        next_turn: Side,
    },

    /// A line of spoken feedback
    Narration { text: String },

    /// A tip for the player
    Hint { text: String },

    /// Game finished
    GameOver {
        reason: FinishReason,
        outcome: Outcome,
        player_score: u32,
        ai_score: u32,
    },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// What the client needs to redraw the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Full serialized `GameState`
    pub game: serde_json::Value,
    /// Board rows, '.' for empty cells
    pub board: Vec<String>,
    pub highlights: Vec<Vec<CellHighlight>>,
    /// The human player's rack
    pub rack: String,
    pub player_score: u32,
    pub ai_score: u32,
    pub current_turn: Side,
    pub tiles_in_bag: usize,
    pub status: GameStatus,
}

/// Game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InGame,
    Finished,
}
