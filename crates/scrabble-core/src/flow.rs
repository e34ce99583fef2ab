//! Placement input flow.
//!
//! Front-ends collect a move in three steps: type a word, pick the start
//! cell, pick a direction. `PlacementFlow` is that sequence as an explicit
//! state machine driven by discrete inputs. It never touches the game; a
//! finished flow hands back a [`PlacementRequest`] for the turn engine.
//! Cell colouring is derived from the flow state by [`PlacementFlow::highlight`].

use crate::board::{Board, Coord, Direction, Side, CENTER};
use crate::dictionary::DictionaryChecker;
use crate::game::{GameError, GameState};
use crate::placement::{PlacementRequest, Word};
use crate::tiles::Tile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the flow currently is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementFlow {
    /// Nothing in progress
    #[default]
    Idle,
    /// A word was accepted; waiting for the start cell
    SelectingStart { word: Word },
    /// Start chosen; waiting for a direction
    AwaitingDirection { word: Word, start: Coord },
}

/// Inputs that drive the flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowInput {
    WordSubmitted(String),
    CellClicked(Coord),
    DirectionChosen(Direction),
    Cancel,
}

/// What the front-end should do after an input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowOutput {
    /// Word accepted; ask for a start cell
    ChooseStart { word: String },
    /// Start accepted; ask for a direction
    ChooseDirection { word: String, start: Coord },
    /// A cell was clicked with nothing in progress
    Inspect { coord: Coord, tile: Option<Tile> },
    /// The move is fully described and ready to play
    Ready(PlacementRequest),
    /// The flow was reset
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FlowError {
    #[error(transparent)]
    Word(#[from] GameError),

    #[error("The first letter '{first}' does not match '{existing}' already at {at}")]
    StartLetterMismatch {
        at: Coord,
        first: char,
        existing: char,
    },

    #[error("Please choose horizontal or vertical placement first")]
    DirectionPending,

    #[error("Enter a word before choosing a start cell")]
    NoWord,

    #[error("Choose a start cell before a direction")]
    NoStart,

    #[error("That cell is off the board")]
    OffBoard,
}

/// How a cell should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellHighlight {
    Normal,
    Center,
    Selected,
    PlacedPlayer,
    PlacedAi,
}

impl PlacementFlow {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PlacementFlow::Idle)
    }

    /// Feed one input.
    ///
    /// Errors that reject the attempt (bad word, mismatched start letter)
    /// reset the flow to `Idle`; `DirectionPending`, `NoWord` and `NoStart`
    /// leave it where it was.
    pub fn handle<D: DictionaryChecker + ?Sized>(
        &mut self,
        input: FlowInput,
        game: &GameState,
        dictionary: &D,
    ) -> Result<FlowOutput, FlowError> {
        match input {
            FlowInput::WordSubmitted(text) => {
                let word = match game.check_word(dictionary, &text) {
                    Ok(word) => word,
                    Err(e) => {
                        *self = PlacementFlow::Idle;
                        return Err(e.into());
                    }
                };
                let out = FlowOutput::ChooseStart {
                    word: word.to_string(),
                };
                *self = PlacementFlow::SelectingStart { word };
                Ok(out)
            }

            FlowInput::CellClicked(coord) => {
                if !coord.is_on_board() {
                    return Err(FlowError::OffBoard);
                }
                match std::mem::take(self) {
                    PlacementFlow::Idle => Ok(FlowOutput::Inspect {
                        coord,
                        tile: game.board.tile_at(coord),
                    }),
                    PlacementFlow::SelectingStart { word } => {
                        check_start_letter(&game.board, &word, coord)?;
                        let out = FlowOutput::ChooseDirection {
                            word: word.to_string(),
                            start: coord,
                        };
                        *self = PlacementFlow::AwaitingDirection { word, start: coord };
                        Ok(out)
                    }
                    pending @ PlacementFlow::AwaitingDirection { .. } => {
                        *self = pending;
                        Err(FlowError::DirectionPending)
                    }
                }
            }

            FlowInput::DirectionChosen(direction) => match std::mem::take(self) {
                PlacementFlow::AwaitingDirection { word, start } => {
                    Ok(FlowOutput::Ready(PlacementRequest::new(word, start, direction)))
                }
                PlacementFlow::Idle => Err(FlowError::NoWord),
                selecting @ PlacementFlow::SelectingStart { .. } => {
                    *self = selecting;
                    Err(FlowError::NoStart)
                }
            },

            FlowInput::Cancel => {
                *self = PlacementFlow::Idle;
                Ok(FlowOutput::Cancelled)
            }
        }
    }

    /// How to draw a cell given the board and this flow's state
    pub fn highlight(&self, board: &Board, coord: Coord) -> CellHighlight {
        if let PlacementFlow::AwaitingDirection { start, .. } = self {
            if *start == coord {
                return CellHighlight::Selected;
            }
        }
        match board.get(coord) {
            Some(placed) => match placed.placed_by {
                Side::Player => CellHighlight::PlacedPlayer,
                Side::Ai => CellHighlight::PlacedAi,
            },
            None if coord == CENTER => CellHighlight::Center,
            None => CellHighlight::Normal,
        }
    }
}

/// An occupied start cell must already hold the word's first letter
/// (a leading blank is let through here and rejected by validation)
fn check_start_letter(board: &Board, word: &Word, at: Coord) -> Result<(), FlowError> {
    let (Some(existing), Some(&first)) = (board.tile_at(at), word.tiles().first()) else {
        return Ok(());
    };
    if first.is_blank() || first == existing {
        return Ok(());
    }
    Err(FlowError::StartLetterMismatch {
        at,
        first: first.to_char(),
        existing: existing.to_char(),
    })
}
