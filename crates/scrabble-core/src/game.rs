//! Core game state machine.
//!
//! This module contains the main `GameState` struct and the turn engine:
//! dictionary check, validation, atomic commit, refill, turn flip and
//! game-over detection.

use crate::actions::{FinishReason, GameAction, GameEvent, Outcome};
use crate::board::{Board, Coord, Direction, Side};
use crate::dictionary::{accepts_word, DictionaryChecker};
use crate::placement::{self, PlacementError, PlacementPlan, PlacementRequest, Word};
use crate::player::{Player, Rack};
use crate::tiles::{Tile, TileBag};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Passes in a row (one per side) that end the game
const PASSES_TO_END: u8 = 2;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Turns are being played
    InProgress,
    /// Game is over
    Finished { reason: FinishReason },
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("'{0}' is not in the dictionary")]
    NotAWord(String),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("Not enough tiles in the rack (missing {missing})")]
    InsufficientTiles { missing: String },

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Game is over")]
    GameOver,

    #[error("Requested tiles are not available in the bag")]
    TilesUnavailable,

    #[error("The board has changed since this placement was checked")]
    StalePlan,
}

/// Everything a caller needs to render a committed move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub side: Side,
    pub plan: PlacementPlan,
    pub points: u32,
    /// Actor's score after the move
    pub total: u32,
    /// Tiles drawn to refill the rack
    pub drawn: usize,
    /// Whose turn it is now
    pub next_turn: Side,
    pub events: Vec<GameEvent>,
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The game board
    pub board: Board,
    /// Tiles not yet drawn
    pub bag: TileBag,
    /// Both sides, indexed by `Side::index`
    pub players: Vec<Player>,
    /// Side to move
    pub current_turn: Side,
    /// Set once the opening word is down
    pub first_move_done: bool,
    /// Current game phase
    pub phase: GamePhase,
    /// Turn number (starts at 1)
    pub turn_number: u32,
    consecutive_passes: u8,
}

impl GameState {
    /// Create a new game against the AI, dealing seven tiles to each side.
    /// The human moves first.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self::with_rng(player_name, &mut rand::thread_rng())
    }

    /// Create a new game using a specific RNG for the bag shuffle
    pub fn with_rng<R: Rng>(player_name: impl Into<String>, rng: &mut R) -> Self {
        let mut game = Self::empty(player_name, TileBag::standard(rng));
        for side in Side::ALL {
            let player = &mut game.players[side.index()];
            player.rack.fill_from(&mut game.bag);
        }
        game
    }

    /// Create a game where each side starts with the given tiles.
    ///
    /// The tiles are withdrawn from a full standard bag so the 100-tile
    /// total still holds.
    pub fn with_racks<R: Rng>(
        player_name: impl Into<String>,
        player_tiles: Vec<Tile>,
        ai_tiles: Vec<Tile>,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let mut bag = TileBag::standard(rng);
        if !bag.remove_specific(&player_tiles) || !bag.remove_specific(&ai_tiles) {
            return Err(GameError::TilesUnavailable);
        }

        let mut game = Self::empty(player_name, bag);
        game.players[Side::Player.index()].rack = Rack::with_tiles(player_tiles);
        game.players[Side::Ai.index()].rack = Rack::with_tiles(ai_tiles);
        Ok(game)
    }

    fn empty(player_name: impl Into<String>, bag: TileBag) -> Self {
        Self {
            board: Board::new(),
            bag,
            players: vec![
                Player::new(Side::Player, player_name.into()),
                Player::new(Side::Ai, "AI".to_string()),
            ],
            current_turn: Side::Player,
            first_move_done: false,
            phase: GamePhase::InProgress,
            turn_number: 1,
            consecutive_passes: 0,
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side.index()]
    }

    pub fn rack(&self, side: Side) -> &Rack {
        &self.player(side).rack
    }

    pub fn score(&self, side: Side) -> u32 {
        self.player(side).score
    }

    pub fn is_first_move(&self) -> bool {
        !self.first_move_done
    }

    /// Check if the game is finished
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    /// Tiles in the bag, both racks and on the board. Always 100.
    pub fn tile_total(&self) -> usize {
        self.bag.len()
            + self.players.iter().map(|p| p.rack.len()).sum::<usize>()
            + self.board.tile_count()
    }

    /// Who is ahead (or level) on score
    pub fn outcome(&self) -> Outcome {
        let player = self.score(Side::Player);
        let ai = self.score(Side::Ai);
        match player.cmp(&ai) {
            std::cmp::Ordering::Greater => Outcome::Winner(Side::Player),
            std::cmp::Ordering::Less => Outcome::Winner(Side::Ai),
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }

    /// Parse a word and check it against the dictionary
    pub fn check_word<D: DictionaryChecker + ?Sized>(
        &self,
        dictionary: &D,
        text: &str,
    ) -> Result<Word, GameError> {
        let word = Word::parse(text)?;
        if !accepts_word(dictionary, &word) {
            return Err(GameError::NotAWord(word.to_string()));
        }
        Ok(word)
    }

    /// Validate a placement against the current board and phase.
    /// Read-only; repeated calls give the same answer.
    pub fn validate(&self, request: &PlacementRequest) -> Result<PlacementPlan, PlacementError> {
        placement::validate_request(&self.board, request, self.is_first_move())
    }

    /// Dictionary check, validation and commit in one call
    pub fn play_word<D: DictionaryChecker + ?Sized>(
        &mut self,
        side: Side,
        dictionary: &D,
        text: &str,
        start: Coord,
        direction: Direction,
    ) -> Result<MoveReport, GameError> {
        self.check_turn(side)?;
        let word = self.check_word(dictionary, text)?;
        let request = PlacementRequest::new(word, start, direction);
        let plan = self.validate(&request)?;
        self.commit_placement(&plan, side)
    }

    /// Commit a validated placement for the acting side.
    ///
    /// The plan is checked again against the current board, so a plan made
    /// before another move (or edited by hand) is refused. All-or-nothing:
    /// if the plan is stale or the rack can't pay for the new tiles,
    /// nothing changes.
    pub fn commit_placement(
        &mut self,
        plan: &PlacementPlan,
        side: Side,
    ) -> Result<MoveReport, GameError> {
        self.check_turn(side)?;

        let current = self.validate(&plan.request)?;
        if current != *plan {
            return Err(GameError::StalePlan);
        }

        let consumed = self
            .rack(side)
            .plan_consumption(&plan.new_tiles())
            .map_err(|missing| GameError::InsufficientTiles {
                missing: missing.iter().map(|t| t.to_char()).collect(),
            })?;

        // Nothing below can fail: every new cell was just seen empty and
        // `consumed` came from this rack
        for planned in plan.tiles.iter().filter(|t| t.is_new) {
            let placed = self.board.place(planned.coord, planned.tile, side);
            debug_assert!(placed, "cell {} was validated empty", planned.coord);
        }

        let points = plan.score();
        let mut events = Vec::new();
        let drawn = {
            let player = &mut self.players[side.index()];
            let removed = player.rack.remove_tiles(&consumed);
            debug_assert!(removed, "consumed tiles were planned from this rack");
            let crossed = player.add_score(points);

            events.push(GameEvent::WordPlayed {
                side,
                word: plan.word().to_string(),
                start: plan.request.start,
                direction: plan.request.direction,
                points,
                total: player.score,
            });
            if crossed {
                events.push(GameEvent::MilestoneReached {
                    side,
                    score: player.score,
                });
            }

            let drawn = self.bag.draw(consumed.len());
            let count = drawn.len();
            player.rack.add_tiles(drawn);
            count
        };
        if drawn > 0 {
            events.push(GameEvent::TilesDrawn { side, count: drawn });
        }

        self.first_move_done = true;
        self.consecutive_passes = 0;
        events.extend(self.end_turn(side));

        if self.rack(side).is_empty() && self.bag.is_empty() {
            events.push(self.finish(FinishReason::TilesExhausted));
        }

        Ok(MoveReport {
            side,
            plan: plan.clone(),
            points,
            total: self.score(side),
            drawn,
            next_turn: self.current_turn,
            events,
        })
    }

    /// Give up the turn. Two passes in a row end the game.
    pub fn pass(&mut self, side: Side) -> Result<Vec<GameEvent>, GameError> {
        self.check_turn(side)?;

        let mut events = vec![GameEvent::Passed { side }];
        self.consecutive_passes += 1;
        events.extend(self.end_turn(side));

        if self.consecutive_passes >= PASSES_TO_END {
            events.push(self.finish(FinishReason::ConsecutivePasses));
        }
        Ok(events)
    }

    /// End the game on request. Quitting a finished game is a no-op.
    pub fn quit(&mut self) -> Vec<GameEvent> {
        if self.is_finished() {
            return Vec::new();
        }
        vec![self.finish(FinishReason::Quit)]
    }

    /// Apply an action to the game state
    pub fn apply_action<D: DictionaryChecker + ?Sized>(
        &mut self,
        side: Side,
        action: GameAction,
        dictionary: &D,
    ) -> Result<Vec<GameEvent>, GameError> {
        match action {
            GameAction::PlayWord {
                word,
                row,
                col,
                direction,
            } => self
                .play_word(side, dictionary, &word, Coord::new(row, col), direction)
                .map(|report| report.events),
            GameAction::Pass => self.pass(side),
            GameAction::Quit => Ok(self.quit()),
        }
    }

    /// A random tip for the side to move
    pub fn hint<R: Rng>(&self, side: Side, rng: &mut R) -> Result<String, GameError> {
        self.check_turn(side)?;

        let tiles_left = format!("You have {} tiles left in the bag.", self.bag.len());
        let hints = [
            "Try to use high-scoring letters like Q, Z, or X.",
            "Look for opportunities to connect to existing words on the board.",
            "Remember, longer words often score more points!",
            "Letters already on the board count toward your score when you build through them.",
            "A blank tile can stand in for any letter you are missing.",
            tiles_left.as_str(),
        ];
        Ok(hints
            .choose(rng)
            .map(|h| h.to_string())
            .unwrap_or(tiles_left))
    }

    fn check_turn(&self, side: Side) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }
        if side != self.current_turn {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    fn end_turn(&mut self, side: Side) -> Vec<GameEvent> {
        self.current_turn = side.other();
        self.turn_number += 1;
        vec![GameEvent::TurnChanged {
            side: self.current_turn,
        }]
    }

    fn finish(&mut self, reason: FinishReason) -> GameEvent {
        self.phase = GamePhase::Finished { reason };
        GameEvent::GameOver {
            reason,
            outcome: self.outcome(),
            player_score: self.score(Side::Player),
            ai_score: self.score(Side::Ai),
        }
    }
}
