//! AI opponent for Accessible Scrabble.
//!
//! The bot does not search for the best move. It walks a fixed list of
//! words against a set of anchor cells and plays the first placement the
//! validator accepts and its rack can pay for, passing otherwise.
//! Move selection sits behind [`MoveProposer`] so hosts and tests can swap
//! in their own strategy.

use crate::actions::GameEvent;
use crate::board::{Board, Coord, Direction, Side, CENTER};
use crate::game::{GameError, GameState};
use crate::placement::{PlacementPlan, PlacementRequest, Word};
use rand::prelude::*;
use std::collections::BTreeSet;

/// Words the bot knows
pub const BOT_WORDS: [&str; 14] = [
    "CAT", "DOG", "PLAY", "GAME", "WORD", "HOUSE", "CAR", "BOOK", "FUN", "SCRABBLE", "TILE",
    "BOARD", "SCORE", "HINT",
];

/// Anything that can pick a move for a side
pub trait MoveProposer {
    /// A validated plan the side can afford, or None to pass
    fn propose(&mut self, game: &GameState, side: Side) -> Option<PlacementPlan>;
}

/// A word-list bot
pub struct Bot {
    words: Vec<Word>,
    rng: StdRng,
    /// Shuffle words and anchors before each search
    shuffle: bool,
}

impl Bot {
    pub fn new() -> Self {
        Self::build(StdRng::from_entropy(), true)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::build(StdRng::seed_from_u64(seed), true)
    }

    /// A bot that tries exactly these words, in order, against anchors in
    /// row-major order. Words that don't parse are skipped.
    pub fn with_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: words.into_iter().filter_map(|w| Word::parse(w).ok()).collect(),
            rng: StdRng::seed_from_u64(0),
            shuffle: false,
        }
    }

    fn build(rng: StdRng, shuffle: bool) -> Self {
        Self {
            words: BOT_WORDS
                .iter()
                .filter_map(|w| Word::parse(w).ok())
                .collect(),
            rng,
            shuffle,
        }
    }
}

impl Default for Bot {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveProposer for Bot {
    fn propose(&mut self, game: &GameState, side: Side) -> Option<PlacementPlan> {
        let mut words = self.words.clone();
        let mut anchors = anchor_cells(&game.board);
        if self.shuffle {
            words.shuffle(&mut self.rng);
            anchors.shuffle(&mut self.rng);
        }

        let rack = game.rack(side);
        for word in &words {
            for &anchor in &anchors {
                for direction in Direction::ALL {
                    let request = PlacementRequest::new(word.clone(), anchor, direction);
                    if let Ok(plan) = game.validate(&request) {
                        if rack.can_supply(&plan.new_tiles()) {
                            return Some(plan);
                        }
                    }
                }
            }
        }
        None
    }
}

/// Candidate start cells: the center on an empty board, otherwise every
/// occupied cell and its empty orthogonal neighbours
pub fn anchor_cells(board: &Board) -> Vec<Coord> {
    if board.is_empty() {
        return vec![CENTER];
    }

    let mut anchors = BTreeSet::new();
    for cell in board.occupied() {
        anchors.insert(cell);
        for n in cell.neighbors() {
            if !board.is_occupied(n) {
                anchors.insert(n);
            }
        }
    }
    anchors.into_iter().collect()
}

/// Let a proposer take `side`'s turn: commit its plan, or pass if it has none
pub fn play_turn<P: MoveProposer + ?Sized>(
    game: &mut GameState,
    side: Side,
    proposer: &mut P,
) -> Result<Vec<GameEvent>, GameError> {
    if game.is_finished() {
        return Err(GameError::GameOver);
    }
    if game.current_turn != side {
        return Err(GameError::NotYourTurn);
    }

    match proposer.propose(game, side) {
        Some(plan) => game.commit_placement(&plan, side).map(|report| report.events),
        None => game.pass(side),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::Tile;

    fn tiles(s: &str) -> Vec<Tile> {
        s.chars().filter_map(Tile::from_char).collect()
    }

    fn game(player: &str, ai: &str) -> GameState {
        GameState::with_racks("Ada", tiles(player), tiles(ai), &mut StdRng::seed_from_u64(5))
            .unwrap()
    }

    #[test]
    fn test_empty_board_anchor_is_center() {
        assert_eq!(anchor_cells(&Board::new()), vec![CENTER]);
    }

    #[test]
    fn test_anchors_are_deduplicated() {
        let mut board = Board::new();
        board.place(Coord::new(7, 7), Tile::Letter('A'), Side::Player);
        board.place(Coord::new(7, 8), Tile::Letter('T'), Side::Player);
        let anchors = anchor_cells(&board);
        // 2 occupied + 6 distinct empty neighbours
        assert_eq!(anchors.len(), 8);
        let unique: BTreeSet<_> = anchors.iter().collect();
        assert_eq!(unique.len(), anchors.len());
    }

    #[test]
    fn test_bot_opens_through_center() {
        let mut game = game("X", "DOGEEEE");
        game.current_turn = Side::Ai;
        let mut bot = Bot::with_words(["CAT", "DOG"]);

        let plan = bot.propose(&game, Side::Ai).unwrap();
        assert_eq!(plan.word().to_string(), "DOG");
        assert!(plan.tiles.iter().any(|t| t.coord == CENTER));
    }

    #[test]
    fn test_bot_passes_without_playable_word() {
        let mut game = game("CAT", "QZ");
        game.current_turn = Side::Ai;
        let mut bot = Bot::with_words(["CAT", "DOG"]);

        let events = play_turn(&mut game, Side::Ai, &mut bot).unwrap();
        assert_eq!(events[0], GameEvent::Passed { side: Side::Ai });
        assert!(game.board.is_empty());
        assert_eq!(game.rack(Side::Ai).len(), 2);
    }

    #[test]
    fn test_bot_play_commits_and_flips_turn() {
        let mut game = game("CAT", "DOGEEEE");
        game.current_turn = Side::Ai;
        let mut bot = Bot::with_seed(11);

        let events = play_turn(&mut game, Side::Ai, &mut bot).unwrap();
        assert!(matches!(events[0], GameEvent::WordPlayed { side: Side::Ai, .. }));
        assert_eq!(game.current_turn, Side::Player);
        assert_eq!(game.tile_total(), crate::tiles::TOTAL_TILES);
    }

    #[test]
    fn test_play_turn_checks_turn() {
        let mut game = game("CAT", "DOG");
        let mut bot = Bot::with_words(["DOG"]);
        assert_eq!(
            play_turn(&mut game, Side::Ai, &mut bot),
            Err(GameError::NotYourTurn)
        );
    }
}
