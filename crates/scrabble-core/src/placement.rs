//! Word placement validation.
//!
//! Given a candidate word, a start cell and a direction, decide whether the
//! word may be laid on the current board. Validation never mutates anything
//! and can be repeated freely; a successful result is a [`PlacementPlan`]
//! that the turn engine commits.

use crate::board::{Board, Coord, Direction, CENTER};
use crate::tiles::{Tile, BLANK_TILES};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Shortest playable word
pub const MIN_WORD_LENGTH: usize = 2;

/// Reasons a placement is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlacementError {
    #[error("Word must be at least two letters long")]
    TooShort,

    #[error("'{0}' is not a letter A-Z or a blank tile (*)")]
    InvalidCharacter(char),

    #[error("Word uses {0} blank tiles; the game only has two")]
    TooManyBlanks(usize),

    #[error("Word goes off the board")]
    OutOfBounds,

    #[error("Cannot place '{requested}' at {at}: cell holds '{existing}'")]
    LetterConflict {
        at: Coord,
        existing: char,
        requested: char,
    },

    #[error("The first word must cover the center square")]
    MustCoverCenter,

    #[error("Word must connect to a word already on the board")]
    NotConnected,

    #[error("Word must use at least one new tile")]
    NoNewTile,
}

/// A parsed word: uppercase letters and blanks
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word(Vec<Tile>);

impl Word {
    /// Parse user input. Input is trimmed and upper-cased first.
    pub fn parse(text: &str) -> Result<Word, PlacementError> {
        let upper = text.trim().to_uppercase();
        if upper.chars().count() < MIN_WORD_LENGTH {
            return Err(PlacementError::TooShort);
        }
        let tiles = upper
            .chars()
            .map(|c| Tile::from_char(c).ok_or(PlacementError::InvalidCharacter(c)))
            .collect::<Result<Vec<_>, _>>()?;

        let blanks = tiles.iter().filter(|t| t.is_blank()).count();
        if blanks > BLANK_TILES {
            return Err(PlacementError::TooManyBlanks(blanks));
        }
        Ok(Word(tiles))
    }

    pub fn from_tiles(tiles: Vec<Tile>) -> Word {
        Word(tiles)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of letter values; blanks score 0
    pub fn points(&self) -> u32 {
        self.0.iter().map(|t| t.points()).sum()
    }

    pub fn has_blank(&self) -> bool {
        self.0.iter().any(|t| t.is_blank())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tile in &self.0 {
            write!(f, "{}", tile)?;
        }
        Ok(())
    }
}

/// An attempted move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub word: Word,
    pub start: Coord,
    pub direction: Direction,
}

impl PlacementRequest {
    pub fn new(word: Word, start: Coord, direction: Direction) -> Self {
        Self {
            word,
            start,
            direction,
        }
    }

    /// Parse the word text and build a request
    pub fn parse(
        text: &str,
        row: usize,
        col: usize,
        direction: Direction,
    ) -> Result<Self, PlacementError> {
        Ok(Self::new(Word::parse(text)?, Coord::new(row, col), direction))
    }
}

/// One cell of an accepted placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTile {
    pub tile: Tile,
    pub coord: Coord,
    /// True if the cell is empty and the tile comes from the rack
    pub is_new: bool,
}

/// The result of a successful validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPlan {
    pub request: PlacementRequest,
    pub tiles: Vec<PlannedTile>,
}

impl PlacementPlan {
    /// Tiles that must come from the acting side's rack
    pub fn new_tiles(&self) -> Vec<Tile> {
        self.tiles
            .iter()
            .filter(|t| t.is_new)
            .map(|t| t.tile)
            .collect()
    }

    /// Move score: every letter of the word, new and reused
    pub fn score(&self) -> u32 {
        self.tiles.iter().map(|t| t.tile.points()).sum()
    }

    pub fn word(&self) -> &Word {
        &self.request.word
    }
}

/// Validate a request against the board.
pub fn validate_request(
    board: &Board,
    request: &PlacementRequest,
    is_first_move: bool,
) -> Result<PlacementPlan, PlacementError> {
    let tiles = scan(board, request)?;

    if is_first_move {
        if !tiles.iter().any(|t| t.coord == CENTER) {
            return Err(PlacementError::MustCoverCenter);
        }
    } else {
        let lands_on_existing = tiles.iter().any(|t| !t.is_new);
        let adjacent = tiles
            .iter()
            .filter(|t| t.is_new)
            .any(|t| board.has_perpendicular_neighbor(t.coord, request.direction));
        if !lands_on_existing && !adjacent {
            return Err(PlacementError::NotConnected);
        }
    }

    if !tiles.iter().any(|t| t.is_new) {
        return Err(PlacementError::NoNewTile);
    }

    Ok(PlacementPlan {
        request: request.clone(),
        tiles,
    })
}

/// Validate a word given as text.
pub fn validate(
    board: &Board,
    word: &str,
    start_row: usize,
    start_col: usize,
    direction: Direction,
    is_first_move: bool,
) -> Result<PlacementPlan, PlacementError> {
    let request = PlacementRequest::parse(word, start_row, start_col, direction)?;
    validate_request(board, &request, is_first_move)
}

/// Walk the word's cells, classifying each as new or reused
fn scan(board: &Board, request: &PlacementRequest) -> Result<Vec<PlannedTile>, PlacementError> {
    if request.word.len() < MIN_WORD_LENGTH {
        return Err(PlacementError::TooShort);
    }

    let mut tiles = Vec::with_capacity(request.word.len());
    for (i, &requested) in request.word.tiles().iter().enumerate() {
        let coord = request
            .start
            .step(request.direction, i)
            .ok_or(PlacementError::OutOfBounds)?;

        match board.tile_at(coord) {
            Some(existing) => {
                // A blank can't stand in for a tile that is already down
                if requested.is_blank() || existing != requested {
                    return Err(PlacementError::LetterConflict {
                        at: coord,
                        existing: existing.to_char(),
                        requested: requested.to_char(),
                    });
                }
                tiles.push(PlannedTile {
                    tile: existing,
                    coord,
                    is_new: false,
                });
            }
            None => tiles.push(PlannedTile {
                tile: requested,
                coord,
                is_new: true,
            }),
        }
    }
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Side;
    use pretty_assertions::assert_eq;

    fn board_with(word: &str, row: usize, col: usize, direction: Direction) -> Board {
        let mut board = Board::new();
        for (i, c) in word.chars().enumerate() {
            let coord = Coord::new(row, col).step(direction, i).unwrap();
            board.place(coord, Tile::from_char(c).unwrap(), Side::Player);
        }
        board
    }

    #[test]
    fn test_first_move_through_center() {
        let board = Board::new();
        let plan = validate(&board, "CAT", 7, 7, Direction::Horizontal, true).unwrap();
        assert_eq!(
            plan.tiles.iter().map(|t| t.coord).collect::<Vec<_>>(),
            vec![Coord::new(7, 7), Coord::new(7, 8), Coord::new(7, 9)]
        );
        assert!(plan.tiles.iter().all(|t| t.is_new));
        assert_eq!(plan.score(), 5);
    }

    #[test]
    fn test_first_move_must_cover_center() {
        let board = Board::new();
        assert_eq!(
            validate(&board, "CAT", 0, 0, Direction::Horizontal, true),
            Err(PlacementError::MustCoverCenter)
        );
        // ending on the center is fine
        assert!(validate(&board, "CAT", 5, 7, Direction::Vertical, true).is_ok());
    }

    #[test]
    fn test_too_short() {
        let board = Board::new();
        assert_eq!(
            validate(&board, "A", 7, 7, Direction::Horizontal, true),
            Err(PlacementError::TooShort)
        );
        assert_eq!(
            validate(&board, "", 7, 7, Direction::Horizontal, true),
            Err(PlacementError::TooShort)
        );
    }

    #[test]
    fn test_invalid_character() {
        let board = Board::new();
        assert_eq!(
            validate(&board, "C4T", 7, 7, Direction::Horizontal, true),
            Err(PlacementError::InvalidCharacter('4'))
        );
    }

    #[test]
    fn test_more_blanks_than_the_bag_holds() {
        assert!(Word::parse("C**").is_ok());
        assert_eq!(Word::parse("C***"), Err(PlacementError::TooManyBlanks(3)));
        assert_eq!(
            Word::parse("***************"),
            Err(PlacementError::TooManyBlanks(15))
        );
    }

    #[test]
    fn test_lowercase_input_is_uppercased() {
        let word = Word::parse(" cat ").unwrap();
        assert_eq!(word.to_string(), "CAT");
    }

    #[test]
    fn test_off_board() {
        let board = Board::new();
        assert_eq!(
            validate(&board, "XZ", 7, 14, Direction::Horizontal, false),
            Err(PlacementError::OutOfBounds)
        );
        assert_eq!(
            validate(&board, "XZ", 20, 20, Direction::Vertical, true),
            Err(PlacementError::OutOfBounds)
        );
    }

    #[test]
    fn test_reuse_existing_letter() {
        let board = board_with("CAT", 7, 7, Direction::Horizontal);
        let plan = validate(&board, "AT", 7, 8, Direction::Vertical, false).unwrap();
        assert_eq!(
            plan.tiles,
            vec![
                PlannedTile {
                    tile: Tile::Letter('A'),
                    coord: Coord::new(7, 8),
                    is_new: false
                },
                PlannedTile {
                    tile: Tile::Letter('T'),
                    coord: Coord::new(8, 8),
                    is_new: true
                },
            ]
        );
        assert_eq!(plan.new_tiles(), vec![Tile::Letter('T')]);
    }

    #[test]
    fn test_letter_conflict() {
        let board = board_with("CAT", 7, 7, Direction::Horizontal);
        assert_eq!(
            validate(&board, "OX", 7, 8, Direction::Vertical, false),
            Err(PlacementError::LetterConflict {
                at: Coord::new(7, 8),
                existing: 'A',
                requested: 'O'
            })
        );
    }

    #[test]
    fn test_blank_cannot_reuse_existing_cell() {
        let board = board_with("CAT", 7, 7, Direction::Horizontal);
        assert!(matches!(
            validate(&board, "*T", 7, 8, Direction::Vertical, false),
            Err(PlacementError::LetterConflict { requested: '*', .. })
        ));
    }

    #[test]
    fn test_not_connected() {
        let board = board_with("CAT", 7, 7, Direction::Horizontal);
        assert_eq!(
            validate(&board, "DOG", 0, 0, Direction::Horizontal, false),
            Err(PlacementError::NotConnected)
        );
    }

    #[test]
    fn test_connected_by_adjacency() {
        let board = board_with("CAT", 7, 7, Direction::Horizontal);
        // runs along row 8, directly under C and A
        assert!(validate(&board, "DO", 8, 7, Direction::Horizontal, false).is_ok());
    }

    #[test]
    fn test_end_to_end_touch_is_not_adjacency() {
        let board = board_with("CAT", 7, 7, Direction::Horizontal);
        // (7,10) touches T only along the run direction, which doesn't count
        assert_eq!(
            validate(&board, "SO", 7, 10, Direction::Horizontal, false),
            Err(PlacementError::NotConnected)
        );
    }

    #[test]
    fn test_no_new_tile() {
        let board = board_with("CAT", 7, 7, Direction::Horizontal);
        assert_eq!(
            validate(&board, "CAT", 7, 7, Direction::Horizontal, false),
            Err(PlacementError::NoNewTile)
        );
        assert_eq!(
            validate(&board, "AT", 7, 8, Direction::Horizontal, false),
            Err(PlacementError::NoNewTile)
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let board = board_with("CAT", 7, 7, Direction::Horizontal);
        let first = validate(&board, "DOG", 0, 0, Direction::Horizontal, false);
        let second = validate(&board, "DOG", 0, 0, Direction::Horizontal, false);
        assert_eq!(first, second);

        let ok1 = validate(&board, "AT", 7, 8, Direction::Vertical, false);
        let ok2 = validate(&board, "AT", 7, 8, Direction::Vertical, false);
        assert_eq!(ok1, ok2);
    }

    #[test]
    fn test_blank_scores_zero() {
        let board = Board::new();
        let plan = validate(&board, "Q*", 7, 7, Direction::Horizontal, true).unwrap();
        assert_eq!(plan.score(), 10);
    }
}
