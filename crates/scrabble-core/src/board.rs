//! Board representation: the 15x15 grid of placed tiles.
//!
//! This module contains:
//! - Side (Player or AI) and turn ownership helpers
//! - Coordinates and placement directions
//! - The Board grid and its query methods

use crate::tiles::Tile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height of the board
pub const BOARD_SIZE: usize = 15;

/// The square every opening word must cover
pub const CENTER: Coord = Coord { row: 7, col: 7 };

/// The two sides of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human player
    Player,
    /// The computer opponent
    Ai,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Player, Side::Ai];

    /// The opposing side
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Index into per-side storage
    pub fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Ai => 1,
        }
    }
}

/// A cell position, 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(&self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// The cell `steps` away along `direction`, or None if it leaves the board
    pub fn step(&self, direction: Direction, steps: usize) -> Option<Coord> {
        let (row, col) = match direction {
            Direction::Horizontal => (Some(self.row), self.col.checked_add(steps)),
            Direction::Vertical => (self.row.checked_add(steps), Some(self.col)),
        };
        let coord = Coord::new(row?, col?);
        coord.is_on_board().then_some(coord)
    }

    /// On-board orthogonal neighbours (up to four)
    pub fn neighbors(&self) -> Vec<Coord> {
        let mut out = Vec::with_capacity(4);
        if self.row > 0 {
            out.push(Coord::new(self.row - 1, self.col));
        }
        if self.row + 1 < BOARD_SIZE {
            out.push(Coord::new(self.row + 1, self.col));
        }
        if self.col > 0 {
            out.push(Coord::new(self.row, self.col - 1));
        }
        if self.col + 1 < BOARD_SIZE {
            out.push(Coord::new(self.row, self.col + 1));
        }
        out
    }

    /// On-board neighbours across the given direction (the cells that would
    /// form a cross word with a tile placed here)
    pub fn perpendicular_neighbors(&self, direction: Direction) -> Vec<Coord> {
        let mut out = Vec::with_capacity(2);
        match direction {
            Direction::Horizontal => {
                if self.row > 0 {
                    out.push(Coord::new(self.row - 1, self.col));
                }
                if self.row + 1 < BOARD_SIZE {
                    out.push(Coord::new(self.row + 1, self.col));
                }
            }
            Direction::Vertical => {
                if self.col > 0 {
                    out.push(Coord::new(self.row, self.col - 1));
                }
                if self.col + 1 < BOARD_SIZE {
                    out.push(Coord::new(self.row, self.col + 1));
                }
            }
        }
        out
    }
}

impl fmt::Display for Coord {
    /// 1-indexed, the way players read the board
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column {}", self.row + 1, self.col + 1)
    }
}

/// Which way a word runs from its start cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Horizontal, Direction::Vertical];

    /// Parse the single-letter form players type (`H` / `V`, any case)
    pub fn from_letter(s: &str) -> Option<Direction> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H" | "HORIZONTAL" => Some(Direction::Horizontal),
            "V" | "VERTICAL" => Some(Direction::Vertical),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
        }
    }
}

/// A tile fixed on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTile {
    pub tile: Tile,
    /// Which side put it there (for display only)
    pub placed_by: Side,
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<PlacedTile>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// The placed tile at a coordinate, if any
    pub fn get(&self, coord: Coord) -> Option<PlacedTile> {
        if !coord.is_on_board() {
            return None;
        }
        self.cells[coord.row][coord.col]
    }

    /// The tile at a coordinate, if any
    pub fn tile_at(&self, coord: Coord) -> Option<Tile> {
        self.get(coord).map(|p| p.tile)
    }

    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    /// Place a tile on an empty cell.
    ///
    /// Returns false (and changes nothing) if the cell is off the board or
    /// already holds a tile. Placed tiles are never overwritten.
    pub fn place(&mut self, coord: Coord, tile: Tile, placed_by: Side) -> bool {
        if !coord.is_on_board() || self.is_occupied(coord) {
            return false;
        }
        self.cells[coord.row][coord.col] = Some(PlacedTile { tile, placed_by });
        true
    }

    /// Is any perpendicular neighbour of this cell filled?
    pub fn has_perpendicular_neighbor(&self, coord: Coord, direction: Direction) -> bool {
        coord
            .perpendicular_neighbors(direction)
            .into_iter()
            .any(|n| self.is_occupied(n))
    }

    /// All occupied coordinates in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..BOARD_SIZE).flat_map(move |row| {
            (0..BOARD_SIZE)
                .map(move |col| Coord::new(row, col))
                .filter(move |&c| self.is_occupied(c))
        })
    }

    /// Number of tiles on the board
    pub fn tile_count(&self) -> usize {
        self.occupied().count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied().next().is_none()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let c = self
                    .tile_at(Coord::new(row, col))
                    .map(Tile::to_char)
                    .unwrap_or('.');
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert_eq!(board.tile_count(), 0);
        assert_eq!(board.get(CENTER), None);
    }

    #[test]
    fn test_placed_tiles_are_immutable() {
        let mut board = Board::new();
        assert!(board.place(CENTER, Tile::Letter('A'), Side::Player));
        assert!(!board.place(CENTER, Tile::Letter('B'), Side::Ai));
        assert_eq!(board.tile_at(CENTER), Some(Tile::Letter('A')));
        assert_eq!(board.get(CENTER).unwrap().placed_by, Side::Player);
    }

    #[test]
    fn test_place_off_board_is_rejected() {
        let mut board = Board::new();
        assert!(!board.place(Coord::new(15, 0), Tile::Letter('A'), Side::Player));
        assert!(board.is_empty());
    }

    #[test]
    fn test_step_stays_on_board() {
        let start = Coord::new(7, 13);
        assert_eq!(start.step(Direction::Horizontal, 1), Some(Coord::new(7, 14)));
        assert_eq!(start.step(Direction::Horizontal, 2), None);
        assert_eq!(start.step(Direction::Vertical, 7), Some(Coord::new(14, 13)));
        assert_eq!(start.step(Direction::Vertical, 8), None);
    }

    #[test]
    fn test_corner_neighbors() {
        assert_eq!(Coord::new(0, 0).neighbors().len(), 2);
        assert_eq!(Coord::new(0, 7).neighbors().len(), 3);
        assert_eq!(CENTER.neighbors().len(), 4);
    }

    #[test]
    fn test_perpendicular_neighbor_detection() {
        let mut board = Board::new();
        board.place(Coord::new(6, 8), Tile::Letter('X'), Side::Ai);

        // (7,8) has a filled cell above it, which is perpendicular to a horizontal run
        assert!(board.has_perpendicular_neighbor(Coord::new(7, 8), Direction::Horizontal));
        // ...but along the run for a vertical placement
        assert!(!board.has_perpendicular_neighbor(Coord::new(7, 8), Direction::Vertical));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(Direction::from_letter("h"), Some(Direction::Horizontal));
        assert_eq!(Direction::from_letter(" V "), Some(Direction::Vertical));
        assert_eq!(Direction::from_letter("x"), None);
    }

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Player.other(), Side::Ai);
        assert_eq!(Side::Ai.other(), Side::Player);
    }
}
