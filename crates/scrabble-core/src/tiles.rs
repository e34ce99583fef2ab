//! Tiles, letter values and the tile bag.
//!
//! This module contains:
//! - Tile type (26 letters plus the blank wildcard)
//! - The standard point table and 100-tile distribution
//! - TileBag, the shrinking supply players draw from

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Character used for the blank wildcard in words and on the board
pub const BLANK_MARKER: char = '*';

/// Number of tiles in a full game
pub const TOTAL_TILES: usize = 100;

/// Blank tiles in a full game
pub const BLANK_TILES: usize = 2;

/// Letter distribution for a standard game (26 letters + 2 blanks = 100)
pub const STANDARD_DISTRIBUTION: [(char, usize); 27] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 4),
    ('E', 12),
    ('F', 2),
    ('G', 3),
    ('H', 2),
    ('I', 9),
    ('J', 1),
    ('K', 1),
    ('L', 4),
    ('M', 2),
    ('N', 6),
    ('O', 8),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 4),
    ('T', 6),
    ('U', 4),
    ('V', 2),
    ('W', 2),
    ('X', 1),
    ('Y', 2),
    ('Z', 1),
    (BLANK_MARKER, BLANK_TILES),
];

/// Point value of each letter, indexed by `letter - 'A'`
const LETTER_POINTS: [u32; 26] = [
    1, 3, 3, 2, 1, 4, 2, 4, 1, 8, 5, 1, 3, 1, 1, 3, 10, 1, 1, 1, 1, 4, 4, 8, 4, 10,
];

/// A single tile: a letter or the blank wildcard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// An uppercase letter A-Z
    Letter(char),
    /// Wildcard worth 0 points
    Blank,
}

impl Tile {
    /// Parse a tile from its character form. Only `A-Z` and `*` are tiles.
    pub fn from_char(c: char) -> Option<Tile> {
        match c {
            'A'..='Z' => Some(Tile::Letter(c)),
            BLANK_MARKER => Some(Tile::Blank),
            _ => None,
        }
    }

    /// Character form used on the board and in words
    pub fn to_char(self) -> char {
        match self {
            Tile::Letter(c) => c,
            Tile::Blank => BLANK_MARKER,
        }
    }

    /// Point value (blanks are always worth 0, as is anything outside A-Z)
    pub fn points(self) -> u32 {
        match self {
            Tile::Letter(c) => (c as u32)
                .checked_sub('A' as u32)
                .and_then(|i| LETTER_POINTS.get(i as usize))
                .copied()
                .unwrap_or(0),
            Tile::Blank => 0,
        }
    }

    pub fn is_blank(self) -> bool {
        matches!(self, Tile::Blank)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// The supply of tiles not yet drawn by either side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileBag {
    tiles: Vec<Tile>,
}

impl TileBag {
    /// Build the standard 100-tile bag and shuffle it
    pub fn standard<R: Rng>(rng: &mut R) -> Self {
        Self::initialize(&STANDARD_DISTRIBUTION, rng)
    }

    /// Populate from a letter -> count table, then shuffle uniformly.
    /// Entries whose character is not a tile are skipped.
    pub fn initialize<R: Rng>(distribution: &[(char, usize)], rng: &mut R) -> Self {
        let mut tiles = Vec::with_capacity(distribution.iter().map(|(_, n)| n).sum());
        for &(c, count) in distribution {
            if let Some(tile) = Tile::from_char(c) {
                tiles.extend(std::iter::repeat(tile).take(count));
            }
        }
        tiles.shuffle(rng);
        Self { tiles }
    }

    /// A bag holding exactly these tiles, drawn from the end
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// Remove and return up to `n` tiles. Returns fewer when the bag runs short.
    pub fn draw(&mut self, n: usize) -> Vec<Tile> {
        let take = n.min(self.tiles.len());
        let split = self.tiles.len() - take;
        let mut drawn = self.tiles.split_off(split);
        drawn.reverse();
        drawn
    }

    /// Withdraw the named tiles from the bag.
    ///
    /// All-or-nothing: returns false and leaves the bag untouched if any
    /// requested tile is not present with the requested multiplicity.
    pub fn remove_specific(&mut self, wanted: &[Tile]) -> bool {
        let mut remaining = self.tiles.clone();
        for tile in wanted {
            match remaining.iter().position(|t| t == tile) {
                Some(idx) => {
                    remaining.remove(idx);
                }
                None => return false,
            }
        }
        self.tiles = remaining;
        true
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Count of a given tile still in the bag
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }
}
