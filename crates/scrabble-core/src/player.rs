//! Player state and rack management.
//!
//! This module contains:
//! - Rack: the tiles a side currently holds
//! - Player: name, rack, score and milestone tracking for one side

use crate::board::Side;
use crate::tiles::{Tile, TileBag};
use serde::{Deserialize, Serialize};

/// Maximum tiles a rack holds
pub const RACK_SIZE: usize = 7;

/// Score at which a side is congratulated (once)
pub const MILESTONE_SCORE: u32 = 50;

/// A side's held tiles
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    tiles: Vec<Tile>,
}

impl Rack {
    /// Create an empty rack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a rack holding specific tiles
    pub fn with_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Count of a given tile in the rack
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Work out which rack tiles would pay for `needed`, without touching the rack.
    ///
    /// Each needed letter takes a matching tile, falling back to a blank.
    /// A needed blank can only be paid with a blank. On failure, returns the
    /// needed tiles that could not be covered.
    pub fn plan_consumption(&self, needed: &[Tile]) -> Result<Vec<Tile>, Vec<Tile>> {
        let mut scratch = self.tiles.clone();
        let mut consumed = Vec::with_capacity(needed.len());
        let mut missing = Vec::new();

        for &tile in needed {
            let exact = match tile {
                Tile::Letter(_) => scratch.iter().position(|&t| t == tile),
                Tile::Blank => None,
            };
            let idx = exact.or_else(|| scratch.iter().position(|t| t.is_blank()));

            match idx {
                Some(idx) => consumed.push(scratch.remove(idx)),
                None => missing.push(tile),
            }
        }

        if missing.is_empty() {
            Ok(consumed)
        } else {
            Err(missing)
        }
    }

    /// Whether the rack could pay for `needed`
    pub fn can_supply(&self, needed: &[Tile]) -> bool {
        self.plan_consumption(needed).is_ok()
    }

    /// Remove tiles previously returned by `plan_consumption`.
    /// Returns false (and changes nothing) if any tile is missing.
    pub fn remove_tiles(&mut self, consumed: &[Tile]) -> bool {
        let mut remaining = self.tiles.clone();
        for tile in consumed {
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

    /// Append drawn tiles
    pub fn add_tiles(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.tiles.extend(tiles);
    }

    /// Draw from the bag until the rack holds `RACK_SIZE` tiles (or the bag is empty).
    /// Returns how many tiles were drawn.
    pub fn fill_from(&mut self, bag: &mut TileBag) -> usize {
        let wanted = RACK_SIZE.saturating_sub(self.tiles.len());
        let drawn = bag.draw(wanted);
        let count = drawn.len();
        self.tiles.extend(drawn);
        count
    }

    /// Display the rack as a string of tile characters
    pub fn as_string(&self) -> String {
        self.tiles.iter().map(|t| t.to_char()).collect()
    }
}

/// One side of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub side: Side,
    pub name: String,
    pub rack: Rack,
    pub score: u32,
    /// Whether the 50-point milestone has been announced
    pub reached_milestone: bool,
}

impl Player {
    /// Create a new player with an empty rack
    pub fn new(side: Side, name: String) -> Self {
        Self {
            side,
            name,
            rack: Rack::new(),
            score: 0,
            reached_milestone: false,
        }
    }

    /// Add points to the score. Returns true if this crossed the milestone
    /// for the first time.
    pub fn add_score(&mut self, points: u32) -> bool {
        self.score += points;
        if !self.reached_milestone && self.score >= MILESTONE_SCORE {
            self.reached_milestone = true;
            return true;
        }
        false
    }
}
