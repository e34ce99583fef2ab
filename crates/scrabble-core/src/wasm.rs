//! WebAssembly bindings for the Accessible Scrabble engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen.
//! Words are checked against the embedded word list.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::board::{Coord, Direction, Side, BOARD_SIZE};
#[cfg(feature = "wasm")]
use crate::bot::{play_turn, Bot};
#[cfg(feature = "wasm")]
use crate::dictionary::WordList;
#[cfg(feature = "wasm")]
use crate::flow::{FlowInput, PlacementFlow};
#[cfg(feature = "wasm")]
use crate::game::GameState;
#[cfg(feature = "wasm")]
use crate::narration::{self, Names, RecordingNarrator};

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
    flow: PlacementFlow,
    bot: Bot,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a new game for the named player
    #[wasm_bindgen(constructor)]
    pub fn new(player_name: &str) -> WasmGame {
        WasmGame {
            state: GameState::new(player_name),
            flow: PlacementFlow::new(),
            bot: Bot::new(),
        }
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(&self.state).unwrap_or_else(|_| "{}".to_string())
    }

    /// "Player" or "Ai"
    #[wasm_bindgen(js_name = getCurrentTurn)]
    pub fn get_current_turn(&self) -> String {
        format!("{:?}", self.state.current_turn)
    }

    /// Play a word for the human player; returns narration lines as JSON
    #[wasm_bindgen(js_name = playWord)]
    pub fn play_word(
        &mut self,
        word: &str,
        row: usize,
        col: usize,
        direction: &str,
    ) -> Result<String, JsValue> {
        let direction = Direction::from_letter(direction)
            .ok_or_else(|| JsValue::from_str("Direction must be H or V"))?;
        let report = self
            .state
            .play_word(
                Side::Player,
                WordList::embedded(),
                word,
                Coord::new(row, col),
                direction,
            )
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.narrate(&report.events))
    }

    /// Feed a placement-flow input given as JSON (see `FlowInput`)
    #[wasm_bindgen(js_name = flowInput)]
    pub fn flow_input(&mut self, input_json: &str) -> Result<String, JsValue> {
        let input: FlowInput = serde_json::from_str(input_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid input JSON: {}", e)))?;
        let out = self
            .flow
            .handle(input, &self.state, WordList::embedded())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(serde_json::to_string(&out).unwrap_or_else(|_| "null".to_string()))
    }

    /// Pass the human player's turn
    pub fn pass(&mut self) -> Result<String, JsValue> {
        let events = self
            .state
            .pass(Side::Player)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.narrate(&events))
    }

    /// End the game
    pub fn quit(&mut self) -> String {
        let events = self.state.quit();
        self.narrate(&events)
    }

    /// Let the AI take its turn
    #[wasm_bindgen(js_name = aiTurn)]
    pub fn ai_turn(&mut self) -> Result<String, JsValue> {
        let events = play_turn(&mut self.state, Side::Ai, &mut self.bot)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(self.narrate(&events))
    }

    /// Check if the game is finished
    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Board rows as strings, '.' for empty cells
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> String {
        let rows: Vec<String> = self.state.board.to_string().lines().map(String::from).collect();
        debug_assert_eq!(rows.len(), BOARD_SIZE);
        serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
    }

    /// Highlight for every cell as a JSON grid
    #[wasm_bindgen(js_name = getHighlights)]
    pub fn get_highlights(&self) -> String {
        let grid: Vec<Vec<_>> = (0..BOARD_SIZE)
            .map(|row| {
                (0..BOARD_SIZE)
                    .map(|col| self.flow.highlight(&self.state.board, Coord::new(row, col)))
                    .collect()
            })
            .collect();
        serde_json::to_string(&grid).unwrap_or_else(|_| "[]".to_string())
    }

    /// The human player's rack as a string
    #[wasm_bindgen(js_name = getRack)]
    pub fn get_rack(&self) -> String {
        self.state.rack(Side::Player).as_string()
    }

    /// Scores as [player, ai]
    #[wasm_bindgen(js_name = getScores)]
    pub fn get_scores(&self) -> Vec<u32> {
        vec![self.state.score(Side::Player), self.state.score(Side::Ai)]
    }
}

#[cfg(feature = "wasm")]
impl WasmGame {
    fn narrate(&self, events: &[crate::actions::GameEvent]) -> String {
        let mut narrator = RecordingNarrator::default();
        narration::narrate(events, &Names::from_game(&self.state), &mut narrator);
        serde_json::to_string(&narrator.lines).unwrap_or_else(|_| "[]".to_string())
    }
}
