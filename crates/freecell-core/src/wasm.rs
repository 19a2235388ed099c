//! WebAssembly bindings for the FreeCell engine.
//!
//! This module exposes a `Session` to JavaScript through wasm-bindgen.
//! Locations, moves and state cross the boundary as JSON strings.

use wasm_bindgen::prelude::*;

use crate::actions::Location;
use crate::dealer::{random_game_number, GameNumber};
use crate::session::Session;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn parse_location(json: &str) -> Result<Location, JsValue> {
    serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("Invalid location: {}", e)))
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    session: Session,
}

#[wasm_bindgen]
impl WasmGame {
    /// Deal a numbered game. Non-integer or out-of-range numbers are rejected.
    #[wasm_bindgen(constructor)]
    pub fn new(game_number: f64) -> Result<WasmGame, JsValue> {
        let game_number =
            GameNumber::try_from(game_number).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let session =
            Session::new(game_number.get()).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGame { session })
    }

    /// Deal a random game
    pub fn random() -> Result<WasmGame, JsValue> {
        let game_number = random_game_number(&mut rand::thread_rng());
        Self::new(game_number.get() as f64)
    }

    /// Get the current table as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(self.session.state()).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen(js_name = getGameNumber)]
    pub fn get_game_number(&self) -> u32 {
        self.session.state().game_number
    }

    /// Check a move given as two location JSON objects
    #[wasm_bindgen(js_name = isLegalMove)]
    pub fn is_legal_move(&self, from_json: &str, to_json: &str) -> Result<bool, JsValue> {
        let from = parse_location(from_json)?;
        let to = parse_location(to_json)?;
        Ok(self.session.engine().is_legal_move(from, to))
    }

    /// Play a move, returns the move entry (with auto-moves) as JSON
    pub fn play(&mut self, from_json: &str, to_json: &str) -> Result<String, JsValue> {
        let from = parse_location(from_json)?;
        let to = parse_location(to_json)?;

        match self.session.play(from, to) {
            Ok(entry) => Ok(serde_json::to_string(&entry).unwrap_or_else(|_| "null".to_string())),
            Err(e) => Err(JsValue::from_str(&format!("Move failed: {}", e))),
        }
    }

    /// Undo the last action; false when there was nothing to undo
    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.session
            .undo()
            .map_err(|e| JsValue::from_str(&format!("Undo failed: {}", e)))
    }

    /// Redo the last undone action; false when there was nothing to redo
    pub fn redo(&mut self) -> Result<bool, JsValue> {
        self.session
            .redo()
            .map_err(|e| JsValue::from_str(&format!("Redo failed: {}", e)))
    }

    pub fn restart(&mut self) {
        self.session.restart();
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.session.can_redo()
    }

    /// All legal moves as a JSON array
    #[wasm_bindgen(js_name = getLegalMoves)]
    pub fn get_legal_moves(&self) -> String {
        let moves = self.session.engine().get_legal_moves();
        serde_json::to_string(&moves).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = hasLegalMoves)]
    pub fn has_legal_moves(&self) -> bool {
        self.session.engine().has_legal_moves()
    }

    /// Best move as JSON, or "null" when stuck
    #[wasm_bindgen(js_name = getHint)]
    pub fn get_hint(&self) -> String {
        match self.session.hint() {
            Some(hint) => serde_json::to_string(&hint).unwrap_or_else(|_| "null".to_string()),
            None => "null".to_string(),
        }
    }

    /// Largest run that can move right now
    #[wasm_bindgen(js_name = maxMovable)]
    pub fn max_movable(&self, to_empty_cascade: bool) -> usize {
        self.session.engine().calculate_max_movable(to_empty_cascade)
    }

    #[wasm_bindgen(js_name = isWon)]
    pub fn is_won(&self) -> bool {
        self.session.engine().is_won()
    }

    #[wasm_bindgen(js_name = getMoveCount)]
    pub fn get_move_count(&self) -> u32 {
        self.session.state().move_count
    }
}
