//! A game in progress.
//!
//! `Session` pairs an `Engine` with its `History` and turns engine calls into
//! the actions a player sees: a move (with its auto-promotions), undo, redo,
//! restart. Undo and redo are all-or-nothing.

use crate::actions::{Location, MoveEntry};
use crate::engine::Engine;
use crate::game::{GameError, GameState};
use crate::hint::{self, Hint};
use crate::history::History;
use tracing::{debug, info};

/// An engine, its undo history, and the table it started from
#[derive(Debug, Clone)]
pub struct Session {
    engine: Engine,
    history: History,
    initial: GameState,
}

impl Session {
    /// Deal a new game
    pub fn new(game_number: u32) -> Result<Self, GameError> {
        let engine = Engine::new(game_number)?;
        info!(game = game_number, "new game");
        Ok(Self::from_engine(engine))
    }

    /// Start a session from an existing engine; its table becomes the restart point
    pub fn from_engine(engine: Engine) -> Self {
        Self {
            initial: engine.state().clone(),
            engine,
            history: History::new(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn state(&self) -> &GameState {
        self.engine.state()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Table the session started from
    pub fn initial_state(&self) -> &GameState {
        &self.initial
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Play a move, then promote whatever became safe. Both are recorded as one entry.
    pub fn play(&mut self, from: Location, to: Location) -> Result<MoveEntry, GameError> {
        let player_move = self.engine.execute_move(from, to)?;
        let auto_moves = self.engine.auto_move_to_foundations();

        let entry = MoveEntry {
            player_move: player_move.clone(),
            auto_moves: auto_moves.clone(),
        };
        self.history.push(player_move, auto_moves);

        if self.engine.is_won() {
            info!(
                game = self.state().game_number,
                moves = self.state().move_count,
                "game won"
            );
        } else if self.engine.is_deadlocked() {
            info!(game = self.state().game_number, "no legal moves left");
        }
        Ok(entry)
    }

    /// Undo the latest action. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, GameError> {
        let Some(entry) = self.history.peek_undo() else {
            return Ok(false);
        };

        let mut scratch = self.engine.clone();
        for auto in entry.auto_moves.iter().rev() {
            scratch.undo_move(auto)?;
        }
        scratch.undo_move(&entry.player_move)?;

        self.engine = scratch;
        self.history.pop_undo();
        debug!(remaining = self.history.undo_len(), "undo");
        Ok(true)
    }

    /// Redo the latest undone action. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool, GameError> {
        let Some(entry) = self.history.peek_redo() else {
            return Ok(false);
        };

        let mut scratch = self.engine.clone();
        scratch.replay_move(&entry.player_move)?;
        for auto in &entry.auto_moves {
            scratch.replay_move(auto)?;
        }

        self.engine = scratch;
        self.history.pop_redo();
        debug!(remaining = self.history.redo_len(), "redo");
        Ok(true)
    }

    /// Back to the starting table, history cleared
    pub fn restart(&mut self) {
        self.engine = Engine::from_state(self.initial.clone());
        self.history.clear();
        debug!(game = self.initial.game_number, "restarted");
    }

    /// Replace the current game with a freshly dealt one
    pub fn new_game(&mut self, game_number: u32) -> Result<(), GameError> {
        *self = Self::new(game_number)?;
        Ok(())
    }

    /// Best single move for the current table
    pub fn hint(&self) -> Option<Hint> {
        hint::get_hint(&self.engine)
    }
}
