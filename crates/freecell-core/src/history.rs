//! Undo/redo history.
//!
//! Each entry pairs a player move with the foundation promotions the engine
//! made right after it, so one undo reverses both. The history only stores
//! moves; applying or reversing them is the caller's job (see `Session`).

use crate::actions::{Move, MoveEntry};
use crate::engine::Engine;
use crate::game::GameError;
use serde::{Deserialize, Serialize};

/// Undo and redo stacks of `MoveEntry`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    undo_stack: Vec<MoveEntry>,
    redo_stack: Vec<MoveEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new action. Anything that could have been redone is discarded.
    pub fn push(&mut self, player_move: Move, auto_moves: Vec<Move>) {
        self.undo_stack.push(MoveEntry {
            player_move,
            auto_moves,
        });
        self.redo_stack.clear();
    }

    /// Take the most recent entry and move it onto the redo stack.
    ///
    /// The caller reverses `auto_moves` last-to-first, then `player_move`.
    pub fn pop_undo(&mut self) -> Option<MoveEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    /// Take the most recently undone entry and move it back onto the undo stack.
    ///
    /// The caller re-applies `player_move`, then `auto_moves` in order.
    pub fn pop_redo(&mut self) -> Option<MoveEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    /// Entry `pop_undo` would return
    pub fn peek_undo(&self) -> Option<&MoveEntry> {
        self.undo_stack.last()
    }

    /// Entry `pop_redo` would return
    pub fn peek_redo(&self) -> Option<&MoveEntry> {
        self.redo_stack.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Applied entries, oldest first
    pub fn entries(&self) -> &[MoveEntry] {
        &self.undo_stack
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Re-apply every applied entry onto `engine`, oldest first.
    /// Starting from the opening deal this rebuilds the current table.
    pub fn replay_onto(&self, engine: &mut Engine) -> Result<(), GameError> {
        for entry in &self.undo_stack {
            engine.replay_move(&entry.player_move)?;
            for auto in &entry.auto_moves {
                engine.replay_move(auto)?;
            }
        }
        Ok(())
    }
}
