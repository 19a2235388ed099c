//! FreeCell - a deterministic solitaire engine
//!
//! This crate provides the core game logic for FreeCell, including:
//! - Numbered, reproducible deals
//! - Move rules for columns, free cells and foundations, with supermoves
//! - Safe automatic promotion to the foundations
//! - Undo/redo that treats a move and its auto-promotions as one action
//! - A one-move-ahead hint scorer
//!
//! # Architecture
//!
//! The engine does no I/O and keeps no global state. It can be compiled to:
//! - Native Rust, for tools and tests
//! - WebAssembly (feature `wasm`), for a browser front end
//!
//! # Modules
//!
//! - [`card`]: Suits, ranks and stacking predicates
//! - [`dealer`]: Game numbers and the deal shuffle
//! - [`actions`]: Locations and moves
//! - [`game`]: The table state and error type
//! - [`engine`]: Move legality and state transitions
//! - [`history`]: Undo/redo stacks
//! - [`session`]: A game in progress (engine + history)
//! - [`hint`]: Move suggestions

pub mod actions;
pub mod card;
pub mod dealer;
pub mod engine;
pub mod game;
pub mod hint;
pub mod history;
pub mod session;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{Location, Move, MoveEntry};
pub use card::{Card, Color, Suit};
pub use dealer::{deal, random_game_number, GameNumber, MAX_GAME_NUMBER, MIN_GAME_NUMBER};
pub use engine::Engine;
pub use game::{GameError, GameState, CASCADE_COUNT, FREE_CELL_COUNT};
pub use hint::{get_hint, score_moves, Hint, HintRule};
pub use history::History;
pub use session::Session;
