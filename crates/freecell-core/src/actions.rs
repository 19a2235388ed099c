//! Locations and moves.
//!
//! This module defines where cards can be on the table and the moves
//! that relocate them.

use crate::card::{Card, Suit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A place on the table a card or run can be taken from or moved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    /// A tableau column. `card_index` selects the start of a run;
    /// `None` means the exposed top card.
    Cascade {
        index: usize,
        #[serde(
            rename = "cardIndex",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        card_index: Option<usize>,
    },
    /// One of the four free cells
    Freecell { index: usize },
    /// The foundation pile of a suit
    Foundation { suit: Suit },
}

impl Location {
    /// The exposed top card of a column
    pub fn cascade(index: usize) -> Self {
        Location::Cascade {
            index,
            card_index: None,
        }
    }

    /// A run in a column, starting at `card_index`
    pub fn cascade_run(index: usize, card_index: usize) -> Self {
        Location::Cascade {
            index,
            card_index: Some(card_index),
        }
    }

    pub fn freecell(index: usize) -> Self {
        Location::Freecell { index }
    }

    pub fn foundation(suit: Suit) -> Self {
        Location::Foundation { suit }
    }

    /// Whether two locations name the same pile, ignoring any run start
    pub fn same_zone(&self, other: &Location) -> bool {
        match (self, other) {
            (Location::Cascade { index: a, .. }, Location::Cascade { index: b, .. }) => a == b,
            (Location::Freecell { index: a }, Location::Freecell { index: b }) => a == b,
            (Location::Foundation { suit: a }, Location::Foundation { suit: b }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Cascade { index, .. } => write!(f, "column {}", index + 1),
            Location::Freecell { index } => write!(f, "free cell {}", index + 1),
            Location::Foundation { suit } => write!(f, "{} foundation", suit.name()),
        }
    }
}

/// A relocation of one or more cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: Location,
    pub to: Location,
    /// Cards moved, bottom of the run first
    pub cards: Vec<Card>,
    /// Set for foundation promotions the engine performed on its own
    pub is_auto_move: bool,
}

impl Move {
    /// The card at the bottom of the moved run (the one that lands on the destination)
    pub fn lead_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    pub fn is_to_foundation(&self) -> bool {
        matches!(self.to, Location::Foundation { .. })
    }
}

/// One user-facing action: the player's move plus the promotions it triggered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEntry {
    pub player_move: Move,
    pub auto_moves: Vec<Move>,
}
