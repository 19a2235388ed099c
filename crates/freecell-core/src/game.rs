//! Table state.
//!
//! This module contains the `GameState` struct (the three kinds of zones plus
//! bookkeeping), its read-only queries, and the crate's error type.

use crate::actions::Location;
use crate::card::{Card, Suit, ACE, DECK_SIZE, KING};
use crate::dealer::{self, GameNumber};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Number of tableau columns
pub const CASCADE_COUNT: usize = 8;

/// Number of free cells
pub const FREE_CELL_COUNT: usize = 4;

/// Number of foundation piles (one per suit)
pub const FOUNDATION_COUNT: usize = 4;

/// The eight tableau columns; the last card of each is the exposed top
pub type Cascades = [Vec<Card>; CASCADE_COUNT];

/// Errors raised by the engine
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Invalid game number: {0}")]
    InvalidGameNumber(String),

    #[error("Invalid card: {0:?}")]
    InvalidCard(String),

    #[error("Illegal move from {from} to {to}")]
    IllegalMove { from: Location, to: Location },

    #[error("Move does not match the table: {0}")]
    MoveMismatch(String),

    #[error("Corrupt game state: {0}")]
    CorruptState(String),
}

/// The complete table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// Tableau columns
    pub cascades: Cascades,
    /// Free cells, each empty or holding one card
    pub free_cells: [Option<Card>; FREE_CELL_COUNT],
    /// Foundation piles, indexed by `Suit::index()`
    pub foundations: [Vec<Card>; FOUNDATION_COUNT],
    /// Game number the layout was dealt from
    pub game_number: u32,
    /// Moves made so far (auto-moves included)
    pub move_count: u32,
    /// All four foundations complete
    pub is_won: bool,
}

impl GameState {
    /// Deal a fresh table for a game number
    pub fn new(game_number: u32) -> Result<Self, GameError> {
        let cascades = dealer::deal(game_number)?;
        Ok(Self::from_cascades(game_number, cascades))
    }

    /// Fresh table for an already validated game number
    pub fn for_game(game_number: GameNumber) -> Self {
        Self::from_cascades(game_number.get(), dealer::deal_validated(game_number))
    }

    /// A table with the given columns, empty free cells and empty foundations
    pub fn from_cascades(game_number: u32, cascades: Cascades) -> Self {
        Self {
            cascades,
            free_cells: [None; FREE_CELL_COUNT],
            foundations: std::array::from_fn(|_| Vec::new()),
            game_number,
            move_count: 0,
            is_won: false,
        }
    }

    /// Get a column by index
    pub fn cascade(&self, index: usize) -> Option<&[Card]> {
        self.cascades.get(index).map(|c| c.as_slice())
    }

    /// Exposed top card of a column
    pub fn cascade_top(&self, index: usize) -> Option<Card> {
        self.cascades.get(index).and_then(|c| c.last().copied())
    }

    /// Card in a free cell, if any
    pub fn free_cell(&self, index: usize) -> Option<Card> {
        self.free_cells.get(index).copied().flatten()
    }

    /// Foundation pile of a suit
    pub fn foundation(&self, suit: Suit) -> &[Card] {
        &self.foundations[suit.index()]
    }

    /// Rank on top of a suit's foundation, 0 when empty
    pub fn foundation_top_rank(&self, suit: Suit) -> u8 {
        self.foundation(suit).last().map(|c| c.rank).unwrap_or(0)
    }

    pub fn empty_free_cells(&self) -> usize {
        self.free_cells.iter().filter(|c| c.is_none()).count()
    }

    pub fn first_empty_free_cell(&self) -> Option<usize> {
        self.free_cells.iter().position(|c| c.is_none())
    }

    pub fn empty_cascades(&self) -> usize {
        self.cascades.iter().filter(|c| c.is_empty()).count()
    }

    /// Total cards already on foundations
    pub fn foundation_card_count(&self) -> usize {
        self.foundations.iter().map(|f| f.len()).sum()
    }

    /// Whether every foundation holds Ace through King
    pub fn all_foundations_complete(&self) -> bool {
        self.foundations.iter().all(|f| f.len() == KING as usize)
    }

    /// Every card on the table, zone by zone
    pub fn all_cards(&self) -> Vec<Card> {
        self.cascades
            .iter()
            .flatten()
            .copied()
            .chain(self.free_cells.iter().flatten().copied())
            .chain(self.foundations.iter().flatten().copied())
            .collect()
    }

    /// Verify the card-conservation and foundation-order invariants
    pub fn check_integrity(&self) -> Result<(), GameError> {
        let cards = self.all_cards();
        if cards.len() != DECK_SIZE {
            return Err(GameError::CorruptState(format!(
                "{} cards on the table, expected {}",
                cards.len(),
                DECK_SIZE
            )));
        }

        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for card in &cards {
            if !(ACE..=KING).contains(&card.rank) {
                return Err(GameError::CorruptState(format!(
                    "{} has rank {}, outside {}..={}",
                    card, card.rank, ACE, KING
                )));
            }
            if !seen.insert(*card) {
                return Err(GameError::CorruptState(format!("duplicate card {}", card)));
            }
        }

        for suit in Suit::ALL {
            for (i, card) in self.foundation(suit).iter().enumerate() {
                if card.suit != suit || card.rank as usize != i + 1 {
                    return Err(GameError::CorruptState(format!(
                        "{} out of order on the {} foundation",
                        card,
                        suit.name()
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_is_fresh() {
        let state = GameState::new(1).unwrap();
        assert_eq!(state.game_number, 1);
        assert_eq!(state.move_count, 0);
        assert!(!state.is_won);
        assert_eq!(state.empty_free_cells(), FREE_CELL_COUNT);
        assert_eq!(state.empty_cascades(), 0);
        assert_eq!(state.foundation_card_count(), 0);
        for suit in Suit::ALL {
            assert!(state.foundation(suit).is_empty());
            assert_eq!(state.foundation_top_rank(suit), 0);
        }
        assert!(state.check_integrity().is_ok());
    }

    #[test]
    fn test_invalid_game_number() {
        assert!(matches!(
            GameState::new(0),
            Err(GameError::InvalidGameNumber(_))
        ));
    }

    #[test]
    fn test_zone_accessors() {
        let state = GameState::new(1).unwrap();
        assert_eq!(state.cascade_top(0), Some(Card::new(Suit::Spades, 6)));
        assert_eq!(state.cascade(0).map(|c| c.len()), Some(7));
        assert_eq!(state.cascade(8), None);
        assert_eq!(state.cascade_top(8), None);
        assert_eq!(state.free_cell(0), None);
        assert_eq!(state.free_cell(9), None);
        assert_eq!(state.first_empty_free_cell(), Some(0));
    }

    #[test]
    fn test_integrity_detects_missing_card() {
        let mut state = GameState::new(1).unwrap();
        state.cascades[0].pop();
        assert!(matches!(
            state.check_integrity(),
            Err(GameError::CorruptState(_))
        ));
    }

    #[test]
    fn test_integrity_detects_duplicate_card() {
        let mut state = GameState::new(1).unwrap();
        let card = state.cascades[1][0];
        state.cascades[0][0] = card;
        assert!(matches!(
            state.check_integrity(),
            Err(GameError::CorruptState(_))
        ));
    }

    #[test]
    fn test_integrity_detects_out_of_range_rank() {
        let state = GameState::new(1).unwrap();
        let mut json = serde_json::to_value(&state).unwrap();
        // Column 0 opens with JD, KD; turn the king into a rank-14 card
        assert_eq!(json["cascades"][0][1]["rank"], 13);
        json["cascades"][0][1]["rank"] = serde_json::json!(14);
        let tampered: GameState = serde_json::from_value(json).unwrap();

        assert_eq!(tampered.all_cards().len(), DECK_SIZE);
        assert!(matches!(
            tampered.check_integrity(),
            Err(GameError::CorruptState(_))
        ));

        let mut zero = GameState::new(1).unwrap();
        zero.cascades[0][0].rank = 0;
        assert!(zero.check_integrity().is_err());
    }

    #[test]
    fn test_integrity_detects_foundation_order() {
        let mut state = GameState::new(1).unwrap();
        // Move the two of clubs onto an empty clubs foundation.
        let (col, idx) = state
            .cascades
            .iter()
            .enumerate()
            .find_map(|(col, cards)| {
                cards
                    .iter()
                    .position(|c| *c == Card::new(Suit::Clubs, 2))
                    .map(|idx| (col, idx))
            })
            .unwrap();
        let card = state.cascades[col].remove(idx);
        state.foundations[Suit::Clubs.index()].push(card);
        assert!(matches!(
            state.check_integrity(),
            Err(GameError::CorruptState(_))
        ));
    }

    #[test]
    fn test_all_foundations_complete() {
        let mut state = GameState::from_cascades(1, std::array::from_fn(|_| Vec::new()));
        for suit in Suit::ALL {
            state.foundations[suit.index()] = (1..=KING).map(|r| Card::new(suit, r)).collect();
        }
        assert!(state.all_foundations_complete());
        assert!(state.check_integrity().is_ok());
    }

    #[test]
    fn test_error_messages() {
        let err = GameError::IllegalMove {
            from: Location::cascade(0),
            to: Location::freecell(2),
        };
        assert_eq!(err.to_string(), "Illegal move from column 1 to free cell 3");
    }
}
