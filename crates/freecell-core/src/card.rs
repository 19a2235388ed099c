//! Playing cards.
//!
//! This module contains:
//! - Suits and their colors
//! - The `Card` value type
//! - Stacking and foundation predicates used by the move rules

use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest rank (Ace)
pub const ACE: u8 = 1;

/// Highest rank (King)
pub const KING: u8 = 13;

/// Number of cards in a full deck
pub const DECK_SIZE: usize = 52;

/// Card color, derived from the suit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

/// The four French suits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All suits, in foundation slot order
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Suit order of the canonical deck the dealer shuffles.
    /// Historical deal numbers depend on it.
    pub const DEAL_ORDER: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    /// Index of this suit's foundation slot
    pub fn index(&self) -> usize {
        match self {
            Suit::Spades => 0,
            Suit::Hearts => 1,
            Suit::Diamonds => 2,
            Suit::Clubs => 3,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Spades | Suit::Clubs => Color::Black,
        }
    }

    /// The two suits of the other color
    pub fn opposite_suits(&self) -> [Suit; 2] {
        match self.color() {
            Color::Red => [Suit::Spades, Suit::Clubs],
            Color::Black => [Suit::Hearts, Suit::Diamonds],
        }
    }

    /// Single-letter code used in the compact card notation
    pub fn letter(&self) -> char {
        match self {
            Suit::Spades => 'S',
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
        }
    }

    pub fn from_letter(letter: char) -> Option<Suit> {
        match letter.to_ascii_uppercase() {
            'S' => Some(Suit::Spades),
            'H' => Some(Suit::Hearts),
            'D' => Some(Suit::Diamonds),
            'C' => Some(Suit::Clubs),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Suit::Spades => "Spades",
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
        }
    }
}

/// A single playing card.
///
/// Cards are plain values: two cards are the same card when suit and rank match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    /// 1 (Ace) through 13 (King)
    pub rank: u8,
}

impl Card {
    /// Create a card. Ranks outside 1..=13 are a programming error.
    pub const fn new(suit: Suit, rank: u8) -> Self {
        debug_assert!(rank >= ACE && rank <= KING);
        Self { suit, rank }
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    pub fn is_red(&self) -> bool {
        self.color() == Color::Red
    }

    pub fn is_king(&self) -> bool {
        self.rank == KING
    }

    /// Whether this card may be placed on `other` in a cascade:
    /// opposite color and exactly one rank lower.
    pub fn can_stack_on(&self, other: &Card) -> bool {
        self.color() != other.color() && self.rank + 1 == other.rank
    }

    /// Whether this card is the next card for the given foundation pile
    pub fn can_move_to_foundation(&self, foundation: &[Card]) -> bool {
        match foundation.last() {
            None => self.rank == ACE,
            Some(top) => top.suit == self.suit && top.rank + 1 == self.rank,
        }
    }

    /// Rank label used in notation: A, 2..10, J, Q, K
    pub fn rank_label(&self) -> String {
        match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            n => n.to_string(),
        }
    }

    /// Long form, e.g. "Jack of Diamonds"
    pub fn name(&self) -> String {
        let rank = match self.rank {
            1 => "Ace".to_string(),
            11 => "Jack".to_string(),
            12 => "Queen".to_string(),
            13 => "King".to_string(),
            n => n.to_string(),
        };
        format!("{} of {}", rank, self.suit.name())
    }

    /// Every card of the deck, one suit after another
    pub fn full_deck() -> Vec<Card> {
        Suit::ALL
            .iter()
            .flat_map(|&suit| (ACE..=KING).map(move |rank| Card::new(suit, rank)))
            .collect()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_label(), self.suit.letter())
    }
}

/// Parses the compact notation produced by `Display`, e.g. `JD`, `10h`, `as`
impl FromStr for Card {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidCard(s.to_string());
        let s = s.trim();
        let suit_letter = s.chars().last().ok_or_else(invalid)?;
        let suit = Suit::from_letter(suit_letter).ok_or_else(invalid)?;
        let rank_part = &s[..s.len() - suit_letter.len_utf8()];
        let rank = match rank_part.to_ascii_uppercase().as_str() {
            "A" => ACE,
            "J" => 11,
            "Q" => 12,
            "K" => KING,
            n => n.parse::<u8>().map_err(|_| invalid())?,
        };
        if !(ACE..=KING).contains(&rank) {
            return Err(invalid());
        }
        Ok(Card::new(suit, rank))
    }
}
