//! Deterministic deals.
//!
//! A game number fully determines the opening layout. The shuffle is the
//! classic linear congruential generator used by the historical numbered
//! deals, so game numbers are portable between implementations.

use crate::card::{Card, Suit, ACE, DECK_SIZE, KING};
use crate::game::{Cascades, GameError, CASCADE_COUNT};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest valid game number
pub const MIN_GAME_NUMBER: u32 = 1;

/// Highest valid game number
pub const MAX_GAME_NUMBER: u32 = 9_999_999;

/// A validated game number in `MIN_GAME_NUMBER..=MAX_GAME_NUMBER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct GameNumber(u32);

impl GameNumber {
    pub fn new(value: u32) -> Result<Self, GameError> {
        if (MIN_GAME_NUMBER..=MAX_GAME_NUMBER).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GameError::InvalidGameNumber(format!(
                "{} is outside {}..={}",
                value, MIN_GAME_NUMBER, MAX_GAME_NUMBER
            )))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for GameNumber {
    type Error = GameError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for GameNumber {
    type Error = GameError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let value = u32::try_from(value).map_err(|_| {
            GameError::InvalidGameNumber(format!(
                "{} is outside {}..={}",
                value, MIN_GAME_NUMBER, MAX_GAME_NUMBER
            ))
        })?;
        Self::new(value)
    }
}

/// JavaScript numbers arrive as floats; anything with a fractional part is rejected.
impl TryFrom<f64> for GameNumber {
    type Error = GameError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(GameError::InvalidGameNumber(format!(
                "{} is not an integer",
                value
            )));
        }
        if value < MIN_GAME_NUMBER as f64 || value > MAX_GAME_NUMBER as f64 {
            return Err(GameError::InvalidGameNumber(format!(
                "{} is outside {}..={}",
                value, MIN_GAME_NUMBER, MAX_GAME_NUMBER
            )));
        }
        Self::new(value as u32)
    }
}

impl FromStr for GameNumber {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed.parse().map_err(|_| {
            GameError::InvalidGameNumber(format!("{:?} is not an integer", trimmed))
        })?;
        Self::try_from(value)
    }
}

impl From<GameNumber> for u32 {
    fn from(value: GameNumber) -> Self {
        value.0
    }
}

impl fmt::Display for GameNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The deal generator: `state = state * 214013 + 2531011 (mod 2^31)`,
/// yielding bits 16..31 of the new state.
struct DealRng {
    state: u32,
}

impl DealRng {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(214_013)
            .wrapping_add(2_531_011)
            & 0x7FFF_FFFF;
        (self.state >> 16) & 0x7FFF
    }
}

/// Canonical unshuffled deck: rank-major, suits in `Suit::DEAL_ORDER`
fn canonical_deck() -> Vec<Card> {
    (ACE..=KING)
        .flat_map(|rank| Suit::DEAL_ORDER.iter().map(move |&suit| Card::new(suit, rank)))
        .collect()
}

/// Shuffle order of the 52 cards for a game number
fn shuffled(game_number: GameNumber) -> Vec<Card> {
    let mut deck = canonical_deck();
    let mut rng = DealRng::new(game_number.get());
    let mut dealt = Vec::with_capacity(DECK_SIZE);

    for i in 0..DECK_SIZE {
        let remaining = DECK_SIZE - i;
        let j = rng.next() as usize % remaining;
        deck.swap(j, remaining - 1);
        if let Some(card) = deck.pop() {
            dealt.push(card);
        }
    }

    dealt
}

/// Deal the opening tableau for a game number.
///
/// Cards go round-robin into the eight columns, so columns 0-3 receive
/// seven cards and columns 4-7 receive six.
pub fn deal(game_number: u32) -> Result<Cascades, GameError> {
    let game_number = GameNumber::new(game_number)?;
    Ok(deal_validated(game_number))
}

/// Deal for an already validated game number
pub fn deal_validated(game_number: GameNumber) -> Cascades {
    let mut cascades: Cascades = std::array::from_fn(|_| Vec::with_capacity(7));
    for (i, card) in shuffled(game_number).into_iter().enumerate() {
        cascades[i % CASCADE_COUNT].push(card);
    }

    tracing::debug!(game = game_number.get(), "dealt new layout");
    cascades
}

/// Pick a random game number, e.g. for a "new game" button
pub fn random_game_number<R: Rng>(rng: &mut R) -> GameNumber {
    GameNumber(rng.gen_range(MIN_GAME_NUMBER..=MAX_GAME_NUMBER))
}
