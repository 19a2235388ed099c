//! Move hints.
//!
//! Every legal move gets an additive score from a fixed table of rules and a
//! short explanation. The highest score wins; ties go to the move enumerated
//! first. This looks one move ahead only, so a hint is never a promise that
//! the game can still be won.

use crate::actions::{Location, Move};
use crate::card::Card;
use crate::engine::Engine;
use crate::game::GameState;
use serde::{Deserialize, Serialize};

/// A scoring rule that matched a candidate move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HintRule {
    /// Any move onto a foundation
    ToFoundation,
    /// Ace or two onto a foundation
    LowCardToFoundation,
    /// A free cell is emptied onto a column
    FreeCellToCascade,
    /// King from a column into an empty column
    KingToEmptyColumn,
    /// Anything else from a column into an empty column
    NonKingToEmptyColumn,
    /// Column to non-empty column
    BuildOnColumn,
    /// Column to non-empty column onto the same suit
    SameSuitBuild,
    /// Leaves a card of rank 3 or lower exposed
    ExposesLowCard,
    /// Takes the last card(s) of a column
    EmptiesColumn,
    /// A card goes into a free cell
    ParkInFreeCell,
    /// Parking exposes a card that can go straight to its foundation
    ParkExposesFoundationCard,
}

impl HintRule {
    /// Score contribution of this rule
    pub fn delta(&self) -> i32 {
        match self {
            HintRule::ToFoundation => 100,
            HintRule::LowCardToFoundation => 20,
            HintRule::FreeCellToCascade => 40,
            HintRule::KingToEmptyColumn => 30,
            HintRule::NonKingToEmptyColumn => -10,
            HintRule::BuildOnColumn => 20,
            HintRule::SameSuitBuild => 10,
            HintRule::ExposesLowCard => 25,
            HintRule::EmptiesColumn => 35,
            HintRule::ParkInFreeCell => -5,
            HintRule::ParkExposesFoundationCard => 60,
        }
    }
}

/// A suggested move with its score and explanation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub from: Location,
    pub to: Location,
    pub cards: Vec<Card>,
    pub reason: String,
    pub score: i32,
    pub rules: Vec<HintRule>,
}

impl Hint {
    /// The candidate as a plain move
    pub fn to_move(&self) -> Move {
        Move {
            from: self.from,
            to: self.to,
            cards: self.cards.clone(),
            is_auto_move: false,
        }
    }
}

/// Card left on top of the source column once the move's cards are gone.
/// `Some(None)` when the column would be emptied, `None` for non-column sources.
fn exposed_card(state: &GameState, mv: &Move) -> Option<Option<Card>> {
    match mv.from {
        Location::Cascade { index, card_index } => {
            let column = state.cascade(index)?;
            let start = card_index.unwrap_or(column.len().saturating_sub(1));
            Some(column[..start.min(column.len())].last().copied())
        }
        _ => None,
    }
}

/// Score one candidate move against the current table
fn score_move(state: &GameState, mv: Move) -> Option<Hint> {
    let mut rules = Vec::new();
    let lead = mv.lead_card()?;
    let exposed = exposed_card(state, &mv);
    let mut reason;

    match mv.to {
        Location::Foundation { .. } => {
            rules.push(HintRule::ToFoundation);
            if lead.rank <= 2 {
                rules.push(HintRule::LowCardToFoundation);
            }
            reason = format!("Move the {} to its foundation", lead.name());
        }
        Location::Cascade { index, .. } => {
            let target = state.cascade_top(index);
            match (mv.from, target) {
                (Location::Freecell { .. }, Some(top)) => {
                    rules.push(HintRule::FreeCellToCascade);
                    reason = format!(
                        "Free a cell by moving the {} onto the {}",
                        lead.name(),
                        top.name()
                    );
                }
                (Location::Freecell { .. }, None) => {
                    rules.push(HintRule::FreeCellToCascade);
                    reason = format!(
                        "Free a cell by moving the {} to an empty column",
                        lead.name()
                    );
                }
                (_, None) if lead.is_king() => {
                    rules.push(HintRule::KingToEmptyColumn);
                    reason = format!("Start a new column with the {}", lead.name());
                }
                (_, None) => {
                    rules.push(HintRule::NonKingToEmptyColumn);
                    reason = format!("Move the {} to an empty column", lead.name());
                }
                (_, Some(top)) => {
                    rules.push(HintRule::BuildOnColumn);
                    if top.suit == lead.suit {
                        rules.push(HintRule::SameSuitBuild);
                    }
                    reason = if mv.cards.len() > 1 {
                        format!("Move {} cards onto the {}", mv.cards.len(), top.name())
                    } else {
                        format!("Move the {} onto the {}", lead.name(), top.name())
                    };
                }
            }
        }
        Location::Freecell { .. } => {
            rules.push(HintRule::ParkInFreeCell);
            reason = format!("Park the {} in a free cell", lead.name());
            if let Some(Some(under)) = exposed {
                if under.can_move_to_foundation(state.foundation(under.suit)) {
                    rules.push(HintRule::ParkExposesFoundationCard);
                    reason = format!(
                        "Park the {} to free the {} for its foundation",
                        lead.name(),
                        under.name()
                    );
                }
            }
        }
    }

    match exposed {
        Some(None) => {
            rules.push(HintRule::EmptiesColumn);
            reason = format!("Empty a column by moving the {}", lead.name());
        }
        Some(Some(under)) if under.rank <= 3 => {
            rules.push(HintRule::ExposesLowCard);
            reason = format!("{} and expose the {}", reason, under.name());
        }
        _ => {}
    }

    Some(Hint {
        from: mv.from,
        to: mv.to,
        score: rules.iter().map(HintRule::delta).sum(),
        cards: mv.cards,
        reason,
        rules,
    })
}

/// Score every legal move, in the engine's enumeration order
pub fn score_moves(engine: &Engine) -> Vec<Hint> {
    let state = engine.state();
    engine
        .get_legal_moves()
        .into_iter()
        .filter_map(|mv| score_move(state, mv))
        .collect()
}

/// Best-scoring legal move, or `None` when no move is legal.
/// Among equal scores the first enumerated move wins.
pub fn get_hint(engine: &Engine) -> Option<Hint> {
    score_moves(engine)
        .into_iter()
        .fold(None, |best: Option<Hint>, candidate| match best {
            Some(b) if b.score >= candidate.score => Some(b),
            _ => Some(candidate),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;
    use crate::game::Cascades;

    fn cards(notation: &str) -> Vec<Card> {
        notation
            .split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect()
    }

    fn position(columns: &[&str]) -> GameState {
        let mut cascades: Cascades = std::array::from_fn(|_| Vec::new());
        for (i, col) in columns.iter().enumerate() {
            cascades[i] = cards(col);
        }
        GameState::from_cascades(1, cascades)
    }

    fn hint_for(from: Location, to: Location, engine: &Engine) -> Hint {
        score_moves(engine)
            .into_iter()
            .find(|h| h.from.same_zone(&from) && h.to == to)
            .unwrap()
    }

    #[test]
    fn test_rule_table_ordering() {
        assert!(HintRule::ToFoundation.delta() > HintRule::FreeCellToCascade.delta());
        assert!(HintRule::FreeCellToCascade.delta() > HintRule::KingToEmptyColumn.delta());
        assert!(HintRule::KingToEmptyColumn.delta() > HintRule::BuildOnColumn.delta());
        assert!(HintRule::ParkInFreeCell.delta() < 0);
        assert!(HintRule::NonKingToEmptyColumn.delta() < HintRule::ParkInFreeCell.delta());
    }

    #[test]
    fn test_no_hint_without_moves() {
        let mut state = position(&["2S", "2H", "2D", "2C", "9S", "9H", "9D", "9C"]);
        state.free_cells = [
            Some(Card::new(Suit::Spades, 4)),
            Some(Card::new(Suit::Hearts, 4)),
            Some(Card::new(Suit::Diamonds, 4)),
            Some(Card::new(Suit::Clubs, 4)),
        ];
        assert!(get_hint(&Engine::from_state(state)).is_none());
    }

    #[test]
    fn test_foundation_move_wins() {
        let engine = Engine::from_state(position(&[
            "KS AH", "QH", "10C JD", "9D", "5S", "6S", "7S", "8S",
        ]));
        let hint = get_hint(&engine).unwrap();
        assert_eq!(hint.to, Location::foundation(Suit::Hearts));
        assert_eq!(hint.cards, cards("AH"));
        // +100 foundation, +20 low card
        assert_eq!(hint.score, 120);
        assert!(hint.reason.contains("Ace of Hearts"));
    }

    #[test]
    fn test_build_scores() {
        let engine = Engine::from_state(position(&[
            "KS 8C", "QH 9D", "10C 4S", "9S 5S", "5C", "6S", "7S", "8S",
        ]));
        // 8C onto 9D exposes KS
        let hint = hint_for(Location::cascade(0), Location::cascade(1), &engine);
        assert_eq!(hint.rules, vec![HintRule::BuildOnColumn]);
        assert_eq!(hint.score, 20);
        assert_eq!(hint.reason, "Move the 8 of Clubs onto the 9 of Diamonds");
    }

    #[test]
    fn test_king_and_non_king_into_empty_column() {
        let engine = Engine::from_state(position(&[
            "4D KS", "4H QH", "10C JD", "9D", "5S", "6S", "7S",
        ]));
        let king = hint_for(Location::cascade(0), Location::cascade(7), &engine);
        assert_eq!(king.rules, vec![HintRule::KingToEmptyColumn]);
        assert_eq!(king.score, 30);

        let queen = hint_for(Location::cascade(1), Location::cascade(7), &engine);
        assert_eq!(queen.rules, vec![HintRule::NonKingToEmptyColumn]);
        assert_eq!(queen.score, -10);
    }

    #[test]
    fn test_free_cell_to_cascade() {
        let mut state = position(&[
            "4D KC", "4H KH", "10C JC", "9D 9C", "5D 5S", "6D 6S", "7D 7S", "8H 8S",
        ]);
        state.free_cells[0] = Some(Card::new(Suit::Hearts, 7));
        let engine = Engine::from_state(state);
        let hint = get_hint(&engine).unwrap();
        // 7H onto 8S
        assert_eq!(hint.from, Location::freecell(0));
        assert_eq!(hint.to, Location::cascade(7));
        assert_eq!(hint.score, 40);
    }

    #[test]
    fn test_park_exposing_foundation_card() {
        let engine = Engine::from_state(position(&[
            "KC AD 9S", "QH", "10C JD", "9D", "5S", "6S", "7S", "8S",
        ]));
        let hint = get_hint(&engine).unwrap();
        assert_eq!(hint.from, Location::cascade_run(0, 2));
        assert_eq!(hint.to, Location::freecell(0));
        assert_eq!(
            hint.rules,
            vec![
                HintRule::ParkInFreeCell,
                HintRule::ParkExposesFoundationCard,
                HintRule::ExposesLowCard
            ]
        );
        assert_eq!(hint.score, -5 + 60 + 25);
        assert!(hint.reason.contains("Ace of Diamonds"));
    }

    #[test]
    fn test_plain_park_is_discouraged() {
        let engine = Engine::from_state(position(&[
            "KC 9S", "QH", "10C JD", "9D", "5S", "6S", "7S", "8S",
        ]));
        let hint = hint_for(Location::cascade(0), Location::freecell(0), &engine);
        assert_eq!(hint.rules, vec![HintRule::ParkInFreeCell]);
        assert_eq!(hint.score, -5);
    }

    #[test]
    fn test_emptying_a_column_overrides_reason() {
        let engine = Engine::from_state(position(&[
            "8C", "QH 9D", "10C 4S", "9S 5S", "5C", "6S", "7S", "8S",
        ]));
        let hint = hint_for(Location::cascade(0), Location::cascade(1), &engine);
        assert_eq!(hint.rules, vec![HintRule::BuildOnColumn, HintRule::EmptiesColumn]);
        assert_eq!(hint.score, 55);
        assert_eq!(hint.reason, "Empty a column by moving the 8 of Clubs");
    }

    #[test]
    fn test_ties_go_to_first_enumerated() {
        // Only parks are legal here, several with the same score
        let engine = Engine::from_state(position(&[
            "KC 9S", "KD 9H", "QC", "QD", "JC", "JD", "10C", "10D",
        ]));
        let scored = score_moves(&engine);
        let best = get_hint(&engine).unwrap();
        let top = scored.iter().map(|h| h.score).max().unwrap();
        let first = scored.iter().find(|h| h.score == top).unwrap();
        assert_eq!(&best, first);
    }

    #[test]
    fn test_every_legal_move_is_scored() {
        let engine = Engine::new(617).unwrap();
        let moves = engine.get_legal_moves();
        let scored = score_moves(&engine);
        assert_eq!(scored.len(), moves.len());
        for (hint, mv) in scored.iter().zip(&moves) {
            assert_eq!(hint.to_move(), *mv);
        }

        let empty = Move {
            from: Location::cascade_run(0, 7),
            to: Location::freecell(0),
            cards: vec![],
            is_auto_move: false,
        };
        assert!(score_move(engine.state(), empty).is_none());
    }

    #[test]
    fn test_hint_round_trips_to_move() {
        let engine = Engine::new(1).unwrap();
        let hint = get_hint(&engine).unwrap();
        let mv = hint.to_move();
        assert!(engine.is_legal_move(mv.from, mv.to));
    }
}
