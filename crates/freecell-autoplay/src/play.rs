//! Hint-driven autoplay loop.

use std::collections::HashSet;
use std::fmt;

use freecell_core::{GameError, GameState, Session};
use tracing::{debug, info};

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Deadlocked,
    MoveCapReached,
    /// The hint led back to a table already seen
    Repeated,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Won => write!(f, "won"),
            Outcome::Deadlocked => write!(f, "deadlocked"),
            Outcome::MoveCapReached => write!(f, "move cap reached"),
            Outcome::Repeated => write!(f, "position repeated"),
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct Report {
    pub outcome: Outcome,
    /// Player moves made (auto-moves not counted)
    pub player_moves: usize,
    pub final_state: GameState,
}

impl Report {
    pub fn foundation_cards(&self) -> usize {
        self.final_state.foundation_card_count()
    }
}

/// The table without its move counter, so revisits compare equal
fn position_key(state: &GameState) -> GameState {
    let mut key = state.clone();
    key.move_count = 0;
    key
}

/// Follow hints until the game ends or stops making progress
pub fn autoplay(session: &mut Session, max_moves: usize) -> Result<Report, GameError> {
    let mut seen = HashSet::new();
    let mut player_moves = 0;

    let outcome = loop {
        if session.engine().is_won() {
            break Outcome::Won;
        }
        if player_moves >= max_moves {
            break Outcome::MoveCapReached;
        }
        if !seen.insert(position_key(session.state())) {
            break Outcome::Repeated;
        }
        let Some(hint) = session.hint() else {
            break Outcome::Deadlocked;
        };

        debug!(
            from = %hint.from,
            to = %hint.to,
            score = hint.score,
            reason = %hint.reason,
            "playing hint"
        );
        let entry = session.play(hint.from, hint.to)?;
        player_moves += 1;
        if !entry.auto_moves.is_empty() {
            debug!(count = entry.auto_moves.len(), "auto-promoted");
        }
    };

    let report = Report {
        outcome,
        player_moves,
        final_state: session.state().clone(),
    };
    info!(
        game = report.final_state.game_number,
        outcome = %report.outcome,
        player_moves = report.player_moves,
        foundation_cards = report.foundation_cards(),
        "autoplay finished"
    );
    Ok(report)
}
