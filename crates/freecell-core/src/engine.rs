//! Move rules and state transitions.
//!
//! The `Engine` owns a `GameState` and is the only thing that mutates it.
//! Legality is a pure function of the visible table; `execute_move` and
//! `undo_move` re-validate their input and leave the table untouched when
//! handed something that does not fit.

use crate::actions::{Location, Move};
use crate::card::Card;
use crate::game::{GameError, GameState, CASCADE_COUNT, FREE_CELL_COUNT};
use tracing::{debug, trace};

/// Whether `cards` form a descending, alternating-color run.
/// Checked pairwise from the exposed end back toward the start.
pub fn is_valid_sequence(cards: &[Card]) -> bool {
    (1..cards.len()).rev().all(|i| cards[i].can_stack_on(&cards[i - 1]))
}

/// Index where the movable run at the end of a column begins.
/// Walks backward from the exposed top; 0 for an empty column.
pub fn run_start(column: &[Card]) -> usize {
    let mut start = column.len().saturating_sub(1);
    while start > 0 && column[start].can_stack_on(&column[start - 1]) {
        start -= 1;
    }
    start
}

/// The game engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engine {
    state: GameState,
}

impl Engine {
    /// Deal a new game
    pub fn new(game_number: u32) -> Result<Self, GameError> {
        Ok(Self {
            state: GameState::new(game_number)?,
        })
    }

    /// Wrap an existing table, e.g. a restored or hand-built position.
    /// The table is taken as-is; use `GameState::check_integrity` to validate it.
    pub fn from_state(state: GameState) -> Self {
        Self { state }
    }

    /// Read-only view of the table
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state.is_won
    }

    // ==================== Legality ====================

    /// Cards a source location would give up: a single card, or the run
    /// starting at the selected index of a column.
    fn picked_cards(&self, from: Location) -> Option<&[Card]> {
        match from {
            Location::Cascade { index, card_index } => {
                let column = self.state.cascades.get(index)?;
                let start = match card_index {
                    Some(i) => i,
                    None => column.len().checked_sub(1)?,
                };
                column.get(start..).filter(|run| !run.is_empty())
            }
            Location::Freecell { index } => self
                .state
                .free_cells
                .get(index)?
                .as_ref()
                .map(std::slice::from_ref),
            Location::Foundation { .. } => None,
        }
    }

    /// The source location with a cascade run start made explicit
    fn normalized_source(&self, from: Location) -> Location {
        match from {
            Location::Cascade {
                index,
                card_index: None,
            } => {
                let len = self.state.cascades.get(index).map_or(0, |c| c.len());
                Location::cascade_run(index, len.saturating_sub(1))
            }
            other => other,
        }
    }

    fn normalized_destination(to: Location) -> Location {
        match to {
            Location::Cascade { index, .. } => Location::cascade(index),
            other => other,
        }
    }

    /// Whether a single card may be placed on a column
    fn can_place_on_cascade(card: &Card, column: &[Card]) -> bool {
        match column.last() {
            None => true,
            Some(top) => card.can_stack_on(top),
        }
    }

    /// Check whether moving from `from` to `to` is legal. Never mutates.
    pub fn is_legal_move(&self, from: Location, to: Location) -> bool {
        if from.same_zone(&to) {
            return false;
        }
        let Some(cards) = self.picked_cards(from) else {
            return false;
        };
        let lead = &cards[0];

        match to {
            Location::Foundation { suit } => {
                cards.len() == 1
                    && lead.suit == suit
                    && lead.can_move_to_foundation(self.state.foundation(suit))
            }
            Location::Freecell { index } => {
                cards.len() == 1 && matches!(self.state.free_cells.get(index), Some(None))
            }
            Location::Cascade { index, .. } => {
                let Some(dest) = self.state.cascades.get(index) else {
                    return false;
                };
                if cards.len() > 1
                    && (!is_valid_sequence(cards)
                        || cards.len() > self.calculate_max_movable(dest.is_empty()))
                {
                    return false;
                }
                Self::can_place_on_cascade(lead, dest)
            }
        }
    }

    /// Largest run that can move in one go, given the empty free cells and
    /// columns. A column being moved into does not count as free space.
    pub fn calculate_max_movable(&self, to_empty_cascade: bool) -> usize {
        let free_cells = self.state.empty_free_cells();
        let mut empty_cascades = self.state.empty_cascades();
        if to_empty_cascade {
            empty_cascades = empty_cascades.saturating_sub(1);
        }
        (1 + free_cells) * (1usize << empty_cascades)
    }

    // ==================== Transitions ====================

    /// Remove cards from a validated source
    fn take_cards(&mut self, from: Location) -> (Location, Vec<Card>) {
        match from {
            Location::Cascade { index, card_index } => {
                let column = &mut self.state.cascades[index];
                let start = card_index.unwrap_or(column.len() - 1);
                (Location::cascade_run(index, start), column.split_off(start))
            }
            Location::Freecell { index } => {
                (from, self.state.free_cells[index].take().into_iter().collect())
            }
            Location::Foundation { suit } => (
                from,
                self.state.foundations[suit.index()]
                    .pop()
                    .into_iter()
                    .collect(),
            ),
        }
    }

    /// Append cards to a validated destination
    fn put_cards(&mut self, to: Location, cards: &[Card]) {
        match to {
            Location::Cascade { index, .. } => self.state.cascades[index].extend_from_slice(cards),
            Location::Freecell { index } => self.state.free_cells[index] = cards.first().copied(),
            Location::Foundation { suit } => {
                self.state.foundations[suit.index()].extend_from_slice(cards)
            }
        }
    }

    /// Apply a move already known to be legal
    fn apply(&mut self, from: Location, to: Location, is_auto_move: bool) -> Move {
        let (from, cards) = self.take_cards(from);
        let to = Self::normalized_destination(to);
        self.put_cards(to, &cards);
        self.state.move_count += 1;
        self.state.is_won = self.state.all_foundations_complete();

        Move {
            from,
            to,
            cards,
            is_auto_move,
        }
    }

    /// Execute a player move.
    ///
    /// The move is checked with `is_legal_move` first; an illegal move
    /// returns `GameError::IllegalMove` and leaves the table unchanged.
    pub fn execute_move(&mut self, from: Location, to: Location) -> Result<Move, GameError> {
        if !self.is_legal_move(from, to) {
            return Err(GameError::IllegalMove { from, to });
        }

        let mv = self.apply(from, to, false);
        debug!(
            from = %mv.from,
            to = %mv.to,
            cards = mv.cards.len(),
            moves = self.state.move_count,
            "executed move"
        );
        if self.state.is_won {
            debug!(game = self.state.game_number, "game won");
        }
        Ok(mv)
    }

    /// Re-apply a recorded move (redo). The recorded cards must be exactly
    /// what the source would give up now.
    pub fn replay_move(&mut self, mv: &Move) -> Result<Move, GameError> {
        if !self.is_legal_move(mv.from, mv.to) {
            return Err(GameError::IllegalMove {
                from: mv.from,
                to: mv.to,
            });
        }
        if self.picked_cards(mv.from) != Some(mv.cards.as_slice()) {
            return Err(GameError::MoveMismatch(format!(
                "{} no longer holds the recorded cards",
                mv.from
            )));
        }

        let replayed = self.apply(mv.from, mv.to, mv.is_auto_move);
        trace!(from = %replayed.from, to = %replayed.to, "replayed move");
        Ok(replayed)
    }

    /// Check that `mv` can be reversed on the current table
    fn validate_undo(&self, mv: &Move) -> Result<(), GameError> {
        let mismatch = |what: &str| Err(GameError::MoveMismatch(what.to_string()));
        let count = mv.cards.len();

        if count == 0 {
            return mismatch("move carries no cards");
        }
        if mv.from.same_zone(&mv.to) {
            return mismatch("source and destination are the same pile");
        }

        let on_destination = match mv.to {
            Location::Cascade { index, .. } => self
                .state
                .cascades
                .get(index)
                .is_some_and(|column| column.ends_with(&mv.cards)),
            Location::Freecell { index } => {
                count == 1 && self.state.free_cells.get(index) == Some(&Some(mv.cards[0]))
            }
            Location::Foundation { suit } => {
                count == 1 && self.state.foundation(suit).last() == Some(&mv.cards[0])
            }
        };
        if !on_destination {
            return mismatch("moved cards are not on top of the destination");
        }

        let source_ready = match mv.from {
            Location::Cascade { index, card_index } => match self.state.cascades.get(index) {
                Some(column) => match card_index {
                    Some(start) => column.len() == start,
                    None => count == 1,
                },
                None => false,
            },
            Location::Freecell { index } => {
                count == 1 && matches!(self.state.free_cells.get(index), Some(None))
            }
            Location::Foundation { .. } => false,
        };
        if !source_ready {
            return mismatch("source cannot take the cards back");
        }

        Ok(())
    }

    /// Reverse `mv`, which must be the most recent move still applied.
    ///
    /// Returns `GameError::MoveMismatch` without touching the table if the
    /// cards are not where the move left them.
    pub fn undo_move(&mut self, mv: &Move) -> Result<(), GameError> {
        self.validate_undo(mv)?;

        let count = mv.cards.len();
        match mv.to {
            Location::Cascade { index, .. } => {
                let column = &mut self.state.cascades[index];
                column.truncate(column.len() - count);
            }
            Location::Freecell { index } => self.state.free_cells[index] = None,
            Location::Foundation { suit } => {
                self.state.foundations[suit.index()].pop();
            }
        }
        self.put_cards(mv.from, &mv.cards);

        self.state.move_count = self.state.move_count.saturating_sub(1);
        self.state.is_won = false;
        debug!(from = %mv.from, to = %mv.to, moves = self.state.move_count, "undid move");
        Ok(())
    }

    // ==================== Auto-moves ====================

    /// Whether promoting `card` can never strand a card still needed as a
    /// stacking target. Aces and twos always qualify; higher cards need both
    /// opposite-color foundations to be exactly one rank below.
    pub fn is_safe_to_auto_move(&self, card: &Card) -> bool {
        if card.rank <= 2 {
            return true;
        }
        card.suit
            .opposite_suits()
            .iter()
            .all(|&suit| self.state.foundation_top_rank(suit) == card.rank - 1)
    }

    /// Next safe foundation promotion: free cells first, then column tops
    fn find_safe_promotion(&self) -> Option<(Location, Location)> {
        let free_cells = (0..FREE_CELL_COUNT)
            .filter_map(|i| self.state.free_cell(i).map(|c| (Location::freecell(i), c)));
        let tops = (0..CASCADE_COUNT)
            .filter_map(|i| self.state.cascade_top(i).map(|c| (Location::cascade(i), c)));

        free_cells.chain(tops).find_map(|(from, card)| {
            let to = Location::foundation(card.suit);
            (self.is_safe_to_auto_move(&card) && self.is_legal_move(from, to)).then_some((from, to))
        })
    }

    /// Promote every safe card to its foundation, rescanning after each one.
    pub fn auto_move_to_foundations(&mut self) -> Vec<Move> {
        let mut moves = Vec::new();
        while let Some((from, to)) = self.find_safe_promotion() {
            let mv = self.apply(from, to, true);
            trace!(card = %mv.cards[0], from = %mv.from, "auto-moved to foundation");
            moves.push(mv);
        }
        if !moves.is_empty() {
            debug!(count = moves.len(), "auto-moves applied");
        }
        moves
    }

    // ==================== Move enumeration ====================

    /// Build the move `from -> to` without applying it, if legal
    fn candidate(&self, from: Location, to: Location) -> Option<Move> {
        if !self.is_legal_move(from, to) {
            return None;
        }
        let cards = self.picked_cards(from)?.to_vec();
        Some(Move {
            from: self.normalized_source(from),
            to: Self::normalized_destination(to),
            cards,
            is_auto_move: false,
        })
    }

    /// Every legal move, in a fixed order: free cell to column, free cell to
    /// foundation, column top to foundation, column top to each empty free
    /// cell, then runs between columns (longest last).
    pub fn get_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();

        for cell in 0..FREE_CELL_COUNT {
            let from = Location::freecell(cell);
            moves.extend(
                (0..CASCADE_COUNT).filter_map(|col| self.candidate(from, Location::cascade(col))),
            );
        }

        for cell in 0..FREE_CELL_COUNT {
            if let Some(card) = self.state.free_cell(cell) {
                let to = Location::foundation(card.suit);
                moves.extend(self.candidate(Location::freecell(cell), to));
            }
        }

        for col in 0..CASCADE_COUNT {
            if let Some(card) = self.state.cascade_top(col) {
                let to = Location::foundation(card.suit);
                moves.extend(self.candidate(Location::cascade(col), to));
            }
        }

        for cell in (0..FREE_CELL_COUNT).filter(|&i| self.state.free_cell(i).is_none()) {
            for col in 0..CASCADE_COUNT {
                moves.extend(self.candidate(Location::cascade(col), Location::freecell(cell)));
            }
        }

        for src in 0..CASCADE_COUNT {
            let column = &self.state.cascades[src];
            if column.is_empty() {
                continue;
            }
            let lowest = run_start(column);
            for start in (lowest..column.len()).rev() {
                let from = Location::cascade_run(src, start);
                moves.extend(
                    (0..CASCADE_COUNT)
                        .filter(|&dst| dst != src)
                        .filter_map(|dst| self.candidate(from, Location::cascade(dst))),
                );
            }
        }

        moves
    }

    pub fn has_legal_moves(&self) -> bool {
        !self.get_legal_moves().is_empty()
    }

    /// No legal move left and the game is not won. This is only a report;
    /// the player can still undo.
    pub fn is_deadlocked(&self) -> bool {
        !self.state.is_won && !self.has_legal_moves()
    }
}
