/// Property-based tests for the move engine using proptest
///
/// Random walks over legal moves from random deals must never lose or
/// duplicate a card, and undoing the walk must give back the deal.
use freecell_core::{Engine, GameState, Move, Session, MAX_GAME_NUMBER};
use proptest::prelude::*;

// Strategy for a walk: a game number and a list of move picks. Each pick is
// reduced modulo the number of legal moves at that point.
fn walk_strategy() -> impl Strategy<Value = (u32, Vec<usize>)> {
    (1u32..=MAX_GAME_NUMBER, prop::collection::vec(any::<usize>(), 0..60))
}

// Apply the walk, returning every move made (auto-moves included) in order
fn play_walk(engine: &mut Engine, picks: &[usize], with_auto: bool) -> Vec<Move> {
    let mut applied = Vec::new();
    for &pick in picks {
        let moves = engine.get_legal_moves();
        if moves.is_empty() {
            break;
        }
        let mv = &moves[pick % moves.len()];
        let done = engine
            .execute_move(mv.from, mv.to)
            .expect("enumerated move is legal");
        applied.push(done);
        if with_auto {
            applied.extend(engine.auto_move_to_foundations());
        }
    }
    applied
}

proptest! {
    #[test]
    fn test_walk_conserves_cards((game, picks) in walk_strategy(), with_auto in any::<bool>()) {
        let mut engine = Engine::new(game).unwrap();
        let applied = play_walk(&mut engine, &picks, with_auto);

        prop_assert!(engine.state().check_integrity().is_ok());
        prop_assert_eq!(engine.state().move_count as usize, applied.len());
        prop_assert_eq!(engine.is_won(), engine.state().all_foundations_complete());
    }

    #[test]
    fn test_undo_reverses_walk((game, picks) in walk_strategy(), with_auto in any::<bool>()) {
        let mut engine = Engine::new(game).unwrap();
        let dealt: GameState = engine.state().clone();
        let applied = play_walk(&mut engine, &picks, with_auto);

        for mv in applied.iter().rev() {
            prop_assert!(engine.undo_move(mv).is_ok(), "undo {} -> {}", mv.from, mv.to);
        }
        prop_assert_eq!(engine.state(), &dealt);
    }

    #[test]
    fn test_legal_moves_respect_capacity((game, picks) in walk_strategy()) {
        let mut engine = Engine::new(game).unwrap();
        play_walk(&mut engine, &picks, true);

        for mv in engine.get_legal_moves() {
            let to_empty = match mv.to {
                freecell_core::Location::Cascade { index, .. } => {
                    engine.state().cascade(index).is_some_and(|c| c.is_empty())
                }
                _ => false,
            };
            prop_assert!(mv.cards.len() <= engine.calculate_max_movable(to_empty));
        }
    }

    #[test]
    fn test_session_undo_redo_roundtrip((game, picks) in walk_strategy()) {
        let mut session = Session::new(game).unwrap();
        for pick in picks.iter().take(20) {
            let moves = session.engine().get_legal_moves();
            if moves.is_empty() {
                break;
            }
            let mv = &moves[pick % moves.len()];
            session.play(mv.from, mv.to).unwrap();
        }
        let end = session.state().clone();

        while session.undo().unwrap() {}
        prop_assert_eq!(session.state(), session.initial_state());
        while session.redo().unwrap() {}
        prop_assert_eq!(session.state(), &end);
    }
}
