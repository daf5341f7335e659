use super::*;

fn position(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

fn after(moves: &[&str]) -> Position {
    let mut pos = Position::startpos();
    for token in moves {
        pos.apply_uci(token).unwrap();
    }
    pos
}

#[test]
fn test_startpos_terms() {
    let eval = breakdown(&Position::startpos());
    assert_eq!(eval.terminal, None);
    assert_eq!(eval.material, 0);
    assert_eq!(eval.positional, 0);
    assert_eq!(eval.pawn_structure, 0);
    assert_eq!(eval.repetition, 0);
    // 20 legal moves, White to move.
    assert_eq!(eval.mobility, 200);
    assert_eq!(eval.total(), 200);
}

#[test]
fn test_mobility_follows_side_to_move() {
    let black = position("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
    let eval = Evaluator::default().breakdown(&black);
    assert_eq!(eval.mobility, -200);
    assert_eq!(evaluate(&black), -200);
}

#[test]
fn test_evaluate_is_deterministic() {
    let pos = position("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let first = evaluate(&pos);
    for _ in 0..3 {
        assert_eq!(evaluate(&pos), first);
    }
}

#[test]
fn test_total_is_sum_of_terms() {
    let pos = position("rnbqkbnr/1pp2ppp/p2p4/4p1B1/4P3/3P4/PPP2PPP/RN1QKBNR w KQkq - 0 4");
    let eval = breakdown(&pos);
    assert_eq!(
        eval.total(),
        eval.material + eval.positional + eval.mobility + eval.pawn_structure + eval.repetition
    );
    assert_eq!(eval.total(), evaluate(&pos));
}

#[test]
fn test_checkmate_scores_against_the_mated_side() {
    let black_mated =
        position("r1bqkbnr/pppp1Qpp/2n5/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
    assert_eq!(evaluate(&black_mated), MATE_SCORE);

    // Fool's mate.
    let white_mated =
        position("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    assert_eq!(evaluate(&white_mated), -MATE_SCORE);
}

#[test]
fn test_stalemate_and_dead_draws_are_zero() {
    let stalemate = position("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert!(stalemate.is_stalemate());
    assert_eq!(breakdown(&stalemate).terminal, Some(0));

    let bare_kings = position("8/8/4k3/8/8/3K4/8/8 w - - 0 1");
    assert_eq!(evaluate(&bare_kings), 0);

    let lone_bishop = position("8/8/4k3/8/8/3KB3/8/8 w - - 0 1");
    assert_eq!(evaluate(&lone_bishop), 0);
}

#[test]
fn test_material_counts_both_sides() {
    // White is a queen up.
    let pos = position("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    assert_eq!(material(pos.board()), 900);
    assert_eq!(material_value(Piece::Queen) - material_value(Piece::Bishop), 570);
    assert_eq!(material_value(Piece::King), 0);
}

#[test]
fn test_doubled_isolated_and_blocked_pawns() {
    let pos = position("4k3/8/8/8/8/4P3/4P3/4K3 w - - 0 1");
    let white = pawn_structure(pos.board(), Color::White);
    assert_eq!(
        white,
        PawnWeaknesses {
            doubled: 1,
            isolated: 2,
            blocked: 1,
        }
    );
    assert_eq!(pawn_structure(pos.board(), Color::Black).total(), 0);
    assert_eq!(breakdown(&pos).pawn_structure, -PAWN_STRUCTURE_WEIGHT * 4);
}

#[test]
fn test_rammed_pawns_cancel_out() {
    let pos = position("4k3/8/8/4p3/4P3/8/8/4K3 w - - 0 1");
    let white = pawn_structure(pos.board(), Color::White);
    let black = pawn_structure(pos.board(), Color::Black);
    assert_eq!(white.blocked, 1);
    assert_eq!(black.blocked, 1);
    assert_eq!(white, black);
    assert_eq!(breakdown(&pos).pawn_structure, 0);
}

#[test]
fn test_connected_pawns_are_not_isolated() {
    let pos = position("4k3/8/8/8/8/8/3PP3/4K3 w - - 0 1");
    assert_eq!(pawn_structure(pos.board(), Color::White).isolated, 0);
}

#[test]
fn test_repetition_penalises_the_side_that_repeated() {
    let fresh = breakdown(&Position::startpos());

    // Black's Ng8 returns to the start position.
    let repeated = breakdown(&after(&["g1f3", "g8f6", "f3g1", "f6g8"]));
    assert_eq!(repeated.repetition, DEFAULT_REPETITION_PENALTY);
    assert_eq!(repeated.total(), fresh.total() + DEFAULT_REPETITION_PENALTY);

    // White's Nf3 returns to the position after 1.Nf3.
    let repeated = breakdown(&after(&["g1f3", "g8f6", "f3g1", "f6g8", "g1f3"]));
    assert_eq!(repeated.repetition, -DEFAULT_REPETITION_PENALTY);
}

#[test]
fn test_repetition_penalty_is_tunable() {
    let pos = after(&["g1f3", "g8f6", "f3g1", "f6g8"]);
    let off = Evaluator {
        repetition_penalty: 0,
    };
    let heavy = Evaluator {
        repetition_penalty: 300,
    };
    assert_eq!(off.breakdown(&pos).repetition, 0);
    assert_eq!(heavy.evaluate(&pos) - off.evaluate(&pos), 300);
}

#[test]
fn test_mate_distance_helpers() {
    assert!(is_mate_score(MATE_SCORE));
    assert!(is_mate_score(-(MATE_SCORE - 5)));
    assert!(!is_mate_score(900));
    assert!(!is_mate_score(INFINITY));

    assert_eq!(back_one_ply(MATE_SCORE), MATE_SCORE - 1);
    assert_eq!(back_one_ply(-MATE_SCORE), -(MATE_SCORE - 1));
    assert_eq!(back_one_ply(-250), -250);
    assert_eq!(forward_one_ply(back_one_ply(MATE_SCORE - 2)), MATE_SCORE - 2);
    assert_eq!(forward_one_ply(INFINITY), INFINITY);

    assert_eq!(mate_in_moves(MATE_SCORE - 1), Some(1));
    assert_eq!(mate_in_moves(MATE_SCORE - 3), Some(2));
    assert_eq!(mate_in_moves(-(MATE_SCORE - 2)), Some(-1));
    assert_eq!(mate_in_moves(35), None);
}
