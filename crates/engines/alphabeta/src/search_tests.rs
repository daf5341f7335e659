use super::*;
use crate::eval::{back_one_ply, MATE_SCORE};
use chess_core::parse_uci_move;
use std::thread;
use std::time::Duration;

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const HANGING_QUEEN: &str = "4k3/8/8/3q4/8/8/3Q4/4K3 w - - 0 1";

fn position(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

/// Plain minimax over every legal move, no pruning, no cache.
fn minimax(pos: &mut Position, depth: u8, evaluator: &Evaluator, nodes: &mut u64) -> Score {
    *nodes += 1;
    if depth == 0 || pos.is_game_over() {
        return evaluator.evaluate(pos);
    }
    let maximizing = pos.side_to_move() == Color::White;
    let mut best = if maximizing { -INFINITY } else { INFINITY };
    for mv in pos.legal_moves() {
        pos.push(mv);
        let score = back_one_ply(minimax(pos, depth - 1, evaluator, nodes));
        pos.pop();
        best = if maximizing { best.max(score) } else { best.min(score) };
    }
    best
}

#[test]
fn test_alpha_beta_matches_minimax() {
    let config = SearchConfig::default();
    for (fen, depth) in [
        ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 3),
        ("rnbqkbnr/1pp2ppp/p2p4/4p1B1/4P3/3P4/PPP2PPP/RN1QKBNR w KQkq - 0 4", 2),
        (KIWIPETE, 2),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 1", 3),
    ] {
        let mut pos = position(fen);
        let mut naive_nodes = 0;
        let expected = minimax(&mut pos, depth, &config.evaluator(), &mut naive_nodes);

        let mut search = Search::new(&config, TimeControl::unlimited());
        let score = search.alpha_beta(&mut pos, depth, -INFINITY, INFINITY);
        assert_eq!(score, expected, "{fen} depth {depth}");
        assert!(search.nodes() <= naive_nodes, "{fen}");
        assert_eq!(pos.fen(), position(fen).fen());
    }
}

#[test]
fn test_pruning_saves_nodes() {
    let config = SearchConfig::default();
    let mut pos = Position::startpos();
    let mut naive_nodes = 0;
    minimax(&mut pos, 3, &config.evaluator(), &mut naive_nodes);

    let mut search = Search::new(&config, TimeControl::unlimited());
    search.alpha_beta(&mut pos, 3, -INFINITY, INFINITY);
    assert!(search.nodes() < naive_nodes);
}

#[test]
fn test_search_root_finds_mate_in_one() {
    let config = SearchConfig::default();
    let mut pos = position("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1");
    let moves = pos.legal_moves();

    let mut search = Search::new(&config, TimeControl::unlimited());
    let outcome = search.search_root(&mut pos, &moves, 1);
    let mate = parse_uci_move(pos.board(), "e1e8").unwrap();
    assert_eq!(outcome.best, Some((mate, MATE_SCORE - 1)));
    assert!(outcome.complete);
}

#[test]
fn test_quicker_mate_beats_an_earlier_slower_one() {
    let config = SearchConfig::default();
    let mut pos = position("6k1/5ppp/8/8/8/8/5PPP/4Q1K1 w - - 0 1");
    let mate = parse_uci_move(pos.board(), "e1e8").unwrap();
    let mut moves = pos.legal_moves();
    moves.retain(|&mv| mv != mate);
    moves.push(mate);

    let mut search = Search::new(&config, TimeControl::unlimited());
    let outcome = search.search_root(&mut pos, &moves, 3);
    assert_eq!(outcome.best, Some((mate, MATE_SCORE - 1)));
}

#[test]
fn test_root_ties_keep_the_earlier_move() {
    let config = SearchConfig::default();
    // Two rook moves mate at once, for either colour.
    for (fen, first, second, score) in [
        ("6k1/5ppp/8/8/8/8/5PPP/R3R1K1 w - - 0 1", "a1a8", "e1e8", MATE_SCORE - 1),
        ("r3r1k1/5ppp/8/8/8/8/5PPP/6K1 b - - 0 1", "a8a1", "e8e1", -(MATE_SCORE - 1)),
    ] {
        let mut pos = position(fen);
        let a = parse_uci_move(pos.board(), first).unwrap();
        let b = parse_uci_move(pos.board(), second).unwrap();

        for (order, expected) in [([a, b], a), ([b, a], b)] {
            let mut search = Search::new(&config, TimeControl::unlimited());
            let outcome = search.search_root(&mut pos, &order, 1);
            assert_eq!(outcome.best, Some((expected, score)), "{fen}");
        }
    }
}

#[test]
fn test_black_root_minimises() {
    let config = SearchConfig::default();
    // Black can take the undefended queen.
    let mut pos = position("4k3/8/8/3q4/8/8/3Q4/K7 b - - 0 1");
    let take = parse_uci_move(pos.board(), "d5d2").unwrap();
    let moves = pos.legal_moves();

    let mut search = Search::new(&config, TimeControl::unlimited());
    let outcome = search.search_root(&mut pos, &moves, 2);
    let (best, score) = outcome.best.unwrap();
    assert_eq!(best, take);
    assert!(score < -500, "{score}");
    assert!(outcome.complete);
}

#[test]
fn test_expired_clock_returns_static_eval() {
    let config = SearchConfig::default();
    let mut pos = position(KIWIPETE);
    let tc = TimeControl::start(Some(Duration::ZERO));
    thread::sleep(Duration::from_millis(2));

    let mut search = Search::new(&config, tc);
    let score = search.alpha_beta(&mut pos, 6, -INFINITY, INFINITY);
    assert_eq!(score, config.evaluator().evaluate(&pos));
    assert_eq!(search.nodes(), 1);
}

#[test]
fn test_expired_clock_still_searches_first_root_move() {
    let config = SearchConfig::default();
    let mut pos = Position::startpos();
    let moves = pos.legal_moves();
    let tc = TimeControl::start(Some(Duration::ZERO));
    thread::sleep(Duration::from_millis(2));

    let mut search = Search::new(&config, tc);
    let outcome = search.search_root(&mut pos, &moves, 4);
    assert_eq!(outcome.best.map(|(mv, _)| mv), Some(moves[0]));
    assert!(!outcome.complete);
}

#[test]
fn test_quiescence_sees_hanging_queen() {
    let mut pos = position(HANGING_QUEEN);

    let quiet = SearchConfig::default();
    let mut search = Search::new(&quiet, TimeControl::unlimited());
    assert!(search.alpha_beta(&mut pos, 0, -INFINITY, INFINITY) < 500);

    let config = SearchConfig {
        quiescence: true,
        ..SearchConfig::default()
    };
    let mut search = Search::new(&config, TimeControl::unlimited());
    assert!(search.alpha_beta(&mut pos, 0, -INFINITY, INFINITY) > 500);
    assert!(search.quiesce(&mut pos, -INFINITY, INFINITY, 0) > 500);
    assert_eq!(pos.fen(), position(HANGING_QUEEN).fen());
}

#[test]
fn test_quiescence_depth_cap() {
    let config = SearchConfig {
        quiescence: true,
        quiescence_depth: 0,
        ..SearchConfig::default()
    };
    let mut pos = position(HANGING_QUEEN);
    let mut search = Search::new(&config, TimeControl::unlimited());
    let stand_pat = search.static_eval(&pos, 0);
    assert_eq!(search.quiesce(&mut pos, -INFINITY, INFINITY, 0), stand_pat);
}

#[test]
fn test_quiet_position_stands_pat() {
    let config = SearchConfig {
        quiescence: true,
        ..SearchConfig::default()
    };
    let mut pos = Position::startpos();
    let mut search = Search::new(&config, TimeControl::unlimited());
    assert_eq!(search.quiesce(&mut pos, -INFINITY, INFINITY, 0), 200);
}

#[test]
fn test_static_eval_is_cached_per_context() {
    let config = SearchConfig::default();
    let pos = Position::startpos();
    let mut search = Search::new(&config, TimeControl::unlimited());

    let first = search.static_eval(&pos, 2);
    assert_eq!(search.static_eval(&pos, 2), first);
    assert_eq!(search.cache().hits(), 1);

    search.static_eval(&pos, 1);
    assert_eq!(search.cache().misses(), 2);
}
