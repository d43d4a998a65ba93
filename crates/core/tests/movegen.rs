#[cfg(test)]
mod movegen {
    use cheddah_core::{
        game::{Board, Piece, PieceKind, Side, Square},
        movegen::{candidate_squares, destinations, BasicRules},
        util::SquareSet,
        MoveGenerator,
    };
    use paste::paste;
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn squares(list: &[&str]) -> SquareSet {
        list.iter().map(|s| sq(s)).collect()
    }

    fn names(set: SquareSet) -> Vec<String> {
        set.iter().map(|s| s.to_string()).collect()
    }

    fn lone(kind: PieceKind, side: Side, at: &str) -> (Board, Piece) {
        let mut board = Board::empty();
        let piece = Piece::new(kind, side);
        board.put(sq(at), piece);
        (board, piece)
    }

    fn moves_of(board: &Board, at: &str) -> Vec<String> {
        let piece = board[sq(at)].unwrap();
        names(candidate_squares(board, sq(at), piece))
    }

    macro_rules! stays_on_board {
        ($kind:ident) => {
            paste! {
                #[test]
                fn [<$kind:snake _stays_on_board>]() {
                    for side in [Side::White, Side::Black] {
                        for row in 0..8 {
                            for column in 0..8 {
                                let from = Square::new(column, row);
                                let mut board = Board::empty();
                                let piece = Piece::new(PieceKind::$kind, side);
                                board.put(from, piece);

                                let set = candidate_squares(&board, from, piece);
                                assert!(!set.contains(from), "{piece} on {from} may stay put");
                                for dest in destinations(&board, from, piece) {
                                    assert!(dest.is_valid(), "{piece} on {from} reaches {dest:?}");
                                }
                            }
                        }
                    }
                }
            }
        };
    }

    macro_rules! empty_board_count {
        ($kind:ident, $from:ident, $count:expr) => {
            paste! {
                #[test]
                fn [<$kind:snake _from_ $from:lower _count>]() {
                    let from = stringify!($from);
                    let (board, piece) = lone(PieceKind::$kind, Side::White, from);
                    assert_eq!(candidate_squares(&board, sq(from), piece).len(), $count);
                }
            }
        };
    }

    stays_on_board!(Pawn);
    stays_on_board!(Rook);
    stays_on_board!(Knight);
    stays_on_board!(Bishop);
    stays_on_board!(Queen);
    stays_on_board!(King);

    empty_board_count!(Rook, D4, 14);
    empty_board_count!(Rook, A1, 14);
    empty_board_count!(Bishop, D4, 13);
    empty_board_count!(Bishop, A1, 7);
    empty_board_count!(Queen, D4, 27);
    empty_board_count!(Queen, H8, 21);
    empty_board_count!(Knight, D4, 8);
    empty_board_count!(Knight, A1, 2);
    empty_board_count!(King, D4, 8);
    empty_board_count!(King, H1, 3);

    #[test]
    fn knight_from_d4() {
        let (board, _) = lone(PieceKind::Knight, Side::White, "D4");
        assert_eq!(
            moves_of(&board, "D4"),
            names(squares(&["B3", "B5", "C2", "C6", "E2", "E6", "F3", "F5"]))
        );
    }

    #[test]
    fn rook_from_a1() {
        let (board, _) = lone(PieceKind::Rook, Side::White, "A1");
        assert_eq!(
            moves_of(&board, "A1"),
            names(squares(&[
                "A2", "A3", "A4", "A5", "A6", "A7", "A8", "B1", "C1", "D1", "E1", "F1", "G1", "H1",
            ]))
        );
    }

    #[test]
    fn rook_stops_on_enemy() {
        let (mut board, _) = lone(PieceKind::Rook, Side::White, "A1");
        board.put(sq("A4"), Piece::new(PieceKind::Pawn, Side::Black));
        assert_eq!(
            moves_of(&board, "A1"),
            names(squares(&[
                "A2", "A3", "A4", "B1", "C1", "D1", "E1", "F1", "G1", "H1",
            ]))
        );
    }

    #[test]
    fn rook_stops_before_own_piece() {
        let (mut board, _) = lone(PieceKind::Rook, Side::White, "A1");
        board.put(sq("A4"), Piece::new(PieceKind::Pawn, Side::White));
        assert_eq!(
            moves_of(&board, "A1"),
            names(squares(&["A2", "A3", "B1", "C1", "D1", "E1", "F1", "G1", "H1"]))
        );
    }

    #[test]
    fn bishop_from_d4() {
        let (board, _) = lone(PieceKind::Bishop, Side::Black, "D4");
        assert_eq!(
            moves_of(&board, "D4"),
            names(squares(&[
                "A1", "B2", "C3", "E5", "F6", "G7", "H8", "A7", "B6", "C5", "E3", "F2", "G1",
            ]))
        );
    }

    #[test]
    fn bishop_blocked_on_every_diagonal() {
        let (mut board, _) = lone(PieceKind::Bishop, Side::White, "D4");
        board.put(sq("C3"), Piece::new(PieceKind::Pawn, Side::White));
        board.put(sq("F6"), Piece::new(PieceKind::Knight, Side::Black));
        board.put(sq("B6"), Piece::new(PieceKind::Rook, Side::Black));
        board.put(sq("E3"), Piece::new(PieceKind::Queen, Side::White));
        assert_eq!(moves_of(&board, "D4"), names(squares(&["E5", "F6", "C5", "B6"])));
    }

    #[test]
    fn queen_is_rook_and_bishop() {
        let mut board = Board::empty();
        board.put(sq("E4"), Piece::new(PieceKind::Queen, Side::White));
        board.put(sq("E6"), Piece::new(PieceKind::Pawn, Side::Black));
        board.put(sq("G6"), Piece::new(PieceKind::Pawn, Side::White));

        let queen = moves_of(&board, "E4");

        let mut rook_board = board.clone();
        rook_board.put(sq("E4"), Piece::new(PieceKind::Rook, Side::White));
        let mut bishop_board = board.clone();
        bishop_board.put(sq("E4"), Piece::new(PieceKind::Bishop, Side::White));

        let rook = candidate_squares(&rook_board, sq("E4"), rook_board[sq("E4")].unwrap());
        let bishop = candidate_squares(&bishop_board, sq("E4"), bishop_board[sq("E4")].unwrap());
        assert_eq!(queen, names(rook.union(bishop)));
        assert!(queen.contains(&"E6".to_string()));
        assert!(!queen.contains(&"E7".to_string()));
        assert!(!queen.contains(&"G6".to_string()));
    }

    #[test]
    fn king_from_d4() {
        let (board, _) = lone(PieceKind::King, Side::White, "D4");
        assert_eq!(
            moves_of(&board, "D4"),
            names(squares(&["C3", "C4", "C5", "D3", "D5", "E3", "E4", "E5"]))
        );
    }

    #[test]
    fn king_may_not_take_own_piece() {
        let (mut board, _) = lone(PieceKind::King, Side::Black, "E8");
        board.put(sq("D8"), Piece::new(PieceKind::Queen, Side::Black));
        board.put(sq("F7"), Piece::new(PieceKind::Pawn, Side::White));
        assert_eq!(moves_of(&board, "E8"), names(squares(&["D7", "E7", "F7", "F8"])));
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let board = Board::starting();
        assert_eq!(moves_of(&board, "B1"), names(squares(&["A3", "C3"])));
        assert_eq!(moves_of(&board, "G8"), names(squares(&["F6", "H6"])));
    }

    #[test]
    fn sliders_are_boxed_in_at_the_start() {
        let board = Board::starting();
        for at in ["A1", "C1", "D1", "E1", "H8", "F8", "D8"] {
            assert_eq!(moves_of(&board, at), Vec::<String>::new(), "{at}");
        }
    }

    #[test]
    fn white_pawn_first_move() {
        let (board, _) = lone(PieceKind::Pawn, Side::White, "E2");
        assert_eq!(moves_of(&board, "E2"), names(squares(&["E3", "E4"])));
    }

    #[test]
    fn black_pawn_first_move() {
        let (board, _) = lone(PieceKind::Pawn, Side::Black, "E7");
        assert_eq!(moves_of(&board, "E7"), names(squares(&["E6", "E5"])));
    }

    #[test]
    fn moved_pawn_steps_once() {
        let mut board = Board::empty();
        board.put(sq("E3"), Piece::new(PieceKind::Pawn, Side::White).moved());
        assert_eq!(moves_of(&board, "E3"), names(squares(&["E4"])));
    }

    #[test]
    fn pawn_captures_diagonally() {
        let mut board = Board::empty();
        board.put(sq("E4"), Piece::new(PieceKind::Pawn, Side::White).moved());
        board.put(sq("D5"), Piece::new(PieceKind::Knight, Side::Black));
        board.put(sq("F5"), Piece::new(PieceKind::Bishop, Side::Black));
        assert_eq!(moves_of(&board, "E4"), names(squares(&["E5", "D5", "F5"])));
    }

    #[test]
    fn pawn_does_not_capture_forward_or_own_pieces() {
        let mut board = Board::empty();
        board.put(sq("E4"), Piece::new(PieceKind::Pawn, Side::White).moved());
        board.put(sq("E5"), Piece::new(PieceKind::Pawn, Side::Black));
        board.put(sq("D5"), Piece::new(PieceKind::Pawn, Side::White));
        assert_eq!(moves_of(&board, "E4"), Vec::<String>::new());
    }

    #[test]
    fn pawn_never_moves_backwards() {
        let mut board = Board::empty();
        board.put(sq("D5"), Piece::new(PieceKind::Pawn, Side::Black).moved());
        board.put(sq("C6"), Piece::new(PieceKind::Rook, Side::White));
        board.put(sq("E4"), Piece::new(PieceKind::Rook, Side::White));
        assert_eq!(moves_of(&board, "D5"), names(squares(&["D4", "E4"])));
    }

    #[test]
    fn pawn_double_step_needs_both_squares_empty() {
        let mut board = Board::empty();
        board.put(sq("E2"), Piece::new(PieceKind::Pawn, Side::White));
        board.put(sq("E3"), Piece::new(PieceKind::Knight, Side::Black));
        assert_eq!(moves_of(&board, "E2"), Vec::<String>::new());

        board.take(sq("E3"));
        board.put(sq("E4"), Piece::new(PieceKind::Knight, Side::Black));
        assert_eq!(moves_of(&board, "E2"), names(squares(&["E3"])));
    }

    #[test]
    fn pawn_on_last_row_is_stuck() {
        let (board, _) = lone(PieceKind::Pawn, Side::White, "C8");
        assert_eq!(moves_of(&board, "C8"), Vec::<String>::new());
    }

    #[test]
    fn same_inputs_same_squares() {
        let board = Board::from_placement("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R").unwrap();
        let before = board.clone();

        for (from, piece) in board.pieces() {
            let first = candidate_squares(&board, from, piece);
            let second = candidate_squares(&board, from, piece);
            assert_eq!(first, second, "{piece} on {from}");
        }

        assert_eq!(board, before);
    }

    #[test]
    fn destinations_are_unique_and_restartable() {
        let board = Board::starting();
        let (from, piece) = (sq("G1"), board[sq("G1")].unwrap());

        let mut lazy = destinations(&board, from, piece);
        let replay = lazy.clone();
        let first = lazy.by_ref().collect::<Vec<_>>();
        assert_eq!(lazy.next(), None);

        lazy.rewind();
        assert_eq!(lazy.collect::<Vec<_>>(), first);
        assert_eq!(replay.collect::<Vec<_>>(), first);

        let queen_board = Board::from_placement("8/8/8/8/3Q4/8/8/8").unwrap();
        let queen = queen_board[sq("D4")].unwrap();
        let all = destinations(&queen_board, sq("D4"), queen).collect::<Vec<_>>();
        assert_eq!(all.len(), candidate_squares(&queen_board, sq("D4"), queen).len());
    }

    #[test]
    #[should_panic(expected = "is not standing on D4")]
    fn piece_missing_from_its_square() {
        let rook = Piece::new(PieceKind::Rook, Side::White);
        candidate_squares(&Board::empty(), sq("D4"), rook);
    }

    #[test]
    #[should_panic(expected = "is not standing on D4")]
    fn piece_does_not_match_its_square() {
        let (board, _) = lone(PieceKind::Rook, Side::Black, "D4");
        candidate_squares(&board, sq("D4"), Piece::new(PieceKind::Rook, Side::White));
    }

    #[test]
    #[should_panic(expected = "is not standing on E2")]
    fn moved_flag_must_match_the_board() {
        let (board, piece) = lone(PieceKind::Pawn, Side::White, "E2");
        candidate_squares(&board, sq("E2"), piece.moved());
    }

    #[test]
    fn square_set_indexing() {
        let (board, piece) = lone(PieceKind::Knight, Side::White, "A1");
        let set = candidate_squares(&board, sq("A1"), piece);

        assert!(set[sq("B3")]);
        assert!(set[sq("C2")]);
        assert!(!set[sq("A1")]);
        assert!(!set[sq("H8")]);
        assert_eq!(set.iter().filter(|&s| set[s]).count(), set.len());
    }

    #[test]
    fn basic_rules_match_free_function() {
        let board = Board::starting();
        for (from, piece) in board.pieces() {
            assert_eq!(
                BasicRules.candidate_squares(&board, from, piece),
                candidate_squares(&board, from, piece)
            );
        }
    }

    #[test]
    fn shared_board_across_threads() {
        let board = Board::starting();
        let expected = board
            .pieces()
            .map(|(from, piece)| candidate_squares(&board, from, piece))
            .collect::<Vec<_>>();

        std::thread::scope(|s| {
            let handles = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        board
                            .pieces()
                            .map(|(from, piece)| candidate_squares(&board, from, piece))
                            .collect::<Vec<_>>()
                    })
                })
                .collect::<Vec<_>>();

            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
