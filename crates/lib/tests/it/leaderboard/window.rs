use crate::helpers::*;
use rankboard::{Cursor, Options, Order};

#[test]
fn test_window_centers_on_member() {
    for options in both_modes() {
        let board = create_seeded_board(10, options);
        let page = board.window("P4", 6, Order::Desc).unwrap();

        assert_eq!(page.ids(), vec!["P1", "P2", "P3", "P4", "P5", "P6"]);
        assert_eq!(page.members[3].id, "P4");
        assert_eq!(page.ranks(), vec![2, 3, 4, 5, 6, 7]);
        assert_eq!(page.cursor, Cursor { begin: 1, end: 7 });
    }
}

#[test]
fn test_window_at_top_slides_down() {
    for options in both_modes() {
        let board = create_seeded_board(10, options);
        let page = board.window("P0", 6, Order::Desc).unwrap();
        assert_eq!(page.ids(), vec!["P0", "P1", "P2", "P3", "P4", "P5"]);
        assert_eq!(page.cursor, Cursor { begin: 0, end: 6 });
    }
}

#[test]
fn test_window_at_bottom_slides_up() {
    for options in both_modes() {
        let board = create_seeded_board(10, options);
        let page = board.window("P9", 6, Order::Desc).unwrap();
        assert_eq!(page.ids(), vec!["P4", "P5", "P6", "P7", "P8", "P9"]);
        assert_eq!(page.cursor, Cursor { begin: 4, end: 10 });
    }
}

#[test]
fn test_window_of_one() {
    for options in both_modes() {
        let board = create_seeded_board(10, options);
        let page = board.window("P7", 1, Order::Desc).unwrap();
        assert_eq!(page.ids(), vec!["P7"]);
        assert_eq!(page.ranks(), vec![8]);
        assert_eq!(page.cursor, Cursor { begin: 7, end: 8 });
    }
}

#[test]
fn test_window_larger_than_population() {
    for options in both_modes() {
        let board = create_seeded_board(3, options);
        let page = board.window("P1", 10, Order::Desc).unwrap();
        assert_eq!(page.ids(), vec!["P0", "P1", "P2"]);
        assert_eq!(page.cursor, Cursor { begin: 0, end: 3 });
    }
}

#[test]
fn test_window_zero_limit() {
    let board = create_seeded_board(10, Options::positional());
    let page = board.window("P4", 0, Order::Desc).unwrap();
    assert!(page.members.is_empty());
    assert!(page.cursor.is_empty());
}

#[test]
fn test_window_ascending() {
    for options in both_modes() {
        let board = create_seeded_board(10, options);
        // Ascending positions: P9 at 0 .. P0 at 9, so P4 sits at 5
        let page = board.window("P4", 4, Order::Asc).unwrap();
        assert_eq!(page.ids(), vec!["P6", "P5", "P4", "P3"]);
        assert_eq!(page.ranks(), vec![7, 6, 5, 4]);
        assert_eq!(page.cursor, Cursor { begin: 3, end: 7 });
    }
}

#[test]
fn test_window_dense_ties() {
    let board = create_board(Options::dense());
    for (id, score) in [("a", 9), ("b", 5), ("c", 5), ("d", 5), ("e", 1)] {
        board.upsert(id, score).unwrap();
    }
    let page = board.window("c", 3, Order::Desc).unwrap();
    assert_eq!(page.ids(), vec!["d", "c", "b"]);
    assert_eq!(page.ranks(), vec![2, 2, 2]);
}

#[test]
fn test_window_unknown_member() {
    for options in both_modes() {
        let board = create_seeded_board(5, options);
        let err = board.window("nobody", 3, Order::Desc).unwrap_err();
        assert!(err.is_not_found());
    }
}
