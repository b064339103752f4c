use crate::helpers::*;
use rankboard::{Cursor, Options, Order};

#[test]
fn test_list_offset_and_limit() {
    for options in both_modes() {
        let board = create_seeded_board(10, options);

        let page = board.list(2, 3, Order::Desc).unwrap();
        assert_eq!(page.ids(), vec!["P2", "P3", "P4"]);
        assert_eq!(page.ranks(), vec![3, 4, 5]);
        assert_eq!(page.cursor, Cursor { begin: 2, end: 5 });
        assert_eq!(page.members[0].score, 8);
    }
}

#[test]
fn test_list_zero_limit_is_empty() {
    for options in both_modes() {
        let board = create_seeded_board(10, options);
        let page = board.list(4, 0, Order::Desc).unwrap();
        assert!(page.members.is_empty());
        assert_eq!(page.cursor, Cursor { begin: 4, end: 4 });
    }
}

#[test]
fn test_list_offset_past_end_is_empty() {
    for options in both_modes() {
        let board = create_seeded_board(10, options);
        for offset in [10, 11, usize::MAX] {
            let page = board.list(offset, 5, Order::Desc).unwrap();
            assert!(page.members.is_empty());
            assert_eq!(page.cursor, Cursor { begin: offset, end: offset });
        }
    }
}

#[test]
fn test_list_short_tail() {
    for options in both_modes() {
        let board = create_seeded_board(10, options);
        let page = board.list(8, 5, Order::Desc).unwrap();
        assert_eq!(page.ids(), vec!["P8", "P9"]);
        assert_eq!(page.cursor, Cursor { begin: 8, end: 10 });
        assert_eq!(page.cursor.len(), 2);
    }
}

#[test]
fn test_list_huge_limit() {
    let board = create_seeded_board(4, Options::positional());
    let page = board.list(1, usize::MAX, Order::Desc).unwrap();
    assert_eq!(page.ids(), vec!["P1", "P2", "P3"]);
    assert_eq!(page.cursor, Cursor { begin: 1, end: 4 });
}

#[test]
fn test_list_empty_leaderboard() {
    for options in both_modes() {
        let board = create_board(options);
        let page = board.list(0, 10, Order::Desc).unwrap();
        assert!(page.members.is_empty());
        assert_eq!(page.cursor, Cursor::default());
    }
}

#[test]
fn test_positional_ranks_are_a_permutation() {
    let count = 25;
    let board = create_board(Options::positional());
    // Many ties, so ranks must still be distinct
    for k in 0..count {
        board.upsert(&format!("m{k:02}"), (k % 3) as i64).unwrap();
    }

    let page = board.list(0, count, Order::Desc).unwrap();
    assert_eq!(page.ranks(), (1..=count).collect::<Vec<_>>());
    for member in &page.members {
        assert_eq!(board.rank(&member.id).unwrap(), member.rank);
    }
}

#[test]
fn test_list_ascending_keeps_rank_order() {
    for options in both_modes() {
        let board = create_seeded_board(10, options);
        let page = board.list(0, 3, Order::Asc).unwrap();
        assert_eq!(page.ids(), vec!["P9", "P8", "P7"]);
        // Ranks still count from the highest score
        assert_eq!(page.ranks(), vec![10, 9, 8]);
        assert_eq!(page.cursor, Cursor { begin: 0, end: 3 });
    }
}

#[test]
fn test_dense_list_with_ties() {
    let board = create_board(Options::dense());
    for (id, score) in [("a", 5), ("b", 5), ("c", 5), ("d", 3), ("e", 7)] {
        board.upsert(id, score).unwrap();
    }

    let page = board.list(0, 10, Order::Desc).unwrap();
    assert_eq!(page.ids(), vec!["e", "c", "b", "a", "d"]);
    assert_eq!(page.ranks(), vec![1, 2, 2, 2, 3]);

    let page = board.list(0, 10, Order::Asc).unwrap();
    assert_eq!(page.ids(), vec!["d", "a", "b", "c", "e"]);
    assert_eq!(page.ranks(), vec![3, 2, 2, 2, 1]);

    // A page starting mid-tie still reports the shared rank
    let page = board.list(2, 2, Order::Desc).unwrap();
    assert_eq!(page.ids(), vec!["b", "a"]);
    assert_eq!(page.ranks(), vec![2, 2]);
}

#[test]
fn test_list_ranks_agree_with_rank() {
    for options in both_modes() {
        let board = create_board(options);
        for (id, score) in [("a", 1), ("b", 4), ("c", 4), ("d", 9), ("e", 1), ("f", 0)] {
            board.upsert(id, score).unwrap();
        }
        for order in [Order::Desc, Order::Asc] {
            let page = board.list(0, 10, order).unwrap();
            for member in &page.members {
                assert_eq!(board.rank(&member.id).unwrap(), member.rank);
            }
        }
    }
}

#[test]
fn test_paging_covers_every_member_once() {
    for options in both_modes() {
        let count = 17;
        let board = create_seeded_board(count, options);
        let full = board.list(0, count, Order::Desc).unwrap();

        let mut paged = Vec::new();
        let mut offset = 0;
        loop {
            let page = board.list(offset, 5, Order::Desc).unwrap();
            if page.members.is_empty() {
                break;
            }
            offset = page.cursor.end;
            paged.extend(page.members);
        }
        assert_eq!(paged, full.members);
    }
}
