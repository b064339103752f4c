use std::thread;

use crate::helpers::*;
use rankboard::{Leaderboard, Options, Order};

#[test]
fn test_concurrent_dense_upserts_keep_rank_index_consistent() {
    let store = create_test_store();
    let board = Leaderboard::new(store.clone(), BOARD, Options::dense()).unwrap();
    let threads = 8;
    let rounds = 250;

    // Threads fight over a handful of members and scores, so a score is
    // often abandoned by one thread while another is taking it.
    thread::scope(|scope| {
        for t in 0..threads {
            let board = board.clone();
            scope.spawn(move || {
                for round in 0..rounds {
                    let member = format!("m{}", (t + round) % 6);
                    let score = ((t * 7 + round * 3) % 5) as i64;
                    board.upsert(&member, score).unwrap();
                }
            });
        }
    });

    assert_rank_index_consistent(&*store, BOARD);
    assert_eq!(board.len().unwrap(), 6);
}

#[test]
fn test_readers_see_consistent_pages_during_writes() {
    let board = create_seeded_board(20, Options::dense());

    thread::scope(|scope| {
        let writer = board.clone();
        scope.spawn(move || {
            for round in 0..500 {
                let member = format!("P{}", round % 20);
                writer.upsert(&member, (round % 7) as i64).unwrap();
            }
        });

        for _ in 0..4 {
            let reader = board.clone();
            scope.spawn(move || {
                for _ in 0..200 {
                    let page = reader.list(0, 20, Order::Desc).unwrap();
                    assert_eq!(page.members.len(), 20);
                    // Dense ranks on a snapshot start at 1 and never skip
                    let mut expected = 1;
                    for pair in page.members.windows(2) {
                        if pair[1].score != pair[0].score {
                            expected += 1;
                        }
                        assert_eq!(pair[1].rank, expected);
                    }
                    assert_eq!(page.members[0].rank, 1);
                }
            });
        }
    });
}

#[test]
fn test_concurrent_positional_upserts() {
    let board = create_board(Options::positional());
    let threads = 4;
    let per_thread = 100;

    thread::scope(|scope| {
        for t in 0..threads {
            let board = board.clone();
            scope.spawn(move || {
                for i in 0..per_thread {
                    board.upsert(&format!("t{t}-{i}"), i as i64).unwrap();
                }
            });
        }
    });

    let total = threads * per_thread;
    assert_eq!(board.len().unwrap(), total);
    let page = board.list(0, total, Order::Desc).unwrap();
    assert_eq!(page.ranks(), (1..=total).collect::<Vec<_>>());
}
