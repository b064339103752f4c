use std::sync::Arc;

use crate::helpers::*;
use rankboard::{Leaderboard, Options, Order};

fn flaky_board(options: Options) -> (Arc<FlakyStore>, Leaderboard) {
    let store = Arc::new(FlakyStore::new());
    let board = Leaderboard::new(store.clone(), BOARD, options).unwrap();
    (store, board)
}

#[test]
fn test_unavailable_store_propagates() {
    for options in both_modes() {
        let (store, board) = flaky_board(options);
        board.upsert("a", 1).unwrap();

        store.fail_next(Fault::Unavailable);
        let err = board.upsert("b", 2).unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.is_retryable());
        assert!(err.is_backend_error());
        assert_eq!(err.module(), "backend");

        store.fail_next(Fault::Unavailable);
        assert!(board.rank("a").unwrap_err().is_unavailable());

        store.fail_next(Fault::Unavailable);
        assert!(board.list(0, 10, Order::Desc).unwrap_err().is_unavailable());

        store.fail_next(Fault::Unavailable);
        assert!(board.window("a", 3, Order::Desc).unwrap_err().is_unavailable());

        store.fail_next(Fault::Unavailable);
        assert!(board.clear().unwrap_err().is_unavailable());

        // Nothing was lost along the way
        assert_eq!(board.len().unwrap(), 1);
        assert_eq!(board.score("b").unwrap(), None);
    }
}

#[test]
fn test_conflicted_upsert_changes_nothing() {
    let (store, board) = flaky_board(Options::dense());
    board.upsert("a", 10).unwrap();
    board.upsert("b", 20).unwrap();
    let before = board.list(0, 10, Order::Desc).unwrap();

    // Would move "a" off 10 and reclaim it from the Rank Index
    store.fail_next(Fault::ConflictAfterWrites);
    let err = board.upsert("a", 30).unwrap_err();
    assert!(err.is_conflict());
    assert!(err.is_retryable());

    assert_eq!(board.list(0, 10, Order::Desc).unwrap(), before);
    assert_eq!(board.distinct_scores().unwrap(), 2);
    assert_eq!(board.score("a").unwrap(), Some(10));
}

#[test]
fn test_retry_after_conflict_succeeds() {
    let (store, board) = flaky_board(Options::dense());
    board.upsert("a", 10).unwrap();

    store.fail_next(Fault::ConflictAfterWrites);
    let mut attempts = 0;
    loop {
        attempts += 1;
        match board.upsert("a", 30) {
            Ok(()) => break,
            Err(err) if err.is_retryable() && attempts < 3 => continue,
            Err(err) => panic!("upsert failed: {err}"),
        }
    }

    assert_eq!(attempts, 2);
    assert_eq!(board.rank("a").unwrap(), 1);
    assert_eq!(board.distinct_scores().unwrap(), 1);
}

#[test]
fn test_conflicted_clear_keeps_members() {
    for options in both_modes() {
        let (store, board) = flaky_board(options);
        board.upsert("a", 1).unwrap();

        store.fail_next(Fault::ConflictAfterWrites);
        assert!(board.clear().unwrap_err().is_conflict());
        assert_eq!(board.rank("a").unwrap(), 1);
    }
}

#[test]
fn test_invalid_names() {
    let store = create_test_store();
    for name in ["", "a:b", ":"] {
        let err = Leaderboard::new(store.clone(), name, Options::default()).unwrap_err();
        assert!(err.is_validation_error(), "{name:?}");
        assert_eq!(err.module(), "leaderboard");
    }
    assert!(Leaderboard::new(store, "season-7 finals", Options::default()).is_ok());
}

#[test]
fn test_error_messages_name_the_member() {
    let board = create_board(Options::positional());
    let err = board.rank("ghost").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("ghost"), "{message}");
    assert!(message.contains(BOARD), "{message}");
}
