//! Integration tests for the board: lifecycle, ordering, and live estimates

use waitlist_core_rs::{
    BoardError, EntryStatus, EstimateStatus, Event, WaitlistBoard, WaitlistSettings,
};

const NOW: i64 = 1_700_000_000_000;
const MINUTE: i64 = 60_000;

fn ten_lane_board() -> WaitlistBoard {
    WaitlistBoard::new(
        WaitlistSettings {
            lanes_total: 10,
            play_minutes: 30,
            hold_minutes: 5,
        },
        42,
    )
    .unwrap()
}

#[test]
fn test_busy_evening_walk_through() {
    let mut board = ten_lane_board();
    let mut t = NOW;

    // Two parties walk straight onto the floor.
    let garcia = board.join("Garcia", 6, t).unwrap();
    board.start(&garcia, t).unwrap();
    let okafor = board.join("Okafor", 2, t).unwrap();
    board.start(&okafor, t).unwrap();

    // Three more join the list.
    let lee = board.join("Lee", 4, t).unwrap();
    let patel = board.join("Patel", 6, t).unwrap();
    let jones = board.join("Jones", 2, t).unwrap();

    let estimates = board.estimates(t);
    assert_eq!(estimates.len(), 3);
    // 2 lanes free: Lee (4) waits for Okafor's pair at +30... but Garcia's
    // 6 also free at +30, so Lee starts at +30 and Patel right after him
    // fits into what remains (2 + 6 + 2 free - 4 taken = 6).
    assert_eq!(estimates[&lee].projected_wait_minutes, Some(30));
    assert_eq!(estimates[&patel].projected_wait_minutes, Some(30));
    assert_eq!(estimates[&jones].projected_wait_minutes, Some(60));

    // Okafor finishes early; Garcia plays on.
    t += 12 * MINUTE;
    board.complete(&okafor, t).unwrap();

    let estimates = board.estimates(t);
    // Okafor's pair of lanes came free, so Lee's four are available now and
    // Patel inherits Garcia's lanes when they release 18 minutes from here.
    assert_eq!(estimates[&lee].projected_wait_minutes, Some(0));
    assert_eq!(estimates[&patel].projected_wait_minutes, Some(18));
    assert_eq!(estimates[&jones].projected_wait_minutes, Some(30));

    // Lee is called up and starts within the hold window.
    board.call(&lee, t).unwrap();
    t += 2 * MINUTE;
    board.start(&lee, t).unwrap();

    let entry = board.state().get_entry(&lee).unwrap();
    assert_eq!(entry.status(), EntryStatus::Playing { started_at: t });
}

#[test]
fn test_called_party_reserves_lanes_for_hold_window() {
    let mut board = ten_lane_board();

    let called = board.join("Called", 8, NOW).unwrap();
    board.call(&called, NOW).unwrap();
    let waiting = board.join("Waiting", 4, NOW).unwrap();

    let estimates = board.estimates(NOW);

    // The called party holds 8 lanes for the 5-minute window; only 2 are
    // free, so the waiting party of 4 projects to the hold expiry.
    assert_eq!(estimates.len(), 1);
    assert_eq!(estimates[&waiting].projected_wait_minutes, Some(5));
}

#[test]
fn test_requeued_party_keeps_its_spot_in_estimates() {
    let mut board = ten_lane_board();
    let playing = board.join("Playing", 10, NOW).unwrap();
    board.start(&playing, NOW).unwrap();

    let first = board.join("First", 6, NOW).unwrap();
    let second = board.join("Second", 6, NOW + 1_000).unwrap();

    // First is called but never shows; staff put them back in line.
    board.call(&first, NOW + MINUTE).unwrap();
    board.requeue(&first, NOW + 3 * MINUTE).unwrap();

    let estimates = board.estimates(NOW + 3 * MINUTE);
    let first_wait = estimates[&first].projected_wait_minutes.unwrap();
    let second_wait = estimates[&second].projected_wait_minutes.unwrap();
    assert!(first_wait < second_wait);
}

#[test]
fn test_cancel_frees_the_queue_position() {
    let mut board = ten_lane_board();
    let playing = board.join("Playing", 10, NOW).unwrap();
    board.start(&playing, NOW).unwrap();

    let head = board.join("Head", 10, NOW).unwrap();
    let tail = board.join("Tail", 10, NOW).unwrap();

    assert_eq!(board.estimates(NOW)[&tail].projected_wait_minutes, Some(60));

    board.cancel(&head, NOW).unwrap();

    let estimates = board.estimates(NOW);
    assert_eq!(estimates.len(), 1);
    assert_eq!(estimates[&tail].projected_wait_minutes, Some(30));
}

#[test]
fn test_oversize_party_is_flagged_not_hidden() {
    let mut board = ten_lane_board();
    let big = board.join("Big", 12, NOW).unwrap();
    let small = board.join("Small", 2, NOW).unwrap();

    let estimates = board.estimates(NOW);

    assert_eq!(estimates[&big].status, EstimateStatus::ExceedsCapacity);
    assert_eq!(estimates[&small].projected_wait_minutes, Some(0));
}

#[test]
fn test_event_log_tells_the_entry_story() {
    let mut board = ten_lane_board();
    let id = board.join("Garcia", 2, NOW).unwrap();
    board.call(&id, NOW + MINUTE).unwrap();
    board.requeue(&id, NOW + 2 * MINUTE).unwrap();
    board.call(&id, NOW + 3 * MINUTE).unwrap();
    board.start(&id, NOW + 4 * MINUTE).unwrap();
    board.complete(&id, NOW + 40 * MINUTE).unwrap();

    let story = board.events().events_for_entry(&id);
    assert_eq!(story.len(), 6);
    assert!(matches!(story[0], Event::Joined { .. }));
    assert!(matches!(story[2], Event::Requeued { .. }));
    assert!(matches!(story[5], Event::Completed { .. }));

    // Timestamps never run backwards within one entry's story.
    let times: Vec<i64> = story.iter().map(|e| e.at()).collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_estimates_poll_is_read_only() {
    let mut board = ten_lane_board();
    let a = board.join("A", 3, NOW).unwrap();
    board.join("B", 5, NOW).unwrap();

    let events_before = board.events().len();
    let keys_before: Vec<Option<f64>> = {
        let mut keys: Vec<Option<f64>> = board
            .state()
            .entries()
            .values()
            .map(|e| e.order_key())
            .collect();
        keys.sort_by(|x, y| x.partial_cmp(y).unwrap());
        keys
    };

    for _ in 0..5 {
        board.estimates(NOW);
    }

    let keys_after: Vec<Option<f64>> = {
        let mut keys: Vec<Option<f64>> = board
            .state()
            .entries()
            .values()
            .map(|e| e.order_key())
            .collect();
        keys.sort_by(|x, y| x.partial_cmp(y).unwrap());
        keys
    };

    assert_eq!(board.events().len(), events_before);
    assert_eq!(keys_before, keys_after);
    assert!(board.state().get_entry(&a).unwrap().is_waiting());
}

#[test]
fn test_done_party_cannot_be_resurrected() {
    let mut board = ten_lane_board();
    let id = board.join("Garcia", 2, NOW).unwrap();
    board.start(&id, NOW).unwrap();
    board.complete(&id, NOW + MINUTE).unwrap();

    for result in [
        board.call(&id, NOW + 2 * MINUTE),
        board.start(&id, NOW + 2 * MINUTE),
        board.cancel(&id, NOW + 2 * MINUTE),
        board.requeue(&id, NOW + 2 * MINUTE),
    ] {
        assert!(matches!(result, Err(BoardError::InvalidTransition { .. })));
    }
}
