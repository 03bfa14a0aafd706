use coversync_core::models::cover::MovementStatus;
use coversync_core::services::{Direction, MoveOutcome};
use coversync_core::store::{AttributeStore, CURRENT_POSITION, TARGET_POSITION};

mod common;
use common::{TestBridge, seconds, settle};

#[tokio::test(start_paused = true)]
async fn test_full_close_reaches_endpoint_without_stop() {
    let bridge = TestBridge::new(&[("Device1", 2)]);
    let cover = bridge.add_cover_at("Device1", 0);

    assert_eq!(cover.move_to(10000), MoveOutcome::Started(Direction::Closing));
    settle().await;

    assert_eq!(bridge.commands("Device1"), vec!["close"]);
    assert_eq!(bridge.movement_status("Device1"), MovementStatus::Closing);
    assert_eq!(bridge.target("Device1"), Some(10000));
    assert!(cover.has_active_timer());

    seconds(1).await;
    assert_eq!(bridge.current("Device1"), Some(5000));
    assert_eq!(cover.status(), MovementStatus::Closing);

    seconds(1).await;
    assert_eq!(bridge.current("Device1"), Some(10000));
    assert_eq!(bridge.target("Device1"), Some(10000));
    assert_eq!(bridge.movement_status("Device1"), MovementStatus::Stopped);
    assert_eq!(cover.status(), MovementStatus::Stopped);
    assert!(!cover.has_active_timer());

    // Endpoints stop by themselves.
    assert_eq!(bridge.commands("Device1"), vec!["close"]);
}

#[tokio::test(start_paused = true)]
async fn test_full_open_from_closed() {
    let bridge = TestBridge::new(&[("Device1", 2)]);
    let cover = bridge.add_cover_at("Device1", 10000);

    assert_eq!(cover.move_to(0), MoveOutcome::Started(Direction::Opening));
    assert_eq!(cover.status(), MovementStatus::Opening);

    seconds(3).await;

    assert_eq!(bridge.current("Device1"), Some(0));
    assert_eq!(cover.status(), MovementStatus::Stopped);
    assert_eq!(bridge.commands("Device1"), vec!["open"]);
}

#[tokio::test(start_paused = true)]
async fn test_partial_move_sends_stop_on_arrival() {
    let bridge = TestBridge::new(&[("Device1", 10)]);
    let cover = bridge.add_cover_at("Device1", 0);

    cover.move_to(5000);
    settle().await;

    for expected in [1000, 2000, 3000, 4000] {
        seconds(1).await;
        assert_eq!(bridge.current("Device1"), Some(expected));
    }

    seconds(1).await;
    assert_eq!(bridge.current("Device1"), Some(5000));
    assert_eq!(cover.status(), MovementStatus::Stopped);

    let sent = bridge.driver.sent();
    assert_eq!(bridge.commands("Device1"), vec!["close", "stop"]);
    assert!(!sent[0].high_priority);
    assert!(sent[1].high_priority);
}

#[tokio::test(start_paused = true)]
async fn test_move_to_current_position_is_noop() {
    let bridge = TestBridge::new(&[]);
    let cover = bridge.add_cover_at("Device1", 4200);

    assert_eq!(cover.move_to(4200), MoveOutcome::AlreadyThere);
    settle().await;

    assert!(!cover.has_active_timer());
    assert_eq!(cover.status(), MovementStatus::Stopped);
    assert_eq!(bridge.target("Device1"), Some(4200));
    assert!(bridge.driver.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_second_request_freezes_instead_of_redirecting() {
    let bridge = TestBridge::new(&[]);
    let cover = bridge.add_cover_at("Device1", 3000);

    assert_eq!(cover.move_to(7000), MoveOutcome::Started(Direction::Closing));
    assert_eq!(cover.move_to(1000), MoveOutcome::Interrupted { at: 3000 });
    settle().await;

    assert_eq!(cover.status(), MovementStatus::Stopped);
    assert!(!cover.has_active_timer());
    assert_eq!(bridge.current("Device1"), Some(3000));
    assert_eq!(bridge.target("Device1"), Some(3000));
    assert_eq!(bridge.commands("Device1"), vec!["close", "stop"]);

    seconds(5).await;
    assert_eq!(bridge.current("Device1"), Some(3000));
    assert_eq!(bridge.commands("Device1"), vec!["close", "stop"]);
}

#[tokio::test(start_paused = true)]
async fn test_interruption_mid_travel_keeps_reached_position() {
    let bridge = TestBridge::new(&[("Device1", 10)]);
    let cover = bridge.add_cover_at("Device1", 0);

    cover.move_to(10000);
    settle().await;
    seconds(3).await;
    assert_eq!(bridge.current("Device1"), Some(3000));

    assert_eq!(cover.move_to(10000), MoveOutcome::Interrupted { at: 3000 });
    assert_eq!(bridge.target("Device1"), Some(3000));

    seconds(10).await;
    assert_eq!(bridge.current("Device1"), Some(3000));
    assert_eq!(cover.status(), MovementStatus::Stopped);

    // A fresh request once stopped is honoured.
    assert_eq!(cover.move_to(0), MoveOutcome::Started(Direction::Opening));
    seconds(4).await;
    assert_eq!(bridge.current("Device1"), Some(0));
    assert_eq!(bridge.commands("Device1"), vec!["close", "stop", "open"]);
}

#[tokio::test(start_paused = true)]
async fn test_stop_motion() {
    let bridge = TestBridge::new(&[("Device1", 10)]);
    let cover = bridge.add_cover_at("Device1", 10000);

    cover.move_to(0);
    settle().await;
    seconds(2).await;

    assert!(cover.stop_motion());
    settle().await;

    assert_eq!(cover.status(), MovementStatus::Stopped);
    assert!(!cover.has_active_timer());
    assert_eq!(bridge.current("Device1"), Some(8000));
    assert_eq!(bridge.target("Device1"), Some(8000));
    assert_eq!(bridge.commands("Device1"), vec!["open", "stop"]);

    // Already stopped: no command, target re-frozen on the current position.
    bridge.store.set_attribute("Device1", TARGET_POSITION, 1234);
    assert!(!cover.stop_motion());
    settle().await;

    assert_eq!(bridge.target("Device1"), Some(8000));
    assert_eq!(bridge.commands("Device1"), vec!["open", "stop"]);
}

#[tokio::test(start_paused = true)]
async fn test_invalid_current_position_aborts() {
    let bridge = TestBridge::new(&[]);
    let cover = bridge.add_cover_at("Device1", 0);

    bridge.store.set_attribute("Device1", CURRENT_POSITION, 12000);
    assert_eq!(cover.move_to(5000), MoveOutcome::Aborted);

    bridge.store.set_attribute("Device1", CURRENT_POSITION, -1);
    assert_eq!(cover.move_to(5000), MoveOutcome::Aborted);

    bridge.store.remove("Device1");
    assert_eq!(cover.move_to(5000), MoveOutcome::Aborted);
    settle().await;

    assert!(!cover.has_active_timer());
    assert_eq!(cover.status(), MovementStatus::Stopped);
    assert!(bridge.driver.sent().is_empty());
}

// Known limitation: nothing reports the real position, so a failed command
// does not stop the simulation.
#[tokio::test(start_paused = true)]
async fn test_transport_failure_keeps_simulating() {
    let bridge = TestBridge::new(&[("Device1", 2)]);
    let cover = bridge.add_cover_at("Device1", 0);
    bridge.driver.set_failing(true);

    cover.move_to(10000);
    seconds(3).await;

    assert_eq!(bridge.commands("Device1"), vec!["close"]);
    assert_eq!(bridge.current("Device1"), Some(10000));
    assert_eq!(cover.status(), MovementStatus::Stopped);
}

#[tokio::test(start_paused = true)]
async fn test_vendor_vocabulary_is_translated() {
    let bridge = TestBridge::new(&[("Screen", 2), ("Shutter", 2)]);
    let screen = bridge.add_cover("Screen", &["rollOut", "rollUp", "stop"]);
    let shutter = bridge.add_cover("Shutter", &["down", "up", "stop"]);

    screen.move_to(10000);
    shutter.move_to(10000);
    seconds(3).await;

    screen.move_to(0);
    shutter.move_to(0);
    settle().await;
    screen.stop_motion();
    shutter.stop_motion();
    settle().await;

    assert_eq!(bridge.commands("Screen"), vec!["rollUp", "rollOut", "stop"]);
    assert_eq!(bridge.commands("Shutter"), vec!["down", "up", "stop"]);
}

#[tokio::test(start_paused = true)]
async fn test_manual_tick_advances_move() {
    let bridge = TestBridge::new(&[("Device1", 4)]);
    let cover = bridge.add_cover_at("Device1", 0);

    assert!(!cover.tick());

    cover.move_to(10000);
    assert!(cover.tick());
    assert_eq!(cover.position(), 2500);
    assert_eq!(bridge.current("Device1"), Some(2500));
}

#[tokio::test(start_paused = true)]
async fn test_moves_converge_exactly() {
    let bridge = TestBridge::new(&[("Device1", 7)]);
    let cover = bridge.add_cover_at("Device1", 0);

    for target in [3333, 10000, 9950, 1, 6789, 0] {
        cover.move_to(target);
        seconds(8).await;

        assert_eq!(bridge.current("Device1"), Some(i64::from(target)));
        assert_eq!(bridge.target("Device1"), Some(i64::from(target)));
        assert_eq!(cover.status(), MovementStatus::Stopped);
        assert!(!cover.has_active_timer());
    }
}
