use courtplay_core::{
    data::{Frame, Play},
    Config, Designer, DesignerEvent, DesignerState, ManualClock, Point, TickStatus,
};

fn designer_at(start_ms: u64) -> (Designer<ManualClock>, ManualClock) {
    let clock = ManualClock::new(start_ms);
    (Designer::with_clock(Config::default(), clock.clone()), clock)
}

fn legacy_play(index: usize) -> Play {
    let plays: Vec<Play> = courtplay_test_fixtures::plays::load("legacy-collection")
        .expect("load legacy-collection fixture");
    plays[index].clone()
}

/// it should keep recorded timestamps non-decreasing and start at 0
#[test]
fn recording_timestamps_are_monotonic_from_zero() {
    let (mut d, clock) = designer_at(50_000);
    assert!(d.start_recording());

    let steps = [0u64, 3, 0, 0, 17, 250, 1, 0, 999];
    for (i, dt) in steps.iter().enumerate() {
        clock.advance(*dt);
        let x = 100.0 + i as f64 * 7.0;
        assert!(d.move_token("A2", Point::new(x, 200.0)));
    }

    let stamps: Vec<u64> = d.frames().iter().map(|f| f.timestamp_ms).collect();
    assert_eq!(stamps.len(), steps.len() + 1);
    assert_eq!(stamps[0], 0);
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]), "{stamps:?}");
    assert_eq!(*stamps.last().unwrap(), steps.iter().sum::<u64>());
}

/// it should record one frame per accepted update, even within the same millisecond
#[test]
fn same_millisecond_updates_each_get_a_frame() {
    let (mut d, _clock) = designer_at(0);
    d.start_recording();
    d.move_token("A1", Point::new(100.0, 100.0));
    d.move_token("A1", Point::new(101.0, 100.0));
    d.move_token("A1", Point::new(102.0, 100.0));
    assert_eq!(d.frames().len(), 4);
    assert!(d.frames().iter().all(|f| f.timestamp_ms == 0));
}

/// it should not record while idle, and keep the buffer after stop
#[test]
fn idle_moves_do_not_record_and_stop_retains_buffer() {
    let (mut d, clock) = designer_at(0);
    d.move_token("A1", Point::new(100.0, 100.0));
    assert!(d.frames().is_empty());

    d.start_recording();
    clock.advance(40);
    d.move_token("A1", Point::new(120.0, 100.0));
    d.stop();
    assert_eq!(d.state(), DesignerState::Idle);
    assert_eq!(d.frames().len(), 2);

    d.move_token("A1", Point::new(140.0, 100.0));
    assert_eq!(d.frames().len(), 2);
}

/// it should snapshot tokens by value so later edits never alter stored frames
#[test]
fn frames_are_independent_copies() {
    let (mut d, _clock) = designer_at(0);
    d.start_recording();
    let first = d.frames()[0].clone();
    d.move_token("A1", Point::new(400.0, 400.0));
    d.stop();
    d.move_token("A1", Point::new(50.0, 50.0));
    assert_eq!(d.frames()[0], first);
    let a1_in_second = d.frames()[1].tokens.iter().find(|t| t.id == "A1").unwrap();
    assert_eq!(a1_in_second.position(), Point::new(400.0, 400.0));
}

/// it should replay as a step function and end after the last frame
#[test]
fn playback_holds_last_known_frame() {
    let play = legacy_play(0);
    let stamps: Vec<u64> = play.frames.iter().map(|f| f.timestamp_ms).collect();
    assert_eq!(stamps, vec![0, 500, 1200]);

    let (mut d, clock) = designer_at(1_000);
    assert!(d.load_play(&play));
    assert!(d.play());

    let expect = [
        (0, 0, TickStatus::Continue),
        (499, 0, TickStatus::Continue),
        (500, 1, TickStatus::Continue),
        (1199, 1, TickStatus::Continue),
        (1200, 2, TickStatus::Continue),
        (2000, 2, TickStatus::Finished),
    ];
    for (elapsed, frame, status) in expect {
        clock.set(1_000 + elapsed);
        assert_eq!(d.tick(), status, "elapsed={elapsed}");
        assert_eq!(d.tokens(), play.frames[frame].tokens.as_slice(), "elapsed={elapsed}");
    }
    assert_eq!(d.state(), DesignerState::Idle);
    // The host deregisters its callback; further ticks are inert.
    assert_eq!(d.tick(), TickStatus::Idle);
}

/// it should pick the later of two frames sharing a timestamp
#[test]
fn playback_tie_break_prefers_later_frame() {
    let play = legacy_play(1);
    let (mut d, clock) = designer_at(0);
    d.load_play(&play);
    d.play();
    clock.set(16);
    d.tick();
    assert_eq!(d.tokens(), play.frames[2].tokens.as_slice());
}

/// it should stop playback on request and ignore a second stop
#[test]
fn stop_during_playback_then_idempotent() {
    let (mut d, clock) = designer_at(0);
    d.load_play(&legacy_play(0));
    d.take_outputs();
    d.play();
    clock.advance(600);
    assert_eq!(d.tick(), TickStatus::Continue);
    d.stop();
    assert_eq!(d.state(), DesignerState::Idle);
    assert_eq!(d.tick(), TickStatus::Idle);
    d.stop();
    assert_eq!(d.state(), DesignerState::Idle);

    let events = d.take_outputs().events;
    assert_eq!(
        events,
        vec![
            DesignerEvent::PlaybackStarted {
                frames: 3,
                duration_ms: 1200
            },
            DesignerEvent::PlaybackStopped,
        ]
    );
}

/// it should refuse recording and loading while playing
#[test]
fn playing_refuses_record_and_load() {
    let (mut d, _clock) = designer_at(0);
    d.load_play(&legacy_play(0));
    d.play();
    assert!(!d.start_recording());
    assert!(!d.load_play(&legacy_play(1)));
    assert_eq!(d.frames().len(), 3);
    assert!(!d.play());
}

/// it should restart recording from a fresh buffer
#[test]
fn new_recording_discards_previous_buffer() {
    let (mut d, clock) = designer_at(0);
    d.start_recording();
    clock.advance(100);
    d.move_token("A1", Point::new(100.0, 100.0));
    d.stop();
    assert_eq!(d.frames().len(), 2);

    clock.advance(5_000);
    d.start_recording();
    assert_eq!(d.frames().len(), 1);
    assert_eq!(d.frames()[0].timestamp_ms, 0);
    assert_eq!(
        d.frames()[0].tokens.iter().find(|t| t.id == "A1").unwrap().position(),
        Point::new(100.0, 100.0)
    );
}

/// it should replay a freshly recorded session exactly
#[test]
fn record_then_play_reproduces_poses() {
    let (mut d, clock) = designer_at(0);
    d.start_recording();
    clock.advance(100);
    d.move_token("B2", Point::new(250.0, 250.0));
    clock.advance(100);
    d.move_token("B2", Point::new(260.0, 240.0));
    d.stop();
    let recorded: Vec<Frame> = d.frames().to_vec();

    d.reset_positions();
    clock.advance(1_000);
    d.play();
    clock.advance(150);
    d.tick();
    assert_eq!(d.tokens(), recorded[1].tokens.as_slice());
    clock.advance(50);
    assert_eq!(d.tick(), TickStatus::Continue);
    assert_eq!(d.tokens(), recorded[2].tokens.as_slice());
    clock.advance(1);
    assert_eq!(d.tick(), TickStatus::Finished);
}
