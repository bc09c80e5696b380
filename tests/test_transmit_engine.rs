/// Transmit engine timing and cancellation, driven by tokio's paused clock.
mod common;

use common::{FakeTransport, identity, interface};
use lldpd::{EngineState, TransmitEngine};
use std::time::Duration;
use tokio::time::{self, Instant};

#[tokio::test(start_paused = true)]
async fn test_sends_one_frame_per_interval() {
    let transport = FakeTransport::new();
    let log = transport.log.clone();
    let mut engine = TransmitEngine::new(&identity(), interface("lan0", 3), Duration::from_secs(2), transport).unwrap();

    let started = Instant::now();
    engine.start().unwrap();
    time::sleep(Duration::from_millis(10_500)).await;

    let writes = log.writes.lock().unwrap().clone();
    assert_eq!(writes.len(), 5);
    for (i, (at, frame)) in writes.iter().enumerate() {
        assert_eq!(*at - started, Duration::from_secs(2 * (i as u64 + 1)));
        assert_eq!(&frame[..], engine.frame());
    }

    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_nothing_is_sent_after_stop() {
    let transport = FakeTransport::new();
    let log = transport.log.clone();
    let mut engine = TransmitEngine::new(&identity(), interface("lan0", 3), Duration::from_secs(2), transport).unwrap();

    engine.start().unwrap();
    time::sleep(Duration::from_millis(4_500)).await;
    assert_eq!(log.write_count(), 2);

    engine.stop().await;
    assert_eq!(engine.state(), EngineState::Stopped);
    assert_eq!(log.closed(), 1);

    time::sleep(Duration::from_secs(20)).await;
    assert_eq!(log.write_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stop_interrupts_a_pending_write() {
    let transport = FakeTransport::slow(Duration::from_secs(60));
    let log = transport.log.clone();
    let mut engine = TransmitEngine::new(&identity(), interface("lan0", 3), Duration::from_secs(1), transport).unwrap();

    engine.start().unwrap();
    time::sleep(Duration::from_secs(5)).await;

    let before_stop = Instant::now();
    engine.stop().await;
    assert!(Instant::now() - before_stop < Duration::from_secs(1));
    assert_eq!(log.write_count(), 0);
    assert_eq!(log.closed(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_interface_does_not_delay_others() {
    let slow = FakeTransport::slow(Duration::from_secs(3));
    let slow_log = slow.log.clone();
    let fast = FakeTransport::new();
    let fast_log = fast.log.clone();

    let mut slow_engine = TransmitEngine::new(&identity(), interface("lan0", 3), Duration::from_secs(1), slow).unwrap();
    let mut fast_engine = TransmitEngine::new(&identity(), interface("lan1", 4), Duration::from_secs(1), fast).unwrap();

    slow_engine.start().unwrap();
    fast_engine.start().unwrap();
    time::sleep(Duration::from_millis(6_500)).await;

    let times = fast_log.write_times();
    assert_eq!(times.len(), 6);
    for pair in times.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::from_secs(1));
    }
    // First write completes at 4s, the next one is still pending.
    assert_eq!(slow_log.write_count(), 1);

    slow_engine.stop().await;
    fast_engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_missed_ticks_are_caught_up() {
    let transport = FakeTransport::slow(Duration::from_millis(2_500));
    let log = transport.log.clone();
    let mut engine = TransmitEngine::new(&identity(), interface("lan0", 3), Duration::from_secs(1), transport).unwrap();

    let started = Instant::now();
    engine.start().unwrap();
    time::sleep(Duration::from_millis(6_100)).await;

    // Writes never overlap: each one starts when the previous one is done.
    let times: Vec<Duration> = log.write_times().iter().map(|at| *at - started).collect();
    assert_eq!(times, vec![Duration::from_millis(3_500), Duration::from_millis(6_000)]);

    engine.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failed_write_is_retried_on_next_tick() {
    let transport = FakeTransport::failing_writes(&[true, false]);
    let log = transport.log.clone();
    let mut engine = TransmitEngine::new(&identity(), interface("lan0", 3), Duration::from_secs(2), transport).unwrap();

    let started = Instant::now();
    engine.start().unwrap();
    time::sleep(Duration::from_millis(10_500)).await;

    // Attempts at 2, 4, 6, 8 and 10s, the ones at 2, 6 and 10s fail.
    assert_eq!(log.attempts(), 5);
    let times: Vec<Duration> = log.write_times().iter().map(|at| *at - started).collect();
    assert_eq!(times, vec![Duration::from_secs(4), Duration::from_secs(8)]);
    assert_eq!(engine.state(), EngineState::Running);
    assert_eq!(log.closed(), 0);

    engine.stop().await;
    assert_eq!(log.closed(), 1);
}
