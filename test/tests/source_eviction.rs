use std::time::Duration;

use ordo_sequencer::{Sequencer, SequencerConfig};
use ordo_shared::{Admission, Instant, Metadata, SourceSnapshot};
use ordo_test::{inbound, inbound_run, record_deliveries, DeliveryOrder, LocalTransport};

type TestSequencer = Sequencer<LocalTransport<&'static str, u64>>;

fn sequencer_with(config: SequencerConfig) -> TestSequencer {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn)
        .is_test(true)
        .try_init()
        .ok();

    let mut sequencer = Sequencer::new(config, LocalTransport::new("local"));
    sequencer.start().unwrap();
    sequencer
}

#[test]
fn buffers_grow_without_limit_by_default() {
    let mut sequencer = sequencer_with(SequencerConfig::default());
    sequencer.transport_mut().push_inbound(inbound("x", 0, 1));
    sequencer
        .transport_mut()
        .push_inbound_all(inbound_run("x", 2, 500), &DeliveryOrder::Reversed);

    sequencer.receive_all_messages().unwrap();

    assert_eq!(sequencer.pending_count(&"x"), 500);
    assert_eq!(sequencer.waiting_for(&"x"), Some(1));
}

#[test]
fn source_over_pending_limit_is_evicted() {
    let mut sequencer = sequencer_with(SequencerConfig {
        max_pending_per_source: Some(3),
        ..Default::default()
    });
    let deliveries = record_deliveries(&mut sequencer);
    sequencer.receive_message("x", "m", 0, Metadata::new(0, 1));

    for seq in 2..5 {
        sequencer.receive_message("x", "m", seq, Metadata::new(seq, seq + 1));
    }
    assert_eq!(
        sequencer.source_snapshot(&"x"),
        Some(SourceSnapshot {
            waiting_for: 1,
            pending: 3
        })
    );

    sequencer.receive_message("x", "m", 5, Metadata::new(5, 6));
    assert!(sequencer.source_snapshot(&"x").is_none());

    // the stuck stream resumes from whatever arrives next
    let outcome = sequencer.receive_message("x", "m", 6, Metadata::new(6, 7));
    assert_eq!(outcome.admission, Admission::Bootstrapped);
    assert_eq!(deliveries.seqs_from(&"x"), vec![0, 6]);
}

#[test]
fn pending_limit_is_checked_per_source() {
    let mut sequencer = sequencer_with(SequencerConfig {
        max_pending_per_source: Some(2),
        ..Default::default()
    });
    sequencer.transport_mut().push_inbound(inbound("busy", 0, 1));
    sequencer.transport_mut().push_inbound(inbound("quiet", 0, 1));
    sequencer
        .transport_mut()
        .push_inbound_all(inbound_run("busy", 2, 3), &DeliveryOrder::InOrder);
    sequencer.transport_mut().push_inbound(inbound("quiet", 2, 3));

    sequencer.receive_all_messages().unwrap();

    assert_eq!(sequencer.source_count(), 1);
    assert_eq!(sequencer.pending_count(&"quiet"), 1);
    assert_eq!(sequencer.waiting_for(&"busy"), None);
}

#[test]
fn idle_sources_are_evicted_after_timeout() {
    let mut sequencer = sequencer_with(SequencerConfig {
        source_idle_timeout: Some(Duration::from_millis(20)),
        ..Default::default()
    });
    sequencer.receive_message("x", "m", 0, Metadata::new(0, 1));
    sequencer.receive_message("x", "m", 2, Metadata::new(2, 3));

    assert!(sequencer.evict_idle_sources(&Instant::now()).is_empty());

    std::thread::sleep(Duration::from_millis(40));
    sequencer.receive_message("y", "m", 0, Metadata::new(0, 1));

    let evicted = sequencer.evict_idle_sources(&Instant::now());
    assert_eq!(evicted, vec!["x"]);
    assert_eq!(sequencer.sources().collect::<Vec<_>>(), vec![&"y"]);
}

#[test]
fn forgotten_source_starts_a_fresh_window() {
    let mut sequencer = sequencer_with(SequencerConfig::default());
    let deliveries = record_deliveries(&mut sequencer);
    sequencer.receive_message("x", "m", 10, Metadata::new(10, 11));
    sequencer.receive_message("x", "m", 12, Metadata::new(12, 13));

    let snapshot = sequencer.forget_source(&"x");
    assert_eq!(
        snapshot,
        Some(SourceSnapshot {
            waiting_for: 11,
            pending: 1
        })
    );
    assert_eq!(sequencer.forget_source(&"x"), None);

    // a restarted peer counts from zero again
    sequencer.receive_message("x", "m", 0, Metadata::new(0, 1));
    sequencer.receive_message("x", "m", 1, Metadata::new(1, 2));
    assert_eq!(deliveries.seqs_from(&"x"), vec![10, 0, 1]);
}
