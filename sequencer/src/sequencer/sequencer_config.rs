use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by the Sequencer
///
/// The defaults keep every source's state for the life of the sequencer,
/// which suits a small, long-lived set of trusted peers. The limits below are
/// opt-in: evicting a source changes what gets delivered, since its next
/// message starts a fresh window.
#[derive(Clone, Debug)]
pub struct SequencerConfig {
    /// Evict a source once its reorder buffer holds more than this many
    /// undeliverable messages. `None` lets a stuck source buffer forever.
    pub max_pending_per_source: Option<usize>,
    /// Sources which admitted nothing for this long are evicted by
    /// [`Sequencer::evict_idle_sources`](crate::Sequencer::evict_idle_sources).
    /// `None` disables idle eviction.
    pub source_idle_timeout: Option<Duration>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            max_pending_per_source: None,
            source_idle_timeout: None,
        }
    }
}
