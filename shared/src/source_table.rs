use std::{collections::HashMap, fmt::Debug, hash::Hash, time::Duration};

use log::{debug, warn};

use naia_socket_shared::Instant;

use crate::{
    source_state::{Admission, BufferedMessage, SourceSnapshot, SourceState},
    types::SequenceNumber,
};

/// Reorder state for every inbound source, keyed by source id.
///
/// Sources are tracked from the first message seen and kept until they are
/// explicitly forgotten or evicted.
pub struct SourceTable<S: Eq + Hash, P> {
    sources: HashMap<S, SourceState<P>>,
}

impl<S: Eq + Hash + Clone + Debug, P> SourceTable<S, P> {
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Admits one inbound message and returns everything from that source that
    /// became deliverable, in sender order
    pub fn receive(
        &mut self,
        source: &S,
        message: BufferedMessage<P>,
    ) -> (Admission, Vec<BufferedMessage<P>>) {
        if let Err(error) = message.metadata.validate() {
            warn!(
                "Dropping message {:?} from source {:?}: {}",
                message.name, source, error
            );
            return (Admission::Malformed, Vec::new());
        }

        let Some(state) = self.sources.get_mut(source) else {
            debug!("First message from source {:?}", source);
            let mut state = SourceState::bootstrap(message);
            let ready = state.drain();
            self.sources.insert(source.clone(), state);
            return (Admission::Bootstrapped, ready);
        };

        let admission = state.admit(message);
        let ready = match admission {
            Admission::Buffered => state.drain(),
            _ => Vec::new(),
        };
        (admission, ready)
    }

    pub fn contains(&self, source: &S) -> bool {
        self.sources.contains_key(source)
    }

    pub fn get(&self, source: &S) -> Option<&SourceState<P>> {
        self.sources.get(source)
    }

    pub fn waiting_for(&self, source: &S) -> Option<SequenceNumber> {
        self.sources.get(source).map(SourceState::waiting_for)
    }

    pub fn pending_count(&self, source: &S) -> usize {
        self.sources
            .get(source)
            .map(SourceState::pending_count)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn sources(&self) -> impl Iterator<Item = &S> {
        self.sources.keys()
    }

    /// Drops a source's window and buffer. Its next message bootstraps again.
    pub fn forget(&mut self, source: &S) -> Option<SourceSnapshot> {
        self.sources.remove(source).map(|state| state.snapshot())
    }

    /// Evicts the source if its buffer holds more than `max_pending` messages
    pub fn evict_if_over(&mut self, source: &S, max_pending: usize) -> Option<SourceSnapshot> {
        let over = self
            .sources
            .get(source)
            .is_some_and(|state| state.pending_count() > max_pending);
        if !over {
            return None;
        }

        let snapshot = self.forget(source)?;
        warn!(
            "Evicted source {:?}: {} pending messages exceed limit of {} (stuck waiting for seq {})",
            source, snapshot.pending, max_pending, snapshot.waiting_for
        );
        Some(snapshot)
    }

    /// Evicts every source that has not admitted a message within `timeout`
    pub fn evict_idle(&mut self, now: &Instant, timeout: Duration) -> Vec<S> {
        let idle: Vec<S> = self
            .sources
            .iter()
            .filter(|(_, state)| state.last_admitted().elapsed(now) >= timeout)
            .map(|(source, _)| source.clone())
            .collect();

        for source in &idle {
            if let Some(snapshot) = self.forget(source) {
                warn!(
                    "Evicted idle source {:?} with {} pending messages (waiting for seq {})",
                    source, snapshot.pending, snapshot.waiting_for
                );
            }
        }

        idle
    }
}

impl<S: Eq + Hash + Clone + Debug, P> Default for SourceTable<S, P> {
    fn default() -> Self {
        Self::new()
    }
}
