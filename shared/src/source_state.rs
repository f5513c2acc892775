use std::collections::HashMap;

use log::{debug, trace};

use naia_socket_shared::Instant;

use crate::{metadata::Metadata, types::SequenceNumber};

/// A message held by the layer, either waiting in a reorder buffer or on its
/// way out to subscribers
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferedMessage<P> {
    pub name: String,
    pub payload: P,
    pub metadata: Metadata,
}

impl<P> BufferedMessage<P> {
    pub fn new(name: impl Into<String>, payload: P, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            payload,
            metadata,
        }
    }
}

/// How an inbound message was taken in by a source's reorder buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// First message ever seen from the source; its `seq` became the window origin
    Bootstrapped,
    /// Stored at its `seq`, possibly delivered straight away by the drain
    Buffered,
    /// `seq` was below the window floor and the message was discarded
    Stale,
    /// Metadata could not be ordered and the message was discarded
    Malformed,
}

/// Point-in-time view of one source's reorder state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub waiting_for: SequenceNumber,
    pub pending: usize,
}

/// Reorder state for a single inbound source
pub struct SourceState<P> {
    waiting_for: SequenceNumber,
    pending: HashMap<SequenceNumber, BufferedMessage<P>>,
    last_admitted: Instant,
}

impl<P> SourceState<P> {
    /// Starts tracking a source from the first message observed from it.
    /// Whatever that source sent before this message is treated as already past.
    pub fn bootstrap(message: BufferedMessage<P>) -> Self {
        let waiting_for = message.metadata.seq;
        debug!("Bootstrapping source window at seq {}", waiting_for);

        let mut pending = HashMap::new();
        pending.insert(waiting_for, message);

        Self {
            waiting_for,
            pending,
            last_admitted: Instant::now(),
        }
    }

    /// Stores a message from an already tracked source, unless it falls below
    /// the window floor
    pub fn admit(&mut self, message: BufferedMessage<P>) -> Admission {
        let seq = message.metadata.seq;
        if seq < self.waiting_for {
            trace!(
                "Discarding stale message {:?} (seq {} < waiting for {})",
                message.name,
                seq,
                self.waiting_for
            );
            return Admission::Stale;
        }

        if self.pending.insert(seq, message).is_some() {
            debug!("Replaced pending message at seq {}", seq);
        }
        self.last_admitted = Instant::now();
        Admission::Buffered
    }

    /// Pops every message that is now deliverable, in sender order
    pub fn drain(&mut self) -> Vec<BufferedMessage<P>> {
        let mut output = Vec::new();
        let mut skipped = false;

        while let Some(message) = self.pending.remove(&self.waiting_for) {
            // validated metadata only ever moves the window forward
            skipped |= message.metadata.seq.checked_add(1) != Some(message.metadata.next);
            self.waiting_for = message.metadata.next;
            output.push(message);
        }

        // a sender that jumped ahead leaves anything it skipped below the floor
        if skipped {
            let waiting_for = self.waiting_for;
            let before = self.pending.len();
            self.pending.retain(|seq, _| *seq >= waiting_for);
            let pruned = before - self.pending.len();
            if pruned > 0 {
                trace!("Pruned {} skipped messages below seq {}", pruned, waiting_for);
            }
        }

        output
    }

    /// The lowest sequence number still missing before delivery can proceed
    pub fn waiting_for(&self) -> SequenceNumber {
        self.waiting_for
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn last_admitted(&self) -> &Instant {
        &self.last_admitted
    }

    pub fn snapshot(&self) -> SourceSnapshot {
        SourceSnapshot {
            waiting_for: self.waiting_for,
            pending: self.pending.len(),
        }
    }
}
