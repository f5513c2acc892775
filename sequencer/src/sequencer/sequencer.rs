use log::{info, trace, warn};

use ordo_shared::{
    Admission, BufferedMessage, Instant, Metadata, OutboundCounter, SourceSnapshot, SourceTable,
    SequenceNumber,
};

use crate::{
    error::SequencerError,
    subscriber::{FnSubscriber, Outbound, SequencedMessage, Subscriber, SubscriberKey},
    transport::{InboundMessage, StopCompletion, Transport},
    SequencerConfig,
};

/// What happened to a single inbound message
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiveOutcome {
    pub admission: Admission,
    /// Messages from the same source delivered to subscribers as a result,
    /// this one included if it was deliverable
    pub delivered: usize,
}

/// Wraps a [`Transport`], numbering everything sent through it and
/// re-emitting each source's inbound messages in that source's order
pub struct Sequencer<T: Transport> {
    config: SequencerConfig,
    transport: T,
    started: bool,
    // Outbound
    counter: OutboundCounter,
    // Inbound
    sources: SourceTable<T::SourceId, T::Payload>,
    // Subscribers
    subscribers: Vec<(SubscriberKey, Box<dyn Subscriber<T>>)>,
    next_subscriber_key: u64,
}

impl<T: Transport> Sequencer<T> {
    /// Create a new Sequencer wrapping the given transport
    pub fn new(config: SequencerConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            started: false,
            counter: OutboundCounter::new(),
            sources: SourceTable::new(),
            subscribers: Vec::new(),
            next_subscriber_key: 0,
        }
    }

    // Lifecycle

    /// Starts the transport. Does nothing if already started.
    pub fn start(&mut self) -> Result<(), T::Error> {
        if self.started {
            return Ok(());
        }

        self.transport.start()?;
        self.started = true;
        info!("Sequencer started");
        Ok(())
    }

    /// Stops the transport, handing `completion` to it. Does nothing if not
    /// started; in that case `completion` is dropped without being called.
    ///
    /// Buffered out-of-order messages are kept.
    pub fn stop(&mut self, completion: Option<StopCompletion<T::Error>>) {
        if !self.started {
            return;
        }

        self.started = false;
        self.transport.stop(completion);
        info!("Sequencer stopped");
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    // Outbound

    /// Sends a message tagged with this node's next `{seq, next}` and returns
    /// the metadata it carried
    pub fn send(
        &mut self,
        name: &str,
        payload: T::Payload,
    ) -> Result<Metadata, SequencerError<T::Error>> {
        Outbound::new(&mut self.transport, &mut self.counter).send(name, payload)
    }

    /// The metadata the next outbound message will carry
    pub fn next_metadata(&self) -> Metadata {
        self.counter.current()
    }

    // Inbound

    /// Pulls every message the transport has received and runs each through
    /// [`receive_message`](Self::receive_message). Returns how many messages
    /// were delivered to subscribers.
    pub fn receive_all_messages(&mut self) -> Result<usize, T::Error> {
        let mut delivered = 0;
        while let Some(message) = self.transport.receive()? {
            let InboundMessage {
                source,
                name,
                payload,
                metadata,
            } = message;
            delivered += self.receive_message(source, name, payload, metadata).delivered;
        }
        Ok(delivered)
    }

    /// Entry point for one message reported by the transport.
    ///
    /// The message is buffered under its source, then every message of that
    /// source which became deliverable is emitted to subscribers before this
    /// returns.
    pub fn receive_message(
        &mut self,
        source: T::SourceId,
        name: impl Into<String>,
        payload: T::Payload,
        metadata: Metadata,
    ) -> ReceiveOutcome {
        let message = BufferedMessage::new(name, payload, metadata);
        let (admission, ready) = self.sources.receive(&source, message);

        if let Some(max_pending) = self.config.max_pending_per_source {
            self.sources.evict_if_over(&source, max_pending);
        }

        let delivered = ready.len();
        self.emit(&source, ready);

        ReceiveOutcome {
            admission,
            delivered,
        }
    }

    /// Like [`receive_message`](Self::receive_message), for transports which
    /// carry the metadata in its encoded wire form
    pub fn receive_encoded_message(
        &mut self,
        source: T::SourceId,
        name: impl Into<String>,
        payload: T::Payload,
        metadata: &[u8],
    ) -> ReceiveOutcome {
        let name = name.into();
        match Metadata::from_bytes(metadata) {
            Ok(metadata) => self.receive_message(source, name, payload, metadata),
            Err(error) => {
                warn!(
                    "Dropping message {:?} from source {:?}: {}",
                    name, source, error
                );
                ReceiveOutcome {
                    admission: Admission::Malformed,
                    delivered: 0,
                }
            }
        }
    }

    fn emit(&mut self, source: &T::SourceId, ready: Vec<BufferedMessage<T::Payload>>) {
        for BufferedMessage {
            name,
            payload,
            metadata,
        } in ready
        {
            trace!(
                "Delivering message {:?} from source {:?} (seq {})",
                name,
                source,
                metadata.seq
            );
            let message = SequencedMessage {
                source: source.clone(),
                name,
                payload,
                metadata,
            };

            let mut outbound = Outbound::new(&mut self.transport, &mut self.counter);
            for (_, subscriber) in self.subscribers.iter_mut() {
                subscriber.on_message(&message, &mut outbound);
            }
        }
    }

    // Subscribers

    /// Registers a subscriber. Subscribers are notified in registration order.
    pub fn subscribe(&mut self, subscriber: Box<dyn Subscriber<T>>) -> SubscriberKey {
        let key = SubscriberKey::new(self.next_subscriber_key);
        self.next_subscriber_key += 1;
        self.subscribers.push((key, subscriber));
        key
    }

    /// Registers a closure as a subscriber
    pub fn subscribe_fn<F>(&mut self, callback: F) -> SubscriberKey
    where
        F: FnMut(&SequencedMessage<T::SourceId, T::Payload>, &mut Outbound<'_, T>) + 'static,
    {
        self.subscribe(Box::new(FnSubscriber::new(callback)))
    }

    /// Removes a subscriber, returning whether it was registered
    pub fn unsubscribe(&mut self, key: &SubscriberKey) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(subscriber_key, _)| subscriber_key != key);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // Sources

    /// The lowest sequence number still missing from `source`, if it is tracked
    pub fn waiting_for(&self, source: &T::SourceId) -> Option<SequenceNumber> {
        self.sources.waiting_for(source)
    }

    /// Number of messages from `source` buffered behind a gap
    pub fn pending_count(&self, source: &T::SourceId) -> usize {
        self.sources.pending_count(source)
    }

    pub fn source_snapshot(&self, source: &T::SourceId) -> Option<SourceSnapshot> {
        self.sources.get(source).map(|state| state.snapshot())
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn sources(&self) -> impl Iterator<Item = &T::SourceId> {
        self.sources.sources()
    }

    /// Drops everything held for `source`, e.g. once the transport reports it
    /// disconnected. Its next message starts a fresh window.
    pub fn forget_source(&mut self, source: &T::SourceId) -> Option<SourceSnapshot> {
        let snapshot = self.sources.forget(source)?;
        info!(
            "Forgot source {:?} with {} pending messages",
            source, snapshot.pending
        );
        Some(snapshot)
    }

    /// Evicts sources idle for longer than the configured
    /// `source_idle_timeout`, returning their ids
    pub fn evict_idle_sources(&mut self, now: &Instant) -> Vec<T::SourceId> {
        let Some(timeout) = self.config.source_idle_timeout else {
            return Vec::new();
        };
        self.sources.evict_idle(now, timeout)
    }

    // Transport

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }
}
