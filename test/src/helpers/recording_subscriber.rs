use std::{cell::RefCell, rc::Rc};

use ordo_sequencer::{Outbound, SequencedMessage, Sequencer, Subscriber, Transport};
use ordo_shared::SequenceNumber;

type Log<T> = Rc<RefCell<Vec<SequencedMessage<<T as Transport>::SourceId, <T as Transport>::Payload>>>>;

/// Subscriber that keeps a copy of every notification it receives
pub struct RecordingSubscriber<T: Transport> {
    log: Log<T>,
}

impl<T: Transport> RecordingSubscriber<T> {
    /// Returns the subscriber together with a handle to read what it recorded
    pub fn new() -> (Self, Deliveries<T>) {
        let log: Log<T> = Rc::new(RefCell::new(Vec::new()));
        (Self { log: log.clone() }, Deliveries { log })
    }
}

impl<T: Transport> Subscriber<T> for RecordingSubscriber<T>
where
    T::Payload: Clone,
{
    fn on_message(
        &mut self,
        message: &SequencedMessage<T::SourceId, T::Payload>,
        _outbound: &mut Outbound<'_, T>,
    ) {
        self.log.borrow_mut().push(message.clone());
    }
}

/// Read side of a [`RecordingSubscriber`]
pub struct Deliveries<T: Transport> {
    log: Log<T>,
}

impl<T: Transport> Clone for Deliveries<T> {
    fn clone(&self) -> Self {
        Self {
            log: self.log.clone(),
        }
    }
}

impl<T: Transport> Deliveries<T> {
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Sequence numbers delivered from `source`, in delivery order
    pub fn seqs_from(&self, source: &T::SourceId) -> Vec<SequenceNumber> {
        self.log
            .borrow()
            .iter()
            .filter(|message| &message.source == source)
            .map(|message| message.metadata.seq)
            .collect()
    }

    /// Names of every delivered message, in delivery order
    pub fn names(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .map(|message| message.name.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl<T: Transport> Deliveries<T>
where
    T::Payload: Clone,
{
    pub fn all(&self) -> Vec<SequencedMessage<T::SourceId, T::Payload>> {
        self.log.borrow().clone()
    }

    /// Payloads delivered from `source`, in delivery order
    pub fn payloads_from(&self, source: &T::SourceId) -> Vec<T::Payload> {
        self.log
            .borrow()
            .iter()
            .filter(|message| &message.source == source)
            .map(|message| message.payload.clone())
            .collect()
    }
}

/// Subscribes a fresh [`RecordingSubscriber`] and returns its read handle
pub fn record_deliveries<T>(sequencer: &mut Sequencer<T>) -> Deliveries<T>
where
    T: Transport + 'static,
    T::Payload: Clone,
{
    let (subscriber, deliveries) = RecordingSubscriber::new();
    sequencer.subscribe(Box::new(subscriber));
    deliveries
}
