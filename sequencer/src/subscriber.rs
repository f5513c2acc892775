use ordo_shared::{Metadata, OutboundCounter};

use crate::{error::SequencerError, transport::Transport};

/// A message re-emitted by the sequencer, in the order its source produced it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequencedMessage<S, P> {
    pub source: S,
    pub name: String,
    pub payload: P,
    pub metadata: Metadata,
}

/// Handle returned by [`Sequencer::subscribe`](crate::Sequencer::subscribe)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberKey(u64);

impl SubscriberKey {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

/// Receives every message once it is deliverable for its source
pub trait Subscriber<T: Transport> {
    /// Called synchronously while the sequencer drains a source. `outbound`
    /// may be used to send replies from inside the notification.
    fn on_message(
        &mut self,
        message: &SequencedMessage<T::SourceId, T::Payload>,
        outbound: &mut Outbound<'_, T>,
    );
}

pub(crate) struct FnSubscriber<F> {
    callback: F,
}

impl<F> FnSubscriber<F> {
    pub(crate) fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<T, F> Subscriber<T> for FnSubscriber<F>
where
    T: Transport,
    F: FnMut(&SequencedMessage<T::SourceId, T::Payload>, &mut Outbound<'_, T>),
{
    fn on_message(
        &mut self,
        message: &SequencedMessage<T::SourceId, T::Payload>,
        outbound: &mut Outbound<'_, T>,
    ) {
        (self.callback)(message, outbound)
    }
}

/// The sending half of a sequencer: its transport and its outbound counter
pub struct Outbound<'a, T: Transport> {
    transport: &'a mut T,
    counter: &'a mut OutboundCounter,
}

impl<'a, T: Transport> Outbound<'a, T> {
    pub(crate) fn new(transport: &'a mut T, counter: &'a mut OutboundCounter) -> Self {
        Self { transport, counter }
    }

    /// Tags the message with the current `{seq, next}` and hands it to the
    /// transport. The counter only moves on once the transport accepted it.
    pub fn send(
        &mut self,
        name: &str,
        payload: T::Payload,
    ) -> Result<Metadata, SequencerError<T::Error>> {
        let metadata = self.counter.current();
        // checked up front so a sent message never leaves the counter stuck
        self.counter.following()?;

        self.transport
            .send(name, payload, metadata)
            .map_err(SequencerError::Transport)?;
        self.counter.advance()?;

        Ok(metadata)
    }

    /// The metadata the next outbound message will carry
    pub fn next_metadata(&self) -> Metadata {
        self.counter.current()
    }
}
