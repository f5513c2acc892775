use std::{fmt::Debug, hash::Hash};

use ordo_shared::Metadata;

/// Called by a transport once it has finished stopping
pub type StopCompletion<E> = Box<dyn FnOnce(Result<(), E>)>;

/// A message exactly as the transport reported it, in whatever order it arrived
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage<S, P> {
    pub source: S,
    pub name: String,
    pub payload: P,
    pub metadata: Metadata,
}

impl<S, P> InboundMessage<S, P> {
    pub fn new(source: S, name: impl Into<String>, payload: P, metadata: Metadata) -> Self {
        Self {
            source,
            name: name.into(),
            payload,
            metadata,
        }
    }
}

/// The unordered-delivery transport underneath a [`Sequencer`](crate::Sequencer).
///
/// The transport owns connections, serialization, retries and I/O. It must
/// carry each message's [`Metadata`] alongside its name and payload, intact.
pub trait Transport {
    /// Identifies the node an inbound message came from
    type SourceId: Eq + Hash + Clone + Debug;
    type Payload;
    type Error;

    fn start(&mut self) -> Result<(), Self::Error>;

    /// Stops the transport, reporting the outcome through `completion` if given
    fn stop(&mut self, completion: Option<StopCompletion<Self::Error>>);

    fn send(
        &mut self,
        name: &str,
        payload: Self::Payload,
        metadata: Metadata,
    ) -> Result<(), Self::Error>;

    /// Returns the next received message, if any. Delivery order across and
    /// within sources is up to the transport.
    fn receive(
        &mut self,
    ) -> Result<Option<InboundMessage<Self::SourceId, Self::Payload>>, Self::Error>;
}
