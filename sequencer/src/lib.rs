//! # Ordo Sequencer
//! A layer between an unordered-delivery transport and an application that
//! needs each source's messages in the order that source produced them.
//! Outbound messages are tagged with `{seq, next}` metadata so a peer running
//! the same layer can reorder this node's stream.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use ordo_shared::{
        Admission, BitReader, BitWrite, BitWriter, Instant, Metadata, MetadataError, Serde,
        SerdeErr, SequenceNumber, SourceSnapshot,
    };
}

mod error;
mod sequencer;
mod subscriber;
mod transport;

pub use error::SequencerError;
pub use sequencer::{ReceiveOutcome, Sequencer, SequencerConfig};
pub use subscriber::{Outbound, SequencedMessage, Subscriber, SubscriberKey};
pub use transport::{InboundMessage, StopCompletion, Transport};
