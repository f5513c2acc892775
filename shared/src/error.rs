use thiserror::Error;

use crate::types::SequenceNumber;

/// Errors that can occur while validating or decoding sequencing metadata
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// The sender announced a `next` that does not move past `seq`
    #[error("Metadata announces next sequence {next} which does not advance past seq {seq}. The message cannot be ordered and is dropped")]
    NonAdvancingNext {
        seq: SequenceNumber,
        next: SequenceNumber,
    },

    /// The wire form of the metadata could not be read
    #[error("Failed to decode sequencing metadata. The payload is truncated or malformed")]
    Decode,
}

/// Errors that can occur while advancing an outbound counter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    /// The counter reached the end of the sequence number space
    #[error("Outbound sequence space exhausted at next sequence {next}. The counter never wraps")]
    Exhausted {
        next: SequenceNumber,
    },
}
