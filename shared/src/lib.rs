//! # Ordo Shared
//! Sequencing metadata, outbound counters and per-source reorder buffers
//! shared between the ordo-sequencer & ordo-test crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use naia_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr, UnsignedVariableInteger};
pub use naia_socket_shared::Instant;

mod error;
mod metadata;
mod outbound_counter;
mod source_state;
mod source_table;
mod types;

pub use error::{CounterError, MetadataError};
pub use metadata::Metadata;
pub use outbound_counter::OutboundCounter;
pub use source_state::{Admission, BufferedMessage, SourceSnapshot, SourceState};
pub use source_table::SourceTable;
pub use types::SequenceNumber;
