use thiserror::Error;

use ordo_shared::CounterError;

/// Errors returned when sending through the sequencing layer
#[derive(Debug, Error)]
pub enum SequencerError<E> {
    /// The transport refused the message. Passed through untouched.
    #[error("Transport failed to send message: {0}")]
    Transport(E),

    /// This node ran out of outbound sequence numbers
    #[error(transparent)]
    Counter(#[from] CounterError),
}
