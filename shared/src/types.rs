/// Sequence numbers assigned by a sender to its own outbound stream.
/// These never wrap: a counter that would overflow reports
/// [`CounterError::Exhausted`](crate::CounterError::Exhausted) instead.
pub type SequenceNumber = u64;
