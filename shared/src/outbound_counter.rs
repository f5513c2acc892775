use crate::{error::CounterError, metadata::Metadata};

/// Produces the `{seq, next}` stream for one sender.
///
/// Every sequencing layer owns exactly one counter; sharing a counter
/// between peers would make their sequence numbers collide.
pub struct OutboundCounter {
    current: Metadata,
}

impl OutboundCounter {
    pub fn new() -> Self {
        Self {
            current: Metadata::new(0, 1),
        }
    }

    /// The metadata the next outbound message will carry
    pub fn current(&self) -> Metadata {
        self.current
    }

    /// The metadata that follows [`current`](Self::current), without advancing
    pub fn following(&self) -> Result<Metadata, CounterError> {
        let seq = self.current.next;
        let Some(next) = seq.checked_add(1) else {
            return Err(CounterError::Exhausted { next: seq });
        };
        Ok(Metadata::new(seq, next))
    }

    /// Moves on to the announced `next`. Called once per message sent.
    pub fn advance(&mut self) -> Result<(), CounterError> {
        self.current = self.following()?;
        Ok(())
    }
}

impl Default for OutboundCounter {
    fn default() -> Self {
        Self::new()
    }
}
