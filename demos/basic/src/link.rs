use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use ordo_sequencer::{shared::Metadata, InboundMessage, StopCompletion, Transport};

type Queue = Rc<RefCell<VecDeque<(String, String, Metadata)>>>;

/// One end of an in-process link that reorders whatever it carries
pub struct ShuffledLink {
    peer: &'static str,
    outgoing: Queue,
    incoming: Queue,
    rng: fastrand::Rng,
    open: bool,
}

impl ShuffledLink {
    /// Creates both ends of a link between `a` and `b`
    pub fn pair(a: &'static str, b: &'static str, seed: u64) -> (Self, Self) {
        let a_to_b: Queue = Rc::default();
        let b_to_a: Queue = Rc::default();
        let a_end = Self {
            peer: b,
            outgoing: a_to_b.clone(),
            incoming: b_to_a.clone(),
            rng: fastrand::Rng::with_seed(seed),
            open: false,
        };
        let b_end = Self {
            peer: a,
            outgoing: b_to_a,
            incoming: a_to_b,
            rng: fastrand::Rng::with_seed(seed.wrapping_add(1)),
            open: false,
        };
        (a_end, b_end)
    }

    pub fn in_flight(&self) -> usize {
        self.incoming.borrow().len()
    }
}

impl Transport for ShuffledLink {
    type SourceId = &'static str;
    type Payload = String;
    type Error = &'static str;

    fn start(&mut self) -> Result<(), Self::Error> {
        self.open = true;
        Ok(())
    }

    fn stop(&mut self, completion: Option<StopCompletion<Self::Error>>) {
        self.open = false;
        if let Some(completion) = completion {
            completion(Ok(()));
        }
    }

    fn send(&mut self, name: &str, payload: String, metadata: Metadata) -> Result<(), Self::Error> {
        if !self.open {
            return Err("link closed");
        }
        self.outgoing
            .borrow_mut()
            .push_back((name.to_string(), payload, metadata));
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<InboundMessage<Self::SourceId, String>>, Self::Error> {
        let mut incoming = self.incoming.borrow_mut();
        if incoming.is_empty() {
            return Ok(None);
        }
        // pick any in-flight message, not necessarily the oldest
        let index = self.rng.usize(..incoming.len());
        let Some((name, payload, metadata)) = incoming.remove(index) else {
            return Ok(None);
        };
        Ok(Some(InboundMessage::new(self.peer, name, payload, metadata)))
    }
}
