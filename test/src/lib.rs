
pub use helpers::*;
pub use local_transport::{LocalTransport, LocalTransportError, SentMessage};
