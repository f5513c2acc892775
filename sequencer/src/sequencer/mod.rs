mod sequencer;
pub use sequencer::{ReceiveOutcome, Sequencer};

mod sequencer_config;
pub use sequencer_config::SequencerConfig;
