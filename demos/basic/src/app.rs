use log::info;

use ordo_sequencer::{Sequencer, SequencerConfig};

use crate::link::ShuffledLink;

const SERVER: &str = "server";
const CLIENT: &str = "client";
const MESSAGE_COUNT: u32 = 10;

pub struct App {
    server: Sequencer<ShuffledLink>,
    client: Sequencer<ShuffledLink>,
    message_count: u32,
    updates: u32,
}

impl App {
    pub fn default() -> Self {
        info!("Basic Ordo Demo started");

        let (server_link, client_link) = ShuffledLink::pair(SERVER, CLIENT, 2024);
        let mut server = Sequencer::new(SequencerConfig::default(), server_link);
        let mut client = Sequencer::new(SequencerConfig::default(), client_link);

        client.subscribe_fn(|message, _| {
            info!(
                "Client received {:?} from {} (seq {}): {}",
                message.name, message.source, message.metadata.seq, message.payload
            );
        });
        // The server answers every client message through the same sequencer
        server.subscribe_fn(|message, outbound| {
            info!(
                "Server received {:?} from {} (seq {}): {}",
                message.name, message.source, message.metadata.seq, message.payload
            );
            let reply = format!("ack {}", message.payload);
            if let Err(error) = outbound.send("ack", reply) {
                info!("Server could not reply: {}", error);
            }
        });

        if let Err(error) = server.start() {
            info!("Server failed to start: {}", error);
        }
        if let Err(error) = client.start() {
            info!("Client failed to start: {}", error);
        }

        App {
            server,
            client,
            message_count: 0,
            updates: 0,
        }
    }

    pub fn update(&mut self) {
        self.updates += 1;

        // Send a small burst each update, so the link has several messages to reorder
        for _ in 0..3 {
            if self.message_count >= MESSAGE_COUNT {
                break;
            }
            let payload = format!("hello #{}", self.message_count);
            match self.client.send("greeting", payload) {
                Ok(metadata) => info!("Client sent seq {}", metadata.seq),
                Err(error) => info!("Client could not send: {}", error),
            }
            self.message_count += 1;
        }

        if let Err(error) = self.server.receive_all_messages() {
            info!("Server receive error: {}", error);
        }
        if let Err(error) = self.client.receive_all_messages() {
            info!("Client receive error: {}", error);
        }
    }

    pub fn is_done(&self) -> bool {
        let idle = self.server.transport().in_flight() == 0 && self.client.transport().in_flight() == 0;
        (self.message_count >= MESSAGE_COUNT && idle) || self.updates > 100
    }

    pub fn shutdown(&mut self) {
        for source in self.client.sources() {
            if let Some(snapshot) = self.client.source_snapshot(source) {
                info!(
                    "Client still waiting for seq {} from {} with {} pending",
                    snapshot.waiting_for, source, snapshot.pending
                );
            }
        }
        self.server.stop(None);
        self.client.stop(Some(Box::new(|result: Result<(), &'static str>| {
            info!("Client stopped: {:?}", result);
        })));
    }
}
