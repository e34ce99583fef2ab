//! Narration queue.
//!
//! Handlers push lines into an unbounded channel and move on; a single
//! worker drains it, logging each line and forwarding it to its player.
//! Lines for one player arrive in the order they were queued.

use scrabble_core::Narrator;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::protocol::ServerMessage;
use crate::server::ServerState;

/// One line of speech for one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationLine {
    pub player_id: Uuid,
    pub text: String,
}

pub type NarrationSender = mpsc::UnboundedSender<NarrationLine>;
pub type NarrationReceiver = mpsc::UnboundedReceiver<NarrationLine>;

pub fn channel() -> (NarrationSender, NarrationReceiver) {
    mpsc::unbounded_channel()
}

/// `Narrator` that queues lines for a player
pub struct QueueNarrator {
    player_id: Uuid,
    tx: NarrationSender,
}

impl QueueNarrator {
    pub fn new(player_id: Uuid, tx: NarrationSender) -> Self {
        Self { player_id, tx }
    }
}

impl Narrator for QueueNarrator {
    fn announce(&mut self, text: &str) {
        // The worker only stops at shutdown
        let _ = self.tx.send(NarrationLine {
            player_id: self.player_id,
            text: text.to_string(),
        });
    }
}

/// Drain the queue until every sender is gone
pub async fn run_narrator(mut rx: NarrationReceiver, state: Arc<ServerState>) {
    while let Some(line) = rx.recv().await {
        info!(target: "narration", player = %line.player_id, "{}", line.text);
        state.send_to_player(line.player_id, ServerMessage::Narration { text: line.text });
    }
}
