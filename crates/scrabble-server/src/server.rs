//! WebSocket server and connection handling.

use crate::narration::{NarrationSender, QueueNarrator};
use crate::protocol::{ClientMessage, ServerMessage};
use crate::room::{GameRoom, RoomError, TurnOutcome};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use scrabble_core::narration::{self, describe_flow};
use scrabble_core::{FlowOutput, GameEvent, Names, Narrator, WordList};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// All active games
    pub games: DashMap<Uuid, GameRoom>,
    /// Mapping from player ID to their game ID
    pub player_games: DashMap<Uuid, Uuid>,
    /// Mapping from player ID to their message sender
    pub player_senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
    pub dictionary: Arc<WordList>,
    narration: NarrationSender,
    ai_seed: Option<u64>,
}

impl ServerState {
    pub fn new(dictionary: WordList, narration: NarrationSender, ai_seed: Option<u64>) -> Self {
        Self {
            games: DashMap::new(),
            player_games: DashMap::new(),
            player_senders: DashMap::new(),
            dictionary: Arc::new(dictionary),
            narration,
            ai_seed,
        }
    }

    /// Send a message to a specific player.
    pub fn send_to_player(&self, player_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.player_senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    /// Narrator that speaks to one player through the narration queue.
    pub fn narrator(&self, player_id: Uuid) -> QueueNarrator {
        QueueNarrator::new(player_id, self.narration.clone())
    }

    /// Run `f` on the player's game while holding its entry.
    /// The entry is released before this returns.
    pub fn with_game<T>(&self, player_id: Uuid, f: impl FnOnce(&mut GameRoom) -> T) -> Option<T> {
        let game_id = *self.player_games.get(&player_id)?;
        let mut room = self.games.get_mut(&game_id)?;
        Some(f(room.value_mut()))
    }

    /// Start a fresh game for a player, dropping any previous one.
    pub fn create_game(&self, player_id: Uuid, player_name: String) -> GameRoom {
        self.remove_game(player_id);
        GameRoom::new(Uuid::new_v4(), player_id, player_name, self.ai_seed)
    }

    /// Remove a player's game, if any.
    pub fn remove_game(&self, player_id: Uuid) {
        if let Some((_, game_id)) = self.player_games.remove(&player_id) {
            if let Some((_, room)) = self.games.remove(&game_id) {
                info!("Game {} for player {} closed", room.id, room.player_id);
            }
        }
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Accessible Scrabble server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Assign a player ID
    let player_id = Uuid::new_v4();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.player_senders.insert(player_id, tx);

    // Send welcome message
    let welcome = ServerMessage::Welcome { player_id };
    let msg_text = serde_json::to_string(&welcome)?;
    ws_sender.send(Message::Text(msg_text)).await?;

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(player_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {} ({})", player_id, text, e);
                    state.send_to_player(
                        player_id,
                        ServerMessage::Error {
                            message: format!("Invalid message: {}", e),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", player_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to_player(player_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", player_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    state.remove_game(player_id);
    state.player_senders.remove(&player_id);
    send_task.abort();

    info!("Connection closed for {}", player_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(player_id: Uuid, msg: ClientMessage, state: &Arc<ServerState>) {
    let dictionary = Arc::clone(&state.dictionary);

    match msg {
        ClientMessage::NewGame { player_name } => {
            let room = state.create_game(player_id, player_name);
            let game_id = room.id;
            let snapshot = room.snapshot();
            let names = room.names();

            state.games.insert(game_id, room);
            state.player_games.insert(player_id, game_id);
            info!("Player {} started game {}", player_id, game_id);

            state.send_to_player(
                player_id,
                ServerMessage::GameStarted {
                    game_id,
                    state: snapshot,
                },
            );

            let mut narrator = state.narrator(player_id);
            narrator.announce(&narration::welcome(&names));
            for line in narration::rules() {
                narrator.announce(&line);
            }
            narrator.announce("It's your turn now.");
        }

        ClientMessage::SubmitWord { word } => {
            respond_to_flow(player_id, state, |room| {
                room.submit_word(word, dictionary.as_ref())
            });
        }

        ClientMessage::SelectCell { row, col } => {
            respond_to_flow(player_id, state, |room| {
                room.select_cell(row, col, dictionary.as_ref())
            });
        }

        ClientMessage::CancelPlacement => {
            respond_to_flow(player_id, state, |room| {
                room.cancel_placement(dictionary.as_ref())
            });
        }

        ClientMessage::ChooseDirection { direction } => {
            respond_to_turn(player_id, state, |room| {
                room.choose_direction(direction, dictionary.as_ref())
            });
        }

        ClientMessage::PlayWord {
            word,
            row,
            col,
            direction,
        } => {
            respond_to_turn(player_id, state, |room| {
                room.play_word(&word, row, col, direction, dictionary.as_ref())
            });
        }

        ClientMessage::Pass => {
            respond_to_turn(player_id, state, GameRoom::pass);
        }

        ClientMessage::Hint => match state.with_game(player_id, GameRoom::hint) {
            Some(Ok(text)) => {
                state.narrator(player_id).announce(&text);
                state.send_to_player(player_id, ServerMessage::Hint { text });
            }
            Some(Err(e)) => reply_error(player_id, state, e.to_string()),
            None => no_game(player_id, state),
        },

        ClientMessage::Quit => {
            let Some((events, names, snapshot)) = state.with_game(player_id, |room| {
                let events = room.quit();
                (events, room.names(), room.snapshot())
            }) else {
                no_game(player_id, state);
                return;
            };
            info!("Player {} quit", player_id);
            narration::narrate(&events, &names, &mut state.narrator(player_id));
            state.send_to_player(player_id, ServerMessage::GameState { state: snapshot });
            announce_game_over(player_id, state, &events);
        }

        ClientMessage::GetState => match state.with_game(player_id, |room| room.snapshot()) {
            Some(snapshot) => {
                state.send_to_player(player_id, ServerMessage::GameState { state: snapshot })
            }
            None => no_game(player_id, state),
        },

        ClientMessage::Ping => {
            state.send_to_player(player_id, ServerMessage::Pong);
        }
    }
}

/// Run a placement-flow step and tell the client what to do next.
fn respond_to_flow(
    player_id: Uuid,
    state: &Arc<ServerState>,
    step: impl FnOnce(&mut GameRoom) -> Result<FlowOutput, RoomError>,
) {
    let Some((result, highlights)) = state.with_game(player_id, |room| {
        let result = step(room);
        (result, room.highlights())
    }) else {
        no_game(player_id, state);
        return;
    };

    match result {
        Ok(output) => {
            state.narrator(player_id).announce(&describe_flow(&output));
            if let FlowOutput::Inspect { coord, tile } = &output {
                state.send_to_player(
                    player_id,
                    ServerMessage::CellInfo {
                        coord: *coord,
                        tile: *tile,
                    },
                );
            }
            state.send_to_player(player_id, ServerMessage::FlowUpdated { output, highlights });
        }
        Err(e) => reply_error(player_id, state, e.to_string()),
    }
}

/// Run a turn (the human's move plus the AI's reply) and report it.
fn respond_to_turn(
    player_id: Uuid,
    state: &Arc<ServerState>,
    turn: impl FnOnce(&mut GameRoom) -> Result<TurnOutcome, RoomError>,
) {
    let Some((result, names, snapshot)) = state.with_game(player_id, |room| {
        let result = turn(room);
        (result, room.names(), room.snapshot())
    }) else {
        no_game(player_id, state);
        return;
    };
    let next_turn = snapshot.current_turn;

    match result {
        Ok(outcome) => {
            if let Some(report) = &outcome.report {
                debug!(
                    "Player {} played {} for {} points",
                    player_id,
                    report.plan.word(),
                    report.points
                );
            }
            state.send_to_player(
                player_id,
                ServerMessage::MoveResult {
                    success: true,
                    report: outcome.report,
                    error: None,
                    next_turn,
                },
            );
            narrate_events(player_id, state, &outcome.events, &names);
            state.send_to_player(player_id, ServerMessage::GameState { state: snapshot });
            announce_game_over(player_id, state, &outcome.events);
        }
        Err(e) => {
            debug!("Move rejected for {}: {}", player_id, e);
            let message = e.to_string();
            state.narrator(player_id).announce(&message);
            state.send_to_player(
                player_id,
                ServerMessage::MoveResult {
                    success: false,
                    report: None,
                    error: Some(message),
                    next_turn,
                },
            );
        }
    }
}

fn narrate_events(player_id: Uuid, state: &ServerState, events: &[GameEvent], names: &Names) {
    narration::narrate(events, names, &mut state.narrator(player_id));
}

fn announce_game_over(player_id: Uuid, state: &ServerState, events: &[GameEvent]) {
    for event in events {
        if let GameEvent::GameOver {
            reason,
            outcome,
            player_score,
            ai_score,
        } = event
        {
            info!("Game over for {}: {:?}", player_id, reason);
            state.send_to_player(
                player_id,
                ServerMessage::GameOver {
                    reason: *reason,
                    outcome: *outcome,
                    player_score: *player_score,
                    ai_score: *ai_score,
                },
            );
        }
    }
}

fn reply_error(player_id: Uuid, state: &ServerState, message: String) {
    state.narrator(player_id).announce(&message);
    state.send_to_player(player_id, ServerMessage::Error { message });
}

fn no_game(player_id: Uuid, state: &ServerState) {
    reply_error(player_id, state, "No game in progress. Start a new game first.".into());
}
