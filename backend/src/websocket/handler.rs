use crate::{
    game::ClickOutcome,
    models::Position,
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};
use anyhow::{anyhow, Result};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// WebSocket upgrade handler
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);

    tracing::info!("WebSocket connection established");

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Handle incoming messages from the client. The connection drives at most
    // one game; the game itself lives in the shared session map.
    let mut recv_task = tokio::spawn(async move {
        let mut current_game: Option<Uuid> = None;

        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        let replies = apply_client_message(&state, client_msg, &mut current_game)
                            .unwrap_or_else(|e| {
                                tracing::warn!("Error handling message: {}", e);
                                vec![ServerMessage::Error {
                                    message: e.to_string(),
                                }]
                            });

                        for reply in replies {
                            if tx.send(reply).await.is_err() {
                                return current_game;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse message: {}", e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        };
                        let _ = tx.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client disconnected");
                    break;
                }
                _ => {}
            }
        }

        current_game
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        result = (&mut recv_task) => {
            send_task.abort();
            if let Ok(Some(game_id)) = result {
                tracing::debug!("Game {} left for idle cleanup after disconnect", game_id);
            }
        }
    }

    tracing::info!("WebSocket connection closed");
}

/// Apply one client message and return the replies to send back.
/// `current_game` tracks which session this connection is driving.
fn apply_client_message(
    state: &AppState,
    msg: ClientMessage,
    current_game: &mut Option<Uuid>,
) -> Result<Vec<ServerMessage>> {
    match msg {
        ClientMessage::NewGame { theme } => {
            let game = state.start_session(theme.as_deref())?;
            *current_game = Some(game.game_id);
            Ok(vec![ServerMessage::GameState { game }])
        }
        ClientMessage::ResumeGame { game_id } => {
            let game = state.snapshot(game_id)?;
            tracing::info!("Connection resumed game {}", game_id);
            *current_game = Some(game_id);
            Ok(vec![ServerMessage::GameState { game }])
        }
        ClientMessage::ClickCell { row, col } => {
            let game_id = active_game(current_game)?;
            let (outcome, game) = state.with_session(game_id, |session| {
                let outcome = session.click(Position::new(row, col))?;
                Ok((outcome, session.snapshot()))
            })?;

            Ok(match outcome {
                ClickOutcome::Pending { selection } => {
                    vec![ServerMessage::SelectionPending { selection }]
                }
                ClickOutcome::Matched {
                    word,
                    cells,
                    newly_found,
                } => {
                    let complete = newly_found && game.complete;
                    let mut replies = vec![ServerMessage::WordFound {
                        word,
                        cells,
                        newly_found,
                        game,
                    }];
                    if complete {
                        tracing::info!("Game {} completed", game_id);
                        replies.push(ServerMessage::PuzzleComplete { game_id });
                    }
                    replies
                }
            })
        }
        ClientMessage::SwitchTheme { theme } => {
            let game_id = active_game(current_game)?;
            let game = state.switch_theme(game_id, &theme)?;
            Ok(vec![ServerMessage::GameState { game }])
        }
        ClientMessage::ClearSelection => {
            let game_id = active_game(current_game)?;
            let game = state.with_session(game_id, |session| {
                session.clear_selection();
                Ok(session.snapshot())
            })?;
            Ok(vec![ServerMessage::GameState { game }])
        }
        ClientMessage::LeaveGame => {
            let game_id = active_game(current_game)?;
            *current_game = None;
            state.end_session(game_id);
            tracing::info!("Connection left game {}", game_id);
            Ok(vec![ServerMessage::LeftGame { game_id }])
        }
    }
}

fn active_game(current_game: &Option<Uuid>) -> Result<Uuid> {
    current_game.ok_or_else(|| anyhow!("No active game; send new_game or resume_game first"))
}
