use crate::signaling::AppState;
use crate::transport::{Transport, TransportEvent, WsTransport};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use parley_core::RoomId;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// HTTP handler upgrading `GET {ws_path}/{room_id}` to a signaling socket.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let room_id = RoomId::from(room_id);

    ws.on_upgrade(move |socket| handle_socket(socket, room_id, state))
}

async fn handle_socket(socket: WebSocket, room_id: RoomId, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    let transport = Arc::new(WsTransport::new(tx));
    let connection = transport.id();
    info!(room = %room_id, %connection, "New WebSocket connection");

    let room = state.rooms.accept_connection(room_id.clone(), transport).await;

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sender.send(msg).await.is_err() || closing {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let room = room.clone();

        async move {
            while let Some(frame) = receiver.next().await {
                let raw = match frame {
                    Ok(Message::Text(text)) => text.to_string(),
                    // Undecodable binary falls through as an invalid envelope.
                    Ok(Message::Binary(data)) => String::from_utf8(data.to_vec()).unwrap_or_default(),
                    Ok(Message::Close(_)) => return None,
                    Ok(_) => continue,
                    Err(e) => return Some(e.to_string()),
                };

                if !room.message(connection, raw).await {
                    return None;
                }
            }
            None
        }
    });

    let fault = tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            None
        }
        res = (&mut recv_task) => {
            send_task.abort();
            res.ok().flatten()
        }
    };

    let event = match fault {
        Some(reason) => TransportEvent::Error(connection, reason),
        None => TransportEvent::Closed(connection),
    };
    if !room.dispatch(event).await {
        debug!(room = %room_id, %connection, "Room already gone");
    }

    info!(room = %room_id, %connection, "WebSocket disconnected");
}
