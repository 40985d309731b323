// WebSocket upgrade and per-connection socket loop

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures_util::{SinkExt, StreamExt};

use super::{ConnectionId, EventRoomBroker, WsInbound, WsOutbound};

/// App state for the live routes
#[derive(Clone)]
pub struct AppState {
    pub broker: EventRoomBroker,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/live", get(ws_handler))
        .with_state(state)
}

/// GET /v1/live - upgrade to the live display channel
///
/// The display is public (no auth, same as the attendance form); a connection
/// subscribes to events by sending join frames.
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state.broker, socket))
}

async fn handle_socket(broker: EventRoomBroker, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();
    let (connection, mut rx) = broker.register().await;

    loop {
        tokio::select! {
            // Fan-out frames queued for this connection
            queued = rx.recv() => {
                match queued {
                    Some(frame) => {
                        if sink.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            // Join/leave frames from the display
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(ack) = handle_frame(&broker, connection, text.as_str()).await {
                            if sink.send(Message::Text(ack.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                    // Ping/Pong answered by the framework
                    Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Binary(_))) => {}
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                }
            }
        }
    }

    broker.on_disconnect(connection).await;
}

/// Apply one inbound frame, returning the serialized ack to send back.
/// Unparseable frames are ignored (logged at debug).
async fn handle_frame(
    broker: &EventRoomBroker,
    connection: ConnectionId,
    text: &str,
) -> Option<String> {
    let frame = match serde_json::from_str::<WsInbound>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(connection = %connection, error = %e, "ignoring malformed frame");
            return None;
        }
    };

    let ack = match frame {
        WsInbound::Join { event_id } => {
            broker.join(connection, event_id).await;
            WsOutbound::Joined { event_id }
        }
        WsInbound::Leave { event_id } => {
            broker.leave(connection, event_id).await;
            WsOutbound::Left { event_id }
        }
    };

    serde_json::to_string(&ack).ok()
}
