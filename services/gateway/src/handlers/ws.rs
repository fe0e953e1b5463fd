use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::rate_limit::Surface;
use crate::state::AppState;
use axum::{
    extract::{
        State,
        ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::sink::SinkExt;
use futures::stream::StreamExt;
use tracing::{debug, info, warn};
use types::events::ClientEvent;
use types::ids::UserId;

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Response, AppError> {
    state.rate_limiter.check(&user.user_id, Surface::WsConnect)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user)))
}

/// One task per socket. Events on this connection are handled in
/// arrival order; nothing orders events across connections.
async fn handle_socket(socket: WebSocket, state: AppState, user: AuthenticatedUser) {
    let (mut sink, mut stream) = socket.split();
    let (conn_id, mut outbound) = state.connections.register();
    info!(user = %user.user_id, conn = %conn_id, "websocket connected");

    // Drain routed events into the socket until the channel or the
    // socket closes.
    let writer = tokio::spawn(async move {
        while let Some(event) = outbound.recv().await {
            let Ok(text) = serde_json::to_string(&event) else {
                continue;
            };
            if sink.send(Message::Text(Utf8Bytes::from(text))).await.is_err() {
                break;
            }
        }
    });

    // The identity whose presence entry this socket currently holds.
    let mut joined: Option<UserId> = None;

    while let Some(msg) = stream.next().await {
        let Ok(msg) = msg else { break };
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(ClientEvent::Join { user: who }) => {
                    if who != user.user_id {
                        warn!(conn = %conn_id, claimed = %who, "join for another identity ignored");
                        continue;
                    }
                    match state.presence.join(&who, &conn_id).await {
                        Ok(()) => joined = Some(who),
                        Err(err) => warn!(user = %who, "presence join failed: {err}"),
                    }
                }
                Ok(ClientEvent::Leave { user: who }) => {
                    if who != user.user_id {
                        warn!(conn = %conn_id, claimed = %who, "leave for another identity ignored");
                        continue;
                    }
                    if let Err(err) = state.presence.leave(&who).await {
                        warn!(user = %who, "presence leave failed: {err}");
                    }
                    joined = None;
                }
                Ok(ClientEvent::NewMessage {
                    body,
                    sender,
                    recipient,
                }) => {
                    if sender != user.user_id {
                        warn!(conn = %conn_id, claimed = %sender, "message for another identity ignored");
                        continue;
                    }
                    state.router.route(&sender, &recipient, &body).await;
                }
                Err(err) => {
                    // Malformed frames are dropped; the connection lives on.
                    debug!(conn = %conn_id, "unparseable client event: {err}");
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Disconnect: forget the connection, and drop the presence entry
    // only if this socket still owns it — a newer connection may have
    // overwritten it already.
    state.connections.remove(&conn_id);
    if let Some(who) = joined {
        match state.presence.lookup(&who).await {
            Ok(Some(current)) if current == conn_id => {
                if let Err(err) = state.presence.leave(&who).await {
                    warn!(user = %who, "presence cleanup failed: {err}");
                }
            }
            Ok(_) => {}
            Err(err) => warn!(user = %who, "presence cleanup lookup failed: {err}"),
        }
    }
    writer.abort();
    info!(conn = %conn_id, "websocket disconnected");
}
