//! WebSocket upgrade handler for the change feed.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use telehub_auth::jwt::claims::Claims;
use telehub_core::error::AppError;
use telehub_realtime::ClientMessage;

use crate::state::AppState;

/// Query parameter for WebSocket authentication.
#[derive(Debug, serde::Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
}

/// GET /ws?token={jwt} — WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, AppError> {
    // Authenticate before upgrade
    let claims = state.jwt_decoder.decode_access_token(&query.token)?;

    Ok(ws.on_upgrade(move |socket| handle_socket(state, claims, socket)))
}

/// Pumps an established feed socket until either side closes it.
async fn handle_socket(state: AppState, claims: Claims, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let user_id = claims.user_id();
    let (handle, mut outbound_rx) =
        state
            .feed_hub
            .register(user_id, claims.role, claims.username);
    let conn_id = handle.id;

    info!(conn_id = %conn_id, user_id = %user_id, "Feed socket established");

    // Outbound: serialize hub messages onto the socket.
    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize feed message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound: parse client messages and hand them to the hub.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(msg) => state.feed_hub.handle_message(conn_id, msg),
                Err(e) => {
                    warn!(conn_id = %conn_id, error = %e, "Unparseable feed message");
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "Feed socket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.feed_hub.unregister(conn_id);

    info!(conn_id = %conn_id, user_id = %user_id, "Feed socket closed");
}
