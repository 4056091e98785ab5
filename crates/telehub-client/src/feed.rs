//! Live change feed over WebSocket.

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

use telehub_core::error::AppError;
use telehub_core::events::ChangeEvent;
use telehub_realtime::{ClientMessage, ServerMessage};

/// A stream of change events pushed by the server.
///
/// `next` resolves to the following event, reconnecting as needed, and
/// returns `None` only when the feed is permanently closed.
#[async_trait]
pub trait ChangeFeed: Send {
    /// Waits for the next change event.
    async fn next(&mut self) -> Option<ChangeEvent>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket-backed [`ChangeFeed`] with automatic reconnection.
///
/// Connection loss is absorbed internally: the feed sleeps for a fixed
/// backoff and dials again. Keepalive pings from the server are answered
/// inline and never surface to the caller.
pub struct WsChangeFeed {
    url: String,
    backoff: Duration,
    stream: Option<WsStream>,
}

impl WsChangeFeed {
    /// Creates a feed for the given WebSocket URL and access token.
    pub fn new(url: impl Into<String>, token: &str, backoff: Duration) -> Self {
        Self {
            url: format!("{}?token={token}", url.into()),
            backoff,
            stream: None,
        }
    }

    async fn connect(&mut self) -> Result<(), AppError> {
        let (stream, _) = connect_async(&self.url)
            .await
            .map_err(|e| AppError::network(format!("Feed connection failed: {e}")))?;
        debug!("Change feed connected");
        self.stream = Some(stream);
        Ok(())
    }

    /// Reads from the current connection until an event arrives or the
    /// connection dies. Returns `None` on connection loss.
    async fn next_on_stream(&mut self) -> Option<ChangeEvent> {
        loop {
            let stream = self.stream.as_mut()?;
            let frame = match stream.next().await {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => {
                    warn!(error = %e, "Change feed read error");
                    self.stream = None;
                    return None;
                }
                None => {
                    self.stream = None;
                    return None;
                }
            };

            let text = match frame {
                Message::Text(text) => text,
                Message::Close(_) => {
                    self.stream = None;
                    return None;
                }
                _ => continue,
            };

            let msg: ServerMessage = match serde_json::from_str(text.as_str()) {
                Ok(msg) => msg,
                Err(e) => {
                    warn!(error = %e, "Unparseable feed message");
                    continue;
                }
            };

            match msg {
                ServerMessage::Change { event } => return Some(event),
                ServerMessage::Ping { timestamp } => {
                    let pong = ClientMessage::Pong { timestamp };
                    if let Ok(json) = serde_json::to_string(&pong) {
                        if stream.send(Message::text(json)).await.is_err() {
                            self.stream = None;
                            return None;
                        }
                    }
                }
                ServerMessage::Subscribed { channel } => {
                    debug!(channel = %channel, "Feed subscription confirmed");
                }
                ServerMessage::Error { code, message } => {
                    warn!(code = %code, message = %message, "Feed error message");
                }
            }
        }
    }
}

#[async_trait]
impl ChangeFeed for WsChangeFeed {
    async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            if self.stream.is_none() {
                if let Err(e) = self.connect().await {
                    warn!(error = %e, "Change feed reconnect failed");
                    tokio::time::sleep(self.backoff).await;
                    continue;
                }
            }
            if let Some(event) = self.next_on_stream().await {
                return Some(event);
            }
            // Connection dropped; back off before dialing again.
            tokio::time::sleep(self.backoff).await;
        }
    }
}
