// @file: contact_engine/src/api/socket.rs
// @description: Write-side abstraction over a client WebSocket, serialized by a per-connection lock.
// @author: LAS.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::SinkExt;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use crate::core::errors::SocketError;


//
// TRAIT DEFINITIONS
//

#[async_trait]
pub trait ClientSocket: Send + Sync {
    fn is_open(&self) -> bool;

    async fn send_text(&self, text: String) -> Result<(), SocketError>;

    // Best-effort close handshake. Never fails.
    async fn close(&self);
}


//
// TUNGSTENITE IMPLEMENTATION
//

pub struct WsSocket<S> {
    sink: Mutex<SplitSink<WebSocketStream<S>, Message>>,
    open: AtomicBool,
}

impl<S> WsSocket<S> {
    pub fn new(sink: SplitSink<WebSocketStream<S>, Message>) -> Self {
        Self {
            sink: Mutex::new(sink),
            open: AtomicBool::new(true),
        }
    }

    /// Called by the read loop once the peer is gone.
    pub fn mark_closed(&self) {
        self.open.store(false, Ordering::Release);
    }
}

#[async_trait]
impl<S> ClientSocket for WsSocket<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    async fn send_text(&self, text: String) -> Result<(), SocketError> {
        if !self.is_open() {
            return Err(SocketError::Closed);
        }

        let mut sink = self.sink.lock().await;
        if let Err(e) = sink.send(Message::Text(text)).await {
            self.mark_closed();
            return Err(SocketError::Transport(e));
        }
        Ok(())
    }

    async fn close(&self) {
        if !self.open.swap(false, Ordering::AcqRel) {
            return;
        }

        let frame: CloseFrame<'static> = CloseFrame {
            code: CloseCode::Normal,
            reason: Cow::Borrowed("Connection closed"),
        };
        let mut sink = self.sink.lock().await;
        let _ = sink.send(Message::Close(Some(frame))).await;
    }
}
