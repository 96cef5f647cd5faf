// @file: contact_engine/src/tests/support.rs
// @description: In-memory socket double recording everything the manager writes.
// @author: LAS.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use tokio_tungstenite::tungstenite;
use crate::api::socket::ClientSocket;
use crate::core::errors::SocketError;
use crate::core::models::{MessageType, WsMessage};


pub struct RecordingSocket {
    sent: Mutex<Vec<String>>,
    open: AtomicBool,
    fail_sends: bool,
    close_calls: AtomicUsize,
}

impl RecordingSocket {
    fn build(open: bool, fail_sends: bool) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            open: AtomicBool::new(open),
            fail_sends,
            close_calls: AtomicUsize::new(0),
        })
    }

    pub fn open() -> Arc<Self> {
        Self::build(true, false)
    }

    pub fn closed() -> Arc<Self> {
        Self::build(false, false)
    }

    /// Reports open but every write fails at the transport level.
    pub fn failing() -> Arc<Self> {
        Self::build(true, true)
    }

    pub fn set_open(&self, open: bool) {
        self.open.store(open, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<WsMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|raw| serde_json::from_str(raw).expect("manager only writes envelopes"))
            .collect()
    }

    pub fn kinds(&self) -> Vec<MessageType> {
        self.messages().iter().map(|m| m.kind).collect()
    }

    pub fn count_of(&self, kind: MessageType) -> usize {
        self.kinds().into_iter().filter(|k| *k == kind).count()
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientSocket for RecordingSocket {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn send_text(&self, text: String) -> Result<(), SocketError> {
        if !self.is_open() {
            return Err(SocketError::Closed);
        }
        if self.fail_sends {
            return Err(SocketError::Transport(tungstenite::Error::ConnectionClosed));
        }
        self.sent.lock().unwrap().push(text);
        Ok(())
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.open.store(false, Ordering::SeqCst);
    }
}
