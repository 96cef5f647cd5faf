// @file: contact_engine/src/api/connection_manager.rs
// @description: Registry of live WebSocket connections with ping/pong liveness, unicast and broadcast.
// @author: LAS.

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::future::join_all;
use log::{debug, error, info, warn};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use uuid::Uuid;
use crate::api::socket::ClientSocket;
use crate::core::interfaces::ChangeNotifier;
use crate::core::models::WsMessage;
use crate::utils::config::AppConfig;


//
// CONSTANTS
//

pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_PONG_TIMEOUT: Duration = Duration::from_secs(120);
pub const MIN_PING_INTERVAL: Duration = Duration::from_secs(1);


//
// TYPE DEFINITIONS
//

/// Why a connection left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    Closed,
    TimedOut,
    Errored,
    Shutdown,
}

struct Connection {
    socket: Arc<dyn ClientSocket>,
    last_seen: Instant,
    timer: JoinHandle<()>,
}


//
// MANAGER STRUCT
//

#[derive(Clone)]
pub struct ConnectionManager {
    connections: Arc<DashMap<String, Connection>>,
    ping_interval: Duration,
    pong_timeout: Duration,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(DEFAULT_PING_INTERVAL, DEFAULT_PONG_TIMEOUT)
    }
}

impl ConnectionManager {
    //
    // INITIALIZATION
    //

    /// A ping interval below `MIN_PING_INTERVAL` is raised to it (a zero period cannot be scheduled).
    pub fn new(ping_interval: Duration, pong_timeout: Duration) -> Self {
        let ping_interval: Duration = if ping_interval < MIN_PING_INTERVAL {
            warn!("Ping interval {:?} too short, using {:?}", ping_interval, MIN_PING_INTERVAL);
            MIN_PING_INTERVAL
        } else {
            ping_interval
        };

        Self {
            connections: Arc::new(DashMap::new()),
            ping_interval,
            pong_timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Duration::from_secs(config.ping_interval_secs),
            Duration::from_secs(config.pong_timeout_secs),
        )
    }


    //
    // LIFECYCLE
    //

    /// Registers an accepted socket and starts its liveness timer. Must run inside a tokio runtime.
    pub fn add_connection(&self, socket: Arc<dyn ClientSocket>) -> String {
        let connection_id: String = Uuid::new_v4().to_string();
        let timer: JoinHandle<()> = self.spawn_liveness_timer(connection_id.clone());

        self.connections.insert(
            connection_id.clone(),
            Connection {
                socket,
                last_seen: Instant::now(),
                timer,
            },
        );

        info!("WebSocket connection added: {}", connection_id);
        connection_id
    }

    /// Idempotent; unknown ids are ignored.
    pub async fn remove_connection(&self, connection_id: &str) {
        self.disconnect(connection_id, DisconnectReason::Closed).await;
    }

    /// Returns `false` when the id was not registered (already gone).
    pub async fn disconnect(&self, connection_id: &str, reason: DisconnectReason) -> bool {
        let connection: Connection = match self.connections.remove(connection_id) {
            Some((_, connection)) => connection,
            None => return false,
        };

        if connection.socket.is_open() {
            connection.socket.close().await;
        }
        // Last, so a timer tearing down its own connection still finishes the close.
        connection.timer.abort();

        match reason {
            DisconnectReason::TimedOut => warn!("WebSocket connection timed out: {}", connection_id),
            DisconnectReason::Errored => warn!("WebSocket connection dropped after error: {}", connection_id),
            _ => info!("WebSocket connection removed ({:?}): {}", reason, connection_id),
        }
        true
    }

    pub async fn shutdown(&self) {
        let ids: Vec<String> = self.connection_ids();
        for connection_id in &ids {
            self.disconnect(connection_id, DisconnectReason::Shutdown).await;
        }
        info!("Connection manager shut down, {} connection(s) closed", ids.len());
    }


    //
    // LIVENESS
    //

    fn spawn_liveness_timer(&self, connection_id: String) -> JoinHandle<()> {
        let manager: ConnectionManager = self.clone();
        let period: Duration = self.ping_interval;

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                if !manager.send_ping(&connection_id).await {
                    break;
                }
            }
        })
    }

    /// One probe. Returns whether the connection is still registered afterwards.
    async fn send_ping(&self, connection_id: &str) -> bool {
        // #1. Connection loss
        let socket: Arc<dyn ClientSocket> = match self.socket_of(connection_id) {
            Some(socket) if socket.is_open() => socket,
            Some(_) => {
                self.disconnect(connection_id, DisconnectReason::Errored).await;
                return false;
            }
            None => return false,
        };

        // #2. Probe
        let payload: String = match encode(&WsMessage::ping()) {
            Some(payload) => payload,
            None => return true,
        };
        if let Err(e) = socket.send_text(payload).await {
            warn!("Error sending ping to connection {}: {}", connection_id, e);
            self.disconnect(connection_id, DisconnectReason::Errored).await;
            return false;
        }

        // #3. Staleness, measured against the previous pong
        let last_seen: Instant = match self.connections.get(connection_id) {
            Some(connection) => connection.last_seen,
            None => return false,
        };
        if last_seen.elapsed() > self.pong_timeout {
            warn!("Connection {} timed out - no pong received", connection_id);
            self.disconnect(connection_id, DisconnectReason::TimedOut).await;
            return false;
        }

        true
    }

    pub fn handle_pong(&self, connection_id: &str) {
        if let Some(mut connection) = self.connections.get_mut(connection_id) {
            connection.last_seen = Instant::now();
            debug!("Pong received from connection {}", connection_id);
        }
    }


    //
    // DELIVERY
    //

    /// Fire-and-forget. A failed write tears down that connection only.
    pub async fn send_to_client(&self, connection_id: &str, message: &WsMessage) {
        let socket: Arc<dyn ClientSocket> = match self.socket_of(connection_id) {
            Some(socket) if socket.is_open() => socket,
            _ => return,
        };
        let payload: String = match encode(message) {
            Some(payload) => payload,
            None => return,
        };

        match socket.send_text(payload).await {
            Ok(()) => debug!("Sent {} message to connection {}", message.kind, connection_id),
            Err(e) => {
                warn!("Error sending {} to connection {}: {}", message.kind, connection_id, e);
                self.disconnect(connection_id, DisconnectReason::Errored).await;
            }
        }
    }

    /// Serializes once and writes to every open connection concurrently.
    /// Returns how many peers received the message.
    pub async fn broadcast(&self, message: &WsMessage) -> usize {
        let payload: String = match encode(message) {
            Some(payload) => payload,
            None => return 0,
        };

        let targets: Vec<(String, Arc<dyn ClientSocket>)> = self
            .connections
            .iter()
            .filter(|entry| entry.socket.is_open())
            .map(|entry| (entry.key().clone(), entry.socket.clone()))
            .collect();

        let sends = targets.iter().map(|(connection_id, socket)| {
            let text: String = payload.clone();
            async move { (connection_id, socket.send_text(text).await) }
        });
        let results = join_all(sends).await;

        let mut delivered: usize = 0;
        for (connection_id, result) in results {
            match result {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!("Broadcast to connection {} failed: {}", connection_id, e);
                    self.disconnect(connection_id, DisconnectReason::Errored).await;
                }
            }
        }

        if delivered > 0 {
            info!("Broadcasted {} message to {} clients", message.kind, delivered);
        }
        delivered
    }


    //
    // ACCESSORS
    //

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn connection_ids(&self) -> Vec<String> {
        self.connections.iter().map(|entry| entry.key().clone()).collect()
    }

    fn socket_of(&self, connection_id: &str) -> Option<Arc<dyn ClientSocket>> {
        self.connections
            .get(connection_id)
            .map(|connection| connection.socket.clone())
    }
}


#[async_trait]
impl ChangeNotifier for ConnectionManager {
    async fn notify(&self, message: WsMessage) -> usize {
        self.broadcast(&message).await
    }
}


fn encode(message: &WsMessage) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Failed to serialize {} message: {}", message.kind, e);
            None
        }
    }
}
