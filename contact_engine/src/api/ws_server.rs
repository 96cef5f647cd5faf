// @file: contact_engine/src/api/ws_server.rs
// @description: WebSocket endpoint: upgrade on the configured path, per-connection read loop, message dispatch.
// @author: LAS.

use std::sync::Arc;
use futures_util::StreamExt;
use log::{debug, info, warn};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::tungstenite::Message;
use crate::api::connection_manager::ConnectionManager;
use crate::api::socket::WsSocket;
use crate::core::models::{MessageType, WsMessage};
use crate::utils::config::AppConfig;


//
// SERVER ENTRY POINT
//

pub async fn start_server(manager: ConnectionManager, config: AppConfig) -> std::io::Result<()> {
    let listener: TcpListener = TcpListener::bind(&config.server_bind_address).await?;
    info!(
        "WebSocket server listening on: ws://{}{}",
        listener.local_addr()?,
        config.ws_path
    );

    serve(listener, manager, config.ws_path).await;
    Ok(())
}

/// Accept loop over an already-bound listener.
pub async fn serve(listener: TcpListener, manager: ConnectionManager, ws_path: String) {
    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                tokio::spawn(handle_connection(stream, manager.clone(), ws_path.clone()));
            }
            Err(e) => warn!("Failed to accept TCP connection: {}", e),
        }
    }
}


//
// CONNECTION HANDLER
//

async fn handle_connection(stream: TcpStream, manager: ConnectionManager, ws_path: String) {
    let path_check = move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
        if request.uri().path() == ws_path {
            return Ok(response);
        }
        let mut rejection = ErrorResponse::new(Some("Not Found".to_string()));
        *rejection.status_mut() = StatusCode::NOT_FOUND;
        Err(rejection)
    };

    let ws_stream = match accept_hdr_async(stream, path_check).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("Error during websocket handshake: {}", e);
            return;
        }
    };

    let (write, mut read) = ws_stream.split();
    let socket: Arc<WsSocket<TcpStream>> = Arc::new(WsSocket::new(write));
    let connection_id: String = manager.add_connection(socket.clone());

    // This loop is the only reader of the socket.
    loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => {
                process_message(&manager, &connection_id, &text).await;
            }
            Some(Ok(Message::Binary(data))) => {
                info!("Received binary message from {}: {} bytes (ignored)", connection_id, data.len());
            }
            Some(Ok(Message::Close(_))) => {
                // Keep polling: the next read flushes tungstenite's close reply, then the stream ends.
                debug!("Close frame received from {}", connection_id);
                socket.mark_closed();
            }
            // Control frames are answered by tungstenite itself.
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!("WebSocket exception for connection {}: {}", connection_id, e);
                socket.mark_closed();
                break;
            }
            None => {
                socket.mark_closed();
                break;
            }
        }
    }

    manager.remove_connection(&connection_id).await;
}


//
// MESSAGE DISPATCH
//

/// Handles one inbound text frame from `connection_id`.
pub async fn process_message(manager: &ConnectionManager, connection_id: &str, text: &str) {
    debug!("Received text message from {}: {}", connection_id, text);

    let message: WsMessage = match serde_json::from_str::<WsMessage>(text) {
        Ok(message) => message,
        Err(_) => {
            let echo = WsMessage::info(format!("Echo: {}", text));
            manager.send_to_client(connection_id, &echo).await;
            return;
        }
    };

    match message.kind {
        MessageType::Pong => manager.handle_pong(connection_id),
        MessageType::Ping => manager.send_to_client(connection_id, &WsMessage::pong()).await,
        MessageType::ContactCreated
        | MessageType::ContactUpdated
        | MessageType::ContactDeleted
        | MessageType::ContactsImported
        | MessageType::Error
        | MessageType::Info
        | MessageType::StatisticsUpdated => {
            manager.broadcast(&message).await;
        }
    }
}
